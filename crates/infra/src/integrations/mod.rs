//! External service integrations

pub mod liveness;
pub mod proxy;

pub use liveness::LivenessClient;
pub use proxy::ServiceProxy;
