//! Endpoint health probing

pub mod probe;

pub use probe::HttpEndpointProbe;
