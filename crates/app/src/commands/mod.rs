//! Application commands
//!
//! Thin wrappers over the session, pipeline and proxy services. Mutating
//! commands log their execution and publish a notification; read-only
//! queries do neither.

pub mod credential;
pub mod endpoints;
pub mod evaluation;
pub mod proxy;

pub use credential::{credential_status, masked_credential, set_credential};
pub use endpoints::{
    add_endpoint, list_endpoints, probe_endpoint, remove_endpoint, select_endpoint,
    update_endpoint,
};
pub use evaluation::{clear_results, evaluate_batch, evaluate_single, job_state, preview_data_url};
pub use proxy::proxy_post;
