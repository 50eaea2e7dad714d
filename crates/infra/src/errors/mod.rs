//! Infrastructure error mapping

pub mod conversions;

pub use conversions::InfraError;
use livegate_domain::LiveGateError;
use tokio::task::JoinError;

/// Map JoinError from spawn_blocking to LiveGateError.
pub(crate) fn map_join_error(err: JoinError) -> LiveGateError {
    if err.is_cancelled() {
        LiveGateError::Internal("blocking task cancelled".into())
    } else {
        LiveGateError::Internal(format!("blocking task failed: {err}"))
    }
}
