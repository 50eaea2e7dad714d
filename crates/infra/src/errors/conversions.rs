//! Conversions from external infrastructure errors into domain errors.

use image::ImageError;
use livegate_domain::LiveGateError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LiveGateError);

impl From<InfraError> for LiveGateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LiveGateError> for InfraError {
    fn from(value: LiveGateError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLiveGateError {
    fn into_livegate(self) -> LiveGateError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → LiveGateError */
/* -------------------------------------------------------------------------- */

impl IntoLiveGateError for SqlError {
    fn into_livegate(self) -> LiveGateError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => LiveGateError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        LiveGateError::Storage("database is locked".into())
                    }
                    ErrorCode::NotADatabase => {
                        LiveGateError::Storage("file is not a database".into())
                    }
                    ErrorCode::CannotOpen => {
                        LiveGateError::Storage(format!("unable to open database: {message}"))
                    }
                    ErrorCode::ReadOnly => LiveGateError::Storage("database is read-only".into()),
                    _ => LiveGateError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => LiveGateError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                LiveGateError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                LiveGateError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => LiveGateError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => LiveGateError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_livegate())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LiveGateError */
/* -------------------------------------------------------------------------- */

impl IntoLiveGateError for HttpError {
    fn into_livegate(self) -> LiveGateError {
        if self.is_timeout() {
            return LiveGateError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LiveGateError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => LiveGateError::NotFound(message),
                400..=499 => LiveGateError::InvalidInput(message),
                _ => LiveGateError::Network(message),
            };
        }

        if self.is_builder() {
            return LiveGateError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        LiveGateError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_livegate())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LiveGateError */
/* -------------------------------------------------------------------------- */

impl IntoLiveGateError for std::io::Error {
    fn into_livegate(self) -> LiveGateError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => LiveGateError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                LiveGateError::Storage(format!("permission denied: {self}"))
            }
            _ => LiveGateError::Storage(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_livegate())
    }
}

/* -------------------------------------------------------------------------- */
/* image::ImageError → LiveGateError */
/* -------------------------------------------------------------------------- */

impl IntoLiveGateError for ImageError {
    fn into_livegate(self) -> LiveGateError {
        match self {
            ImageError::IoError(err) => err.into_livegate(),
            ImageError::Unsupported(err) => {
                LiveGateError::Media(format!("unsupported image format: {err}"))
            }
            ImageError::Decoding(err) => {
                LiveGateError::Media(format!("failed to decode image: {err}"))
            }
            ImageError::Limits(err) => LiveGateError::Media(format!("image too large: {err}")),
            other => LiveGateError::Media(other.to_string()),
        }
    }
}

impl From<ImageError> for InfraError {
    fn from(value: ImageError) -> Self {
        InfraError(value.into_livegate())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
