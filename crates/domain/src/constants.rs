//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Endpoint registry
pub const MAX_ENDPOINTS: usize = 3;
pub const DEFAULT_ENDPOINT_TAG: &str = "Default";
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8080";
pub const HEALTH_PATH: &str = "/liveness";

// Persistence
pub const STORAGE_KEY: &str = "livegate-storage";

// Liveness API
pub const LIVENESS_API_URL: &str =
    "https://api.identity-platform.io/services/evaluatePassiveLivenessToken";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_TIMEOUT_SECS: u64 = 30;
pub const PROBE_TIMEOUT_SECS: u64 = 5;

// Batch pipeline
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];
pub const DEFAULT_PIPELINE_CONCURRENCY: usize = 1;

// Item diagnostics (user-facing, kept in the product's language)
pub const DIAGNOSTIC_PROCESSING_ERROR: &str = "Error al procesar";
pub const DIAGNOSTIC_MISSING_CREDENTIAL: &str = "Error: API key no configurada...";
pub const DIAGNOSTIC_NO_RESULT_LOG: &str = "Sin diagnóstico del servicio";
pub const DIAGNOSTIC_ERROR_PREFIX: &str = "Error: ";
pub const NOT_AVAILABLE: &str = "N/A";
