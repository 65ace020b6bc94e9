//! Typed error handling for repair-desk
//!
//! Every fallible operation in the crate returns [`RepairResult`]. Errors are
//! grouped by category so callers can match on them specifically, and each
//! category knows its HTTP status and machine-readable code.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or incomplete input
//! - [`AuthError`]: missing/invalid credentials and login throttling
//! - [`OrderError`]: unknown orders and illegal lifecycle transitions
//! - [`StorageError`]: backend failures
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match service.mark_picked_up(1, PickupDetails::same_owner()).await {
//!     Ok(order) => println!("Picked up on {:?}", order.pickup_date),
//!     Err(RepairError::Order(OrderError::InvalidTransition { from, .. })) => {
//!         println!("Order is still {}", from);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::order::OrderStatus;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message returned to callers for every server-side failure
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// The main error type of the crate
#[derive(Debug)]
pub enum RepairError {
    /// Input validation errors
    Validation(ValidationError),

    /// Authentication errors
    Auth(AuthError),

    /// Order lookup and lifecycle errors
    Order(OrderError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Anything else that should not happen in normal operation
    Internal(String),
}

impl fmt::Display for RepairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairError::Validation(e) => write!(f, "{}", e),
            RepairError::Auth(e) => write!(f, "{}", e),
            RepairError::Order(e) => write!(f, "{}", e),
            RepairError::Storage(e) => write!(f, "{}", e),
            RepairError::Config(e) => write!(f, "{}", e),
            RepairError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RepairError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepairError::Validation(e) => Some(e),
            RepairError::Auth(e) => Some(e),
            RepairError::Order(e) => Some(e),
            RepairError::Storage(e) => Some(e),
            RepairError::Config(e) => Some(e),
            RepairError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RepairError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RepairError::Validation(ValidationError::BodyTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            RepairError::Validation(_) => StatusCode::BAD_REQUEST,
            RepairError::Auth(e) => e.status_code(),
            RepairError::Order(e) => e.status_code(),
            RepairError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RepairError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RepairError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RepairError::Validation(ValidationError::BodyTooLarge { .. }) => "PAYLOAD_TOO_LARGE",
            RepairError::Validation(_) => "VALIDATION_ERROR",
            RepairError::Auth(e) => e.error_code(),
            RepairError::Order(e) => e.error_code(),
            RepairError::Storage(_) => "INTERNAL_ERROR",
            RepairError::Config(_) => "CONFIG_ERROR",
            RepairError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error originates on the server side
    ///
    /// Server-side errors are logged and their detail is withheld from callers.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            RepairError::Order(OrderError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            RepairError::Order(OrderError::InvalidTransition { id, from, to }) => {
                Some(serde_json::json!({
                    "id": id,
                    "from": from,
                    "to": to
                }))
            }
            RepairError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            RepairError::Validation(ValidationError::FieldError { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }

    pub fn not_found(id: u64) -> Self {
        RepairError::Order(OrderError::NotFound { id })
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        RepairError::Validation(ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        })
    }
}

impl IntoResponse for RepairError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let retry_after = match &self {
            RepairError::Auth(AuthError::RateLimited { retry_after_secs }) => {
                Some(*retry_after_secs)
            }
            _ => None,
        };

        let mut response = (status, Json(self.to_response())).into_response();
        if let Some(secs) = retry_after
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Request body could not be read into the expected shape
    InvalidBody { message: String },

    /// Request body over the configured size limit
    BodyTooLarge { limit: usize },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            ValidationError::BodyTooLarge { limit } => {
                write!(f, "Request body exceeds {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RepairError {
    fn from(err: ValidationError) -> Self {
        RepairError::Validation(err)
    }
}

impl From<Vec<FieldValidationError>> for RepairError {
    fn from(mut errors: Vec<FieldValidationError>) -> Self {
        if errors.len() == 1 {
            let only = errors.remove(0);
            RepairError::Validation(ValidationError::FieldError {
                field: only.field,
                message: only.message,
            })
        } else {
            RepairError::Validation(ValidationError::FieldErrors(errors))
        }
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on a protected route
    MissingToken,

    /// Token present but malformed or wrongly signed
    InvalidToken,

    /// Token signature fine but past its expiry
    ExpiredToken,

    /// Wrong username or password at login
    InvalidCredentials,

    /// Too many login attempts from one address
    RateLimited { retry_after_secs: u64 },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing bearer token"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token expired"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::RateLimited { retry_after_secs } => write!(
                f,
                "Too many login attempts, retry in {} seconds",
                retry_after_secs
            ),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::RateLimited { .. } => "RATE_LIMITED",
            _ => "UNAUTHORIZED",
        }
    }
}

impl From<AuthError> for RepairError {
    fn from(err: AuthError) -> Self {
        RepairError::Auth(err)
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Errors related to a specific order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// No order with this id
    NotFound { id: u64 },

    /// The order is not in the state the operation requires
    InvalidTransition {
        id: u64,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::NotFound { id } => write!(f, "Order {} not found", id),
            OrderError::InvalidTransition { id, from, to } => write!(
                f,
                "Order {} cannot move from '{}' to '{}'",
                id, from, to
            ),
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
        }
    }
}

impl From<OrderError> for RepairError {
    fn from(err: OrderError) -> Self {
        RepairError::Order(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },

    /// Backend not available
    Unavailable { backend: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for RepairError {
    fn from(err: StorageError) -> Self {
        RepairError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError { file: Option<String>, message: String },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => write!(
                f,
                "Invalid value '{}' for field '{}': {}",
                value, field, message
            ),
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for RepairError {
    fn from(err: ConfigError) -> Self {
        RepairError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for RepairError {
    fn from(err: serde_json::Error) -> Self {
        RepairError::Validation(ValidationError::InvalidBody {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for RepairError {
    fn from(err: std::io::Error) -> Self {
        RepairError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for RepairError {
    fn from(err: serde_yaml::Error) -> Self {
        RepairError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for RepairError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<RepairError>() {
            Ok(repair_err) => repair_err,
            Err(other) => RepairError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for repair-desk operations
pub type RepairResult<T> = Result<T, RepairError>;
