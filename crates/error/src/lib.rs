//! # Praxis Error Infrastructure
//!
//! Error types and API response handling for the Praxis application.

pub mod response;

pub use response::{ApiResponse, PaginationMeta};

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
///
/// Each variant maps to one error class of the API surface: the HTTP status,
/// the stable machine code, and the human message all derive from it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("RateLimit: {message}")]
    RateLimit {
        message:     String,
        retry_after: u64,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Create a rate limit error with the remaining lockout duration in seconds.
    #[inline]
    pub fn rate_limited(message: impl ToString, retry_after: u64) -> Self {
        Self::RateLimit {
            message: message.to_string(),
            retry_after,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimit {
                ..
            } => http::StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal {
                ..
            }
            | AppError::Database {
                ..
            }
            | AppError::Io {
                ..
            }
            | AppError::Config {
                ..
            }
            | AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::RateLimit {
                ..
            } => "TOO_MANY_REQUESTS",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::Conflict {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::RateLimit {
                message,
                ..
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Io {
                message,
            }
            | AppError::Config {
                message,
            }
            | AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Get the retry-after value for rate limit errors.
    pub fn retry_after(&self) -> u64 {
        match self {
            AppError::RateLimit {
                retry_after,
                ..
            } => *retry_after,
            _ => 0,
        }
    }

    /// Add context to the error message, keeping the error class.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let prefixed = format!("{}: {}", context.to_string(), self.message());
        match self {
            AppError::NotFound {
                ..
            } => {
                Self::NotFound {
                    message: prefixed,
                }
            },
            AppError::BadRequest {
                ..
            } => {
                Self::BadRequest {
                    message: prefixed,
                }
            },
            AppError::Unauthorized {
                ..
            } => {
                Self::Unauthorized {
                    message: prefixed,
                }
            },
            AppError::Forbidden {
                ..
            } => {
                Self::Forbidden {
                    message: prefixed,
                }
            },
            AppError::Conflict {
                ..
            } => {
                Self::Conflict {
                    message: prefixed,
                }
            },
            AppError::Validation {
                ..
            } => {
                Self::Validation {
                    message: prefixed,
                }
            },
            AppError::RateLimit {
                retry_after,
                ..
            } => {
                Self::RateLimit {
                    message: prefixed,
                    retry_after,
                }
            },
            AppError::Internal {
                ..
            } => {
                Self::Internal {
                    message: prefixed,
                }
            },
            AppError::Database {
                ..
            } => {
                Self::Database {
                    message: prefixed,
                }
            },
            AppError::Io {
                ..
            } => {
                Self::Io {
                    message: prefixed,
                }
            },
            AppError::Config {
                ..
            } => {
                Self::Config {
                    message: prefixed,
                }
            },
            AppError::Migration {
                ..
            } => {
                Self::Migration {
                    message: prefixed,
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

///// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert JSON serialization errors to AppError.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| {
                errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}

/// Render the error as the standard `{success, code, message}` JSON envelope.
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), message = %self.message(), "Request failed");
        }

        let body = axum::Json(serde_json::json!({
            "success": false,
            "code": self.code(),
            "message": self.message(),
        }));

        let mut response = (status, body).into_response();
        if let AppError::RateLimit {
            retry_after,
            ..
        } = self
        {
            if let Ok(val) = retry_after.to_string().parse() {
                response
                    .headers_mut()
                    .insert(http::header::RETRY_AFTER, val);
            }
        }
        response
    }
}
