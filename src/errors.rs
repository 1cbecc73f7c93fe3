use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use crate::upstream::UpstreamError;

pub type AppResponse<T> = Result<T, AppError>;

#[derive(Serialize)]
pub struct ErrorResponse {
    timestamp: String,
    status: u16,
    error: String,
    message: String,
    #[serde(rename = "errorCode")]
    error_code: ErrorCode,
    #[serde(rename = "upstreamStatus", skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    InsufficientPermissions,

    // Request Validation
    InvalidChannelId,
    InvalidDateFormat,
    ValidationError,

    // Upstream & Internal
    UpstreamUnavailable,
    UnexpectedError,
}

impl ErrorCode {
    fn to_str(&self) -> String {
        match self {
            ErrorCode::UnexpectedError => "Server Error. Please try again later".to_string(),
            ErrorCode::InsufficientPermissions => "You are not allowed to perform this action".to_string(),
            _ => format!("{:?}", self),
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Debug)]
pub struct HttpError {
    pub status_code: StatusCode,
    pub error_code: ErrorCode,
    pub message: String,
    pub upstream_status: Option<u16>,
}

impl HttpError {

    pub fn new(status_code: StatusCode, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error_code,
            message: message.into(),
            upstream_status: None,
        }
    }

    pub fn bad_request(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_code, message)
    }

}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("An error occurred: status={}, code={:?}, msg='{}'", self.status_code, self.error_code, self.message);
        } else {
            tracing::debug!("Request rejected: status={}, code={:?}, msg='{}'", self.status_code, self.error_code, self.message);
        }

        let status = self.status_code;

        let error_response = ErrorResponse {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            message: self.message,
            error_code: self.error_code,
            upstream_status: self.upstream_status,
        };

        (status, Json(error_response)).into_response()
    }
}

pub enum AppError {
    /// The channel / experience id is missing or malformed.
    InvalidChannelId(String),

    /// The date is not a valid `YYYY-MM-DD` calendar date.
    InvalidDateFormat(String),

    /// Any other malformed request.
    ValidationError(String),

    /// No or an invalid user token was presented.
    Unauthorized(String),

    /// The caller is known but lacks access to the requested company.
    Forbidden(String),

    /// The upstream api could not be reached or answered with a non-success status.
    UpstreamUnavailable(UpstreamError),

    /// Internal failure, e.g. a broken configuration.
    ProcessingError(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorCode {
        match self {
            AppError::InvalidChannelId(_) => ErrorCode::InvalidChannelId,
            AppError::InvalidDateFormat(_) => ErrorCode::InvalidDateFormat,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::InsufficientPermissions,
            AppError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            AppError::ProcessingError(_) => ErrorCode::UnexpectedError,
        }
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannelId(msg) => write!(f, "InvalidChannelId: {}", msg),
            Self::InvalidDateFormat(msg) => write!(f, "InvalidDateFormat: {}", msg),
            Self::ValidationError(msg) => write!(f, "ValidationError: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::UpstreamUnavailable(err) => write!(f, "UpstreamUnavailable: {:?}", err),
            Self::ProcessingError(msg) => write!(f, "ProcessingError: {}", msg),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidChannelId(msg) => write!(f, "Invalid channel id: {}", msg),
            AppError::InvalidDateFormat(msg) => write!(f, "Invalid date: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Invalid input: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::UpstreamUnavailable(err) => write!(f, "Upstream unavailable: {}", err),
            AppError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::UpstreamUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> AppError {
        AppError::UpstreamUnavailable(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.kind();

        let http_error = match self {
            AppError::InvalidChannelId(msg)
            | AppError::InvalidDateFormat(msg)
            | AppError::ValidationError(msg) => {
                HttpError::bad_request(code, msg)
            }
            AppError::Unauthorized(msg) => {
                HttpError::new(StatusCode::UNAUTHORIZED, code, msg)
            }
            AppError::Forbidden(msg) => {
                HttpError::new(StatusCode::FORBIDDEN, code, msg)
            }
            AppError::UpstreamUnavailable(err) => {
                tracing::error!("Upstream error: {:?}", err);
                let mut http_error = HttpError::new(StatusCode::BAD_GATEWAY, code, err.to_string());
                http_error.upstream_status = err.status();
                http_error
            }
            AppError::ProcessingError(msg) => {
                tracing::error!("Intern processing error: {}", msg);
                HttpError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "Unexpected server error processing."
                )
            }
        };

        http_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        let cases = [
            (AppError::InvalidChannelId("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidDateFormat("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::UpstreamUnavailable(UpstreamError::Status { status: 500, body: "boom".into() }), StatusCode::BAD_GATEWAY),
            (AppError::ProcessingError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn error_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::InvalidDateFormat).unwrap();
        assert_eq!(json, "\"INVALID_DATE_FORMAT\"");
        let json = serde_json::to_string(&ErrorCode::UpstreamUnavailable).unwrap();
        assert_eq!(json, "\"UPSTREAM_UNAVAILABLE\"");
    }
}
