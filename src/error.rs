//! Ошибки клиента бронирования.
//!
//! Ни одна из них не фатальна для процесса: после любой ошибки клиент остаётся
//! в последнем согласованном состоянии.

use thiserror::Error;

use crate::models::SeatNumber;

/// Ошибки обращения к внешнему сервису бронирования.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Сетевая ошибка или таймаут на стороне HTTP-клиента.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Сервис ответил неуспешным статусом.
    #[error("booking service returned {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// Ответ не соответствует ожидаемому контракту.
    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

fn suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default()
}

impl ApiError {
    /// Сообщение, которое прислал сам сервис, если оно было.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("You can only select up to {limit} seats at a time")]
    SelectionLimitExceeded { limit: usize },

    #[error("seat {0} is already booked")]
    SeatAlreadyBooked(SeatNumber),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    AuthFailed(String),

    #[error("{}", .0.as_deref().unwrap_or("Booking failed"))]
    BookingFailed(Option<String>),

    #[error(transparent)]
    Service(#[from] ApiError),

    #[error("token storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Ошибки, которые исправляются на стороне пользователя без обращения к сервису.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated
                | ClientError::InvalidRequest(_)
                | ClientError::SelectionLimitExceeded { .. }
                | ClientError::SeatAlreadyBooked(_)
                | ClientError::InvalidCredentials(_)
        )
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_failed_prefers_service_message() {
        let err = ClientError::BookingFailed(Some("Not enough seats".to_string()));
        assert_eq!(err.to_string(), "Not enough seats");
        assert_eq!(ClientError::BookingFailed(None).to_string(), "Booking failed");
    }

    #[test]
    fn status_error_exposes_service_message() {
        let err = ApiError::Status { status: 409, message: Some("taken".to_string()) };
        assert_eq!(err.service_message(), Some("taken"));
        assert_eq!(err.to_string(), "booking service returned 409: taken");

        let bare = ApiError::Status { status: 500, message: None };
        assert_eq!(bare.to_string(), "booking service returned 500");
        assert!(!bare.is_unauthorized());
    }
}
