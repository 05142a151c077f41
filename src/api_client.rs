//! api_client.rs
//!
//! Клиентская сторона контракта внешнего сервиса бронирования.
//!
//! Вся логика распределения мест, блокировок и атомарности живёт в сервисе;
//! здесь только построение запросов и разбор ответов.
//!
//! Эндпоинты:
//! - `GET  /bookings/seats` — снимок всех мест зала.
//! - `POST /bookings/book`  — атомарное бронирование `numberOfSeats` мест.
//! - `POST /bookings/reset` — отмена прежних бронирований текущей сессии (идемпотентно).
//! - `POST /auth/login`, `POST /auth/signup` — выдача токена.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{AuthResponse, BookingRequest, BookingResult, Credentials, Seat, Session};

/// Операции, которые клиент требует от сервиса бронирования.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn fetch_seats(&self, session: Option<&Session>) -> Result<Vec<Seat>, ApiError>;

    async fn book(&self, session: &Session, request: &BookingRequest) -> Result<BookingResult, ApiError>;

    async fn reset(&self, session: &Session) -> Result<(), ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
}

// Тело ошибки сервиса: {"error": "..."} или {"message": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP-реализация поверх `reqwest`.
#[derive(Clone)]
pub struct HttpBookingApi {
    /// Базовый URL сервиса без завершающего слэша.
    base_url: String,
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    /// Отправляет запрос и разбирает JSON-ответ, превращая неуспешный статус в `ApiError::Status`.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// То же самое, но тело успешного ответа не нужно.
    async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        Self::check_status(request.send().await?).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty());

        warn!("Booking service responded {}: {:?}", status, message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn fetch_seats(&self, session: Option<&Session>) -> Result<Vec<Seat>, ApiError> {
        debug!("GET /bookings/seats");
        let request = self.authorized(self.http_client.get(self.url("/bookings/seats")), session);
        self.send_json(request).await
    }

    async fn book(&self, session: &Session, request: &BookingRequest) -> Result<BookingResult, ApiError> {
        debug!("POST /bookings/book numberOfSeats={}", request.number_of_seats());
        let http_request = self
            .authorized(self.http_client.post(self.url("/bookings/book")), Some(session))
            .json(request);
        self.send_json(http_request).await
    }

    async fn reset(&self, session: &Session) -> Result<(), ApiError> {
        debug!("POST /bookings/reset");
        let request = self.authorized(self.http_client.post(self.url("/bookings/reset")), Some(session));
        self.send_unit(request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        debug!("POST /auth/login email={}", credentials.email);
        let request = self.http_client.post(self.url("/auth/login")).json(credentials);
        self.send_json(request).await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        debug!("POST /auth/signup email={}", credentials.email);
        let request = self.http_client.post(self.url("/auth/signup")).json(credentials);
        self.send_json(request).await
    }
}
