use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub venue: VenueConfig,
    pub session: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{}`", other)),
        }
    }
}

// Настройки сервиса бронирования
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// Настройки зала
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    /// Места нумеруются подряд с 1 до `total_seats`.
    pub total_seats: u32,
}

// Где хранится токен между перезапусками
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub token_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let total_seats: u32 = parse_var("VENUE_TOTAL_SEATS", "71")?;
        if total_seats == 0 {
            return Err(ConfigError::Invalid {
                var: "VENUE_TOTAL_SEATS",
                value: total_seats.to_string(),
                reason: "venue must have at least one seat".to_string(),
            });
        }

        Ok(Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seat_booking=info".to_string()),
                log_format: parse_var("LOG_FORMAT", "text")?,
            },
            api: ApiConfig {
                base_url: env::var("BOOKING_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
                timeout_seconds: parse_var("BOOKING_API_TIMEOUT_SECONDS", "30")?,
            },
            venue: VenueConfig { total_seats },
            session: SessionConfig {
                token_path: env::var("SESSION_TOKEN_PATH")
                    .unwrap_or_else(|_| ".booking_session.json".to_string())
                    .into(),
            },
        })
    }

    /// Конфигурация по умолчанию, направленная на конкретный адрес сервиса.
    pub fn for_api(base_url: impl Into<String>) -> Self {
        Config {
            app: AppConfig {
                environment: "test".to_string(),
                rust_log: "seat_booking=debug".to_string(),
                log_format: LogFormat::Text,
            },
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_seconds: 30,
            },
            venue: VenueConfig { total_seats: 71 },
            session: SessionConfig {
                token_path: ".booking_session.json".into(),
            },
        }
    }
}

fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn for_api_uses_reference_venue() {
        let config = Config::for_api("http://127.0.0.1:9000");
        assert_eq!(config.venue.total_seats, 71);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }
}
