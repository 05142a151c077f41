use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ClientError;

/// Тело запросов `POST /auth/login` и `POST /auth/signup`.
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    // Проверяем до отправки, чтобы не ходить в сервис с заведомо плохими данными
    pub fn validated(self) -> Result<Self, ClientError> {
        self.validate().map_err(|errors| {
            // Сначала email, потом пароль - как поля в форме
            let fields = errors.field_errors();
            let message = ["email", "password"]
                .iter()
                .filter_map(|field| fields.get(*field))
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid credentials".to_string());
            ClientError::InvalidCredentials(message)
        })?;
        Ok(self)
    }
}

// Пароль в логи не попадает
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
