use tracing::{debug, warn};

use crate::api_client::BookingApi;
use crate::error::ClientError;
use crate::models::{BookingResult, SeatNumber};
use crate::services::AuthTab;
use crate::storage::TokenStore;
use crate::ReservationClient;

/// События от интерфейса. Диалоги и вкладки - явные события, а не скрытые флаги.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SeatClicked(u32),
    CountChanged(String),
    BookPressed,
    ResetPressed,
    RefreshRequested,
    OpenAuth,
    CloseAuth,
    SwitchAuthTab(AuthTab),
    EmailChanged(String),
    PasswordChanged(String),
    SubmitAuth,
    LogoutPressed,
}

/// Что показать пользователю после события.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Состояние изменилось, сообщать нечего.
    Updated,
    /// Событие не имеет эффекта (например, клик по неактивной кнопке).
    Ignored,
    /// Открыта форма входа.
    AuthRequired(AuthTab),
    /// Локальная проблема ввода; запрос не отправлялся.
    Warning(String),
    Booked(BookingResult),
    SignedIn { email: String },
    SignedOut,
    /// Ошибка сервиса. Состояние осталось прежним.
    Failed(String),
}

impl Notice {
    pub fn message(&self) -> Option<String> {
        match self {
            Notice::Updated | Notice::Ignored => None,
            Notice::AuthRequired(tab) => Some(format!("Please {} to continue", tab.label().to_lowercase())),
            Notice::Warning(m) | Notice::Failed(m) => Some(m.clone()),
            Notice::Booked(result) => Some(result.summary()),
            Notice::SignedIn { email } => Some(format!("Signed in as {}", email)),
            Notice::SignedOut => Some("Signed out".to_string()),
        }
    }
}

impl<A: BookingApi, S: TokenStore> ReservationClient<A, S> {
    pub async fn handle(&mut self, event: UiEvent) -> Notice {
        debug!("UI event: {:?}", redact(&event));
        match event {
            UiEvent::SeatClicked(raw) => {
                let Some(seat) = SeatNumber::new(raw) else {
                    return Notice::Warning(format!("Seat {} does not exist in this venue", raw));
                };
                match self.toggle_seat(seat) {
                    Ok(_) => Notice::Updated,
                    // кнопка забронированного места неактивна
                    Err(ClientError::SeatAlreadyBooked(_)) => Notice::Ignored,
                    Err(e) => self.local_notice(e),
                }
            }
            UiEvent::CountChanged(raw) => {
                self.set_requested_count(raw);
                Notice::Updated
            }
            UiEvent::BookPressed => match self.book().await {
                Ok(result) => Notice::Booked(result),
                Err(e) => self.local_notice(e),
            },
            UiEvent::ResetPressed => match self.reset().await {
                Ok(()) => Notice::Updated,
                Err(e @ ClientError::Unauthenticated) => self.local_notice(e),
                Err(_) => Notice::Failed("Failed to reset booking".to_string()),
            },
            UiEvent::RefreshRequested => {
                let session = self.gate.session().cloned();
                match self.refresh_inventory(session.as_ref()).await {
                    Ok(_) => Notice::Updated,
                    Err(e) => Notice::Failed(format!("Could not load seats: {}", e)),
                }
            }
            UiEvent::OpenAuth => {
                self.gate.open_prompt(AuthTab::Login);
                Notice::AuthRequired(AuthTab::Login)
            }
            UiEvent::CloseAuth => {
                self.gate.close_prompt();
                Notice::Updated
            }
            UiEvent::SwitchAuthTab(tab) => {
                self.gate.switch_tab(tab);
                Notice::Updated
            }
            UiEvent::EmailChanged(email) => self.edit_prompt(|p| p.email = email),
            UiEvent::PasswordChanged(password) => self.edit_prompt(|p| p.password = password),
            UiEvent::SubmitAuth => {
                let email = self.gate.prompt().map(|p| p.email.trim().to_string()).unwrap_or_default();
                match self.submit_prompt().await {
                    Ok(()) => Notice::SignedIn { email },
                    Err(e) if self.gate.is_authenticated() => {
                        warn!("Signed in but seats could not be loaded: {}", e);
                        Notice::Warning(format!("Signed in as {}, but seats could not be loaded", email))
                    }
                    Err(e) => self.local_notice(e),
                }
            }
            UiEvent::LogoutPressed => match self.logout().await {
                Ok(()) => Notice::SignedOut,
                Err(_) => Notice::Failed("Signed out, but failed to reset booking".to_string()),
            },
        }
    }

    fn edit_prompt(&mut self, edit: impl FnOnce(&mut crate::services::AuthPrompt)) -> Notice {
        match self.gate.prompt_mut() {
            Some(prompt) => {
                edit(prompt);
                Notice::Updated
            }
            None => Notice::Ignored,
        }
    }

    fn local_notice(&self, error: ClientError) -> Notice {
        match error {
            ClientError::Unauthenticated => {
                Notice::AuthRequired(self.gate.prompt().map(|p| p.tab).unwrap_or_default())
            }
            e if e.is_local() => Notice::Warning(e.to_string()),
            e => Notice::Failed(e.to_string()),
        }
    }
}

// Пароль не должен попасть в debug-логи
fn redact(event: &UiEvent) -> UiEvent {
    match event {
        UiEvent::PasswordChanged(_) => UiEvent::PasswordChanged("***".to_string()),
        other => other.clone(),
    }
}
