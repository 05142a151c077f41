//! Доступ к бронированию только для аутентифицированного пользователя.
//!
//! Состояния: `Anonymous` и `Authenticated`. Вход и регистрация переводят в
//! `Authenticated`, сохраняют токен и сразу обновляют снимок мест. Выход
//! забывает токен, очищает снимок и выполняет тот же сброс, что и `reset()`.
//!
//! Попытка действия без сессии не ошибка, а приглашение войти: шлюз открывает
//! форму входа, и ничего не отправляется.

use tracing::{error, info, warn};

use crate::api_client::BookingApi;
use crate::error::ClientError;
use crate::models::{Credentials, Session};
use crate::storage::TokenStore;
use crate::ReservationClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Session),
}

/// Вкладка формы входа.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

impl AuthTab {
    pub fn label(self) -> &'static str {
        match self {
            AuthTab::Login => "Login",
            AuthTab::Signup => "Sign Up",
        }
    }

    fn failure_message(self) -> String {
        match self {
            AuthTab::Login => "Login failed".to_string(),
            AuthTab::Signup => "Signup failed".to_string(),
        }
    }
}

/// Открытая форма входа/регистрации. Поля задаются вызывающим.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthPrompt {
    pub tab: AuthTab,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AuthPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPrompt")
            .field("tab", &self.tab)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub struct SessionGate<S: TokenStore> {
    store: S,
    state: SessionState,
    prompt: Option<AuthPrompt>,
}

impl<S: TokenStore> SessionGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
            prompt: None,
        }
    }

    /// Подхватывает токен, сохранённый прошлым запуском.
    pub fn restore(&mut self) -> Result<bool, ClientError> {
        match self.store.load()? {
            Some(session) => {
                info!("Restored session for {:?}", session.email);
                self.state = SessionState::Authenticated(session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Anonymous => None,
        }
    }

    /// Сессия для действия, требующего входа. Без неё открывается форма входа.
    pub fn require_session(&mut self) -> Result<Session, ClientError> {
        if let SessionState::Authenticated(session) = &self.state {
            return Ok(session.clone());
        }
        if self.prompt.is_none() {
            self.open_prompt(AuthTab::Login);
        }
        Err(ClientError::Unauthenticated)
    }

    pub fn prompt(&self) -> Option<&AuthPrompt> {
        self.prompt.as_ref()
    }

    pub fn prompt_mut(&mut self) -> Option<&mut AuthPrompt> {
        self.prompt.as_mut()
    }

    pub fn open_prompt(&mut self, tab: AuthTab) {
        self.prompt = Some(AuthPrompt {
            tab,
            ..AuthPrompt::default()
        });
    }

    /// Закрывает форму, введённые поля теряются.
    pub fn close_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn switch_tab(&mut self, tab: AuthTab) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.tab = tab;
        } else {
            self.open_prompt(tab);
        }
    }

    pub(crate) fn establish(&mut self, session: Session) {
        // Не удалось сохранить - сессия живёт до перезапуска
        if let Err(e) = self.store.save(&session) {
            warn!("Failed to persist session token: {}", e);
        }
        self.state = SessionState::Authenticated(session);
        self.prompt = None;
    }

    /// Сервис отверг токен: сессия забыта, открыта форма входа.
    pub(crate) fn expire(&mut self) {
        self.teardown();
        self.open_prompt(AuthTab::Login);
    }

    pub(crate) fn teardown(&mut self) -> Option<Session> {
        if let Err(e) = self.store.clear() {
            warn!("Failed to remove stored session token: {}", e);
        }
        match std::mem::replace(&mut self.state, SessionState::Anonymous) {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Anonymous => None,
        }
    }
}

impl<A: BookingApi, S: TokenStore> ReservationClient<A, S> {
    /// Восстанавливает сессию из хранилища и, если она была, загружает места.
    ///
    /// Ошибка загрузки мест возвращается, но шлюз при этом остаётся `Authenticated`.
    pub async fn restore_session(&mut self) -> Result<bool, ClientError> {
        if !self.gate.restore()? {
            return Ok(false);
        }
        let session = self.gate.session().cloned();
        self.refresh_inventory(session.as_ref()).await?;
        Ok(true)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        self.authenticate(AuthTab::Login, email, password).await
    }

    pub async fn signup(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        self.authenticate(AuthTab::Signup, email, password).await
    }

    /// Отправляет форму входа в том режиме, который выбран вкладкой.
    pub async fn submit_prompt(&mut self) -> Result<(), ClientError> {
        let prompt = self.gate.prompt().cloned().unwrap_or_default();
        self.authenticate(prompt.tab, &prompt.email, &prompt.password).await
    }

    // При ошибке загрузки мест после успешного входа возвращается эта ошибка,
    // а шлюз уже `Authenticated`.
    async fn authenticate(&mut self, tab: AuthTab, email: &str, password: &str) -> Result<(), ClientError> {
        let credentials = Credentials::new(email, password).validated()?;

        let response = match tab {
            AuthTab::Login => self.api.login(&credentials).await,
            AuthTab::Signup => self.api.signup(&credentials).await,
        };

        let token = match response {
            Ok(auth) if !auth.token.is_empty() => auth.token,
            Ok(_) => {
                error!("{} for {} returned an empty token", tab.label(), credentials.email);
                return Err(ClientError::AuthFailed(tab.failure_message()));
            }
            Err(e) => {
                error!("{} failed for {}: {}", tab.label(), credentials.email, e);
                let message = e
                    .service_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| tab.failure_message());
                return Err(ClientError::AuthFailed(message));
            }
        };

        info!("{} succeeded for {}", tab.label(), credentials.email);
        let session = Session::new(token).with_email(credentials.email);
        self.gate.establish(session.clone());

        self.refresh_inventory(Some(&session)).await?;
        Ok(())
    }

    /// Выход: токен забыт, снимок очищен, затем тот же сброс, что и `reset()`.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let previous = self.gate.teardown();
        self.inventory.clear();
        info!("Logged out {:?}", previous.as_ref().and_then(|s| s.email.as_deref()));
        self.reset_with(previous).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;

    #[test]
    fn anonymous_request_opens_login_prompt() {
        let mut gate = SessionGate::new(MemoryTokenStore::default());
        assert!(matches!(gate.require_session(), Err(ClientError::Unauthenticated)));
        assert_eq!(gate.prompt().map(|p| p.tab), Some(AuthTab::Login));
    }

    #[test]
    fn require_session_keeps_open_prompt() {
        let mut gate = SessionGate::new(MemoryTokenStore::default());
        gate.open_prompt(AuthTab::Signup);
        if let Some(prompt) = gate.prompt_mut() {
            prompt.email = "a@b.kz".to_string();
        }
        let _ = gate.require_session();
        let prompt = gate.prompt().unwrap();
        assert_eq!(prompt.tab, AuthTab::Signup);
        assert_eq!(prompt.email, "a@b.kz");
    }

    #[test]
    fn restore_picks_up_stored_token() {
        let store = MemoryTokenStore::with_session(Session::new("stored"));
        let mut gate = SessionGate::new(store);
        assert!(gate.restore().unwrap());
        assert_eq!(gate.session().map(Session::token), Some("stored"));
    }

    #[test]
    fn establish_and_teardown_touch_the_store() {
        let store = MemoryTokenStore::default();
        let mut gate = SessionGate::new(store.clone());
        gate.open_prompt(AuthTab::Login);

        gate.establish(Session::new("t1"));
        assert!(gate.is_authenticated());
        assert!(gate.prompt().is_none());
        assert_eq!(store.current().map(|s| s.token().to_string()), Some("t1".to_string()));

        let previous = gate.teardown();
        assert_eq!(previous.map(|s| s.token().to_string()), Some("t1".to_string()));
        assert_eq!(gate.state(), &SessionState::Anonymous);
        assert!(store.current().is_none());
    }

    #[test]
    fn expire_forgets_token_and_prompts_login() {
        let store = MemoryTokenStore::with_session(Session::new("stale"));
        let mut gate = SessionGate::new(store.clone());
        gate.restore().unwrap();

        gate.expire();
        assert!(!gate.is_authenticated());
        assert!(store.current().is_none());
        assert_eq!(gate.prompt().map(|p| p.tab), Some(AuthTab::Login));
    }

    #[test]
    fn switch_tab_opens_prompt_if_closed() {
        let mut gate = SessionGate::new(MemoryTokenStore::default());
        gate.switch_tab(AuthTab::Signup);
        assert_eq!(gate.prompt().map(|p| p.tab), Some(AuthTab::Signup));
        gate.close_prompt();
        assert!(gate.prompt().is_none());
    }
}
