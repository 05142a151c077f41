pub mod booking;
pub mod session;

pub use session::{AuthPrompt, AuthTab, SessionGate, SessionState};
