//! Клиентские кеши: снимок мест от сервиса и текущий выбор пользователя.

pub mod seats;
pub mod selection;

pub use seats::SeatInventory;
pub use selection::{SelectionState, Toggled};
