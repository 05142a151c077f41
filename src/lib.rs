pub mod api_client;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use api_client::{BookingApi, HttpBookingApi};
use cache::{SeatInventory, SelectionState};
use services::session::SessionGate;
use storage::{FileTokenStore, TokenStore};

// Состояние клиента целиком. Все изменяющие операции берут `&mut self`,
// поэтому две отправки бронирования в одной сессии не могут идти одновременно.
pub struct ReservationClient<A: BookingApi, S: TokenStore> {
    pub(crate) api: A,
    pub(crate) gate: SessionGate<S>,
    pub(crate) inventory: SeatInventory,
    pub(crate) selection: SelectionState,
    pub(crate) requested_count: String,
    pub(crate) config: config::Config,
}

impl ReservationClient<HttpBookingApi, FileTokenStore> {
    /// Клиент с HTTP-транспортом и токеном в файле из конфигурации.
    pub fn from_config(config: config::Config) -> Result<Self, error::ClientError> {
        let api = HttpBookingApi::from_config(&config.api)?;
        let store = FileTokenStore::new(config.session.token_path.clone());
        Ok(Self::new(api, store, config))
    }
}

impl<A: BookingApi, S: TokenStore> ReservationClient<A, S> {
    pub fn new(api: A, store: S, config: config::Config) -> Self {
        Self {
            api,
            gate: SessionGate::new(store),
            inventory: SeatInventory::new(config.venue.total_seats),
            selection: SelectionState::default(),
            requested_count: String::new(),
            config,
        }
    }

    pub fn inventory(&self) -> &SeatInventory {
        &self.inventory
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn session_gate(&self) -> &SessionGate<S> {
        &self.gate
    }

    pub fn session_gate_mut(&mut self) -> &mut SessionGate<S> {
        &mut self.gate
    }

    /// Сырое значение поля "Number of Seats".
    pub fn requested_count(&self) -> &str {
        &self.requested_count
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
