pub mod events;
pub mod seat_map;

pub use events::{Notice, UiEvent};
pub use seat_map::{SeatCell, SeatMap};

use crate::api_client::BookingApi;
use crate::storage::TokenStore;
use crate::ReservationClient;

impl<A: BookingApi, S: TokenStore> ReservationClient<A, S> {
    pub fn seat_map(&self) -> SeatMap {
        SeatMap::build(&self.inventory, &self.selection)
    }
}
