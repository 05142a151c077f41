pub mod booking;
pub mod seat;
pub mod session;
pub mod user;

pub use booking::{BookedSeat, BookingRequest, BookingResult, MAX_SEATS_PER_BOOKING};
pub use seat::{Seat, SeatNumber, SeatStatus};
pub use session::Session;
pub use user::{AuthResponse, Credentials};
