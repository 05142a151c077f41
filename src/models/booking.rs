use serde::{Deserialize, Deserializer, Serialize};

use crate::cache::SelectionState;
use crate::error::ClientError;
use crate::models::SeatNumber;

/// Максимум мест в одной транзакции бронирования.
pub const MAX_SEATS_PER_BOOKING: usize = 7;

// POST /bookings/book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    #[serde(rename = "numberOfSeats")]
    number_of_seats: u8,
}

impl BookingRequest {
    pub fn new(count: i64) -> Result<Self, ClientError> {
        if count <= 0 {
            return Err(ClientError::InvalidRequest(
                "Please enter a valid number of seats".to_string(),
            ));
        }
        if count > MAX_SEATS_PER_BOOKING as i64 {
            return Err(ClientError::InvalidRequest(format!(
                "You can only book up to {} seats at a time",
                MAX_SEATS_PER_BOOKING
            )));
        }
        Ok(Self { number_of_seats: count as u8 })
    }

    /// Разбирает сырое значение поля "Number of Seats".
    pub fn from_input(raw: &str) -> Result<Self, ClientError> {
        let count = raw.trim().parse::<i64>().map_err(|_| {
            ClientError::InvalidRequest("Please enter a valid number of seats".to_string())
        })?;
        Self::new(count)
    }

    /// Запрос на столько мест, сколько выбрано. Какие именно места выдать, решает сервис.
    pub fn from_selection(selection: &SelectionState) -> Result<Self, ClientError> {
        Self::new(selection.len() as i64)
    }

    pub fn number_of_seats(&self) -> usize {
        self.number_of_seats as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookedSeat {
    #[serde(rename = "seatNumber", alias = "seat_number")]
    pub seat_number: SeatNumber,
}

/// Успешный ответ `POST /bookings/book`. Клиентом не хранится, только показывается.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingResult {
    #[serde(rename = "bookingId", alias = "booking_id", deserialize_with = "string_or_number")]
    pub booking_id: String,
    pub seats: Vec<BookedSeat>,
}

impl BookingResult {
    pub fn seat_numbers(&self) -> impl Iterator<Item = SeatNumber> + '_ {
        self.seats.iter().map(|s| s.seat_number)
    }

    pub fn summary(&self) -> String {
        let seats = self
            .seat_numbers()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Booking successful! Booking ID: {}\nSeats: {}", self.booking_id, seats)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
