use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Номер места в зале. Нумерация начинается с 1, ноль недопустим.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SeatNumber(u32);

impl SeatNumber {
    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(SeatNumber(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for SeatNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = u32::deserialize(deserializer)?;
        SeatNumber::new(n).ok_or_else(|| serde::de::Error::custom("seat number must be positive"))
    }
}

/// Место в снимке инвентаря, полученном от `GET /bookings/seats`.
///
/// Сервис отдаёт поля то в camelCase, то в snake_case, поэтому принимаем оба варианта.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    #[serde(rename = "seatNumber", alias = "seat_number")]
    pub seat_number: SeatNumber,
    #[serde(rename = "isBooked", alias = "is_booked", default)]
    pub is_booked: bool,
}

impl Seat {
    pub fn new(seat_number: SeatNumber, is_booked: bool) -> Self {
        Self { seat_number, is_booked }
    }
}

/// Состояние места с точки зрения пользователя.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}
