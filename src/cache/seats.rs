use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::api_client::BookingApi;
use crate::cache::SelectionState;
use crate::error::ClientError;
use crate::models::{Seat, SeatNumber, SeatStatus, Session};

/// Последний снимок мест, полученный от сервиса.
///
/// Кеш не авторитетен: любое изменение здесь - это отражение ответа сервиса,
/// а не догадка клиента. Места, которых нет в снимке, считаются свободными.
#[derive(Debug, Clone)]
pub struct SeatInventory {
    total_seats: u32,
    booked: BTreeMap<SeatNumber, bool>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl SeatInventory {
    pub fn new(total_seats: u32) -> Self {
        Self {
            total_seats,
            booked: BTreeMap::new(),
            refreshed_at: None,
        }
    }

    /// Заменяет снимок целиком свежими данными сервиса.
    ///
    /// При ошибке предыдущий снимок остаётся нетронутым: частичного слияния нет.
    pub async fn refresh<A: BookingApi + ?Sized>(
        &mut self,
        api: &A,
        session: Option<&Session>,
    ) -> Result<usize, ClientError> {
        match api.fetch_seats(session).await {
            Ok(seats) => {
                self.replace(seats);
                info!(
                    "Seat inventory refreshed: {} booked of {}",
                    self.booked_count(),
                    self.total_seats
                );
                Ok(self.booked.len())
            }
            Err(e) => {
                error!("Error fetching seats: {}", e);
                Err(e.into())
            }
        }
    }

    pub(crate) fn replace(&mut self, seats: Vec<Seat>) {
        let mut booked = BTreeMap::new();
        for seat in seats {
            if seat.seat_number.get() > self.total_seats {
                warn!("Seat {} is outside the venue of {} seats", seat.seat_number, self.total_seats);
            }
            booked.insert(seat.seat_number, seat.is_booked);
        }
        self.booked = booked;
        self.refreshed_at = Some(Utc::now());
    }

    /// Сбрасывает снимок (при выходе из сессии).
    pub fn clear(&mut self) {
        self.booked.clear();
        self.refreshed_at = None;
    }

    pub fn is_booked(&self, seat: SeatNumber) -> bool {
        self.booked.get(&seat).copied().unwrap_or(false)
    }

    // Забронированное место всегда важнее выбранного
    pub fn status(&self, seat: SeatNumber, selection: &SelectionState) -> SeatStatus {
        if self.is_booked(seat) {
            SeatStatus::Booked
        } else if selection.contains(seat) {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    }

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    /// Все места зала по порядку: 1..=total_seats.
    pub fn seat_numbers(&self) -> impl Iterator<Item = SeatNumber> {
        (1..=self.total_seats).filter_map(SeatNumber::new)
    }

    pub fn booked_count(&self) -> usize {
        self.booked.values().filter(|b| **b).count()
    }

    pub fn available_count(&self) -> usize {
        self.seat_numbers().filter(|n| !self.is_booked(*n)).count()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(n: u32, booked: bool) -> Seat {
        Seat::new(SeatNumber::new(n).unwrap(), booked)
    }

    fn n(v: u32) -> SeatNumber {
        SeatNumber::new(v).unwrap()
    }

    #[test]
    fn absent_seats_are_available() {
        let mut inventory = SeatInventory::new(71);
        inventory.replace(vec![seat(3, true), seat(4, false)]);

        assert!(inventory.is_booked(n(3)));
        assert!(!inventory.is_booked(n(4)));
        assert!(!inventory.is_booked(n(70)));
        assert_eq!(inventory.booked_count(), 1);
        assert_eq!(inventory.available_count(), 70);
    }

    #[test]
    fn replace_discards_previous_snapshot() {
        let mut inventory = SeatInventory::new(71);
        inventory.replace(vec![seat(1, true), seat(2, true)]);
        inventory.replace(vec![seat(2, true)]);

        assert!(!inventory.is_booked(n(1)));
        assert!(inventory.is_booked(n(2)));
    }

    #[test]
    fn booked_wins_over_selected() {
        let mut inventory = SeatInventory::new(71);
        let mut selection = SelectionState::default();
        selection.toggle(n(5)).unwrap();
        selection.toggle(n(6)).unwrap();
        inventory.replace(vec![seat(5, true)]);

        assert_eq!(inventory.status(n(5), &selection), SeatStatus::Booked);
        assert_eq!(inventory.status(n(6), &selection), SeatStatus::Selected);
        assert_eq!(inventory.status(n(7), &selection), SeatStatus::Available);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut inventory = SeatInventory::new(10);
        inventory.replace(vec![seat(1, true)]);
        assert!(inventory.is_loaded());

        inventory.clear();
        assert!(!inventory.is_loaded());
        assert!(!inventory.is_booked(n(1)));
        assert_eq!(inventory.seat_numbers().count(), 10);
    }
}
