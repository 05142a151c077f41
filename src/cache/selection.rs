use crate::cache::SeatInventory;
use crate::error::ClientError;
use crate::models::{SeatNumber, MAX_SEATS_PER_BOOKING};

/// Что произошло с местом после `toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Выбранные, но ещё не отправленные места.
///
/// Статус бронирования здесь не проверяется - это обязанность вызывающего,
/// который сверяется с `SeatInventory` перед `toggle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    // Порядок нужен только для отображения
    seats: Vec<SeatNumber>,
}

impl SelectionState {
    pub fn toggle(&mut self, seat: SeatNumber) -> Result<Toggled, ClientError> {
        if let Some(pos) = self.seats.iter().position(|s| *s == seat) {
            self.seats.remove(pos);
            return Ok(Toggled::Removed);
        }
        if self.seats.len() >= MAX_SEATS_PER_BOOKING {
            return Err(ClientError::SelectionLimitExceeded {
                limit: MAX_SEATS_PER_BOOKING,
            });
        }
        self.seats.push(seat);
        Ok(Toggled::Added)
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    /// Убирает места, которые сервис теперь считает забронированными.
    /// Возвращает снятые места.
    pub fn retain_available(&mut self, inventory: &SeatInventory) -> Vec<SeatNumber> {
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.seats)
            .into_iter()
            .partition(|s| !inventory.is_booked(*s));
        self.seats = kept;
        dropped
    }

    pub fn contains(&self, seat: SeatNumber) -> bool {
        self.seats.contains(&seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[SeatNumber] {
        &self.seats
    }
}
