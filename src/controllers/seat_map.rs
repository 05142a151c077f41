use std::fmt;

use crate::cache::{SeatInventory, SelectionState};
use crate::models::{SeatNumber, SeatStatus};

pub const SEATS_PER_ROW: u32 = 7;

// В последнем ряду показываются только первые три позиции
const LAST_ROW_WIDTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCell {
    pub number: SeatNumber,
    pub status: SeatStatus,
}

impl SeatCell {
    /// Кнопка забронированного места неактивна.
    pub fn is_clickable(&self) -> bool {
        self.status != SeatStatus::Booked
    }
}

/// Схема зала по рядам для отображения.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    pub rows: Vec<Vec<SeatCell>>,
}

impl SeatMap {
    pub fn build(inventory: &SeatInventory, selection: &SelectionState) -> Self {
        let total = inventory.total_seats();
        let last_row = total.saturating_sub(1) / SEATS_PER_ROW;

        let mut rows: Vec<Vec<SeatCell>> = Vec::new();
        for number in inventory.seat_numbers() {
            let index = number.get() - 1;
            let row = index / SEATS_PER_ROW;
            if row == last_row && index % SEATS_PER_ROW >= LAST_ROW_WIDTH {
                continue;
            }
            if rows.len() <= row as usize {
                rows.push(Vec::new());
            }
            rows[row as usize].push(SeatCell {
                number,
                status: inventory.status(number, selection),
            });
        }

        Self { rows }
    }

    pub fn cells(&self) -> impl Iterator<Item = &SeatCell> {
        self.rows.iter().flatten()
    }

    pub fn cell(&self, number: SeatNumber) -> Option<&SeatCell> {
        self.cells().find(|c| c.number == number)
    }
}

impl fmt::Display for SeatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line = row
                .iter()
                .map(|cell| match cell.status {
                    SeatStatus::Available => format!(" {:>2} ", cell.number),
                    SeatStatus::Selected => format!("[{:>2}]", cell.number),
                    SeatStatus::Booked => " XX ".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        write!(f, "legend:  n  available   [n] selected   XX booked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Seat;

    fn n(v: u32) -> SeatNumber {
        SeatNumber::new(v).unwrap()
    }

    #[test]
    fn reference_venue_renders_every_seat() {
        let inventory = SeatInventory::new(71);
        let map = SeatMap::build(&inventory, &SelectionState::default());

        assert_eq!(map.rows.len(), 11);
        assert!(map.rows[..10].iter().all(|r| r.len() == 7));
        assert_eq!(map.rows[10].len(), 1);
        assert_eq!(map.cells().count(), 71);
    }

    #[test]
    fn last_row_shows_at_most_three() {
        let inventory = SeatInventory::new(12);
        let map = SeatMap::build(&inventory, &SelectionState::default());
        assert_eq!(map.rows[1].iter().map(|c| c.number.get()).collect::<Vec<_>>(), vec![8, 9, 10]);
    }

    #[test]
    fn statuses_follow_inventory_and_selection() {
        let mut inventory = SeatInventory::new(71);
        inventory.replace(vec![Seat::new(n(2), true)]);
        let mut selection = SelectionState::default();
        selection.toggle(n(3)).unwrap();

        let map = SeatMap::build(&inventory, &selection);
        assert!(!map.cell(n(2)).unwrap().is_clickable());
        assert_eq!(map.cell(n(3)).unwrap().status, SeatStatus::Selected);
        assert_eq!(map.cell(n(4)).unwrap().status, SeatStatus::Available);

        let text = map.to_string();
        assert!(text.starts_with("  1   XX  [ 3]"));
    }
}
