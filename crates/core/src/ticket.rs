//! Ticket module - the player's 5x5 card
//!
//! A ticket holds 24 distinct catalog items plus the free centre cell.
//! Generation samples without replacement (a partial Fisher-Yates over the
//! catalog), so every ticket is an independent, uniform draw given the RNG.

use arrayvec::ArrayVec;

use crate::rng::RandomSource;
use crate::types::{Cell, Item, CATALOG_SIZE, CELL_COUNT, FREE_INDEX, GRID_SIZE, TICKET_ITEMS};

/// A dealt ticket, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    cells: [Cell; CELL_COUNT],
}

/// Sample a new ticket.
///
/// The first 24 sampled items fill slots 0-11 and 13-24 in sample order; slot
/// 12 is always the free cell.
pub fn generate_ticket<R: RandomSource + ?Sized>(rng: &mut R) -> Ticket {
    let mut pool: ArrayVec<Item, CATALOG_SIZE> = Item::all().collect();

    for i in 0..TICKET_ITEMS {
        let j = i + rng.next_range((CATALOG_SIZE - i) as u32) as usize;
        pool.swap(i, j);
    }

    let mut cells = [Cell::Free; CELL_COUNT];
    let mut sampled = pool.iter().take(TICKET_ITEMS);
    for (idx, cell) in cells.iter_mut().enumerate() {
        if idx == FREE_INDEX {
            continue;
        }
        if let Some(&item) = sampled.next() {
            *cell = Cell::Item(item);
        }
    }

    Ticket { cells }
}

impl Ticket {
    /// Build a ticket from explicit cells, checking every ticket invariant:
    /// the free cell sits at slot 12 only and the 24 items are distinct.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Option<Self> {
        let mut seen: u64 = 0;
        for (idx, cell) in cells.iter().enumerate() {
            match (idx == FREE_INDEX, cell) {
                (true, Cell::Free) => {}
                (false, Cell::Item(item)) => {
                    let bit = 1u64 << item.index();
                    if seen & bit != 0 {
                        return None;
                    }
                    seen |= bit;
                }
                _ => return None,
            }
        }
        Some(Self { cells })
    }

    /// Build a ticket from 24 items in slot order (slot 12 excluded).
    pub fn from_items(items: &[Item]) -> Option<Self> {
        if items.len() != TICKET_ITEMS {
            return None;
        }
        let mut cells = [Cell::Free; CELL_COUNT];
        let mut it = items.iter();
        for (idx, cell) in cells.iter_mut().enumerate() {
            if idx != FREE_INDEX {
                *cell = Cell::Item(*it.next()?);
            }
        }
        Self::from_cells(cells)
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Cell at (row, col)
    pub fn at(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        self.get(row * GRID_SIZE + col)
    }

    /// Slot holding `item`, if it is on this ticket.
    pub fn index_of(&self, item: Item) -> Option<usize> {
        self.cells.iter().position(|&c| c == Cell::Item(item))
    }

    /// The 24 items in slot order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.cells.iter().filter_map(|c| c.item())
    }

    /// Persisted form: comma-separated cell tokens in slot order.
    pub fn encode(&self) -> String {
        let tokens: Vec<&str> = self.cells.iter().map(|c| c.as_str()).collect();
        tokens.join(",")
    }

    /// Parse the persisted form. Returns `None` for anything that is not a
    /// valid ticket.
    pub fn decode(s: &str) -> Option<Self> {
        let mut cells = [Cell::Free; CELL_COUNT];
        let mut count = 0usize;
        for token in s.split(',') {
            let slot = cells.get_mut(count)?;
            *slot = Cell::from_token(token)?;
            count += 1;
        }
        if count != CELL_COUNT {
            return None;
        }
        Self::from_cells(cells)
    }
}
