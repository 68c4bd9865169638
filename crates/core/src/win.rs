//! Win module - line detection and the tier ladder
//!
//! Ladder rules, applied after every draw:
//! - at least one complete line: `OneLine`
//! - at least two complete lines: `TwoLines`
//! - all 25 cells marked: `FullHouse`, or `Jackpot` when reached at or before
//!   the jackpot threshold
//!
//! Every rule only fires for a tier that is not already set, so re-evaluating
//! an unchanged ticket never reports a tier twice. Tiers are independent of
//! each other: a single draw completing two lines reports both `OneLine` and
//! `TwoLines`.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::ticket::Ticket;
use crate::types::{Cell, Outcome, WinTier, CELL_COUNT, FREE_INDEX, GRID_SIZE};

/// Bitmask over ticket slots (bit `i` = slot `i`).
pub type CellMask = u32;

/// Every slot set.
pub const FULL_MASK: CellMask = (1 << CELL_COUNT) - 1;

/// The 12 winning lines: 5 rows, 5 columns, 2 diagonals.
pub const LINES: [[usize; GRID_SIZE]; 12] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
    [0, 6, 12, 18, 24],
    [4, 8, 12, 16, 20],
];

const fn line_mask(line: [usize; GRID_SIZE]) -> CellMask {
    let mut mask = 0;
    let mut i = 0;
    while i < GRID_SIZE {
        mask |= 1 << line[i];
        i += 1;
    }
    mask
}

const LINE_MASKS: [CellMask; 12] = {
    let mut masks = [0; 12];
    let mut i = 0;
    while i < LINES.len() {
        masks[i] = line_mask(LINES[i]);
        i += 1;
    }
    masks
};

/// Slots marked on `ticket` given the drawn-item mask. The free cell is
/// always marked.
pub fn marked_mask(ticket: &Ticket, drawn_mask: u64) -> CellMask {
    let mut mask: CellMask = 1 << FREE_INDEX;
    for (idx, cell) in ticket.cells().iter().enumerate() {
        if let Cell::Item(item) = cell {
            if drawn_mask & (1u64 << item.index()) != 0 {
                mask |= 1 << idx;
            }
        }
    }
    mask
}

/// Complete lines in `marked` and the union of their slots.
pub fn complete_lines(marked: CellMask) -> (u8, CellMask) {
    LINE_MASKS
        .iter()
        .filter(|&&line| marked & line == line)
        .fold((0, 0), |(count, union), &line| (count + 1, union | line))
}

/// Tiers reached this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierFlags {
    pub one_line: bool,
    pub two_lines: bool,
    pub full_house: bool,
    /// Implies `full_house`.
    pub jackpot: bool,
}

impl TierFlags {
    pub fn highest(&self) -> WinTier {
        if self.jackpot {
            WinTier::Jackpot
        } else if self.full_house {
            WinTier::FullHouse
        } else if self.two_lines {
            WinTier::TwoLines
        } else if self.one_line {
            WinTier::OneLine
        } else {
            WinTier::None
        }
    }

    pub fn any(&self) -> bool {
        self.highest() != WinTier::None
    }

    pub fn contains(&self, tier: WinTier) -> bool {
        match tier {
            WinTier::None => true,
            WinTier::OneLine => self.one_line,
            WinTier::TwoLines => self.two_lines,
            WinTier::FullHouse => self.full_house,
            WinTier::Jackpot => self.jackpot,
        }
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub won_lines: u8,
    pub marked_mask: CellMask,
    /// Union of all complete lines (for highlighting).
    pub winning_mask: CellMask,
    /// Tiers first reached by this evaluation, lowest first.
    pub newly_achieved: ArrayVec<WinTier, 4>,
    /// Set when the session must end after this evaluation.
    pub outcome: Option<Outcome>,
}

impl Evaluation {
    pub fn marked_count(&self) -> u32 {
        self.marked_mask.count_ones()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        index < CELL_COUNT && self.marked_mask & (1 << index) != 0
    }

    pub fn is_winning(&self, index: usize) -> bool {
        index < CELL_COUNT && self.winning_mask & (1 << index) != 0
    }
}

#[derive(Debug, Clone)]
pub struct WinEvaluator {
    flags: TierFlags,
    jackpot_threshold: u32,
    max_draws: u32,
}

impl WinEvaluator {
    pub fn new(jackpot_threshold: u32, max_draws: u32) -> Self {
        Self {
            flags: TierFlags::default(),
            jackpot_threshold,
            max_draws,
        }
    }

    pub fn flags(&self) -> TierFlags {
        self.flags
    }

    pub(crate) fn reset(&mut self) {
        self.flags = TierFlags::default();
    }

    /// Re-evaluate the ticket against the drawn items.
    pub fn evaluate(&mut self, ticket: &Ticket, drawn_mask: u64, draw_count: u32) -> Evaluation {
        let marked = marked_mask(ticket, drawn_mask);
        let (won_lines, winning_mask) = complete_lines(marked);
        let mut newly = ArrayVec::new();

        if won_lines >= 1 && !self.flags.one_line {
            self.flags.one_line = true;
            newly.push(WinTier::OneLine);
        }
        if won_lines >= 2 && !self.flags.two_lines {
            self.flags.two_lines = true;
            newly.push(WinTier::TwoLines);
        }
        if marked == FULL_MASK && !self.flags.full_house {
            self.flags.full_house = true;
            if draw_count <= self.jackpot_threshold {
                self.flags.jackpot = true;
                newly.push(WinTier::Jackpot);
            } else {
                newly.push(WinTier::FullHouse);
            }
        }

        let outcome = if self.flags.full_house {
            Some(Outcome::Win(self.flags.highest()))
        } else if draw_count >= self.max_draws {
            if self.flags.any() {
                Some(Outcome::Win(self.flags.highest()))
            } else {
                Some(Outcome::Loss)
            }
        } else {
            None
        };

        Evaluation {
            won_lines,
            marked_mask: marked,
            winning_mask,
            newly_achieved: newly,
            outcome,
        }
    }
}
