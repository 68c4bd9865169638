//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no I/O, making them usable in any context
//! (engine logic, terminal rendering, persistence).
//!
//! # Ticket Layout
//!
//! A ticket is a 5x5 grid stored row-major:
//!
//! - **Cells**: 25 slots, indexed 0-24
//! - **Free cell**: slot 12 (the centre), always marked
//! - **Items**: the other 24 slots hold distinct catalog items
//!
//! # Tunable Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MAX_DRAWS` | 45 | Draw cap per session |
//! | `DEFAULT_JACKPOT_THRESHOLD` | 35 | Full house at or before this draw is a jackpot |
//! | `DEFAULT_DAILY_GRANT` | 10 | Tickets granted per refill |
//! | `RESET_WINDOW_MS` | 86 400 000 | Rolling refill window (24h) |
//! | `DEFAULT_COOLDOWN_MS` | 3000 | Delay between session end and the next deal |
//! | `DEFAULT_DRAW_DELAY_MS` | 500 | Presentation delay before a draw applies |
//! | `DEFAULT_DEBOUNCE_MS` | 300 | Minimum spacing between user actions |
//! | `COUNTDOWN_TICK_MS` | 1000 | Allowance countdown cadence |
//!
//! # Examples
//!
//! ```
//! use garden_bingo_types::{GameAction, Item, WinTier, CATALOG_SIZE};
//!
//! let apple = Item::from_name("Apple").unwrap();
//! assert_eq!(apple.name(), "apple");
//! assert_eq!(Item::all().count(), CATALOG_SIZE);
//!
//! assert!(WinTier::Jackpot > WinTier::FullHouse);
//! assert_eq!(GameAction::from_str("deal"), Some(GameAction::Deal));
//! ```

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Ticket side length (5 rows, 5 columns)
pub const GRID_SIZE: usize = 5;

/// Total cells on a ticket
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Index of the free centre cell
pub const FREE_INDEX: usize = 12;

/// Number of catalog items placed on a ticket
pub const TICKET_ITEMS: usize = CELL_COUNT - 1;

/// Number of distinct drawable items
pub const CATALOG_SIZE: usize = 51;

/// Token used for the free cell in persisted and displayed tickets
pub const FREE_CELL_TOKEN: &str = "free-star";

/// Draw cap per session.
pub const DEFAULT_MAX_DRAWS: u32 = 45;

/// A full house reached at or before this draw count pays the jackpot.
pub const DEFAULT_JACKPOT_THRESHOLD: u32 = 35;

/// Tickets granted on every allowance refill.
pub const DEFAULT_DAILY_GRANT: u32 = 10;

/// Rolling allowance window (24 hours).
pub const RESET_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

/// Delay between a session ending and the machine accepting a new deal.
pub const DEFAULT_COOLDOWN_MS: u64 = 3_000;

/// Presentation delay between a draw request and the logical draw.
pub const DEFAULT_DRAW_DELAY_MS: u64 = 500;

/// Minimum spacing between two accepted user actions.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Cadence of the allowance countdown tick.
pub const COUNTDOWN_TICK_MS: u64 = 1_000;

/// The garden catalog, in canonical order.
pub const CATALOG: [&str; CATALOG_SIZE] = [
    "almond",
    "apple",
    "apricot",
    "avocado",
    "banana",
    "beans",
    "beetroot",
    "blueberry",
    "broccoli",
    "cabbage",
    "carrot",
    "cauliflower",
    "cherry",
    "chili",
    "coconut",
    "corn",
    "cucumber",
    "currant",
    "eggplant",
    "fig",
    "garlic",
    "grapefruit",
    "grapes",
    "hazelnut",
    "kiwi",
    "lemon",
    "lettuce",
    "lime",
    "mango",
    "melon",
    "olive",
    "onion",
    "orange",
    "peach",
    "peanut",
    "pear",
    "peas",
    "pepper",
    "pineapple",
    "pistachio",
    "plum",
    "pomegranate",
    "potato",
    "pumpkin",
    "radish",
    "raspberry",
    "strawberry",
    "tomato",
    "turnip",
    "walnut",
    "watermelon",
];

/// A drawable catalog item.
///
/// Items are identified by their catalog index; the name is only used for
/// display and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item(u8);

impl Item {
    /// Look up an item by catalog index.
    ///
    /// # Examples
    ///
    /// ```
    /// use garden_bingo_types::Item;
    ///
    /// assert_eq!(Item::from_index(0).map(|i| i.name()), Some("almond"));
    /// assert_eq!(Item::from_index(51), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        if index < CATALOG_SIZE {
            Some(Item(index as u8))
        } else {
            None
        }
    }

    /// Parse an item from its name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        CATALOG
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|i| Item(i as u8))
    }

    /// Whether `name` is a catalog item.
    pub fn contains(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Every catalog item in canonical order.
    pub fn all() -> impl Iterator<Item = Item> {
        (0..CATALOG_SIZE as u8).map(Item)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn name(&self) -> &'static str {
        CATALOG[self.0 as usize]
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Item::from_name(&name).ok_or_else(|| de::Error::custom(format!("unknown item: {name}")))
    }
}

/// A ticket slot.
///
/// - `Free`: the pre-marked centre cell
/// - `Item(item)`: marked once `item` has been drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Free,
    Item(Item),
}

impl Cell {
    /// Parse a cell token (`free-star` or an item name).
    pub fn from_token(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case(FREE_CELL_TOKEN) {
            Some(Cell::Free)
        } else {
            Item::from_name(s).map(Cell::Item)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cell::Free => FREE_CELL_TOKEN,
            Cell::Item(item) => item.name(),
        }
    }

    pub fn item(&self) -> Option<Item> {
        match self {
            Cell::Free => None,
            Cell::Item(item) => Some(*item),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The win ladder.
///
/// Ordered so that a higher tier compares greater:
/// `None < OneLine < TwoLines < FullHouse < Jackpot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    None,
    OneLine,
    TwoLines,
    FullHouse,
    Jackpot,
}

impl WinTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinTier::None => "none",
            WinTier::OneLine => "one line",
            WinTier::TwoLines => "two lines",
            WinTier::FullHouse => "full house",
            WinTier::Jackpot => "jackpot",
        }
    }

    /// Whether reaching this tier ends the session immediately.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WinTier::FullHouse | WinTier::Jackpot)
    }
}

impl fmt::Display for WinTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win(WinTier),
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(tier) => write!(f, "win ({tier})"),
            Outcome::Loss => f.write_str("loss"),
        }
    }
}

/// Session lifecycle.
///
/// `Idle -> Dealt -> Drawing -> SessionEnded -> Idle` (after the cooldown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No active ticket, awaiting a deal
    Idle,
    /// Ticket assigned, no draws yet
    Dealt,
    /// At least one draw, no terminal outcome yet
    Drawing,
    /// Session over; waiting for the cooldown
    SessionEnded,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dealt => "dealt",
            Phase::Drawing => "drawing",
            Phase::SessionEnded => "session_ended",
        }
    }

    /// Whether `draw_next` is allowed in this phase.
    pub fn can_draw(&self) -> bool {
        matches!(self, Phase::Dealt | Phase::Drawing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player actions that can be applied to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Deal a new ticket (consumes one allowance unit)
    Deal,
    /// Draw the next item
    Draw,
    /// Single-button action: deal when idle, draw otherwise
    Primary,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use garden_bingo_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("Deal"), Some(GameAction::Deal));
    /// assert_eq!(GameAction::from_str("play"), Some(GameAction::Draw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deal" => Some(GameAction::Deal),
            "draw" | "play" => Some(GameAction::Draw),
            "primary" => Some(GameAction::Primary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Deal => "deal",
            GameAction::Draw => "draw",
            GameAction::Primary => "primary",
        }
    }

    /// Resolve `Primary` against the current phase.
    pub fn resolve(self, phase: Phase) -> Self {
        match self {
            GameAction::Primary if phase == Phase::Idle => GameAction::Deal,
            GameAction::Primary => GameAction::Draw,
            other => other,
        }
    }
}
