//! Integration tests for the session lifecycle

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use garden_bingo::core::{
    Clock, GameConfig, GameError, GameEvent, GameStateMachine, KeyValueStore, ManualClock,
    MemoryStore, RandomSource,
};
use garden_bingo::types::{Item, Outcome, Phase, WinTier, CATALOG_SIZE, RESET_WINDOW_MS};

const T0: u64 = 1_700_000_000_000;

/// Plays back queued indices; falls back to 0 when the queue is empty.
///
/// With an empty queue the dealt ticket holds catalog items 0..24 in slot
/// order (slot 12 is free, so slot `s > 12` holds item `s - 1`).
#[derive(Clone, Default)]
struct ScriptedRng {
    queue: Rc<RefCell<VecDeque<u32>>>,
}

impl RandomSource for ScriptedRng {
    fn next_range(&mut self, max: u32) -> u32 {
        self.queue.borrow_mut().pop_front().unwrap_or(0) % max
    }
}

type Machine = GameStateMachine<MemoryStore, ManualClock, ScriptedRng>;

struct Harness {
    game: Machine,
    clock: ManualClock,
    script: ScriptedRng,
}

impl Harness {
    fn new(config: GameConfig) -> Self {
        Self::with_store(config, MemoryStore::new())
    }

    fn with_store(config: GameConfig, store: MemoryStore) -> Self {
        let clock = ManualClock::new(T0);
        let script = ScriptedRng::default();
        let game = GameStateMachine::new(config, store, clock.clone(), script.clone()).unwrap();
        Self {
            game,
            clock,
            script,
        }
    }

    /// Make the next draw produce `item`.
    fn draw(&mut self, item: usize) -> Vec<GameEvent> {
        let item = Item::from_index(item).unwrap();
        let pos = self
            .game
            .draws()
            .pool()
            .iter()
            .position(|&i| i == item)
            .expect("item already drawn");
        self.script.queue.borrow_mut().push_back(pos as u32);
        assert_eq!(self.game.draw_next().unwrap(), item);
        self.game.take_events()
    }

    fn draw_all(&mut self, items: impl IntoIterator<Item = usize>) -> Vec<GameEvent> {
        items.into_iter().flat_map(|i| self.draw(i)).collect()
    }

    fn clock_elapsed(&self) -> u64 {
        self.clock.now_ms() - T0
    }

    fn end_cooldown(&mut self) {
        self.clock.advance(self.game.config().cooldown());
        self.game.tick().unwrap();
        assert_eq!(self.game.phase(), Phase::Idle);
        self.game.take_events();
    }
}

fn tiers(events: &[GameEvent]) -> Vec<WinTier> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TierAchieved { tier } => Some(*tier),
            _ => None,
        })
        .collect()
}

fn ticket_items() -> std::ops::Range<usize> {
    0..24
}

fn non_ticket_items() -> std::ops::Range<usize> {
    24..CATALOG_SIZE
}

#[test]
fn scripted_deal_is_the_ordered_ticket() {
    let mut h = Harness::new(GameConfig::default());
    let ticket = h.game.deal().unwrap();
    let items: Vec<usize> = ticket.items().map(|i| i.index()).collect();
    assert_eq!(items, ticket_items().collect::<Vec<_>>());
}

#[test]
fn first_row_fires_one_line_once() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    h.game.take_events();

    let events = h.draw_all(0..4);
    assert!(tiers(&events).is_empty());

    let events = h.draw(4);
    assert_eq!(tiers(&events), vec![WinTier::OneLine]);
    assert_eq!(h.game.phase(), Phase::Drawing);
    assert!(h.game.tiers().one_line);

    // Later draws do not re-fire the tier.
    let events = h.draw_all(non_ticket_items().take(5));
    assert!(tiers(&events).is_empty());
}

#[test]
fn free_cell_counts_towards_the_middle_row() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    // Row 2 is slots 10, 11, (free), 13, 14 => items 10, 11, 12, 13.
    let events = h.draw_all([10, 11, 12, 13]);
    assert_eq!(tiers(&events), vec![WinTier::OneLine]);
}

#[test]
fn second_line_fires_two_lines() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    let events = h.draw_all(0..10);
    assert_eq!(tiers(&events), vec![WinTier::OneLine, WinTier::TwoLines]);
    assert_eq!(h.game.evaluation().won_lines, 2);
}

#[test]
fn early_full_house_is_a_jackpot() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    h.game.take_events();

    let events = h.draw_all(ticket_items());
    let reached = tiers(&events);
    assert_eq!(reached.last(), Some(&WinTier::Jackpot));
    assert!(!reached.contains(&WinTier::FullHouse));
    assert_eq!(h.game.phase(), Phase::SessionEnded);
    assert_eq!(h.game.outcome(), Some(Outcome::Win(WinTier::Jackpot)));
    assert_eq!(h.game.draw_count(), 24);
    assert_eq!(
        events.last(),
        Some(&GameEvent::SessionEnded {
            outcome: Outcome::Win(WinTier::Jackpot)
        })
    );
}

#[test]
fn late_full_house_is_not_a_jackpot() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    // 12 misses first: the full house lands on draw 36, past the threshold.
    h.draw_all(non_ticket_items().take(12));
    let events = h.draw_all(ticket_items());

    assert_eq!(h.game.draw_count(), 36);
    assert_eq!(tiers(&events).last(), Some(&WinTier::FullHouse));
    assert!(!h.game.tiers().jackpot);
    assert_eq!(h.game.outcome(), Some(Outcome::Win(WinTier::FullHouse)));
}

#[test]
fn full_house_on_the_threshold_draw_is_a_jackpot() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    h.draw_all(non_ticket_items().take(11));
    h.draw_all(ticket_items());
    assert_eq!(h.game.draw_count(), 35);
    assert_eq!(h.game.outcome(), Some(Outcome::Win(WinTier::Jackpot)));
}

#[test]
fn cap_without_a_line_is_a_loss() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();

    // Leaving these slots unmarked breaks all 12 lines:
    // (0,0) (0,1) (1,3) (2,1) (3,4) (4,2) => items 0, 1, 8, 11, 18, 21.
    let holes = [0, 1, 8, 11, 18, 21];
    h.draw_all(non_ticket_items());
    let events = h.draw_all(ticket_items().filter(|i| !holes.contains(i)));

    assert_eq!(h.game.draw_count(), 45);
    assert!(tiers(&events).is_empty());
    assert_eq!(h.game.phase(), Phase::SessionEnded);
    assert_eq!(h.game.outcome(), Some(Outcome::Loss));
    assert_eq!(
        events.last(),
        Some(&GameEvent::SessionEnded {
            outcome: Outcome::Loss
        })
    );
}

#[test]
fn cap_after_a_line_keeps_the_win() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    h.draw_all(0..5);
    h.draw_all(non_ticket_items());
    // 32 draws so far; 13 more without a second line. Unmarked slots
    // 5, 8, 9, 11, 17 and 24 break every other row, column and diagonal.
    h.draw_all([6, 7, 10, 12, 13, 14, 15, 17, 18, 19, 20, 21, 22]);

    assert_eq!(h.game.draw_count(), 45);
    assert_eq!(h.game.outcome(), Some(Outcome::Win(WinTier::OneLine)));
}

#[test]
fn draws_after_the_session_ends_are_rejected() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    h.draw_all(ticket_items());
    assert_eq!(h.game.phase(), Phase::SessionEnded);

    let count = h.game.draw_count();
    assert!(matches!(
        h.game.draw_next(),
        Err(GameError::InvalidState {
            phase: Phase::SessionEnded,
            ..
        })
    ));
    assert!(matches!(h.game.deal(), Err(GameError::InvalidState { .. })));
    assert_eq!(h.game.draw_count(), count);
    assert_eq!(h.game.allowance().tickets_remaining, 9);
}

#[test]
fn pool_and_history_always_partition_the_catalog() {
    let mut h = Harness::new(GameConfig::default());
    h.game.deal().unwrap();
    for item in (0..CATALOG_SIZE).rev() {
        if h.game.phase() == Phase::SessionEnded {
            break;
        }
        h.draw(item);
        let draws = h.game.draws();
        assert_eq!(draws.pool().len() + draws.history().len(), CATALOG_SIZE);
        assert!(draws.history().iter().all(|i| !draws.pool().contains(i)));
    }
}

#[test]
fn last_ticket_then_countdown() {
    let config = GameConfig {
        daily_grant: 1,
        ..GameConfig::default()
    };
    let mut h = Harness::new(config);
    assert_eq!(h.game.allowance().tickets_remaining, 1);

    h.game.deal().unwrap();
    assert_eq!(h.game.allowance().tickets_remaining, 0);
    h.draw_all(ticket_items());
    h.end_cooldown();

    let err = h.game.deal().unwrap_err();
    let GameError::NoTicketsAvailable { resets_in } = err else {
        panic!("expected NoTicketsAvailable, got {err:?}");
    };
    let elapsed = h.clock_elapsed();
    assert_eq!(resets_in, Duration::from_millis(RESET_WINDOW_MS - elapsed));
    assert_eq!(h.game.phase(), Phase::Idle);
    assert!(h
        .game
        .take_events()
        .contains(&GameEvent::CountdownTick { remaining: resets_in }));

    // Refill once the window has fully elapsed.
    h.clock.set(T0 + RESET_WINDOW_MS);
    h.game.tick().unwrap();
    assert_eq!(h.game.allowance().tickets_remaining, 1);
    assert!(h.game.take_events().contains(&GameEvent::AllowanceChanged {
        tickets_remaining: 1
    }));
    h.game.deal().unwrap();
}

#[test]
fn interrupted_session_resumes_without_refund() {
    let mut h = Harness::new(GameConfig::default());
    let ticket = h.game.deal().unwrap();
    h.draw_all([30, 0, 1]);
    let history = h.game.draws().history().to_vec();

    // "Restart" with the saved store.
    let store = h.game.store().clone();
    let mut resumed = Harness::with_store(GameConfig::default(), store);
    assert!(resumed.game.resume().unwrap());
    assert_eq!(resumed.game.phase(), Phase::Drawing);
    assert_eq!(resumed.game.ticket(), Some(&ticket));
    assert_eq!(resumed.game.draws().history(), history.as_slice());
    assert_eq!(resumed.game.allowance().tickets_remaining, 9);

    // Play continues from where it stopped.
    let events = resumed.draw_all(2..5);
    assert_eq!(tiers(&events), vec![WinTier::OneLine]);
}

#[test]
fn corrupt_saved_session_is_discarded() {
    let mut store = MemoryStore::new();
    store.set("bingo.ticket", "not,a,ticket".to_string()).unwrap();
    store.set("bingo.draw_count", "3".to_string()).unwrap();

    let mut h = Harness::with_store(GameConfig::default(), store);
    assert!(!h.game.resume().unwrap());
    assert_eq!(h.game.phase(), Phase::Idle);
    assert_eq!(h.game.store().get("bingo.ticket"), None);
    assert_eq!(h.game.store().get("bingo.draw_count"), None);
}
