//! Draw module - sequential draws without replacement
//!
//! The engine keeps the undrawn pool and the ordered draw history side by
//! side; an item moves from one to the other exactly once per session, so
//! `pool.len() + history.len() == CATALOG_SIZE` holds after every call.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::rng::RandomSource;
use crate::types::{Item, CATALOG_SIZE};

#[derive(Debug, Clone)]
pub struct DrawEngine {
    pool: ArrayVec<Item, CATALOG_SIZE>,
    history: ArrayVec<Item, CATALOG_SIZE>,
    /// Bit `i` set when catalog item `i` has been drawn.
    drawn_mask: u64,
    max_draws: u32,
}

impl DrawEngine {
    pub fn new(max_draws: u32) -> Self {
        Self {
            pool: Item::all().collect(),
            history: ArrayVec::new(),
            drawn_mask: 0,
            max_draws,
        }
    }

    /// Draw one item uniformly from the remaining pool.
    pub fn draw<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Item, GameError> {
        if self.pool.is_empty() {
            return Err(GameError::PoolExhausted);
        }
        if self.draw_count() >= self.max_draws {
            return Err(GameError::CapReached {
                max_draws: self.max_draws,
            });
        }

        let idx = rng.next_range(self.pool.len() as u32) as usize;
        let item = self.pool.swap_remove(idx);
        self.history.push(item);
        self.drawn_mask |= 1u64 << item.index();

        log::debug!("draw #{}: {}", self.history.len(), item);
        Ok(item)
    }

    /// Return every item to the pool and clear the history.
    pub(crate) fn reset(&mut self) {
        self.pool = Item::all().collect();
        self.history.clear();
        self.drawn_mask = 0;
    }

    /// Rebuild the engine from a saved draw history.
    ///
    /// Returns `None` if the history repeats an item or exceeds the cap.
    pub(crate) fn restore(max_draws: u32, history: &[Item]) -> Option<Self> {
        if history.len() > max_draws as usize {
            return None;
        }
        let mut engine = Self::new(max_draws);
        for &item in history {
            if engine.is_drawn(item) {
                return None;
            }
            engine.drawn_mask |= 1u64 << item.index();
            engine.history.push(item);
        }
        let mask = engine.drawn_mask;
        engine.pool.retain(|item| mask & (1u64 << item.index()) == 0);
        Some(engine)
    }

    pub fn is_drawn(&self, item: Item) -> bool {
        self.drawn_mask & (1u64 << item.index()) != 0
    }

    pub fn drawn_mask(&self) -> u64 {
        self.drawn_mask
    }

    /// Items still available, in no particular order.
    pub fn pool(&self) -> &[Item] {
        &self.pool
    }

    /// Items drawn this session, in draw order.
    pub fn history(&self) -> &[Item] {
        &self.history
    }

    pub fn last_drawn(&self) -> Option<Item> {
        self.history.last().copied()
    }

    pub fn draw_count(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn cap_reached(&self) -> bool {
        self.draw_count() >= self.max_draws
    }

    /// Persisted form of the history: comma-separated names in draw order.
    pub fn encode_history(&self) -> String {
        let names: Vec<&str> = self.history.iter().map(|i| i.name()).collect();
        names.join(",")
    }

    /// Parse a persisted history. An empty string is an empty history.
    pub fn decode_history(s: &str) -> Option<Vec<Item>> {
        if s.trim().is_empty() {
            return Some(Vec::new());
        }
        s.split(',').map(Item::from_name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;
    use std::collections::HashSet;

    #[test]
    fn draws_never_repeat_and_conserve_items() {
        let mut rng = SimpleRng::new(12345);
        let mut engine = DrawEngine::new(CATALOG_SIZE as u32);
        let mut seen = HashSet::new();

        for n in 1..=CATALOG_SIZE {
            let item = engine.draw(&mut rng).unwrap();
            assert!(seen.insert(item), "{item} drawn twice");
            assert_eq!(engine.draw_count() as usize, n);
            assert_eq!(engine.pool().len() + engine.history().len(), CATALOG_SIZE);
            assert!(!engine.pool().contains(&item));
            assert!(engine.is_drawn(item));
        }
    }

    #[test]
    fn cap_is_enforced() {
        let mut rng = SimpleRng::new(1);
        let mut engine = DrawEngine::new(3);
        for _ in 0..3 {
            engine.draw(&mut rng).unwrap();
        }
        assert!(engine.cap_reached());
        assert!(matches!(
            engine.draw(&mut rng),
            Err(GameError::CapReached { max_draws: 3 })
        ));
        assert_eq!(engine.draw_count(), 3);
    }

    #[test]
    fn exhausted_pool_fails_loudly() {
        let mut rng = SimpleRng::new(1);
        let mut engine = DrawEngine::new(60);
        for _ in 0..CATALOG_SIZE {
            engine.draw(&mut rng).unwrap();
        }
        assert!(matches!(engine.draw(&mut rng), Err(GameError::PoolExhausted)));
    }

    #[test]
    fn reset_restores_full_pool() {
        let mut rng = SimpleRng::new(5);
        let mut engine = DrawEngine::new(45);
        for _ in 0..10 {
            engine.draw(&mut rng).unwrap();
        }
        engine.reset();
        assert_eq!(engine.pool().len(), CATALOG_SIZE);
        assert!(engine.history().is_empty());
        assert_eq!(engine.draw_count(), 0);
        assert_eq!(engine.drawn_mask(), 0);
    }

    #[test]
    fn restore_rebuilds_pool() {
        let mut rng = SimpleRng::new(8);
        let mut engine = DrawEngine::new(45);
        for _ in 0..12 {
            engine.draw(&mut rng).unwrap();
        }

        let history = DrawEngine::decode_history(&engine.encode_history()).unwrap();
        let restored = DrawEngine::restore(45, &history).unwrap();
        assert_eq!(restored.history(), engine.history());
        assert_eq!(restored.drawn_mask(), engine.drawn_mask());
        assert_eq!(restored.pool().len(), CATALOG_SIZE - 12);
    }

    #[test]
    fn restore_rejects_duplicates_and_overflow() {
        let apple = Item::from_name("apple").unwrap();
        assert!(DrawEngine::restore(45, &[apple, apple]).is_none());

        let many: Vec<Item> = Item::all().take(5).collect();
        assert!(DrawEngine::restore(4, &many).is_none());
    }

    #[test]
    fn decode_history_handles_empty_and_garbage() {
        assert_eq!(DrawEngine::decode_history(""), Some(Vec::new()));
        assert!(DrawEngine::decode_history("apple,???").is_none());
    }
}
