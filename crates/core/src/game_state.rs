//! Game state module - the play session lifecycle
//!
//! This module ties together all engine components: ticket generation, the
//! draw engine, the win evaluator and the allowance clock. It owns the
//! persistence store, the clock and the random source, and reports what
//! happened through an outbox of [`GameEvent`]s.
//!
//! Lifecycle: `Idle --deal--> Dealt --draw--> Drawing --terminal--> SessionEnded
//! --cooldown--> Idle`. Actions invoked in the wrong phase are rejected with
//! [`GameError::InvalidState`] and leave the state untouched, so a duplicated
//! input can never consume two tickets or corrupt the draw pool.

use std::time::Duration;

use crate::allowance::{Allowance, AllowanceClock};
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::draw::DrawEngine;
use crate::error::{GameError, StoreError};
use crate::event::GameEvent;
use crate::rng::RandomSource;
use crate::snapshot::GameSnapshot;
use crate::store::{
    KeyValueStore, KEY_DRAWN, KEY_DRAW_COUNT, KEY_TICKET, KEY_TICKETS, SESSION_KEYS,
};
use crate::ticket::{generate_ticket, Ticket};
use crate::types::{Item, Outcome, Phase};
use crate::win::{marked_mask, Evaluation, TierFlags, WinEvaluator};

pub struct GameStateMachine<S, C, R> {
    config: GameConfig,
    store: S,
    clock: C,
    rng: R,
    allowance_clock: AllowanceClock,
    /// Last allowance read from or written to the store.
    allowance: Allowance,
    phase: Phase,
    ticket: Option<Ticket>,
    draws: DrawEngine,
    evaluator: WinEvaluator,
    last_eval: Evaluation,
    /// Ticket slot marked by the latest draw.
    last_marked: Option<usize>,
    outcome: Option<Outcome>,
    ended_at_ms: Option<u64>,
    /// Monotonic session id (increments on every deal).
    session_id: u32,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore, C: Clock, R: RandomSource> GameStateMachine<S, C, R> {
    /// Create a machine in `Idle`, refilling the allowance if its window has
    /// elapsed. `config` is expected to be validated already.
    pub fn new(config: GameConfig, mut store: S, clock: C, rng: R) -> Result<Self, GameError> {
        let allowance_clock = AllowanceClock::from_config(&config);
        let allowance = allowance_clock.check_and_refill(&mut store, clock.now_ms())?;

        Ok(Self {
            draws: DrawEngine::new(config.max_draws),
            evaluator: WinEvaluator::new(config.jackpot_threshold, config.max_draws),
            config,
            store,
            clock,
            rng,
            allowance_clock,
            allowance,
            phase: Phase::Idle,
            ticket: None,
            last_eval: Evaluation::default(),
            last_marked: None,
            outcome: None,
            ended_at_ms: None,
            session_id: 0,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub fn allowance(&self) -> Allowance {
        self.allowance
    }

    pub fn tiers(&self) -> TierFlags {
        self.evaluator.flags()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn draw_count(&self) -> u32 {
        self.draws.draw_count()
    }

    pub fn draws(&self) -> &DrawEngine {
        &self.draws
    }

    /// The most recent evaluation (marked and winning cells).
    pub fn evaluation(&self) -> &Evaluation {
        &self.last_eval
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn time_until_next_reset(&self) -> Duration {
        self.allowance_clock
            .time_until_next_reset(&self.allowance, self.clock.now_ms())
    }

    /// Remaining cooldown while `SessionEnded`, zero otherwise.
    pub fn cooldown_remaining(&self) -> Duration {
        match (self.phase, self.ended_at_ms) {
            (Phase::SessionEnded, Some(ended)) => {
                let elapsed = self.clock.now_ms().saturating_sub(ended);
                Duration::from_millis(self.config.cooldown_ms.saturating_sub(elapsed))
            }
            _ => Duration::ZERO,
        }
    }

    /// Drain the events produced since the last call, in causal order.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Restore an interrupted session saved in the store.
    ///
    /// Returns `Ok(true)` if a session was resumed. An inconsistent save is
    /// discarded and the machine stays `Idle`.
    pub fn resume(&mut self) -> Result<bool, GameError> {
        if self.phase != Phase::Idle {
            return Err(self.reject("resume"));
        }
        let Some(encoded) = self.store.get(KEY_TICKET) else {
            return Ok(false);
        };

        if self.restore_session(&encoded).is_some() {
            log::info!(
                "resumed session at draw {}/{}",
                self.draws.draw_count(),
                self.config.max_draws
            );
            return Ok(true);
        }

        log::warn!("discarding inconsistent saved session");
        self.clear_saved_session()?;
        Ok(false)
    }

    fn restore_session(&mut self, encoded: &str) -> Option<()> {
        let ticket = Ticket::decode(encoded)?;
        let history = DrawEngine::decode_history(&self.store.get(KEY_DRAWN).unwrap_or_default())?;
        let count = self.store.get(KEY_DRAW_COUNT)?.trim().parse::<u32>().ok()?;
        if count as usize != history.len() {
            return None;
        }

        let draws = DrawEngine::restore(self.config.max_draws, &history)?;
        let mut evaluator = WinEvaluator::new(self.config.jackpot_threshold, self.config.max_draws);
        let mut eval = evaluator.evaluate(&ticket, draws.drawn_mask(), draws.draw_count());
        if eval.outcome.is_some() {
            // A finished session is never saved.
            return None;
        }
        eval.newly_achieved.clear();

        self.last_marked = draws.last_drawn().and_then(|item| ticket.index_of(item));
        self.phase = if draws.draw_count() == 0 {
            Phase::Dealt
        } else {
            Phase::Drawing
        };
        self.ticket = Some(ticket);
        self.draws = draws;
        self.evaluator = evaluator;
        self.last_eval = eval;
        self.outcome = None;
        self.ended_at_ms = None;
        self.session_id = self.session_id.wrapping_add(1);
        Some(())
    }

    /// Deal a new ticket, spending one allowance unit.
    ///
    /// The spent ticket and the new session are written in one store
    /// mutation; if it fails the machine stays `Idle` with its allowance intact.
    pub fn deal(&mut self) -> Result<Ticket, GameError> {
        if self.phase != Phase::Idle {
            return Err(self.reject("deal"));
        }

        let now = self.clock.now_ms();
        let current = self.allowance_clock.check_and_refill(&mut self.store, now)?;
        self.sync_allowance(current);
        let next = match self.allowance_clock.spend(current, now) {
            Ok(next) => next,
            Err(GameError::NoTicketsAvailable { resets_in }) => {
                log::info!("deal refused: no tickets left, refill in {}s", resets_in.as_secs());
                self.events.push(GameEvent::CountdownTick {
                    remaining: resets_in,
                });
                return Err(GameError::NoTicketsAvailable { resets_in });
            }
            Err(e) => return Err(e),
        };

        let ticket = generate_ticket(&mut self.rng);
        self.store.set_many(&[
            (KEY_TICKETS, next.tickets_remaining.to_string()),
            (KEY_TICKET, ticket.encode()),
            (KEY_DRAWN, String::new()),
            (KEY_DRAW_COUNT, "0".to_string()),
        ])?;

        self.sync_allowance(next);
        self.draws.reset();
        self.evaluator.reset();
        self.last_eval = Evaluation {
            marked_mask: marked_mask(&ticket, 0),
            ..Evaluation::default()
        };
        self.last_marked = None;
        self.outcome = None;
        self.ended_at_ms = None;
        self.ticket = Some(ticket);
        self.phase = Phase::Dealt;
        self.session_id = self.session_id.wrapping_add(1);

        log::info!(
            "session {} dealt, {} tickets left",
            self.session_id,
            self.allowance.tickets_remaining
        );
        self.events.push(GameEvent::TicketDealt { ticket });
        Ok(ticket)
    }

    /// Draw the next item, mark it and re-evaluate the win ladder.
    ///
    /// The draw is computed on copies and only applied once the store has
    /// recorded it, so a failed write leaves the session as it was.
    pub fn draw_next(&mut self) -> Result<Item, GameError> {
        let ticket = match self.ticket {
            Some(ticket) if self.phase.can_draw() => ticket,
            _ => return Err(self.reject("draw")),
        };

        let mut draws = self.draws.clone();
        let item = match draws.draw(&mut self.rng) {
            Ok(item) => item,
            Err(e) => {
                // Unreachable with a valid config; end the session rather than
                // leave it stuck in `Drawing`.
                log::error!("draw failed mid-session: {e}");
                let flags = self.evaluator.flags();
                let outcome = if flags.any() {
                    Outcome::Win(flags.highest())
                } else {
                    Outcome::Loss
                };
                self.clear_saved_session()?;
                self.end_session(outcome);
                return Err(e);
            }
        };

        let mut evaluator = self.evaluator.clone();
        let eval = evaluator.evaluate(&ticket, draws.drawn_mask(), draws.draw_count());
        match eval.outcome {
            Some(_) => self.clear_saved_session()?,
            None => self.save_session(&ticket, &draws)?,
        }

        self.draws = draws;
        self.evaluator = evaluator;
        let marked_index = ticket.index_of(item);
        self.last_marked = marked_index;
        self.events.push(GameEvent::ItemDrawn { item, marked_index });
        for &tier in &eval.newly_achieved {
            log::info!(
                "session {}: {} at draw {}",
                self.session_id,
                tier,
                self.draws.draw_count()
            );
            self.events.push(GameEvent::TierAchieved { tier });
        }
        let outcome = eval.outcome;
        self.last_eval = eval;

        match outcome {
            Some(outcome) => self.end_session(outcome),
            None => self.phase = Phase::Drawing,
        }
        Ok(item)
    }

    /// Periodic timer entry point (the countdown cadence, about once a second).
    ///
    /// Refills the allowance when its window elapsed, reports the countdown,
    /// and returns a finished session to `Idle` once the cooldown is over.
    pub fn tick(&mut self) -> Result<(), GameError> {
        let now = self.clock.now_ms();
        let allowance = self.allowance_clock.check_and_refill(&mut self.store, now)?;
        self.sync_allowance(allowance);
        self.events.push(GameEvent::CountdownTick {
            remaining: self.allowance_clock.time_until_next_reset(&allowance, now),
        });

        if let (Phase::SessionEnded, Some(ended)) = (self.phase, self.ended_at_ms) {
            if now.saturating_sub(ended) >= self.config.cooldown_ms {
                self.finish_cooldown();
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            ticket: self.ticket.map(|t| *t.cells()),
            marked_mask: self.last_eval.marked_mask,
            winning_mask: self.last_eval.winning_mask,
            won_lines: self.last_eval.won_lines,
            drawn: self.draws.history().to_vec(),
            last_drawn: self.draws.last_drawn(),
            last_marked: self.last_marked,
            draw_count: self.draws.draw_count(),
            max_draws: self.config.max_draws,
            tiers: self.evaluator.flags(),
            outcome: self.outcome,
            tickets_remaining: self.allowance.tickets_remaining,
            next_reset_ms: self.time_until_next_reset().as_millis() as u64,
            cooldown_ms: self.cooldown_remaining().as_millis() as u64,
        }
    }

    fn end_session(&mut self, outcome: Outcome) {
        self.phase = Phase::SessionEnded;
        self.outcome = Some(outcome);
        self.ended_at_ms = Some(self.clock.now_ms());
        log::info!(
            "session {} ended after {} draws: {}",
            self.session_id,
            self.draws.draw_count(),
            outcome
        );
        self.events.push(GameEvent::SessionEnded { outcome });
    }

    fn finish_cooldown(&mut self) {
        self.phase = Phase::Idle;
        self.ticket = None;
        self.draws.reset();
        self.evaluator.reset();
        self.last_eval = Evaluation::default();
        self.last_marked = None;
        self.outcome = None;
        self.ended_at_ms = None;
        self.events.push(GameEvent::CooldownElapsed);
    }

    fn sync_allowance(&mut self, allowance: Allowance) {
        if allowance.tickets_remaining != self.allowance.tickets_remaining {
            self.events.push(GameEvent::AllowanceChanged {
                tickets_remaining: allowance.tickets_remaining,
            });
        }
        self.allowance = allowance;
    }

    fn reject(&self, action: &'static str) -> GameError {
        log::warn!("rejected {} while {}", action, self.phase);
        GameError::InvalidState {
            action,
            phase: self.phase,
        }
    }

    fn save_session(&mut self, ticket: &Ticket, draws: &DrawEngine) -> Result<(), StoreError> {
        self.store.set_many(&[
            (KEY_TICKET, ticket.encode()),
            (KEY_DRAWN, draws.encode_history()),
            (KEY_DRAW_COUNT, draws.draw_count().to_string()),
        ])
    }

    fn clear_saved_session(&mut self) -> Result<(), StoreError> {
        self.store.remove_many(&SESSION_KEYS)
    }
}
