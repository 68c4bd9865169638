//! Terminal garden bingo runner (default binary).
//!
//! Crossterm input, a line-based renderer and the session state machine
//! backed by a JSON save file.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

use garden_bingo::cli::{init_logging, load_game_config, parse_args, USAGE};
use garden_bingo::core::{
    GameError, GameEvent, GameStateMachine, JsonFileStore, RandomSource, SimpleRng, SystemClock,
};
use garden_bingo::input::{handle_key_event, should_quit, InputHandler};
use garden_bingo::term::{format_countdown, GameView, TerminalRenderer};
use garden_bingo::types::{GameAction, Outcome, Phase, COUNTDOWN_TICK_MS};

type Game = GameStateMachine<JsonFileStore, SystemClock, Box<dyn RandomSource>>;

/// Input poll timeout; also bounds the latency of a delayed draw.
const FRAME_MS: u64 = 50;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args)?;
    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }

    init_logging(opts.log_path.as_deref())?;
    let config = load_game_config(&opts)?;
    let store = JsonFileStore::open(&opts.store_path)?;
    let rng: Box<dyn RandomSource> = match opts.seed {
        Some(seed) => Box::new(SimpleRng::new(seed)),
        None => Box::new(StdRng::from_os_rng()),
    };
    log::info!(
        "starting: store={} seed={:?}",
        store.path().display(),
        opts.seed
    );

    let mut game = GameStateMachine::new(config, store, SystemClock, rng)?;
    let status = if game.resume()? {
        Some("Resumed your unfinished ticket.".to_string())
    } else {
        None
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game, status);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, game: &mut Game, mut status: Option<String>) -> Result<()> {
    let view = GameView::default();
    let config = game.config();
    let mut input = InputHandler::with_config(config.debounce_ms, config.draw_delay_ms);

    let started = Instant::now();
    let frame = Duration::from_millis(FRAME_MS);
    let countdown = Duration::from_millis(COUNTDOWN_TICK_MS);
    let mut last_tick = Instant::now();
    game.tick()?;

    loop {
        for event in game.take_events() {
            log::debug!("event: {event:?}");
            if matches!(event, GameEvent::SessionEnded { .. }) {
                input.cancel_pending();
            }
            if let Some(message) = describe(&event) {
                status = Some(message);
            }
        }

        term.draw(view.render(&game.snapshot(), status.as_deref()))?;

        let timeout = input
            .pending_due_in(elapsed_ms(started))
            .map_or(frame, |ms| frame.min(Duration::from_millis(ms)));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        let action = action.resolve(game.phase());
                        let now_ms = elapsed_ms(started);
                        if let Some(action) = input.handle_action(action, now_ms) {
                            if let Some(message) = apply(game, action)? {
                                status = Some(message);
                            }
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if let Some(action) = input.update(elapsed_ms(started)) {
            if let Some(message) = apply(game, action)? {
                status = Some(message);
            }
        }

        if last_tick.elapsed() >= countdown {
            last_tick = Instant::now();
            game.tick()?;
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Apply an action. Player-facing refusals become a status message; store
/// failures abort the run.
fn apply(game: &mut Game, action: GameAction) -> Result<Option<String>> {
    let result = match action.resolve(game.phase()) {
        GameAction::Deal => game.deal().map(|_| ()),
        _ => game.draw_next().map(|_| ()),
    };
    match result {
        Ok(()) => Ok(None),
        Err(GameError::NoTicketsAvailable { resets_in }) => Ok(Some(format!(
            "No tickets left. Refill in {}.",
            format_countdown(resets_in.as_millis() as u64)
        ))),
        Err(e @ GameError::InvalidState { phase, .. }) => Ok(Some(match phase {
            Phase::SessionEnded => "Hold on, the next ticket is coming up.".to_string(),
            _ => e.to_string(),
        })),
        Err(e) if e.is_expected() => Ok(Some(e.to_string())),
        Err(e) => Err(e.into()),
    }
}

fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::TicketDealt { .. } => Some("Fresh ticket. Good luck!".to_string()),
        GameEvent::TierAchieved { tier } => Some(format!("{}!", capitalize(tier.as_str()))),
        GameEvent::SessionEnded { outcome } => Some(match outcome {
            Outcome::Win(tier) => format!("Session over: {tier}."),
            Outcome::Loss => "Session over: out of draws.".to_string(),
        }),
        GameEvent::CooldownElapsed => Some("Ready for a new ticket.".to_string()),
        GameEvent::ItemDrawn { .. }
        | GameEvent::AllowanceChanged { .. }
        | GameEvent::CountdownTick { .. } => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
