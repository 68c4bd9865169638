use garden_bingo::core::{
    GameConfig, GameSnapshot, GameStateMachine, ManualClock, MemoryStore, SimpleRng,
};
use garden_bingo::term::{GameView, Line, Tone};
use garden_bingo::types::{Outcome, Phase, WinTier};

fn text(line: &Line) -> String {
    line.iter().map(|s| s.text.as_str()).collect()
}

fn render(snap: &GameSnapshot) -> Vec<String> {
    GameView::default().render(snap, None).iter().map(text).collect()
}

#[test]
fn header_shows_allowance_and_countdown() {
    let snap = GameSnapshot {
        tickets_remaining: 0,
        next_reset_ms: 3_600_000,
        ..GameSnapshot::default()
    };
    let lines = GameView::default().render(&snap, None);
    let header = text(&lines[0]);
    assert!(header.contains("Tickets: 0"));
    assert!(header.contains("01:00:00"));
    assert!(lines[0].iter().any(|s| s.tone == Tone::Alert));
    assert!(render(&snap).iter().any(|l| l.contains("Out of tickets")));
}

#[test]
fn grid_rows_are_equally_wide() {
    let mut game = GameStateMachine::new(
        GameConfig::default(),
        MemoryStore::new(),
        ManualClock::new(0),
        SimpleRng::new(21),
    )
    .unwrap();
    game.deal().unwrap();
    let out = render(&game.snapshot());

    let grid: Vec<&String> = out
        .iter()
        .filter(|l| l.trim_start().starts_with('+') || l.trim_start().starts_with('|'))
        .collect();
    assert_eq!(grid.len(), 11);
    let width = grid[0].chars().count();
    assert!(grid.iter().all(|l| l.chars().count() == width));
}

#[test]
fn ended_session_shows_outcome_and_cooldown() {
    let mut snap = GameSnapshot {
        phase: Phase::SessionEnded,
        outcome: Some(Outcome::Win(WinTier::TwoLines)),
        cooldown_ms: 2_500,
        max_draws: 45,
        ..GameSnapshot::default()
    };
    snap.tiers.one_line = true;
    snap.tiers.two_lines = true;

    let out = render(&snap);
    assert!(out.iter().any(|l| l.contains("You won: two lines! Next ticket in 3s")));
    assert!(out.iter().any(|l| l.contains("[x] one line") && l.contains("[ ] full house")));

    snap.outcome = Some(Outcome::Loss);
    snap.tiers = Default::default();
    assert!(render(&snap).iter().any(|l| l.contains("No luck this time")));
}
