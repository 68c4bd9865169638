//! GameView: maps a `core::GameSnapshot` into styled terminal lines.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::types::{Cell, Outcome, Phase, WinTier, GRID_SIZE};

/// Semantic styling; the renderer picks the colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Dim,
    Title,
    Free,
    Marked,
    Winning,
    /// The cell marked by the latest draw.
    Fresh,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub type Line = Vec<Span>;

/// Plain text of a line (for tests and logging).
pub fn line_text(line: &Line) -> String {
    line.iter().map(|s| s.text.as_str()).collect()
}

/// `HH:MM:SS` countdown.
pub fn format_countdown(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// A lightweight text renderer for the bingo game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Cell width in terminal columns (longest item name is 11).
    cell_w: usize,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 13 }
    }
}

impl GameView {
    pub fn new(cell_w: usize) -> Self {
        Self { cell_w }
    }

    /// Render the whole screen. `status` is the last message for the player.
    pub fn render(&self, snap: &GameSnapshot, status: Option<&str>) -> Vec<Line> {
        let mut lines = Vec::with_capacity(24);

        lines.push(vec![
            Span::new(" GARDEN BINGO ", Tone::Title),
            Span::new(format!("   Tickets: {}", snap.tickets_remaining), Tone::Plain),
            Span::new(
                format!("   Refill in {}", format_countdown(snap.next_reset_ms)),
                if snap.tickets_remaining == 0 {
                    Tone::Alert
                } else {
                    Tone::Dim
                },
            ),
        ]);
        lines.push(Vec::new());

        match snap.ticket {
            Some(cells) => self.render_ticket(snap, &cells, &mut lines),
            None => {
                lines.push(vec![Span::new(
                    "  No ticket. Press [d] or [Enter] to deal.",
                    Tone::Dim,
                )]);
            }
        }
        lines.push(Vec::new());

        lines.push(self.draw_line(snap));
        lines.push(self.tier_line(snap));
        lines.push(self.phase_line(snap));
        lines.push(Vec::new());
        lines.push(vec![Span::new(
            "  [Enter] deal/play  [d] deal  [space] draw  [q] quit",
            Tone::Dim,
        )]);
        if let Some(status) = status {
            lines.push(vec![Span::new(format!("  {status}"), Tone::Plain)]);
        }
        lines
    }

    fn render_ticket(&self, snap: &GameSnapshot, cells: &[Cell], lines: &mut Vec<Line>) {
        let border = format!(
            "  +{}",
            format!("{}+", "-".repeat(self.cell_w)).repeat(GRID_SIZE)
        );
        lines.push(vec![Span::new(border.clone(), Tone::Dim)]);

        for row in 0..GRID_SIZE {
            let mut line = vec![Span::new("  |", Tone::Dim)];
            for col in 0..GRID_SIZE {
                let idx = row * GRID_SIZE + col;
                let (label, tone) = self.cell_label(snap, cells[idx], idx);
                line.push(Span::new(
                    format!("{:^width$}", label, width = self.cell_w),
                    tone,
                ));
                line.push(Span::new("|", Tone::Dim));
            }
            lines.push(line);
            lines.push(vec![Span::new(border.clone(), Tone::Dim)]);
        }
    }

    fn cell_label(&self, snap: &GameSnapshot, cell: Cell, idx: usize) -> (String, Tone) {
        let tone = if snap.is_winning(idx) {
            Tone::Winning
        } else if snap.last_marked == Some(idx) {
            Tone::Fresh
        } else if cell == Cell::Free {
            Tone::Free
        } else if snap.is_marked(idx) {
            Tone::Marked
        } else {
            Tone::Plain
        };

        let label = match cell {
            Cell::Free => "* FREE *".to_string(),
            Cell::Item(item) if snap.is_marked(idx) => format!("*{}*", item.name()),
            Cell::Item(item) => item.name().to_string(),
        };
        (label, tone)
    }

    fn draw_line(&self, snap: &GameSnapshot) -> Line {
        let mut line = vec![Span::new(
            format!("  Draw {}/{}", snap.draw_count, snap.max_draws),
            Tone::Plain,
        )];
        if let Some(item) = snap.last_drawn {
            let (suffix, tone) = if snap.last_marked.is_some() {
                (" (on your ticket!)", Tone::Fresh)
            } else {
                ("", Tone::Plain)
            };
            line.push(Span::new(format!("   Last: {item}{suffix}"), tone));
        }
        line
    }

    fn tier_line(&self, snap: &GameSnapshot) -> Line {
        let mut line = vec![Span::new("  Tiers:", Tone::Plain)];
        for tier in [
            WinTier::OneLine,
            WinTier::TwoLines,
            WinTier::FullHouse,
            WinTier::Jackpot,
        ] {
            let reached = snap.tiers.contains(tier);
            line.push(Span::new(
                format!(" [{}] {}", if reached { "x" } else { " " }, tier),
                if reached { Tone::Winning } else { Tone::Dim },
            ));
        }
        line
    }

    fn phase_line(&self, snap: &GameSnapshot) -> Line {
        let (text, tone) = match (snap.phase, snap.outcome) {
            (Phase::SessionEnded, Some(Outcome::Win(tier))) => (
                format!(
                    "  You won: {}! Next ticket in {}s",
                    tier,
                    snap.cooldown_ms.div_ceil(1000)
                ),
                Tone::Winning,
            ),
            (Phase::SessionEnded, _) => (
                format!(
                    "  No luck this time. Next ticket in {}s",
                    snap.cooldown_ms.div_ceil(1000)
                ),
                Tone::Alert,
            ),
            (Phase::Idle, _) if snap.tickets_remaining == 0 => (
                "  Out of tickets. Come back when the refill timer runs out.".to_string(),
                Tone::Alert,
            ),
            (Phase::Idle, _) => ("  Ready to deal.".to_string(), Tone::Plain),
            (Phase::Dealt, _) => (
                "  Ticket dealt. Press [space] to draw.".to_string(),
                Tone::Plain,
            ),
            (Phase::Drawing, _) => (
                format!("  {} draws left.", snap.draws_left()),
                Tone::Plain,
            ),
        };
        vec![Span::new(text, tone)]
    }
}
