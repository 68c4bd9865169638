//! TerminalRenderer: flushes rendered lines to a real terminal.
//!
//! The screen is small, so every frame is a full redraw; frames identical to
//! the previous one are skipped.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::game_view::{Line, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Vec<Line>>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn draw(&mut self, lines: Vec<Line>) -> Result<()> {
        if self.last.as_ref() == Some(&lines) {
            return Ok(());
        }
        self.buf.clear();
        encode_lines_into(&lines, &mut self.buf)?;
        self.flush_buf()?;
        self.last = Some(lines);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-screen redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_lines_into(lines: &[Line], out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current: Option<Tone> = None;
    for (y, line) in lines.iter().enumerate() {
        for span in line {
            if current != Some(span.tone) {
                apply_tone_into(out, span.tone)?;
                current = Some(span.tone);
            }
            out.queue(Print(&span.text))?;
        }
        if y + 1 < lines.len() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_tone_into(out: &mut Vec<u8>, tone: Tone) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(tone_color(tone)))?;
    match tone {
        Tone::Title | Tone::Winning | Tone::Fresh => {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        Tone::Dim => {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        _ => {}
    }
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Plain | Tone::Dim => Color::Reset,
        Tone::Title => Color::Green,
        Tone::Free => Color::Yellow,
        Tone::Marked => Color::Cyan,
        Tone::Winning => Color::Magenta,
        Tone::Fresh => Color::Yellow,
        Tone::Alert => Color::Red,
    }
}
