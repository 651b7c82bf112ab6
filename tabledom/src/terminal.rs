use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::paint::{Line, Tone};
use crate::text::truncate_to_width;

/// Raw-mode terminal that draws painted lines.
///
/// Entering the alternate screen, hiding the cursor and capturing the mouse
/// happen in [`Terminal::new`]; all of it is undone on drop.
pub struct Terminal {
    stdout: io::Stdout,
    width: u16,
    height: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn poll(&self, timeout: Option<Duration>) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();

        let has_event = match timeout {
            Some(dur) => event::poll(dur)?,
            None => {
                events.push(event::read()?);
                return Ok(events);
            }
        };

        if has_event {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }

        Ok(events)
    }

    /// Redraw the whole screen. Lines beyond the screen are clipped.
    pub fn draw(&mut self, lines: &[Line]) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.width = width;
        self.height = height;

        queue!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            terminal::Clear(terminal::ClearType::All)
        )?;

        for (y, line) in lines.iter().take(height as usize).enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16))?;
            let mut remaining = width as usize;
            for span in &line.spans {
                if remaining == 0 {
                    break;
                }
                let text = truncate_to_width(&span.text, remaining);
                remaining = remaining.saturating_sub(crate::text::display_width(&text));

                let (fg, bg) = colors(span.tone);
                queue!(self.stdout, SetForegroundColor(fg), SetBackgroundColor(bg))?;
                if span.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    self.stdout,
                    Print(text),
                    SetAttribute(Attribute::Reset)
                )?;
            }
        }

        self.stdout.flush()
    }
}

fn colors(tone: Tone) -> (Color, Color) {
    match tone {
        Tone::Normal => (Color::Reset, Color::Reset),
        Tone::Header => (Color::Cyan, Color::Reset),
        Tone::Muted => (Color::DarkGrey, Color::Reset),
        Tone::Accent => (Color::Blue, Color::Reset),
        Tone::Highlight => (Color::Yellow, Color::Reset),
        Tone::Danger => (Color::Red, Color::Reset),
        Tone::Selected => (Color::Black, Color::Green),
        Tone::Focused => (Color::Black, Color::Grey),
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
