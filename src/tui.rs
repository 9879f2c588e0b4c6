//! Terminal lifecycle and input pump.
//!
//! [`Tui`] puts the terminal into raw mode on the alternate screen and runs
//! a background task that folds crossterm input, tick pulses and render
//! pulses into a single [`Event`] channel for the app loop to drain.

use std::io::Stdout;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

/// How long [`Tui::exit`] waits for the pump to wind down on its own before
/// aborting it, and the hard deadline after which stopping counts as failed.
const STOP_GRACE: Duration = Duration::from_millis(500);
const STOP_DEADLINE: Duration = Duration::from_millis(2000);

pub type Backend = CrosstermBackend<Stdout>;

#[derive(Debug, Clone)]
pub enum Event {
    /// First event after the pump starts.
    Init,
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
    Error(String),
    Quit,
}

/// Owns the terminal plus the pump task feeding [`Event`]s to the app loop.
///
/// Derefs to the underlying ratatui [`Terminal`] for drawing. Dropping the
/// handle restores the terminal, including on unwinds.
pub struct Tui {
    terminal: Terminal<Backend>,
    pump: JoinHandle<()>,
    shutdown: CancellationToken,
    events: UnboundedReceiver<Event>,
    sender: UnboundedSender<Event>,
    frame_period: Duration,
    tick_period: Duration,
}

impl Tui {
    /// `frame_rate` paces redraws, `tick_rate` paces animations; both in Hz.
    pub fn new(frame_rate: f64, tick_rate: f64) -> color_eyre::Result<Self> {
        let (sender, events) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(Backend::new(std::io::stdout()))?,
            pump: tokio::spawn(async {}),
            shutdown: CancellationToken::new(),
            events,
            sender,
            frame_period: Duration::from_secs_f64(1.0 / frame_rate),
            tick_period: Duration::from_secs_f64(1.0 / tick_rate),
        })
    }

    /// Raw mode, alternate screen, hidden cursor, then start the pump.
    pub fn enter(&mut self) -> color_eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.start();
        Ok(())
    }

    /// Undo everything [`Tui::enter`] did. Safe to call twice.
    pub fn exit(&mut self) -> color_eyre::Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Release the terminal and move the process to the background, so that
    /// Ctrl+Z behaves like in any other program.
    pub fn suspend(&mut self) -> color_eyre::Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> color_eyre::Result<()> {
        self.enter()
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    fn start(&mut self) {
        self.shutdown.cancel();
        self.shutdown = CancellationToken::new();
        spawn_sigterm_watch(self.sender.clone());
        self.pump = tokio::spawn(pump_events(
            self.sender.clone(),
            self.shutdown.clone(),
            self.tick_period,
            self.frame_period,
        ));
    }

    fn stop(&mut self) -> color_eyre::Result<()> {
        self.shutdown.cancel();
        let waiting_since = Instant::now();
        while !self.pump.is_finished() {
            if waiting_since.elapsed() > STOP_DEADLINE {
                return Err(color_eyre::eyre::eyre!("event pump refused to stop"));
            }
            if waiting_since.elapsed() > STOP_GRACE {
                self.pump.abort();
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }
}

async fn pump_events(
    sender: UnboundedSender<Event>,
    shutdown: CancellationToken,
    tick_period: Duration,
    frame_period: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = interval(tick_period);
    let mut frames = interval(frame_period);

    if sender.send(Event::Init).is_err() {
        return;
    }

    loop {
        let event = tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            raw = input.next().fuse() => match raw {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(err)) => Event::Error(err.to_string()),
                None => break,
            },
        };
        if sender.send(event).is_err() {
            break;
        }
    }
    shutdown.cancel();
}

/// Keeps key presses and resizes; Ctrl+C short-circuits to [`Event::Quit`].
/// Key repeats and releases never reach the app.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                Some(Event::Quit)
            } else {
                Some(Event::Key(key))
            }
        }
        CrosstermEvent::Resize(columns, rows) => Some(Event::Resize(columns, rows)),
        _ => None,
    }
}

#[cfg(unix)]
fn spawn_sigterm_watch(sender: UnboundedSender<Event>) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("installing the SIGTERM handler");
        sigterm.recv().await;
        let _ = sender.send(Event::Quit);
    });
}

#[cfg(not(unix))]
fn spawn_sigterm_watch(_sender: UnboundedSender<Event>) {}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            eprintln!("failed to restore the terminal: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_translates_to_quit() {
        let raw = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(translate(raw), Some(Event::Quit)));
    }

    #[test]
    fn plain_key_press_passes_through() {
        let raw = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert!(matches!(translate(raw), Some(Event::Key(_))));
    }

    #[test]
    fn key_release_is_dropped() {
        let raw = CrosstermEvent::Key(KeyEvent::new_with_kind(
            KeyCode::Char('s'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(translate(raw).is_none());
    }

    #[test]
    fn resize_reports_the_new_size() {
        let resized = translate(CrosstermEvent::Resize(120, 40));
        assert!(matches!(resized, Some(Event::Resize(120, 40))));
    }
}
