//! Terminal event loop.
//!
//! Multiplexes key presses, session updates and a redraw tick with
//! `tokio::select!`. Session starts run as background tasks so the screen
//! keeps animating while content is loading.
use std::io::{self, stdout, Stdout};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use host::Session;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, error, info};

use crate::app::{App, AppAction};
use crate::ui;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn spawn_start(session: &Session) {
    let session = session.clone();
    tokio::spawn(async move {
        if let Err(err) = session.start().await {
            error!(%err, "Failed to start a game");
        }
    });
}

/// Runs the UI until the player quits.
pub async fn run(session: Session) -> io::Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut updates = session.subscribe();
    let mut app = App::new(updates.borrow_and_update().clone());
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    spawn_start(&session);

    loop {
        guard.terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                app.update(updates.borrow_and_update().clone());
            }
            maybe_event = events.next() => {
                let action = match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key.code)
                    }
                    Some(Ok(_)) => None,
                    Some(Err(err)) => return Err(err),
                    None => break,
                };
                match action {
                    Some(AppAction::Activate(position)) => {
                        session.activate(position);
                    }
                    Some(AppAction::Restart) => {
                        info!("Restart requested");
                        spawn_start(&session);
                    }
                    Some(AppAction::Quit) => break,
                    None => {}
                }
            }
            _ = ticker.tick() => {
                app.tick();
            }
        }
    }

    debug!("Leaving the terminal");
    Ok(())
}
