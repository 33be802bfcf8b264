//! Presentation state: the latest session snapshot plus the keyboard cursor.
//!
//! The app never touches the game. Key presses are turned into
//! [`AppAction`]s, which the event loop forwards to the session.
use crossterm::event::KeyCode;
use host::{SessionSnapshot, Status};
use pairmatch::GRID_COLUMNS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppAction {
    Activate(usize),
    /// Start over. Also the retry action after a failed start.
    Restart,
    Quit,
}

pub struct App {
    snapshot: SessionSnapshot,
    cursor: usize,
    ticks: usize,
}

impl App {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot,
            cursor: 0,
            ticks: 0,
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn update(&mut self, snapshot: SessionSnapshot) {
        if snapshot.generation != self.snapshot.generation {
            self.cursor = 0;
        }
        self.snapshot = snapshot;
    }

    fn num_cards(&self) -> usize {
        self.snapshot
            .game
            .as_ref()
            .map_or(0, |game| game.cards.len())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<AppAction> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppAction::Quit),
            KeyCode::Char('r') => return Some(AppAction::Restart),
            _ => {}
        }
        if self.snapshot.status != Status::Ready {
            return None;
        }

        let num_cards = self.num_cards();
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                return (self.cursor < num_cards).then_some(AppAction::Activate(self.cursor));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor + 1 < num_cards {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor >= GRID_COLUMNS {
                    self.cursor -= GRID_COLUMNS;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + GRID_COLUMNS < num_cards {
                    self.cursor += GRID_COLUMNS;
                }
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use host::Progress;
    use pairmatch::{build_deck, fallback_characters, Game, ImageRef, NUM_PAIRS};

    use super::*;

    pub(crate) fn ready_snapshot(game: &Game) -> SessionSnapshot {
        SessionSnapshot {
            generation: 1,
            status: Status::Ready,
            game: Some(game.snapshot()),
        }
    }

    pub(crate) fn fresh_game() -> Game {
        let illustrated = fallback_characters()
            .into_iter()
            .map(|character| {
                let image = ImageRef(format!("{}.png", character.name));
                (character, image)
            })
            .collect();
        Game::new(build_deck(illustrated, NUM_PAIRS).unwrap())
    }

    #[test]
    fn cursor_stays_on_the_table() {
        let mut app = App::new(ready_snapshot(&fresh_game()));
        assert_eq!(app.handle_key(KeyCode::Left), None);
        assert_eq!(app.cursor(), 0);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.cursor(), 0);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.cursor(), GRID_COLUMNS + 1);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.cursor(), 3 * GRID_COLUMNS + 1);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('l'));
        }
        assert_eq!(app.cursor(), 2 * NUM_PAIRS - 1);
        assert_eq!(
            app.handle_key(KeyCode::Enter),
            Some(AppAction::Activate(2 * NUM_PAIRS - 1))
        );
    }

    #[test]
    fn only_restart_and_quit_while_loading() {
        let mut app = App::new(SessionSnapshot {
            generation: 1,
            status: Status::Loading {
                progress: Progress::PaintingCharacters,
            },
            game: None,
        });
        assert_eq!(app.handle_key(KeyCode::Enter), None);
        assert_eq!(app.handle_key(KeyCode::Char('r')), Some(AppAction::Restart));
        assert_eq!(app.handle_key(KeyCode::Esc), Some(AppAction::Quit));
    }

    #[test]
    fn new_session_resets_the_cursor() {
        let mut app = App::new(ready_snapshot(&fresh_game()));
        app.handle_key(KeyCode::Right);
        app.update(ready_snapshot(&fresh_game()));
        assert_eq!(app.cursor(), 1);

        let mut next = ready_snapshot(&fresh_game());
        next.generation = 2;
        app.update(next);
        assert_eq!(app.cursor(), 0);
    }
}
