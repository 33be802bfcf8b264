//! The session controller: owns the one live game and serializes every change
//! to it.
//!
//! The presentation layer reads [`SessionSnapshot`]s from a watch channel and
//! sends activations through [`Session::activate()`]. Resolution delays are
//! scheduled as tasks tagged with the session generation, so a timer that
//! fires after a restart does nothing.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pairmatch::{visualize_table, Activation, Game, GameSnapshot, Resolution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::content::ContentProvider;
use crate::error::SessionInitError;
use crate::init::{initialize_game, Progress};
use crate::Config;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Status {
    Loading { progress: Progress },
    Ready,
    /// The only way out is to start again.
    Failed { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Increased by every (re)start.
    pub generation: u64,
    pub status: Status,
    /// Present once the status is [`Status::Ready`].
    pub game: Option<GameSnapshot>,
}

struct Shared {
    generation: u64,
    status: Status,
    game: Option<Game>,
    rng: StdRng,
}

impl Shared {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            status: self.status.clone(),
            game: self.game.as_ref().map(Game::snapshot),
        }
    }
}

/// Handle to the session. Cheap to clone, all clones control the same session.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn ContentProvider>,
    config: Arc<Config>,
    shared: Arc<Mutex<Shared>>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
}

impl Session {
    /// Creates a session that is still waiting for its first [`start()`](Session::start).
    pub fn new(provider: Arc<dyn ContentProvider>, config: Config) -> Self {
        let shared = Shared {
            generation: 0,
            status: Status::Loading {
                progress: Progress::ChoosingCharacters,
            },
            game: None,
            rng: StdRng::seed_from_u64(config.seed),
        };
        let (updates, _) = watch::channel(shared.snapshot());
        Self {
            provider,
            config: Arc::new(config),
            shared: Arc::new(Mutex::new(shared)),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    // The lock is never held across an await point, and every critical section
    // leaves the state consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, shared: &Shared) {
        self.updates.send_replace(shared.snapshot());
    }

    /// Throws away the current game (if any) and initializes a new one. Also
    /// serves as the retry action after a failed start.
    ///
    /// If another start begins before this one is done, the result of this
    /// one is discarded.
    pub async fn start(&self) -> Result<(), SessionInitError> {
        let (generation, mut rng) = {
            let mut shared = self.lock();
            shared.generation += 1;
            shared.status = Status::Loading {
                progress: Progress::ChoosingCharacters,
            };
            shared.game = None;
            self.publish(&shared);
            let rng = StdRng::seed_from_u64(shared.rng.gen());
            (shared.generation, rng)
        };
        info!(generation, "Starting a new session");

        let result = initialize_game(&*self.provider, &self.config, &mut rng, |progress| {
            let mut shared = self.lock();
            if shared.generation == generation {
                shared.status = Status::Loading { progress };
                self.publish(&shared);
            }
        })
        .await;

        let mut shared = self.lock();
        if shared.generation != generation {
            debug!(
                generation,
                live_generation = shared.generation,
                "Discarding the result of a superseded initialization"
            );
            return Ok(());
        }
        match result {
            Ok(game) => {
                trace!("\n{}", visualize_table(&game.snapshot()));
                shared.game = Some(game);
                shared.status = Status::Ready;
                self.publish(&shared);
                info!(generation, "Session ready");
                Ok(())
            }
            Err(err) => {
                warn!(generation, %err, "Session could not be started");
                shared.status = Status::Failed {
                    message: err.to_string(),
                };
                self.publish(&shared);
                Err(err)
            }
        }
    }

    /// Activates the card at `position`. Returns `None` if no game is running.
    ///
    /// Completing a pair schedules its resolution on the tokio runtime, so
    /// this has to be called from within a runtime.
    pub fn activate(&self, position: usize) -> Option<Activation> {
        let mut shared = self.lock();
        let generation = shared.generation;
        let game = shared.game.as_mut()?;
        let activation = game.activate(position);
        match activation {
            Activation::Ignored(reason) => {
                debug!(position, ?reason, "Activation ignored");
                return Some(activation);
            }
            Activation::Flipped { .. } => {
                debug!(position, "Card flipped");
            }
            Activation::Resolving(pending) => {
                let delay = pending.kind.delay(&self.config.timing);
                debug!(position, kind = ?pending.kind, ?delay, "Pair complete, resolving");
                let session = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    session.finish_resolution(generation);
                });
            }
        }
        self.publish(&shared);
        Some(activation)
    }

    /// Timer callback. Does nothing if the session was restarted since the
    /// timer was scheduled.
    fn finish_resolution(&self, generation: u64) {
        let mut shared = self.lock();
        if shared.generation != generation {
            debug!(
                generation,
                live_generation = shared.generation,
                "Ignoring a resolution timer from a superseded session"
            );
            return;
        }
        let Some(game) = shared.game.as_mut() else {
            return;
        };
        match game.resolve() {
            Some(Resolution::Matched {
                player_idx,
                pair_id,
                game_won,
            }) => {
                info!(player = player_idx + 1, %pair_id, "Pair matched");
                if game_won {
                    info!(scores = ?game.scores(), outcome = ?game.outcome(), "Game over");
                }
            }
            Some(Resolution::Mismatched { next_player_idx }) => {
                debug!(next_player = next_player_idx + 1, "No match");
            }
            None => return,
        }
        trace!("\n{}", visualize_table(&game.snapshot()));
        self.publish(&shared);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pairmatch::{fallback_characters, Character, Face, GameOutcome, ImageRef, NUM_PAIRS};

    use super::*;
    use crate::content::{placeholder_image, ContentError, FallbackProvider};

    fn config() -> Config {
        Config {
            seed: 42,
            ..Config::default()
        }
    }

    /// Positions of the two cards of every pair, in pair order.
    fn pair_positions(session: &Session) -> Vec<(usize, usize)> {
        let shared = session.lock();
        let cards = shared.game.as_ref().unwrap().cards();
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (i, card) in cards.iter().enumerate() {
            if let Some(j) = (i + 1..cards.len()).find(|&j| cards[j].pair_id == card.pair_id) {
                pairs.push((i, j));
            }
        }
        pairs
    }

    async fn ready_session() -> Session {
        let session = Session::new(Arc::new(FallbackProvider), config());
        session.start().await.unwrap();
        session
    }

    fn game_snapshot(session: &Session) -> GameSnapshot {
        session.snapshot().game.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_session_becomes_ready() {
        let session = Session::new(Arc::new(FallbackProvider), config());
        let updates = session.subscribe();
        assert_eq!(session.activate(0), None);

        session.start().await.unwrap();
        let snapshot = updates.borrow().clone();
        assert_eq!(snapshot.status, Status::Ready);
        assert_eq!(snapshot.generation, 1);
        let game = snapshot.game.unwrap();
        assert_eq!(game.cards.len(), 2 * NUM_PAIRS);
        assert!(game.cards.iter().all(|card| card.face == Face::Hidden));
        assert_eq!(game.scores, [0, 0]);
        assert_eq!(pair_positions(&session).len(), NUM_PAIRS);
    }

    #[tokio::test(start_paused = true)]
    async fn match_resolves_after_the_short_delay() {
        let session = ready_session().await;
        let (first, second) = pair_positions(&session)[0];

        assert!(matches!(
            session.activate(first),
            Some(Activation::Flipped { .. })
        ));
        assert!(matches!(
            session.activate(second),
            Some(Activation::Resolving(_))
        ));
        let other = (0..2 * NUM_PAIRS)
            .find(|&p| p != first && p != second)
            .unwrap();
        let before = game_snapshot(&session);
        assert!(matches!(
            session.activate(other),
            Some(Activation::Ignored(_))
        ));
        assert_eq!(game_snapshot(&session), before);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(game_snapshot(&session).scores, [0, 0]);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let game = game_snapshot(&session);
        assert_eq!(game.scores, [1, 0]);
        assert_eq!(game.current_player_idx, 0);
        assert_eq!(game.cards[first].face, Face::Matched);
        assert_eq!(game.cards[second].face, Face::Matched);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatch_resolves_after_the_long_delay() {
        let session = ready_session().await;
        let pairs = pair_positions(&session);
        let (a, _) = pairs[0];
        let (b, _) = pairs[1];

        session.activate(a);
        session.activate(b);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let game = game_snapshot(&session);
        assert_eq!(game.cards[a].face, Face::Revealed);
        assert_eq!(game.current_player_idx, 0);

        tokio::time::sleep(Duration::from_millis(501)).await;
        let game = game_snapshot(&session);
        assert_eq!(game.cards[a].face, Face::Hidden);
        assert_eq!(game.cards[b].face, Face::Hidden);
        assert_eq!(game.current_player_idx, 1);
        assert_eq!(game.scores, [0, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn whole_game() {
        let session = ready_session().await;
        for (first, second) in pair_positions(&session) {
            session.activate(first);
            session.activate(second);
            tokio::time::sleep(Duration::from_millis(600)).await;
        }
        let game = game_snapshot(&session);
        assert!(game.won);
        assert_eq!(game.scores, [NUM_PAIRS as u32, 0]);
        assert_eq!(
            game.outcome,
            Some(GameOutcome::WonByPlayer { player_idx: 0 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_makes_pending_timers_stale() {
        let session = ready_session().await;
        let pairs = pair_positions(&session);
        session.activate(pairs[0].0);
        session.activate(pairs[1].0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        session.start().await.unwrap();
        assert_eq!(session.snapshot().generation, 2);

        // A mismatch in the new session, scheduled 1000ms after the old one
        let pairs = pair_positions(&session);
        session.activate(pairs[0].0);
        session.activate(pairs[1].0);

        // Past the old timer, but before the new one
        tokio::time::sleep(Duration::from_millis(700)).await;
        let game = game_snapshot(&session);
        assert_eq!(game.cards[pairs[0].0].face, Face::Revealed);
        assert_eq!(game.cards[pairs[1].0].face, Face::Revealed);
        assert_eq!(game.current_player_idx, 0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let game = game_snapshot(&session);
        assert_eq!(game.cards[pairs[0].0].face, Face::Hidden);
        assert_eq!(game.current_player_idx, 1);
    }

    /// The first list request is slow and fails, later ones answer at once
    /// with a list of their own.
    struct SlowThenFast {
        calls: AtomicUsize,
    }

    fn other_characters() -> Vec<Character> {
        (0..NUM_PAIRS)
            .map(|i| Character::new(&format!("Other {}", i), "Elsewhere", ""))
            .collect()
    }

    #[async_trait]
    impl ContentProvider for SlowThenFast {
        async fn list_characters(&self, _count: usize) -> Result<Vec<Character>, ContentError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Err(ContentError::Unavailable)
            } else {
                Ok(other_characters())
            }
        }

        async fn render_image(&self, character: &Character) -> Result<ImageRef, ContentError> {
            Ok(ImageRef(format!("{}.png", character.name)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_initialization_is_discarded() {
        let session = Session::new(
            Arc::new(SlowThenFast {
                calls: AtomicUsize::new(0),
            }),
            config(),
        );
        let (first, second) = tokio::join!(session.start(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            session.start().await
        });
        first.unwrap();
        second.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.status, Status::Ready);
        let shared = session.lock();
        assert!(shared
            .game
            .as_ref()
            .unwrap()
            .cards()
            .iter()
            .all(|card| card.pair_id.starts_with("Other ")));
    }

    /// Fails the first list request; the configured fallback is broken.
    #[tokio::test(start_paused = true)]
    async fn failed_start_can_be_retried() {
        let provider = Arc::new(FailOnce {
            calls: AtomicUsize::new(0),
        });
        let config = Config {
            fallback_characters: fallback_characters()[..3].to_vec(),
            ..config()
        };
        let session = Session::new(provider, config);

        assert!(session.start().await.is_err());
        let snapshot = session.snapshot();
        assert!(matches!(snapshot.status, Status::Failed { .. }));
        assert_eq!(snapshot.game, None);

        session.start().await.unwrap();
        assert_eq!(session.snapshot().status, Status::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_list_falls_back_to_builtin_characters() {
        let provider = Arc::new(FailOnce {
            calls: AtomicUsize::new(0),
        });
        let session = Session::new(provider, config());
        session.start().await.unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, Status::Ready);
        assert_eq!(pair_positions(&session).len(), NUM_PAIRS);
        let shared = session.lock();
        let fallback = fallback_characters();
        for card in shared.game.as_ref().unwrap().cards() {
            assert!(fallback.contains(&*card.character));
            assert_eq!(card.image, placeholder_image(&card.character));
        }
    }

    struct FailOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentProvider for FailOnce {
        async fn list_characters(&self, _count: usize) -> Result<Vec<Character>, ContentError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ContentError::Unavailable)
            } else {
                Ok(other_characters())
            }
        }

        async fn render_image(&self, _character: &Character) -> Result<ImageRef, ContentError> {
            Err(ContentError::Unavailable)
        }
    }
}
