use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::input::{command_for, Command};
use crate::state::{EndReason, GameState, GameStatus, TickOutcome};
use crate::store::{load_high_score, record_session_start, save_high_score, KeyValueStore, SessionStart};
use crate::term::{TermInt, TermManager};
use crate::ticker::Ticker;

use anyhow::Result;

/// Upper bound on how long the loop blocks waiting for keys.
const INPUT_POLL_MS: u64 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Game state plus its collaborators: the persistence store and the tick timer.
/// Terminal-free, so the wiring can be exercised directly.
pub struct Session {
    state: GameState,
    store: Box<dyn KeyValueStore>,
    ticker: Ticker,
}

impl Session {
    pub fn new(config: &AppConfig, store: Box<dyn KeyValueStore>, now: Instant) -> Self {
        let high_score = load_high_score(store.as_ref());
        log::info!("Loaded high score {}", high_score);
        let state = GameState::new(config.width, config.height, high_score);
        let ticker = Ticker::new(Duration::from_millis(config.tick_ms), now);
        Session { state, store, ticker }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn start(&mut self, start: SessionStart, now: Instant) {
        log::info!("Entering game: {:?}", start);
        if let Err(e) = record_session_start(self.store.as_mut(), start) {
            log::error!("Failed to record menu choice: {:#}", e);
        }
        self.state.reset();
        self.ticker.start(now);
    }

    pub fn apply(&mut self, cmd: Command, now: Instant) -> Flow {
        match cmd {
            Command::Turn(dir) => self.state.set_direction(dir),
            Command::Restart if self.state.status() == GameStatus::Over => {
                self.state.reset();
                self.ticker.start(now);
            }
            Command::Quit => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    /// Runs a tick if one is due. Persists a new record and stops the timer on game over.
    pub fn update(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.ticker.poll(now) {
            return None;
        }

        let outcome = self.state.tick();

        if outcome.ended.is_some() {
            self.ticker.stop();
        }

        if let Some(high_score) = outcome.new_high_score {
            if let Err(e) = save_high_score(self.store.as_mut(), high_score) {
                log::error!("Failed to save high score: {:#}", e);
            }
        }

        Some(outcome)
    }

    pub fn wait_hint(&self, now: Instant) -> Duration {
        let cap = Duration::from_millis(INPUT_POLL_MS);
        self.ticker.remaining(now).map_or(cap, |left| left.min(cap))
    }
}

pub struct SnakeGame {
    session: Session,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: &AppConfig, store: Box<dyn KeyValueStore>) -> Result<Self> {
        let term = TermManager::new()?;
        term.ensure_fits(config.width, config.height)?;
        let session = Session::new(config, store, Instant::now());
        Ok(SnakeGame { session, term })
    }

    /// Sets up the terminal, runs until the player quits, and always restores it.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let result = self.run_inner();
        let restored = self.term.restore();
        result.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_inner(&mut self) -> Result<()> {
        let start = match self.show_menu()? {
            Some(start) => start,
            None => return Ok(()),
        };

        self.session.start(start, Instant::now());
        self.draw_fresh_board()?;

        loop {
            let now = Instant::now();
            for key_ev in self.term.read_key_events_queue(self.session.wait_hint(now))? {
                let cmd = match command_for(&key_ev) {
                    Some(cmd) => cmd,
                    None => continue,
                };

                let was_over = self.session.state().status() == GameStatus::Over;
                if self.session.apply(cmd, Instant::now()) == Flow::Quit {
                    return Ok(());
                }
                if was_over && self.session.state().status() == GameStatus::Running {
                    self.draw_fresh_board()?;
                }
            }

            if let Some(outcome) = self.session.update(Instant::now()) {
                self.term.draw_snapshot(&self.session.state().snapshot());
                if let Some(reason) = outcome.ended {
                    self.game_over(reason);
                }
            }
        }
    }

    fn show_menu(&mut self) -> Result<Option<SessionStart>> {
        let high_score = format!("Your High Score: {}", self.session.state().high_score());
        self.term.show_message(&[
            "SNAKE",
            "",
            high_score.as_str(),
            "",
            "N - New Game",
            "C - Continue",
            "Q - Quit",
            "",
            "Arrow keys or WASD to move",
        ]);

        loop {
            match command_for(&self.term.read_key_blocking()?) {
                Some(Command::NewGame) => return Ok(Some(SessionStart::NewGame)),
                Some(Command::Continue) => return Ok(Some(SessionStart::Continue)),
                Some(Command::Quit) => return Ok(None),
                _ => {}
            }
        }
    }

    fn draw_fresh_board(&mut self) -> Result<()> {
        let snap = self.session.state().snapshot();
        self.term.clear()?;
        self.term.draw_borders(snap.width as TermInt, snap.height as TermInt);
        self.term.draw_snapshot(&snap);
        Ok(())
    }

    fn game_over(&mut self, reason: EndReason) {
        let state = self.session.state();
        let title = match reason {
            EndReason::BoardFull => "You filled the board!",
            EndReason::Wall | EndReason::SelfCollision => "Game over!",
        };
        let score = format!("Score: {}", state.score());
        let high_score = format!("High Score: {}", state.high_score());

        self.term.show_message(&[
            title,
            score.as_str(),
            high_score.as_str(),
            "",
            "Press R to play again,",
            "or Q to quit.",
        ]);
    }
}
