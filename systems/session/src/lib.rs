#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session state machine that gates the simulation for Sky Raid.
//!
//! The session turns resolved player controls into world commands and reacts
//! to the world's loss broadcast. It never mutates the world directly.

use log::info;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_raid_core::{
    Command, Difficulty, Event, PilotInput, SessionAction, SessionState, PAUSE_DEBOUNCE_TICKS,
};

/// Configuration parameters required to construct the session system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    base_seed: u64,
}

impl Config {
    /// Creates a new configuration deriving round seeds from `base_seed`.
    #[must_use]
    pub const fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Seed from which every round seed is derived.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

/// Reproducible sequence of per-round seeds.
#[derive(Debug)]
pub struct RoundSeeds {
    rng: ChaCha8Rng,
}

impl RoundSeeds {
    /// Creates a generator whose sequence is fully determined by `base_seed`.
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(base_seed),
        }
    }

    /// Draws the seed for the next round.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Controls resolved by the adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    /// Steering and fire input forwarded to the world while playing.
    pub pilot: PilotInput,
    /// Whether the pause toggle was pressed this frame.
    pub pause_toggle: bool,
    /// Discrete action requested through a shortcut or widget.
    pub action: Option<SessionAction>,
}

/// Read-only snapshot of the session used for scene population.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current lifecycle state.
    pub state: SessionState,
    /// Tier of the current or most recent round.
    pub difficulty: Difficulty,
    /// Score of the most recently lost round.
    pub final_score: Option<u64>,
    /// Frames remaining before another pause or resume is honoured.
    pub pause_cooldown: u32,
}

/// Pure system that drives the menu, pause and game-over lifecycle.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    difficulty: Difficulty,
    final_score: Option<u64>,
    pause_cooldown: u32,
    seeds: RoundSeeds,
    exit_requested: bool,
}

impl Session {
    /// Creates a session resting on the menu.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: SessionState::Menu,
            difficulty: Difficulty::Normal,
            final_score: None,
            pause_cooldown: 0,
            seeds: RoundSeeds::new(config.base_seed()),
            exit_requested: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Tier of the current or most recent round.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Reports whether the player asked to leave the game.
    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Captures the externally visible session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            difficulty: self.difficulty,
            final_score: self.final_score,
            pause_cooldown: self.pause_cooldown,
        }
    }

    /// Consumes the controls of one frame and emits the resulting world commands.
    ///
    /// Only the playing state emits [`Command::Tick`].
    pub fn handle(&mut self, controls: &Controls, out: &mut Vec<Command>) {
        match self.state {
            SessionState::Menu => {
                if let Some(SessionAction::SelectDifficulty(difficulty)) = controls.action {
                    self.start_round(difficulty, out);
                }
            }
            SessionState::Playing => {
                self.pause_cooldown = self.pause_cooldown.saturating_sub(1);
                if controls.action == Some(SessionAction::ReturnToMenu) {
                    self.return_to_menu(out);
                    return;
                }

                out.push(Command::Tick {
                    input: controls.pilot,
                });

                let wants_pause =
                    controls.pause_toggle || controls.action == Some(SessionAction::Pause);
                if wants_pause && self.pause_cooldown == 0 {
                    self.pause_cooldown = PAUSE_DEBOUNCE_TICKS;
                    self.transition(SessionState::Paused);
                }
            }
            SessionState::Paused => {
                self.pause_cooldown = self.pause_cooldown.saturating_sub(1);
                match controls.action {
                    Some(SessionAction::ReturnToMenu) => self.return_to_menu(out),
                    action => {
                        let wants_resume =
                            controls.pause_toggle || action == Some(SessionAction::Resume);
                        if wants_resume && self.pause_cooldown == 0 {
                            self.pause_cooldown = PAUSE_DEBOUNCE_TICKS;
                            self.transition(SessionState::Playing);
                        }
                    }
                }
            }
            SessionState::Ended => match controls.action {
                Some(SessionAction::Retry) => self.start_round(self.difficulty, out),
                Some(SessionAction::ReturnToMenu) => self.return_to_menu(out),
                Some(SessionAction::GiveUp) => {
                    self.return_to_menu(out);
                    self.exit_requested = true;
                    info!("exit requested");
                }
                _ => {}
            },
        }
    }

    /// Reacts to events broadcast by the world.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::RoundLost { score } = event {
                if matches!(self.state, SessionState::Playing | SessionState::Paused) {
                    self.final_score = Some(*score);
                    self.transition(SessionState::Ended);
                }
            }
        }
    }

    fn start_round(&mut self, difficulty: Difficulty, out: &mut Vec<Command>) {
        let seed = self.seeds.next_seed();
        self.difficulty = difficulty;
        self.final_score = None;
        self.pause_cooldown = 0;
        out.push(Command::StartRound {
            parameters: difficulty.parameters(),
            seed,
        });
        info!("starting {} round", difficulty.label());
        self.transition(SessionState::Playing);
    }

    fn return_to_menu(&mut self, out: &mut Vec<Command>) {
        out.push(Command::ClearRound);
        self.pause_cooldown = 0;
        self.transition(SessionState::Menu);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!("session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
