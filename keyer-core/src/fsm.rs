//! Finite State Machine implementation for iambic keyer
//!
//! One call to [`KeyerFSM::step`] is one tick: exactly one state is evaluated.
//! Timed states count ticks in `kdelay`, which is zero on entry to every
//! state and is reset when a timed state expires.

use crate::controller::PaddleState;
use crate::timing::TimingParameters;
use crate::types::{KeyerConfig, KeyerMode, KeyerState};

/// Opposite-paddle presses captured while an element is being sent
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementMemory {
    pub dot: bool,
    pub dash: bool,
}

impl ElementMemory {
    pub fn clear(&mut self) {
        self.dot = false;
        self.dash = false;
    }

    pub fn is_empty(&self) -> bool {
        !self.dot && !self.dash
    }
}

/// Main keyer FSM implementation
pub struct KeyerFSM {
    state: KeyerState,
    kdelay: u32,
    memory: ElementMemory,
    config: KeyerConfig,
    timing: TimingParameters,
    pending_config: Option<KeyerConfig>,
    output: bool,
}

impl KeyerFSM {
    /// Create new FSM with given configuration, idle and key up
    pub fn new(config: KeyerConfig) -> Self {
        Self {
            state: KeyerState::Exit,
            kdelay: 0,
            memory: ElementMemory::default(),
            timing: TimingParameters::from(&config),
            config,
            pending_config: None,
            output: false,
        }
    }

    /// Get current FSM state
    pub fn current_state(&self) -> KeyerState {
        self.state
    }

    /// Ticks spent so far in the current timed state
    pub fn kdelay(&self) -> u32 {
        self.kdelay
    }

    pub fn memory(&self) -> ElementMemory {
        self.memory
    }

    /// Current output level
    pub fn output(&self) -> bool {
        self.output
    }

    /// Timing currently in effect
    pub fn timing(&self) -> TimingParameters {
        self.timing
    }

    /// Get current configuration
    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    /// True when waiting for a wake signal
    pub fn is_idle(&self) -> bool {
        self.state == KeyerState::Exit
    }

    /// Start a keying session. Waking a running machine does nothing.
    pub fn wake(&mut self) {
        if self.state == KeyerState::Exit {
            self.kdelay = 0;
            self.transition(KeyerState::Check);
        }
    }

    /// Queue a new configuration; it takes effect on the next CHECK so an
    /// element already being timed is never stretched or cut.
    pub fn reconfigure(&mut self, config: KeyerConfig) {
        self.pending_config = Some(config);
    }

    /// Configuration waiting to be applied, if any
    pub fn pending_config(&self) -> Option<&KeyerConfig> {
        self.pending_config.as_ref()
    }

    /// Configuration the next `step` evaluates under: a queued change when
    /// that step is CHECK, the active one otherwise
    pub fn next_step_config(&self) -> &KeyerConfig {
        match (&self.pending_config, self.state) {
            (Some(pending), KeyerState::Check) => pending,
            _ => &self.config,
        }
    }

    /// Drop the key and return to idle. Returns the edge if the key was down.
    pub fn force_release(&mut self) -> Option<bool> {
        let edge = self.set_output(false);
        self.memory.clear();
        self.kdelay = 0;
        self.state = KeyerState::Exit;
        edge
    }

    /// Evaluate the current state once against live paddle state.
    ///
    /// Returns `Some(level)` only when the output changes.
    pub fn step(&mut self, paddle: PaddleState) -> Option<bool> {
        let dot = paddle.dot;
        let dash = paddle.dash;
        let mode = self.config.mode;
        let dot_ticks = self.timing.dot_ticks;
        let mut edge = None;

        match self.state {
            KeyerState::Check => {
                self.apply_pending_config();
                let mode = self.config.mode;
                if mode == KeyerMode::Straight {
                    if dash {
                        // Dash contact is a hand key
                        edge = self.set_output(true);
                        self.transition(KeyerState::Exit);
                    } else if dot {
                        self.transition(KeyerState::PreDot);
                    } else {
                        edge = self.set_output(false);
                        self.transition(KeyerState::Exit);
                    }
                } else if dot {
                    self.transition(KeyerState::PreDot);
                } else if dash {
                    self.transition(KeyerState::PreDash);
                } else {
                    edge = self.set_output(false);
                    self.transition(KeyerState::Exit);
                }
            }

            KeyerState::PreDot => {
                self.memory.clear();
                self.transition(KeyerState::SendDot);
            }

            KeyerState::PreDash => {
                self.memory.clear();
                self.transition(KeyerState::SendDash);
            }

            KeyerState::SendDot => {
                edge = self.set_output(true);
                if self.expired(dot_ticks) {
                    edge = self.merge(edge, false);
                    self.transition(KeyerState::DotDelay);
                }
                if mode == KeyerMode::IambicA {
                    if paddle.both_released() {
                        self.memory.dash = false;
                    } else if dash {
                        self.memory.dash = true;
                    }
                }
            }

            KeyerState::SendDash => {
                edge = self.set_output(true);
                if self.expired(self.timing.dash_ticks) {
                    edge = self.merge(edge, false);
                    self.transition(KeyerState::DashDelay);
                }
                if mode == KeyerMode::IambicA {
                    if paddle.both_released() {
                        self.memory.dot = false;
                    } else if dot {
                        self.memory.dot = true;
                    }
                }
            }

            KeyerState::DotDelay => {
                if self.expired(dot_ticks) {
                    if mode == KeyerMode::Straight && !dot {
                        self.transition(KeyerState::Exit);
                    } else if self.memory.dash {
                        self.transition(KeyerState::PreDash);
                    } else {
                        self.transition(KeyerState::DotHeld);
                    }
                }
                if dash {
                    self.memory.dash = true;
                }
            }

            KeyerState::DashDelay => {
                if self.expired(dot_ticks) {
                    if self.memory.dot {
                        self.transition(KeyerState::PreDot);
                    } else {
                        self.transition(KeyerState::DashHeld);
                    }
                }
                if dot {
                    self.memory.dot = true;
                }
            }

            KeyerState::DotHeld => {
                if dot {
                    self.transition(KeyerState::PreDot);
                } else if dash {
                    self.transition(KeyerState::PreDash);
                } else {
                    self.end_character();
                }
            }

            KeyerState::DashHeld => {
                if dash {
                    self.transition(KeyerState::PreDash);
                } else if dot {
                    self.transition(KeyerState::PreDot);
                } else {
                    self.end_character();
                }
            }

            KeyerState::LetterSpace => {
                if self.expired(self.timing.letter_space_ticks()) {
                    if self.memory.dot {
                        self.transition(KeyerState::PreDot);
                    } else if self.memory.dash {
                        self.transition(KeyerState::PreDash);
                    } else {
                        self.transition(KeyerState::Exit);
                    }
                }
                if dot {
                    self.memory.dot = true;
                }
                if dash {
                    self.memory.dash = true;
                }
            }

            KeyerState::Exit => {}
        }

        edge
    }

    /// Count one tick; on reaching `ticks` reset the counter and report expiry
    fn expired(&mut self, ticks: u32) -> bool {
        if self.kdelay == ticks {
            self.kdelay = 0;
            true
        } else {
            self.kdelay += 1;
            false
        }
    }

    fn end_character(&mut self) {
        if self.config.letter_space {
            self.memory.clear();
            self.transition(KeyerState::LetterSpace);
        } else {
            self.transition(KeyerState::Exit);
        }
    }

    fn apply_pending_config(&mut self) {
        if let Some(config) = self.pending_config.take() {
            self.timing = TimingParameters::from(&config);
            self.config = config;

            #[cfg(feature = "log")]
            log::debug!(
                "keyer reconfigured: {:?}, dot {} ticks, dash {} ticks",
                config.mode,
                self.timing.dot_ticks,
                self.timing.dash_ticks
            );
        }
    }

    /// Record an output level, returning it only if it changed
    fn set_output(&mut self, level: bool) -> Option<bool> {
        if self.output == level {
            None
        } else {
            self.output = level;
            Some(level)
        }
    }

    /// Apply a second output change in the same tick, folding the two edges
    fn merge(&mut self, first: Option<bool>, level: bool) -> Option<bool> {
        match self.set_output(level) {
            // Raised and dropped within one tick: no visible change
            Some(_) if first.is_some() => None,
            Some(edge) => Some(edge),
            None => first,
        }
    }

    fn transition(&mut self, next: KeyerState) {
        #[cfg(feature = "log")]
        log::trace!("FSM {:?} -> {:?}", self.state, next);

        #[cfg(feature = "defmt")]
        defmt::trace!("FSM {:?} -> {:?}", self.state, next);

        self.state = next;
    }
}
