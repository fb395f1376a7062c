//! Keyer driver: couples the state machine to live paddles and an output

use crate::controller::PaddleInput;
use crate::fsm::KeyerFSM;
use crate::hal::OutputKey;
use crate::types::KeyerConfig;

/// State machine plus the key output it drives.
///
/// Output changes are pushed to the sink only on edges. The sidetone
/// frequency is read from the configuration at the moment the key goes down.
pub struct Keyer<K: OutputKey> {
    fsm: KeyerFSM,
    output: K,
}

impl<K: OutputKey> Keyer<K> {
    pub fn new(config: KeyerConfig, output: K) -> Self {
        Self {
            fsm: KeyerFSM::new(config),
            output,
        }
    }

    /// Start a session if idle
    pub fn wake(&mut self) {
        self.fsm.wake();
    }

    pub fn is_idle(&self) -> bool {
        self.fsm.is_idle()
    }

    /// Run one tick against the current paddle state.
    ///
    /// Paddles are mapped with the swap setting of the configuration this
    /// tick runs under, including one that CHECK is about to apply.
    /// Returns the output edge produced by this tick, if any.
    pub fn tick(&mut self, paddles: &PaddleInput) -> Result<Option<bool>, K::Error> {
        let state = paddles.state(self.fsm.next_step_config().paddles_reversed);
        let edge = self.fsm.step(state);
        if let Some(level) = edge {
            self.apply(level)?;
        }
        Ok(edge)
    }

    /// Queue a configuration change for the next character boundary
    pub fn reconfigure(&mut self, config: KeyerConfig) {
        self.fsm.reconfigure(config);
    }

    /// Force the key up and go idle
    pub fn release(&mut self) -> Result<(), K::Error> {
        if let Some(level) = self.fsm.force_release() {
            self.apply(level)?;
        }
        Ok(())
    }

    pub fn fsm(&self) -> &KeyerFSM {
        &self.fsm
    }

    pub fn output(&self) -> &K {
        &self.output
    }

    pub fn into_output(self) -> K {
        self.output
    }

    fn apply(&mut self, level: bool) -> Result<(), K::Error> {
        self.output.set_state(level)?;
        let tone = if level { self.fsm.config().sidetone_hz } else { 0 };
        self.output.set_tone(tone)
    }
}
