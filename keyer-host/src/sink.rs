//! Console key output

use std::time::Instant;

use keyer_core::{Element, HalError, OutputKey, TimingParameters};
use log::{debug, info};

/// Key output that reports each mark through the log.
///
/// Marks are classified against the keyer's dot length so the log reads as
/// a stream of dots and dashes.
pub struct ConsoleKey {
    state: bool,
    tone_hz: u32,
    down_at: Option<Instant>,
    dot_ms: u128,
    marks: u64,
}

impl ConsoleKey {
    pub fn new(timing: TimingParameters) -> Self {
        Self {
            state: false,
            tone_hz: 0,
            down_at: None,
            dot_ms: timing.dot_ticks as u128,
            marks: 0,
        }
    }

    /// Number of completed marks
    pub fn marks(&self) -> u64 {
        self.marks
    }

    /// Current sidetone, 0 when silent
    pub fn tone_hz(&self) -> u32 {
        self.tone_hz
    }

    fn classify(&self, held_ms: u128) -> Element {
        // Anything longer than two dots reads as a dash
        if held_ms <= self.dot_ms * 2 {
            Element::Dot
        } else {
            Element::Dash
        }
    }
}

impl OutputKey for ConsoleKey {
    type Error = HalError;

    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        if state {
            self.down_at = Some(Instant::now());
            debug!("key down");
        } else if let Some(down_at) = self.down_at.take() {
            let held_ms = down_at.elapsed().as_millis();
            self.marks += 1;
            info!("{} ({} ms)", self.classify(held_ms).symbol(), held_ms);
        }
        self.state = state;
        Ok(())
    }

    fn get_state(&self) -> Result<bool, Self::Error> {
        Ok(self.state)
    }

    fn set_tone(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        if freq_hz > 0 {
            debug!("sidetone {} Hz", freq_hz);
        }
        self.tone_hz = freq_hz;
        Ok(())
    }
}
