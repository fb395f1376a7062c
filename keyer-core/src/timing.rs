//! Speed and weight to element timing

use core::time::Duration;

/// Tick period of the keyer state machine
pub const TICK: Duration = Duration::from_millis(1);

/// Element lengths in ticks, derived from speed and weight.
///
/// Only swapped between characters; a count in flight always finishes
/// against the parameters it started with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingParameters {
    /// Dot length, also the inter-element gap
    pub dot_ticks: u32,
    /// Dash length after weighting
    pub dash_ticks: u32,
}

impl TimingParameters {
    /// PARIS timing: dot = 1200 / WPM ms, dash = dot * 3 * weight / 50.
    ///
    /// Integer arithmetic throughout, so 20 WPM gives exactly 60/180 and a
    /// weight of 66 at 20 WPM gives a 237 ms dash.
    pub const fn derive(speed_wpm: u32, weight: u32) -> Self {
        let speed = if speed_wpm == 0 { 1 } else { speed_wpm };
        let dot_ticks = 1200 / speed;
        Self {
            dot_ticks,
            dash_ticks: dot_ticks * 3 * weight / 50,
        }
    }

    /// Extra silence added by the letter space state
    pub const fn letter_space_ticks(&self) -> u32 {
        2 * self.dot_ticks
    }

    pub fn dot_duration(&self) -> Duration {
        TICK * self.dot_ticks
    }

    pub fn dash_duration(&self) -> Duration {
        TICK * self.dash_ticks
    }
}

impl From<&crate::types::KeyerConfig> for TimingParameters {
    fn from(config: &crate::types::KeyerConfig) -> Self {
        TimingParameters::derive(config.speed_wpm, config.weight)
    }
}
