//! Paddle input state and glitch filtering

use portable_atomic::{AtomicBool, Ordering};
use crate::types::PaddleSide;

/// Logical paddle state as seen by the state machine, swap already resolved
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaddleState {
    pub dot: bool,
    pub dash: bool,
}

impl PaddleState {
    pub const fn new(dot: bool, dash: bool) -> Self {
        Self { dot, dash }
    }

    /// Both paddles pressed (squeeze)
    pub const fn both_pressed(&self) -> bool {
        self.dot && self.dash
    }

    /// Both paddles released
    pub const fn both_released(&self) -> bool {
        !self.dot && !self.dash
    }
}

/// Physical contact that drives the logical `which` paddle.
///
/// With paddles reversed the dot element is keyed from the dash contact and
/// vice versa.
pub const fn logical(which: PaddleSide, reversed: bool) -> PaddleSide {
    if reversed {
        which.opposite()
    } else {
        which
    }
}

/// Active-low contact convention: a low level means the paddle is closed
pub const fn pressed_from_level(level_high: bool) -> bool {
    !level_high
}

/// Atomic paddle input state management
/// Safe for use in interrupt and callback contexts
pub struct PaddleInput {
    dot_contact: AtomicBool,
    dash_contact: AtomicBool,
}

impl PaddleInput {
    /// Create new paddle input manager, both contacts open
    pub const fn new() -> Self {
        Self {
            dot_contact: AtomicBool::new(false),
            dash_contact: AtomicBool::new(false),
        }
    }

    /// Record a debounced, polarity-corrected edge on a physical contact
    pub fn on_paddle_edge(&self, side: PaddleSide, pressed: bool) {
        self.contact(side).store(pressed, Ordering::Release);
    }

    /// Record a raw line level from an active-low contact
    pub fn on_level(&self, side: PaddleSide, level_high: bool) {
        self.on_paddle_edge(side, pressed_from_level(level_high));
    }

    /// Whether a physical contact is closed
    pub fn is_closed(&self, side: PaddleSide) -> bool {
        self.contact(side).load(Ordering::Acquire)
    }

    /// Snapshot of the logical dot/dash paddles
    pub fn state(&self, reversed: bool) -> PaddleState {
        PaddleState {
            dot: self.is_closed(logical(PaddleSide::Dot, reversed)),
            dash: self.is_closed(logical(PaddleSide::Dash, reversed)),
        }
    }

    /// Open both contacts
    pub fn reset(&self) {
        self.dot_contact.store(false, Ordering::Release);
        self.dash_contact.store(false, Ordering::Release);
    }

    fn contact(&self, side: PaddleSide) -> &AtomicBool {
        match side {
            PaddleSide::Dot => &self.dot_contact,
            PaddleSide::Dash => &self.dash_contact,
        }
    }
}

impl Default for PaddleInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Default steady time before a contact change is believed
pub const DEFAULT_GLITCH_MS: u32 = 25;

/// Steady-time glitch filter for one contact.
///
/// A new level is reported only after it has held for `steady_ms`, and it is
/// reported at the moment the hold completes. Shorter pulses are dropped.
#[derive(Copy, Clone, Debug)]
pub struct GlitchFilter {
    steady_ms: u32,
    stable: bool,
    candidate: bool,
    since_ms: u64,
}

impl GlitchFilter {
    pub const fn new(steady_ms: u32) -> Self {
        Self {
            steady_ms,
            stable: false,
            candidate: false,
            since_ms: 0,
        }
    }

    /// Feed a raw (polarity-corrected) sample observed at `now_ms`
    pub fn on_raw(&mut self, pressed: bool, now_ms: u64) {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.since_ms = now_ms;
        }
    }

    /// Time at which the pending level becomes stable, if one is pending
    pub fn deadline(&self) -> Option<u64> {
        if self.candidate != self.stable {
            Some(self.since_ms + self.steady_ms as u64)
        } else {
            None
        }
    }

    /// Returns the newly confirmed level once the steady time has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<bool> {
        match self.deadline() {
            Some(deadline) if now_ms >= deadline => {
                self.stable = self.candidate;
                Some(self.stable)
            }
            _ => None,
        }
    }

    /// Last confirmed level
    pub fn stable(&self) -> bool {
        self.stable
    }
}

impl Default for GlitchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_GLITCH_MS)
    }
}
