//! Test utilities for keyer core functionality
//!
//! [`KeyerSimulator`] runs the keyer on virtual ticks the way the host worker
//! runs it on a 1 ms timer: a wake-worthy paddle edge leaves a pending wake,
//! the idle keyer consumes it on the next tick, and a running keyer steps once
//! per tick until it returns to idle.

use std::vec::Vec;

use crate::controller::PaddleInput;
use crate::hal::mock::MockKeyOutput;
use crate::keyer::Keyer;
use crate::types::{Element, KeyerConfig, PaddleSide};

/// One key-down interval, in ticks
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    pub start: u64,
    pub len: u64,
}

impl Mark {
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Scheduled physical paddle change
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaddleEvent {
    pub at: u64,
    pub side: PaddleSide,
    pub pressed: bool,
}

impl PaddleEvent {
    pub const fn new(at: u64, side: PaddleSide, pressed: bool) -> Self {
        Self { at, side, pressed }
    }

    /// Same event on the other contact
    pub const fn mirrored(&self) -> Self {
        Self {
            side: self.side.opposite(),
            ..*self
        }
    }
}

/// Tick-accurate keyer harness with output capture
pub struct KeyerSimulator {
    keyer: Keyer<MockKeyOutput>,
    paddles: PaddleInput,
    config: KeyerConfig,
    now: u64,
    wake_pending: bool,
    edges: Vec<(u64, bool)>,
}

impl KeyerSimulator {
    pub fn new(config: KeyerConfig) -> Self {
        Self {
            keyer: Keyer::new(config, MockKeyOutput::new()),
            paddles: PaddleInput::new(),
            config,
            now: 0,
            wake_pending: false,
            edges: Vec::new(),
        }
    }

    /// Current virtual time in ticks
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn keyer(&self) -> &Keyer<MockKeyOutput> {
        &self.keyer
    }

    pub fn is_idle(&self) -> bool {
        self.keyer.is_idle() && !self.wake_pending
    }

    /// Change a physical contact now
    pub fn set_paddle(&mut self, side: PaddleSide, pressed: bool) {
        self.paddles.on_paddle_edge(side, pressed);
        if self.config.mode.wakes_on(pressed) {
            self.wake_pending = true;
        }
    }

    pub fn press(&mut self, side: PaddleSide) {
        self.set_paddle(side, true);
    }

    pub fn release(&mut self, side: PaddleSide) {
        self.set_paddle(side, false);
    }

    /// Raise a wake without touching the paddles
    pub fn wake(&mut self) {
        self.wake_pending = true;
    }

    /// Queue a configuration change; the wake rule follows the new mode at once
    pub fn reconfigure(&mut self, config: KeyerConfig) {
        self.config = config;
        self.keyer.reconfigure(config);
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        if self.keyer.is_idle() && self.wake_pending {
            self.wake_pending = false;
            self.keyer.wake();
        }
        if !self.keyer.is_idle() {
            if let Ok(Some(level)) = self.keyer.tick(&self.paddles) {
                self.edges.push((self.now, level));
            }
        }
        self.now += 1;
    }

    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Run until `deadline` (absolute tick)
    pub fn run_until(&mut self, deadline: u64) {
        while self.now < deadline {
            self.tick();
        }
    }

    /// Run until the keyer is idle with nothing pending, up to `limit` ticks
    pub fn run_until_idle(&mut self, limit: u64) {
        for _ in 0..limit {
            if self.is_idle() {
                return;
            }
            self.tick();
        }
    }

    /// Apply a schedule of paddle events, then keep running until `end`
    pub fn play(&mut self, events: &[PaddleEvent], end: u64) {
        let mut sorted = events.to_vec();
        sorted.sort_by_key(|event| event.at);
        for event in sorted {
            self.run_until(event.at);
            self.set_paddle(event.side, event.pressed);
        }
        self.run_until(end);
    }

    /// Output edges as (tick, level)
    pub fn edges(&self) -> &[(u64, bool)] {
        &self.edges
    }

    /// Current output level
    pub fn output(&self) -> bool {
        self.keyer.output().is_active()
    }

    /// Completed key-down intervals
    pub fn marks(&self) -> Vec<Mark> {
        let mut marks = Vec::new();
        let mut down_at = None;
        for &(at, level) in &self.edges {
            match (level, down_at) {
                (true, None) => down_at = Some(at),
                (false, Some(start)) => {
                    marks.push(Mark { start, len: at - start });
                    down_at = None;
                }
                _ => {}
            }
        }
        marks
    }

    /// Key-up intervals between consecutive marks
    pub fn gaps(&self) -> Vec<u64> {
        self.marks()
            .windows(2)
            .map(|pair| pair[1].start - pair[0].end())
            .collect()
    }

    /// Completed marks classified against the configured timing
    pub fn elements(&self) -> Vec<Element> {
        let dot = self.keyer.fsm().timing().dot_ticks as u64;
        self.marks()
            .iter()
            .map(|mark| if mark.len <= dot { Element::Dot } else { Element::Dash })
            .collect()
    }

    /// Completed marks as Morse notation
    pub fn morse(&self) -> heapless::String<256> {
        let mut out = heapless::String::new();
        for element in self.elements() {
            out.push(element.symbol()).ok();
        }
        out
    }
}
