//! Paddle event source: timed scripts replayed into the keyer
//!
//! A script line is `<delay_ms> <contact> <action>`, the delay counted from the
//! previous line. Contacts are `dot`/`left` or `dash`/`right`. Actions are
//! `down`/`up` for closed/open, or the raw line levels `low`/`high` of the
//! active-low inputs. Blank lines and `#` comments are ignored.

use std::path::Path;
use std::sync::Arc;

use keyer_core::{pressed_from_level, GlitchFilter, KeyerMode, PaddleInput, PaddleSide};
use log::{debug, trace};
use tokio::io::AsyncReadExt;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Duration, Instant};

use crate::error::{HostError, Result};

/// One contact change at an absolute offset from the start of the script
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub side: PaddleSide,
    pub pressed: bool,
}

impl ScriptEvent {
    pub const fn new(at_ms: u64, side: PaddleSide, pressed: bool) -> Self {
        Self { at_ms, side, pressed }
    }
}

/// Parse a whole script into absolute-time events
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    let mut at_ms = 0u64;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let &[delay, contact, action] = fields.as_slice() else {
            return Err(HostError::script(
                line,
                format!("expected `<delay_ms> <contact> <action>`, got `{}`", content),
            ));
        };

        let delay: u64 = delay
            .parse()
            .map_err(|_| HostError::script(line, format!("bad delay `{}`", delay)))?;
        let side = parse_contact(contact)
            .ok_or_else(|| HostError::script(line, format!("unknown contact `{}`", contact)))?;
        let pressed = parse_action(action)
            .ok_or_else(|| HostError::script(line, format!("unknown action `{}`", action)))?;

        at_ms += delay;
        events.push(ScriptEvent::new(at_ms, side, pressed));
    }

    Ok(events)
}

fn parse_contact(word: &str) -> Option<PaddleSide> {
    match word.to_ascii_lowercase().as_str() {
        "dot" | "left" | "l" => Some(PaddleSide::Dot),
        "dash" | "right" | "r" => Some(PaddleSide::Dash),
        _ => None,
    }
}

fn parse_action(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "down" | "press" | "1" => Some(true),
        "up" | "release" | "0" => Some(false),
        "low" => Some(pressed_from_level(false)),
        "high" => Some(pressed_from_level(true)),
        _ => None,
    }
}

/// Read and parse a script file, or stdin when no path is given
pub async fn load_script(path: Option<&Path>) -> Result<Vec<ScriptEvent>> {
    let text = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| HostError::ScriptIo {
                path: path.to_path_buf(),
                source,
            })?,
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|source| HostError::ScriptIo {
                    path: "<stdin>".into(),
                    source,
                })?;
            text
        }
    };
    parse_script(&text)
}

/// Run raw contact changes through a steady-time filter per contact.
///
/// Pulses shorter than `steady_ms` disappear; surviving changes are moved
/// to the moment they became steady.
pub fn filter_glitches(events: &[ScriptEvent], steady_ms: u32) -> Vec<ScriptEvent> {
    let sides = [PaddleSide::Dot, PaddleSide::Dash];
    let mut filters = [GlitchFilter::new(steady_ms), GlitchFilter::new(steady_ms)];
    let mut out = Vec::with_capacity(events.len());

    let mut sorted = events.to_vec();
    sorted.sort_by_key(|event| event.at_ms);

    for event in &sorted {
        for (filter, side) in filters.iter_mut().zip(sides) {
            if let Some(deadline) = filter.deadline() {
                if deadline <= event.at_ms {
                    if let Some(pressed) = filter.poll(deadline) {
                        out.push(ScriptEvent::new(deadline, side, pressed));
                    }
                }
            }
        }
        let index = match event.side {
            PaddleSide::Dot => 0,
            PaddleSide::Dash => 1,
        };
        filters[index].on_raw(event.pressed, event.at_ms);
    }

    for (filter, side) in filters.iter_mut().zip(sides) {
        if let Some(deadline) = filter.deadline() {
            if let Some(pressed) = filter.poll(deadline) {
                out.push(ScriptEvent::new(deadline, side, pressed));
            }
        }
    }

    out.sort_by_key(|event| event.at_ms);
    let dropped = events.len().saturating_sub(out.len());
    if dropped > 0 {
        debug!("glitch filter dropped {} contact changes", dropped);
    }
    out
}

/// Paddle edge entry point: records contact state and wakes the worker
#[derive(Clone)]
pub struct EdgeHandler {
    paddles: Arc<PaddleInput>,
    wake: Arc<Notify>,
    mode: KeyerMode,
}

impl EdgeHandler {
    pub fn new(paddles: Arc<PaddleInput>, wake: Arc<Notify>, mode: KeyerMode) -> Self {
        Self { paddles, wake, mode }
    }

    /// Debounced, polarity-corrected edge from a physical contact.
    ///
    /// Safe to call from any task while the worker is ticking.
    pub fn on_paddle_edge(&self, side: PaddleSide, pressed: bool) {
        trace!("paddle {:?} {}", side, if pressed { "down" } else { "up" });
        self.paddles.on_paddle_edge(side, pressed);
        if self.mode.wakes_on(pressed) {
            self.wake.notify_one();
        }
    }

    /// Open both contacts, as when the operator lets go of the paddle
    pub fn release_all(&self) {
        self.on_paddle_edge(PaddleSide::Dot, false);
        self.on_paddle_edge(PaddleSide::Dash, false);
    }
}

/// Replay events in real time, then open both contacts
pub async fn play_script(events: &[ScriptEvent], handler: &EdgeHandler) {
    let start = Instant::now();
    for event in events {
        sleep_until(start + Duration::from_millis(event.at_ms)).await;
        handler.on_paddle_edge(event.side, event.pressed);
    }
    handler.release_all();
    debug!("paddle script finished after {} events", events.len());
}
