#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Keyer Core
//!
//! Iambic keyer state machine and timing engine.
//! Supports straight/bug, Iambic Mode A and Iambic Mode B keying with
//! dot/dash memory and automatic letter spacing, driven by a fixed 1 ms tick.

pub mod types;
pub mod timing;
pub mod controller;
pub mod fsm;
pub mod keyer;
pub mod hal;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


pub use types::*;
pub use timing::*;
pub use controller::*;
pub use fsm::*;
pub use keyer::*;
pub use hal::{HalError, OutputKey};

/// Keyer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
