//! Host runtime for the iambic keyer
//!
//! Runs the keyer core on a 1 ms tokio timer, feeds it paddle edges from a
//! timed event script and reports the key output through the log.

pub mod cli;
pub mod error;
pub mod script;
pub mod sink;
pub mod worker;

pub use cli::Cli;
pub use error::{HostError, Result};
pub use script::{filter_glitches, load_script, parse_script, play_script, EdgeHandler, ScriptEvent};
pub use sink::ConsoleKey;
pub use worker::{supervise, KeyerWorker, Shutdown};

pub use keyer_core;

/// Host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
