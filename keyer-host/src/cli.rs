//! Command-line configuration

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use keyer_core::{KeyerConfig, KeyerMode, DEFAULT_GLITCH_MS};

use crate::error::Result;

/// Iambic CW keyer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "iambic",
    version,
    about = "Iambic CW keyer: paddle events in, timed key output out",
    long_about = "Replays a script of timed paddle events through an iambic keyer and \
                  logs the resulting key output. Script lines read \
                  `<delay_ms> <dot|dash|left|right> <down|up|low|high>`; the script is \
                  read from stdin when no path is given."
)]
pub struct Cli {
    /// Speed in words per minute
    #[arg(short = 's', long = "speed", default_value_t = 20,
          value_parser = clap::value_parser!(u32).range(1..=60))]
    pub speed: u32,

    /// Dash weight in percent (50 = standard 3:1)
    #[arg(short = 'w', long = "weight", default_value_t = 50,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    pub weight: u32,

    /// Mode: 0 = straight or bug, 1 = iambic A, 2 = iambic B
    #[arg(short = 'm', long = "mode", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(0..=2))]
    pub mode: u8,

    /// Strict letter spacing (0 = off, 1 = on)
    #[arg(short = 'c', long = "letter-space", default_value = "0",
          action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub letter_space: bool,

    /// Sidetone frequency in Hz
    #[arg(short = 'f', long = "sidetone", default_value_t = 800,
          value_parser = clap::value_parser!(u32).range(100..=4000))]
    pub sidetone: u32,

    /// Swap dot and dash paddles (0 = off, 1 = on)
    #[arg(short = 'r', long = "reverse", default_value = "0",
          action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub reverse: bool,

    /// Contact glitch filter: minimum steady time in ms
    #[arg(short = 'g', long = "glitch-ms", default_value_t = DEFAULT_GLITCH_MS)]
    pub glitch_ms: u32,

    /// Paddle event script (stdin if omitted)
    pub script: Option<PathBuf>,
}

impl Cli {
    /// Build the validated keyer configuration
    pub fn keyer_config(&self) -> Result<KeyerConfig> {
        let mode = KeyerMode::try_from(self.mode)?;
        Ok(KeyerConfig::new(
            mode,
            self.speed,
            self.weight,
            self.letter_space,
            self.sidetone,
            self.reverse,
        )?)
    }
}
