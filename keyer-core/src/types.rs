//! Core data types for the iambic keyer

/// Morse code elements
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Dot (short element)
    Dot,
    /// Dash (long element)
    Dash,
}

impl Element {
    /// Returns the opposite element (Dot <-> Dash)
    pub const fn opposite(&self) -> Element {
        match self {
            Element::Dot => Element::Dash,
            Element::Dash => Element::Dot,
        }
    }

    /// Morse notation for this element
    pub const fn symbol(&self) -> char {
        match self {
            Element::Dot => '.',
            Element::Dash => '-',
        }
    }
}

/// Keyer operating modes
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerMode {
    /// Straight key on the dash contact, automatic dots on the dot contact (bug)
    Straight,
    /// Iambic A: memory set during an element is cancelled if both paddles release
    IambicA,
    /// Iambic B: memory once set is always serviced
    IambicB,
}

impl KeyerMode {
    /// Returns true for both iambic variants
    pub const fn is_iambic(&self) -> bool {
        !matches!(self, KeyerMode::Straight)
    }

    /// Whether a paddle edge must wake an idle keyer.
    ///
    /// Presses always wake it. In straight mode releases wake it as well so
    /// the hand-keyed dash contact can be followed on both edges.
    pub const fn wakes_on(&self, pressed: bool) -> bool {
        pressed || matches!(self, KeyerMode::Straight)
    }

    /// Numeric mode as used on the command line
    pub const fn index(&self) -> u8 {
        match self {
            KeyerMode::Straight => 0,
            KeyerMode::IambicA => 1,
            KeyerMode::IambicB => 2,
        }
    }
}

impl TryFrom<u8> for KeyerMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyerMode::Straight),
            1 => Ok(KeyerMode::IambicA),
            2 => Ok(KeyerMode::IambicB),
            other => Err(ConfigError::InvalidMode(other)),
        }
    }
}

/// Physical paddle contact.
///
/// `Dot` is the left contact and `Dash` the right one when paddles are not
/// reversed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleSide {
    /// Dot contact (left)
    Dot,
    /// Dash contact (right)
    Dash,
}

impl PaddleSide {
    /// Returns the opposite paddle side
    pub const fn opposite(&self) -> PaddleSide {
        match self {
            PaddleSide::Dot => PaddleSide::Dash,
            PaddleSide::Dash => PaddleSide::Dot,
        }
    }
}

/// FSM states for the keyer
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerState {
    /// Entered on wake: inspect paddles and pick the first element
    Check,
    /// Clear memories before a dot
    PreDot,
    /// Clear memories before a dash
    PreDash,
    /// Output asserted for one dot period
    SendDot,
    /// Output asserted for one dash period
    SendDash,
    /// One dot period of silence after a dot
    DotDelay,
    /// One dot period of silence after a dash
    DashDelay,
    /// Decide what follows a dot
    DotHeld,
    /// Decide what follows a dash
    DashHeld,
    /// Two further dot periods completing the inter-letter gap
    LetterSpace,
    /// Idle, waiting for the next wake
    Exit,
}

/// Configuration validation failures
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Speed outside 1..=60 WPM
    InvalidSpeed(u32),
    /// Weight outside 1..=100 percent
    InvalidWeight(u32),
    /// Mode other than 0, 1 or 2
    InvalidMode(u8),
    /// Sidetone outside 100..=4000 Hz
    InvalidSidetone(u32),
}

#[cfg(feature = "std")]
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidSpeed(wpm) => {
                write!(f, "speed {} WPM out of range {}..={}", wpm, MIN_SPEED_WPM, MAX_SPEED_WPM)
            }
            ConfigError::InvalidWeight(weight) => {
                write!(f, "weight {} out of range {}..={}", weight, MIN_WEIGHT, MAX_WEIGHT)
            }
            ConfigError::InvalidMode(mode) => {
                write!(f, "mode {} is not 0 (straight), 1 (iambic A) or 2 (iambic B)", mode)
            }
            ConfigError::InvalidSidetone(hz) => write!(
                f,
                "sidetone {} Hz out of range {}..={}",
                hz, MIN_SIDETONE_HZ, MAX_SIDETONE_HZ
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

pub const MIN_SPEED_WPM: u32 = 1;
pub const MAX_SPEED_WPM: u32 = 60;
pub const MIN_WEIGHT: u32 = 1;
pub const MAX_WEIGHT: u32 = 100;
pub const MIN_SIDETONE_HZ: u32 = 100;
pub const MAX_SIDETONE_HZ: u32 = 4000;

/// Keyer configuration parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyerConfig {
    /// Operating mode
    pub mode: KeyerMode,
    /// Speed in words per minute (PARIS)
    pub speed_wpm: u32,
    /// Dash weighting in percent, 50 is the standard 3:1 ratio
    pub weight: u32,
    /// Enforce the 3-dot inter-letter gap
    pub letter_space: bool,
    /// Sidetone frequency used while the key is down
    pub sidetone_hz: u32,
    /// Swap dot and dash contacts
    pub paddles_reversed: bool,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            mode: KeyerMode::IambicA,
            speed_wpm: 20,
            weight: 50,
            letter_space: false,
            sidetone_hz: 800,
            paddles_reversed: false,
        }
    }
}

impl KeyerConfig {
    /// Create a new configuration with validation
    pub fn new(
        mode: KeyerMode,
        speed_wpm: u32,
        weight: u32,
        letter_space: bool,
        sidetone_hz: u32,
        paddles_reversed: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            mode,
            speed_wpm,
            weight,
            letter_space,
            sidetone_hz,
            paddles_reversed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPEED_WPM..=MAX_SPEED_WPM).contains(&self.speed_wpm) {
            return Err(ConfigError::InvalidSpeed(self.speed_wpm));
        }
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight) {
            return Err(ConfigError::InvalidWeight(self.weight));
        }
        if !(MIN_SIDETONE_HZ..=MAX_SIDETONE_HZ).contains(&self.sidetone_hz) {
            return Err(ConfigError::InvalidSidetone(self.sidetone_hz));
        }
        Ok(())
    }

    /// Copy of this configuration with a different mode
    pub fn with_mode(self, mode: KeyerMode) -> Self {
        Self { mode, ..self }
    }

    /// Copy of this configuration with letter spacing switched on or off
    pub fn with_letter_space(self, letter_space: bool) -> Self {
        Self { letter_space, ..self }
    }

    /// Copy of this configuration with paddles swapped or not
    pub fn with_paddles_reversed(self, paddles_reversed: bool) -> Self {
        Self { paddles_reversed, ..self }
    }
}
