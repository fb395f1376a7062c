//! Hardware seams: key line and sidetone out

use embedded_hal::digital::OutputPin;

/// Failures reported by keyer I/O
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// A pin read or write failed
    GpioError,
    /// The sidetone generator rejected a frequency change
    ToneError,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "key line GPIO access failed"),
            HalError::ToneError => write!(f, "sidetone generator failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Key line driven by the keyer.
///
/// The keyer calls `set_state` only on edges, each followed by `set_tone`.
pub trait OutputKey {
    type Error: From<HalError>;

    /// Key down (`true`) or key up (`false`)
    fn set_state(&mut self, state: bool) -> Result<(), Self::Error>;

    /// Last level written
    fn get_state(&self) -> Result<bool, Self::Error>;

    /// Start the sidetone at `freq_hz`, or silence it with 0
    fn set_tone(&mut self, _freq_hz: u32) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Key line on an `embedded-hal` output pin, optionally inverted for
/// active-low keying transistors
pub struct EmbeddedHalKeyOutput<P> {
    pin: P,
    inverted: bool,
    state: bool,
}

impl<P> EmbeddedHalKeyOutput<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            state: false,
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> OutputKey for EmbeddedHalKeyOutput<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        let output_state = if self.inverted { !state } else { state };
        if output_state {
            self.pin.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.state = state;
        Ok(())
    }

    fn get_state(&self) -> Result<bool, Self::Error> {
        // Last commanded level; output pins are not read back
        Ok(self.state)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! In-memory key line for tests

    use super::*;
    use std::vec::Vec;

    /// Key output that records every call
    #[derive(Default)]
    pub struct MockKeyOutput {
        state: bool,
        tone_hz: u32,
        edges: Vec<bool>,
        tones: Vec<u32>,
        fail: bool,
    }

    impl MockKeyOutput {
        pub fn new() -> Self {
            Self::default()
        }

        /// Output that rejects every write
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn is_active(&self) -> bool {
            self.state
        }

        /// Current sidetone, 0 when silent
        pub fn tone_hz(&self) -> u32 {
            self.tone_hz
        }

        /// Every level passed to `set_state`, in order
        pub fn edges(&self) -> &[bool] {
            &self.edges
        }

        /// Every frequency passed to `set_tone`, in order
        pub fn tones(&self) -> &[u32] {
            &self.tones
        }
    }

    impl OutputKey for MockKeyOutput {
        type Error = HalError;

        fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
            if self.fail {
                return Err(HalError::GpioError);
            }
            self.state = state;
            self.edges.push(state);
            Ok(())
        }

        fn get_state(&self) -> Result<bool, Self::Error> {
            Ok(self.state)
        }

        fn set_tone(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
            if self.fail {
                return Err(HalError::ToneError);
            }
            self.tone_hz = freq_hz;
            self.tones.push(freq_hz);
            Ok(())
        }
    }
}
