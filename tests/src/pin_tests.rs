//! embedded-hal key output against mocked GPIO

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
    use keyer_core::hal::EmbeddedHalKeyOutput;
    use keyer_core::{Keyer, KeyerMode, OutputKey, PaddleInput, PaddleSide};

    use crate::config;

    #[test]
    fn test_key_output_drives_pin() {
        let expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut key = EmbeddedHalKeyOutput::new(PinMock::new(&expectations), false);

        key.set_state(true).unwrap();
        assert!(key.get_state().unwrap());
        key.set_state(false).unwrap();
        assert!(!key.get_state().unwrap());

        key.release().done();
    }

    #[test]
    fn test_inverted_key_output() {
        let expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let mut key = EmbeddedHalKeyOutput::new(PinMock::new(&expectations), true);

        // Logical state is reported, not the pin level
        key.set_state(true).unwrap();
        assert!(key.get_state().unwrap());
        key.set_state(false).unwrap();

        key.release().done();
    }

    #[test]
    fn test_keyer_drives_pin_for_hand_keyed_mark() {
        // One edge per transition, nothing in between
        let expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let output = EmbeddedHalKeyOutput::new(PinMock::new(&expectations), false);
        let mut keyer = Keyer::new(config(KeyerMode::Straight, 20), output);
        let paddles = PaddleInput::new();

        paddles.on_paddle_edge(PaddleSide::Dash, true);
        keyer.wake();
        assert_eq!(keyer.tick(&paddles).unwrap(), Some(true));
        assert!(keyer.is_idle());

        // Redundant wakes while held produce no pin writes
        for _ in 0..3 {
            keyer.wake();
            assert_eq!(keyer.tick(&paddles).unwrap(), None);
        }

        paddles.on_paddle_edge(PaddleSide::Dash, false);
        keyer.wake();
        assert_eq!(keyer.tick(&paddles).unwrap(), Some(false));

        keyer.into_output().release().done();
    }

    #[test]
    fn test_keyer_release_drops_pin() {
        let expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let output = EmbeddedHalKeyOutput::new(PinMock::new(&expectations), false);
        let mut keyer = Keyer::new(config(KeyerMode::IambicA, 20), output);
        let paddles = PaddleInput::new();

        paddles.on_paddle_edge(PaddleSide::Dot, true);
        keyer.wake();
        for _ in 0..10 {
            keyer.tick(&paddles).unwrap();
        }
        assert!(keyer.output().get_state().unwrap());

        keyer.release().unwrap();
        assert!(keyer.is_idle());

        keyer.into_output().release().done();
    }
}
