//! Paddle reversal exchanges the contacts' roles and nothing else

#[cfg(test)]
mod tests {
    use keyer_core::test_utils::{KeyerSimulator, PaddleEvent};
    use keyer_core::{KeyerConfig, KeyerMode, PaddleSide};
    use proptest::prelude::*;

    fn paddle_event() -> impl Strategy<Value = PaddleEvent> {
        (0u64..3_000, any::<bool>(), any::<bool>()).prop_map(|(at, dash, pressed)| {
            let side = if dash { PaddleSide::Dash } else { PaddleSide::Dot };
            PaddleEvent::new(at, side, pressed)
        })
    }

    fn keyer_mode() -> impl Strategy<Value = KeyerMode> {
        prop_oneof![
            Just(KeyerMode::Straight),
            Just(KeyerMode::IambicA),
            Just(KeyerMode::IambicB),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn reversed_paddles_mirror_the_contacts(
            events in prop::collection::vec(paddle_event(), 0..24),
            mode in keyer_mode(),
            letter_space in any::<bool>(),
        ) {
            let base = KeyerConfig {
                mode,
                speed_wpm: 40,
                letter_space,
                ..KeyerConfig::default()
            };
            let mirrored: Vec<PaddleEvent> = events.iter().map(PaddleEvent::mirrored).collect();

            let mut normal = KeyerSimulator::new(base);
            normal.play(&mirrored, 6_000);

            let mut reversed = KeyerSimulator::new(base.with_paddles_reversed(true));
            reversed.play(&events, 6_000);

            prop_assert_eq!(normal.edges(), reversed.edges());
        }
    }

    #[test]
    fn test_reversed_dot_contact_sends_dashes() {
        let config = KeyerConfig::default().with_paddles_reversed(true);
        let mut sim = KeyerSimulator::new(config);

        sim.press(PaddleSide::Dot);
        sim.run_for(700);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);

        assert_eq!(sim.morse().as_str(), "---");
    }

    #[test]
    fn test_swap_change_takes_effect_on_first_element_of_next_session() {
        let mut sim = KeyerSimulator::new(KeyerConfig::default());
        sim.press(PaddleSide::Dot);
        sim.run_for(10);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);
        assert_eq!(sim.morse().as_str(), ".");

        sim.reconfigure(KeyerConfig::default().with_paddles_reversed(true));
        sim.press(PaddleSide::Dot);
        sim.run_for(10);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);

        assert_eq!(sim.morse().as_str(), ".-");
    }
}
