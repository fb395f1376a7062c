//! Iambic A, Iambic B and straight (bug) mode behavior

#[cfg(test)]
mod tests {
    use keyer_core::test_utils::{KeyerSimulator, Mark, PaddleEvent};
    use keyer_core::{KeyerMode, PaddleSide};
    use rstest::rstest;

    use crate::{config, lengths, GAP_OVERHEAD_TICKS};

    /// Squeeze from idle and return the tick the first dash keyed down
    fn squeeze_until_dash(sim: &mut KeyerSimulator) -> u64 {
        sim.press(PaddleSide::Dot);
        sim.press(PaddleSide::Dash);
        loop {
            sim.tick();
            if sim.marks().len() == 1 && sim.output() {
                return sim.now() - 1;
            }
        }
    }

    #[rstest]
    #[case::a_early(KeyerMode::IambicA, 1, ".-")]
    #[case::b_early(KeyerMode::IambicB, 1, ".-")]
    #[case::a_mid(KeyerMode::IambicA, 90, ".-")]
    #[case::b_mid(KeyerMode::IambicB, 90, ".-")]
    #[case::a_late(KeyerMode::IambicA, 179, ".-")]
    #[case::b_late(KeyerMode::IambicB, 179, ".-")]
    #[case::a_on_expiry(KeyerMode::IambicA, 181, ".-.")]
    #[case::b_on_expiry(KeyerMode::IambicB, 181, ".-")]
    #[case::a_in_delay(KeyerMode::IambicA, 185, ".-.")]
    #[case::b_in_delay(KeyerMode::IambicB, 185, ".-.")]
    fn test_squeeze_release_during_dash(
        #[case] mode: KeyerMode,
        #[case] offset: u64,
        #[case] expected: &str,
    ) {
        let mut sim = KeyerSimulator::new(config(mode, 20));
        let dash_start = squeeze_until_dash(&mut sim);
        assert_eq!(sim.marks()[0].len, 60);

        sim.run_until(dash_start + offset);
        sim.release(PaddleSide::Dot);
        sim.release(PaddleSide::Dash);
        sim.run_until_idle(5_000);

        assert!(sim.is_idle());
        assert_eq!(sim.morse().as_str(), expected);
    }

    #[rstest]
    #[case::mode_a(KeyerMode::IambicA, ".")]
    #[case::mode_b(KeyerMode::IambicB, ".")]
    fn test_squeeze_release_during_first_dot(#[case] mode: KeyerMode, #[case] expected: &str) {
        let mut sim = KeyerSimulator::new(config(mode, 20));
        sim.press(PaddleSide::Dot);
        sim.press(PaddleSide::Dash);
        sim.run_until(30);
        sim.release(PaddleSide::Dot);
        sim.release(PaddleSide::Dash);
        sim.run_until_idle(5_000);

        // Mode A drops the dash memory outright; Mode B never took it
        assert_eq!(sim.morse().as_str(), expected);
    }

    #[rstest]
    #[case::mode_a(KeyerMode::IambicA, "-.")]
    #[case::mode_b(KeyerMode::IambicB, "-")]
    fn test_dot_tap_while_dash_held(#[case] mode: KeyerMode, #[case] expected: &str) {
        let mut sim = KeyerSimulator::new(config(mode, 20));
        let events = [
            PaddleEvent::new(0, PaddleSide::Dash, true),
            PaddleEvent::new(12, PaddleSide::Dot, true),
            PaddleEvent::new(22, PaddleSide::Dot, false),
            PaddleEvent::new(185, PaddleSide::Dash, false),
        ];
        sim.play(&events, 1_000);

        assert!(sim.is_idle());
        assert_eq!(sim.morse().as_str(), expected);
    }

    #[rstest]
    #[case::mode_a(KeyerMode::IambicA)]
    #[case::mode_b(KeyerMode::IambicB)]
    fn test_dot_tap_during_dash_delay_is_remembered(#[case] mode: KeyerMode) {
        // Dash alone, dot tapped in the space after it
        let mut sim = KeyerSimulator::new(config(mode, 20));
        let events = [
            PaddleEvent::new(0, PaddleSide::Dash, true),
            PaddleEvent::new(100, PaddleSide::Dash, false),
            PaddleEvent::new(200, PaddleSide::Dot, true),
            PaddleEvent::new(210, PaddleSide::Dot, false),
        ];
        sim.play(&events, 1_000);

        assert_eq!(sim.morse().as_str(), "-.");
        let (dot, _) = lengths(sim.keyer().fsm().config());
        assert!(sim.gaps()[0] <= dot + GAP_OVERHEAD_TICKS);
    }

    #[test]
    fn test_bug_mode_dot_paddle_repeats_timed_dots() {
        let config = config(KeyerMode::Straight, 20);
        let (dot, _) = lengths(&config);
        let mut sim = KeyerSimulator::new(config);

        sim.press(PaddleSide::Dot);
        sim.run_for(3_000);

        let marks = sim.marks();
        assert!(marks.len() >= 20, "only {} dots", marks.len());
        assert!(marks.iter().all(|mark| mark.len == dot));
        for gap in sim.gaps() {
            assert!(gap >= dot && gap <= dot + GAP_OVERHEAD_TICKS, "gap {}", gap);
        }
    }

    #[test]
    fn test_bug_mode_dot_release_finishes_dot() {
        let mut sim = KeyerSimulator::new(config(KeyerMode::Straight, 20));
        sim.press(PaddleSide::Dot);
        sim.run_for(10);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);

        assert_eq!(sim.marks(), vec![Mark { start: 2, len: 60 }]);
    }

    #[test]
    fn test_bug_mode_dash_paddle_tracks_contact() {
        let mut sim = KeyerSimulator::new(config(KeyerMode::Straight, 20));
        let events = [
            PaddleEvent::new(100, PaddleSide::Dash, true),
            PaddleEvent::new(537, PaddleSide::Dash, false),
        ];
        sim.play(&events, 1_000);

        // Key follows the contact on the wake tick, no timing involved
        assert_eq!(sim.marks(), vec![Mark { start: 100, len: 437 }]);
        assert!(sim.is_idle());
    }

    #[test]
    fn test_bug_mode_short_dash_tap() {
        let mut sim = KeyerSimulator::new(config(KeyerMode::Straight, 20));
        let events = [
            PaddleEvent::new(10, PaddleSide::Dash, true),
            PaddleEvent::new(15, PaddleSide::Dash, false),
        ];
        sim.play(&events, 200);

        assert_eq!(sim.marks(), vec![Mark { start: 10, len: 5 }]);
    }

    #[rstest]
    #[case::straight(KeyerMode::Straight)]
    #[case::mode_a(KeyerMode::IambicA)]
    #[case::mode_b(KeyerMode::IambicB)]
    fn test_mode_change_waits_for_character_boundary(#[case] mode: KeyerMode) {
        let mut sim = KeyerSimulator::new(config(KeyerMode::IambicA, 20));
        sim.press(PaddleSide::Dot);
        sim.run_for(20);

        // The running dot keeps the old timing
        sim.reconfigure(config(mode, 40));
        sim.run_for(20);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);
        assert_eq!(sim.marks()[0].len, 60);

        // Next session starts with the new configuration
        sim.press(PaddleSide::Dot);
        sim.run_for(10);
        sim.release(PaddleSide::Dot);
        sim.run_until_idle(1_000);

        assert_eq!(sim.marks()[1].len, 30);
        assert_eq!(sim.keyer().fsm().config().mode, mode);
        assert_eq!(sim.keyer().fsm().timing().dot_ticks, 30);
    }
}
