mod tests {
    use approx::assert_relative_eq;
    use led_effect_composer::input::HeaterSnapshot;
    use led_effect_composer::layer::{
        FireLayer, Layer, LayerKind, LayerParams, LayerSlot, SparkSource, TickContext,
    };
    use led_effect_composer::{Color, ExternalInputs, PixelBuffer, RandomSource, SplitMix64};

    const RED: Color = Color::new(1.0, 0.0, 0.0);
    const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Replays a fixed sequence, then returns `u32::MAX` forever
    struct Scripted {
        values: Vec<u32>,
        index: usize,
    }

    impl Scripted {
        fn new(values: Vec<u32>) -> Self {
            Self { values, index: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn next_u32(&mut self) -> u32 {
            let value = self.values.get(self.index).copied().unwrap_or(u32::MAX);
            self.index += 1;
            value
        }
    }

    fn build(kind: LayerKind, leds: usize, palette: &[Color], rate: f32, cutoff: f32) -> LayerSlot {
        kind.build(&LayerParams::new(leds, palette.to_vec(), rate, cutoff, 24.0))
    }

    fn build_at(kind: LayerKind, fps: f32, palette: &[Color], rate: f32, cutoff: f32) -> LayerSlot {
        kind.build(&LayerParams::new(5, palette.to_vec(), rate, cutoff, fps))
    }

    fn frame_at(
        slot: &mut LayerSlot,
        tick: u64,
        inputs: &ExternalInputs,
        rng: &mut dyn RandomSource,
    ) -> Option<PixelBuffer> {
        let mut ctx = TickContext { tick, inputs, rng };
        slot.next_frame(&mut ctx).cloned()
    }

    fn render(slot: &mut LayerSlot, tick: u64) -> Option<PixelBuffer> {
        frame_at(slot, tick, &ExternalInputs::default(), &mut SplitMix64::default())
    }

    fn heater(current: f32, target: f32, last_target: f32) -> ExternalInputs {
        ExternalInputs {
            heater: HeaterSnapshot {
                current,
                target,
                last_target,
            },
            ..ExternalInputs::default()
        }
    }

    #[test]
    fn test_layer_kind_names() {
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::parse_from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(LayerKind::parse_from_str("sparkle"), None);
        assert!(LayerKind::Heater.reads_inputs());
        assert!(!LayerKind::Comet.reads_inputs());
    }

    #[test]
    fn test_static_single_color() {
        let mut slot = build(LayerKind::Static, 5, &[RED], 0.0, 0.0);
        for tick in [0, 1, 100] {
            let frame = render(&mut slot, tick).unwrap();
            assert_eq!(frame.len(), 5);
            assert!(frame.iter().all(|c| c == RED));
        }
    }

    #[test]
    fn test_blink_on_off_cycle() {
        let mut slot = build_at(LayerKind::Blink, 20.0, &[RED], 0.5, 0.0);
        for tick in 0..10 {
            assert_eq!(render(&mut slot, tick).unwrap().pixel(0), RED);
        }
        for tick in 10..20 {
            assert_eq!(render(&mut slot, tick).unwrap().pixel(0), Color::OFF);
        }
        assert_eq!(render(&mut slot, 20).unwrap().pixel(0), RED);
    }

    #[test]
    fn test_breathing_envelope() {
        let mut slot = build_at(LayerKind::Breathing, 20.0, &[RED, BLUE], 1.0, 0.0);

        let dark = render(&mut slot, 0).unwrap().pixel(0);
        assert_relative_eq!(dark.r, 0.0, epsilon = 1e-4);

        let peak = render(&mut slot, 5).unwrap().pixel(0);
        assert_relative_eq!(peak.r, 1.0, epsilon = 1e-4);

        // second color takes over after one breath
        let next = render(&mut slot, 15).unwrap().pixel(0);
        assert_relative_eq!(next.b, 1.0, epsilon = 1e-4);
        assert_eq!(next.r, 0.0);

        for tick in 0..20 {
            let px = render(&mut slot, tick).unwrap().pixel(0);
            assert!((0.0..=1.0).contains(&px.r));
        }
    }

    #[test]
    fn test_strobe_flash_repeats_every_second() {
        let mut slot = build_at(LayerKind::Strobe, 10.0, &[RED], 1.0, 1.0);
        assert_eq!(render(&mut slot, 0).unwrap().pixel(0), RED);
        assert!(render(&mut slot, 1).unwrap().pixel(0).r < 0.1);
        assert_eq!(render(&mut slot, 5).unwrap().pixel(0), Color::OFF);
        assert_eq!(render(&mut slot, 10).unwrap().pixel(0), RED);
    }

    #[test]
    fn test_twinkle_ignites_and_decays() {
        let mut slot = build(LayerKind::Twinkle, 3, &[WHITE], 100.0, 1.0);
        let inputs = ExternalInputs::default();
        // every pixel ignites on the first tick, never again afterwards
        let mut rng = Scripted::new(vec![0; 6]);

        let mut levels = Vec::new();
        for tick in 0..8 {
            let frame = frame_at(&mut slot, tick, &inputs, &mut rng).unwrap();
            assert_eq!(frame.pixel(0), frame.pixel(2));
            levels.push(frame.pixel(1).g);
        }

        assert_eq!(levels[0], 1.0);
        assert!(levels[..7].windows(2).all(|w| w[1] < w[0]));
        assert!(levels[6] > 0.0);
        assert_eq!(levels[7], 0.0);
    }

    #[test]
    fn test_twinkle_reset_clears_pixels() {
        let mut slot = build(LayerKind::Twinkle, 4, &[RED], 200.0, 1.0);
        let inputs = ExternalInputs::default();
        let mut rng = Scripted::new(vec![0; 8]);
        assert_eq!(frame_at(&mut slot, 0, &inputs, &mut rng).unwrap().pixel(3), RED);

        slot.reset();
        let frame = frame_at(&mut slot, 0, &inputs, &mut rng).unwrap();
        assert!(frame.iter().all(|c| c == Color::OFF));
    }

    #[test]
    fn test_comet_moves_and_cycles() {
        let mut slot = build(LayerKind::Comet, 8, &[WHITE], 1.0, 1.0);
        let first = render(&mut slot, 0).unwrap();
        let second = render(&mut slot, 1).unwrap();

        assert_eq!(first.len(), 8);
        assert_ne!(first, second);
        assert!(first.iter().chain(second.iter()).any(|c| c.r > 0.0));
    }

    #[test]
    fn test_comet_direction_follows_rate_sign() {
        let mut forward = build(LayerKind::Comet, 8, &[WHITE], 1.0, 1.0);
        let (a, b) = (render(&mut forward, 0).unwrap(), render(&mut forward, 1).unwrap());
        for i in 0..7 {
            assert_eq!(b.pixel(i + 1), a.pixel(i));
        }

        let mut backward = build(LayerKind::Comet, 8, &[WHITE], -1.0, 1.0);
        let (a, b) = (render(&mut backward, 0).unwrap(), render(&mut backward, 1).unwrap());
        for i in 0..7 {
            assert_eq!(b.pixel(i), a.pixel(i + 1));
        }
    }

    #[test]
    fn test_chase_tiles_trail_over_strip() {
        // a cutoff of 0.3 leaves a two pixel trail: the head and one dim pixel
        let chase = render(&mut build(LayerKind::Chase, 8, &[WHITE], 0.0, 0.3), 0).unwrap();
        assert_eq!(chase.len(), 8);
        for i in (0..8).step_by(2) {
            assert_eq!(chase.pixel(i), WHITE);
            let dim = chase.pixel(i + 1).r;
            assert!(dim > 0.0 && dim < 0.1);
        }

        let comet = render(&mut build(LayerKind::Comet, 8, &[WHITE], 0.0, 0.3), 0).unwrap();
        assert_eq!(comet.pixel(0), WHITE);
        assert!(comet.iter().skip(2).all(|c| c == Color::OFF));
    }

    #[test]
    fn test_gradient_shifts_by_rounded_rate() {
        let mut slot = build(LayerKind::Gradient, 6, &[RED, BLUE], 2.0, 0.0);
        let first = render(&mut slot, 0).unwrap();
        let second = render(&mut slot, 1).unwrap();
        assert_ne!(first, second);
        for i in 0..4 {
            assert_eq!(second.pixel(i + 2), first.pixel(i));
        }
        // the closed ramp is 8 pixels long, four shifts bring it back
        assert_eq!(render(&mut slot, 4).unwrap(), first);

        let mut slot = build(LayerKind::Gradient, 6, &[RED, BLUE], -2.0, 0.0);
        let first = render(&mut slot, 0).unwrap();
        let second = render(&mut slot, 1).unwrap();
        for i in 0..4 {
            assert_eq!(second.pixel(i), first.pixel(i + 2));
        }
    }

    #[test]
    fn test_slow_gradient_holds_frames() {
        // a quarter pixel per frame holds each position for four frames
        let mut slot = build(LayerKind::Gradient, 6, &[RED, BLUE], 0.25, 0.0);
        let first = render(&mut slot, 0).unwrap();
        for tick in 1..4 {
            assert_eq!(render(&mut slot, tick).unwrap(), first);
        }

        let moved = render(&mut slot, 4).unwrap();
        assert_ne!(moved, first);
        for i in 0..5 {
            assert_eq!(moved.pixel(i + 1), first.pixel(i));
        }
    }

    #[test]
    fn test_still_gradient_with_zero_rate() {
        let mut slot = build(LayerKind::Gradient, 6, &[RED, BLUE], 0.0, 0.0);
        let first = render(&mut slot, 0).unwrap();
        assert_eq!(first.pixel(0), RED);
        assert_eq!(render(&mut slot, 17).unwrap(), first);
    }

    #[test]
    fn test_heater_tracks_target() {
        let mut slot = build(LayerKind::Heater, 4, &[BLUE, RED], 0.0, 1.0);
        let mut rng = SplitMix64::default();

        let heating = frame_at(&mut slot, 0, &heater(100.0, 200.0, 200.0), &mut rng).unwrap();
        assert_eq!(heating.pixel(0), BLUE);

        let cold = frame_at(&mut slot, 0, &heater(0.0, 200.0, 200.0), &mut rng).unwrap();
        assert_eq!(cold.pixel(3), BLUE);

        // within five degrees of the target the layer goes quiet
        assert!(frame_at(&mut slot, 0, &heater(196.0, 200.0, 200.0), &mut rng).is_none());
    }

    #[test]
    fn test_heater_holds_plateau_without_cutoff() {
        let mut slot = build(LayerKind::Heater, 4, &[BLUE, RED], 0.0, 0.0);
        let frame = frame_at(
            &mut slot,
            0,
            &heater(199.0, 200.0, 200.0),
            &mut SplitMix64::default(),
        )
        .unwrap();
        assert_eq!(frame.pixel(0), RED);
    }

    #[test]
    fn test_heater_cooldown_and_idle() {
        let mut slot = build(LayerKind::Heater, 2, &[BLUE, RED], 50.0, 1.0);
        let mut rng = SplitMix64::default();

        assert!(frame_at(&mut slot, 0, &heater(150.0, 0.0, 200.0), &mut rng).is_some());
        assert!(frame_at(&mut slot, 0, &heater(40.0, 0.0, 200.0), &mut rng).is_none());
    }

    #[test]
    fn test_progress_moves_spot() {
        let mut slot = build(LayerKind::Progress, 10, &[WHITE], 1.0, 1.0);
        let mut rng = SplitMix64::default();

        let start = ExternalInputs::default();
        let frame = frame_at(&mut slot, 0, &start, &mut rng).unwrap();
        assert_eq!(frame.pixel(0), WHITE);
        assert!(frame.iter().skip(1).all(|c| c == Color::OFF));

        let half = ExternalInputs {
            progress: 50,
            ..ExternalInputs::default()
        };
        let frame = frame_at(&mut slot, 0, &half, &mut rng).unwrap();
        assert_eq!(frame.pixel(5), WHITE);
        assert_eq!(frame.iter().filter(|&c| c != Color::OFF).count(), 1);
    }

    #[test]
    fn test_stepper_reads_stepper_position() {
        let mut slot = build(LayerKind::Stepper, 10, &[WHITE], 1.0, 1.0);
        let inputs = ExternalInputs {
            stepper_position: 30,
            progress: 90,
            ..ExternalInputs::default()
        };
        let frame = frame_at(&mut slot, 0, &inputs, &mut SplitMix64::default()).unwrap();
        assert_eq!(frame.pixel(3), WHITE);
    }

    #[test]
    fn test_stepper_trails_never_exceed_strip() {
        for rate in [1e12, f32::INFINITY] {
            let mut slot = build(LayerKind::Stepper, 10, &[WHITE, BLUE], rate, 0.0);
            let inputs = ExternalInputs {
                stepper_position: 50,
                ..ExternalInputs::default()
            };
            let frame = frame_at(&mut slot, 0, &inputs, &mut SplitMix64::default()).unwrap();
            assert_eq!(frame.len(), 10);
        }
    }

    #[test]
    fn test_analog_fades_below_cutoff() {
        let mut slot = build(LayerKind::AnalogPin, 2, &[WHITE], 1.0, 10.0);
        let mut rng = SplitMix64::default();
        let reading = |analog: f32| ExternalInputs {
            analog,
            ..ExternalInputs::default()
        };

        let lit = frame_at(&mut slot, 0, &reading(50.0), &mut rng).unwrap();
        assert!(lit.pixel(0).r > 0.4);

        let first = frame_at(&mut slot, 1, &reading(0.0), &mut rng).unwrap();
        assert_eq!(first, lit);
        let second = frame_at(&mut slot, 2, &reading(0.0), &mut rng).unwrap();
        assert!(second.pixel(0).r < lit.pixel(0).r);

        let mut last = second;
        for tick in 3..40 {
            last = frame_at(&mut slot, tick, &reading(0.0), &mut rng).unwrap();
        }
        assert_eq!(last.pixel(0), Color::OFF);
    }

    #[test]
    fn test_fire_without_sparks_stays_cold() {
        let params = LayerParams::new(20, vec![Color::OFF, RED], 0.0, 10.0, 24.0);
        let mut layer = FireLayer::new(&params, SparkSource::Random);
        let inputs = ExternalInputs::default();
        let mut rng = SplitMix64::new(7);

        for tick in 0..50 {
            let mut ctx = TickContext {
                tick,
                inputs: &inputs,
                rng: &mut rng,
            };
            let frame = layer.next_frame(&mut ctx).unwrap();
            assert!(frame.iter().all(|c| c == Color::OFF));
        }
        assert!(layer.heat().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_fire_heat_stays_bounded() {
        let params = LayerParams::new(30, vec![Color::OFF, RED, WHITE], 60.0, 5.0, 24.0);
        let mut layer = FireLayer::new(&params, SparkSource::Random);
        let inputs = ExternalInputs::default();
        let mut rng = SplitMix64::new(42);

        for tick in 0..300 {
            let mut ctx = TickContext {
                tick,
                inputs: &inputs,
                rng: &mut rng,
            };
            assert!(layer.next_frame(&mut ctx).is_some());
            assert!(layer.heat().iter().all(|&h| (0.0..=100.0).contains(&h)));
        }
        assert!(layer.heat().iter().any(|&h| h > 0.0));
    }

    #[test]
    fn test_heater_fire_sparks_follow_heater_progress() {
        // no cooling, so the spark is the only heat source on the first tick
        let params = LayerParams::new(10, vec![Color::OFF, RED], 40.0, 0.0, 24.0);

        for (current, expected) in [(100.0, 50.0), (150.0, 75.0)] {
            let mut layer = FireLayer::new(&params, SparkSource::Heater);
            let inputs = heater(current, 200.0, 200.0);
            // spark roll, cell, intensity
            let mut rng = Scripted::new(vec![100, 0, 10]);
            let mut ctx = TickContext {
                tick: 0,
                inputs: &inputs,
                rng: &mut rng,
            };
            layer.next_frame(&mut ctx);

            assert_eq!(layer.heat()[0], expected);
            assert!(layer.heat()[1..].iter().all(|&h| h == 0.0));
        }
    }

    #[test]
    fn test_heater_fire_idle_at_target() {
        let params = LayerParams::new(10, vec![Color::OFF, RED], 40.0, 0.0, 24.0);
        let mut layer = FireLayer::new(&params, SparkSource::Heater);
        let inputs = heater(210.0, 210.0, 210.0);
        let mut rng = SplitMix64::new(1);

        for tick in 0..100 {
            let mut ctx = TickContext {
                tick,
                inputs: &inputs,
                rng: &mut rng,
            };
            layer.next_frame(&mut ctx);
        }
        assert!(layer.heat().iter().all(|&h| h == 0.0));
    }
}
