mod tests {
    use figure_light::color::{BLACK, PixelExt, Rgb};
    use figure_light::layout::{Position, raster_positions};
    use figure_light::{
        DeviceApi, DisabledBroadcaster, DoubleBuffer, FIGURE_PIXEL_COUNT, FrameScheduler, Instant,
        LightController, LightControllerConfig, LightMode, MemoryStore, OutputDriver,
        PatternLibrary, RenderLoop, StrategyContext,
    };

    const N: usize = FIGURE_PIXEL_COUNT;

    #[derive(Default)]
    struct RecordingDriver {
        last: Vec<Rgb>,
    }

    impl OutputDriver for RecordingDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.last = colors.to_vec();
        }
    }

    type Sink = DoubleBuffer<RecordingDriver, N>;

    /// Frame on the LEDs once the latest request has gone through the pipeline.
    fn displayed(render: &mut RenderLoop<'_, '_, Sink, N>) -> Vec<Rgb> {
        render.render_frame(Instant::from_millis(0));
        render.render_frame(Instant::from_millis(0));
        render.sink().driver().last.clone()
    }

    type Api<'a> = DeviceApi<'a, DisabledBroadcaster, N>;

    fn new_api<'a>(
        scheduler: &'a FrameScheduler<'a, N>,
        store: &'a MemoryStore,
        positions: &'a [Position],
    ) -> Api<'a> {
        let light = LightController::new(
            scheduler,
            StrategyContext::figure(store, positions),
            DisabledBroadcaster,
            LightControllerConfig::default(),
        );
        DeviceApi::new(light, PatternLibrary::new(store, scheduler))
    }

    fn mode(api: &Api<'_>) -> LightMode {
        api.light().state().mode
    }

    #[test]
    fn test_set_rgb_params() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);
        let before = mode(&api);

        assert!(!api.set_rgb(&[("r", "10"), ("g", "20")]));
        assert!(!api.set_rgb(&[("r", "10"), ("g", "x"), ("b", "30")]));
        assert_eq!(mode(&api), before);

        assert!(api.set_rgb(&[("r", "255"), ("g", "0"), ("b", "0")]));
        assert_eq!(
            mode(&api),
            LightMode::CustomColor {
                hue: 0.0,
                saturation: 100.0,
                brightness: 255
            }
        );

        // Out of range channels are clamped.
        assert!(api.set_rgb(&[("r", "900"), ("g", "-4"), ("b", "0")]));
        assert_eq!(api.light().state().brightness, 255);
    }

    #[test]
    fn test_brightness_and_hue_saturation_params() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);

        assert!(api.set_brightness(&[("value", "40")]));
        assert_eq!(mode(&api), LightMode::SolidEffect { brightness: 40 });
        assert!(!api.set_brightness(&[("value", "bright")]));

        assert!(!api.set_hue_saturation(&[("hue", "120")]));
        assert!(!api.set_hue_saturation(&[("hue", "NaN"), ("sat", "50")]));
        assert!(api.set_hue_saturation(&[("hue", "120"), ("sat", "100")]));
        assert_eq!(
            mode(&api),
            LightMode::CustomColor {
                hue: 120.0,
                saturation: 100.0,
                brightness: 40
            }
        );
    }

    #[test]
    fn test_effect_params() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);

        assert!(api.set_effect(&[("id", "4")]));
        assert_eq!(mode(&api), LightMode::NamedAnimation(4));
        assert!(api.set_effect(&[("name", "Trains")]));
        assert_eq!(mode(&api), LightMode::NamedAnimation(5));
        assert!(api.set_effect(&[("name", "marquee")]));
        assert_eq!(mode(&api), LightMode::NamedAnimation(6));

        assert!(!api.set_effect(&[("id", "99")]));
        assert!(!api.set_effect(&[("name", "TRAINS")]));
        assert!(!api.set_effect(&[]));
        assert_eq!(mode(&api), LightMode::NamedAnimation(6));

        let effects: Vec<(u8, &str)> = api.list_effects().collect();
        assert_eq!(effects.len(), 7);
        assert_eq!(effects[0], (0, "Solid Figure"));
        assert_eq!(effects[5], (5, "Trains"));
    }

    #[test]
    fn test_switch_params_and_payloads() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);

        assert!(api.switch(&[("state", "off")]));
        assert_eq!(mode(&api), LightMode::Off);
        assert!(api.switch(&[("state", "ON")]));
        assert!(!mode(&api).is_off());
        assert!(!api.switch(&[("state", "maybe")]));

        assert!(api.on_switch_payload("OFF"));
        assert_eq!(mode(&api), LightMode::Off);
        assert!(!api.on_switch_payload("off"));
        assert!(api.on_switch_payload("ON"));
        assert!(!mode(&api).is_off());
    }

    #[test]
    fn test_messaging_payloads() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);

        assert!(api.on_white_payload("90"));
        assert_eq!(mode(&api), LightMode::SolidEffect { brightness: 90 });
        assert!(!api.on_white_payload("ninety"));

        assert!(!api.on_hue_saturation_payload("120"));
        assert!(!api.on_hue_saturation_payload("1,2,3"));
        assert!(!api.on_hue_saturation_payload("abc,50"));
        assert_eq!(mode(&api), LightMode::SolidEffect { brightness: 90 });
        assert!(api.on_hue_saturation_payload("240,100"));
        assert_eq!(
            mode(&api),
            LightMode::CustomColor {
                hue: 240.0,
                saturation: 100.0,
                brightness: 90
            }
        );

        assert!(api.on_brightness_payload("45"));
        assert_eq!(api.light().state().brightness, 45);
        assert!(!api.on_brightness_payload(""));

        assert!(api.on_effect_payload("drops"));
        assert_eq!(mode(&api), LightMode::NamedAnimation(4));
        assert!(!api.on_effect_payload("disco"));
    }

    #[test]
    fn test_pattern_editing_flow() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);

        assert_eq!(api.add_pattern(&[]), None);
        let id = api.add_pattern(&[("name", "Heart")]).unwrap();
        assert_eq!(id, 0);

        assert!(!api.begin_edit(&[("id", "seven")]));
        assert!(api.begin_edit(&[("id", "0")]));
        assert!(api.set_led(&[("index", "1"), ("r", "255"), ("g", "0"), ("b", "0")]));
        assert!(!api.set_led(&[("index", "1"), ("r", "255")]));
        assert!(!api.end_edit(&[("id", "0")]), "name is required");
        assert!(api.end_edit(&[("id", "0"), ("name", "Heart")]));

        let pattern = api.get_pattern(&[("id", "0")]).unwrap();
        assert_eq!(pattern.pixels[1], Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(pattern.next_id(), None);
        assert_eq!(pattern.frame_time, 1000);
        assert_eq!(pattern.transition_time, 0);
        assert!(api.get_pattern(&[("id", "3")]).is_none());

        let listed = api.list_patterns();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, 0);
        assert_eq!(listed[0].1.as_str(), "Heart");

        assert!(!api.activate_pattern(&[("id", "9")]));
        assert!(api.activate_pattern(&[("id", "0")]));
        assert_eq!(mode(&api), LightMode::StoredPattern(0));
        assert_eq!(api.patterns().editing_id(), None);
    }

    #[test]
    fn test_end_edit_gives_display_back_to_controller() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        assert!(api.set_rgb(&[("r", "80"), ("g", "0"), ("b", "0")]));
        let look = Rgb { r: 80, g: 0, b: 0 }.gamma_corrected();
        assert!(displayed(&mut render).iter().all(|pixel| *pixel == look));

        assert_eq!(api.add_pattern(&[("name", "Blank")]), Some(0));
        assert!(api.begin_edit(&[("id", "0")]));
        assert!(displayed(&mut render).iter().all(|pixel| *pixel == BLACK));

        assert!(api.end_edit(&[("id", "0"), ("name", "Blank")]));
        assert_eq!(
            mode(&api),
            LightMode::CustomColor {
                hue: 0.0,
                saturation: 100.0,
                brightness: 80
            }
        );
        assert!(displayed(&mut render).iter().all(|pixel| *pixel == look));
    }

    #[test]
    fn test_running_effect_returns_after_edit() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        assert!(api.set_effect(&[("id", "2")]));
        assert!(displayed(&mut render).iter().any(|pixel| *pixel != BLACK));

        assert_eq!(api.add_pattern(&[("name", "Blank")]), Some(0));
        assert!(api.begin_edit(&[("id", "0")]));
        assert!(displayed(&mut render).iter().all(|pixel| *pixel == BLACK));
        assert!(api.end_edit(&[("id", "0"), ("name", "Blank")]));

        assert_eq!(mode(&api), LightMode::NamedAnimation(2));
        assert!(displayed(&mut render).iter().any(|pixel| *pixel != BLACK));
    }

    #[test]
    fn test_deleting_edited_pattern_ends_preview() {
        let store: MemoryStore = MemoryStore::new();
        let positions = raster_positions::<N>(19);
        let scheduler = FrameScheduler::new();
        let mut api = new_api(&scheduler, &store, &positions);
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        assert!(api.set_brightness(&[("value", "200")]));
        let look = displayed(&mut render);
        assert!(look.iter().any(|pixel| *pixel != BLACK));

        assert_eq!(api.add_pattern(&[("name", "Blank")]), Some(0));
        assert!(api.begin_edit(&[("id", "0")]));
        assert!(displayed(&mut render).iter().all(|pixel| *pixel == BLACK));

        assert!(!api.delete_pattern(&[("id", "x")]));
        assert!(api.delete_pattern(&[("id", "0")]));
        assert_eq!(api.patterns().editing_id(), None);
        assert_eq!(displayed(&mut render), look);
        assert!(!api.delete_pattern(&[("id", "0")]));
    }
}
