mod tests {
    use std::time::Duration as StdDuration;

    use embassy_time::Instant;
    use figure_light::color::{BLACK, Rgb};
    use figure_light::pattern::{StoredPattern, save_pattern};
    use figure_light::strategy::{EditPreview, PatternSequencer, SolidColor};
    use figure_light::{DoubleBuffer, FrameScheduler, MemoryStore, OutputDriver, StrategySlot};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[derive(Default)]
    struct RecordingDriver {
        frames: Vec<Vec<Rgb>>,
    }

    impl OutputDriver for RecordingDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames.push(colors.to_vec());
        }
    }

    type Sink = DoubleBuffer<RecordingDriver, 4>;

    fn solid(color: Rgb) -> StrategySlot<'static, 4> {
        StrategySlot::SolidColor(SolidColor::new(color))
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_new_strategy_shows_two_iterations_later() {
        let scheduler = FrameScheduler::<4>::new();
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        assert!(scheduler.request_strategy(solid(RED)));
        render.render_frame(at(0));
        render.render_frame(at(10));

        assert!(scheduler.request_strategy(solid(BLUE)));
        render.render_frame(at(20));
        render.render_frame(at(30));

        let frames = &render.sink().driver().frames;
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], [BLACK; 4]);
        assert_eq!(frames[1], [RED; 4]);
        assert_eq!(frames[2], [RED; 4]);
        assert_eq!(frames[3], [BLUE; 4]);
    }

    #[test]
    fn test_last_request_wins() {
        let scheduler = FrameScheduler::<4>::new();
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        scheduler.request_strategy(solid(RED));
        scheduler.request_strategy(solid(BLUE));
        assert!(scheduler.has_pending());

        render.render_frame(at(0));
        assert!(!scheduler.has_pending());
        render.render_frame(at(10));

        let frames = &render.sink().driver().frames;
        assert!(frames.iter().all(|frame| !frame.contains(&RED)));
        assert_eq!(frames[1], [BLUE; 4]);
    }

    #[test]
    fn test_superseded_pattern_sequence_is_never_drawn() {
        let store: MemoryStore = MemoryStore::new();
        let mut pattern = StoredPattern::<4>::blank("Red");
        pattern.pixels = [RED; 4];
        save_pattern(&store, 0, &pattern).unwrap();

        let scheduler = FrameScheduler::<4>::new();
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        for _ in 0..3 {
            assert!(scheduler.request_strategy(StrategySlot::PatternSequence(
                PatternSequencer::new(&store, 0),
            )));
        }
        assert!(scheduler.request_strategy(solid(BLUE)));
        render.render_frame(at(0));
        render.render_frame(at(10));

        scheduler.shutdown();
        assert!(!scheduler.request_strategy(StrategySlot::PatternSequence(
            PatternSequencer::new(&store, 0),
        )));

        let frames = &render.sink().driver().frames;
        assert!(frames.iter().all(|frame| !frame.contains(&RED)));
        assert_eq!(frames[1], [BLUE; 4]);
    }

    #[test]
    fn test_deadline_follows_previous_delay() {
        let scheduler = FrameScheduler::<4>::new();
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        // Idle before any strategy arrives.
        assert_eq!(render.render_frame(at(0)), Some(at(0)));
        assert_eq!(render.render_frame(at(5)), Some(at(1005)));

        scheduler.request_strategy(solid(RED));
        assert_eq!(render.render_frame(at(10)), Some(at(10)));
        assert_eq!(render.frame_counter(), 1);
        assert_eq!(render.render_frame(at(20)), Some(at(1020)));

        scheduler.request_strategy(StrategySlot::EditPreview(EditPreview::new([RED; 4])));
        assert_eq!(render.render_frame(at(30)), Some(at(30)));
        assert_eq!(render.render_frame(at(40)), Some(at(73)));
        assert_eq!(render.render_frame(at(80)), Some(at(113)));
        assert_eq!(render.frame_counter(), 3);
    }

    #[test]
    fn test_requests_ignored_after_shutdown() {
        let scheduler = FrameScheduler::<4>::new();
        let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));

        scheduler.shutdown();
        assert!(scheduler.is_shutdown());
        assert!(!scheduler.request_strategy(solid(RED)));
        assert!(!scheduler.has_pending());
        assert_eq!(render.render_frame(at(0)), None);
        assert!(render.sink().driver().frames.is_empty());
    }

    fn wait_for_adoption(scheduler: &FrameScheduler<'_, 4>) {
        while scheduler.has_pending() {
            std::thread::yield_now();
        }
    }

    #[test]
    fn test_run_until_shutdown() {
        let scheduler = FrameScheduler::<4>::new();
        scheduler.request_strategy(StrategySlot::EditPreview(EditPreview::new([BLUE; 4])));

        let frames = std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));
                embassy_futures::block_on(render.run());
                render.sink().driver().frames.len()
            });
            wait_for_adoption(&scheduler);
            std::thread::sleep(StdDuration::from_millis(200));
            scheduler.shutdown();
            handle.join().unwrap()
        });

        assert!(frames >= 3, "only {frames} frames");
    }

    #[test]
    fn test_long_frame_wait_is_interruptible() {
        let store: MemoryStore = MemoryStore::new();
        let mut pattern = StoredPattern::<4>::blank("Slow");
        pattern.frame_time = 5000;
        save_pattern(&store, 0, &pattern).unwrap();

        let scheduler = FrameScheduler::<4>::new();
        scheduler.request_strategy(StrategySlot::PatternSequence(PatternSequencer::new(
            &store, 0,
        )));

        let elapsed = std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let mut render = scheduler.render_loop(Sink::new(RecordingDriver::default()));
                embassy_futures::block_on(render.run());
            });
            wait_for_adoption(&scheduler);
            let started = std::time::Instant::now();
            std::thread::sleep(StdDuration::from_millis(50));
            scheduler.shutdown();
            handle.join().unwrap();
            started.elapsed()
        });

        assert!(elapsed < StdDuration::from_secs(2), "took {elapsed:?}");
    }
}
