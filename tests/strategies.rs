mod tests {
    use figure_light::color::{BLACK, PixelExt, Rgb};
    use figure_light::layout::{
        FACE_REGION, FIGURE_LAYOUT, HAIR_REGION, RIGHT_HAIR_1, RIGHT_HAIR_2, RIGHT_HAIRBAND,
        SHIRT_REGION, raster_positions,
    };
    use figure_light::strategy::{
        EditPreview, Marquee, PartCycle, Pulsing, RandomDrops, SolidColor, SolidFigure,
    };
    use figure_light::{FIGURE_PIXEL_COUNT, Frame, Strategy};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    fn figure_frame() -> ([Rgb; FIGURE_PIXEL_COUNT], [Rgb; FIGURE_PIXEL_COUNT]) {
        ([BLACK; FIGURE_PIXEL_COUNT], [BLACK; FIGURE_PIXEL_COUNT])
    }

    #[test]
    fn test_solid_color() {
        let mut pixels = [BLACK; 8];
        let previous = [BLACK; 8];
        let mut frame = Frame::new(&mut pixels, &previous);
        let delay = SolidColor::new(RED).draw_frame(&mut frame, 0);
        assert_eq!(delay, 1000);
        assert_eq!(pixels, [RED; 8]);
    }

    #[test]
    fn test_solid_figure_uses_region_colors() {
        let (mut pixels, previous) = figure_frame();
        let mut frame = Frame::new(&mut pixels, &previous);
        SolidFigure::new(&FIGURE_LAYOUT, 128).draw_frame(&mut frame, 0);

        let face = FACE_REGION.color.fade(128).gamma_corrected();
        let shirt = SHIRT_REGION.color.fade(128).gamma_corrected();
        for index in FACE_REGION.indices() {
            assert_eq!(pixels[index], face);
        }
        for index in SHIRT_REGION.indices() {
            assert_eq!(pixels[index], shirt);
        }

        let (mut pixels, previous) = figure_frame();
        let mut frame = Frame::new(&mut pixels, &previous);
        SolidFigure::new(&FIGURE_LAYOUT, 0).draw_frame(&mut frame, 0);
        assert!(pixels.iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_part_cycle_window() {
        let mut cycle = PartCycle::new(&FIGURE_LAYOUT, 1);

        let (mut pixels, previous) = figure_frame();
        let mut frame = Frame::new(&mut pixels, &previous);
        assert_eq!(cycle.draw_frame(&mut frame, 0), 16);
        assert_eq!(
            pixels[usize::from(RIGHT_HAIR_2.start)],
            RIGHT_HAIR_2.color.gamma_corrected()
        );
        assert_eq!(
            pixels[usize::from(RIGHT_HAIRBAND.start)],
            RIGHT_HAIRBAND.color.gamma_corrected()
        );
        assert_eq!(pixels[usize::from(HAIR_REGION.start)], BLACK);
        assert_eq!(pixels[usize::from(FACE_REGION.start)], BLACK);

        // One full fade later the window has moved on by one region.
        let (mut pixels, previous) = figure_frame();
        let mut frame = Frame::new(&mut pixels, &previous);
        cycle.draw_frame(&mut frame, 256);
        assert_eq!(pixels[usize::from(RIGHT_HAIR_2.start)], BLACK);
        assert_eq!(
            pixels[usize::from(RIGHT_HAIR_1.start)],
            RIGHT_HAIR_1.color.gamma_corrected()
        );
    }

    #[test]
    fn test_pulsing_rests_dim() {
        let mut pulsing = Pulsing::new(&FIGURE_LAYOUT, 1);
        let (mut pixels, previous) = figure_frame();
        let mut frame = Frame::new(&mut pixels, &previous);
        assert_eq!(pulsing.draw_frame(&mut frame, 0), 16);

        let face = FACE_REGION.color.fade(64).gamma_corrected();
        for index in FACE_REGION.indices() {
            assert_eq!(pixels[index], face);
        }
    }

    #[test]
    fn test_random_drops_blur_previous_frame() {
        let mut drops = RandomDrops::new(1);
        let mut previous = [BLACK; 8];
        previous[5] = Rgb {
            r: 200,
            g: 100,
            b: 40,
        };
        let mut pixels = [BLACK; 8];
        let mut frame = Frame::new(&mut pixels, &previous);
        assert_eq!(drops.draw_frame(&mut frame, 0), 16);

        assert_eq!(pixels[4], Rgb { r: 50, g: 25, b: 10 });
        assert_eq!(pixels[5], Rgb { r: 100, g: 50, b: 20 });
        assert_eq!(pixels[6], Rgb { r: 50, g: 25, b: 10 });
        assert_eq!(pixels[3], BLACK);
        assert_eq!(pixels[7], BLACK);
    }

    #[test]
    fn test_random_drops_wrap_around() {
        let mut drops = RandomDrops::new(1);
        let mut previous = [BLACK; 8];
        previous[0] = Rgb {
            r: 255,
            g: 255,
            b: 255,
        };
        let mut pixels = [BLACK; 8];
        let mut frame = Frame::new(&mut pixels, &previous);
        drops.draw_frame(&mut frame, 0);

        assert_eq!(pixels[0].r, 127);
        assert_eq!(pixels[1].r, 63);
        assert_eq!(pixels[7].r, 63);
        assert_eq!(pixels[4], BLACK);
    }

    #[test]
    fn test_marquee_stripes() {
        let positions = raster_positions::<64>(64);
        let mut marquee = Marquee::new(&positions);
        let magenta = Rgb {
            r: 200,
            g: 0,
            b: 200,
        }
        .gamma_corrected();
        let cyan = Rgb {
            r: 0,
            g: 200,
            b: 200,
        }
        .gamma_corrected();

        let mut pixels = [BLACK; 80];
        let previous = [BLACK; 80];
        let mut frame = Frame::new(&mut pixels, &previous);
        assert_eq!(marquee.draw_frame(&mut frame, 0), 10);
        assert_eq!(pixels[0], cyan);
        assert_eq!(pixels[15], cyan);
        assert_eq!(pixels[16], magenta);
        // No position, no colour.
        assert_eq!(pixels[70], BLACK);

        let mut frame = Frame::new(&mut pixels, &previous);
        marquee.draw_frame(&mut frame, 16);
        assert_eq!(pixels[0], magenta);

        // Every row is y = 0, so the vertical phase is uniform.
        let mut frame = Frame::new(&mut pixels, &previous);
        marquee.draw_frame(&mut frame, 0x800);
        assert!(pixels[..64].iter().all(|pixel| *pixel == cyan));
    }

    #[test]
    fn test_edit_preview_is_raw() {
        let mut source = [BLACK; 4];
        source[2] = Rgb { r: 10, g: 20, b: 30 };
        let mut preview = EditPreview::new(source);

        let mut pixels = [RED; 4];
        let previous = [BLACK; 4];
        let mut frame = Frame::new(&mut pixels, &previous);
        assert_eq!(preview.draw_frame(&mut frame, 0), 33);
        assert_eq!(pixels, source);
    }
}
