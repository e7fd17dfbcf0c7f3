mod common;

mod tests {
    use embassy_time::Duration;
    use myrtio_light_smoothing::{
        DriverError, FrameScheduler, LinearSmoothing, SmoothingConfig, SmoothingError,
    };

    use crate::common::{BLACK, RED, RecordingDriver, ms};

    type Smoothing = LinearSmoothing<RecordingDriver, 4>;

    fn smoothing() -> Smoothing {
        let config = SmoothingConfig {
            update_frequency_hz: 25.0,
            settling_time: Duration::from_millis(100),
            output_delay_frames: 0,
            continuous_output: true,
        };
        Smoothing::new(RecordingDriver::default(), &config).unwrap()
    }

    fn frame_count(smoothing: &Smoothing) -> usize {
        smoothing.with_driver(|driver| driver.frames.len())
    }

    #[test]
    fn test_tick_paces_at_update_interval() {
        let smoothing = smoothing();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        let mut scheduler = FrameScheduler::new(&smoothing);

        let result = scheduler.tick(ms(0)).unwrap();
        assert_eq!(result.next_deadline, ms(40));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));
        assert_eq!(result.error, None);

        let result = scheduler.tick(ms(41)).unwrap();
        assert_eq!(result.next_deadline, ms(80));
        assert_eq!(result.sleep_duration, Duration::from_millis(39));

        assert_eq!(frame_count(&smoothing), 2);
    }

    #[test]
    fn test_tick_coalesces_missed_firings() {
        let smoothing = smoothing();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        let mut scheduler = FrameScheduler::new(&smoothing);

        scheduler.tick(ms(0)).unwrap();
        let result = scheduler.tick(ms(500)).unwrap();
        assert_eq!(result.next_deadline, ms(540));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));
        assert_eq!(frame_count(&smoothing), 2);
    }

    #[test]
    fn test_tick_late_within_one_interval_keeps_schedule() {
        let smoothing = smoothing();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        let mut scheduler = FrameScheduler::new(&smoothing);

        scheduler.tick(ms(0)).unwrap();
        let result = scheduler.tick(ms(70)).unwrap();
        assert_eq!(result.next_deadline, ms(80));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
    }

    #[test]
    fn test_profile_switch_changes_spacing() {
        let smoothing = smoothing();
        let fast = smoothing
            .add_config(Duration::from_millis(100), 50.0, 0)
            .unwrap();
        smoothing.write_at(&[BLACK], ms(0)).unwrap();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        let mut scheduler = FrameScheduler::new(&smoothing);

        assert_eq!(scheduler.tick(ms(0)).unwrap().next_deadline, ms(40));
        assert!(smoothing.select_config(fast));
        assert_eq!(scheduler.tick(ms(40)).unwrap().next_deadline, ms(60));
        assert_eq!(scheduler.tick(ms(60)).unwrap().next_deadline, ms(80));

        let reds: Vec<u8> =
            smoothing.with_driver(|driver| driver.frames.iter().map(|f| f[0].r).collect());
        assert_eq!(reds, vec![0, 102, 153]);
    }

    #[test]
    fn test_tick_reports_driver_errors_and_continues() {
        let smoothing = smoothing();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        smoothing.with_driver(|driver| driver.fail_writes = true);
        let mut scheduler = FrameScheduler::new(&smoothing);

        let result = scheduler.tick(ms(0)).unwrap();
        assert_eq!(
            result.error,
            Some(SmoothingError::SinkWriteFailed(DriverError))
        );
        assert_eq!(result.next_deadline, ms(40));

        smoothing.with_driver(|driver| driver.fail_writes = false);
        let result = scheduler.tick(ms(40)).unwrap();
        assert_eq!(result.error, None);
        assert_eq!(frame_count(&smoothing), 1);
    }

    #[test]
    fn test_scheduler_halts_after_switch_off() {
        let smoothing = smoothing();
        smoothing.write_at(&[RED], ms(0)).unwrap();
        let mut scheduler = FrameScheduler::new(&smoothing);

        assert!(scheduler.tick(ms(0)).is_some());
        smoothing.switch_off().unwrap();
        assert!(scheduler.tick(ms(40)).is_none());
        assert!(scheduler.tick(ms(80)).is_none());

        // The ramp frame and the black frame
        assert_eq!(frame_count(&smoothing), 2);
        assert!(scheduler.smoothing().is_switched_off());
    }
}
