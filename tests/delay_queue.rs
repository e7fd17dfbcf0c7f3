mod tests {
    use myrtio_light_smoothing::{DelayQueue, Frame, Rgb};

    fn frame(value: u8) -> Frame<1> {
        Frame::from_slice(&[Rgb::new(value, 0, 0)]).unwrap()
    }

    #[test]
    fn test_zero_capacity_passes_through() {
        let mut queue = DelayQueue::<1, 4>::new(0);
        assert_eq!(queue.push(frame(1)), Some(frame(1)));
        assert_eq!(queue.push(frame(2)), Some(frame(2)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_delays_by_capacity() {
        let mut queue = DelayQueue::<1, 4>::new(2);
        assert_eq!(queue.push(frame(1)), None);
        assert_eq!(queue.push(frame(2)), None);
        assert_eq!(queue.push(frame(3)), Some(frame(1)));
        assert_eq!(queue.push(frame(4)), Some(frame(2)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_shrink_drains_excess_in_order() {
        let mut queue = DelayQueue::<1, 4>::new(3);
        for value in 1..=3 {
            assert_eq!(queue.push(frame(value)), None);
        }

        queue.set_capacity(1);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_excess(), Some(frame(1)));
        assert_eq!(queue.pop_excess(), Some(frame(2)));
        assert_eq!(queue.pop_excess(), None);

        assert_eq!(queue.push(frame(4)), Some(frame(3)));
    }

    #[test]
    fn test_push_without_draining_excess_keeps_frames() {
        let mut queue = DelayQueue::<1, 3>::new(3);
        for value in 1..=3 {
            assert_eq!(queue.push(frame(value)), None);
        }

        queue.set_capacity(1);
        assert_eq!(queue.push(frame(4)), Some(frame(1)));
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop_excess(), Some(frame(2)));
        assert_eq!(queue.pop_excess(), Some(frame(3)));
        assert_eq!(queue.pop_excess(), None);
        assert_eq!(queue.push(frame(5)), Some(frame(4)));
    }

    #[test]
    fn test_grow_keeps_buffered_frames() {
        let mut queue = DelayQueue::<1, 4>::new(1);
        assert_eq!(queue.push(frame(1)), None);
        assert_eq!(queue.push(frame(2)), Some(frame(1)));

        queue.set_capacity(3);
        assert_eq!(queue.pop_excess(), None);
        assert_eq!(queue.push(frame(3)), None);
        assert_eq!(queue.push(frame(4)), None);
        assert_eq!(queue.push(frame(5)), Some(frame(2)));
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut queue = DelayQueue::<1, 2>::new(5);
        assert_eq!(queue.capacity(), 2);
        queue.set_capacity(7);
        assert_eq!(queue.capacity(), 2);

        assert_eq!(queue.push(frame(1)), None);
        assert_eq!(queue.push(frame(2)), None);
        assert_eq!(queue.push(frame(3)), Some(frame(1)));
    }

    #[test]
    fn test_clear() {
        let mut queue = DelayQueue::<1, 4>::new(2);
        queue.push(frame(1));
        queue.push(frame(2));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.push(frame(3)), None);
    }
}
