use heapless::Deque;

use crate::frame::Frame;

/// Output delay buffer
///
/// Lags forwarded frames behind computed frames by `capacity` ticks.
/// `D` is the largest capacity the queue can hold; the runtime capacity can
/// change at any time without losing buffered frames.
#[derive(Debug)]
pub struct DelayQueue<const N: usize, const D: usize> {
    inner: Deque<Frame<N>, D>,
    capacity: usize,
}

impl<const N: usize, const D: usize> DelayQueue<N, D> {
    /// Create an empty queue with the given capacity
    ///
    /// The capacity is limited to `D`.
    pub const fn new(capacity: usize) -> Self {
        Self {
            inner: Deque::new(),
            capacity: if capacity > D { D } else { capacity },
        }
    }

    /// Number of frames to buffer before forwarding
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered frames
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Change the capacity
    ///
    /// Buffered frames are kept. If the queue now holds more frames than the
    /// capacity, drain them with [`DelayQueue::pop_excess`].
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.min(D);
    }

    /// Pop the oldest frame while the queue holds more than its capacity
    pub fn pop_excess(&mut self) -> Option<Frame<N>> {
        if self.inner.len() > self.capacity {
            return self.inner.pop_front();
        }
        None
    }

    /// Push a frame into the queue
    ///
    /// Returns the frame that is ready to be forwarded, if the queue is full.
    /// With zero capacity the pushed frame is returned as is.
    pub fn push(&mut self, frame: Frame<N>) -> Option<Frame<N>> {
        if self.capacity == 0 {
            return Some(frame);
        }

        let ready = if self.inner.len() >= self.capacity {
            self.inner.pop_front()
        } else {
            None
        };
        // Never full here: either a slot was just freed or `len < capacity <= D`
        let pushed = self.inner.push_back(frame);
        debug_assert!(pushed.is_ok(), "delay queue overflow");
        ready
    }

    /// Drop every buffered frame
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
