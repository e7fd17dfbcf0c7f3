//! Linear color smoothing
//!
//! [`LinearSmoothing`] sits between a producer of LED frames and an output
//! driver. Frames written by the producer become targets of a linear ramp;
//! a [`FrameScheduler`](crate::FrameScheduler) samples the ramp at the active
//! profile's update interval, delays the samples by the profile's output
//! delay and forwards them to the driver.
//!
//! All methods take `&self`. The state lives behind a critical section, so
//! the producer and the scheduler may run in different tasks, threads or
//! interrupt contexts.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Rgb;
use crate::delay_queue::DelayQueue;
use crate::error::SmoothingError;
use crate::frame::{Frame, frame_from_slice, off_frame};
use crate::profile::{Profile, ProfileId, ProfileRegistry};
use crate::transition::FrameTransition;
use crate::{DriverError, OutputDriver};

/// Default update frequency of the construction profile
pub const DEFAULT_UPDATE_FREQUENCY_HZ: f32 = 25.0;

/// Default settling time of the construction profile
pub const DEFAULT_SETTLING_TIME: Duration = Duration::from_millis(200);

/// Configuration for the smoothing engine
///
/// Becomes profile 0.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingConfig {
    /// Frames per second sent to the driver
    pub update_frequency_hz: f32,
    /// Time after which a written frame is fully applied
    pub settling_time: Duration,
    /// Number of frames to delay the output by
    pub output_delay_frames: usize,
    /// Keep sending frames after the ramp has settled
    pub continuous_output: bool,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: DEFAULT_UPDATE_FREQUENCY_HZ,
            settling_time: DEFAULT_SETTLING_TIME,
            output_delay_frames: 0,
            continuous_output: false,
        }
    }
}

/// Lifecycle phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingPhase {
    /// Nothing has been written yet
    Uninitialized,
    /// Moving towards the last written frame
    Ramping,
    /// The output equals the last written frame
    Settled,
    /// Terminal state after `switch_off`
    SwitchedOff,
}

struct SmoothingState<O, const N: usize, const D: usize, const P: usize> {
    driver: O,
    profiles: ProfileRegistry<P>,
    /// `None` until the first write
    transition: Option<FrameTransition<N>>,
    queue: DelayQueue<N, D>,
    device_enabled: bool,
    paused: bool,
    continuous_output: bool,
    /// Settled frames pushed since the last change
    settled_pushes: usize,
    /// Output gate as seen by the previous tick
    was_enabled: bool,
    switched_off: bool,
}

impl<O: OutputDriver, const N: usize, const D: usize, const P: usize> SmoothingState<O, N, D, P> {
    fn is_enabled(&self) -> bool {
        self.device_enabled && !self.paused && self.driver.enabled()
    }

    fn settling_time(&self) -> Duration {
        self.profiles.active().settling_time
    }

    fn rearm(&mut self) {
        self.settled_pushes = 0;
    }

    fn apply_profile(&mut self, profile: &Profile) {
        self.queue.set_capacity(profile.output_delay_frames);
        self.paused = profile.paused;
    }

    fn write(&mut self, leds: &[Rgb], now: Instant) -> Result<(), SmoothingError> {
        if self.switched_off {
            return Err(SmoothingError::RejectedAfterShutdown);
        }

        let settling_time = self.settling_time();
        match &mut self.transition {
            Some(transition) => {
                if leds.len() != transition.len() {
                    return Err(SmoothingError::InvalidFrame);
                }
                let target = frame_from_slice(leds).ok_or(SmoothingError::InvalidFrame)?;
                transition.set(target, settling_time, now);
            }
            None => {
                let transition =
                    FrameTransition::new(leds, now).ok_or(SmoothingError::InvalidFrame)?;
                self.transition = Some(transition);
            }
        }
        self.rearm();
        Ok(())
    }

    fn update_leds(&mut self, now: Instant) -> Result<(), SmoothingError> {
        if self.switched_off {
            return Err(SmoothingError::RejectedAfterShutdown);
        }
        // The driver's own flag can flip without going through `set_enable`
        let enabled = self.is_enabled();
        if enabled && !self.was_enabled {
            self.rearm();
        }
        self.was_enabled = enabled;

        let settling_time = self.settling_time();
        let Some(transition) = &self.transition else {
            return Ok(());
        };
        let settled = transition.is_settled(now, settling_time);
        let frame = transition.current(now, settling_time);

        let mut result = Ok(());
        // Left over from a shrunk output delay, older than anything pushed now
        while let Some(excess) = self.queue.pop_excess() {
            result = result.and(self.forward(&excess));
        }

        if settled {
            // The settled frame has made it through the whole delay
            if !self.continuous_output && self.settled_pushes > self.queue.capacity() {
                return result;
            }
            self.settled_pushes = self.settled_pushes.saturating_add(1);
        } else {
            self.settled_pushes = 0;
        }

        if let Some(ready) = self.queue.push(frame) {
            result = result.and(self.forward(&ready));
        }
        result
    }

    /// Send a ready frame to the driver, or drop it while output is gated
    fn forward(&mut self, frame: &Frame<N>) -> Result<(), SmoothingError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.driver.write(frame).map_err(|error| {
            #[cfg(feature = "esp32-log")]
            println!("[smoothing] driver write failed: {:?}", error);
            SmoothingError::SinkWriteFailed(error)
        })
    }

    fn switch_off(&mut self) -> Result<(), SmoothingError> {
        if self.switched_off {
            return Ok(());
        }
        self.switched_off = true;
        self.queue.clear();

        let len = self.transition.as_ref().map_or(0, FrameTransition::len);
        let written = if len > 0 {
            self.driver.write(&off_frame::<N>(len))
        } else {
            Ok(())
        };
        let extinguished = self.driver.switch_off();

        #[cfg(feature = "esp32-log")]
        println!("[smoothing] switched off ({} leds)", len);

        written.and(extinguished)?;
        Ok(())
    }

    fn phase(&self, now: Instant) -> SmoothingPhase {
        if self.switched_off {
            return SmoothingPhase::SwitchedOff;
        }
        match &self.transition {
            None => SmoothingPhase::Uninitialized,
            Some(transition) if transition.is_settled(now, self.settling_time()) => {
                SmoothingPhase::Settled
            }
            Some(_) => SmoothingPhase::Ramping,
        }
    }
}

/// Linear smoothing engine
///
/// - `O` is the downstream driver
/// - `N` is the maximum number of LEDs
/// - `D` is the maximum output delay in frames
/// - `P` is the maximum number of profiles
pub struct LinearSmoothing<O, const N: usize, const D: usize = 8, const P: usize = 4> {
    state: Mutex<RefCell<SmoothingState<O, N, D, P>>>,
}

impl<O: OutputDriver, const N: usize, const D: usize, const P: usize> LinearSmoothing<O, N, D, P> {
    /// Create a new smoothing engine in front of `driver`
    ///
    /// The config is stored as profile 0 and selected. Fails if the config
    /// does not form a valid profile.
    pub fn new(driver: O, config: &SmoothingConfig) -> Result<Self, SmoothingError> {
        let profile = Self::profile(
            config.settling_time,
            config.update_frequency_hz,
            config.output_delay_frames,
        )?;
        let profiles = ProfileRegistry::new(profile)?;

        Ok(Self {
            state: Mutex::new(RefCell::new(SmoothingState {
                driver,
                profiles,
                transition: None,
                queue: DelayQueue::new(profile.output_delay_frames),
                device_enabled: true,
                paused: false,
                continuous_output: config.continuous_output,
                settled_pushes: 0,
                was_enabled: true,
                switched_off: false,
            })),
        })
    }

    fn profile(
        settling_time: Duration,
        update_frequency_hz: f32,
        output_delay_frames: usize,
    ) -> Result<Profile, SmoothingError> {
        if output_delay_frames > D {
            return Err(SmoothingError::InvalidProfile);
        }
        Profile::new(settling_time, update_frequency_hz, output_delay_frames)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SmoothingState<O, N, D, P>) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.state.borrow(cs).borrow_mut()))
    }

    /// Add a timing profile
    ///
    /// The profile is not selected. Fails on a non-positive frequency or an
    /// output delay larger than `D`.
    pub fn add_config(
        &self,
        settling_time: Duration,
        update_frequency_hz: f32,
        output_delay_frames: usize,
    ) -> Result<ProfileId, SmoothingError> {
        let profile = Self::profile(settling_time, update_frequency_hz, output_delay_frames)?;
        self.with_state(|state| state.profiles.add(profile))
    }

    /// Make a profile active
    ///
    /// Takes effect at the next tick. Ramp state and buffered frames are
    /// kept. Returns `false` if there is no such profile.
    pub fn select_config(&self, id: ProfileId) -> bool {
        self.with_state(|state| {
            if state.profiles.active_id() == id {
                return true;
            }
            let Some(profile) = state.profiles.select(id) else {
                return false;
            };
            state.apply_profile(&profile);
            state.rearm();

            #[cfg(feature = "esp32-log")]
            println!(
                "[smoothing] selected profile {}: interval={}ms delay={}",
                id.raw(),
                profile.update_interval.as_millis(),
                profile.output_delay_frames
            );

            true
        })
    }

    /// Id of the active profile
    pub fn current_config(&self) -> ProfileId {
        self.with_state(|state| state.profiles.active_id())
    }

    /// Number of stored profiles
    pub fn config_count(&self) -> usize {
        self.with_state(|state| state.profiles.len())
    }

    /// Look up a stored profile
    pub fn config(&self, id: ProfileId) -> Option<Profile> {
        self.with_state(|state| state.profiles.get(id).copied())
    }

    /// Update interval of the active profile
    pub fn update_interval(&self) -> Duration {
        self.with_state(|state| state.profiles.active().update_interval)
    }

    /// Check if frames keep flowing after the ramp has settled
    pub fn continuous_output(&self) -> bool {
        self.with_state(|state| state.continuous_output)
    }

    /// Set a new target frame
    ///
    /// Never forwards anything to the driver; output is driven by
    /// [`LinearSmoothing::update_leds`].
    pub fn write(&self, leds: &[Rgb]) -> Result<(), SmoothingError> {
        self.write_at(leds, Instant::now())
    }

    /// Set a new target frame as of `now`
    pub fn write_at(&self, leds: &[Rgb], now: Instant) -> Result<(), SmoothingError> {
        self.with_state(|state| state.write(leds, now))
    }

    /// Compute, delay and forward one frame
    ///
    /// Called by the scheduler once per update interval.
    pub fn update_leds(&self) -> Result<(), SmoothingError> {
        self.update_leds_at(Instant::now())
    }

    /// Compute, delay and forward one frame as of `now`
    pub fn update_leds_at(&self, now: Instant) -> Result<(), SmoothingError> {
        self.with_state(|state| state.update_leds(now))
    }

    /// Send a black frame, switch the driver off and stop the scheduler
    ///
    /// Calling it again does nothing.
    pub fn switch_off(&self) -> Result<(), SmoothingError> {
        self.with_state(SmoothingState::switch_off)
    }

    /// Check if the engine has been switched off
    pub fn is_switched_off(&self) -> bool {
        self.with_state(|state| state.switched_off)
    }

    /// Toggle the device-level output gate
    pub fn set_enable(&self, enable: bool) {
        self.with_state(|state| {
            if enable && !state.device_enabled {
                state.rearm();
            }
            state.device_enabled = enable;
        });
    }

    /// Toggle the pause flag of the active profile
    ///
    /// While paused the ramp keeps advancing but nothing reaches the driver.
    pub fn set_pause(&self, pause: bool) {
        self.with_state(|state| {
            if !pause && state.paused {
                state.rearm();
            }
            state.paused = pause;
            state.profiles.set_active_paused(pause);
        });
    }

    /// Check if output is paused
    pub fn pause(&self) -> bool {
        self.with_state(|state| state.paused)
    }

    /// Check if frames reach the driver
    pub fn enabled(&self) -> bool {
        self.with_state(|state| state.is_enabled())
    }

    /// Lifecycle phase at `now`
    pub fn phase_at(&self, now: Instant) -> SmoothingPhase {
        self.with_state(|state| state.phase(now))
    }

    /// Run `f` with the downstream driver
    ///
    /// `f` runs inside the engine's critical section and must not call back
    /// into the engine; doing so panics with the state already borrowed.
    pub fn with_driver<R>(&self, f: impl FnOnce(&mut O) -> R) -> R {
        self.with_state(|state| f(&mut state.driver))
    }
}

impl<O: OutputDriver, const N: usize, const D: usize, const P: usize> OutputDriver
    for LinearSmoothing<O, N, D, P>
{
    fn write(&mut self, colors: &[Rgb]) -> Result<(), DriverError> {
        LinearSmoothing::write(self, colors).map_err(|_| DriverError)
    }

    fn switch_off(&mut self) -> Result<(), DriverError> {
        LinearSmoothing::switch_off(self).map_err(|_| DriverError)
    }

    fn enabled(&self) -> bool {
        LinearSmoothing::enabled(self)
    }
}
