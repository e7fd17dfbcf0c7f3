//! Timing profiles
//!
//! A profile bundles the settling time, update interval and output delay of
//! the smoothing engine. Profiles are stored in insertion order and one of
//! them is active at any time.

use embassy_time::{Duration, TICK_HZ};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::error::SmoothingError;

/// Longest accepted update interval in milliseconds
///
/// Leaves headroom for deadline arithmetic on `Instant` after converting to ticks.
pub const MAX_UPDATE_INTERVAL_MS: u64 = u64::MAX / TICK_HZ / 4;

/// Identifier of a stored profile
///
/// Ids are assigned in insertion order, starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(u8);

impl ProfileId {
    /// The profile created from the construction config
    pub const DEFAULT: Self = Self(0);

    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Smoothing timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Suppress output while keeping the ramp running
    pub paused: bool,
    /// Time after which a ramp reaches its target
    pub settling_time: Duration,
    /// Time between two output frames
    pub update_interval: Duration,
    /// Number of frames to delay the output by
    pub output_delay_frames: usize,
}

impl Profile {
    /// Build a profile from an update frequency
    ///
    /// The interval is `1000 / frequency_hz` milliseconds, rounded. Fails if
    /// the frequency is not a positive number, the interval rounds to zero or
    /// it exceeds [`MAX_UPDATE_INTERVAL_MS`].
    #[allow(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    pub fn new(
        settling_time: Duration,
        update_frequency_hz: f32,
        output_delay_frames: usize,
    ) -> Result<Self, SmoothingError> {
        if !update_frequency_hz.is_finite() || update_frequency_hz <= 0.0 {
            return Err(SmoothingError::InvalidProfile);
        }
        let interval_ms = libm::roundf(1000.0 / update_frequency_hz);
        if !(1.0..=MAX_UPDATE_INTERVAL_MS as f32).contains(&interval_ms) {
            return Err(SmoothingError::InvalidProfile);
        }
        let interval_ms = (interval_ms as u64).min(MAX_UPDATE_INTERVAL_MS);

        Ok(Self {
            paused: false,
            settling_time,
            update_interval: Duration::from_millis(interval_ms),
            output_delay_frames,
        })
    }
}

/// Ordered list of profiles with an active entry
///
/// `P` is the maximum number of profiles.
#[derive(Debug, Clone)]
pub struct ProfileRegistry<const P: usize> {
    profiles: Vec<Profile, P>,
    active: ProfileId,
}

impl<const P: usize> ProfileRegistry<P> {
    /// Create a registry holding `default` as the active profile
    ///
    /// Fails if `P` is zero.
    pub fn new(default: Profile) -> Result<Self, SmoothingError> {
        let mut profiles = Vec::new();
        profiles
            .push(default)
            .map_err(|_| SmoothingError::ProfileLimitReached)?;
        Ok(Self {
            profiles,
            active: ProfileId::DEFAULT,
        })
    }

    /// Append a profile and return its id
    pub fn add(&mut self, profile: Profile) -> Result<ProfileId, SmoothingError> {
        let raw = u8::try_from(self.profiles.len())
            .map_err(|_| SmoothingError::ProfileLimitReached)?;
        self.profiles
            .push(profile)
            .map_err(|_| SmoothingError::ProfileLimitReached)?;

        #[cfg(feature = "esp32-log")]
        println!(
            "[smoothing] added profile {}: settling={}ms interval={}ms delay={}",
            raw,
            profile.settling_time.as_millis(),
            profile.update_interval.as_millis(),
            profile.output_delay_frames
        );

        Ok(ProfileId(raw))
    }

    /// Make `id` the active profile
    ///
    /// Returns `None` if there is no such profile, otherwise the newly active
    /// profile.
    pub fn select(&mut self, id: ProfileId) -> Option<Profile> {
        let profile = *self.profiles.get(id.index())?;
        self.active = id;
        Some(profile)
    }

    /// Id of the active profile
    pub const fn active_id(&self) -> ProfileId {
        self.active
    }

    /// The active profile
    pub fn active(&self) -> &Profile {
        // `active` is only ever set to an existing index
        &self.profiles[self.active.index()]
    }

    /// Look up a profile by id
    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(id.index())
    }

    /// Number of stored profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the registry is empty; never true once constructed
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Set the pause flag of the active profile
    pub fn set_active_paused(&mut self, paused: bool) {
        if let Some(profile) = self.profiles.get_mut(self.active.index()) {
            profile.paused = paused;
        }
    }
}
