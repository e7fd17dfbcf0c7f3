#![allow(dead_code)]

use embassy_time::Instant;
use myrtio_light_smoothing::{DriverError, OutputDriver, Rgb};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

pub fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

pub fn red(value: u8) -> Rgb {
    Rgb::new(value, 0, 0)
}

/// Driver that records everything it receives
#[derive(Debug)]
pub struct RecordingDriver {
    pub frames: Vec<Vec<Rgb>>,
    pub switch_offs: usize,
    pub fail_writes: bool,
    pub enabled: bool,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            switch_offs: 0,
            fail_writes: false,
            enabled: true,
        }
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) -> Result<(), DriverError> {
        if self.fail_writes {
            return Err(DriverError);
        }
        self.frames.push(colors.to_vec());
        Ok(())
    }

    fn switch_off(&mut self) -> Result<(), DriverError> {
        self.switch_offs += 1;
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
