//! This is the namespace for all parts dealing with data in sampled waves.

use snafu::Snafu;

/// Convenience type for making things stereo, e.g. individual samples or whole buffers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Stereo<T> {
    pub left: T,
    pub right: T,
}

impl<T> Stereo<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }
}

impl<T: Copy> Stereo<T> {
    /// The same signal on both channels.
    pub fn mono(value: T) -> Self {
        Self::new(value, value)
    }
}

/// How audio is sampled and how loud it is.
/// Fixed once at startup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AudioFormat {
    sample_rate: u32,
    volume: f64,
    max_octave: i32,
}

/// Possible errors when configuring the audio format.
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum FormatError {
    #[snafu(display("The sample rate must be positive"))]
    ZeroSampleRate,
    #[snafu(display("Volume {} is outside of the range 0 to 1", volume))]
    VolumeOutOfRange { volume: f64 },
}

impl AudioFormat {
    /// Bits per sample and channel. The PCM encoding relies on this being 16.
    pub const BIT_DEPTH: u32 = 16;
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
    pub const DEFAULT_VOLUME: f64 = 0.5;
    pub const DEFAULT_MAX_OCTAVE: i32 = 10;

    /// # Examples
    ///
    /// ```
    /// use tone_txt::wave::*;
    ///
    /// let format = AudioFormat::new(48000, 1.0, 8).unwrap();
    /// assert_eq!(format.amplitude(), 32767.0);
    /// assert_eq!(format.nyquist(), 24000.0);
    /// assert_eq!(AudioFormat::new(48000, 1.5, 8), Err(FormatError::VolumeOutOfRange { volume: 1.5 }));
    /// ```
    pub fn new(sample_rate: u32, volume: f64, max_octave: i32) -> Result<AudioFormat, FormatError> {
        if sample_rate == 0 {
            return Err(FormatError::ZeroSampleRate);
        }
        // also rejects NaN
        if !(0.0..=1.0).contains(&volume) {
            return Err(FormatError::VolumeOutOfRange { volume });
        }
        Ok(AudioFormat {
            sample_rate,
            volume,
            max_octave,
        })
    }

    /// Number of samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Notes above this octave are rejected by the parser.
    pub fn max_octave(&self) -> i32 {
        self.max_octave
    }

    /// Peak sample value of a tone at the configured volume.
    pub fn amplitude(&self) -> f64 {
        ((1i32 << (Self::BIT_DEPTH - 1)) - 1) as f64 * self.volume
    }

    /// The highest frequency that can be sampled without aliasing.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat {
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            volume: Self::DEFAULT_VOLUME,
            max_octave: Self::DEFAULT_MAX_OCTAVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format() {
        let format = AudioFormat::default();
        assert_eq!(format.sample_rate(), 44100);
        assert_eq!(format.nyquist(), 22050.0);
        assert_eq!(format.amplitude(), 16383.5);
        assert_eq!(format.max_octave(), 10);
    }

    #[test]
    fn invalid_formats() {
        assert_eq!(AudioFormat::new(0, 0.5, 10), Err(FormatError::ZeroSampleRate));
        assert!(AudioFormat::new(44100, f64::NAN, 10).is_err());
        assert!(AudioFormat::new(44100, -0.1, 10).is_err());
        assert_eq!(AudioFormat::new(44100, 0.0, 10).map(|f| f.amplitude()), Ok(0.0));
    }

    #[test]
    fn format_error_messages() {
        assert_eq!(
            FormatError::VolumeOutOfRange { volume: 2.0 }.to_string(),
            "Volume 2 is outside of the range 0 to 1"
        );
    }
}
