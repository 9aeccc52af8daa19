//! Utility functions that I don't know where to put else

/// Compute a frequency factor measured in semitones (one octave consists of 12 semitones)
///
/// # Example
///
/// ```
/// # use tone_txt::util::*;
///
/// assert_eq!(from_semitones(12.0), 2.0);
/// assert_eq!(from_semitones(-24.0), 0.25);
/// ```
pub fn from_semitones(semitones: f64) -> f64 {
    2.0f64.powf(semitones / 12.0)
}
