// tone.txt -- turning melodies written as text into raw audio
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use crate::util::from_semitones;

/// Frequency of C0 in Hz, the lowest C of scientific pitch notation at A4 = 440 Hz.
pub const C0_FREQUENCY: f64 = 16.351_597_831_287_414_667_17;

/// Defines the tuning by assigning a frequency to the C of octave 0.
/// This defines the frequencies of all other notes at a standard tuning of 12 half-tones per octave.
///
/// # Examples
///
/// ```
/// use tone_txt::synth::tuning::*;
///
/// let tuning = Tuning::default();
/// assert_eq!(tuning.frequency(0), C0_FREQUENCY);
/// assert!((tuning.frequency(57) - 440.0).abs() < 1e-9);
/// assert!((tuning.frequency(-12) - C0_FREQUENCY / 2.0).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tuning {
    pub reference_frequency: f64,
}

impl Tuning {
    /// Return the frequency of the note that many semitones above C0.
    pub fn frequency(&self, semitones: i64) -> f64 {
        self.reference_frequency * from_semitones(semitones as f64)
    }
}

/// Default concert tuning, where A4 corresponds to 440 Hz.
impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_frequency: C0_FREQUENCY,
        }
    }
}
