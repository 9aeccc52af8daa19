//! This namespace contains all the parts converting from note data to wave data.

pub mod oscillator;
pub mod tuning;

use std::convert::TryFrom;

use snafu::Snafu;

use crate::note::ParsedNote;
use crate::wave::{AudioFormat, Stereo};
use oscillator::Oscillator;

/// Errors that can occur while generating samples.
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum SynthError {
    #[snafu(display("Sample value {} does not fit into 16 bits", value))]
    SampleOutOfRange { value: f64 },
}

/// Turns notes into a sine wave, one tone after the other.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToneSynthesizer {
    sample_rate: u32,
    amplitude: f64,
}

impl ToneSynthesizer {
    /// The amplitude is the peak sample value. No clamping happens:
    /// peaks outside of the 16 bit range are reported as `SynthError::SampleOutOfRange`.
    pub fn new(sample_rate: u32, amplitude: f64) -> Self {
        ToneSynthesizer {
            sample_rate,
            amplitude,
        }
    }

    pub fn from_format(format: &AudioFormat) -> Self {
        ToneSynthesizer::new(format.sample_rate(), format.amplitude())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Number of stereo samples the note occupies, i.e. `floor(sample_rate * duration)`.
    pub fn sample_count(&self, note: &ParsedNote) -> u64 {
        let count = note.duration().mul_floor(self.sample_rate as i64);
        u64::try_from(count.max(0)).unwrap_or(u64::MAX)
    }

    /// Lazily generate the samples of all notes in order.
    ///
    /// The returned iterator can be cloned whenever the note iterator can,
    /// which allows restarting the generation from any point.
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::note::ParsedNote;
    /// use tone_txt::rational::Rational;
    /// use tone_txt::synth::ToneSynthesizer;
    /// use tone_txt::wave::Stereo;
    ///
    /// let synth = ToneSynthesizer::new(8, 100.0);
    /// let notes = vec![ParsedNote::tone(Rational::new(1, 2), 2.0), ParsedNote::rest(Rational::new(1, 4))];
    /// let samples: Vec<_> = synth.synthesize(notes).map(|s| s.unwrap().left).collect();
    /// assert_eq!(samples, vec![0, 100, 0, -100, 0, 0]);
    /// ```
    pub fn synthesize<I>(&self, notes: I) -> Samples<I::IntoIter>
    where
        I: IntoIterator<Item = ParsedNote>,
    {
        Samples {
            synth: *self,
            notes: notes.into_iter(),
            current: None,
            failed: false,
        }
    }
}

/// The sample stream produced by `ToneSynthesizer::synthesize`.
///
/// Yields at most one error, after which the stream ends.
#[derive(Clone, Debug)]
pub struct Samples<I> {
    synth: ToneSynthesizer,
    notes: I,
    current: Option<Voice>,
    failed: bool,
}

/// The note currently being sampled.
#[derive(Copy, Clone, Debug)]
struct Voice {
    oscillator: Oscillator,
    remaining: u64,
}

impl Voice {
    fn new(synth: &ToneSynthesizer, note: &ParsedNote) -> Self {
        Voice {
            oscillator: Oscillator::new(synth.sample_rate as f64, note.frequency()),
            remaining: synth.sample_count(note),
        }
    }

    fn next_sample(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.oscillator.next_sample())
    }
}

impl<I> Iterator for Samples<I>
where
    I: Iterator<Item = ParsedNote>,
{
    type Item = Result<Stereo<i16>, SynthError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(voice) = &mut self.current {
                if let Some(wave) = voice.next_sample() {
                    let result = to_pcm(self.synth.amplitude * wave).map(Stereo::mono);
                    self.failed = result.is_err();
                    return Some(result);
                }
            }
            let note = self.notes.next()?;
            self.current = Some(Voice::new(&self.synth, &note));
        }
    }
}

/// Round to the nearest 16 bit sample.
fn to_pcm(value: f64) -> Result<i16, SynthError> {
    let rounded = value.round();
    // NaN fails both comparisons
    if rounded >= i16::MIN as f64 && rounded <= i16::MAX as f64 {
        Ok(rounded as i16)
    } else {
        Err(SynthError::SampleOutOfRange { value })
    }
}
