/// A sine oscillator sampling at a fixed sample rate.
///
/// Every sample is computed from its index rather than by accumulating the phase,
/// so the `n`-th sample does not depend on rounding errors of the ones before it.
#[derive(Copy, Clone, Debug)]
pub struct Oscillator {
    sample_rate: f64,
    frequency: f64,
    index: u64,
}

impl Oscillator {
    pub fn new(sample_rate: f64, frequency: f64) -> Self {
        Self {
            sample_rate,
            frequency,
            index: 0,
        }
    }

    /// The next value in the range `[-1, 1]`.
    pub fn next_sample(&mut self) -> f64 {
        use std::f64::consts::PI;
        let phase = 2.0 * PI * self.frequency * self.index as f64 / self.sample_rate;
        self.index += 1;
        phase.sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_period() {
        let mut osc = Oscillator::new(8.0, 2.0);
        let samples: Vec<f64> = (0..4).map(|_| osc.next_sample()).collect();
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1.0).abs() < 1e-12);
        assert!(samples[2].abs() < 1e-12);
        assert!((samples[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_frequency_is_flat() {
        let mut osc = Oscillator::new(44100.0, 0.0);
        assert!((0..1000).all(|_| osc.next_sample() == 0.0));
    }
}
