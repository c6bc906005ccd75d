//! Block-averaging sample rate conversion
//!
//! A non-interpolating box-filter decimator. Output sample `k` is the mean of
//! the input samples in `[boundary(k-1), boundary(k))` where
//! `boundary(k) = round((k + 1) * ratio)` and `boundary(-1) = 0`.
//!
//! Rounding is `f64::round`, i.e. half away from zero, everywhere (output
//! length and every boundary). All boundaries are non-negative, so this is
//! the same as rounding half up. Window arithmetic is done in `f64` and the
//! mean is narrowed to `f32` once per output sample.

use thiserror::Error;

use super::frame::Signal;

/// Errors from resampling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    #[error("Invalid sample rate conversion: {source_rate} Hz -> {target_rate} Hz")]
    InvalidRate { source_rate: u32, target_rate: u32 },
}

/// Number of output samples for `input_len` samples converted by `ratio`.
pub fn output_len(input_len: usize, source_rate: u32, target_rate: u32) -> usize {
    let ratio = source_rate as f64 / target_rate as f64;
    (input_len as f64 / ratio).round() as usize
}

/// Convert `signal` to `target_rate`.
///
/// Returns the input untouched when the rates already match. Works for any
/// ratio, though callers only ever downsample.
pub fn resample(signal: Signal, target_rate: u32) -> Result<Signal, ResampleError> {
    let source_rate = signal.sample_rate();
    if source_rate == 0 || target_rate == 0 {
        return Err(ResampleError::InvalidRate {
            source_rate,
            target_rate,
        });
    }

    if source_rate == target_rate {
        return Ok(signal);
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let input = signal.samples();
    let len = output_len(input.len(), source_rate, target_rate);

    let mut output = Vec::with_capacity(len);
    let mut start = 0usize;
    for k in 0..len {
        let end = ((k + 1) as f64 * ratio).round() as usize;
        output.push(window_mean(input, start, end));
        start = end;
    }

    Ok(Signal::new(output, target_rate))
}

/// Mean of `input[start..end]`, clipped to the input. Empty windows yield 0.
fn window_mean(input: &[f32], start: usize, end: usize) -> f32 {
    let lo = start.min(input.len());
    let hi = end.min(input.len());
    let window = if lo < hi { &input[lo..hi] } else { &[][..] };

    let sum: f64 = window.iter().map(|&s| s as f64).sum();
    (sum / window.len().max(1) as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_rates_match() {
        let signal = Signal::new(vec![0.25, -0.5, 1.0], 16000);
        let out = resample(signal.clone(), 16000).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn halves_by_pairwise_mean() {
        let signal = Signal::new(vec![1.0, -1.0, 0.5, 0.0], 4);
        let out = resample(signal, 2).unwrap();
        assert_eq!(out.samples(), &[0.0, 0.25]);
        assert_eq!(out.sample_rate(), 2);
    }

    #[test]
    fn one_second_48k_to_16k() {
        let signal = Signal::new(vec![0.1; 48000], 48000);
        let out = resample(signal, 16000).unwrap();
        assert_eq!(out.len(), 16000);
        assert!(out.samples().iter().all(|&s| (s - 0.1).abs() < 1e-6));
    }

    #[test]
    fn length_law_44k1() {
        for len in [0usize, 1, 2, 3, 4095, 4096, 44100, 100_000] {
            let signal = Signal::new(vec![0.0; len], 44100);
            let expected = (len as f64 / (44100.0 / 16000.0)).round() as usize;
            assert_eq!(resample(signal, 16000).unwrap().len(), expected, "len {}", len);
        }
    }

    #[test]
    fn uneven_windows_44k1() {
        // ratio 2.75625: boundaries 3, 6, 8, 11
        let input: Vec<f32> = (0..11).map(|i| i as f32).collect();
        let out = resample(Signal::new(input, 44100), 16000).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out.samples(), &[1.0, 4.0, 6.5, 9.0]);
    }

    #[test]
    fn upsampling_leaves_empty_windows_at_zero() {
        // ratio 0.5: boundaries 1, 1, 2, 2
        let out = resample(Signal::new(vec![0.8, -0.4], 8000), 16000).unwrap();
        assert_eq!(out.samples(), &[0.8, 0.0, -0.4, 0.0]);
    }

    #[test]
    fn windows_past_the_end_are_clipped() {
        // 5 samples at ratio 3 -> round(1.666) = 2 outputs; second window [3, 6) clipped to [3, 5)
        let out = resample(Signal::new(vec![0.0, 0.0, 0.3, 0.6, 0.2], 48000), 16000).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out.samples()[0] - 0.1).abs() < 1e-7);
        assert!((out.samples()[1] - 0.4).abs() < 1e-7);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let err = resample(Signal::new(vec![0.0], 0), 16000).unwrap_err();
        assert_eq!(
            err,
            ResampleError::InvalidRate {
                source_rate: 0,
                target_rate: 16000
            }
        );
        assert!(resample(Signal::new(vec![0.0], 48000), 0).is_err());
    }
}
