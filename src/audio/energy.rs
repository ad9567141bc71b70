//! Band-limited energy analysis for the amplitude detector
//!
//! Cutlery and chewing energy concentrates between roughly 200 Hz and 4 kHz,
//! so the detector averages spectral magnitude over that band only. The DFT
//! is evaluated directly at the band's bins; frames are short (50ms) and the
//! bin count is capped, so no FFT machinery is needed.

use std::f32::consts::PI;

/// Upper bound on evaluated bins per frame
const MAX_BINS: usize = 64;

// Per-bin magnitudes are mapped to [0, 1] over this dB range before
// averaging, matching the byte-frequency scale the amplitude threshold was
// tuned against.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// Mean normalized spectral magnitude (0..1) within [min_hz, max_hz].
///
/// Samples are expected in [-1, 1]. Returns 0.0 for empty input or an empty
/// band.
pub fn band_energy(samples: &[f32], sample_rate: u32, min_hz: f32, max_hz: f32) -> f32 {
    let n = samples.len();
    if n == 0 || sample_rate == 0 || max_hz <= min_hz {
        return 0.0;
    }

    let bin_hz = sample_rate as f32 / n as f32;
    let min_bin = (min_hz / bin_hz).floor().max(1.0) as usize;
    let max_bin = ((max_hz / bin_hz).ceil() as usize).min(n / 2);
    if max_bin <= min_bin {
        return 0.0;
    }

    let bin_count = max_bin - min_bin;
    let step = (bin_count / MAX_BINS).max(1);

    let mut sum = 0.0f32;
    let mut count = 0usize;
    let mut k = min_bin;
    while k < max_bin {
        sum += normalize_db(bin_magnitude(samples, k));
        count += 1;
        k += step;
    }

    if count == 0 {
        return 0.0;
    }
    (sum / count as f32).clamp(0.0, 1.0)
}

/// Map a linear bin magnitude onto the 0..1 dB scale
fn normalize_db(magnitude: f32) -> f32 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * magnitude.log10();
    ((db - MIN_DB) / (MAX_DB - MIN_DB)).clamp(0.0, 1.0)
}

/// Magnitude of DFT bin `k`, scaled so a full-scale sinusoid at the bin
/// frequency reads ~1.0
fn bin_magnitude(samples: &[f32], k: usize) -> f32 {
    let n = samples.len() as f32;
    let w = -2.0 * PI * k as f32 / n;

    let mut re = 0.0f32;
    let mut im = 0.0f32;
    for (i, s) in samples.iter().enumerate() {
        let phase = w * i as f32;
        re += s * phase.cos();
        im += s * phase.sin();
    }

    2.0 * (re * re + im * im).sqrt() / n
}

/// Root-mean-square level of a frame
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    energy.sqrt()
}
