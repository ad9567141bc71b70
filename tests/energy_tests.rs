// Band-limited energy analysis tests, using 50ms frames at 16kHz (the
// amplitude detector's cadence) so the bin spacing is a round 20Hz.

use bitepace::audio::{band_energy, rms};

const SAMPLE_RATE: u32 = 16000;
const FRAME_SAMPLES: usize = 800;
const BAND_MIN_HZ: f32 = 200.0;
const BAND_MAX_HZ: f32 = 4000.0;

fn sine(freq_hz: f32, amplitude: f32) -> Vec<f32> {
    (0..FRAME_SAMPLES)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * freq_hz * t).sin()
        })
        .collect()
}

fn noise(amplitude: f32) -> Vec<f32> {
    let mut state = 0x2545F4914F6CDD1Du64;
    (0..FRAME_SAMPLES)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            (unit * 2.0 - 1.0) * amplitude
        })
        .collect()
}

#[test]
fn test_silence_has_zero_energy() {
    let silence = vec![0.0f32; FRAME_SAMPLES];
    let energy = band_energy(&silence, SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    assert_eq!(energy, 0.0);
}

#[test]
fn test_broadband_noise_clears_the_detection_threshold() {
    let energy = band_energy(&noise(0.6), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    assert!(
        energy > 0.5,
        "loud broadband noise should read high, got {}",
        energy
    );
    assert!(energy <= 1.0);
}

#[test]
fn test_quiet_noise_reads_below_loud_noise() {
    let quiet = band_energy(&noise(0.01), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    let loud = band_energy(&noise(0.6), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    assert!(
        quiet < loud,
        "quiet {} should read below loud {}",
        quiet,
        loud
    );
}

#[test]
fn test_in_band_tone_outreads_out_of_band_tone() {
    // 1kHz sits inside the 200-4000Hz band; 6kHz does not. Both align with
    // a 20Hz bin so there is no spectral leakage into the band.
    let in_band = band_energy(&sine(1000.0, 0.8), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    let out_of_band = band_energy(&sine(6000.0, 0.8), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);

    assert!(in_band > 0.0, "in-band tone registers, got {}", in_band);
    assert!(
        out_of_band < 0.05,
        "out-of-band tone should barely register, got {}",
        out_of_band
    );
    assert!(in_band > out_of_band);
}

#[test]
fn test_subsonic_tone_is_excluded_by_the_band_floor() {
    // 100Hz aligns with bin 5, below the 200Hz band edge
    let energy = band_energy(&sine(100.0, 0.8), SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ);
    assert!(energy < 0.05, "got {}", energy);
}

#[test]
fn test_degenerate_inputs_read_zero() {
    assert_eq!(band_energy(&[], SAMPLE_RATE, BAND_MIN_HZ, BAND_MAX_HZ), 0.0);
    assert_eq!(
        band_energy(&noise(0.6), SAMPLE_RATE, 4000.0, 200.0),
        0.0,
        "inverted band is empty"
    );
    assert_eq!(band_energy(&noise(0.6), 0, BAND_MIN_HZ, BAND_MAX_HZ), 0.0);
}

#[test]
fn test_rms_of_constant_signal_is_its_level() {
    let level = rms(&vec![0.5f32; FRAME_SAMPLES]);
    assert!((level - 0.5).abs() < 1e-6, "got {}", level);
    assert_eq!(rms(&[]), 0.0);
}
