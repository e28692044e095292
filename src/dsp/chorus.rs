//! # Multi-Tap Chorus Engine
//!
//! The engine runs up to [`MAX_TAPS`] modulated delay lines per channel and
//! sums them on top of the dry signal:
//!
//! ```text
//!              ┌──► [tap 0 delay] ──┐
//!              ├──► [tap 1 delay] ──┤
//! dry ────┬────┼──► ...             ├──(Σ)──► × mix_wet ──┐
//!         │    └──► [tap k-1]     ──┘                     │
//!         │                                               ▼
//!         └────────────────────────────────────────────►(+)──► out
//! ```
//!
//! One LFO phase drives every tap. Each tap reads it with its own offset, so
//! the delay times drift against each other instead of moving in lockstep.
//! The right channel adds a further offset controlled by `spread`.
//!
//! Computing `sin()` for 16 taps on every sample is wasted work, because the
//! delay lines glide between targets anyway. New targets are computed once
//! every [`UPDATE_INTERVAL`] samples, which matches the delay line ramp: a
//! new target is only issued once the previous glide has finished.

use std::f32::consts::{FRAC_PI_2, TAU};

use nih_plug::{nih_debug_assert, nih_debug_assert_eq};

use super::delay_line::{DelayLine, MIN_DELAY_SAMPLES, RAMP_LENGTH_SAMPLES};

/// Maximum number of taps per channel.
pub const MAX_TAPS: usize = 8;

/// Ring length of every tap, ~100 ms at 48 kHz.
pub const MAX_DELAY_SAMPLES: usize = 4800;

/// Samples between two LFO / target recomputations.
pub const UPDATE_INTERVAL: usize = RAMP_LENGTH_SAMPLES;

/// LFO frequency at `rate = 1.0`.
const MAX_LFO_HZ: f32 = 2.0;

const MAX_TARGET_DELAY: f32 = (MAX_DELAY_SAMPLES - 1) as f32;

type TapLine = DelayLine<MAX_DELAY_SAMPLES>;

/// The complete control state of the chorus.
///
/// Everything except `tap_count` is normalized to `[0, 1]` by the caller.
/// Values outside that range are not rejected; they flow through the
/// mapping formulas and are clamped only where they become delay lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParameters {
    /// Number of active taps per channel, `1..=MAX_TAPS`.
    pub tap_count: usize,
    /// Base delay. Taps fan out from zero up to this fraction of half the ring.
    pub delay_time: f32,
    /// Modulation depth, up to half the ring.
    pub depth: f32,
    /// LFO rate, mapped linearly onto 0-2 Hz.
    pub rate: f32,
    /// Phase gap between the left and right LFO.
    pub spread: f32,
    /// Wet amount on an equal-power curve. The dry signal is never attenuated.
    pub mix: f32,
}

impl Default for ChorusParameters {
    fn default() -> Self {
        Self {
            tap_count: 2,
            delay_time: 0.1,
            depth: 0.5,
            rate: 0.5,
            spread: 1.0,
            mix: 1.0,
        }
    }
}

/// Left and right target delays, in samples, for tap `tap` of `tap_count`
/// at LFO position `phase`.
///
/// The result is always inside `[1, MAX_DELAY_SAMPLES - 1]`.
pub fn tap_targets(
    tap: usize,
    tap_count: usize,
    phase: f32,
    params: &ChorusParameters,
) -> (f32, f32) {
    let n = MAX_DELAY_SAMPLES as f32;
    let half = (MAX_DELAY_SAMPLES / 2) as f32;
    let position = tap as f32 / tap_count as f32;

    // With an even tap count, equally spaced phases pair up in exact
    // anti-phase and their modulation cancels. Squeezing the spacing to 2/3
    // of the cycle breaks the pairs.
    let spacing = if tap_count % 2 == 0 { 2.0 / 3.0 } else { 1.0 };
    let tap_phase = phase + position * spacing;

    // `spread⁴` makes the knob feel linear; half a cycle is full width.
    let stereo_offset = params.spread.powi(4) * 0.5;
    let lfo_left = (TAU * tap_phase).sin() + 1.0;
    let lfo_right = (TAU * (tap_phase + stereo_offset)).sin() + 1.0;

    let base_delay = params.delay_time * (n - half) * position;
    let mod_depth = params.depth * half;

    let target = |lfo: f32| {
        (base_delay + lfo * mod_depth * 0.5).clamp(MIN_DELAY_SAMPLES, MAX_TARGET_DELAY)
    };

    (target(lfo_left), target(lfo_right))
}

/// Stereo multi-tap chorus.
///
/// All storage (`2 × MAX_TAPS` rings of `MAX_DELAY_SAMPLES` samples) is
/// allocated in [`ChorusEngine::new`]. Processing never allocates, locks or
/// blocks, and the LFO phase and every delay ramp carry over from one block
/// to the next.
#[derive(Debug, Clone)]
pub struct ChorusEngine {
    sample_rate: f32,
    params: ChorusParameters,

    taps_left: [TapLine; MAX_TAPS],
    taps_right: [TapLine; MAX_TAPS],

    /// LFO position in `[0, 1)`.
    phase: f32,
    phase_increment: f32,

    /// `sin(mix·π/2) / √tap_count`, cached per parameter change.
    wet_gain: f32,

    /// Samples since targets were last recomputed.
    update_counter: usize,
}

impl ChorusEngine {
    pub fn new(sample_rate: f32) -> Self {
        let mut engine = Self {
            sample_rate,
            params: ChorusParameters::default(),
            taps_left: std::array::from_fn(|_| TapLine::new()),
            taps_right: std::array::from_fn(|_| TapLine::new()),
            phase: 0.0,
            phase_increment: 0.0,
            wet_gain: 0.0,
            update_counter: 0,
        };
        engine.update_derived();
        engine
    }

    /// Replace every control parameter at once.
    ///
    /// `tap_count` is held to `1..=MAX_TAPS`. Taps that come back into use
    /// are silenced first so they don't replay audio from the last time they
    /// were active.
    pub fn set_parameters(&mut self, params: ChorusParameters) {
        nih_debug_assert!(
            (1..=MAX_TAPS).contains(&params.tap_count),
            "tap count out of range"
        );

        let tap_count = params.tap_count.clamp(1, MAX_TAPS);
        let previous = self.params.tap_count;
        if tap_count > previous {
            for tap in previous..tap_count {
                self.taps_left[tap].clear();
                self.taps_right[tap].clear();
            }
        }

        self.params = ChorusParameters { tap_count, ..params };
        self.update_derived();
    }

    pub fn parameters(&self) -> &ChorusParameters {
        &self.params
    }

    /// Change the rate the LFO runs at. Ring capacity stays the same, so at
    /// higher rates the longest delay gets shorter in milliseconds.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_derived();
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Silence every tap and restart the LFO.
    pub fn reset(&mut self) {
        for tap in self.taps_left.iter_mut().chain(self.taps_right.iter_mut()) {
            tap.clear();
        }
        self.phase = 0.0;
        self.update_counter = 0;
    }

    /// Current (left, right) delay of `tap`, in samples.
    pub fn tap_delay(&self, tap: usize) -> (f32, f32) {
        (
            self.taps_left[tap].current_delay(),
            self.taps_right[tap].current_delay(),
        )
    }

    /// Current LFO position in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Process one stereo frame and return the mixed `(left, right)` output.
    #[inline]
    pub fn process_sample(&mut self, dry_left: f32, dry_right: f32) -> (f32, f32) {
        self.phase += self.phase_increment;
        self.phase -= self.phase.floor();

        let tap_count = self.params.tap_count;

        if self.update_counter == 0 {
            for tap in 0..tap_count {
                let (left, right) = tap_targets(tap, tap_count, self.phase, &self.params);
                self.taps_left[tap].set_delay_time(left);
                self.taps_right[tap].set_delay_time(right);
            }
        }

        let mut wet_left = 0.0;
        let mut wet_right = 0.0;
        for (left, right) in self.taps_left[..tap_count]
            .iter_mut()
            .zip(&mut self.taps_right[..tap_count])
        {
            left.write_sample(dry_left);
            right.write_sample(dry_right);
            wet_left += left.read_sample();
            wet_right += right.read_sample();
        }

        self.update_counter += 1;
        if self.update_counter >= UPDATE_INTERVAL {
            self.update_counter = 0;
        }

        (
            dry_left + wet_left * self.wet_gain,
            dry_right + wet_right * self.wet_gain,
        )
    }

    /// Process a block of separate input and output buffers.
    ///
    /// All four slices should have the same length; if they don't, only the
    /// common prefix is processed.
    pub fn process_block(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        nih_debug_assert_eq!(in_left.len(), in_right.len());
        nih_debug_assert_eq!(in_left.len(), out_left.len());
        nih_debug_assert_eq!(in_left.len(), out_right.len());

        for (((&dry_left, &dry_right), out_l), out_r) in in_left
            .iter()
            .zip(in_right)
            .zip(out_left.iter_mut())
            .zip(out_right.iter_mut())
        {
            (*out_l, *out_r) = self.process_sample(dry_left, dry_right);
        }
    }

    /// Process a block in place, as plugin hosts hand it over.
    pub fn process_block_in_place(&mut self, left: &mut [f32], right: &mut [f32]) {
        nih_debug_assert_eq!(left.len(), right.len());

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_sample(*l, *r);
        }
    }

    fn update_derived(&mut self) {
        self.phase_increment = self.params.rate * MAX_LFO_HZ / self.sample_rate;
        self.wet_gain =
            (self.params.mix * FRAC_PI_2).sin() / (self.params.tap_count as f32).sqrt();
    }
}
