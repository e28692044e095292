//! # Modulated Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and plays them back a fixed number of
//! samples later. A chorus needs more than that: the delay time itself is
//! constantly moving, pushed around by an LFO. This delay line therefore
//! owns its own delay-time *ramp* and reads the ring at fractional
//! positions.
//!
//! ## Ramping the Read Head
//!
//! Jumping the read head from one position to another cuts the waveform
//! and produces a click. Instead, every new delay target is approached
//! linearly over [`RAMP_LENGTH_SAMPLES`] samples:
//!
//! ```text
//! velocity = (target - current) / RAMP_LENGTH_SAMPLES
//! current += velocity            (once per written sample)
//! ```
//!
//! While the head is moving, the playback speed is `1 - velocity`, which is
//! heard as a small Doppler pitch glide: the classic chorus shimmer.
//!
//! ## Cubic Hermite Interpolation
//!
//! The read position `write_pos - current_delay` is almost never a whole
//! number. Linear interpolation between two neighbours acts as a lowpass
//! whose strength changes with the fractional part, so a moving read head
//! gets a fluttering top end. A 4-point Hermite spline through the samples
//! at `i-1`, `i`, `i+1`, `i+2` keeps the response much flatter:
//!
//! ```text
//!   x[i-1]    x[i]  ·  x[i+1]    x[i+2]
//!               └─frac─┘
//! ```
//!
//! All four neighbours wrap around the ring with modulo arithmetic.

/// Number of samples a delay-time change takes to complete.
///
/// 480 samples is 10 ms at 48 kHz: long enough to glide smoothly, short
/// enough that the LFO shape survives being sampled once per ramp.
pub const RAMP_LENGTH_SAMPLES: usize = 480;

/// Shortest allowed delay. Reading at zero delay would interpolate towards
/// the slot that is about to be overwritten.
pub const MIN_DELAY_SAMPLES: f32 = 1.0;

/// Once the ramp is this close to its target it snaps onto it.
const SETTLE_EPSILON: f32 = 1e-4;

/// A fixed-capacity ring buffer with a ramped, fractionally interpolated
/// read head.
///
/// `N` is the ring length in samples and the upper bound (exclusive) of the
/// delay time. The storage is allocated once in [`DelayLine::new`]; nothing
/// on the per-sample path allocates.
#[derive(Debug, Clone)]
pub struct DelayLine<const N: usize> {
    /// The ring itself. Always exactly `N` samples long.
    buffer: Box<[f32]>,

    /// Slot that the next call to [`write_sample`](Self::write_sample)
    /// overwrites.
    write_pos: usize,

    /// Delay the read head currently sits at, in fractional samples.
    current_delay: f32,

    /// Delay the read head is gliding towards.
    target_delay: f32,

    /// Per-sample step applied to `current_delay` while ramping.
    delay_velocity: f32,

    /// Interpolated sample produced by the most recent write.
    last_output: f32,
}

impl<const N: usize> DelayLine<N> {
    /// Longest allowed delay, one slot short of the full ring.
    pub const MAX_DELAY: f32 = (N - 1) as f32;

    // Hermite interpolation needs four distinct neighbours.
    const CAPACITY_CHECK: () = assert!(N >= 4, "delay line needs at least 4 samples");

    /// Create a silent delay line resting at the minimum delay.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;

        Self {
            buffer: vec![0.0; N].into_boxed_slice(),
            write_pos: 0,
            current_delay: MIN_DELAY_SAMPLES,
            target_delay: MIN_DELAY_SAMPLES,
            delay_velocity: 0.0,
            last_output: 0.0,
        }
    }

    /// Start gliding towards a new delay time, in fractional samples.
    ///
    /// The target is clamped to `[1, N - 1]` here, even though the chorus
    /// engine already clamps what it passes in. A target outside the ring
    /// would otherwise let the ramp drag the read head past the write head.
    ///
    /// The current delay is left untouched; only the velocity changes, so
    /// the head reaches the target after [`RAMP_LENGTH_SAMPLES`] writes.
    #[inline]
    pub fn set_delay_time(&mut self, target_samples: f32) {
        let target = target_samples.clamp(MIN_DELAY_SAMPLES, Self::MAX_DELAY);
        self.target_delay = target;
        self.delay_velocity = (target - self.current_delay) / RAMP_LENGTH_SAMPLES as f32;
    }

    /// Move the read head to `delay_samples` immediately, with no ramp.
    ///
    /// Only meant for (re)initialisation while the line is silent, since
    /// the jump is audible on a live signal.
    pub fn jump_to(&mut self, delay_samples: f32) {
        let delay = delay_samples.clamp(MIN_DELAY_SAMPLES, Self::MAX_DELAY);
        self.current_delay = delay;
        self.target_delay = delay;
        self.delay_velocity = 0.0;
    }

    /// Push one sample into the ring and compute the delayed output.
    ///
    /// Per call, in order:
    ///
    /// 1. Store `value` at the write head.
    /// 2. Step the delay ramp one sample towards its target.
    /// 3. Interpolate the ring at `write_pos - current_delay`.
    /// 4. Advance the write head, wrapping at `N`.
    ///
    /// The result is available through [`read_sample`](Self::read_sample).
    #[inline]
    pub fn write_sample(&mut self, value: f32) {
        self.buffer[self.write_pos] = value;
        self.step_ramp();
        self.last_output = self.interpolate();
        self.write_pos = (self.write_pos + 1) % N;
    }

    /// The sample computed by the most recent [`write_sample`](Self::write_sample).
    #[inline]
    pub fn read_sample(&self) -> f32 {
        self.last_output
    }

    /// Silence the ring and park the read head on its current target.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.last_output = 0.0;
        self.jump_to(self.target_delay);
    }

    pub fn current_delay(&self) -> f32 {
        self.current_delay
    }

    pub fn target_delay(&self) -> f32 {
        self.target_delay
    }

    /// Per-sample change of the delay time while a ramp is in flight.
    pub fn velocity(&self) -> f32 {
        self.delay_velocity
    }

    /// `true` once the read head has reached its target.
    pub fn is_settled(&self) -> bool {
        self.delay_velocity == 0.0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    fn step_ramp(&mut self) {
        let remaining = self.target_delay - self.current_delay;

        // Snap on the final step instead of creeping forever (or overshooting
        // by a rounding error).
        if remaining.abs() <= SETTLE_EPSILON.max(self.delay_velocity.abs()) {
            self.current_delay = self.target_delay;
            self.delay_velocity = 0.0;
        } else {
            self.current_delay += self.delay_velocity;
        }
    }

    fn interpolate(&self) -> f32 {
        let mut read_pos = self.write_pos as f32 - self.current_delay;
        if read_pos < 0.0 {
            read_pos += N as f32;
        }

        let whole = read_pos.floor();
        let frac = read_pos - whole;
        // The modulo guards against `read_pos` rounding up to exactly `N`.
        let i = whole as usize % N;

        let xm1 = self.buffer[(i + N - 1) % N];
        let x0 = self.buffer[i];
        let x1 = self.buffer[(i + 1) % N];
        let x2 = self.buffer[(i + 2) % N];

        hermite(frac, xm1, x0, x1, x2)
    }
}

impl<const N: usize> Default for DelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// 4-point, 3rd-order Hermite interpolation between `x0` and `x1`.
///
/// `frac` is the position between `x0` (0.0) and `x1` (1.0). At `frac = 0`
/// the result is exactly `x0`, so whole-sample delays pass the signal
/// through bit for bit.
#[inline]
pub fn hermite(frac: f32, xm1: f32, x0: f32, x1: f32, x2: f32) -> f32 {
    let c0 = x0;
    let c1 = 0.5 * (x1 - xm1);
    let c2 = xm1 - 2.5 * x0 + 2.0 * x1 - 0.5 * x2;
    let c3 = 0.5 * (x2 - xm1) + 1.5 * (x0 - x1);

    ((c3 * frac + c2) * frac + c1) * frac + c0
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
