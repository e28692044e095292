//! # DSP (Digital Signal Processing) Core
//!
//! Everything that runs on the audio thread lives here, with no knowledge of
//! the plugin host:
//!
//! - **`delay_line`**: a fixed-capacity ring buffer whose read head glides
//!   between delay times and reads between samples with cubic Hermite
//!   interpolation.
//!
//! - **`chorus`**: the multi-tap engine. One LFO, up to eight delay lines
//!   per channel, and an equal-power wet mix on top of the dry signal.

pub mod chorus;
pub mod delay_line;
