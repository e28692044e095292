//! # Plugin Parameters
//!
//! The six knobs of the chorus. Each parameter has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to save
//!   and recall presets. Once published, never change these IDs or
//!   existing presets will break.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range** and a **default value**.
//!
//! All continuous parameters are plain `[0, 1]` amounts; the engine maps
//! them onto delay lengths and LFO rates itself.
//!
//! ## No Smoothing Here
//!
//! The delay-based parameters are already smoothed inside the engine: every
//! new delay target is reached over a linear ramp. Smoothing them a second
//! time at the parameter level would only make the knobs feel sluggish, so
//! the engine reads plain values once per block.

use nih_plug::prelude::*;

use crate::dsp::chorus::{ChorusParameters, MAX_TAPS};

/// All user-facing parameters for the chorus.
#[derive(Params)]
pub struct PluginParams {
    /// **Taps**: how many modulated voices run per channel.
    ///
    /// One tap is a vibrato-like doubling; eight taps is a dense ensemble.
    #[id = "taps"]
    pub taps: IntParam,

    /// **Delay**: how far the taps fan out behind the dry signal.
    #[id = "delay"]
    pub delay_time: FloatParam,

    /// **Depth**: how far each tap's delay swings with the LFO.
    #[id = "depth"]
    pub depth: FloatParam,

    /// **Rate**: LFO speed, 0 to 2 Hz.
    #[id = "rate"]
    pub rate: FloatParam,

    /// **Spread**: phase gap between the left and right modulation.
    /// At 0% both channels move together; at 100% they move in opposition.
    #[id = "spread"]
    pub spread: FloatParam,

    /// **Mix**: how much of the wet signal is added to the dry one.
    ///
    /// The dry signal always passes at full level; mix only raises the wet
    /// taps, along an equal-power curve.
    #[id = "mix"]
    pub mix: FloatParam,
}

impl PluginParams {
    /// Snapshot the current knob positions for the engine.
    pub fn chorus_parameters(&self) -> ChorusParameters {
        ChorusParameters {
            // The range below keeps this at 1 or more.
            tap_count: self.taps.value().max(1) as usize,
            delay_time: self.delay_time.value(),
            depth: self.depth.value(),
            rate: self.rate.value(),
            spread: self.spread.value(),
            mix: self.mix.value(),
        }
    }
}

impl Default for PluginParams {
    fn default() -> Self {
        let defaults = ChorusParameters::default();

        Self {
            taps: IntParam::new(
                "Taps",
                defaults.tap_count as i32,
                IntRange::Linear {
                    min: 1,
                    max: MAX_TAPS as i32,
                },
            ),

            delay_time: unit_param("Delay", defaults.delay_time),
            depth: unit_param("Depth", defaults.depth),
            rate: unit_param("Rate", defaults.rate),
            spread: unit_param("Spread", defaults.spread),
            mix: unit_param("Mix", defaults.mix),
        }
    }
}

/// A linear `[0, 1]` parameter displayed as a percentage: 0.40 → "40.0%".
fn unit_param(name: &str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}
