//! # Multitap Chorus: An AU/VST3/CLAP Chorus Plugin
//!
//! A stereo chorus built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! Up to eight modulated delay taps per channel are layered on top of the
//! untouched dry signal. Outputs CLAP and VST3 everywhere, plus AUv2 on
//! macOS.
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬───────────────────────────────────────────────────────┐
//!         │                                                       │
//!         │        ┌──► [tap 0] ──┐                               │
//!         │        ├──► [tap 1] ──┤                               │
//!         └────────┼──► ...       ├──(Σ)──► × sin(mix·π/2)/√taps ─(+)──► Output
//!                  └──► [tap k-1]─┘
//!                        ▲
//!                        └── LFO, one phase offset per tap
//! ```
//!
//! The plugin layer is deliberately thin: it snapshots the knobs once per
//! block and hands the audio buffer to [`ChorusEngine`], which owns all the
//! DSP state.

pub mod dsp;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;
use params::PluginParams;

pub use dsp::chorus::{ChorusEngine, ChorusParameters, MAX_DELAY_SAMPLES, MAX_TAPS};
pub use dsp::delay_line::DelayLine;

/// The main plugin struct.
///
/// `params` is shared with the host through an `Arc` and may be read from
/// any thread. `engine` is touched only by the audio thread, in
/// `initialize()`, `reset()` and `process()`.
struct MultitapChorus {
    params: Arc<PluginParams>,

    /// All delay buffers are allocated here, once, when the plugin is
    /// created. Nothing in `process()` allocates.
    engine: ChorusEngine,
}

impl Default for MultitapChorus {
    fn default() -> Self {
        Self {
            params: Arc::new(PluginParams::default()),
            // 48 kHz is a placeholder until the host calls initialize().
            engine: ChorusEngine::new(48_000.0),
        }
    }
}

impl Plugin for MultitapChorus {
    const NAME: &'static str = "Multitap Chorus";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo only: the spread control has nothing to widen on a mono track.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // The engine reads parameters once per block, so sample-accurate
    // automation would only split blocks for nothing.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is loaded or the audio configuration changes.
    ///
    /// The delay buffers already exist (their size doesn't depend on the
    /// sample rate), so all that changes is the LFO's time base.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        if buffer_config.sample_rate <= 0.0 {
            nih_error!(
                "Refusing to initialize at a sample rate of {} Hz",
                buffer_config.sample_rate
            );
            return false;
        }

        self.engine.set_sample_rate(buffer_config.sample_rate);
        self.engine.set_parameters(self.params.chorus_parameters());
        self.engine.reset();

        nih_log!(
            "Initialized at {} Hz, longest tap delay {:.1} ms",
            buffer_config.sample_rate,
            MAX_DELAY_SAMPLES as f32 * 1000.0 / buffer_config.sample_rate
        );

        true
    }

    /// Called when playback stops or the plugin is bypassed. Clears every
    /// tap so stale audio doesn't bleed into the next playback.
    fn reset(&mut self) {
        self.engine.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.engine.set_parameters(self.params.chorus_parameters());

        if let [left, right] = buffer.as_slice() {
            self.engine.process_block_in_place(left, right);
        }

        // Once the input goes silent, the longest tap still has up to one
        // full ring of audio to play out.
        ProcessStatus::Tail(MAX_DELAY_SAMPLES as u32)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for MultitapChorus {
    const CLAP_ID: &'static str = "com.loveless-audio.multitap-chorus";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A stereo multi-tap chorus with smoothly gliding delay taps");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Chorus,
    ];
}

impl Vst3Plugin for MultitapChorus {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssMTChorus001";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────

nih_export_clap!(MultitapChorus);
nih_export_vst3!(MultitapChorus);

// Logic Pro only loads Audio Units, so on macOS the CLAP entry point is
// also wrapped as AUv2.
#[cfg(target_os = "macos")]
clap_wrapper::export_auv2!();
