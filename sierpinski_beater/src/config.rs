// Generation configuration.
//
// A `BeatConfig` is an immutable value built by one of the preset
// constructors and validated eagerly: a config that exists is a config the
// engine can run. There is no way to mutate one after construction, so
// there is no ordering hazard between preset selection and generation.

use crate::mode::ScaleMode;
use serde::{Deserialize, Serialize};

/// Everything the rhythm engine needs for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatConfig {
    pub mode: ScaleMode,
    /// Tempo in quarter notes per minute. Always finite and positive.
    pub bpm: f64,
    /// Length of the piece in 4/4 bars. Always at least 1.
    pub bars: u32,
    /// Argent Metal preset flag: selects the metal velocity/duration/pitch
    /// tables and the E2 root instead of A2.
    pub metal: bool,
}

impl BeatConfig {
    /// General validated constructor.
    pub fn new(
        mode: ScaleMode,
        bpm: f64,
        bars: u32,
        metal: bool,
    ) -> Result<BeatConfig, Box<dyn std::error::Error>> {
        Self::validated(BeatConfig {
            mode,
            bpm,
            bars,
            metal,
        })
    }

    /// Standard preset: caller-chosen mode and length, clean tables, A2 root.
    pub fn standard(
        mode: ScaleMode,
        bpm: f64,
        bars: u32,
    ) -> Result<BeatConfig, Box<dyn std::error::Error>> {
        Self::new(mode, bpm, bars, false)
    }

    /// The Argent Metal preset: 96 BPM E Phrygian, 128 bars, metal tables.
    pub fn argent_metal() -> BeatConfig {
        BeatConfig {
            mode: ScaleMode::Phrygian,
            bpm: 96.0,
            bars: 128,
            metal: true,
        }
    }

    fn validated(config: BeatConfig) -> Result<BeatConfig, Box<dyn std::error::Error>> {
        if !config.bpm.is_finite() || config.bpm <= 0.0 {
            return Err(format!("tempo must be a positive number, got {}", config.bpm).into());
        }
        if config.bars == 0 {
            return Err("bar count must be at least 1".into());
        }
        Ok(config)
    }

    /// MIDI root the harmony and the bass pentatonic are built on:
    /// E2 for metal, A2 otherwise.
    pub fn root_base(&self) -> u8 {
        if self.metal { 40 } else { 45 }
    }

    /// Duration of one quarter note in seconds.
    pub fn quarter_secs(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one 4/4 bar in seconds.
    pub fn bar_secs(&self) -> f64 {
        self.quarter_secs() * 4.0
    }

    /// Duration of one sixteenth-note step in seconds.
    pub fn step_secs(&self) -> f64 {
        self.quarter_secs() / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argent_metal_preset() {
        let config = BeatConfig::argent_metal();
        assert_eq!(config.mode, ScaleMode::Phrygian);
        assert_eq!(config.bpm, 96.0);
        assert_eq!(config.bars, 128);
        assert!(config.metal);
        assert_eq!(config.root_base(), 40);
    }

    #[test]
    fn test_standard_preset() {
        let config = BeatConfig::standard(ScaleMode::Aeolian, 120.0, 64).unwrap();
        assert!(!config.metal);
        assert_eq!(config.root_base(), 45);
        assert_eq!(config.quarter_secs(), 0.5);
        assert_eq!(config.bar_secs(), 2.0);
        assert_eq!(config.step_secs(), 0.125);
    }

    #[test]
    fn test_rejects_bad_tempo() {
        assert!(BeatConfig::standard(ScaleMode::Dorian, 0.0, 4).is_err());
        assert!(BeatConfig::standard(ScaleMode::Dorian, -96.0, 4).is_err());
        assert!(BeatConfig::standard(ScaleMode::Dorian, f64::NAN, 4).is_err());
        assert!(BeatConfig::standard(ScaleMode::Dorian, f64::INFINITY, 4).is_err());
    }

    #[test]
    fn test_rejects_zero_bars() {
        assert!(BeatConfig::standard(ScaleMode::Dorian, 120.0, 0).is_err());
        assert!(BeatConfig::new(ScaleMode::Phrygian, 96.0, 0, true).is_err());
    }
}
