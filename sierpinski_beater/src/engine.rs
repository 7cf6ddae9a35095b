// The fractal rhythm engine.
//
// Walks every bar of the configured piece on a sixteenth-note grid (16
// steps per 4/4 bar) and evaluates a fixed rule set per step to decide
// which events fire. The rules combine rhythmic backbones (kick on the
// quarters, snare backbeats) with fractal fills driven by the Sierpinski
// hit predicate, each instrument reading a different variation cycle so the
// fills phase against each other (kick bar%4, bass bar%5, hat bar%7,
// snare bar%8).
//
// Each rule is a standalone pure predicate so the rhythmic logic is
// testable without assembling a full arrangement. `generate` is the only
// assembly point: deterministic, side-effect-free, events appended in
// bar-major step-minor order.

use crate::config::BeatConfig;
use crate::fractal::is_hit;
use crate::harmony::chord_for_bar;
use crate::mode::PENTATONIC;
use serde::{Deserialize, Serialize};

/// One timed note event. Times are absolute seconds from the start of the
/// piece; `end` is always strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number 0-127.
    pub pitch: u8,
    /// MIDI velocity 0-127.
    pub velocity: u8,
    pub start: f64,
    pub end: f64,
}

impl Note {
    fn new(pitch: u8, velocity: u8, start: f64, duration: f64) -> Note {
        Note {
            pitch,
            velocity,
            start,
            end: start + duration,
        }
    }
}

/// A finished three-track arrangement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Arrangement {
    pub drums: Vec<Note>,
    pub bass: Vec<Note>,
    pub pad: Vec<Note>,
}

// General MIDI percussion keys.
const KICK: u8 = 36;
const SNARE: u8 = 38;
const CLOSED_HAT: u8 = 42;
const RIDE: u8 = 51;

/// Kick: every quarter, plus fractal double-kick fills in metal.
pub fn kick_fires(step: u32, bar: u32, metal: bool) -> bool {
    step % 4 == 0 || (metal && is_hit(step, bar % 4))
}

/// Snare: backbeats on steps 4 and 12, plus fractal ghost hits on the
/// off-quarters.
pub fn snare_fires(step: u32, bar: u32) -> bool {
    step == 4 || step == 12 || (step % 4 == 2 && is_hit(step, bar % 8))
}

/// Hat (ride in metal): pure fractal pattern.
pub fn hat_fires(step: u32, bar: u32) -> bool {
    is_hit(step, bar % 7)
}

/// Bass run: fractal pattern, except never on step 0: the bar's root note
/// owns that instant and a second pitch there would collide with it.
pub fn bass_run_fires(step: u32, bar: u32) -> bool {
    step != 0 && is_hit(step, bar % 5)
}

/// Generate the full arrangement for a config. Pure: two calls with the
/// same config yield identical event sets.
pub fn generate(config: &BeatConfig) -> Arrangement {
    let mut out = Arrangement::default();
    let step_secs = config.step_secs();

    for bar in 0..config.bars {
        let bar_start = f64::from(bar) * config.bar_secs();
        let chord = chord_for_bar(bar, config.mode, config.metal);

        // Sustained pad chord every other bar, held for two bars.
        if bar % 2 == 0 {
            for tone in chord.tones {
                let velocity = if config.metal { 58 } else { 52 };
                out.pad.push(Note::new(
                    tone + 12,
                    velocity,
                    bar_start,
                    config.quarter_secs() * 8.0,
                ));
            }
        }

        for step in 0..16u32 {
            let t = bar_start + f64::from(step) * step_secs;

            if kick_fires(step, bar, config.metal) {
                let velocity = if config.metal { 115 } else { 108 };
                out.drums.push(Note::new(KICK, velocity, t, 0.12));
            }

            if snare_fires(step, bar) {
                let velocity = if config.metal { 105 } else { 98 };
                out.drums.push(Note::new(SNARE, velocity, t, 0.15));
            }

            if hat_fires(step, bar) {
                let (pitch, velocity) = if config.metal {
                    (RIDE, 85)
                } else if step % 4 == 0 {
                    (CLOSED_HAT, 78)
                } else {
                    (CLOSED_HAT, 48)
                };
                out.drums.push(Note::new(pitch, velocity, t, 0.06));
            }

            if step == 0 {
                let velocity = if config.metal { 118 } else { 112 };
                let duration = if config.metal { 0.25 } else { 0.95 };
                out.bass.push(Note::new(chord.root, velocity, t, duration));
            }

            if bass_run_fires(step, bar) {
                let pitch = config.root_base() + PENTATONIC[step as usize % PENTATONIC.len()];
                let velocity = if config.metal {
                    112
                } else if step % 8 == 0 {
                    105
                } else {
                    88
                };
                let duration = if config.metal { 0.18 } else { 0.28 };
                out.bass.push(Note::new(pitch, velocity, t, duration));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ScaleMode;

    fn one_bar_standard() -> Arrangement {
        generate(&BeatConfig::standard(ScaleMode::Aeolian, 120.0, 1).unwrap())
    }

    #[test]
    fn test_single_bar_bass_root() {
        // Exactly one bass-root event: t = 0, A2, velocity 112, 0.95s.
        let arrangement = one_bar_standard();
        let roots: Vec<&Note> = arrangement.bass.iter().filter(|n| n.start == 0.0).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].pitch, 45);
        assert_eq!(roots[0].velocity, 112);
        assert!((roots[0].end - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_single_bar_kick_pattern() {
        // Standard kit: four kicks on the quarters, 0.5s apart at 120 BPM.
        let arrangement = one_bar_standard();
        let kicks: Vec<&Note> = arrangement.drums.iter().filter(|n| n.pitch == KICK).collect();
        assert_eq!(kicks.len(), 4);
        for (i, kick) in kicks.iter().enumerate() {
            assert_eq!(kick.velocity, 108);
            assert!((kick.start - i as f64 * 0.5).abs() < 1e-9);
            assert!((kick.end - kick.start - 0.12).abs() < 1e-9);
        }
    }

    #[test]
    fn test_kick_velocity_by_preset() {
        let metal = generate(&BeatConfig::argent_metal());
        assert!(
            metal
                .drums
                .iter()
                .filter(|n| n.pitch == KICK)
                .all(|n| n.velocity == 115)
        );
        let standard = generate(&BeatConfig::standard(ScaleMode::Mixolydian, 140.0, 8).unwrap());
        assert!(
            standard
                .drums
                .iter()
                .filter(|n| n.pitch == KICK)
                .all(|n| n.velocity == 108)
        );
    }

    #[test]
    fn test_bass_run_never_on_step_zero() {
        for bar in 0..40 {
            assert!(!bass_run_fires(0, bar));
        }
        // So at most one bass event per bar sits at the bar line.
        let config = BeatConfig::standard(ScaleMode::Dorian, 120.0, 16).unwrap();
        let arrangement = generate(&config);
        for bar in 0..config.bars {
            let bar_start = f64::from(bar) * config.bar_secs();
            let at_bar_line = arrangement
                .bass
                .iter()
                .filter(|n| n.start == bar_start)
                .count();
            assert_eq!(at_bar_line, 1, "bar {bar}");
        }
    }

    #[test]
    fn test_snare_backbeats() {
        // Steps 4 and 12 always fire; step 0 never does.
        for bar in 0..16 {
            assert!(snare_fires(4, bar));
            assert!(snare_fires(12, bar));
            assert!(!snare_fires(0, bar));
        }
    }

    #[test]
    fn test_metal_uses_ride() {
        let metal = generate(&BeatConfig::argent_metal());
        assert!(metal.drums.iter().all(|n| n.pitch != CLOSED_HAT));
        assert!(metal.drums.iter().any(|n| n.pitch == RIDE));
        let standard = generate(&BeatConfig::standard(ScaleMode::Aeolian, 120.0, 8).unwrap());
        assert!(standard.drums.iter().all(|n| n.pitch != RIDE));
    }

    #[test]
    fn test_pad_every_other_bar() {
        let config = BeatConfig::standard(ScaleMode::Aeolian, 120.0, 4).unwrap();
        let arrangement = generate(&config);
        // Bars 0 and 2 each contribute four tones, held two bars.
        assert_eq!(arrangement.pad.len(), 8);
        for note in &arrangement.pad {
            assert_eq!(note.velocity, 52);
            assert!((note.end - note.start - 4.0).abs() < 1e-9); // 8 quarters at 120
        }
        let starts: Vec<f64> = arrangement.pad.iter().map(|n| n.start).collect();
        assert!(starts[..4].iter().all(|&s| s == 0.0));
        assert!(starts[4..].iter().all(|&s| (s - 4.0).abs() < 1e-9));
    }

    #[test]
    fn test_pad_raised_one_octave() {
        let config = BeatConfig::standard(ScaleMode::Aeolian, 120.0, 1).unwrap();
        let arrangement = generate(&config);
        let chord = chord_for_bar(0, config.mode, config.metal);
        let pitches: Vec<u8> = arrangement.pad.iter().map(|n| n.pitch).collect();
        let expected: Vec<u8> = chord.tones.iter().map(|&t| t + 12).collect();
        assert_eq!(pitches, expected);
    }

    #[test]
    fn test_bass_run_is_rooted_pentatonic() {
        let config = BeatConfig::argent_metal();
        let arrangement = generate(&config);
        let allowed: Vec<u8> = PENTATONIC.iter().map(|&o| 40 + o).collect();
        for note in arrangement.bass.iter().filter(|n| n.velocity == 112) {
            assert!(allowed.contains(&note.pitch), "pitch {}", note.pitch);
        }
    }

    #[test]
    fn test_event_times_on_grid() {
        let config = BeatConfig::standard(ScaleMode::Mixolydian, 96.0, 8).unwrap();
        let arrangement = generate(&config);
        let step = config.step_secs();
        for note in arrangement.drums.iter().chain(&arrangement.bass) {
            let steps = note.start / step;
            assert!((steps - steps.round()).abs() < 1e-6);
            assert!(note.end > note.start);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = BeatConfig::argent_metal();
        assert_eq!(generate(&config), generate(&config));
    }
}
