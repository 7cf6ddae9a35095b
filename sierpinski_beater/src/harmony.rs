// The harmony model: one chord per bar.
//
// The piece cycles a fixed four-bar phrase (two bars of tonic, one of
// mediant, one of dominant) for its whole length; there is no modulation
// across sections. Each chord is a stack of four scale degrees drawn from
// the active mode's offset table, with two mode-specific substitutions at
// the 4th chord tone:
//
// - Phrygian tonic swaps degree 6 for degree 5: the b2-colored 7th clashes
//   against the root there.
// - Mixolydian mediant and dominant swap in degree 1, the bVII coloring
//   that gives the mode its bright-rock sound.
//
// Every degree index stays within 0-6 by construction; the substitutions
// exist precisely so no stack ever reaches past the table.

use crate::mode::ScaleMode;

/// The harmonic content of one bar: a root and four chord tones, all MIDI
/// note numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub root: u8,
    pub tones: [u8; 4],
}

/// Select the chord for a bar. Pure: depends only on `bar % 4`, the mode,
/// and the preset's root base.
pub fn chord_for_bar(bar: u32, mode: ScaleMode, metal: bool) -> Chord {
    let offsets = mode.offsets();
    let root_base: u8 = if metal { 40 } else { 45 };
    let phase = bar % 4;

    let (root_degree, degrees) = if phase < 2 {
        // Tonic.
        let fourth = if mode == ScaleMode::Phrygian { 5 } else { 6 };
        (0, [0, 2, 4, fourth])
    } else if phase == 2 {
        // Mediant.
        let fourth = if mode == ScaleMode::Mixolydian { 1 } else { 0 };
        (2, [2, 4, 6, fourth])
    } else {
        // Dominant.
        let third = if mode == ScaleMode::Mixolydian { 1 } else { 0 };
        (4, [4, 6, third, 3])
    };

    Chord {
        root: root_base + offsets[root_degree],
        tones: degrees.map(|d| root_base + offsets[d]),
    }
}
