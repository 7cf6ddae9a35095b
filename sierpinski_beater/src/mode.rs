// Scale mode support for the fractal beat generator.
//
// Four modes are supported, each a fixed 7-note pattern of semitone offsets
// from the root. The harmony model indexes these tables by scale degree to
// build its chord stacks, and the CLI selects a mode by index 0-3.
//
// The pentatonic run table used by the bass is also defined here: it is a
// drone scale rooted at the preset's root base, independent of the current
// chord.

use serde::{Deserialize, Serialize};

/// The four supported scale modes, selectable by index 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Natural minor, dark.
    Aeolian,
    /// Minor with raised 6th.
    Dorian,
    /// Minor with lowered 2nd, the metal preset's home.
    Phrygian,
    /// Major with lowered 7th, bright rock.
    Mixolydian,
}

/// Minor pentatonic offsets for the bass run, relative to the root base.
pub const PENTATONIC: [u8; 5] = [0, 3, 5, 7, 10];

impl ScaleMode {
    pub const ALL: [ScaleMode; 4] = [
        ScaleMode::Aeolian,
        ScaleMode::Dorian,
        ScaleMode::Phrygian,
        ScaleMode::Mixolydian,
    ];

    /// Semitone offsets from the root for scale degrees 0-6.
    pub fn offsets(self) -> [u8; 7] {
        match self {
            ScaleMode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            ScaleMode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            ScaleMode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            ScaleMode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
        }
    }

    /// Resolve a mode index (0-3). Out-of-range is an error, not a wraparound.
    pub fn from_index(index: usize) -> Result<ScaleMode, Box<dyn std::error::Error>> {
        ScaleMode::ALL
            .get(index)
            .copied()
            .ok_or_else(|| format!("mode index {index} out of range (expected 0-3)").into())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name with character hint, as shown in the mode picker.
    pub fn name(self) -> &'static str {
        match self {
            ScaleMode::Aeolian => "Aeolian (dark)",
            ScaleMode::Dorian => "Dorian (modal)",
            ScaleMode::Phrygian => "Phrygian (exotic)",
            ScaleMode::Mixolydian => "Mixolydian (bright rock)",
        }
    }
}
