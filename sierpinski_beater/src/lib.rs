// Sierpinski Beater
//
// A fractal beat generator that produces a three-track arrangement (drums,
// bass, harmonic pad) from the parity pattern of binomial coefficients:
// Pascal's triangle mod 2, the Sierpinski triangle. A four-bar modal chord
// cycle supplies the harmony; a fixed rhythmic rule set, evaluated against
// the fractal hit predicate on a sixteenth-note grid, supplies the events.
//
// Architecture:
// - mode.rs: The four supported scale modes (Aeolian, Dorian, Phrygian,
//   Mixolydian) and the pentatonic run table
// - config.rs: Immutable generation configuration with preset constructors
//   (standard vs. Argent Metal) and eager validation
// - fractal.rs: The hit predicate, exact binomial-coefficient parity
// - harmony.rs: Chord selection per bar (tonic/mediant/dominant cycle with
//   mode-specific degree substitutions)
// - engine.rs: The rhythm engine, per-step rule evaluation producing timed
//   note events for all three tracks
// - midi.rs: Standard MIDI File output from a finished arrangement
// - soundfont.rs: SoundFont (.sf2) discovery and path validation
// - render.rs: Best-effort WAV rendering through an external FluidSynth
//
// Generation is a pure function of configuration: identical configs yield
// identical arrangements, with no randomness or clock dependency.

pub mod config;
pub mod engine;
pub mod fractal;
pub mod harmony;
pub mod midi;
pub mod mode;
pub mod render;
pub mod soundfont;
