// Best-effort WAV rendering through an external FluidSynth.
//
// The renderer is an optional collaborator: the .mid file on disk is the
// primary output, and a rendering failure must leave it untouched. Callers
// treat an `Err` here as a warning, not a fatal error.

use std::path::Path;
use std::process::Command;

/// Output sample rate for rendered audio.
const SAMPLE_RATE: u32 = 44_100;

/// Render a written MIDI file to WAV using the `fluidsynth` executable and
/// the given SoundFont. Fails if the binary is missing or exits non-zero;
/// the MIDI file is not modified either way.
pub fn render_wav(
    midi_path: &Path,
    sf2_path: &Path,
    wav_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    run_renderer("fluidsynth", midi_path, sf2_path, wav_path)
}

fn run_renderer(
    program: &str,
    midi_path: &Path,
    sf2_path: &Path,
    wav_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = Command::new(program)
        .arg("-ni")
        .arg(sf2_path)
        .arg(midi_path)
        .arg("-F")
        .arg(wav_path)
        .arg("-r")
        .arg(SAMPLE_RATE.to_string())
        .status()
        .map_err(|e| format!("could not run {program}: {e}"))?;

    if !status.success() {
        return Err(format!("{program} exited with {status}").into());
    }
    Ok(())
}
