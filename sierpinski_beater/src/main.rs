// Sierpinski Beater CLI entry point.
//
// Generates a fractal drum/bass/pad arrangement and writes it to MIDI,
// optionally rendering a WAV through FluidSynth when a SoundFont is set.
// With flags it runs once and exits; with no arguments it opens an
// interactive session for picking a preset, soundfont, and output name.
//
// Usage:
//   beater [OPTIONS]
//     --metal                 Argent Metal preset tables (E root, ride, 96 BPM default)
//     --mode <0-3>            Scale mode: 0 Aeolian, 1 Dorian, 2 Phrygian, 3 Mixolydian
//     --tempo <BPM>           Tempo in quarter notes per minute
//     --bars <N>              Length in 4/4 bars
//     --soundfont <PATH>      .sf2 bank for WAV rendering (optional)
//     --output <BASE>         Output base name (default: sierpinski_beat)
//     --export-json <PATH>    Also dump the generated arrangement as JSON

use read_input::InputBuild;
use read_input::prelude::input;
use sierpinski_beater::config::BeatConfig;
use sierpinski_beater::engine::{Arrangement, generate};
use sierpinski_beater::midi::write_midi;
use sierpinski_beater::mode::ScaleMode;
use sierpinski_beater::render::render_wav;
use sierpinski_beater::soundfont::{find_soundfonts, validate_soundfont};
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT: &str = "sierpinski_beat";

/// Menu entry that ends the interactive session.
const MENU_EXIT: usize = 6;

fn main() {
    if std::env::args().len() > 1 {
        run_cli();
    } else {
        run_session();
    }
}

// --- one-shot CLI ---

struct CliOptions {
    metal: bool,
    mode: Option<usize>,
    tempo: Option<f64>,
    bars: Option<u32>,
    soundfont: Option<PathBuf>,
    output: String,
    export_json: Option<PathBuf>,
}

fn run_cli() {
    let options = parse_args();

    // All user errors are reported here, before generation starts.
    let mode = match ScaleMode::from_index(options.mode.unwrap_or(if options.metal {
        ScaleMode::Phrygian.index()
    } else {
        0
    })) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let tempo = options.tempo.unwrap_or(if options.metal { 96.0 } else { 120.0 });
    let bars = options.bars.unwrap_or(if options.metal { 128 } else { 64 });
    let config = match BeatConfig::new(mode, tempo, bars, options.metal) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(sf2) = &options.soundfont {
        if let Err(e) = validate_soundfont(sf2) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = run_generation(
        &config,
        options.soundfont.as_deref(),
        &options.output,
        options.export_json.as_deref(),
    ) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_args() -> CliOptions {
    let mut options = CliOptions {
        metal: false,
        mode: None,
        tempo: None,
        bars: None,
        soundfont: None,
        output: DEFAULT_OUTPUT.to_string(),
        export_json: None,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--metal" => options.metal = true,
            "--mode" => {
                i += 1;
                options.mode = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--mode requires an index 0-3");
                    std::process::exit(1);
                }));
            }
            "--tempo" => {
                i += 1;
                options.tempo =
                    Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--tempo requires a BPM value");
                        std::process::exit(1);
                    }));
            }
            "--bars" => {
                i += 1;
                options.bars = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--bars requires a positive count");
                    std::process::exit(1);
                }));
            }
            "--soundfont" => {
                i += 1;
                options.soundfont = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--soundfont requires a path");
                    std::process::exit(1);
                }));
            }
            "--output" => {
                i += 1;
                options.output = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a value");
                    std::process::exit(1);
                });
            }
            "--export-json" => {
                i += 1;
                options.export_json = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--export-json requires a path");
                    std::process::exit(1);
                }));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_usage() {
    println!("Usage: beater [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --metal                 Argent Metal preset tables (E root, ride, 96 BPM default)");
    println!("  --mode <0-3>            Scale mode: 0 Aeolian, 1 Dorian, 2 Phrygian, 3 Mixolydian");
    println!("  --tempo <BPM>           Tempo in quarter notes per minute");
    println!("  --bars <N>              Length in 4/4 bars");
    println!("  --soundfont <PATH>      .sf2 bank for WAV rendering (optional)");
    println!("  --output <BASE>         Output base name (default: {DEFAULT_OUTPUT})");
    println!("  --export-json <PATH>    Also dump the generated arrangement as JSON");
    println!("  --help, -h              Show this help");
}

// --- generation pipeline ---

fn run_generation(
    config: &BeatConfig,
    soundfont: Option<&Path>,
    output_base: &str,
    export_json: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sierpinski Beater ===");
    println!("Mode: {}", config.mode.name());
    println!("Tempo: {} BPM", config.bpm);
    println!("Bars: {}", config.bars);
    println!("Preset: {}", if config.metal { "Argent Metal" } else { "standard" });
    println!();

    println!("[1/3] Generating fractal arrangement...");
    let arrangement = generate(config);
    println!(
        "  {} drum, {} bass, {} pad events ({:.0}s).",
        arrangement.drums.len(),
        arrangement.bass.len(),
        arrangement.pad.len(),
        f64::from(config.bars) * config.bar_secs()
    );

    let midi_path = PathBuf::from(format!("{output_base}.mid"));
    println!("[2/3] Writing MIDI to {}...", midi_path.display());
    write_midi(&arrangement, config.bpm, &midi_path)?;

    if let Some(json_path) = export_json {
        println!("  Exporting JSON to {}...", json_path.display());
        export_arrangement_json(&arrangement, json_path)?;
    }

    match soundfont {
        Some(sf2) => {
            let wav_path = PathBuf::from(format!("{output_base}.wav"));
            println!("[3/3] Rendering WAV to {}...", wav_path.display());
            // Best-effort: the .mid on disk stays valid either way.
            match render_wav(&midi_path, sf2, &wav_path) {
                Ok(()) => println!("  Done."),
                Err(e) => println!("  Warning: WAV rendering failed ({e}); MIDI kept."),
            }
        }
        None => println!("[3/3] No SoundFont set; MIDI-only output."),
    }

    println!();
    println!("Play with: timidity {} (or any MIDI player)", midi_path.display());
    Ok(())
}

fn export_arrangement_json(
    arrangement: &Arrangement,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(arrangement)?;
    std::fs::write(path, json)?;
    Ok(())
}

// --- interactive session ---

/// Session state lives entirely out here: the engine itself has no notion
/// of a running session.
struct Session {
    mode: ScaleMode,
    bpm: f64,
    bars: u32,
    metal: bool,
    soundfont: Option<PathBuf>,
    output: String,
}

fn run_session() {
    let mut session = Session {
        mode: ScaleMode::Aeolian,
        bpm: 120.0,
        bars: 64,
        metal: false,
        soundfont: None,
        output: DEFAULT_OUTPUT.to_string(),
    };

    loop {
        println!();
        println!("=== Sierpinski Beater ===");
        println!(
            "{} | {} BPM | {} bars | {}{}",
            session.mode.name(),
            session.bpm,
            session.bars,
            if session.metal { "Argent Metal" } else { "standard" },
            match &session.soundfont {
                Some(p) => format!(" | {}", p.display()),
                None => " | MIDI-only".to_string(),
            }
        );
        println!("1) Standard modes");
        println!("2) Argent Metal preset (96 BPM E Phrygian)");
        println!("3) Load SoundFont");
        println!("4) Set output name");
        println!("5) Generate");
        println!("6) Exit");
        // An empty read (EOF on a closed stdin, or a bare Enter) resolves
        // to the exit entry so the session always terminates at top level.
        let choice: usize = input()
            .msg("Enter choice: ")
            .inside(1..=MENU_EXIT)
            .default(MENU_EXIT)
            .get();

        match choice {
            1 => pick_standard(&mut session),
            2 => {
                let preset = BeatConfig::argent_metal();
                session.mode = preset.mode;
                session.bpm = preset.bpm;
                session.bars = preset.bars;
                session.metal = true;
                session.output = "sierpinski_argent_metal".to_string();
                println!("Argent Metal preset loaded: 96 BPM E Phrygian, 128 bars.");
            }
            3 => pick_soundfont(&mut session),
            4 => {
                session.output = input::<String>()
                    .msg(format!("Output base [{}]: ", session.output))
                    .default(session.output.clone())
                    .get();
            }
            5 => {
                let config = match BeatConfig::new(
                    session.mode,
                    session.bpm,
                    session.bars,
                    session.metal,
                ) {
                    Ok(config) => config,
                    Err(e) => {
                        println!("Invalid configuration: {e}");
                        continue;
                    }
                };
                if let Err(e) = run_generation(
                    &config,
                    session.soundfont.as_deref(),
                    &session.output,
                    None,
                ) {
                    println!("Generation failed: {e}");
                }
            }
            _ => {
                println!("Session complete.");
                break;
            }
        }
    }
}

fn pick_standard(session: &mut Session) {
    for mode in ScaleMode::ALL {
        println!("{}) {}", mode.index(), mode.name());
    }
    // Empty reads keep the current mode; the range check keeps the index
    // resolvable.
    let index: usize = input()
        .msg("Mode: ")
        .inside(0..=3)
        .default(session.mode.index())
        .get();
    if let Ok(mode) = ScaleMode::from_index(index) {
        session.mode = mode;
    }
    session.bpm = input().msg("Tempo (BPM) [120]: ").default(120.0).inside(1.0..=400.0).get();
    session.bars = input().msg("Bars [64]: ").default(64).inside(1..=4096).get();
    session.metal = false;
}

fn pick_soundfont(session: &mut Session) {
    println!("Scanning for SoundFonts...");
    let candidates = find_soundfonts();
    if candidates.is_empty() {
        println!("No SoundFonts found in the usual directories.");
    } else {
        for (i, path) in candidates.iter().enumerate() {
            println!("{}) {}", i + 1, path.display());
        }
        println!("{}) Enter custom path", candidates.len() + 1);
        println!("{}) Keep current setting", candidates.len() + 2);
        // Empty reads back out to the menu with the setting unchanged.
        let choice: usize = input()
            .msg("Select SoundFont: ")
            .inside(1..=candidates.len() + 2)
            .default(candidates.len() + 2)
            .get();
        if choice <= candidates.len() {
            session.soundfont = Some(candidates[choice - 1].clone());
            println!("Loaded {}.", candidates[choice - 1].display());
            return;
        }
        if choice == candidates.len() + 2 {
            return;
        }
    }

    let path_str: String = input()
        .msg("Full path to .sf2 (blank for MIDI-only): ")
        .default(String::new())
        .get();
    if path_str.trim().is_empty() {
        session.soundfont = None;
        println!("MIDI-only output.");
        return;
    }
    let path = PathBuf::from(path_str.trim());
    match validate_soundfont(&path) {
        Ok(()) => {
            println!("Loaded {}.", path.display());
            session.soundfont = Some(path);
        }
        Err(e) => println!("Invalid SoundFont: {e}"),
    }
}
