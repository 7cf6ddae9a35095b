// MIDI output from finished arrangements.
//
// Converts an `Arrangement` into a Standard MIDI File for playback and
// rendering. Each of the three tracks maps to a separate SMF track; the
// engine's absolute second timestamps map to ticks through the tempo.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1
// (multi-track): a tempo meta track, then drums on channel 9 (the GM
// percussion channel), bass and pad on pitched channels with bass-like and
// pad-like program assignments.

use crate::engine::{Arrangement, Note};
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// GM program 33: Electric Bass (finger).
const BASS_PROGRAM: u8 = 33;

/// GM program 89: Pad 2 (warm).
const PAD_PROGRAM: u8 = 89;

/// Serialize an arrangement to MIDI and write it to a file.
pub fn write_midi(
    arrangement: &Arrangement,
    bpm: f64,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let smf = arrangement_to_smf(arrangement, bpm)?;
    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert an arrangement to an in-memory SMF.
///
/// Fails when the tempo meta cannot represent the bpm: the meta stores
/// microseconds per quarter in 24 bits, so anything below ~3.58 BPM has no
/// exact encoding and must be rejected rather than bit-masked silent.
pub fn arrangement_to_smf(
    arrangement: &Arrangement,
    bpm: f64,
) -> Result<Smf<'static>, Box<dyn std::error::Error>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track.
    let mut tempo_track: Track<'static> = Vec::new();
    let tempo_microseconds = (60_000_000.0 / bpm).round() as u32;
    let tempo = u24::try_from(tempo_microseconds).ok_or_else(|| {
        format!(
            "tempo {bpm} BPM is too slow for MIDI ({tempo_microseconds} us per quarter exceeds the {} limit)",
            u24::max_value()
        )
    })?;
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(tempo)),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    // Channel 9 makes a GM synth treat the drum track as percussion.
    let parts: [(&str, u4, Option<u8>, &[Note]); 3] = [
        ("Fractal Drums", u4::new(9), None, &arrangement.drums),
        ("Fractal Bass", u4::new(0), Some(BASS_PROGRAM), &arrangement.bass),
        ("Sierpinski Pad", u4::new(1), Some(PAD_PROGRAM), &arrangement.pad),
    ];

    for (name, channel, program, notes) in parts {
        smf.tracks.push(part_track(name, channel, program, notes, bpm));
    }

    Ok(smf)
}

/// Build one SMF track from a part's note list.
fn part_track(
    name: &'static str,
    channel: u4,
    program: Option<u8>,
    notes: &[Note],
    bpm: f64,
) -> Track<'static> {
    let mut track: Track<'static> = Vec::new();

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(name.as_bytes())),
    });

    if let Some(program) = program {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
        });
    }

    // Expand note spans to (tick, on/off) pairs, then delta-encode. Offs
    // sort before ons at the same tick so re-struck pitches stay clean.
    let mut events: Vec<(u32, bool, u8, u8)> = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        let on_tick = secs_to_ticks(note.start, bpm);
        // A span never collapses to zero ticks.
        let off_tick = secs_to_ticks(note.end, bpm).max(on_tick + 1);
        events.push((on_tick, true, note.pitch, note.velocity));
        events.push((off_tick, false, note.pitch, 0));
    }
    events.sort_by_key(|&(tick, is_on, pitch, _)| (tick, is_on, pitch));

    let mut last_tick: u32 = 0;
    for (tick, is_on, pitch, velocity) in events {
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::new(pitch),
                vel: u7::new(velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(pitch),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });

    track
}

fn secs_to_ticks(secs: f64, bpm: f64) -> u32 {
    (secs * bpm / 60.0 * f64::from(TICKS_PER_QUARTER)).round() as u32
}
