// SoundFont discovery and validation.
//
// Rendering to WAV needs a GM sample bank (.sf2). This module scans a small
// fixed set of user and system directories for candidates to offer in the
// picker, and validates explicitly supplied paths. Finding nothing is not
// an error: generation falls back to MIDI-only output.

use std::path::{Path, PathBuf};

/// Directories searched for .sf2 files, relative to the user's home except
/// for the system path.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join("SoundFonts"));
        dirs.push(home.join("Music").join("SoundFonts"));
        dirs.push(home.join("Downloads"));
    }
    dirs.push(PathBuf::from("/usr/share/sounds/sf2"));
    dirs
}

/// Scan the search directories for SoundFont files. Returns a sorted,
/// deduplicated list; missing directories are skipped.
pub fn find_soundfonts() -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in search_dirs() {
        collect_sf2(&dir, &mut found);
    }
    found.sort();
    found.dedup();
    found
}

/// Recursively gather .sf2 files under `dir`. Unreadable entries are
/// skipped rather than reported: discovery is best-effort.
fn collect_sf2(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_sf2(&path, found);
        } else if is_sf2(&path) {
            found.push(path);
        }
    }
}

fn is_sf2(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sf2"))
}

/// Validate a user-supplied SoundFont path: it must exist and carry the
/// .sf2 extension. Reported before generation starts, never mid-run.
pub fn validate_soundfont(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("SoundFont not found: {}", path.display()).into());
    }
    if !is_sf2(path) {
        return Err(format!("not a .sf2 file: {}", path.display()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(is_sf2(Path::new("bank.sf2")));
        assert!(is_sf2(Path::new("bank.SF2")));
        assert!(!is_sf2(Path::new("bank.wav")));
        assert!(!is_sf2(Path::new("sf2")));
    }

    #[test]
    fn test_validate_missing_path() {
        assert!(validate_soundfont(Path::new("/nonexistent/bank.sf2")).is_err());
    }

    #[test]
    fn test_validate_wrong_extension() {
        let dir = std::env::temp_dir().join("beater_sf2_test");
        std::fs::create_dir_all(&dir).unwrap();
        let bogus = dir.join("bank.txt");
        std::fs::write(&bogus, b"not a soundfont").unwrap();
        assert!(validate_soundfont(&bogus).is_err());

        let good = dir.join("bank.sf2");
        std::fs::write(&good, b"RIFF").unwrap();
        assert!(validate_soundfont(&good).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_collect_skips_missing_dir() {
        let mut found = Vec::new();
        collect_sf2(Path::new("/nonexistent/sounds"), &mut found);
        assert!(found.is_empty());
    }
}
