//! Audio file discovery.
//!
//! Collects the files lyrics can be written to (mp3 and flac, any case),
//! either directly inside a folder or in the whole tree below it.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::metadata::FileKind;

/// Finds the supported audio files under `root`.
///
/// With `recursive` off only the direct children of `root` are looked at.
/// A file path is returned as is when it is supported. Results are sorted
/// by path so repeated runs list tracks in the same order.
pub fn discover(root: &Path, recursive: bool) -> Vec<PathBuf> {
    if root.is_file() {
        return if is_supported(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(target: "scanner", error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported(p))
        .collect();

    paths.sort();
    tracing::debug!(target: "scanner", root = %root.display(), count = paths.len(), "Discovered audio files");
    paths
}

/// Whether lyrics can be stored in this file.
pub fn is_supported(path: &Path) -> bool {
    FileKind::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_discover_audio_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("song.mp3")).unwrap();
        File::create(root.join("music.flac")).unwrap();
        File::create(root.join("notes.txt")).unwrap(); // Should be ignored
        File::create(root.join("other.ogg")).unwrap(); // No lyrics support
        File::create(root.join("UPPERCASE.MP3")).unwrap(); // Case-insensitive

        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("track.flac")).unwrap();

        let recursive = names(&discover(root, true));
        assert_eq!(recursive.len(), 4);
        assert!(recursive.contains(&"track.flac".to_string()));
        assert!(recursive.contains(&"UPPERCASE.MP3".to_string()));
        assert!(!recursive.contains(&"other.ogg".to_string()));

        let flat = names(&discover(root, false));
        assert_eq!(flat.len(), 3);
        assert!(!flat.contains(&"track.flac".to_string()));
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempdir().unwrap();
        let song = dir.path().join("song.mp3");
        let text = dir.path().join("readme.txt");
        File::create(&song).unwrap();
        File::create(&text).unwrap();

        assert_eq!(discover(&song, false), vec![song]);
        assert!(discover(&text, true).is_empty());
    }

    #[test]
    fn test_discover_is_sorted() {
        let dir = tempdir().unwrap();
        for name in ["c.mp3", "a.mp3", "b.flac"] {
            File::create(dir.path().join(name)).unwrap();
        }
        assert_eq!(names(&discover(dir.path(), false)), vec!["a.mp3", "b.flac", "c.mp3"]);
    }

    #[test]
    fn test_discover_missing_root() {
        assert!(discover(Path::new("/definitely/not/here"), true).is_empty());
    }
}
