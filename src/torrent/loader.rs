use super::metainfo::TorrentFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TORRENT_SUFFIX: &str = ".torrent";

/// Recursively collect every .torrent file under `root`
///
/// An unreadable root is a fatal startup error; an unreadable subdirectory
/// is skipped with a warning. Returned order is unspecified.
pub fn find_torrent_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    let entries = fs::read_dir(root)
        .context(format!("Failed to read folder '{}'", root.display()))?;
    walk(entries, &mut found);

    Ok(found)
}

fn walk(entries: fs::ReadDir, found: &mut Vec<PathBuf>) {
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        if path.is_dir() {
            match fs::read_dir(&path) {
                Ok(entries) => walk(entries, found),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable subdirectory")
                }
            }
        } else if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(TORRENT_SUFFIX))
        {
            found.push(path);
        }
    }
}

/// Find and parse every torrent file under `root`
///
/// A file that fails to read or decode is skipped with a warning; it never
/// affects the other torrents.
pub fn load_torrents(root: &Path) -> Result<Vec<TorrentFile>> {
    info!(folder = %root.display(), "Searching for torrent files");

    let paths = find_torrent_files(root)?;
    info!(count = paths.len(), "Found torrent files, reading and parsing");

    let mut torrents = Vec::with_capacity(paths.len());
    for path in paths {
        match TorrentFile::read(&path) {
            Ok(torrent) => {
                info!(
                    path = %path.display(),
                    name = %torrent.name,
                    info_hash = %torrent.info_hash_hex(),
                    "Loaded torrent"
                );
                torrents.push(torrent);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unparseable torrent file");
            }
        }
    }

    Ok(torrents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::Value;
    use std::collections::HashSet;

    fn metainfo_bytes() -> Vec<u8> {
        Value::Dict(vec![
            (b"announce".to_vec(), Value::Bytes(b"http://localhost".to_vec())),
            (
                b"info".to_vec(),
                Value::Dict(vec![
                    (b"length".to_vec(), Value::Integer(500000)),
                    (b"name".to_vec(), Value::Bytes(b"Torrent for testing".to_vec())),
                    (b"piece length".to_vec(), Value::Integer(32768)),
                    (b"pieces".to_vec(), Value::Bytes(vec![0u8; 20])),
                ]),
            ),
        ])
        .encode()
    }

    fn write_tree(root: &Path, files: &[&str], contents: &[u8]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
        }
    }

    #[test]
    fn test_finds_torrents_at_all_depths() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            "pineapple.torrent",
            "a/apple.torrent",
            "a/b/banana.torrent",
            "a/b/c/d/cherry.torrent",
            "a/b/c/d/e/orange.torrent",
        ];
        write_tree(dir.path(), &files, &metainfo_bytes());

        let found = find_torrent_files(dir.path()).unwrap();
        let found: HashSet<PathBuf> = found.into_iter().collect();
        let expected: HashSet<PathBuf> =
            files.iter().map(|f| dir.path().join(f)).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_skips_non_torrent_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &["a/apple.torrent", "pineapple.torrent"],
            &metainfo_bytes(),
        );
        write_tree(dir.path(), &["a/banana.jpg", "a/b/c/orange.mp3"], b"noise");

        let found = find_torrent_files(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.to_str().unwrap().ends_with(".torrent")));
    }

    #[test]
    fn test_unreadable_root_is_fatal() {
        assert!(find_torrent_files(Path::new("/nonexistent/torrent/folder")).is_err());
    }

    #[test]
    fn test_load_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &["good.torrent", "sub/also_good.torrent"],
            &metainfo_bytes(),
        );
        write_tree(dir.path(), &["bad.torrent"], b"this is not bencode");

        let torrents = load_torrents(dir.path()).unwrap();
        assert_eq!(torrents.len(), 2);
        assert!(torrents.iter().all(|t| t.name == "Torrent for testing"));
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_torrents(dir.path()).unwrap().is_empty());
    }
}
