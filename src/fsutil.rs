//! Atomic file replacement shared by the catalog and project stores.
//!
//! Full new content goes to a sibling temporary file which is then renamed
//! over the target. Rename is the only operation assumed atomic, so a crash
//! mid-write never corrupts the previously durable version.

use std::fs;
use std::path::Path;

use crate::error::HyugaResult;

/// Write `content` to `path` atomically via `<path>.tmp` + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> HyugaResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, content)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> HyugaResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        atomic_write(&path, b"[1,2,3]").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[1,2,3]");
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn stray_temp_file_does_not_shadow_target() {
        // A partial write that never reached the rename leaves only the .tmp
        // file behind; the durable version must stay intact.
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        atomic_write(&path, b"durable").unwrap();
        fs::write(dir.path().join("out.json.tmp"), b"parti").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"durable");
    }
}
