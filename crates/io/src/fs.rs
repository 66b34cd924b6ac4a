// Backups and atomic replacement of register files

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Timestamp used in backup file names (`20240315_093000`).
pub fn backup_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the backup for `path`: `{stem}_{timestamp}.csv` beside it.
pub fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_{}.csv", stem, timestamp))
}

/// Copy `path` to its timestamped backup and return the backup path.
pub fn backup_with_timestamp(path: &Path, timestamp: &str) -> Result<PathBuf, String> {
    let backup = backup_path(path, timestamp);
    std::fs::copy(path, &backup).map_err(|e| {
        format!("cannot back up {} to {}: {}", path.display(), backup.display(), e)
    })?;
    info!(source = %path.display(), backup = %backup.display(), "backup written");
    Ok(backup)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `contents` to `{path}.tmp` and rename it over `path`, so readers
/// never see a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), String> {
    let tmp = tmp_path(path);
    std::fs::write(&tmp, contents)
        .map_err(|e| format!("cannot write {}: {}", tmp.display(), e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(format!("cannot replace {}: {}", path.display(), e));
    }
    debug!(path = %path.display(), bytes = contents.len(), "written atomically");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 15, 9, 30, 5).unwrap();
        assert_eq!(backup_timestamp(at), "20240315_093005");
    }

    #[test]
    fn backup_name_beside_source() {
        let path = Path::new("data/update.csv");
        assert_eq!(
            backup_path(path, "20240315_093005"),
            PathBuf::from("data/update_20240315_093005.csv")
        );
    }

    #[test]
    fn backup_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("register.csv");
        std::fs::write(&source, "Elector ID\nAA-1/0\n").unwrap();

        let backup = backup_with_timestamp(&source, "20240101_000000").unwrap();
        assert_eq!(backup, dir.path().join("register_20240101_000000.csv"));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "Elector ID\nAA-1/0\n");
        assert!(source.exists());
    }

    #[test]
    fn backup_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = backup_with_timestamp(&dir.path().join("update.csv"), "20240101_000000")
            .unwrap_err();
        assert!(err.contains("update.csv"));
    }

    #[test]
    fn atomic_write_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("register.csv");
        std::fs::write(&target, "old").unwrap();

        write_atomic(&target, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!dir.path().join("register.csv.tmp").exists());
    }

    #[test]
    fn atomic_write_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("register.csv");
        assert!(write_atomic(&target, b"x").is_err());
        assert!(!target.exists());
    }
}
