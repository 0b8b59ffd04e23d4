use dupescan::duplicates::{DuplicateFinder, FinderError};
use dupescan::error::ExitCode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DuplicateFinder::with_defaults().find_duplicates_in_paths(&[missing.clone()]);

    match result {
        Err(FinderError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn test_file_root_is_fatal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"not a directory").unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates_in_paths(&[file]);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_clean_scan_exit_codes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.bin"), vec![1u8; 2048]).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .unwrap();
    assert!(!result.summary.had_errors());
    assert_eq!(ExitCode::for_result(&result), ExitCode::NoDuplicates);

    fs::write(dir.path().join("copy.bin"), vec![1u8; 2048]).unwrap();
    let result = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(ExitCode::for_result(&result), ExitCode::Success);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn running_as_root() -> bool {
        // Permission bits do not stop root.
        let scratch = tempdir().unwrap();
        let path = scratch.path().join("locked");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        fs::read(&path).is_ok()
    }

    #[test]
    fn test_unreadable_directory_skipped() {
        if running_as_root() {
            return;
        }
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden_copy.bin"), vec![4u8; 2048]).unwrap();
        fs::write(dir.path().join("one.bin"), vec![4u8; 2048]).unwrap();
        fs::write(dir.path().join("two.bin"), vec![4u8; 2048]).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(&[dir.path().to_path_buf()]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let result = result.unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].count(), 2);
        assert!(result.summary.skipped_entries >= 1);
        assert_eq!(ExitCode::for_result(&result), ExitCode::PartialSuccess);
    }

    #[test]
    fn test_unreadable_file_excluded_from_groups() {
        if running_as_root() {
            return;
        }
        let dir = tempdir().unwrap();
        let blocked = dir.path().join("blocked.bin");
        for name in ["a.bin", "b.bin"] {
            fs::write(dir.path().join(name), vec![8u8; 2048]).unwrap();
        }
        fs::write(&blocked, vec![8u8; 2048]).unwrap();
        fs::set_permissions(&blocked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = DuplicateFinder::with_defaults()
            .find_duplicates_in_paths(&[dir.path().to_path_buf()])
            .unwrap();
        fs::set_permissions(&blocked, fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(result.summary.total_files, 3);
        assert_eq!(result.summary.hash_failures, 1);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].count(), 2);
        assert!(result.groups[0].files.iter().all(|f| f.path != blocked));
    }
}
