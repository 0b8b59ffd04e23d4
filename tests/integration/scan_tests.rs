use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanOptions};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const KB: usize = 1024;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn scan(root: &Path) -> dupescan::duplicates::DuplicateScanResult {
    DuplicateFinder::with_defaults()
        .find_duplicates(&ScanOptions {
            root_paths: vec![root.to_path_buf()],
            ..Default::default()
        })
        .unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let result = scan(dir.path());

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 0);
    assert_eq!(result.summary.total_groups, 0);
    assert_eq!(result.summary.total_reclaimable_bytes, 0);
}

#[test]
fn test_scan_hello_hello_world() {
    let dir = tempdir().unwrap();
    let hello: Vec<u8> = b"hello".iter().copied().cycle().take(500 * KB).collect();
    let world: Vec<u8> = b"world".iter().copied().cycle().take(500 * KB).collect();
    write(&dir.path().join("A.txt"), &hello);
    write(&dir.path().join("B.txt"), &hello);
    write(&dir.path().join("C.txt"), &world);

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    let group = &result.groups[0];
    assert_eq!(group.count(), 2);
    assert_eq!(group.reclaimable_bytes(), (500 * KB) as u64);
    assert!(group.files.iter().all(|f| f.name != "C.txt"));
    assert_eq!(result.summary.total_files, 3);
    assert_eq!(result.summary.total_duplicate_files, 1);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), &[1u8; 2 * KB]);
    write(&dir.path().join("b.bin"), &[2u8; 2 * KB]);
    write(&dir.path().join("c.bin"), &[3u8; 3 * KB]);

    let result = scan(dir.path());

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 3);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let content = vec![42u8; 4 * KB];
    write(&dir.path().join("top.dat"), &content);
    write(&dir.path().join("one/two/three/deep.dat"), &content);
    write(&dir.path().join("other/copy.dat"), &content);

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].count(), 3);
    assert_eq!(result.groups[0].reclaimable_bytes(), 8 * KB as u64);
    assert_eq!(result.summary.total_duplicate_files, 2);
}

#[test]
fn test_members_sorted_newest_first() {
    let dir = tempdir().unwrap();
    let content = vec![7u8; 2 * KB];
    let paths: Vec<PathBuf> = ["old.bin", "newest.bin", "middle.bin"]
        .iter()
        .map(|n| dir.path().join(n))
        .collect();
    for (path, secs) in paths.iter().zip([1_000_000_000i64, 1_700_000_000, 1_500_000_000]) {
        write(path, &content);
        set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    let result = scan(dir.path());
    let names: Vec<_> = result.groups[0]
        .files
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["newest.bin", "middle.bin", "old.bin"]);

    let candidates: Vec<_> = result
        .deletion_candidates()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(candidates, ["middle.bin", "old.bin"]);
}

#[test]
fn test_groups_ranked_and_numbered() {
    let dir = tempdir().unwrap();
    // 3 x 2 KiB -> 4 KiB reclaimable
    for name in ["s1", "s2", "s3"] {
        write(&dir.path().join(name), &[1u8; 2 * KB]);
    }
    // 2 x 8 KiB -> 8 KiB reclaimable
    for name in ["b1", "b2"] {
        write(&dir.path().join(name), &[2u8; 8 * KB]);
    }

    let result = scan(dir.path());

    assert_eq!(result.groups.len(), 2);
    assert_eq!(result.groups[0].id, 1);
    assert_eq!(result.groups[0].size, 8 * KB as u64);
    assert_eq!(result.groups[1].id, 2);
    assert_eq!(result.groups[1].count(), 3);
    assert_eq!(result.summary.total_reclaimable_bytes, 12 * KB as u64);
    assert_eq!(result.summary.total_groups, 2);
}

#[test]
fn test_multiple_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let content = vec![5u8; 3 * KB];
    write(&first.path().join("photo.jpg"), &content);
    write(&second.path().join("backup/photo.jpg"), &content);

    let finder = DuplicateFinder::with_defaults();
    let result = finder
        .find_duplicates_in_paths(&[first.path().to_path_buf(), second.path().to_path_buf()])
        .unwrap();

    assert_eq!(result.summary.scanned_paths.len(), 2);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].count(), 2);
}

#[test]
fn test_deny_listed_directories_ignored() {
    let dir = tempdir().unwrap();
    let content = vec![9u8; 2 * KB];
    write(&dir.path().join("src/lib.js"), &content);
    write(&dir.path().join("node_modules/pkg/lib.js"), &content);
    write(&dir.path().join(".git/objects/ab"), &content);
    write(&dir.path().join(".hidden.js"), &content);

    let result = scan(dir.path());

    assert_eq!(result.summary.total_files, 1);
    assert!(result.groups.is_empty());
}

#[test]
fn test_min_size_from_finder_config() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), &[1u8; 100]);
    write(&dir.path().join("b"), &[1u8; 100]);

    let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(1));
    let result = finder
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].size, 100);
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed() {
    let dir = tempdir().unwrap();
    let content = vec![3u8; 2 * KB];
    let target = dir.path().join("real.bin");
    write(&target, &content);
    std::os::unix::fs::symlink(&target, dir.path().join("link.bin")).unwrap();

    let result = scan(dir.path());

    assert_eq!(result.summary.total_files, 1);
    assert!(result.groups.is_empty());
}
