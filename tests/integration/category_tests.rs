use dupescan::duplicates::{DuplicateFinder, ScanOptions};
use dupescan::scanner::FileCategory;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn populate(root: &Path) {
    let same = vec![1u8; 4096];
    for name in ["a.jpg", "b.JPG", "c.mp4", "d.mp4", "e.pdf", "f.txt", "g.mp3", "h.zip", "i"] {
        fs::write(root.join(name), &same).unwrap();
    }
}

fn scan_category(root: &Path, category: FileCategory) -> dupescan::duplicates::DuplicateScanResult {
    DuplicateFinder::with_defaults()
        .find_duplicates(&ScanOptions {
            root_paths: vec![root.to_path_buf()],
            category,
            ..Default::default()
        })
        .unwrap()
}

#[test]
fn test_all_category_groups_everything() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let result = scan_category(dir.path(), FileCategory::All);

    assert_eq!(result.summary.total_files, 9);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].count(), 9);
}

#[test]
fn test_images_category_case_insensitive() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let result = scan_category(dir.path(), FileCategory::Images);

    assert_eq!(result.summary.total_files, 2);
    let mut names: Vec<_> = result.groups[0].files.iter().map(|f| f.name.clone()).collect();
    names.sort();
    assert_eq!(names, ["a.jpg", "b.JPG"]);
    assert!(result.groups[0].files.iter().all(|f| f.extension == "jpg"));
}

#[test]
fn test_each_category_filters() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let expected = [
        (FileCategory::Videos, 2),
        (FileCategory::Documents, 2),
        (FileCategory::Audio, 1),
        (FileCategory::Archives, 1),
    ];
    for (category, files) in expected {
        let result = scan_category(dir.path(), category);
        assert_eq!(result.summary.total_files, files, "category {category}");
        assert_eq!(result.groups.len(), usize::from(files > 1), "category {category}");
    }
}

#[test]
fn test_file_without_extension_only_in_all() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("README"), vec![0u8; 2048]).unwrap();
    fs::write(dir.path().join("LICENSE"), vec![0u8; 2048]).unwrap();

    for category in FileCategory::ALL {
        let result = scan_category(dir.path(), category);
        let expected = if category == FileCategory::All { 2 } else { 0 };
        assert_eq!(result.summary.total_files, expected, "category {category}");
    }
}
