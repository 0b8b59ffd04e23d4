use dupescan::cli::OutputFormat;
use dupescan::duplicates::{DuplicateFinder, DuplicateScanResult};
use dupescan::output::json::JsonOutput;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use tempfile::{tempdir, TempDir};

/// Two copies of a 2 KiB file with fixed mtimes, plus one unique file.
fn scanned_fixture() -> (TempDir, DuplicateScanResult) {
    let dir = tempdir().unwrap();
    let newer = dir.path().join("newer.dat");
    let older = dir.path().join("older.dat");
    fs::write(&newer, vec![6u8; 2048]).unwrap();
    fs::write(&older, vec![6u8; 2048]).unwrap();
    fs::write(dir.path().join("unique.dat"), vec![7u8; 4096]).unwrap();
    set_file_mtime(&newer, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();
    set_file_mtime(&older, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .unwrap();
    (dir, result)
}

fn render(result: &DuplicateScanResult, format: OutputFormat, pretty: bool) -> String {
    let mut buffer = Vec::new();
    dupescan::write_result(result, format, pretty, false, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_json_output_parses_back() {
    let (_dir, result) = scanned_fixture();
    let json = render(&result, OutputFormat::Json, true);

    let parsed: JsonOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.groups.len(), 1);
    let group = &parsed.groups[0];
    assert_eq!(group.id, 1);
    assert_eq!(group.count, 2);
    assert_eq!(group.size, 2048);
    assert_eq!(group.reclaimable_bytes, 2048);
    assert_eq!(group.digest.len(), 64);
    assert_eq!(group.files[0].name, "newer.dat");
    assert_eq!(group.files[0].modified, "2023-11-14T22:13:20Z");
    assert_eq!(group.files[1].name, "older.dat");
    assert_eq!(parsed.summary.total_files, 3);
    assert_eq!(parsed.summary.total_reclaimable_bytes, 2048);
}

#[test]
fn test_json_uses_camel_case_keys() {
    let (_dir, result) = scanned_fixture();
    let value: serde_json::Value =
        serde_json::from_str(&render(&result, OutputFormat::Json, false)).unwrap();

    assert!(value["groups"][0].get("reclaimableBytes").is_some());
    assert!(value["summary"].get("totalDuplicateFiles").is_some());
    assert!(value["summary"].get("scanDurationSeconds").is_some());
    assert!(value["summary"].get("total_files").is_none());

    let file = &value["groups"][0]["files"][0];
    assert!(file.get("modifiedISO8601").is_some());
    assert!(file.get("modified").is_none());
}

#[test]
fn test_csv_output_marks_kept_file() {
    let (_dir, result) = scanned_fixture();
    let csv = render(&result, OutputFormat::Csv, false);

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["group_id", "digest", "path", "size", "modified", "extension", "keep"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0][2].ends_with("newer.dat"));
    assert_eq!(&rows[0][6], "true");
    assert!(rows[1][2].ends_with("older.dat"));
    assert_eq!(&rows[1][6], "false");
}

#[test]
fn test_text_output_without_color() {
    let (_dir, result) = scanned_fixture();
    let text = render(&result, OutputFormat::Text, false);

    assert!(text.contains("Group 1: 2 files"));
    assert!(text.contains("KEEP"));
    assert!(text.contains("DUP"));
    assert!(text.contains("Scanned 3 files"));
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn test_empty_result_in_every_format() {
    let empty = DuplicateScanResult::default();

    let json: JsonOutput = serde_json::from_str(&render(&empty, OutputFormat::Json, false)).unwrap();
    assert!(json.groups.is_empty());

    assert!(render(&empty, OutputFormat::Csv, false).is_empty());

    let text = render(&empty, OutputFormat::Text, false);
    assert!(text.contains("Scanned 0 files"));
}
