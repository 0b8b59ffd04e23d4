use dupescan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupescan::progress::{ProgressReporter, ScanEvent};
use dupescan::signal::CancellationToken;
use std::fs;
use std::sync::mpsc;
use std::sync::Arc;
use tempfile::tempdir;

/// Signals its token once the walk reports `after` files.
struct CancelAfterFiles {
    token: CancellationToken,
    after: usize,
}

impl ProgressReporter for CancelAfterFiles {
    fn report(&self, event: ScanEvent) {
        if let ScanEvent::Scanning { files_found, .. } = event {
            if files_found >= self.after {
                self.token.cancel();
            }
        }
    }
}

fn populated_dir(files: usize) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for i in 0..files {
        fs::write(dir.path().join(format!("file_{i}.bin")), vec![(i % 3) as u8; 2048]).unwrap();
    }
    dir
}

#[test]
fn test_cancel_before_scan_returns_cancelled() {
    let dir = populated_dir(4);
    let token = CancellationToken::new();
    token.cancel();

    let finder = DuplicateFinder::new(FinderConfig::default().with_cancellation_token(token));
    let result = finder.find_duplicates_in_paths(&[dir.path().to_path_buf()]);

    assert!(matches!(result, Err(FinderError::Cancelled)));
}

#[test]
fn test_cancel_during_walk_returns_no_partial_result() {
    let dir = populated_dir(50);
    let token = CancellationToken::new();
    let mut config = FinderConfig::default()
        .with_cancellation_token(token.clone())
        .with_progress_reporter(Arc::new(CancelAfterFiles {
            token: token.clone(),
            after: 10,
        }));
    config.walker_config.progress_interval = 5;

    let result = DuplicateFinder::new(config).find_duplicates_in_paths(&[dir.path().to_path_buf()]);

    assert!(matches!(result, Err(FinderError::Cancelled)));
    assert!(token.is_cancelled());
}

#[test]
fn test_cancel_from_another_thread() {
    let dir = populated_dir(30);
    let token = CancellationToken::new();
    let (tx, rx) = mpsc::channel();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_cancellation_token(token.clone())
            .with_progress_reporter(Arc::new(tx)),
    );

    // Cancel as soon as the first event arrives, then keep draining.
    let watcher = std::thread::spawn(move || {
        let mut seen = 0;
        for _ in rx.iter() {
            if seen == 0 {
                token.cancel();
            }
            seen += 1;
        }
        seen
    });

    let result = finder.find_duplicates_in_paths(&[dir.path().to_path_buf()]);
    drop(finder);
    let seen = watcher.join().unwrap();

    assert!(seen >= 1);
    // The race may let a tiny scan finish first; it must never be partial.
    match result {
        Err(FinderError::Cancelled) => {}
        Ok(result) => assert_eq!(result.summary.total_files, 30),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_token_reset_allows_new_scan() {
    let dir = populated_dir(4);
    let token = CancellationToken::new();
    token.cancel();
    let finder =
        DuplicateFinder::new(FinderConfig::default().with_cancellation_token(token.clone()));
    assert!(finder
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .is_err());

    token.reset();
    let result = finder
        .find_duplicates_in_paths(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(result.summary.total_files, 4);
    assert_eq!(result.groups.len(), 1);
}
