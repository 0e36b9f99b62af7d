//! Integration tests for specfile
//!
//! These tests follow files on disk through opening, growth, queries and
//! export.

use specfile::block::{parse_lines, RawLine};
use specfile::export::{format_g12, save_scan, ExportFormat};
use specfile::file::{FileIndex, SpecFile};
use specfile::validator::{validate_spec_file, Severity};
use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use tempfile::tempdir;

const HEADER: &str = "\
#F /data/run7/growing.dat
#E 1700000000
#D Tue Nov 14 22:13:20 2023
#C sixc  User = beamline
#O0 Delta  Theta
#J0 Seconds  Monitor  Detector

";

fn append(path: &std::path::Path, text: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

/// A file written while scans are acquired
#[test]
fn test_follow_growing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("growing.dat");
    fs::write(&path, HEADER).unwrap();

    let mut file = SpecFile::open(&path).unwrap();
    assert_eq!(file.number_headers(), 1);
    assert_eq!(file.number_scans(), 0);
    assert!(!file.update().unwrap());

    append(&path, "#S 1  ascan  th 0 1 2 1\n#P0 3 4\n#N 3\n#L Theta  Monitor  Detector\n0 100 5\n");
    assert!(file.update().unwrap());
    assert_eq!(file.number_scans(), 1);
    assert_eq!(file.scan_by_number(1, 0).unwrap().lines(), 1);

    append(&path, "0.5 100 7\n1 100 9\n");
    assert!(file.update().unwrap());
    assert_eq!(file.number_scans(), 1);

    let scan = file.scan_by_number(1, 0).unwrap();
    assert_eq!(scan.lines(), 3);
    assert_eq!(scan.column("Detector"), Some(vec![5.0, 7.0, 9.0]));
    assert_eq!(scan.motor_position("Delta"), Some("3"));
    assert_eq!(scan.raw_lines().last().unwrap().number, 14);

    append(&path, "\n#S 1  ascan  th 0 1 2 1\n#P0 3 4\n#N 3\n#L Theta  Monitor  Detector\n0 100 6\n");
    assert!(file.update().unwrap());
    assert_eq!(file.number_scans(), 2);

    let first = file.scan_by_number(1, 0).unwrap();
    let second = file.scan_by_number(1, 1).unwrap();
    assert_eq!(first.number_in_file(), 0);
    assert_eq!(first.lines(), 3);
    assert_eq!(second.order(), 2);
    assert_eq!(second.to_string(), "1.2 ascan th 0 1 2 1");
    assert_eq!(second.scan().header_index(), Some(0));

    assert!(!file.update().unwrap());
}

/// A row still being written when the file is polled is read whole later
#[test]
fn test_follow_row_written_in_two_parts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.dat");
    fs::write(&path, format!("{}#S 1 ct\n#P0 0 0\n#N 2\n0 1\n0.5 1", HEADER)).unwrap();

    let mut file = SpecFile::open(&path).unwrap();
    assert_eq!(file.scan_by_number(1, 0).unwrap().lines(), 2);

    append(&path, "00\n1 7\n");
    assert!(file.update().unwrap());

    let scan = file.scan_by_number(1, 0).unwrap();
    assert_eq!(scan.data(), &[vec![0.0, 1.0], vec![0.5, 100.0], vec![1.0, 7.0]]);
    assert!(scan.errors().iter().all(|e| e.line.is_none()));
    assert!(!file.update().unwrap());
}

/// Truncated files keep their previous index
#[test]
fn test_shrunk_file_keeps_index() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shrunk.dat");
    fs::write(&path, format!("{}#S 1 ct\n#P0 0 0\n#N 1\n1\n", HEADER)).unwrap();

    let mut file = SpecFile::open(&path).unwrap();
    assert_eq!(file.number_scans(), 1);

    fs::write(&path, "#F x\n").unwrap();
    assert!(!file.update().unwrap());
    assert_eq!(file.number_scans(), 1);
}

#[test]
fn test_file_level_queries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.dat");
    fs::write(&path, format!("{}#S 4 ct 1\n#P0 0 0\n#N 1\n#L Seconds\n1\n", HEADER)).unwrap();

    let file = SpecFile::open(&path).unwrap();
    assert_eq!(file.time_created(), Some("Tue Nov 14 22:13:20 2023"));
    assert_eq!(file.user().as_deref(), Some("beamline"));
    assert_eq!(file.spec().as_deref(), Some("sixc"));
    assert_eq!(file.scan_numbers().collect::<Vec<_>>(), vec![4]);
    assert!(file.absolute_path().unwrap().is_absolute());

    let epoch = file.headers()[0].epoch_datetime().unwrap();
    assert_eq!(epoch.timestamp(), 1_700_000_000);

    let modified = file.time_modified().unwrap();
    assert_eq!(modified.split_whitespace().count(), 5);

    let info = file.info();
    assert_eq!(info.user.as_deref(), Some("beamline"));
    assert_eq!(info.modified.as_deref(), Some(modified.as_str()));

    let scan = file.scan_by_number(4, 0).unwrap();
    assert_eq!(scan.counter_names().unwrap().len(), 3);
    assert_eq!(scan.file_date(), Some("Tue Nov 14 22:13:20 2023"));
}

#[test]
fn test_export_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.dat");
    let output = dir.path().join("scan.txt");
    fs::write(
        &path,
        format!("{}#S 2 ascan\n#P0 0 0\n#N 2\n#L Theta  Detector\n0 1e-7\n0.25 3\n", HEADER),
    )
    .unwrap();

    let file = SpecFile::open(&path).unwrap();
    let scan = file.scan_by_number(2, 0).unwrap();
    save_scan(&scan, &output, ExportFormat::Tabs, false).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Theta\tDetector\n0\t1e-07\n0.25\t3\n\n"
    );
}

#[test]
fn test_validate_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("validate.dat");
    fs::write(
        &path,
        format!(
            "{}#S 1 ascan\n#P0 0 0\n#N 2\n#L a  b\n1 2\n3\n\n#S 2 ct\n#P0 0 0\n#N 1\n",
            HEADER
        ),
    )
    .unwrap();

    let report = validate_spec_file(&path).unwrap();
    assert!(report.has_failures());
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.failed_scans().collect::<Vec<_>>(), vec![(1, 1)]);
    assert!(report
        .checks
        .iter()
        .any(|c| c.scan() == Some((2, 1)) && c.severity == Severity::Warning));

    let text = report.to_string();
    assert!(text.contains("Validation FAILED"));
    assert!(text.contains("line 13 (row 6): erroneous data / wrong number of columns"));
}

#[test]
fn test_index_matches_between_incremental_and_full_passes() {
    let text = format!(
        "{}#S 1 a\n#P0 1 2\n#N 1\n1\n2\n#S 2 b\n#P0 1 2\n#N 1\n3\n#E 1700000100\n#S 3 c\n#N 1\n4\n",
        HEADER
    );

    let mut full = FileIndex::new();
    full.index(&mut Cursor::new(text.as_bytes())).unwrap();

    for split in [10usize, 60, 200, text.len() - 3] {
        let split = text[..split].rfind('\n').map_or(0, |i| i + 1);
        let mut incremental = FileIndex::new();
        incremental
            .index(&mut Cursor::new(text[..split].as_bytes()))
            .unwrap();
        incremental
            .index(&mut Cursor::new(text.as_bytes()))
            .unwrap();

        assert_eq!(incremental.number_scans(), full.number_scans());
        assert_eq!(incremental.number_headers(), full.number_headers());
        for (a, b) in incremental.scans().zip(full.scans()) {
            assert_eq!(a.raw_lines(), b.raw_lines());
            assert_eq!(a.parsed(), b.parsed());
            assert_eq!(a.scan().header_index(), b.scan().header_index());
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn to_raw(lines: &[String]) -> Vec<RawLine> {
        lines
            .iter()
            .enumerate()
            .map(|(i, text)| RawLine {
                number: i + 1,
                text: text.trim().to_string(),
            })
            .filter(|line| !line.text.is_empty())
            .collect()
    }

    proptest! {
        /// Parsing the same lines twice gives identical fields and errors
        #[test]
        fn test_parse_idempotent(lines in prop::collection::vec("(#[SNLOPTCQ@G] )?[0-9a-m .\\\\]{0,20}", 0..30)) {
            let raw = to_raw(&lines);
            prop_assert_eq!(parse_lines(&raw), parse_lines(&raw));
        }

        /// Rows with the declared column count are kept, others recorded
        #[test]
        fn test_rows_or_errors(rows in prop::collection::vec(prop::collection::vec(-1e6f64..1e6, 1..5), 0..20)) {
            let mut lines = vec!["#S 1 ascan".to_string(), "#N 3".to_string()];
            lines.extend(rows.iter().map(|row| {
                row.iter().map(|v| format_g12(*v)).collect::<Vec<_>>().join(" ")
            }));

            let fields = parse_lines(&to_raw(&lines));
            let good = rows.iter().filter(|r| r.len() == 3).count();
            prop_assert_eq!(fields.data.len(), good);
            prop_assert_eq!(fields.errors.len(), rows.len() - good);
        }

        /// %.12g output reads back within 12 significant digits
        #[test]
        fn test_format_g12_precision(value in any::<f64>().prop_filter("normal", |v| v.is_normal())) {
            let text = format_g12(value);
            let parsed: f64 = text.parse().unwrap();
            let tolerance = value.abs() * 1e-11;
            prop_assert!((parsed - value).abs() <= tolerance, "{} -> {}", value, text);
        }

        /// Arbitrary bytes index without panicking
        #[test]
        fn test_index_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let mut index = FileIndex::new();
            index.index(&mut Cursor::new(data.as_slice())).unwrap();
            for scan in index.scans() {
                let _ = scan.meta();
            }
        }
    }
}
