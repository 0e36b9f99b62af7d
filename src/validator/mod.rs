//! # Spec File Validation
//!
//! Parses every block of a file and summarizes what the error-tolerant
//! parser had to skip.
//!
//! ## Validation Checklist
//!
//! 1. **Headers**: the file has at least one `#F`/`#E` header and its
//!    headers parse cleanly
//! 2. **Scans**: the file has at least one scan; repeated scan numbers are
//!    reported
//! 3. **Per scan**: parse errors fail the scan, scans without data rows warn
//!
//! ## Usage
//!
//! ```rust,no_run
//! use specfile::validator::validate_spec_file;
//! use std::path::Path;
//!
//! match validate_spec_file(Path::new("sample.dat")) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("Validation failed: {}", e),
//! }
//! ```

use std::path::Path;

use crate::block::ScanRef;
use crate::file::{FileIndex, SpecFile, SpecFileError};

pub use report::{CheckSubject, Severity, ValidationCheck, ValidationReport, MAX_LISTED_ERRORS};

mod report;

/// Open a spec file and validate every block in it
pub fn validate_spec_file(path: &Path) -> Result<ValidationReport, SpecFileError> {
    let file = SpecFile::open(path)?;
    Ok(validate_index(file.index(), path.display().to_string()))
}

/// Validate an already indexed file
pub fn validate_index(index: &FileIndex, file_path: impl Into<String>) -> ValidationReport {
    let mut report = ValidationReport::new(file_path);

    check_headers(index, &mut report);
    check_scans(index, &mut report);

    report
}

fn check_headers(index: &FileIndex, report: &mut ValidationReport) {
    let subject = CheckSubject::file("File header");
    if index.number_headers() == 0 {
        report.add_check(ValidationCheck::warning(subject, "no #F or #E header block"));
        return;
    }
    report.add_check(ValidationCheck::ok(subject));

    for (idx, header) in index.headers().iter().enumerate() {
        let errors = header.errors();
        if !errors.is_empty() {
            let subject = CheckSubject::Header {
                index: idx,
                first_line: header.block().first_line(),
            };
            report.add_check(
                ValidationCheck::warning(subject, error_note(errors.len())).with_errors(errors),
            );
        }
    }
}

fn check_scans(index: &FileIndex, report: &mut ValidationReport) {
    if index.number_scans() == 0 {
        report.add_check(ValidationCheck::failed(
            CheckSubject::file("Scans"),
            "no #S scan block",
        ));
        return;
    }
    report.add_check(ValidationCheck::ok(CheckSubject::file(format!(
        "Scans ({} found)",
        index.number_scans()
    ))));

    let repeated: Vec<String> = index
        .scan_numbers()
        .filter(|n| index.occurrences(*n) > 1)
        .map(|n| format!("#S {} x{}", n, index.occurrences(n)))
        .collect();
    if !repeated.is_empty() {
        report.add_check(ValidationCheck::warning(
            CheckSubject::file("Unique scan numbers"),
            repeated.join(", "),
        ));
    }

    for scan in index.scans() {
        report.add_check(check_scan(&scan));
    }
}

fn check_scan(scan: &ScanRef<'_>) -> ValidationCheck {
    let subject = CheckSubject::Scan {
        number: scan.number(),
        order: scan.order(),
        command: scan.command().to_string(),
        first_line: scan.scan().block().first_line(),
    };
    let errors = scan.errors();
    if !errors.is_empty() {
        ValidationCheck::failed(subject, error_note(errors.len())).with_errors(errors)
    } else if scan.lines() == 0 {
        ValidationCheck::warning(subject, "no data rows")
    } else {
        ValidationCheck::ok(subject)
    }
}

fn error_note(count: usize) -> String {
    match count {
        1 => "1 parse error".to_string(),
        n => format!("{} parse errors", n),
    }
}
