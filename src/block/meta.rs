use serde::Serialize;

use super::models::ParseErrorRecord;
use super::scan::ScanRef;

/// Most relevant metadata of one scan in a single record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanMeta {
    /// Spec application that wrote the file (from the owning header)
    pub spec: String,

    /// User that wrote the file (from the owning header)
    pub user: String,

    /// Source file path from the `#F` header line
    pub source: String,

    /// Q / HKL value, verbatim
    #[serde(rename = "HKL")]
    pub hkl: String,

    /// Scan start date
    pub date: String,

    /// Scan number
    #[serde(rename = "scanno")]
    pub scan_number: i64,

    /// Motor `(name, position)` pairs, `None` if they could not be matched
    pub motors: Option<Vec<(String, String)>>,

    /// Motor names (own or inherited)
    #[serde(rename = "motnames")]
    pub motor_names: Option<Vec<String>>,

    /// Comment lines
    pub comments: Vec<String>,

    /// 1-based occurrence among scans with the same number
    pub order: usize,

    /// 0-based position in the file
    #[serde(rename = "noinfile")]
    pub number_in_file: usize,

    /// Number of data rows
    pub points: usize,

    /// Declared column count
    pub columns: usize,

    /// `#U` lines
    #[serde(rename = "userlines")]
    pub user_lines: Vec<String>,

    /// Geometry records
    #[serde(rename = "geo")]
    pub geometry: Vec<String>,

    /// `#@` lines
    pub extra: Vec<String>,

    /// Motor mnemonics, only when the file has them
    #[serde(rename = "motmnes", skip_serializing_if = "Option::is_none")]
    pub motor_mnemonics: Option<Vec<String>>,

    /// Counter mnemonics, only when the file has them
    #[serde(rename = "cntmnes", skip_serializing_if = "Option::is_none")]
    pub counter_mnemonics: Option<Vec<String>>,

    /// Parse errors, only when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ParseErrorRecord>>,
}

impl ScanMeta {
    /// Collect the metadata of a scan
    pub fn from_scan(scan: &ScanRef<'_>) -> Self {
        let errors = scan.errors();
        Self {
            spec: scan.spec().unwrap_or_default(),
            user: scan.user().unwrap_or_default(),
            source: scan.source().to_string(),
            hkl: scan.hkl().to_string(),
            date: scan.date().to_string(),
            scan_number: scan.number(),
            motors: scan.motor_positions().map(<[_]>::to_vec),
            motor_names: scan.motor_names().map(<[_]>::to_vec),
            comments: scan.comments().to_vec(),
            order: scan.order(),
            number_in_file: scan.number_in_file(),
            points: scan.lines(),
            columns: scan.columns(),
            user_lines: scan.user_lines().to_vec(),
            geometry: scan.geometry(),
            extra: scan.extra_lines(),
            motor_mnemonics: scan.motor_mnemonics().map(<[_]>::to_vec),
            counter_mnemonics: scan.counter_mnemonics().map(<[_]>::to_vec),
            errors: (!errors.is_empty()).then(|| errors.to_vec()),
        }
    }
}
