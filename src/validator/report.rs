use std::fmt;

use serde::Serialize;

use crate::block::ParseErrorRecord;

/// Parse errors printed per check before the rest are counted
pub const MAX_LISTED_ERRORS: usize = 3;

/// How bad a check came out, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing to report
    Ok,
    /// Readable, but something was skipped or is missing
    Warning,
    /// The block lost data while parsing
    Failed,
}

/// What a check looked at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckSubject {
    /// A file-wide property such as scan-number uniqueness
    File {
        /// Short name of the property
        name: String,
    },
    /// A header block
    Header {
        /// 0-based position among the file's headers
        index: usize,
        /// 1-based file line of the block's first line
        first_line: usize,
    },
    /// One scan occurrence
    Scan {
        /// Declared `#S` number
        number: i64,
        /// 1-based occurrence among scans with the same number
        order: usize,
        /// Scan command following the number
        command: String,
        /// 1-based file line of the `#S` line
        first_line: usize,
    },
}

impl CheckSubject {
    pub(crate) fn file(name: impl Into<String>) -> Self {
        CheckSubject::File { name: name.into() }
    }
}

impl fmt::Display for CheckSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckSubject::File { name } => write!(f, "{}", name),
            CheckSubject::Header { index, first_line } => {
                write!(f, "Header {} (line {})", index + 1, first_line)
            }
            CheckSubject::Scan {
                number,
                order,
                command,
                ..
            } => {
                write!(f, "Scan {}", number)?;
                if *order > 1 {
                    write!(f, ".{}", order)?;
                }
                if !command.is_empty() {
                    write!(f, " {}", command)?;
                }
                Ok(())
            }
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    /// Block or property the check covers
    pub subject: CheckSubject,

    /// Outcome
    pub severity: Severity,

    /// Short explanation for warnings and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Parse errors the block recorded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ParseErrorRecord>,
}

impl ValidationCheck {
    fn new(subject: CheckSubject, severity: Severity, note: Option<String>) -> Self {
        Self {
            subject,
            severity,
            note,
            errors: Vec::new(),
        }
    }

    pub(crate) fn ok(subject: CheckSubject) -> Self {
        Self::new(subject, Severity::Ok, None)
    }

    pub(crate) fn warning(subject: CheckSubject, note: impl Into<String>) -> Self {
        Self::new(subject, Severity::Warning, Some(note.into()))
    }

    pub(crate) fn failed(subject: CheckSubject, note: impl Into<String>) -> Self {
        Self::new(subject, Severity::Failed, Some(note.into()))
    }

    pub(crate) fn with_errors(mut self, errors: &[ParseErrorRecord]) -> Self {
        self.errors = errors.to_vec();
        self
    }

    /// Scan number and order when the check covers a scan
    pub fn scan(&self) -> Option<(i64, usize)> {
        match self.subject {
            CheckSubject::Scan { number, order, .. } => Some((number, order)),
            _ => None,
        }
    }
}

/// Validation results for one spec file
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Path of the file that was validated
    pub file_path: String,

    /// Checks in the order they ran: file-wide first, then headers, then scans
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// Empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            checks: Vec::new(),
        }
    }

    /// Record a check
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Worst severity over all checks
    pub fn severity(&self) -> Severity {
        self.checks
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }

    /// Number of checks with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.checks.iter().filter(|c| c.severity == severity).count()
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.severity() == Severity::Failed
    }

    /// Whether any check warned
    pub fn has_warnings(&self) -> bool {
        self.count(Severity::Warning) > 0
    }

    /// Number of failed checks
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failed)
    }

    /// `(number, order)` of every scan that failed
    pub fn failed_scans(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.checks
            .iter()
            .filter(|c| c.severity == Severity::Failed)
            .filter_map(ValidationCheck::scan)
    }

    /// Total parse errors over all blocks
    pub fn error_count(&self) -> usize {
        self.checks.iter().map(|c| c.errors.len()).sum()
    }

    /// Render the report, with colours when `colored` is set and the
    /// `colorized_output` feature is enabled
    pub fn render(&self, colored: bool) -> String {
        #[cfg(feature = "colorized_output")]
        {
            if colored {
                return self.render_with(&Colored);
            }
        }
        #[cfg(not(feature = "colorized_output"))]
        let _ = colored;

        self.render_with(&Plain)
    }

    fn render_with(&self, paint: &dyn Paint) -> String {
        let mut out = String::new();
        out.push_str(&paint.title(&format!("Validating {}", self.file_path)));
        out.push_str("\n\n");

        for check in &self.checks {
            out.push_str(&paint.marker(check.severity));
            out.push(' ');
            out.push_str(&check.subject.to_string());
            if let Some(note) = &check.note {
                out.push_str(": ");
                out.push_str(note);
            }
            out.push('\n');

            for error in check.errors.iter().take(MAX_LISTED_ERRORS) {
                out.push_str("       ");
                out.push_str(&paint.dim(&error_location(error)));
                out.push_str(&error.message);
                out.push('\n');
            }
            if check.errors.len() > MAX_LISTED_ERRORS {
                out.push_str(&format!(
                    "       (+{} more)\n",
                    check.errors.len() - MAX_LISTED_ERRORS
                ));
            }
        }

        out.push_str(&format!(
            "\n{} ok, {} warnings, {} failed, {} parse errors\n",
            self.count(Severity::Ok),
            self.count(Severity::Warning),
            self.count(Severity::Failed),
            self.error_count()
        ));
        let verdict = match self.severity() {
            Severity::Ok => "Validation PASSED",
            Severity::Warning => "Validation PASSED with warnings",
            Severity::Failed => "Validation FAILED",
        };
        out.push_str(&paint.severity(self.severity(), verdict));
        out.push('\n');
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&Plain))
    }
}

/// `line 12 (row 5): ` for line errors, nothing for block-level ones
fn error_location(error: &ParseErrorRecord) -> String {
    match error.line {
        Some(pos) => format!("line {} (row {}): ", pos.absolute, pos.relative),
        None => String::new(),
    }
}

trait Paint {
    fn severity(&self, severity: Severity, text: &str) -> String;

    fn title(&self, text: &str) -> String;

    fn dim(&self, text: &str) -> String;

    fn marker(&self, severity: Severity) -> String {
        let tag = match severity {
            Severity::Ok => "[ OK ]",
            Severity::Warning => "[WARN]",
            Severity::Failed => "[FAIL]",
        };
        self.severity(severity, tag)
    }
}

struct Plain;

impl Paint for Plain {
    fn severity(&self, _: Severity, text: &str) -> String {
        text.to_string()
    }

    fn title(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(feature = "colorized_output")]
struct Colored;

#[cfg(feature = "colorized_output")]
impl Paint for Colored {
    fn severity(&self, severity: Severity, text: &str) -> String {
        use console::style;

        match severity {
            Severity::Ok => style(text).green().to_string(),
            Severity::Warning => style(text).yellow().bold().to_string(),
            Severity::Failed => style(text).red().bold().to_string(),
        }
    }

    fn title(&self, text: &str) -> String {
        console::style(text).bold().cyan().to_string()
    }

    fn dim(&self, text: &str) -> String {
        console::style(text).dim().to_string()
    }
}
