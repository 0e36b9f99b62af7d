use super::models::{CountTime, LinePosition, ParseErrorRecord, RawLine};
use super::spectrum::{Calibration, Spectrum, SpectrumDecoder};
use super::tags::{LineTag, TagLine};

/// Structured content of one block, derived from its raw lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockFields {
    /// Identifier used in error records (the scan number once `#S` is read)
    pub id: Option<i64>,

    /// Scan number from `#S`
    pub number: i64,

    /// Scan command from `#S`
    pub command: String,

    /// Counting time from `#T`
    pub count_time: Option<CountTime>,

    /// File name from `#F`
    pub filename: String,

    /// Epoch from `#E`
    pub epoch: i64,

    /// Date from `#D`
    pub date: String,

    /// Declared column count from the first `#N`
    pub columns: Option<usize>,

    /// Column labels from the first `#L`
    pub labels: Option<Vec<String>>,

    /// Motor names from all `#O` lines
    pub motor_labels: Vec<String>,

    /// Motor mnemonics from all `#o` lines
    pub motor_mnemonics: Vec<String>,

    /// Counter names from all `#J` lines
    pub counter_labels: Vec<String>,

    /// Counter mnemonics from all `#j` lines
    pub counter_mnemonics: Vec<String>,

    /// Motor positions from all `#P` lines, as written
    pub motor_positions: Vec<String>,

    /// `#C` comment lines
    pub comments: Vec<String>,

    /// `#U` user lines
    pub user_lines: Vec<String>,

    /// One entry per `#G` line, split on whitespace
    pub geometry: Vec<Vec<String>>,

    /// `#Q` content, verbatim
    pub q_value: Option<String>,

    /// `(keyval, content)` for every `#@` line
    pub extra_lines: Vec<(String, String)>,

    /// Most recent `#@CALIB` calibration
    pub calibration: Option<Calibration>,

    /// Numeric data rows, each with exactly `columns` values
    pub data: Vec<Vec<f64>>,

    /// Inline spectra in block order
    pub spectra: Vec<Spectrum>,

    /// Problems found while parsing
    pub errors: Vec<ParseErrorRecord>,
}

impl BlockFields {
    /// Whether any parse error was recorded
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(ParseErrorRecord {
            block_id: self.id,
            line: None,
            raw_line: None,
            message: message.into(),
        });
    }

    fn wrong_line(&mut self, index: usize, line: &RawLine, message: &str) {
        self.errors.push(ParseErrorRecord {
            block_id: self.id,
            line: Some(LinePosition {
                relative: index + 1,
                absolute: line.number,
            }),
            raw_line: Some(line.text.clone()),
            message: format!("erroneous data / {}", message),
        });
    }
}

/// Interpret the raw lines of a block.
///
/// Pure function of its input: the same lines always produce the same
/// fields, errors included.
pub fn parse_lines(lines: &[RawLine]) -> BlockFields {
    let mut fields = BlockFields::default();
    let mut spectrum: Option<SpectrumDecoder> = None;

    for (index, line) in lines.iter().enumerate() {
        let text = line.text.as_str();
        if text.is_empty() {
            continue;
        }

        if text.len() > 1 && text.starts_with('#') {
            let Some(tag_line) = TagLine::split(text) else {
                continue;
            };
            match LineTag::from_char(tag_line.key) {
                Some(tag) => {
                    if let Err(msg) = tag.apply(&mut fields, tag_line.content, tag_line.keyval) {
                        fields.wrong_line(index, line, &msg);
                    }
                }
                None => {
                    let msg = format!("unknown header line ({})", tag_line.key);
                    fields.wrong_line(index, line, &msg);
                }
            }
            continue;
        }

        let mut row = text;
        if let Some(rest) = text.strip_prefix("@A") {
            if spectrum.take().is_some() {
                fields.wrong_line(index, line, "unterminated spectrum");
            }
            spectrum = Some(SpectrumDecoder::new());
            row = rest;
        }

        if let Some(decoder) = spectrum.as_mut() {
            let pushed = decoder.push_line(row);
            if let Some(token) = pushed.bad_token {
                fields.wrong_line(index, line, &format!("wrong spectrum data ({})", token));
            }
            if pushed.complete {
                if let Some(decoder) = spectrum.take() {
                    if let Some(mut finished) = decoder.finish() {
                        finished.set_calibration(fields.calibration);
                        fields.spectra.push(finished);
                    }
                }
            }
            continue;
        }

        let values: Result<Vec<f64>, _> = row.split_whitespace().map(str::parse).collect();
        match values {
            Err(_) => fields.wrong_line(index, line, "wrong data line"),
            Ok(values) if values.len() != fields.columns.unwrap_or(0) => {
                fields.wrong_line(index, line, "wrong number of columns")
            }
            Ok(values) => fields.data.push(values),
        }
    }

    if spectrum.is_some() {
        fields.push_error("unterminated spectrum");
    }

    fields
}
