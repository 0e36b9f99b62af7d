//! Line tag dispatch
//!
//! Every `#X...` line is split into a tag character, an optional key value
//! glued to the tag (the `0` in `#O0`, the `CALIB` in `#@CALIB`) and the
//! content after the first space. The tag selects the handler that folds the
//! content into [`BlockFields`].

use std::sync::OnceLock;

use regex::Regex;

use super::fields::BlockFields;
use super::models::CountTime;
use super::spectrum::Calibration;

/// Recognized line tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTag {
    /// `#S` scan number and command
    Scan,
    /// `#E` epoch
    Epoch,
    /// `#F` original file name
    File,
    /// `#D` date
    Date,
    /// `#N` number of data columns
    Columns,
    /// `#L` column labels
    Labels,
    /// `#O` motor names
    MotorLabels,
    /// `#o` motor mnemonics
    MotorMnemonics,
    /// `#J` counter names
    CounterLabels,
    /// `#j` counter mnemonics
    CounterMnemonics,
    /// `#U` user line
    User,
    /// `#C` comment
    Comment,
    /// `#P` motor positions
    MotorPositions,
    /// `#T` counting time
    CountTime,
    /// `#G` geometry parameters
    Geometry,
    /// `#Q` Q / HKL value
    Q,
    /// `#@` MCA related line
    Extra,
}

impl LineTag {
    /// Map a tag character to its tag
    pub fn from_char(c: char) -> Option<Self> {
        let tag = match c {
            'S' => Self::Scan,
            'E' => Self::Epoch,
            'F' => Self::File,
            'D' => Self::Date,
            'N' => Self::Columns,
            'L' => Self::Labels,
            'O' => Self::MotorLabels,
            'o' => Self::MotorMnemonics,
            'J' => Self::CounterLabels,
            'j' => Self::CounterMnemonics,
            'U' => Self::User,
            'C' => Self::Comment,
            'P' => Self::MotorPositions,
            'T' => Self::CountTime,
            'G' => Self::Geometry,
            'Q' => Self::Q,
            '@' => Self::Extra,
            _ => return None,
        };
        Some(tag)
    }

    /// The tag character as written after `#`
    pub fn as_char(self) -> char {
        match self {
            Self::Scan => 'S',
            Self::Epoch => 'E',
            Self::File => 'F',
            Self::Date => 'D',
            Self::Columns => 'N',
            Self::Labels => 'L',
            Self::MotorLabels => 'O',
            Self::MotorMnemonics => 'o',
            Self::CounterLabels => 'J',
            Self::CounterMnemonics => 'j',
            Self::User => 'U',
            Self::Comment => 'C',
            Self::MotorPositions => 'P',
            Self::CountTime => 'T',
            Self::Geometry => 'G',
            Self::Q => 'Q',
            Self::Extra => '@',
        }
    }

    /// Fold one tagged line into the block fields.
    ///
    /// Returns a message when the content cannot be interpreted; the caller
    /// records it as a parse error.
    pub(crate) fn apply(
        self,
        fields: &mut BlockFields,
        content: &str,
        keyval: &str,
    ) -> Result<(), String> {
        match self {
            Self::Scan => {
                let (number, command) = parse_scan_content(content)
                    .ok_or_else(|| format!("wrong scan number ({})", content))?;
                fields.number = number;
                fields.id = Some(number);
                fields.command = command;
            }
            Self::Epoch => {
                fields.epoch = parse_int(content, self)?;
            }
            Self::File => fields.filename = content.to_string(),
            Self::Date => fields.date = content.to_string(),
            Self::Columns => {
                if fields.columns.is_none() {
                    let columns = parse_int(content, self)?;
                    let columns = usize::try_from(columns)
                        .map_err(|_| format!("wrong value for #{} line", self.as_char()))?;
                    fields.columns = Some(columns);
                }
            }
            Self::Labels => {
                if fields.labels.is_none() {
                    fields.labels = Some(split_wide(content));
                }
            }
            Self::MotorLabels => fields.motor_labels.extend(split_wide(content)),
            Self::MotorMnemonics => fields.motor_mnemonics.extend(split_narrow(content)),
            Self::CounterLabels => fields.counter_labels.extend(split_wide(content)),
            Self::CounterMnemonics => fields.counter_mnemonics.extend(split_wide(content)),
            Self::User => fields.user_lines.push(content.to_string()),
            Self::Comment => fields.comments.push(content.to_string()),
            Self::MotorPositions => fields
                .motor_positions
                .extend(content.split(' ').map(str::to_string)),
            Self::CountTime => fields.count_time = Some(parse_count_time(content)),
            Self::Geometry => fields
                .geometry
                .push(content.split_whitespace().map(str::to_string).collect()),
            Self::Q => fields.q_value = Some(content.to_string()),
            Self::Extra => {
                fields
                    .extra_lines
                    .push((keyval.to_string(), content.to_string()));
                if keyval == "CALIB" {
                    fields.calibration = Some(
                        Calibration::parse(content)
                            .ok_or_else(|| format!("wrong calibration ({})", content))?,
                    );
                }
            }
        }
        Ok(())
    }
}

/// A `#` line split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagLine<'a> {
    /// Character right after `#`
    pub key: char,
    /// Text between the tag character and the first space
    pub keyval: &'a str,
    /// Text after the first space, trimmed
    pub content: &'a str,
}

impl<'a> TagLine<'a> {
    /// Split a stripped line starting with `#`.
    ///
    /// Lines whose first space is missing or sits before the tag character
    /// carry no value and yield `None`.
    pub(crate) fn split(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix('#')?;
        let key = rest.chars().next()?;
        let space = line.find(' ')?;
        let keyval_start = 1 + key.len_utf8();
        if space < keyval_start {
            return None;
        }
        Some(Self {
            key,
            keyval: line[keyval_start..space].trim(),
            content: line[space..].trim(),
        })
    }
}

/// Scan number and command from the content of a `#S` line
pub(crate) fn parse_scan_content(content: &str) -> Option<(i64, String)> {
    let mut tokens = content.split_whitespace();
    let number = tokens.next()?.parse().ok()?;
    let command = tokens.collect::<Vec<_>>().join(" ");
    Some((number, command))
}

/// Scan number from a raw `#S` line, used while indexing
pub(crate) fn scan_number(line: &str) -> Option<i64> {
    let tag = TagLine::split(line)?;
    if tag.key != 'S' {
        return None;
    }
    parse_scan_content(tag.content).map(|(number, _)| number)
}

fn parse_int(content: &str, tag: LineTag) -> Result<i64, String> {
    content
        .trim()
        .parse()
        .map_err(|_| format!("wrong value for #{} line", tag.as_char()))
}

fn parse_count_time(content: &str) -> CountTime {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() > 1 {
        CountTime {
            value: parts[0].to_string(),
            units: parts[1].replace(['(', ')'], ""),
        }
    } else {
        CountTime {
            value: content.to_string(),
            units: String::new(),
        }
    }
}

/// Split on runs of two or more whitespace characters (labels may contain
/// single spaces)
pub(crate) fn split_wide(content: &str) -> Vec<String> {
    static WIDE: OnceLock<Regex> = OnceLock::new();
    let re = WIDE.get_or_init(|| Regex::new(r"\s\s+").expect("valid label separator pattern"));
    re.split(content).map(str::to_string).collect()
}

/// Split on every single whitespace character
pub(crate) fn split_narrow(content: &str) -> Vec<String> {
    content
        .split(char::is_whitespace)
        .map(str::to_string)
        .collect()
}
