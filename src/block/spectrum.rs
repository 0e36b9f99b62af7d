//! Inline MCA spectra
//!
//! A spectrum starts on a data line prefixed with `@A` and continues over
//! every following line that ends in a backslash:
//!
//! ```text
//! @A 1 2 3\
//! 4 5
//! ```

use serde::{Deserialize, Serialize};

/// Quadratic channel-to-energy calibration from a `#@CALIB a b c` line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Constant term
    pub a: f64,
    /// Linear term
    pub b: f64,
    /// Quadratic term
    pub c: f64,
}

impl Calibration {
    /// Parse the three coefficients of a `#@CALIB` line
    pub fn parse(content: &str) -> Option<Self> {
        let values: Vec<f64> = content
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match values.as_slice() {
            [a, b, c] => Some(Self {
                a: *a,
                b: *b,
                c: *c,
            }),
            _ => None,
        }
    }

    /// Energy of the given channel
    pub fn energy(&self, channel: usize) -> f64 {
        let ch = channel as f64;
        self.a + self.b * ch + self.c * ch * ch
    }
}

/// A 1D spectrum from a multichannel analyzer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    samples: Vec<f64>,
    calibration: Option<Calibration>,
}

impl Spectrum {
    /// Create a spectrum from its samples
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            calibration: None,
        }
    }

    /// Sample values in channel order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the spectrum has no channels
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(channel, sample)` pairs
    pub fn channels(&self) -> Vec<(usize, f64)> {
        self.samples.iter().copied().enumerate().collect()
    }

    /// Calibration in effect when the spectrum was read
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Set the calibration record
    pub fn set_calibration(&mut self, calibration: Option<Calibration>) {
        self.calibration = calibration;
    }

    /// Calibrated energy axis, if a calibration is known
    pub fn energies(&self) -> Option<Vec<f64>> {
        let calib = self.calibration?;
        Some((0..self.samples.len()).map(|ch| calib.energy(ch)).collect())
    }
}

/// Result of feeding one line to a [`SpectrumDecoder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pushed {
    /// The line had no continuation marker
    pub complete: bool,
    /// First token that failed to parse, reported once per spectrum
    pub bad_token: Option<String>,
}

/// Accumulates continuation lines into a [`Spectrum`]
#[derive(Debug, Default)]
pub(crate) struct SpectrumDecoder {
    samples: Vec<f64>,
    failed: bool,
}

impl SpectrumDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_line(&mut self, line: &str) -> Pushed {
        let trimmed = line.trim();
        let (data, complete) = match trimmed.strip_suffix('\\') {
            Some(head) => (head, false),
            None => (trimmed, true),
        };

        let mut bad_token = None;
        for token in data.split_whitespace() {
            match token.parse::<f64>() {
                Ok(value) => self.samples.push(value),
                Err(_) => {
                    if !self.failed {
                        bad_token = Some(token.to_string());
                    }
                    self.failed = true;
                }
            }
        }

        Pushed {
            complete,
            bad_token,
        }
    }

    /// Finish the spectrum; `None` if any token was unreadable
    pub(crate) fn finish(self) -> Option<Spectrum> {
        if self.failed {
            None
        } else {
            Some(Spectrum::new(self.samples))
        }
    }
}
