//! Verification helpers for plugin protocol output
//!
//! Parses what a plugin wrote to stdout (`CHART`, `DIMENSION`, `BEGIN`,
//! `SET`, `END`, `DISABLE`) and checks it against expectations.

use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Chart '{chart}' was never declared")]
    ChartNotDeclared { chart: String },

    #[error("Chart '{chart}' has dimensions {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        chart: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Expected {expected} updates for chart '{chart}', found {actual}")]
    UpdateCountMismatch {
        chart: String,
        expected: usize,
        actual: usize,
    },

    #[error("Value mismatch for {chart}:{dimension}: expected {expected}, got {actual:?}")]
    ValueMismatch {
        chart: String,
        dimension: String,
        expected: u64,
        actual: Option<u64>,
    },

    #[error("Malformed protocol line {line}: '{text}'")]
    Malformed { line: usize, text: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// A `CHART` line and the `DIMENSION` lines after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredChart {
    /// `<type>.<id>`
    pub full_id: String,
    /// Every parameter after the id, unquoted
    pub params: Vec<String>,
    /// Dimension ids in declaration order
    pub dimensions: Vec<String>,
}

/// One `BEGIN` .. `END` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartUpdate {
    /// `<type>.<id>`
    pub full_id: String,
    /// `SET` lines in order
    pub values: Vec<(String, u64)>,
}

/// Everything a plugin wrote, in structured form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolTranscript {
    pub charts: Vec<DeclaredChart>,
    pub updates: Vec<ChartUpdate>,
    pub disabled: bool,
}

/// Split a protocol line into words, honouring single and double quotes
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut word = String::new();
        if c == '\'' || c == '"' {
            chars.next();
            for ch in chars.by_ref() {
                if ch == c {
                    break;
                }
                word.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                word.push(ch);
                chars.next();
            }
        }
        words.push(word);
    }
    words
}

impl ProtocolTranscript {
    /// Parse plugin stdout
    pub fn parse(output: &str) -> VerifyResult<Self> {
        let mut transcript = Self::default();
        let mut open: Option<ChartUpdate> = None;

        for (idx, raw) in output.lines().enumerate() {
            let malformed = || VerificationError::Malformed {
                line: idx + 1,
                text: raw.to_string(),
            };
            let words = split_words(raw);
            let Some(keyword) = words.first() else {
                continue;
            };

            match keyword.as_str() {
                "CHART" => {
                    let full_id = words.get(1).ok_or_else(malformed)?.clone();
                    transcript.charts.push(DeclaredChart {
                        full_id,
                        params: words[2..].to_vec(),
                        dimensions: Vec::new(),
                    });
                }
                "DIMENSION" => {
                    let id = words.get(1).ok_or_else(malformed)?.clone();
                    transcript
                        .charts
                        .last_mut()
                        .ok_or_else(malformed)?
                        .dimensions
                        .push(id);
                }
                "BEGIN" => {
                    let full_id = words.get(1).ok_or_else(malformed)?.clone();
                    open = Some(ChartUpdate {
                        full_id,
                        values: Vec::new(),
                    });
                }
                "SET" => {
                    // SET <id> = <value>
                    let update = open.as_mut().ok_or_else(malformed)?;
                    let (id, value) = match words.as_slice() {
                        [_, id, eq, value] if eq == "=" => (id, value),
                        _ => return Err(malformed()),
                    };
                    let value = value.parse::<u64>().map_err(|_| malformed())?;
                    update.values.push((id.clone(), value));
                }
                "END" => {
                    transcript.updates.push(open.take().ok_or_else(malformed)?);
                }
                "DISABLE" => transcript.disabled = true,
                _ => return Err(malformed()),
            }
        }

        if open.is_some() {
            return Err(VerificationError::Malformed {
                line: output.lines().count(),
                text: "unterminated BEGIN".to_string(),
            });
        }
        Ok(transcript)
    }

    /// Find a declared chart
    pub fn chart(&self, full_id: &str) -> Option<&DeclaredChart> {
        self.charts.iter().find(|c| c.full_id == full_id)
    }

    /// Updates for one chart, oldest first
    pub fn updates_for(&self, full_id: &str) -> Vec<&ChartUpdate> {
        self.updates.iter().filter(|u| u.full_id == full_id).collect()
    }

    /// Verify a chart was declared with exactly these dimensions
    pub fn assert_dimensions(&self, full_id: &str, expected: &[&str]) -> VerifyResult<()> {
        let chart = self
            .chart(full_id)
            .ok_or_else(|| VerificationError::ChartNotDeclared {
                chart: full_id.to_string(),
            })?;
        if chart.dimensions != expected {
            return Err(VerificationError::DimensionMismatch {
                chart: full_id.to_string(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
                actual: chart.dimensions.clone(),
            });
        }
        Ok(())
    }

    /// Verify how many value blocks a chart received
    pub fn assert_update_count(&self, full_id: &str, expected: usize) -> VerifyResult<()> {
        let actual = self.updates_for(full_id).len();
        if actual != expected {
            return Err(VerificationError::UpdateCountMismatch {
                chart: full_id.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Verify the most recent value of one dimension
    pub fn assert_last_value(&self, full_id: &str, dimension: &str, expected: u64) -> VerifyResult<()> {
        let actual = self.updates_for(full_id).last().and_then(|u| {
            u.values
                .iter()
                .find(|(id, _)| id == dimension)
                .map(|(_, v)| *v)
        });
        if actual != Some(expected) {
            return Err(VerificationError::ValueMismatch {
                chart: full_id.to_string(),
                dimension: dimension.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}
