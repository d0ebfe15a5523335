pub mod mock;

pub use mock::{FixedSitesPredictor, HlaClass, SlidingWindowPredictor};

use crate::sequence::{ProteinSequence, SequenceError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// A scored, labeled sub-range of a sequence (a candidate epitope).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: u32,
    /// 0-based, inclusive
    pub start: usize,
    /// 0-based, inclusive
    pub end: usize,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationError {
    OutOfBounds { start: usize, end: usize, len: usize },
    ScoreOutOfRange(f64),
}

impl std::error::Error for AnnotationError {}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnnotationError::OutOfBounds { start, end, len } => write!(
                f,
                "annotation range {start}..={end} does not fit a sequence of length {len}"
            ),
            AnnotationError::ScoreOutOfRange(score) => {
                write!(f, "annotation score {score} is outside [0, 1]")
            }
        }
    }
}

impl Annotation {
    /// Build an annotation whose label is taken from `sequence`, so it always
    /// satisfies `start <= end < len` and `label == sequence[start..=end]`.
    pub fn new(
        id: u32,
        sequence: &ProteinSequence,
        start: usize,
        end: usize,
        score: f64,
    ) -> Result<Self, AnnotationError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(AnnotationError::ScoreOutOfRange(score));
        }
        let label = sequence
            .slice(start, end)
            .ok_or(AnnotationError::OutOfBounds {
                start,
                end,
                len: sequence.len(),
            })?;
        Ok(Self {
            id,
            start,
            end,
            label: label.to_string(),
            score,
        })
    }

    /// Unchecked constructor for annotations supplied by an external source.
    pub fn from_parts(id: u32, start: usize, end: usize, label: &str, score: f64) -> Self {
        Self {
            id,
            start,
            end,
            label: label.to_string(),
            score,
        }
    }

    pub fn covers(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }

    /// Number of residues in the interval
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// True when the interval lies inside `sequence` and the recorded label
    /// matches the residues it covers.
    pub fn is_consistent_with(&self, sequence: &ProteinSequence) -> bool {
        self.start <= self.end
            && self.label.len() == self.width()
            && sequence.slice(self.start, self.end) == Some(self.label.as_str())
    }

    /// `"<start+1>-<end>"`, the position string shown in the table and CSV.
    pub fn position_label(&self) -> String {
        format!("{}-{}", self.start + 1, self.end)
    }

    /// Total order used everywhere an annotation has to win over another:
    /// score descending, then id, start and end ascending.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.id.cmp(&other.id))
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

/// Pluggable prediction capability: a function from a validated sequence to
/// annotations satisfying the [`Annotation::new`] invariants.
pub trait BindingSitePredictor {
    fn name(&self) -> &'static str;
    fn predict(&mut self, sequence: &ProteinSequence) -> Vec<Annotation>;
}

/// Sequence plus annotations from a single submission. Read-only once built.
#[derive(Debug, Clone)]
pub struct ResultSet {
    sequence: ProteinSequence,
    annotations: Vec<Annotation>,
    timestamp: DateTime<Utc>,
}

impl ResultSet {
    pub fn new(
        sequence: ProteinSequence,
        annotations: Vec<Annotation>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            annotations,
            timestamp,
        }
    }

    /// Validate raw user input and run the predictor on it.
    /// The predictor is not called when validation fails.
    pub fn submit(
        input: &str,
        predictor: &mut dyn BindingSitePredictor,
    ) -> Result<Self, SequenceError> {
        let sequence = ProteinSequence::parse(input)?;
        let annotations = predictor.predict(&sequence);
        log::info!(
            "predictor {} produced {} annotations for a sequence of {} residues",
            predictor.name(),
            annotations.len(),
            sequence.len()
        );
        Ok(Self::new(sequence, annotations, Utc::now()))
    }

    pub fn sequence(&self) -> &ProteinSequence {
        &self.sequence
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// ISO-8601 UTC timestamp, e.g. `2024-05-01T12:30:00.123Z`
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn export_file_name(&self) -> String {
        format!(
            "epitope-predictions-{}.csv",
            self.iso_timestamp().replace(':', "-")
        )
    }
}
