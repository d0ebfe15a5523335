use std::fmt;

/// The 20 standard single-letter amino acid codes.
pub const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

pub fn is_amino_acid(residue: u8) -> bool {
    AMINO_ACIDS.contains(&residue)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    Empty,
    /// position is 0-based in the normalized (whitespace-free) sequence
    InvalidResidue { residue: char, position: usize },
}

impl std::error::Error for SequenceError {}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SequenceError::Empty => write!(f, "Please enter a protein sequence."),
            SequenceError::InvalidResidue { .. } => write!(
                f,
                "Invalid sequence. Please use only valid single-letter amino acid codes."
            ),
        }
    }
}

impl SequenceError {
    /// Longer description for logs, including the offending residue
    pub fn detail(&self) -> String {
        match self {
            SequenceError::Empty => String::from("empty input"),
            SequenceError::InvalidResidue { residue, position } => {
                format!("residue {residue:?} at position {} is not an amino acid code", position + 1)
            }
        }
    }
}

/// Validated, upper-case, non-empty protein sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProteinSequence {
    residues: String,
}

impl ProteinSequence {
    /// Strip all whitespace, upper-case and check every residue against [`AMINO_ACIDS`].
    pub fn parse(input: &str) -> Result<Self, SequenceError> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        if normalized.is_empty() {
            return Err(SequenceError::Empty);
        }
        if let Some((position, residue)) = normalized
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii() || !is_amino_acid(*c as u8))
        {
            return Err(SequenceError::InvalidResidue { residue, position });
        }
        Ok(Self {
            residues: normalized,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residues `start..=end`, or `None` when the range leaves the sequence.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end >= self.len() {
            return None;
        }
        Some(&self.residues[start..=end])
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.residues)
    }
}
