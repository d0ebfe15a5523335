pub mod fasta;

use anyhow::{bail, Result};
use std::path::Path;

/// Raw sequence input from the command line: literal text or a FASTA file.
pub fn sequence_input(sequence: Option<&str>, fasta: Option<&Path>) -> Result<Option<String>> {
    match (sequence, fasta) {
        (Some(_), Some(_)) => bail!("Give either a sequence or --fasta, not both"),
        (Some(sequence), None) => Ok(Some(sequence.to_string())),
        (None, Some(path)) => Ok(Some(fasta::read_protein(path)?)),
        (None, None) => Ok(None),
    }
}
