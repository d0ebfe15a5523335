use anyhow::{anyhow, Context, Result};
use bio::io::fasta;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a FASTA file, transparently decompressing `.gz`
pub fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("Error opening file '{}'", path.to_string_lossy()))?;
    if is_gzipped(path) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Id and residues of the first record in a FASTA stream
pub fn first_record<R: Read>(reader: R) -> Result<(String, String)> {
    let record = fasta::Reader::new(BufReader::new(reader))
        .records()
        .next()
        .ok_or_else(|| anyhow!("No FASTA records found"))?
        .context("Failed to parse FASTA record")?;
    let seq = String::from_utf8_lossy(record.seq()).to_string();
    Ok((record.id().to_string(), seq))
}

/// Read the first protein sequence of a FASTA file. The residues are returned
/// as raw input; validation happens on submission.
pub fn read_protein(path: &Path) -> Result<String> {
    let (id, seq) = first_record(open(path)?)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    log::info!("read record {id} ({} residues) from {}", seq.len(), path.display());
    Ok(seq)
}
