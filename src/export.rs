use crate::prediction::ResultSet;
use crate::ranking::rank;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 4] = ["Rank", "Position", "Epitope", "Score"];

/// One row of an exported CSV file.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub rank: usize,
    pub position: String,
    pub epitope: String,
    pub score: f64,
}

/// Write the ranked annotations of `result` as CSV.
pub fn write_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for row in rank(result.annotations()) {
        writer.write_record(&[
            row.rank.to_string(),
            row.annotation.position_label(),
            row.annotation.label.clone(),
            format!("{:.3}", row.annotation.score),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `result` into `dir` under [`ResultSet::export_file_name`].
pub fn export_to_dir(result: &ResultSet, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(result.export_file_name());
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(result, file).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Parse CSV produced by [`write_csv`].
#[cfg(test)]
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<ExportRow>> {
    use anyhow::anyhow;

    let mut reader = csv::Reader::from_reader(reader);
    let header = reader.headers()?.clone();
    if header.iter().ne(CSV_HEADER) {
        return Err(anyhow!("Unexpected CSV header: {:?}", header));
    }

    let mut ret = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: usize| {
            record
                .get(index)
                .ok_or_else(|| anyhow!("Row {} is missing column {}", i + 1, CSV_HEADER[index]))
        };
        ret.push(ExportRow {
            rank: field(0)?
                .parse()
                .with_context(|| format!("Row {} has an invalid rank", i + 1))?,
            position: field(1)?.to_string(),
            epitope: field(2)?.to_string(),
            score: field(3)?
                .parse()
                .with_context(|| format!("Row {} has an invalid score", i + 1))?,
        });
    }
    Ok(ret)
}
