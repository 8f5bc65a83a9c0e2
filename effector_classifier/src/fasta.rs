use std::fs::File;
use std::io::Read;
use std::path::Path;

use bio::io::fasta;
use tracing::{debug, info};

use crate::batch::SequenceRecord;
use crate::errors::{EffectorError, Result};

/// Parses FASTA records from any reader.
///
/// The identifier is the first whitespace-delimited token of each header. Text before
/// the first header, or a header with no identifier, is rejected as malformed.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<SequenceRecord>> {
    let reader = fasta::Reader::new(reader);
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| EffectorError::MalformedInput(e.to_string()))?;
        if record.id().is_empty() {
            return Err(EffectorError::MalformedInput(format!(
                "record {} has an empty header",
                records.len() + 1
            )));
        }
        let sequence = String::from_utf8(record.seq().to_vec()).map_err(|e| {
            EffectorError::MalformedInput(format!("record '{}' is not UTF-8: {}", record.id(), e))
        })?;
        debug!("Read '{}' ({} residues)", record.id(), sequence.len());
        records.push(SequenceRecord::new(record.id(), sequence));
    }

    Ok(records)
}

/// Parses FASTA records from uploaded text.
pub fn parse_fasta(text: &str) -> Result<Vec<SequenceRecord>> {
    read_records(text.as_bytes())
}

pub fn read_fasta(path: &Path) -> Result<Vec<SequenceRecord>> {
    info!("Reading sequences from {}", path.display());
    let file = File::open(path)?;
    let records = read_records(file)?;
    info!("Read {} sequences", records.len());
    Ok(records)
}
