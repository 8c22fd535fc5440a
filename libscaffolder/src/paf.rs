//! A line-oriented reader for PAF (Pairwise mApping Format) overlap records.
//!
//! Only the 12 mandatory PAF columns are kept; any trailing SAM-style tag fields
//! (`tp:A:P`, `cm:i:12`, ...) are read and discarded, as PAF producers are free to
//! emit any number of them.
use std::io::Read;
use std::path::Path;

use crate::error::{ScaffoldError, Result};

/// A single PAF overlap record between a `query` and a `target` sequence.
///
/// Coordinates are half-open (`start` inclusive, `end` exclusive), 0-based, as per the
/// PAF specification. All lengths and coordinates are signed 64-bit to keep downstream
/// arithmetic (extension/overhang lengths, which can be negative intermediate values)
/// overflow-free.
#[derive(Debug, Clone, PartialEq)]
pub struct PafRecord {
    pub query_name: String,
    pub query_len: i64,
    pub query_start: i64,
    pub query_end: i64,
    /// `+` if query/target are on the same strand, `-` if opposite.
    pub strand: char,
    pub target_name: String,
    pub target_len: i64,
    pub target_start: i64,
    pub target_end: i64,
    /// Number of matching bases in the mapping.
    pub residue_matches: i64,
    /// Number of bases, including gaps, in the mapping.
    pub alignment_block_len: i64,
    pub mapping_quality: u32,
}

const MANDATORY_COLUMNS: usize = 12;

impl PafRecord {
    fn from_fields(fields: &csv::StringRecord) -> Result<Self> {
        if fields.len() < MANDATORY_COLUMNS {
            return Err(ScaffoldError::PafParseError(format!(
                "expected at least {MANDATORY_COLUMNS} columns, found {}",
                fields.len()
            )));
        }

        let field = |i: usize| -> Result<&str> {
            fields.get(i).ok_or_else(|| {
                ScaffoldError::PafParseError(format!("missing column {i}"))
            })
        };
        let parse_i64 = |i: usize| -> Result<i64> {
            field(i)?
                .parse::<i64>()
                .map_err(|e| ScaffoldError::PafParseError(format!("column {i}: {e}")))
        };

        let strand_str = field(4)?;
        let strand = strand_str.chars().next().ok_or_else(|| {
            ScaffoldError::PafParseError("empty strand column".to_string())
        })?;

        Ok(PafRecord {
            query_name: field(0)?.to_string(),
            query_len: parse_i64(1)?,
            query_start: parse_i64(2)?,
            query_end: parse_i64(3)?,
            strand,
            target_name: field(5)?.to_string(),
            target_len: parse_i64(6)?,
            target_start: parse_i64(7)?,
            target_end: parse_i64(8)?,
            residue_matches: parse_i64(9)?,
            alignment_block_len: parse_i64(10)?,
            mapping_quality: field(11)?
                .parse::<u32>()
                .map_err(|e| ScaffoldError::PafParseError(format!("column 11: {e}")))?,
        })
    }
}

/// Reads PAF records from any `Read` source, tab-delimited, one record per line.
///
/// Trailing optional tag columns are tolerated (and ignored) via a flexible-width
/// reader; a record with fewer than the 12 mandatory columns is a fatal error for
/// the whole stream, matching the "malformed line is fatal to the loader" policy.
pub struct PafReader<R> {
    inner: csv::Reader<R>,
}

impl<R: Read> PafReader<R> {
    pub fn new(reader: R) -> Self {
        let inner = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        PafReader { inner }
    }
}

impl PafReader<std::fs::File> {
    /// Opens a PAF file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> Iterator for PafReader<R> {
    type Item = Result<PafRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = csv::StringRecord::new();
        match self.inner.read_record(&mut record) {
            Ok(true) => Some(PafRecord::from_fields(&record)),
            Ok(false) => None,
            Err(e) => Some(Err(ScaffoldError::from(e))),
        }
    }
}
