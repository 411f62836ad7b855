//! Dialect detection for delimited structure files.
//!
//! The dialect (delimiter, quote, text encoding) is sniffed once from a
//! fixed-size prefix of the file and then used for every read and for the
//! rewritten copy of the dataset.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DialectError, DialectResult, FormatError, FormatResult};

/// Bytes read from the start of a file to sniff its dialect.
pub const SAMPLE_SIZE: usize = 1024;

/// Share of sampled lines, in percent, that must agree on the field count.
pub const CONSISTENCY_PERCENT: usize = 90;

/// Default candidate delimiters, in order of preference.
pub const DEFAULT_CANDIDATES: [u8; 2] = [b',', b'\t'];

const QUOTE: u8 = b'"';

/// Delimiter, quoting and encoding of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Normalised charset name (`utf-8`, `iso-8859-1`, `windows-1252`, ...).
    pub encoding: String,
}

impl Dialect {
    /// CSV reader configured for this dialect. Short and long rows are
    /// accepted; the pipeline squares them up against the headings.
    pub fn reader_builder(&self, has_headers: bool) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(has_headers)
            .flexible(true);
        builder
    }

    /// CSV writer producing the same dialect.
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.delimiter).quote(self.quote);
        builder
    }

    /// Decode one raw field.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        decode_content(bytes, &self.encoding)
    }

    /// Encode one field back into this dialect's encoding.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        encode_content(text, &self.encoding)
    }
}

/// Human-readable delimiter name.
pub fn format_delimiter(d: u8) -> String {
    match d {
        b'\t' => "\\t".to_string(),
        c => char::from(c).to_string(),
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content<'a>(bytes: &'a [u8], encoding: &str) -> Cow<'a, str> {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0,
        // UTF-8 and anything unrecognised: lossy UTF-8
        _ => String::from_utf8_lossy(bytes),
    }
}

/// Encode a string using the specified encoding. Characters the encoding
/// cannot represent become numeric character references.
pub fn encode_content<'a>(text: &'a str, encoding: &str) -> Cow<'a, [u8]> {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.encode(text).0,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.encode(text).0,
        _ => Cow::Borrowed(text.as_bytes()),
    }
}

/// Sniffs the delimiter from a preference-ordered candidate set.
#[derive(Debug, Clone)]
pub struct DialectDetector {
    candidates: Vec<u8>,
}

impl Default for DialectDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectDetector {
    /// Comma, then tab.
    pub fn new() -> Self {
        Self::with_candidates(DEFAULT_CANDIDATES)
    }

    pub fn with_candidates(candidates: impl Into<Vec<u8>>) -> Self {
        Self {
            candidates: candidates.into(),
        }
    }

    pub fn candidates(&self) -> &[u8] {
        &self.candidates
    }

    /// Sniff the dialect from the first [`SAMPLE_SIZE`] bytes of a file.
    pub fn detect_path(&self, path: &Path) -> DialectResult<Dialect> {
        let mut sample = Vec::with_capacity(SAMPLE_SIZE);
        File::open(path)?
            .take(SAMPLE_SIZE as u64)
            .read_to_end(&mut sample)?;
        let truncated = sample.len() == SAMPLE_SIZE;
        self.detect_bytes(&sample, truncated)
    }

    /// Sniff the dialect from a sample. When `truncated`, the trailing
    /// partial line is ignored.
    ///
    /// A candidate qualifies when at least [`CONSISTENCY_PERCENT`] of the
    /// sampled lines split into the same number of fields, and that number is
    /// at least two. The first qualifying candidate wins. Rows with another
    /// field count are squared up when the records are read.
    pub fn detect_bytes(&self, sample: &[u8], truncated: bool) -> DialectResult<Dialect> {
        let sample = if truncated {
            match sample.iter().rposition(|&b| b == b'\n') {
                Some(end) => &sample[..=end],
                None => sample,
            }
        } else {
            sample
        };

        let delimiter = self
            .candidates
            .iter()
            .copied()
            .find(|&d| dominant_field_count(sample, d).is_some_and(|n| n >= 2))
            .ok_or_else(|| DialectError::Undetectable {
                candidates: self
                    .candidates
                    .iter()
                    .map(|&d| format_delimiter(d))
                    .collect::<Vec<_>>()
                    .join(" or "),
            })?;

        Ok(Dialect {
            delimiter,
            quote: QUOTE,
            encoding: detect_encoding(sample),
        })
    }
}

/// Most common field count of the sample, if enough rows share it.
fn dominant_field_count(sample: &[u8], delimiter: u8) -> Option<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(QUOTE)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample);

    let mut frequencies: HashMap<usize, usize> = HashMap::new();
    let mut rows = 0;
    for record in reader.byte_records() {
        *frequencies.entry(record.ok()?.len()).or_default() += 1;
        rows += 1;
    }

    // Ties go to the wider layout
    let (count, seen) = frequencies
        .into_iter()
        .max_by_key(|&(count, seen)| (seen, count))?;
    (seen * 100 >= rows * CONSISTENCY_PERCENT).then_some(count)
}

/// Read the first row of a file under a dialect: the heading row, or the
/// first data row when the file has no headings.
pub fn read_first_row(path: &Path, dialect: &Dialect) -> FormatResult<Vec<String>> {
    let mut reader = dialect.reader_builder(false).from_path(path)?;
    let mut record = csv::ByteRecord::new();
    if !reader.read_byte_record(&mut record)? {
        return Err(FormatError::EmptyFile);
    }
    Ok(record
        .iter()
        .map(|field| {
            dialect
                .decode(field)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect())
}
