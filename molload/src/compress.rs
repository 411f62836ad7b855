//! gzip staging for compressed datasets.
//!
//! A `.gz` dataset is expanded into a scratch file next to the outputs and
//! read from there. The scratch file is a [`NamedTempFile`], so it is removed
//! whenever the run ends, fatal aborts included.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Expand `source` into a scratch file inside `scratch_dir`.
pub fn decompress_to_scratch(source: &Path, scratch_dir: &Path) -> io::Result<NamedTempFile> {
    let mut decoder = GzDecoder::new(BufReader::new(File::open(source)?));
    let mut scratch = tempfile::Builder::new()
        .prefix(".molload-")
        .suffix(".staged")
        .tempfile_in(scratch_dir)?;
    io::copy(&mut decoder, &mut scratch)?;
    scratch.flush()?;
    Ok(scratch)
}

/// gzip `source` into `target`.
pub fn compress_into(source: &Path, target: &Path) -> io::Result<()> {
    let mut input = BufReader::new(File::open(source)?);
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(target)?), Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()
}
