//! Offset-addressed reading of delimited source files.
//!
//! A job never holds a reader open between chunks. Each chunk reopens the
//! file, seeks to the byte offset stored in the job state and parses at most
//! `max_rows` records, so a job can stop after any chunk and pick up again in
//! another process. Records never span lines; a quoted field containing a
//! line break is not supported.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{IngestError, Result, RowError};
use crate::row::{Header, ImportRow};

/// One data record as read, before any entity resolution.
#[derive(Debug)]
pub struct ReadRow {
    /// 1-based line on which the record starts.
    pub line: u64,
    pub row: std::result::Result<ImportRow, RowError>,
}

#[derive(Debug)]
pub struct Chunk {
    pub rows: Vec<ReadRow>,
    /// Byte offset of the first record not yet read.
    pub next_offset: u64,
    /// Line number that record starts on.
    pub next_line: u64,
    /// No records remain after this chunk.
    pub exhausted: bool,
}

/// Read and parse the header line. Returns the header and the byte offset
/// of the first data record.
pub fn read_header(path: &Path) -> Result<(Header, u64)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut raw = Vec::new();
    let read = reader.read_until(b'\n', &mut raw)?;
    if read == 0 {
        return Err(IngestError::EmptySource);
    }
    let header = Header::parse(&String::from_utf8_lossy(&raw))?;
    Ok((header, read as u64))
}

/// Rough number of data records after `offset`, counted as line breaks.
pub fn estimate_rows(path: &Path, offset: u64) -> Result<u64> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 64 * 1024];
    let mut lines = 0u64;
    let mut last = b'\n';
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        lines += buf[..n].iter().filter(|b| **b == b'\n').count() as u64;
        last = buf[n - 1];
    }
    // Final record without a trailing newline.
    if last != b'\n' {
        lines += 1;
    }
    Ok(lines)
}

/// Split one physical line into decoded fields.
fn parse_record(line: &[u8], delimiter: u8) -> std::result::Result<Vec<String>, RowError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line);
    let mut record = csv::ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => {}
        Ok(false) => return Ok(Vec::new()),
        Err(err) => return Err(RowError::Malformed(err.to_string())),
    }
    record
        .iter()
        .map(|field| {
            std::str::from_utf8(field)
                .map(str::to_string)
                .map_err(|_| RowError::Encoding)
        })
        .collect()
}

fn trim_line_end(mut raw: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = raw {
        raw = rest;
    }
    raw
}

/// Read up to `max_rows` records starting at byte `offset`, which is the
/// start of line `first_line`.
///
/// Every physical line is one record; blank lines are skipped. Records that
/// cannot be decoded or mapped onto the header come back as row errors, and
/// only I/O failures fail the whole chunk.
pub fn read_chunk(
    path: &Path,
    header: &Header,
    offset: u64,
    first_line: u64,
    max_rows: usize,
) -> Result<Chunk> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    file.seek(SeekFrom::Start(offset))?;
    let mut reader = BufReader::new(file);

    let mut rows = Vec::new();
    let mut raw = Vec::new();
    let mut next_offset = offset;
    let mut next_line = first_line;
    let mut eof = false;
    while rows.len() < max_rows {
        raw.clear();
        let read = reader.read_until(b'\n', &mut raw)?;
        if read == 0 {
            eof = true;
            break;
        }
        next_offset += read as u64;
        let line = next_line;
        next_line += 1;

        let content = trim_line_end(&raw);
        if content.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let row = parse_record(content, header.delimiter)
            .and_then(|values| header.row(line, &values));
        rows.push(ReadRow { line, row });
    }

    Ok(Chunk {
        rows,
        next_offset,
        next_line,
        exhausted: eof || next_offset >= len,
    })
}
