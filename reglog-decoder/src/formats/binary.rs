//! Binary register log reader and writer
//!
//! A register log starts with one text line naming the columns, followed by
//! densely packed records:
//!
//! ```text
//! <header line>\n
//! repeat {
//!     timestamp : u64, little-endian
//!     value[N]  : i32, little-endian
//! }
//! ```
//!
//! N is the number of header fields minus one. The only valid way for a log to
//! end is exactly on a record boundary; anything else is a truncation error.

use crate::types::{DecoderError, Header, Record, Result, TIMESTAMP_SIZE, VALUE_SIZE};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::{self, BufRead, Read, Write};

/// Streaming reader over the records of a register log
///
/// The header is parsed on construction. Records are decoded one at a time, so
/// memory use does not depend on the size of the log. After an error the
/// iterator is exhausted.
pub struct RecordReader<R> {
    reader: R,
    header: Header,
    value_buf: Vec<u8>,
    values: Vec<i32>,
    next_index: u64,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Read the header line and prepare to decode records
    pub fn new(mut reader: R) -> Result<Self> {
        let mut line = Vec::new();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            return Err(DecoderError::HeaderError(
                "input is empty, no header line found".to_string(),
            ));
        }

        let line = String::from_utf8(line).map_err(|e| {
            DecoderError::HeaderError(format!("header line is not valid UTF-8: {}", e))
        })?;
        let header = Header::parse(&line)?;

        log::debug!(
            "Header: {} value column(s) {:?}, record size {} bytes",
            header.value_count(),
            header.value_columns(),
            header.record_size()
        );

        let value_count = header.value_count();
        Ok(Self {
            reader,
            header,
            value_buf: vec![0; VALUE_SIZE * value_count],
            values: vec![0; value_count],
            next_index: 0,
            done: false,
        })
    }

    /// Column layout declared by the log
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of records decoded so far
    pub fn records_read(&self) -> u64 {
        self.next_index
    }

    /// True if no bytes are left after the records decoded so far
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.reader.fill_buf()?.is_empty())
    }

    /// Decode the next record, `Ok(None)` on a clean end of file
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let index = self.next_index;

        let mut ts_buf = [0u8; TIMESTAMP_SIZE];
        match read_full(&mut self.reader, &mut ts_buf)? {
            0 => return Ok(None),
            TIMESTAMP_SIZE => {}
            bytes_read => {
                return Err(DecoderError::TruncatedTimestamp {
                    record: index,
                    bytes_read,
                })
            }
        }
        let timestamp = LittleEndian::read_u64(&ts_buf);

        let bytes_read = read_full(&mut self.reader, &mut self.value_buf)?;
        if bytes_read < self.value_buf.len() {
            let column = self.header.value_columns()[bytes_read / VALUE_SIZE].clone();
            return Err(DecoderError::TruncatedValue {
                record: index,
                column,
                bytes_read,
            });
        }
        LittleEndian::read_i32_into(&self.value_buf, &mut self.values);

        self.next_index += 1;
        let record = Record {
            index,
            timestamp,
            values: self.values.clone(),
        };
        log::trace!("Record {}: {}", index, record);
        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` from `reader`, returning how many bytes were available
///
/// Unlike `read_exact`, a short read is reported by count so that an empty
/// stream can be told apart from a truncated one.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writer producing the binary register log format
pub struct LogWriter<W: Write> {
    writer: W,
    value_count: usize,
    records_written: u64,
}

impl<W: Write> LogWriter<W> {
    /// Write the header line and return a writer for the records
    pub fn new(mut writer: W, header: &Header) -> Result<Self> {
        writer.write_all(header.to_string().as_bytes())?;
        writer.write_all(b"\n")?;

        Ok(Self {
            writer,
            value_count: header.value_count(),
            records_written: 0,
        })
    }

    /// Append one record
    pub fn write_record(&mut self, timestamp: u64, values: &[i32]) -> Result<()> {
        if values.len() != self.value_count {
            return Err(DecoderError::FieldCountMismatch {
                expected: self.value_count,
                found: values.len(),
            });
        }

        self.writer.write_u64::<LittleEndian>(timestamp)?;
        for &value in values {
            self.writer.write_i32::<LittleEndian>(value)?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
