// Match output module
//
// Text formatting for the comparison stream. Each run opens with one
// region line per input file, followed by one line per match:
//
//   File <name>, offset <offset>, len <len>
//   <small_start>,<large_start>,<score>,<matched_len>
//
// Downstream filters parse these lines directly, so the layout is fixed.

use std::io::{self, Write};

use crate::core::alignment::correlate::MatchRecord;

pub fn write_region_header<W: Write + ?Sized>(
    writer: &mut W,
    name: &str,
    offset: u64,
    len: u64,
) -> io::Result<()> {
    writeln!(writer, "File {}, offset {}, len {}", name, offset, len)
}

#[inline]
pub fn write_match<W: Write + ?Sized>(writer: &mut W, m: &MatchRecord) -> io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{}",
        m.small_start, m.large_start, m.score, m.matched_len
    )
}

/// Counts what passes through so the driver can report totals.
pub struct MatchWriter<'w, W: Write + ?Sized> {
    writer: &'w mut W,
    pub written: usize,
}

impl<'w, W: Write + ?Sized> MatchWriter<'w, W> {
    pub fn new(writer: &'w mut W) -> Self {
        MatchWriter { writer, written: 0 }
    }

    pub fn write(&mut self, m: &MatchRecord) -> io::Result<()> {
        write_match(self.writer, m)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, matches: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        for m in matches {
            self.write(m)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
