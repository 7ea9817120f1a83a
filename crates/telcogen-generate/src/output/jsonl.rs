use std::io::{self, Write};

use serde::Serialize;

/// Write one compact JSON value per line. Returns the number of lines.
pub fn write_jsonl<'a, W, T, I>(writer: &mut W, rows: I) -> io::Result<u64>
where
    W: Write,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut lines = 0u64;
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
        lines += 1;
    }
    writer.flush()?;
    Ok(lines)
}
