use std::io::Write;

use crate::shapes::relational::Table;

/// Write a table as RFC 4180 CSV: header row first, columns in declared
/// order, nulls as empty fields, quoting only where needed.
pub fn write_table_csv<W: Write>(writer: W, table: &Table) -> Result<W, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|err| err.into_error().into())
}
