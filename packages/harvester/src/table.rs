//! CSV rendering of the instrument table.

use std::fs;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::types::{InstrumentRecord, COLUMNS};

/// Write the header and all records as CSV to `writer`.
///
/// The header is written even when there are no records.
pub fn write_records<W: io::Write>(writer: W, records: &[InstrumentRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;

    Ok(())
}

/// Render the records as a CSV string.
///
/// # Examples
/// ```
/// use firds_harvester::table::to_csv_string;
///
/// let csv = to_csv_string(&[]).unwrap();
/// assert_eq!(
///     csv.trim_end(),
///     "FinInstrmGnlAttrbts.Id,FinInstrmGnlAttrbts.FullNm,FinInstrmGnlAttrbts.ClssfctnTp,\
///      FinInstrmGnlAttrbts.CmmdtyDerivInd,FinInstrmGnlAttrbts.NtnlCcy,Issr"
/// );
/// ```
pub fn to_csv_string(records: &[InstrumentRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Write the records to `path`, replacing any existing file.
///
/// Output goes to a sibling temporary file first and is then renamed into
/// place, so readers never observe a half-written table.
pub fn write_csv(records: &[InstrumentRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_file = path.with_extension("csv.tmp");
    let written = fs::File::create(&temp_file)
        .map_err(Into::into)
        .and_then(|file| write_records(io::BufWriter::new(file), records))
        .and_then(|()| fs::rename(&temp_file, path).map_err(Into::into));
    if let Err(e) = written {
        // Best effort.
        let _ = fs::remove_file(&temp_file);
        return Err(e);
    }

    tracing::info!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(())
}

/// Read a CSV written by [`write_csv`] back into records.
pub fn read_csv(path: &Path) -> Result<Vec<InstrumentRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for record in rdr.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
