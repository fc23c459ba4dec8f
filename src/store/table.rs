use crate::error::CertEvalError;
use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) fn open(path: &Path) -> Result<File, CertEvalError> {
    File::open(path).map_err(|source| CertEvalError::StoreAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every row of a headed CSV file into `T`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CertEvalError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(open(path)?);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Reads the header and raw rows without interpreting them.
pub fn read_raw(path: &Path) -> Result<(StringRecord, Vec<StringRecord>), CertEvalError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(open(path)?);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?);
    }
    Ok((headers, rows))
}

/// Reads rows by position against `columns`, whatever titles the file's
/// own header uses.
pub fn read_positional<T: DeserializeOwned>(
    path: &Path,
    columns: &[&str],
) -> Result<Vec<T>, CertEvalError> {
    let (header, rows) = read_raw(path)?;
    if header.len() != columns.len() {
        return Err(CertEvalError::StoreSchema {
            path: path.to_path_buf(),
            detail: format!(
                "expected {} columns, found {}",
                columns.len(),
                header.len()
            ),
        });
    }

    let expected = StringRecord::from(columns.to_vec());
    rows.iter()
        .map(|row| row.deserialize(Some(&expected)).map_err(CertEvalError::from))
        .collect()
}

/// Writes `records` ahead of the rows already in `path`, keeping existing
/// rows byte for byte. A missing file is created with `columns` as header.
///
/// An existing header only needs the same width as `columns`; older logs
/// carry slightly different column titles and must remain writable.
pub fn prepend_records<T: Serialize>(
    path: &Path,
    columns: &[&str],
    records: &[T],
) -> Result<(), CertEvalError> {
    let (header, existing) = if path.exists() {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(open(path)?);
        let mut header = reader.byte_headers()?.clone();
        if header.is_empty() {
            header = ByteRecord::from(columns.to_vec());
        } else if header.len() != columns.len() {
            return Err(CertEvalError::StoreSchema {
                path: path.to_path_buf(),
                detail: format!(
                    "expected {} columns, found {}",
                    columns.len(),
                    header.len()
                ),
            });
        }

        let mut rows = Vec::new();
        for row in reader.byte_records() {
            rows.push(row?);
        }
        (header, rows)
    } else {
        (ByteRecord::from(columns.to_vec()), Vec::new())
    };

    debug!(
        path = %path.display(),
        new_rows = records.len(),
        existing_rows = existing.len(),
        "prepending rows"
    );

    replace_file(path, |writer| {
        writer.write_byte_record(&header)?;
        for record in records {
            writer.serialize(record)?;
        }
        for row in &existing {
            writer.write_byte_record(row)?;
        }
        Ok(())
    })
}

/// Rewrites `path` with a header and `records`.
pub fn write_records<T: Serialize>(
    path: &Path,
    columns: &[&str],
    records: &[T],
) -> Result<(), CertEvalError> {
    replace_file(path, |writer| {
        writer.write_record(columns)?;
        for record in records {
            writer.serialize(record)?;
        }
        Ok(())
    })
}

// The new content is staged next to the target and renamed over it, so a
// failed write leaves the previous file intact.
fn replace_file<F>(path: &Path, write: F) -> Result<(), CertEvalError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), CertEvalError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CertEvalError::StoreAccess {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = staging_path(path);
    let file = File::create(&staging).map_err(|source| CertEvalError::StoreAccess {
        path: staging.clone(),
        source,
    })?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    let outcome = write(&mut writer).and_then(|_| writer.flush().map_err(CertEvalError::from));
    if let Err(err) = outcome {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    drop(writer);

    fs::rename(&staging, path).map_err(|source| CertEvalError::StoreAccess {
        path: path.to_path_buf(),
        source,
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
