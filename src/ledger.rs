use crate::models::LedgerEntry;
use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, OpenOptions};
use std::path::Path;
use uuid::Uuid;

pub const KIND_IBAN: &str = "iban";
pub const KIND_PASSPORT: &str = "passport";
pub const KIND_MRZ: &str = "mrz";

pub fn entry(kind: &str, value: &str) -> LedgerEntry {
    LedgerEntry {
        id: Uuid::new_v4().to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// MRZ entries store both lines separated by a newline.
pub fn mrz_value(line1: &str, line2: &str) -> String {
    format!("{line1}\n{line2}")
}

/// Appends entries to a CSV ledger, writing the header only when the file is new.
pub fn append_entries(path: &Path, entries: &[LedgerEntry]) -> Result<usize, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let is_new = std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| err.to_string())?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for entry in entries {
        writer.serialize(entry).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())?;
    log::info!("ledger: appended {} entries to {}", entries.len(), path.display());
    Ok(entries.len())
}

pub fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut entries = Vec::new();
    for result in reader.deserialize() {
        let entry: LedgerEntry = result.map_err(|err| err.to_string())?;
        entries.push(entry);
    }
    Ok(entries)
}
