//! Batch front end for MRZ generation: accepts a single record, a list of
//! records or a header-first table, validates each row on its own and
//! collects per-row issues next to the rows that succeeded.

use crate::models::{Mrz, MrzInput, MrzRowResult, RowIssue, Sex};
use crate::mrz::build_mrz;
use crate::reference::{MRZ_PASSPORT_NUM_WIDTH, MRZ_PERSONAL_NUM_WIDTH};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

pub type RawRow = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Iso,
    DayMonthSlash,
    DayMonthDash,
    MonthDaySlash,
    YearSlash,
}

impl DateFormat {
    /// Order used when no format is given: the first format that parses wins,
    /// so `d/m/Y` is preferred over `m/d/Y` for ambiguous values.
    pub const FALLBACK_ORDER: [DateFormat; 5] = [
        DateFormat::Iso,
        DateFormat::DayMonthSlash,
        DateFormat::DayMonthDash,
        DateFormat::MonthDaySlash,
        DateFormat::YearSlash,
    ];

    pub fn from_tag(tag: &str) -> Result<Self, String> {
        match tag.trim().to_lowercase().as_str() {
            "iso" | "y-m-d" => Ok(DateFormat::Iso),
            "dmy-slash" | "d/m/y" => Ok(DateFormat::DayMonthSlash),
            "dmy-dash" | "d-m-y" => Ok(DateFormat::DayMonthDash),
            "mdy-slash" | "m/d/y" => Ok(DateFormat::MonthDaySlash),
            "ymd-slash" | "y/m/d" => Ok(DateFormat::YearSlash),
            other => Err(format!("unknown date format: {other}")),
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::DayMonthSlash => "%d/%m/%Y",
            DateFormat::DayMonthDash => "%d-%m-%Y",
            DateFormat::MonthDaySlash => "%m/%d/%Y",
            DateFormat::YearSlash => "%Y/%m/%d",
        }
    }
}

pub fn parse_date(value: &str, format: Option<DateFormat>) -> Option<NaiveDate> {
    let value = value.trim();
    match format {
        Some(fmt) => NaiveDate::parse_from_str(value, fmt.pattern()).ok(),
        None => DateFormat::FALLBACK_ORDER
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt.pattern()).ok()),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn row_from_object(object: &serde_json::Map<String, Value>) -> RawRow {
    let mut row = RawRow::new();
    for (key, value) in object {
        if let Some(text) = scalar_to_string(value) {
            row.insert(key.trim().to_lowercase(), text);
        }
    }
    row
}

/// Maps a header-first table to keyed rows. Header names are trimmed and
/// lower-cased, short rows are padded with empty values and empty rows are
/// skipped.
pub fn rows_from_table(table: &[Vec<String>]) -> Vec<RawRow> {
    let Some((header, body)) = table.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    let mut rows = Vec::new();
    for cells in body {
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (idx, key) in header.iter().enumerate() {
            let value = cells.get(idx).cloned().unwrap_or_default();
            row.insert(key.clone(), value);
        }
        rows.push(row);
    }
    rows
}

pub fn rows_from_json(input: &Value) -> Result<Vec<RawRow>, String> {
    match input {
        Value::Object(object) => Ok(vec![row_from_object(object)]),
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        Value::Array(items) if items[0].is_array() => {
            let table: Vec<Vec<String>> = items
                .iter()
                .map(|item| match item {
                    Value::Array(cells) => cells
                        .iter()
                        .map(|cell| scalar_to_string(cell).unwrap_or_default())
                        .collect(),
                    _ => Vec::new(),
                })
                .collect();
            Ok(rows_from_table(&table))
        }
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::Object(object) => row_from_object(object),
                _ => RawRow::new(),
            })
            .collect()),
        _ => Err("MRZ input must be an object, a list of objects or a table".to_string()),
    }
}

pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut table = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| err.to_string())?;
        table.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows_from_table(&table))
}

pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, String> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let file = std::fs::File::open(path)
        .map_err(|err| format!("cannot open {}: {}", path.display(), err))?;
    if is_csv {
        rows_from_csv(file)
    } else {
        let value: Value = serde_json::from_reader(file).map_err(|err| err.to_string())?;
        rows_from_json(&value)
    }
}

fn field<'a>(row: &'a RawRow, key: &str) -> Option<&'a str> {
    row.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

struct RowValidator {
    row: usize,
    issues: Vec<RowIssue>,
}

impl RowValidator {
    fn issue(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(RowIssue {
            row: self.row,
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn required(&mut self, raw: &RawRow, key: &str) -> Option<String> {
        match field(raw, key) {
            Some(value) => Some(value.to_string()),
            None => {
                self.issue(key, format!("{key} is required"));
                None
            }
        }
    }

    fn date(&mut self, raw: &RawRow, key: &str, format: Option<DateFormat>) -> Option<NaiveDate> {
        let value = self.required(raw, key)?;
        let parsed = parse_date(&value, format);
        if parsed.is_none() {
            self.issue(key, format!("{key} is not a recognised date: {value}"));
        }
        parsed
    }

    fn country(&mut self, raw: &RawRow, key: &str) -> Option<String> {
        let value = self.required(raw, key)?.to_uppercase();
        if value.len() == 3 && value.chars().all(|ch| ch.is_ascii_uppercase()) {
            Some(value)
        } else {
            self.issue(key, format!("{key} must be 3 letters"));
            None
        }
    }

    fn bounded(&mut self, key: &str, value: Option<String>, max: usize) -> Option<String> {
        let value = value?;
        if value.chars().count() > max {
            self.issue(key, format!("{key} must be at most {max} characters"));
            None
        } else {
            Some(value)
        }
    }
}

/// Validates one keyed row into an [`MrzInput`]. `row` is the 1-based data row
/// number used in issues.
pub fn validate_row(
    row: usize,
    raw: &RawRow,
    format: Option<DateFormat>,
) -> Result<MrzInput, Vec<RowIssue>> {
    let mut v = RowValidator {
        row,
        issues: Vec::new(),
    };

    let subtype = match field(raw, "subtype") {
        None => None,
        Some(value) => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() || ch == '<' => Some(ch),
                _ => {
                    v.issue("subtype", "subtype must be a single letter");
                    None
                }
            }
        }
    };

    let given_names = v.required(raw, "given_names");
    let surname = v.required(raw, "surname");
    let dob = v.date(raw, "dob", format);
    let expiry = v.date(raw, "expiry", format);
    if let (Some(dob), Some(expiry)) = (dob, expiry) {
        if expiry <= dob {
            v.issue("expiry", "expiry must be after dob");
        }
    }

    let sex = match v.required(raw, "sex").map(|s| s.to_uppercase()).as_deref() {
        Some("M") => Some(Sex::Male),
        Some("F") => Some(Sex::Female),
        Some(_) => {
            v.issue("sex", "sex must be M or F");
            None
        }
        None => None,
    };

    let issuer = v.country(raw, "issuer");
    let nationality = v.country(raw, "nationality");
    let passport = v.required(raw, "passport_num");
    let passport_num = v.bounded("passport_num", passport, MRZ_PASSPORT_NUM_WIDTH);
    let personal = field(raw, "personal_num").map(str::to_string);
    let personal_num = v.bounded("personal_num", personal, MRZ_PERSONAL_NUM_WIDTH);

    if !v.issues.is_empty() {
        return Err(v.issues);
    }

    match (
        given_names,
        surname,
        dob,
        sex,
        issuer,
        expiry,
        passport_num,
        nationality,
    ) {
        (
            Some(given_names),
            Some(surname),
            Some(dob),
            Some(sex),
            Some(issuer),
            Some(expiry),
            Some(passport_num),
            Some(nationality),
        ) => Ok(MrzInput {
            subtype,
            given_names,
            surname,
            dob,
            sex,
            issuer,
            expiry,
            passport_num,
            personal_num,
            nationality,
        }),
        _ => {
            v.issue("row", "row is incomplete");
            Err(v.issues)
        }
    }
}

/// Typed entry point: builds the MRZ for each already-validated record.
pub fn generate_mrz(records: &[MrzInput]) -> Result<Vec<Mrz>, String> {
    records.iter().map(build_mrz).collect()
}

/// Validates and encodes every row. Invalid rows become
/// [`MrzRowResult::Failed`] and do not stop the batch; an `Err` means the
/// encoder itself produced an impossible line.
pub fn generate_mrz_batch(
    rows: &[RawRow],
    format: Option<DateFormat>,
) -> Result<Vec<MrzRowResult>, String> {
    let mut results = Vec::with_capacity(rows.len());
    for (idx, raw) in rows.iter().enumerate() {
        let row = idx + 1;
        match validate_row(row, raw, format) {
            Ok(input) => {
                let mrz = build_mrz(&input)?;
                results.push(MrzRowResult::Ok {
                    row,
                    mrz: mrz.lines(),
                    truncated_fields: mrz.truncated_fields,
                    input,
                });
            }
            Err(errors) => {
                log::warn!("MRZ row {} rejected with {} issue(s)", row, errors.len());
                results.push(MrzRowResult::Failed { row, errors });
            }
        }
    }
    let ok = results.iter().filter(|r| r.is_ok()).count();
    log::info!(
        "MRZ batch: {} row(s), {} encoded, {} rejected",
        results.len(),
        ok,
        results.len() - ok
    );
    Ok(results)
}
