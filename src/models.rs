use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "<")]
    Unspecified,
}

impl Sex {
    pub fn mrz_char(&self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
            Sex::Unspecified => '<',
        }
    }
}

/// A validated passport holder record. Dates are already normalized and
/// `expiry` is after `dob`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrzInput {
    #[serde(default)]
    pub subtype: Option<char>,
    pub given_names: String,
    pub surname: String,
    pub dob: NaiveDate,
    pub sex: Sex,
    pub issuer: String,
    pub expiry: NaiveDate,
    pub passport_num: String,
    #[serde(default)]
    pub personal_num: Option<String>,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mrz {
    pub line1: String,
    pub line2: String,
    /// Names of fields that were cut to fit their slot.
    pub truncated_fields: Vec<String>,
}

impl Mrz {
    pub fn lines(&self) -> [String; 2] {
        [self.line1.clone(), self.line2.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MrzRowResult {
    Ok {
        row: usize,
        input: MrzInput,
        mrz: [String; 2],
        #[serde(skip_serializing_if = "Vec::is_empty")]
        truncated_fields: Vec<String>,
    },
    Failed {
        row: usize,
        errors: Vec<RowIssue>,
    },
}

impl MrzRowResult {
    pub fn row(&self) -> usize {
        match self {
            MrzRowResult::Ok { row, .. } | MrzRowResult::Failed { row, .. } => *row,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, MrzRowResult::Ok { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub kind: String,
    pub value: String,
    pub created_at: String,
}
