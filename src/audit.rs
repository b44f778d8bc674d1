use crate::ledger::{read_entries, KIND_IBAN, KIND_MRZ, KIND_PASSPORT};
use crate::models::LedgerEntry;
use crate::mod97::verify_iban;
use crate::mrz::verify_line2;
use crate::reference::{iban_length, MRZ_LINE_LENGTH};
use chrono::DateTime;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct AuditIssue {
    pub level: IssueLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub total_entries: usize,
    pub ibans: usize,
    pub passports: usize,
    pub mrzs: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Warning)
            .count()
    }
}

pub fn audit_ledger(path: &Path) -> Result<AuditReport, String> {
    let entries = read_entries(path)?;
    Ok(audit_entries(&entries))
}

pub fn audit_entries(entries: &[LedgerEntry]) -> AuditReport {
    let mut report = AuditReport::default();
    let mut ids: HashSet<&str> = HashSet::new();

    for entry in entries {
        report.total_entries += 1;
        if !ids.insert(entry.id.as_str()) {
            report
                .issues
                .push(issue(IssueLevel::Error, "duplicate ledger id detected"));
        }
        if DateTime::parse_from_rfc3339(&entry.created_at).is_err() {
            report
                .issues
                .push(issue(IssueLevel::Warning, "created_at must be RFC3339"));
        }

        match entry.kind.as_str() {
            KIND_IBAN => {
                report.ibans += 1;
                audit_iban(&entry.value, &mut report.issues);
            }
            KIND_PASSPORT => {
                report.passports += 1;
                audit_passport_number(&entry.value, &mut report.issues);
            }
            KIND_MRZ => {
                report.mrzs += 1;
                audit_mrz(&entry.value, &mut report.issues);
            }
            _ => report
                .issues
                .push(issue(IssueLevel::Warning, "unknown ledger entry kind")),
        }
    }

    report
}

fn issue(level: IssueLevel, message: &str) -> AuditIssue {
    AuditIssue {
        level,
        message: message.to_string(),
    }
}

fn audit_iban(iban: &str, issues: &mut Vec<AuditIssue>) {
    match iban.get(0..2).and_then(iban_length) {
        Some(expected) if iban.len() != expected => issues.push(issue(
            IssueLevel::Error,
            "IBAN length does not match country specification",
        )),
        Some(_) => {}
        None => issues.push(issue(IssueLevel::Warning, "IBAN country not modelled")),
    }
    if !verify_iban(iban) {
        issues.push(issue(IssueLevel::Error, "IBAN check digits are invalid"));
    }
}

fn audit_passport_number(number: &str, issues: &mut Vec<AuditIssue>) {
    if number.is_empty() || !number.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        issues.push(issue(
            IssueLevel::Error,
            "passport number must be alphanumeric",
        ));
    }
}

fn audit_mrz(value: &str, issues: &mut Vec<AuditIssue>) {
    let lines: Vec<&str> = value.lines().collect();
    if lines.len() != 2 {
        issues.push(issue(IssueLevel::Error, "MRZ entry must hold two lines"));
        return;
    }
    if lines[0].len() != MRZ_LINE_LENGTH || !lines[0].starts_with('P') {
        issues.push(issue(
            IssueLevel::Error,
            "MRZ line 1 must be a 44-character passport line",
        ));
    }
    if let Err(problems) = verify_line2(lines[1]) {
        for problem in problems {
            issues.push(AuditIssue {
                level: IssueLevel::Error,
                message: format!("MRZ {problem}"),
            });
        }
    }
}
