use crate::reference::{passport_date_pattern, passport_validity_years, MAX_BATCH_COUNT};
use crate::util::{random_digits, random_upper_letters};
use chrono::{Datelike, Days, Months, NaiveDate};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassportCountry {
    UnitedStates,
    Brazil,
}

impl PassportCountry {
    pub fn from_code(code: &str) -> Result<Self, String> {
        match code.trim().to_uppercase().as_str() {
            "US" => Ok(PassportCountry::UnitedStates),
            "BR" => Ok(PassportCountry::Brazil),
            other => Err(format!("unsupported passport country: {other}")),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PassportCountry::UnitedStates => "US",
            PassportCountry::Brazil => "BR",
        }
    }

    /// (letters, digits) of the national number format.
    fn layout(&self) -> (usize, usize) {
        match self {
            PassportCountry::UnitedStates => (1, 8),
            PassportCountry::Brazil => (2, 6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassportDates {
    pub issue_date: String,
    pub expiry_date: String,
}

fn check_count(count: usize) -> Result<(), String> {
    if !(1..=MAX_BATCH_COUNT).contains(&count) {
        return Err(format!("count must be 1..{}", MAX_BATCH_COUNT));
    }
    Ok(())
}

/// Letters (or `prefix` when non-empty) followed by digits whose first digit is never 0.
pub fn generate_passport_number<R: Rng + ?Sized>(
    rng: &mut R,
    country: PassportCountry,
    prefix: &str,
) -> String {
    let (letters, digits) = country.layout();
    let head = if prefix.trim().is_empty() {
        random_upper_letters(rng, letters)
    } else {
        prefix.trim().to_uppercase()
    };
    let first = char::from(b'0' + rng.gen_range(1..=9u8));
    format!("{}{}{}", head, first, random_digits(rng, digits - 1))
}

pub fn generate_passport_numbers<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    country: PassportCountry,
    prefix: &str,
) -> Result<Vec<String>, String> {
    check_count(count)?;
    Ok((0..count)
        .map(|_| generate_passport_number(rng, country, prefix))
        .collect())
}

/// Issue dates fall between 1 January of `today - min(validity, 5)` years and
/// two days before `today`; expiry is the day before the validity anniversary.
pub fn generate_passport_dates<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    country: PassportCountry,
    format_tag: &str,
    today: NaiveDate,
) -> Result<Vec<PassportDates>, String> {
    check_count(count)?;
    let pattern = passport_date_pattern(format_tag)
        .ok_or_else(|| format!("unsupported date format: {format_tag}"))?;
    let validity = passport_validity_years(country.code())
        .ok_or_else(|| format!("no validity period for {}", country.code()))?;

    let latest_issue = today
        .checked_sub_days(Days::new(2))
        .ok_or_else(|| "date out of range".to_string())?;
    let years_back = validity.min(5) as i32;
    let start = NaiveDate::from_ymd_opt(today.year() - years_back, 1, 1)
        .ok_or_else(|| "date out of range".to_string())?;
    let span = (latest_issue - start).num_days().max(0) as u64;

    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        let issue = start
            .checked_add_days(Days::new(rng.gen_range(0..=span)))
            .ok_or_else(|| "date out of range".to_string())?;
        let expiry = issue
            .checked_add_months(Months::new(validity * 12))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| "date out of range".to_string())?;
        pairs.push(PassportDates {
            issue_date: issue.format(pattern).to_string(),
            expiry_date: expiry.format(pattern).to_string(),
        });
    }
    Ok(pairs)
}
