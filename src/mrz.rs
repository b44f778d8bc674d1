//! TD3 (passport) machine readable zone: two lines of 44 characters.

use crate::icao::{check_digit, composite_check_digit};
use crate::models::{Mrz, MrzInput};
use crate::mrz_field::{clean, name_field, pad_field, PaddedField};
use crate::reference::{
    MRZ_COUNTRY_WIDTH, MRZ_DOCUMENT_TYPE, MRZ_FILLER, MRZ_LINE_LENGTH, MRZ_NAME_WIDTH,
    MRZ_PASSPORT_NUM_WIDTH, MRZ_PERSONAL_NUM_WIDTH,
};
use chrono::NaiveDate;

fn mrz_date(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

fn note_truncation(name: &str, field: &PaddedField, width: usize, truncated: &mut Vec<String>) {
    if field.truncated {
        log::warn!(
            "MRZ field {} truncated from {} to {} characters",
            name,
            field.original_len,
            width
        );
        truncated.push(name.to_string());
    }
}

fn subtype_char(subtype: Option<char>) -> char {
    match subtype.map(|ch| ch.to_ascii_uppercase()) {
        Some(ch) if ch.is_ascii_uppercase() => ch,
        _ => MRZ_FILLER,
    }
}

pub fn build_mrz(input: &MrzInput) -> Result<Mrz, String> {
    let mut truncated = Vec::new();

    let issuer = pad_field(&clean(&input.issuer), MRZ_COUNTRY_WIDTH);
    note_truncation("issuer", &issuer, MRZ_COUNTRY_WIDTH, &mut truncated);
    let name = name_field(&input.surname, &input.given_names);
    note_truncation("name", &name, MRZ_NAME_WIDTH, &mut truncated);

    let mut line1 = String::with_capacity(MRZ_LINE_LENGTH);
    line1.push(MRZ_DOCUMENT_TYPE);
    line1.push(subtype_char(input.subtype));
    line1.push_str(&issuer.value);
    line1.push_str(&name.value);

    let passport = pad_field(&clean(&input.passport_num), MRZ_PASSPORT_NUM_WIDTH);
    note_truncation("passport_num", &passport, MRZ_PASSPORT_NUM_WIDTH, &mut truncated);
    let nationality = pad_field(&clean(&input.nationality), MRZ_COUNTRY_WIDTH);
    note_truncation("nationality", &nationality, MRZ_COUNTRY_WIDTH, &mut truncated);
    let personal = pad_field(
        &clean(input.personal_num.as_deref().unwrap_or("")),
        MRZ_PERSONAL_NUM_WIDTH,
    );
    note_truncation("personal_num", &personal, MRZ_PERSONAL_NUM_WIDTH, &mut truncated);
    let dob = mrz_date(input.dob);
    let expiry = mrz_date(input.expiry);

    let overall = composite_check_digit(&passport.value, &dob, &expiry, &personal.value)?;

    let mut line2 = String::with_capacity(MRZ_LINE_LENGTH);
    line2.push_str(&passport.value);
    line2.push_str(&check_digit(&passport.value)?.to_string());
    line2.push_str(&nationality.value);
    line2.push_str(&dob);
    line2.push_str(&check_digit(&dob)?.to_string());
    line2.push(input.sex.mrz_char());
    line2.push_str(&expiry);
    line2.push_str(&check_digit(&expiry)?.to_string());
    line2.push_str(&personal.value);
    line2.push_str(&check_digit(&personal.value)?.to_string());
    line2.push_str(&overall.to_string());

    for (label, line) in [("line 1", &line1), ("line 2", &line2)] {
        if line.len() != MRZ_LINE_LENGTH {
            return Err(format!(
                "internal error: MRZ {} has {} characters (expected {})",
                label,
                line.len(),
                MRZ_LINE_LENGTH
            ));
        }
    }

    Ok(Mrz {
        line1,
        line2,
        truncated_fields: truncated,
    })
}

fn digit_at(line: &str, idx: usize) -> Option<u8> {
    line.as_bytes()
        .get(idx)
        .filter(|b| b.is_ascii_digit())
        .map(|b| b - b'0')
}

/// Re-derives every check digit of a TD3 line 2 from its positions.
/// Returns the list of problems found.
pub fn verify_line2(line2: &str) -> Result<(), Vec<String>> {
    if line2.len() != MRZ_LINE_LENGTH {
        return Err(vec![format!(
            "line 2 must be {} characters, got {}",
            MRZ_LINE_LENGTH,
            line2.len()
        )]);
    }
    if !line2
        .chars()
        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == MRZ_FILLER)
    {
        return Err(vec!["line 2 contains characters outside A-Z0-9<".to_string()]);
    }

    // (label, field range, check digit position)
    const FIELDS: &[(&str, usize, usize, usize)] = &[
        ("passport_num", 0, 9, 9),
        ("dob", 13, 19, 19),
        ("expiry", 21, 27, 27),
        ("personal_num", 28, 42, 42),
    ];

    let mut problems = Vec::new();
    for (label, start, end, at) in FIELDS {
        let expected = check_digit(&line2[*start..*end]).map_err(|err| vec![err])?;
        if digit_at(line2, *at) != Some(expected) {
            problems.push(format!("{label} check digit mismatch (expected {expected})"));
        }
    }

    let composite = format!("{}{}{}", &line2[0..10], &line2[13..20], &line2[21..43]);
    let expected = check_digit(&composite).map_err(|err| vec![err])?;
    if digit_at(line2, 43) != Some(expected) {
        problems.push(format!("overall check digit mismatch (expected {expected})"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn silva() -> MrzInput {
        MrzInput {
            subtype: None,
            given_names: "JOAO CARLOS".to_string(),
            surname: "SILVA".to_string(),
            dob: date("1990-05-15"),
            sex: Sex::Male,
            issuer: "BRA".to_string(),
            expiry: date("2030-05-14"),
            passport_num: "FB123456".to_string(),
            personal_num: None,
            nationality: "BRA".to_string(),
        }
    }

    fn eriksson() -> MrzInput {
        MrzInput {
            subtype: None,
            given_names: "Anna Maria".to_string(),
            surname: "Eriksson".to_string(),
            dob: date("1974-08-12"),
            sex: Sex::Female,
            issuer: "UTO".to_string(),
            expiry: date("2012-04-15"),
            passport_num: "L898902C3".to_string(),
            personal_num: Some("ZE184226B".to_string()),
            nationality: "UTO".to_string(),
        }
    }

    #[test]
    fn silva_end_to_end() {
        let mrz = build_mrz(&silva()).unwrap();
        assert_eq!(
            mrz.line1,
            "P<BRASILVA<<JOAO<CARLOS<<<<<<<<<<<<<<<<<<<<<"
        );
        assert_eq!(mrz.line2, "FB123456<9BRA9005156M3005143<<<<<<<<<<<<<<08");
        assert!(mrz.truncated_fields.is_empty());
        verify_line2(&mrz.line2).unwrap();
    }

    #[test]
    fn icao_specimen_end_to_end() {
        let mrz = build_mrz(&eriksson()).unwrap();
        assert_eq!(
            mrz.line1,
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<"
        );
        assert_eq!(mrz.line2, "L898902C36UTO7408122F1204159ZE184226B<<<<<10");
    }

    #[test]
    fn subtype_is_upper_cased_and_defaults_to_filler() {
        let mut input = silva();
        input.subtype = Some('d');
        assert!(build_mrz(&input).unwrap().line1.starts_with("PDBRA"));
        input.subtype = Some('1');
        assert!(build_mrz(&input).unwrap().line1.starts_with("P<BRA"));
    }

    #[test]
    fn unspecified_sex_is_filler() {
        let mut input = silva();
        input.sex = Sex::Unspecified;
        let mrz = build_mrz(&input).unwrap();
        assert_eq!(&mrz.line2[20..21], "<");
    }

    #[test]
    fn long_name_is_truncated_and_reported() {
        let mut input = silva();
        input.given_names = "Maria Aparecida Conceicao Fernanda Luiza".to_string();
        let mrz = build_mrz(&input).unwrap();
        assert_eq!(mrz.line1.len(), 44);
        assert_eq!(mrz.truncated_fields, vec!["name".to_string()]);
    }

    #[test]
    fn overlong_numbers_do_not_shift_later_fields() {
        let mut input = silva();
        input.passport_num = "FB1234567890".to_string();
        input.personal_num = Some("123456789012345678".to_string());
        let mrz = build_mrz(&input).unwrap();
        assert_eq!(mrz.line2.len(), 44);
        assert_eq!(&mrz.line2[10..13], "BRA");
        assert_eq!(
            mrz.truncated_fields,
            vec!["passport_num".to_string(), "personal_num".to_string()]
        );
        verify_line2(&mrz.line2).unwrap();
    }

    #[test]
    fn personal_number_is_cleaned() {
        let mut input = silva();
        input.personal_num = Some("123.456-78".to_string());
        let mrz = build_mrz(&input).unwrap();
        assert_eq!(&mrz.line2[28..42], "123<456<78<<<<");
    }

    #[test]
    fn verify_line2_flags_a_flipped_digit() {
        let good = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";
        verify_line2(good).unwrap();
        let bad = "L898902C36UTO7408132F1204159ZE184226B<<<<<10";
        let problems = verify_line2(bad).unwrap_err();
        assert!(problems.iter().any(|p| p.starts_with("dob")));
        assert!(problems.iter().any(|p| p.starts_with("overall")));
    }

    #[test]
    fn verify_line2_rejects_wrong_length() {
        assert!(verify_line2("L898902C36UTO").is_err());
    }
}
