//! ICAO Doc 9303 check digits: character values weighted 7, 3, 1 cyclically,
//! summed modulo 10.

use crate::reference::{ICAO_WEIGHTS, MRZ_FILLER};

pub fn char_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => ch.to_digit(10),
        'A'..='Z' => Some(ch as u32 - 'A' as u32 + 10),
        MRZ_FILLER => Some(0),
        _ => None,
    }
}

pub fn check_digit(field: &str) -> Result<u8, String> {
    let mut sum: u32 = 0;
    for (idx, ch) in field.chars().enumerate() {
        let value = char_value(ch)
            .ok_or_else(|| format!("character {:?} is not allowed in an MRZ field", ch))?;
        sum += value * ICAO_WEIGHTS[idx % ICAO_WEIGHTS.len()];
    }
    Ok((sum % 10) as u8)
}

/// Field followed by its own check digit, as laid out on line 2.
pub fn with_check_digit(field: &str) -> Result<String, String> {
    let digit = check_digit(field)?;
    Ok(format!("{}{}", field, digit))
}

/// Overall digit over passport number, birth date, expiry and personal number,
/// each already carrying its own check digit.
pub fn composite_check_digit(
    passport_num: &str,
    dob: &str,
    expiry: &str,
    personal_num: &str,
) -> Result<u8, String> {
    let composite = format!(
        "{}{}{}{}",
        with_check_digit(passport_num)?,
        with_check_digit(dob)?,
        with_check_digit(expiry)?,
        with_check_digit(personal_num)?
    );
    check_digit(&composite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_date_field() {
        assert_eq!(check_digit("520727").unwrap(), 3);
    }

    #[test]
    fn specimen_fields() {
        assert_eq!(check_digit("L898902C3").unwrap(), 6);
        assert_eq!(check_digit("740812").unwrap(), 2);
        assert_eq!(check_digit("120415").unwrap(), 9);
        assert_eq!(check_digit("ZE184226B<<<<<").unwrap(), 1);
    }

    #[test]
    fn specimen_composite_digit() {
        let digit =
            composite_check_digit("L898902C3", "740812", "120415", "ZE184226B<<<<<").unwrap();
        assert_eq!(digit, 0);
    }

    #[test]
    fn filler_only_field_is_zero() {
        assert_eq!(check_digit("<<<<<<<<<<<<<<").unwrap(), 0);
        assert_eq!(check_digit("").unwrap(), 0);
    }

    #[test]
    fn letters_map_from_ten() {
        assert_eq!(char_value('A'), Some(10));
        assert_eq!(char_value('Z'), Some(35));
        assert_eq!(char_value('<'), Some(0));
        assert_eq!(char_value('a'), None);
    }

    #[test]
    fn characters_outside_alphabet_are_errors() {
        assert!(check_digit("AB-12").is_err());
        assert!(check_digit("ab12").is_err());
    }
}
