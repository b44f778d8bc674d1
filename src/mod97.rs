//! ISO/IEC 7064 MOD 97-10 as used by ISO 13616 IBANs.
//!
//! Generation goes through [`iban_check_digits`]; validation goes through
//! [`verify_iban`], which folds the rearranged IBAN on its own and shares no
//! helper with the generation path.

/// Expands letters to their two-digit values (`A` = 10 .. `Z` = 35), keeping
/// digits in place and in order.
pub fn letters_to_digits(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
        } else if ch.is_ascii_alphabetic() {
            let val = ch.to_ascii_uppercase() as u32 - 55;
            out.push_str(&val.to_string());
        } else {
            return Err(format!("IBAN contains invalid character {:?}", ch));
        }
    }
    Ok(out)
}

/// Remainder of an arbitrarily long decimal string modulo 97.
pub fn mod97(numeric: &str) -> Result<u32, String> {
    let mut remainder: u32 = 0;
    for digit in numeric.chars() {
        let d = digit
            .to_digit(10)
            .ok_or_else(|| format!("invalid digit {:?}", digit))?;
        remainder = (remainder * 10 + d) % 97;
    }
    Ok(remainder)
}

pub fn iban_check_digits(country: &str, bban: &str) -> Result<String, String> {
    if country.len() != 2 || !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err("IBAN country code must be 2 letters".to_string());
    }
    if bban.is_empty() {
        return Err("BBAN must not be empty".to_string());
    }
    let numeric = format!(
        "{}{}00",
        letters_to_digits(bban)?,
        letters_to_digits(country)?
    );
    let remainder = mod97(&numeric)?;
    Ok(format!("{:02}", 98 - remainder))
}

/// True when `iban` is structurally an IBAN (2 letters, 2 digits, alphanumeric
/// BBAN) and its rearranged numeric form is congruent to 1 modulo 97.
pub fn verify_iban(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    if bytes.len() < 5 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
        return false;
    }
    if !bytes[..2].iter().all(|b| b.is_ascii_alphabetic())
        || !bytes[2..4].iter().all(|b| b.is_ascii_digit())
    {
        return false;
    }

    let rearranged = bytes[4..].iter().chain(bytes[..4].iter());
    let mut acc: u64 = 0;
    for &b in rearranged {
        if b.is_ascii_digit() {
            acc = (acc * 10 + u64::from(b - b'0')) % 97;
        } else {
            let val = u64::from(b.to_ascii_uppercase() - b'A') + 10;
            acc = (acc * 100 + val) % 97;
        }
    }
    acc == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_with_offset_55() {
        assert_eq!(letters_to_digits("BR").unwrap(), "1127");
        assert_eq!(letters_to_digits("A0Z9").unwrap(), "100359");
    }

    #[test]
    fn non_alphanumeric_is_rejected_not_zeroed() {
        assert!(letters_to_digits("12-34").is_err());
        assert!(iban_check_digits("BR", "0000 0000").is_err());
        assert!(iban_check_digits("B1", "00000000").is_err());
    }

    #[test]
    fn mod97_handles_numbers_wider_than_u128() {
        let numeric = "9".repeat(60);
        let expected = (0..60).fold(0u32, |acc, _| (acc * 10 + 9) % 97);
        assert_eq!(mod97(&numeric).unwrap(), expected);
    }

    #[test]
    fn zero_bban_has_known_check_digits() {
        let bban = format!("{}A0", "0".repeat(23));
        assert_eq!(iban_check_digits("BR", &bban).unwrap(), "31");
        assert!(verify_iban(&format!("BR31{bban}")));
    }

    #[test]
    fn published_brazilian_iban_verifies() {
        assert!(verify_iban("BR1800360305000010009795493C1"));
        assert_eq!(
            iban_check_digits("BR", "00360305000010009795493C1").unwrap(),
            "18"
        );
    }

    #[test]
    fn check_digits_are_always_two_wide() {
        for bban in ["0", "1", "96", "12345678901234567890", "ZZZZ"] {
            let check = iban_check_digits("BR", bban).unwrap();
            assert_eq!(check.len(), 2);
            assert!(verify_iban(&format!("BR{check}{bban}")));
        }
    }

    #[test]
    fn verify_rejects_malformed_shapes() {
        assert!(!verify_iban(""));
        assert!(!verify_iban("BR18"));
        assert!(!verify_iban("BR1X00360305000010009795493C1"));
        assert!(!verify_iban("1R1800360305000010009795493C1"));
        assert!(!verify_iban("BR18 0036 0305 0000 1000 9795 493C 1"));
    }

    #[test]
    fn verify_rejects_swapped_check_digits() {
        assert!(!verify_iban("BR8100360305000010009795493C1"));
    }
}
