use crate::bban::build_bban;
use crate::mod97::{iban_check_digits, verify_iban};
use crate::reference::{iban_length, MAX_BATCH_COUNT};
use rand::Rng;

/// Countries with a modelled BBAN structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IbanCountry {
    Brazil,
}

impl IbanCountry {
    pub fn from_code(code: &str) -> Result<Self, String> {
        match code.trim().to_uppercase().as_str() {
            "BR" => Ok(IbanCountry::Brazil),
            other => Err(format!("unsupported IBAN country: {other}")),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            IbanCountry::Brazil => "BR",
        }
    }

    fn build_bban<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            IbanCountry::Brazil => build_bban(rng),
        }
    }
}

/// Assembles `country + check digits + bban`.
///
/// Check digits are derived from the BBAN, so the assembled value must verify.
/// A value that does not is a broken checksum engine and is reported as an
/// error rather than retried.
pub fn assemble_iban(country: IbanCountry, bban: &str) -> Result<String, String> {
    let code = country.code();
    let check = iban_check_digits(code, bban)?;
    let iban = format!("{}{}{}", code, check, bban);

    if let Some(expected) = iban_length(code) {
        if iban.len() != expected {
            return Err(format!(
                "assembled IBAN has length {} (expected {})",
                iban.len(),
                expected
            ));
        }
    }
    if !verify_iban(&iban) {
        return Err(format!("checksum invariant violated for {iban}"));
    }
    Ok(iban)
}

pub fn generate_iban<R: Rng + ?Sized>(rng: &mut R, country: IbanCountry) -> Result<String, String> {
    let bban = country.build_bban(rng);
    let iban = assemble_iban(country, &bban)?;
    log::debug!("generated IBAN {}", iban);
    Ok(iban)
}

pub fn generate_ibans_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    country: IbanCountry,
) -> Result<Vec<String>, String> {
    if !(1..=MAX_BATCH_COUNT).contains(&count) {
        return Err(format!("count must be 1..{}", MAX_BATCH_COUNT));
    }
    let mut ibans = Vec::with_capacity(count);
    for _ in 0..count {
        ibans.push(generate_iban(rng, country)?);
    }
    Ok(ibans)
}

pub fn generate_ibans(count: usize, country: IbanCountry) -> Result<Vec<String>, String> {
    let mut rng = rand::thread_rng();
    generate_ibans_with(&mut rng, count, country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn country_codes_parse_case_insensitively() {
        assert_eq!(IbanCountry::from_code("br").unwrap(), IbanCountry::Brazil);
        assert_eq!(IbanCountry::from_code(" BR ").unwrap().code(), "BR");
        assert!(IbanCountry::from_code("DE").is_err());
    }

    #[test]
    fn generated_ibans_are_29_chars_and_verify() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ibans = generate_ibans_with(&mut rng, 100, IbanCountry::Brazil).unwrap();
        assert_eq!(ibans.len(), 100);
        for iban in &ibans {
            assert_eq!(iban.len(), 29);
            assert!(iban.starts_with("BR"));
            assert!(verify_iban(iban), "{iban} failed verification");
        }
    }

    #[test]
    fn count_outside_range_is_rejected() {
        assert!(generate_ibans(0, IbanCountry::Brazil).is_err());
        assert!(generate_ibans(101, IbanCountry::Brazil).is_err());
        assert_eq!(generate_ibans(1, IbanCountry::Brazil).unwrap().len(), 1);
    }

    #[test]
    fn assemble_rejects_bban_of_wrong_length() {
        assert!(assemble_iban(IbanCountry::Brazil, "1234").is_err());
    }

    #[test]
    fn assemble_matches_published_example() {
        assert_eq!(
            assemble_iban(IbanCountry::Brazil, "00360305000010009795493C1").unwrap(),
            "BR1800360305000010009795493C1"
        );
    }
}
