use crate::reference::{
    BR_ACCOUNT_WIDTH, BR_BANK_CODE_WIDTH, BR_BBAN_LENGTH, BR_BRANCH_WIDTH,
};
use crate::util::{random_padded_number, random_upper_letter};
use rand::Rng;

/// Field values of a Brazilian BBAN. Numeric fields are held already
/// zero-padded to their fixed widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbanFields {
    pub bank_code: String,
    pub branch: String,
    pub account: String,
    pub account_type: char,
    pub owner_type: u8,
}

impl BbanFields {
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(BR_BBAN_LENGTH);
        out.push_str(&self.bank_code);
        out.push_str(&self.branch);
        out.push_str(&self.account);
        out.push(self.account_type);
        out.push(char::from(b'0' + self.owner_type));
        out
    }

    pub fn validate(&self) -> Result<(), String> {
        check_numeric("bank_code", &self.bank_code, BR_BANK_CODE_WIDTH)?;
        check_numeric("branch", &self.branch, BR_BRANCH_WIDTH)?;
        check_numeric("account", &self.account, BR_ACCOUNT_WIDTH)?;
        if !self.account_type.is_ascii_uppercase() {
            return Err("account_type must be a letter A-Z".to_string());
        }
        if self.owner_type > 9 {
            return Err("owner_type must be a digit 0-9".to_string());
        }
        Ok(())
    }
}

fn check_numeric(name: &str, value: &str, width: usize) -> Result<(), String> {
    if value.len() != width || !value.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(format!("{name} must be exactly {width} digits"));
    }
    Ok(())
}

pub fn build_bban_fields<R: Rng + ?Sized>(rng: &mut R) -> BbanFields {
    BbanFields {
        bank_code: random_padded_number(rng, 99_999_999, BR_BANK_CODE_WIDTH),
        branch: random_padded_number(rng, 99_999, BR_BRANCH_WIDTH),
        account: random_padded_number(rng, 9_999_999_999, BR_ACCOUNT_WIDTH),
        account_type: random_upper_letter(rng),
        owner_type: rng.gen_range(0..=9),
    }
}

pub fn build_bban<R: Rng + ?Sized>(rng: &mut R) -> String {
    let fields = build_bban_fields(rng);
    log::debug!(
        "BBAN draw: bank={} branch={} account={} type={} owner={}",
        fields.bank_code,
        fields.branch,
        fields.account,
        fields.account_type,
        fields.owner_type
    );
    fields.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rendered_bban_has_fixed_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..1_000 {
            let fields = build_bban_fields(&mut rng);
            fields.validate().unwrap();
            let bban = fields.render();
            assert_eq!(bban.len(), BR_BBAN_LENGTH);
            assert!(bban[..23].chars().all(|ch| ch.is_ascii_digit()));
            assert!(bban[23..24].chars().all(|ch| ch.is_ascii_uppercase()));
            assert!(bban[24..].chars().all(|ch| ch.is_ascii_digit()));
        }
    }

    #[test]
    fn render_keeps_leading_zeros() {
        let fields = BbanFields {
            bank_code: "00360305".to_string(),
            branch: "00001".to_string(),
            account: "0009795493".to_string(),
            account_type: 'C',
            owner_type: 1,
        };
        fields.validate().unwrap();
        assert_eq!(fields.render(), "00360305000010009795493C1");
    }

    #[test]
    fn validate_rejects_short_or_signed_fields() {
        let mut fields = BbanFields {
            bank_code: "360305".to_string(),
            branch: "00001".to_string(),
            account: "0009795493".to_string(),
            account_type: 'C',
            owner_type: 1,
        };
        assert!(fields.validate().is_err());
        fields.bank_code = "-0360305".to_string();
        assert!(fields.validate().is_err());
        fields.bank_code = "00360305".to_string();
        fields.account_type = 'c';
        assert!(fields.validate().is_err());
    }

    #[test]
    fn draws_are_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let first = build_bban(&mut rng);
        let second = build_bban(&mut rng);
        assert_ne!(first, second);
    }
}
