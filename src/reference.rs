pub const IBAN_LENGTHS: &[(&str, usize)] = &[("BR", 29)];

/// Brazilian BBAN layout: bank (ISPB) 8, branch 5, account 10, account type 1, owner type 1.
pub const BR_BANK_CODE_WIDTH: usize = 8;
pub const BR_BRANCH_WIDTH: usize = 5;
pub const BR_ACCOUNT_WIDTH: usize = 10;
pub const BR_BBAN_LENGTH: usize = BR_BANK_CODE_WIDTH + BR_BRANCH_WIDTH + BR_ACCOUNT_WIDTH + 2;

pub const MAX_BATCH_COUNT: usize = 100;

// TD3 layout
pub const MRZ_LINE_LENGTH: usize = 44;
pub const MRZ_NAME_WIDTH: usize = 39;
pub const MRZ_PASSPORT_NUM_WIDTH: usize = 9;
pub const MRZ_PERSONAL_NUM_WIDTH: usize = 14;
pub const MRZ_COUNTRY_WIDTH: usize = 3;
pub const MRZ_FILLER: char = '<';
pub const MRZ_DOCUMENT_TYPE: char = 'P';

pub const ICAO_WEIGHTS: [u32; 3] = [7, 3, 1];

/// Output formats accepted by `passport-dates`.
pub const PASSPORT_DATE_FORMATS: &[(&str, &str)] = &[
    ("Y-m-d", "%Y-%m-%d"),
    ("d/m/Y", "%d/%m/%Y"),
    ("d-m-Y", "%d-%m-%Y"),
    ("m/d/Y", "%m/%d/%Y"),
];

pub fn iban_length(country: &str) -> Option<usize> {
    IBAN_LENGTHS
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, len)| *len)
}

pub fn passport_validity_years(country: &str) -> Option<u32> {
    match country {
        "US" | "BR" => Some(10),
        _ => None,
    }
}

pub fn passport_date_pattern(tag: &str) -> Option<&'static str> {
    PASSPORT_DATE_FORMATS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, pattern)| *pattern)
}
