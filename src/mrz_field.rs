use crate::reference::{MRZ_FILLER, MRZ_NAME_WIDTH};

/// A fixed-width MRZ field. `truncated` is set when the cleaned input was
/// longer than the slot and characters were dropped from the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedField {
    pub value: String,
    pub truncated: bool,
    pub original_len: usize,
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' => 'Y',
        other => other,
    }
}

/// Upper-cases `text` and maps every character outside `A-Z0-9<` (spaces
/// included) to the filler.
pub fn clean(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_uppercase)
        .map(fold_diacritic)
        .map(|ch| {
            if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
                ch
            } else {
                MRZ_FILLER
            }
        })
        .collect()
}

/// Right-pads with `<` to exactly `width`, truncating longer input.
pub fn pad_field(text: &str, width: usize) -> PaddedField {
    let original_len = text.chars().count();
    let mut value: String = text.chars().take(width).collect();
    for _ in original_len..width {
        value.push(MRZ_FILLER);
    }
    PaddedField {
        value,
        truncated: original_len > width,
        original_len,
    }
}

/// `SURNAME<<GIVEN<NAMES`, padded or cut to the 39-character name slot.
pub fn name_field(surname: &str, given_names: &str) -> PaddedField {
    let combined = format!("{}<<{}", clean(surname), clean(given_names));
    pad_field(&combined, MRZ_NAME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_uppercases_and_fills_spaces() {
        assert_eq!(clean("Joao Carlos"), "JOAO<CARLOS");
        assert_eq!(clean("o'neil-smith"), "O<NEIL<SMITH");
        assert_eq!(clean("  silva "), "SILVA");
    }

    #[test]
    fn clean_folds_common_diacritics() {
        assert_eq!(clean("João Conceição"), "JOAO<CONCEICAO");
        assert_eq!(clean("Müller"), "MULLER");
    }

    #[test]
    fn clean_replaces_unknown_scripts_one_for_one() {
        assert_eq!(clean("李"), "<");
    }

    #[test]
    fn pad_field_pads_short_input() {
        let field = pad_field("FB123456", 9);
        assert_eq!(field.value, "FB123456<");
        assert!(!field.truncated);
    }

    #[test]
    fn pad_field_truncates_and_flags() {
        let field = pad_field("ABCDEFGHIJK", 9);
        assert_eq!(field.value, "ABCDEFGHI");
        assert!(field.truncated);
        assert_eq!(field.original_len, 11);
    }

    #[test]
    fn exact_width_is_not_truncated() {
        let field = pad_field("ABCDEFGHI", 9);
        assert_eq!(field.value, "ABCDEFGHI");
        assert!(!field.truncated);
    }

    #[test]
    fn name_field_layout() {
        let field = name_field("Silva", "Joao Carlos");
        assert!(field.value.starts_with("SILVA<<JOAO<CARLOS<"));
        assert_eq!(field.value.len(), 39);
        assert!(!field.truncated);
    }

    #[test]
    fn long_names_are_cut_to_39() {
        let field = name_field(
            "Wolfeschlegelsteinhausenbergerdorff",
            "Hubert Blaine Adolph Charles",
        );
        assert_eq!(field.value.len(), 39);
        assert!(field.truncated);
        assert!(field.value.starts_with("WOLFESCHLEGELSTEINHAUSENBERGERDORFF<<HU"));
    }
}
