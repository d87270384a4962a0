/// Numeral value of one of the 22 Hebrew letters. Final forms, points and
/// punctuation have no value.
pub fn hebrew_letter_value(c: char) -> Option<u32> {
    let value = match c {
        'א' => 1,
        'ב' => 2,
        'ג' => 3,
        'ד' => 4,
        'ה' => 5,
        'ו' => 6,
        'ז' => 7,
        'ח' => 8,
        'ט' => 9,
        'י' => 10,
        'כ' => 20,
        'ל' => 30,
        'מ' => 40,
        'נ' => 50,
        'ס' => 60,
        'ע' => 70,
        'פ' => 80,
        'צ' => 90,
        'ק' => 100,
        'ר' => 200,
        'ש' => 300,
        'ת' => 400,
        _ => return None,
    };
    Some(value)
}

/// Decode a Hebrew chapter label by summing letter values.
///
/// Geresh, gershayim and anything else outside the alphabet are ignored.
/// Decoding is purely additive (`טו` and `יה` both give 15). Returns 0 for
/// empty or letterless input, which callers treat as an invalid chapter.
pub fn decode_hebrew_numeral(label: &str) -> u32 {
    label.chars().filter_map(hebrew_letter_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_labels() {
        assert_eq!(decode_hebrew_numeral("א"), 1);
        assert_eq!(decode_hebrew_numeral("יא"), 11);
        assert_eq!(decode_hebrew_numeral("נ"), 50);
        assert_eq!(decode_hebrew_numeral("קנ"), 150);
    }

    #[test]
    fn ignores_geresh_and_gershayim() {
        assert_eq!(decode_hebrew_numeral("י״ב"), 12);
        assert_eq!(decode_hebrew_numeral("ה׳"), 5);
        assert_eq!(decode_hebrew_numeral("\"כא\""), 21);
    }

    #[test]
    fn additive_without_exceptions() {
        assert_eq!(decode_hebrew_numeral("טו"), 15);
        assert_eq!(decode_hebrew_numeral("יה"), 15);
    }

    #[test]
    fn invalid_input_is_zero() {
        assert_eq!(decode_hebrew_numeral(""), 0);
        assert_eq!(decode_hebrew_numeral("12"), 0);
        assert_eq!(decode_hebrew_numeral("ךםן"), 0);
    }
}
