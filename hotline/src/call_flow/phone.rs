use roster_types::digits_only;

/// Normalize an administrator-entered number to E.164.
///
/// Accepts 10 digits (area code + number) or 11 digits with a leading
/// country code 1. Anything else is rejected.
pub fn normalize_override(entered: &str) -> Option<String> {
    let cleaned = digits_only(entered);
    match cleaned.len() {
        10 => Some(format!("+1{cleaned}")),
        11 if cleaned.starts_with('1') => Some(format!("+{cleaned}")),
        _ => None,
    }
}

/// "2025551234" -> "2 0 2 5 5 5 1 2 3 4", so text-to-speech reads single digits.
pub fn spell_out(digits: &str) -> String {
    digits
        .chars()
        .filter(|c| c.is_ascii_digit())
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_digits_get_country_code() {
        assert_eq!(
            normalize_override("2025551234").as_deref(),
            Some("+12025551234")
        );
    }

    #[test]
    fn test_eleven_digits_with_leading_one() {
        assert_eq!(
            normalize_override("12025551234").as_deref(),
            Some("+12025551234")
        );
        assert_eq!(normalize_override("22025551234"), None);
    }

    #[test]
    fn test_rejects_short_numbers() {
        assert_eq!(normalize_override("555-1234"), None);
        assert_eq!(normalize_override("202555123"), None);
        assert_eq!(normalize_override(""), None);
    }

    #[test]
    fn test_ignores_non_digit_characters() {
        assert_eq!(
            normalize_override("(202) 555-1234#").as_deref(),
            Some("+12025551234")
        );
    }

    #[test]
    fn test_spell_out() {
        assert_eq!(spell_out("2025551234"), "2 0 2 5 5 5 1 2 3 4");
    }
}
