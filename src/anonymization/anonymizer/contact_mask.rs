//! Contact masking

const MASK_PREFIX: &str = "XXX-XXX-";
const FULL_MASK: &str = "XXX-XXX-XXXX";

/// Mask a contact, keeping only its last four characters
///
/// Works on `char`s rather than bytes, so multi-byte input never splits a
/// code point. Contacts shorter than four characters (including the empty
/// string) are masked entirely.
pub fn anonymize_contact(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() < 4 {
        return FULL_MASK.to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{MASK_PREFIX}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_contacts_fully_masked() {
        assert_eq!(anonymize_contact(""), "XXX-XXX-XXXX");
        assert_eq!(anonymize_contact("12"), "XXX-XXX-XXXX");
        assert_eq!(anonymize_contact("123"), "XXX-XXX-XXXX");
    }

    #[test]
    fn test_keeps_last_four() {
        assert_eq!(anonymize_contact("1234"), "XXX-XXX-1234");
        assert_eq!(anonymize_contact("555-123-4567"), "XXX-XXX-4567");
        assert_eq!(anonymize_contact("jane@example.org"), "XXX-XXX-.org");
    }

    #[test]
    fn test_multibyte_tail() {
        assert_eq!(anonymize_contact("tél: 0612 34 56 78 ✆ éèàü"), "XXX-XXX-éèàü");
        assert_eq!(anonymize_contact("电话号码"), "XXX-XXX-电话号码");
    }
}
