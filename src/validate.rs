//! Field validation rules
//!
//! Pure functions; the step controller applies them and pushes the outcome
//! onto the view as validity markers and inline messages.

use crate::format::{digits, normalize_decimal};
use crate::state::FieldKind;
use chrono::{Datelike, NaiveDate};

/// Inline message attached to any invalid field
pub const INVALID_FIELD_MESSAGE: &str = "Preencha este campo corretamente.";
/// Inline message for attachments that are not PDF files
pub const PDF_ONLY_MESSAGE: &str = "Só é permitido enviar arquivos PDF.";

/// Earliest accepted year for document issue dates
pub const MIN_ISSUE_YEAR: i32 = 1880;

fn all_same(d: &str) -> bool {
    let mut chars = d.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

/// Modulo-11 check digit over `digits` with weights starting at `first_weight`
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    match 11 - (sum % 11) {
        10 | 11 => 0,
        d => d,
    }
}

/// Two-pass modulo-11 CPF checksum
pub fn is_valid_cpf(value: &str) -> bool {
    let d = digits(value);
    if d.len() != 11 || all_same(&d) {
        return false;
    }
    let nums: Vec<u32> = d.chars().filter_map(|c| c.to_digit(10)).collect();

    check_digit(&nums[..9], 10) == nums[9] && check_digit(&nums[..10], 11) == nums[10]
}

/// Legacy 7-digit or modern 11-digit RG, not all digits identical
pub fn is_valid_rg(value: &str) -> bool {
    let d = digits(value);
    matches!(d.len(), 7 | 11) && !all_same(&d)
}

/// 10-digit landline or 11-digit mobile number
pub fn is_valid_phone(value: &str) -> bool {
    matches!(digits(value).len(), 10 | 11)
}

/// Displayed or plain amount that parses as a non-negative number
pub fn is_valid_income(value: &str) -> bool {
    normalize_decimal(value)
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= 0.0)
}

/// Parse a date as produced by date inputs (`YYYY-MM-DD`) or typed in pt-BR (`DD/MM/YYYY`)
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

/// Issue date between 1880 and `today`, inclusive
pub fn is_valid_issue_date(value: &str, today: NaiveDate) -> bool {
    parse_form_date(value).is_some_and(|date| date.year() >= MIN_ISSUE_YEAR && date <= today)
}

/// Minimal address shape: `local@domain.tld`
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Selected attachment is a PDF file
pub fn is_pdf_attachment(value: &str) -> bool {
    value.trim().to_ascii_lowercase().ends_with(".pdf")
}

/// Full rule for one field.
///
/// Disabled fields are always valid. Empty values fail only when required.
/// Filled values are checked by their kind's rule.
pub fn check_field(
    kind: FieldKind,
    value: &str,
    required: bool,
    enabled: bool,
    today: NaiveDate,
) -> bool {
    if !enabled {
        return true;
    }
    let value = value.trim();
    if value.is_empty() {
        return !required;
    }
    match kind {
        FieldKind::Cpf => is_valid_cpf(value),
        FieldKind::Rg => is_valid_rg(value),
        FieldKind::Phone => is_valid_phone(value),
        FieldKind::Currency => is_valid_income(value),
        FieldKind::Email => is_valid_email(value),
        FieldKind::Date => parse_form_date(value).is_some(),
        FieldKind::IssueDate => is_valid_issue_date(value, today),
        FieldKind::Attachment => is_pdf_attachment(value),
        FieldKind::Text | FieldKind::Select | FieldKind::Hidden => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    mod cpf {
        use super::*;

        #[test]
        fn test_known_valid() {
            assert!(is_valid_cpf("529.982.247-25"));
            assert!(is_valid_cpf("52998224725"));
        }

        #[test]
        fn test_repeated_digits_rejected() {
            assert!(!is_valid_cpf("111.111.111-11"));
            assert!(!is_valid_cpf("00000000000"));
        }

        #[test]
        fn test_wrong_check_digit_rejected() {
            assert!(!is_valid_cpf("123.456.789-00"));
            assert!(!is_valid_cpf("529.982.247-24"));
        }

        #[test]
        fn test_wrong_length_rejected() {
            assert!(!is_valid_cpf("5299822472"));
            assert!(!is_valid_cpf("529982247250"));
            assert!(!is_valid_cpf(""));
        }

        #[test]
        fn test_check_digit_ten_maps_to_zero() {
            // 123456789 has a first-pass remainder of 1, so d1 = 10 -> 0
            assert!(is_valid_cpf("12345678909"));
        }

        #[test]
        fn test_exactly_one_suffix_accepted_per_prefix() {
            for seed in (0u32..1_000_000_000).step_by(7_919_021) {
                let prefix = format!("{seed:09}");
                if all_same(&prefix) {
                    continue;
                }
                let accepted = (0..100)
                    .filter(|s| is_valid_cpf(&format!("{prefix}{s:02}")))
                    .count();
                assert_eq!(accepted, 1, "prefix {prefix}");
            }
        }
    }

    mod rg {
        use super::*;

        #[test]
        fn test_legacy_and_modern_lengths() {
            assert!(is_valid_rg("1234567"));
            assert!(is_valid_rg("1.234.567"));
            assert!(is_valid_rg("123.456.789-01"));
        }

        #[test]
        fn test_other_lengths_rejected() {
            assert!(!is_valid_rg("11111111"));
            assert!(!is_valid_rg("12345678"));
            assert!(!is_valid_rg("123456"));
        }

        #[test]
        fn test_repeated_digits_rejected() {
            assert!(!is_valid_rg("7777777"));
            assert!(!is_valid_rg("33333333333"));
        }
    }

    mod phone {
        use super::*;

        #[test]
        fn test_lengths() {
            assert!(is_valid_phone("11987654321"));
            assert!(is_valid_phone("(11) 3333-4444"));
            assert!(!is_valid_phone("119876543"));
            assert!(!is_valid_phone("119876543210"));
        }
    }

    mod income {
        use super::*;

        #[test]
        fn test_accepts_display_and_plain_forms() {
            assert!(is_valid_income("R$ 1.500,00"));
            assert!(is_valid_income("1500.00"));
            assert!(is_valid_income("0,00"));
        }

        #[test]
        fn test_accepts_dot_grouped_thousands() {
            assert!(is_valid_income("1.234.567"));
        }

        #[test]
        fn test_rejects_non_numbers() {
            assert!(!is_valid_income(""));
            assert!(!is_valid_income("abc"));
            assert!(!is_valid_income("1,2,3"));
        }
    }

    mod dates {
        use super::*;

        #[test]
        fn test_parses_both_formats() {
            let expected = NaiveDate::from_ymd_opt(2010, 3, 9);
            assert_eq!(parse_form_date("2010-03-09"), expected);
            assert_eq!(parse_form_date("09/03/2010"), expected);
            assert!(parse_form_date("2010-13-01").is_none());
        }

        #[test]
        fn test_issue_date_bounds() {
            assert!(is_valid_issue_date("1880-01-01", today()));
            assert!(is_valid_issue_date("2024-06-15", today()));
            assert!(!is_valid_issue_date("1879-12-31", today()));
            assert!(!is_valid_issue_date("2024-06-16", today()));
            assert!(!is_valid_issue_date("ontem", today()));
        }
    }

    mod email {
        use super::*;

        #[test]
        fn test_shapes() {
            assert!(is_valid_email("maria@example.com"));
            assert!(!is_valid_email("maria@"));
            assert!(!is_valid_email("@example.com"));
            assert!(!is_valid_email("maria@example"));
            assert!(!is_valid_email("maria@@example.com"));
        }
    }

    mod check {
        use super::*;

        #[test]
        fn test_disabled_is_always_valid() {
            assert!(check_field(FieldKind::Text, "", true, false, today()));
            assert!(check_field(FieldKind::Cpf, "123", true, false, today()));
        }

        #[test]
        fn test_required_empty_fails() {
            assert!(!check_field(FieldKind::Text, "   ", true, true, today()));
            assert!(!check_field(FieldKind::Select, "", true, true, today()));
        }

        #[test]
        fn test_optional_empty_passes() {
            assert!(check_field(FieldKind::Rg, "", false, true, today()));
            assert!(check_field(FieldKind::Email, "", false, true, today()));
        }

        #[test]
        fn test_optional_filled_uses_kind_rule() {
            assert!(!check_field(FieldKind::Rg, "123", false, true, today()));
            assert!(check_field(FieldKind::Rg, "1234567", false, true, today()));
        }

        #[test]
        fn test_attachment_must_be_pdf() {
            let attachment =
                |value| check_field(FieldKind::Attachment, value, true, true, today());
            assert!(attachment("laudo.PDF"));
            assert!(!attachment("laudo.png"));
        }
    }
}
