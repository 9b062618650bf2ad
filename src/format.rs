//! Input masks for CPF, RG, phone and currency fields
//!
//! Every formatter is idempotent: feeding an already formatted value back in
//! returns it unchanged.

use crate::state::FieldKind;

const CPF_MASK: &str = "###.###.###-##";
const RG_OLD_MASK: &str = "#.###.###";
const RG_NEW_MASK: &str = "###.###.###-##";
const PHONE_10_MASK: &str = "(##) ####-####";
const PHONE_11_MASK: &str = "(##) #####-####";

/// Keep only ASCII digits
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Apply a `#`-placeholder mask to a digit string.
///
/// Literals are emitted only while digits remain, so partial input gets a
/// partial mask (`1234` under `###.###` becomes `123.4`).
fn apply_mask(digits: &str, mask: &str) -> String {
    let mut out = String::with_capacity(mask.len());
    let mut remaining = digits.chars().peekable();

    for slot in mask.chars() {
        if remaining.peek().is_none() {
            break;
        }
        if slot == '#' {
            if let Some(d) = remaining.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }
    out
}

fn truncated_digits(raw: &str, max: usize) -> String {
    digits(raw).chars().take(max).collect()
}

/// `52998224725` → `529.982.247-25`, masked progressively while typing
pub fn format_cpf(raw: &str) -> String {
    apply_mask(&truncated_digits(raw, 11), CPF_MASK)
}

/// Old 7-digit RG as `#.###.###`, modern 11-digit RG as `###.###.###-##`
pub fn format_rg(raw: &str) -> String {
    let d = truncated_digits(raw, 11);
    match d.len() {
        4..=7 => apply_mask(&d, RG_OLD_MASK),
        9..=11 => apply_mask(&d, RG_NEW_MASK),
        _ => d,
    }
}

/// Landline `(##) ####-####` or mobile `(##) #####-####`; bare digits otherwise
pub fn format_phone(raw: &str) -> String {
    let d = digits(raw);
    match d.len() {
        10 => apply_mask(&d, PHONE_10_MASK),
        11 => apply_mask(&d, PHONE_11_MASK),
        _ => d,
    }
}

/// Split a cents digit stream into integer and fraction parts
fn split_cents(cents: &str) -> (String, String) {
    let padded = format!("{cents:0>3}");
    let (int_part, frac_part) = padded.split_at(padded.len() - 2);
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    (int_part.to_string(), frac_part.to_string())
}

/// Group an integer digit string by thousands with `.`
fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Render a cents digit stream as BRL: `150000` → `R$ 1.500,00`
pub fn format_currency(raw: &str) -> String {
    let cents = digits(raw);
    if cents.is_empty() {
        return String::new();
    }
    let (int_part, frac_part) = split_cents(&cents);
    format!("R$ {},{}", group_thousands(&int_part), frac_part)
}

/// Reverse the currency mask for editing: `R$ 1.500,00` → `1500.00`
pub fn unformat_currency(raw: &str) -> String {
    let cents = digits(raw);
    if cents.is_empty() {
        return String::new();
    }
    let (int_part, frac_part) = split_cents(&cents);
    format!("{int_part}.{frac_part}")
}

/// Normalize a displayed amount into a plain decimal for submission.
///
/// With a decimal comma, periods are thousands separators (`1.500,00` →
/// `1500.00`). Without one, a single period is the decimal point and
/// several periods are all thousands separators (`1.234.567` → `1234567`).
pub fn normalize_decimal(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if kept.contains(',') {
        kept.replace('.', "").replace(',', ".")
    } else if kept.matches('.').count() > 1 {
        kept.replace('.', "")
    } else {
        kept
    }
}

/// Cents digit stream of a plain decimal (`1500.5` → `150050`)
pub fn decimal_to_cents(decimal: &str) -> Option<String> {
    let (int_part, frac_part) = match decimal.split_once('.') {
        Some((i, f)) => (i, f),
        None => (decimal, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut digits = int_part.chars().chain(frac_part.chars());
    if !digits.all(|c| c.is_ascii_digit()) {
        return None;
    }
    let frac: String = format!("{frac_part:0<2}").chars().take(2).collect();
    Some(format!("{int_part}{frac}"))
}

/// Mask a raw value for a field kind; `None` when the kind has no mask
pub fn format_for(kind: FieldKind, raw: &str) -> Option<String> {
    match kind {
        FieldKind::Cpf => Some(format_cpf(raw)),
        FieldKind::Rg => Some(format_rg(raw)),
        FieldKind::Phone => Some(format_phone(raw)),
        FieldKind::Currency => Some(format_currency(raw)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod cpf {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_full_mask() {
            assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        }

        #[test]
        fn test_progressive_mask() {
            assert_eq!(format_cpf("529"), "529");
            assert_eq!(format_cpf("5299"), "529.9");
            assert_eq!(format_cpf("5299822"), "529.982.2");
            assert_eq!(format_cpf("5299822472"), "529.982.247-2");
        }

        #[test]
        fn test_drops_digits_past_eleven() {
            assert_eq!(format_cpf("529982247251"), "529.982.247-25");
        }

        #[test]
        fn test_idempotent() {
            let once = format_cpf("52998224725");
            assert_eq!(format_cpf(&once), once);
        }
    }

    mod rg {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_short_input_unmasked() {
            assert_eq!(format_rg("12"), "12");
            assert_eq!(format_rg("123"), "123");
        }

        #[test]
        fn test_old_format() {
            assert_eq!(format_rg("1234"), "1.234");
            assert_eq!(format_rg("1234567"), "1.234.567");
        }

        #[test]
        fn test_eight_digits_unmasked() {
            assert_eq!(format_rg("12345678"), "12345678");
        }

        #[test]
        fn test_new_format() {
            assert_eq!(format_rg("123456789"), "123.456.789");
            assert_eq!(format_rg("12345678901"), "123.456.789-01");
        }

        #[test]
        fn test_idempotent() {
            for raw in ["1234567", "12345678901", "12"] {
                let once = format_rg(raw);
                assert_eq!(format_rg(&once), once);
            }
        }
    }

    mod phone {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_mobile() {
            assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        }

        #[test]
        fn test_landline() {
            assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        }

        #[test]
        fn test_in_progress_stays_bare() {
            assert_eq!(format_phone("(11) 9876"), "119876");
        }

        #[test]
        fn test_idempotent() {
            let once = format_phone("11987654321");
            assert_eq!(format_phone(&once), once);
        }
    }

    mod currency {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_formats_cents() {
            assert_eq!(format_currency("150"), "R$ 1,50");
            assert_eq!(format_currency("150000"), "R$ 1.500,00");
            assert_eq!(format_currency("123456789"), "R$ 1.234.567,89");
        }

        #[test]
        fn test_pads_small_amounts() {
            assert_eq!(format_currency("5"), "R$ 0,05");
            assert_eq!(format_currency("50"), "R$ 0,50");
        }

        #[test]
        fn test_empty_stays_empty() {
            assert_eq!(format_currency(""), "");
            assert_eq!(format_currency("R$ "), "");
        }

        #[test]
        fn test_round_trip_through_focus() {
            let shown = format_currency("150");
            assert_eq!(unformat_currency(&shown), "1.50");
        }

        #[test]
        fn test_focus_then_blur_restores_mask() {
            let shown = format_currency("150000");
            let editing = unformat_currency(&shown);
            assert_eq!(editing, "1500.00");
            assert_eq!(format_currency(&editing), shown);
        }

        #[test]
        fn test_idempotent() {
            let once = format_currency("150000");
            assert_eq!(format_currency(&once), once);
        }

        #[test]
        fn test_long_input_does_not_overflow() {
            let raw = "9".repeat(41);
            assert!(format_currency(&raw).starts_with("R$ 999.999"));
        }
    }

    mod normalize {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_display_currency() {
            assert_eq!(normalize_decimal("R$ 1.500,00"), "1500.00");
            assert_eq!(normalize_decimal("R$ 1.234.567,89"), "1234567.89");
        }

        #[test]
        fn test_plain_decimal_untouched() {
            assert_eq!(normalize_decimal("1500.00"), "1500.00");
        }

        #[test]
        fn test_grouped_thousands_without_comma() {
            assert_eq!(normalize_decimal("1.234.567"), "1234567");
            assert_eq!(normalize_decimal("R$ 2.000.000"), "2000000");
        }

        #[test]
        fn test_decimal_to_cents() {
            assert_eq!(decimal_to_cents("1500.00").as_deref(), Some("150000"));
            assert_eq!(decimal_to_cents("1500.5").as_deref(), Some("150050"));
            assert_eq!(decimal_to_cents("1500").as_deref(), Some("150000"));
            assert!(decimal_to_cents("").is_none());
            assert!(decimal_to_cents("1.2.3").is_none());
        }
    }

    #[test]
    fn test_format_for_unmasked_kinds() {
        assert!(format_for(FieldKind::Text, "abc").is_none());
        assert_eq!(
            format_for(FieldKind::Phone, "11987654321").as_deref(),
            Some("(11) 98765-4321")
        );
    }
}
