use once_cell::sync::Lazy;
use regex::Regex;

/// ISO-6346 shape: four owner/category letters followed by a six-digit
/// serial and one check digit. Admission gates on this pattern only; the
/// arithmetic check digit is verified separately on the registration path.
static CONTAINER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{4}\d{7}$").unwrap());

/// External registration failures grouped for display. Matching is
/// heuristic substring matching on the remote service's free-text message
/// and never gates reservation creation.
pub const CATEGORY_DUPLICATE: &str = "Duplicado";
pub const CATEGORY_CAPACITY: &str = "Capacidad excedida";
pub const CATEGORY_FORMAT: &str = "Formato inválido";
pub const CATEGORY_CHECK_DIGIT: &str = "Dígito verificador incorrecto";
pub const CATEGORY_ERROR: &str = "Error";

/// Uppercases and strips spaces: "abcd 1234567" -> "ABCD1234567".
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub fn is_valid_format(normalized: &str) -> bool {
    CONTAINER_RE.is_match(normalized)
}

/// ISO-6346 letter values: A=10, counting upward while skipping the
/// multiples of 11 (11, 22, 33), so B=12 .. K=21, L=23 .. U=32, V=34 .. Z=38.
fn letter_value(c: char) -> u32 {
    let k = c as u32 - 'A' as u32;
    let mut value = 10 + k;
    if k >= 1 {
        value += 1;
    }
    if k >= 11 {
        value += 1;
    }
    if k >= 21 {
        value += 1;
    }
    value
}

/// Verifies the ISO-6346 arithmetic check digit of an already
/// format-valid container number.
pub fn has_valid_check_digit(normalized: &str) -> bool {
    if !is_valid_format(normalized) {
        return false;
    }

    let sum: u32 = normalized
        .chars()
        .take(10)
        .enumerate()
        .map(|(i, c)| {
            let value = if c.is_ascii_alphabetic() {
                letter_value(c)
            } else {
                c.to_digit(10).unwrap_or(0)
            };
            value * (1 << i)
        })
        .sum();

    let expected = (sum % 11) % 10;
    normalized.chars().nth(10).and_then(|c| c.to_digit(10)) == Some(expected)
}

/// Buckets a remote registration error message into a display category.
pub fn classify_registration_error(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    if lowered.contains("duplic") || lowered.contains("ya existe") || lowered.contains("already") {
        CATEGORY_DUPLICATE
    } else if lowered.contains("capacidad") || lowered.contains("capacity") {
        CATEGORY_CAPACITY
    } else if lowered.contains("formato") || lowered.contains("format") {
        CATEGORY_FORMAT
    } else if lowered.contains("verificador") || lowered.contains("check digit") {
        CATEGORY_CHECK_DIGIT
    } else {
        CATEGORY_ERROR
    }
}
