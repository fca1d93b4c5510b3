// Unit tests for postal code validation and unit conversion

use cep_temperature::core::{convert, normalize, validate};
use cep_temperature::ServiceError;

const DIGITS: &[&str] = &["01310100", "99999999", "00000000", "70040010", "20040002"];

/// Every way of sprinkling hyphens/spaces between and around the digits
fn decorated(digits: &str) -> Vec<String> {
    let mut out = vec![digits.to_string()];
    for i in 0..=digits.len() {
        let (head, tail) = digits.split_at(i);
        out.push(format!("{}-{}", head, tail));
        out.push(format!("{} {}", head, tail));
        out.push(format!(" {}- {} ", head, tail));
    }
    out.push(format!("{}-{}", &digits[..5], &digits[5..]));
    out.push(digits.chars().map(|c| format!("{}-", c)).collect());
    out
}

#[test]
fn test_separators_never_change_the_code() {
    for digits in DIGITS {
        for raw in decorated(digits) {
            assert!(validate(&raw), "{:?} should be valid", raw);
            assert_eq!(normalize(&raw).unwrap().as_str(), *digits, "{:?}", raw);
        }
    }
}

#[test]
fn test_wrong_digit_count_is_invalid() {
    for len in (0..16).filter(|l| *l != 8) {
        let raw = "1".repeat(len);
        assert!(!validate(&raw), "{} digits should be invalid", len);
        assert!(!validate(&format!("{}-", raw)));
        assert!(matches!(normalize(&raw), Err(ServiceError::InvalidFormat)));
    }
}

#[test]
fn test_non_digit_characters_are_invalid() {
    for raw in ["0131010a", "01310_100", "01310.100", "0131O100", "01310\t100", "+1310100", "01310100\n"] {
        assert!(!validate(raw), "{:?} should be invalid", raw);
        assert!(normalize(raw).is_err());
    }
}

#[test]
fn test_normalize_idempotent() {
    for digits in DIGITS {
        for raw in decorated(digits) {
            let once = normalize(&raw).unwrap();
            assert_eq!(normalize(once.as_str()).unwrap(), once);
        }
    }
}

#[test]
fn test_conversion_reference_points() {
    let cases = [
        (0.0, 32.0, 273.0),
        (100.0, 212.0, 373.0),
        (-273.0, -459.4, 0.0),
        (28.5, 83.3, 301.5),
    ];

    for (celsius, fahrenheit, kelvin) in cases {
        let (f, k) = convert(celsius);
        assert!((f - fahrenheit).abs() < 0.1, "{}°C -> {}°F, expected {}", celsius, f, fahrenheit);
        assert!((k - kelvin).abs() < 0.1, "{}°C -> {}K, expected {}", celsius, k, kelvin);
    }
}

#[test]
fn test_conversion_invariants() {
    let mut celsius = -60.0;
    while celsius <= 60.0 {
        let (f, k) = convert(celsius);
        assert!((f - (celsius * 9.0 / 5.0 + 32.0)).abs() < 1e-9);
        assert!((k - (celsius + 273.0)).abs() < 1e-9);
        celsius += 0.25;
    }
}
