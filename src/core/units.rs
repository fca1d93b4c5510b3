/// Offset added to Celsius to obtain Kelvin.
///
/// Kept at 273 rather than 273.15; clients compare against this value.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Convert Celsius to Fahrenheit: F = C * 9/5 + 32
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Celsius to Kelvin: K = C + 273
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Convert a Celsius reading into `(fahrenheit, kelvin)`
#[inline]
pub fn convert(celsius: f64) -> (f64, f64) {
    (celsius_to_fahrenheit(celsius), celsius_to_kelvin(celsius))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.1;

    #[test]
    fn test_fahrenheit_known_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert!((celsius_to_fahrenheit(28.5) - 83.3).abs() < TOLERANCE);
    }

    #[test]
    fn test_kelvin_uses_integer_offset() {
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_kelvin(100.0), 373.0);
        assert_eq!(celsius_to_kelvin(-273.0), 0.0);
        assert!((celsius_to_kelvin(28.5) - 301.5).abs() < 1e-9);
    }

    #[test]
    fn test_convert_pair() {
        let (f, k) = convert(-273.0);
        assert!((f - (-459.4)).abs() < TOLERANCE);
        assert!(k.abs() < TOLERANCE);
    }
}
