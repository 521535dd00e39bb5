//! Q16.16 fixed-point conversion (spec.md §4.6.2): "Real-valued variables
//! lower to a 32-bit signed fixed-point representation (Q16.16 unless
//! configured otherwise); literals and defaults are converted via
//! `convertToFixedPoint(x) = round(x * 2^16)`."

/// Fractional bits for the default Q16.16 format. A `fractional_bits`
/// parameter is threaded through rather than hard-coded so a future
/// differently-configured format doesn't need a second conversion
/// function (spec.md §4.6.2: "unless configured otherwise").
pub const DEFAULT_FRACTIONAL_BITS: u32 = 16;

#[must_use]
pub fn convert_to_fixed_point(value: f64, fractional_bits: u32) -> i64 {
    (value * f64::from(1u32 << fractional_bits)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_one_point_five_to_q16_16() {
        assert_eq!(convert_to_fixed_point(1.5, 16), 98_304);
    }

    #[test]
    fn converts_negative_values() {
        assert_eq!(convert_to_fixed_point(-0.5, 16), -32_768);
    }
}
