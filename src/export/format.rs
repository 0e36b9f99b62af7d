//! Number formatting with C `%g` semantics

/// Significant digits used when exporting data values
pub const EXPORT_PRECISION: usize = 12;

/// Format a value like C's `%.{precision}g`.
///
/// Fixed notation is used when the decimal exponent lies in
/// `-4..precision`, scientific otherwise; trailing zeros are removed.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return sci,
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// `%.12g`
pub fn format_g12(value: f64) -> String {
    format_g(value, EXPORT_PRECISION)
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
