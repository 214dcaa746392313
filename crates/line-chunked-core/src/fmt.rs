//! Number stringification for path data and SVG attributes.

/// Appends a path coordinate the way `d3-path` does: at most 3 fractional digits, rounding
/// `Math.round(x * 1000) / 1000` style (ties toward +infinity), trailing zeros trimmed.
pub fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let k = (v * 1000.0 + 0.5).floor() as i64;
    push_thousandths(out, k);
}

pub fn fmt_path(v: f64) -> String {
    let mut out = String::new();
    fmt_path_into(&mut out, v);
    out
}

/// Writes `k / 1000` with trailing fractional zeros dropped.
fn push_thousandths(out: &mut String, k: i64) {
    use std::fmt::Write as _;

    let sign = if k < 0 { "-" } else { "" };
    let whole = k.unsigned_abs() / 1000;
    let frac = k.unsigned_abs() % 1000;
    let _ = if frac == 0 {
        write!(out, "{sign}{whole}")
    } else {
        let digits = format!("{frac:03}");
        write!(out, "{sign}{whole}.{}", digits.trim_end_matches('0'))
    };
}

/// JS `Number#toString()` for finite values; `-0` prints as `0` and non-finite values as `0`.
pub fn js_number(v: f64) -> String {
    let mut buf = ryu_js::Buffer::new();
    js_number_with(v, &mut buf).to_string()
}

pub fn js_number_with(mut v: f64, buf: &mut ryu_js::Buffer) -> &str {
    if !v.is_finite() {
        return "0";
    }
    if v == 0.0 {
        v = 0.0;
    }
    buf.format_finite(v)
}

/// Reads the leading number of a string like JS `parseFloat` (`"2px"` is 2, `"abc"` is `None`).
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let mantissa = &s[digits_start..end];
    if mantissa.is_empty() || mantissa == "." {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}
