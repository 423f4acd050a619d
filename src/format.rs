//! Printf-style value formatting for `data-format` attributes.
//!
//! Documents attach specs like `%d`, `%.1f`, or `%5s` to bound outputs.
//! Only the conversions live documents use are supported: `d`, `f`, `s`,
//! literal `%%`, with optional zero flag, width, and precision. Anything
//! unrecognized passes through unchanged rather than faulting the render.

/// The value being formatted: resolved numbers keep full precision, anything
/// textual formats as a string.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Num(f64),
    Str(&'a str),
}

/// Apply a printf-style spec to a value.
pub fn sprintf(spec: &str, arg: Arg) -> String {
    let mut out = String::with_capacity(spec.len() + 8);
    let mut chars = spec.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut zero_pad = false;
        if chars.peek() == Some(&'0') {
            zero_pad = true;
            chars.next();
        }
        let mut width = 0usize;
        while let Some(&d) = chars.peek() {
            if let Some(v) = d.to_digit(10) {
                width = width * 10 + v as usize;
                chars.next();
            } else {
                break;
            }
        }
        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0usize;
            while let Some(&d) = chars.peek() {
                if let Some(v) = d.to_digit(10) {
                    p = p * 10 + v as usize;
                    chars.next();
                } else {
                    break;
                }
            }
            precision = Some(p);
        }

        let converted = match chars.next() {
            Some('d') => match arg {
                Arg::Num(n) => format!("{}", n.round() as i64),
                Arg::Str(s) => s.to_string(),
            },
            Some('f') => {
                let prec = precision.unwrap_or(6);
                match arg {
                    Arg::Num(n) => format!("{n:.prec$}"),
                    Arg::Str(s) => s.to_string(),
                }
            }
            Some('s') => match arg {
                Arg::Num(n) => format!("{n}"),
                Arg::Str(s) => s.to_string(),
            },
            Some(other) => {
                out.push('%');
                out.push(other);
                continue;
            }
            None => {
                out.push('%');
                continue;
            }
        };

        if converted.len() < width {
            let pad = if zero_pad { '0' } else { ' ' };
            for _ in 0..width - converted.len() {
                out.push(pad);
            }
        }
        out.push_str(&converted);
    }
    out
}
