//! Base-N integer codec.
//!
//! Handles the two textual notations for non-decimal integers:
//!
//! * plain digit strings over `0-9A-Z` for bases 2..=36, as used by the
//!   `<radix>#<digits>` literals the tokenizer classifies;
//! * symbolic notation `[(<radix>),d,d,...]` carrying one decimal value per
//!   digit, which admits bases up to 1,000,000.

use thiserror::Error;

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Largest base the symbolic notation accepts.
pub const MAX_SYMBOLIC_RADIX: i64 = 1_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RadixError {
    #[error("radix smaller than 2")]
    RadixTooSmall,

    #[error("radix larger than 36")]
    RadixTooLarge,

    #[error("radix larger than 1000000")]
    SymbolicRadixTooLarge,

    #[error("number not in radix format")]
    NotInRadixFormat,

    #[error("number not in symbolic format")]
    NotInSymbolicFormat,

    #[error("decode error")]
    Decode,
}

pub type RadixResult<T> = std::result::Result<T, RadixError>;

fn check_radix(radix: i64, symbolic: bool) -> RadixResult<()> {
    if radix > 36 && !symbolic {
        return Err(RadixError::RadixTooLarge);
    }
    if radix > MAX_SYMBOLIC_RADIX {
        return Err(RadixError::SymbolicRadixTooLarge);
    }
    if radix < 2 {
        return Err(RadixError::RadixTooSmall);
    }
    Ok(())
}

/// Decodes `text` as a base-`radix` integer. Digits are matched
/// case-insensitively in plain mode.
pub fn decode(text: &str, radix: i64, symbolic: bool) -> RadixResult<i64> {
    check_radix(radix, symbolic)?;
    if symbolic {
        decode_symbolic(text.trim(), radix)
    } else {
        decode_plain(text.trim(), radix)
    }
}

fn decode_plain(text: &str, radix: i64) -> RadixResult<i64> {
    let (sign, digits) = split_sign(text);
    if digits.is_empty() {
        return Err(RadixError::NotInRadixFormat);
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let digit = DIGITS
            .iter()
            .position(|&d| d == c.to_ascii_uppercase() as u8)
            .ok_or(RadixError::NotInRadixFormat)? as i64;
        if digit >= radix {
            return Err(RadixError::NotInRadixFormat);
        }
        value = value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .ok_or(RadixError::Decode)?;
    }
    Ok(sign * value)
}

fn decode_symbolic(text: &str, radix: i64) -> RadixResult<i64> {
    if !text.starts_with('[') {
        return Err(RadixError::NotInSymbolicFormat);
    }

    // "[(16),-,1,10]" → declared radix, optional sign element, digit values.
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or(RadixError::Decode)?;
    let rest = inner.strip_prefix('(').ok_or(RadixError::Decode)?;
    let (declared, rest) = rest.split_once(')').ok_or(RadixError::Decode)?;
    declared.parse::<i64>().map_err(|_| RadixError::Decode)?;
    let rest = rest.strip_prefix(',').ok_or(RadixError::Decode)?;

    let (sign, rest) = match rest.strip_prefix("-,") {
        Some(rest) => (-1, rest),
        None => (1, rest.strip_prefix("+,").unwrap_or(rest)),
    };

    let mut value: i64 = 0;
    for part in rest.split(',') {
        let digit: i64 = part.trim().parse().map_err(|_| RadixError::Decode)?;
        if digit < 0 || digit >= radix {
            return Err(RadixError::Decode);
        }
        value = value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit))
            .ok_or(RadixError::Decode)?;
    }
    Ok(sign * value)
}

/// Encodes `value` in base `radix`, plain digits or symbolic notation.
pub fn encode(value: i64, radix: i64, symbolic: bool) -> RadixResult<String> {
    check_radix(radix, symbolic)?;

    let mut magnitude = value.unsigned_abs();
    let radix_u = radix as u64;

    if symbolic {
        let mut digits = Vec::new();
        if magnitude == 0 {
            digits.push(0);
        }
        while magnitude > 0 {
            digits.push(magnitude % radix_u);
            magnitude /= radix_u;
        }
        digits.reverse();

        let mut body = String::new();
        if value < 0 {
            body.push_str("-,");
        }
        for (i, d) in digits.iter().enumerate() {
            if i > 0 {
                body.push(',');
            }
            body.push_str(&d.to_string());
        }
        Ok(format!("[({radix}),{body}]"))
    } else {
        let mut out = Vec::new();
        if magnitude == 0 {
            out.push(b'0');
        }
        while magnitude > 0 {
            out.push(DIGITS[(magnitude % radix_u) as usize]);
            magnitude /= radix_u;
        }
        if value < 0 {
            out.push(b'-');
        }
        out.reverse();
        Ok(String::from_utf8(out).expect("digits are ASCII"))
    }
}

/// Inserts `separator` every `every` characters, counted from the right.
pub fn group_digits(text: &str, every: usize, separator: char) -> String {
    if every == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        let remaining = chars.len() - i;
        if i > 0 && remaining % every == 0 {
            out.push(separator);
        }
        out.push(*c);
    }
    out
}

fn split_sign(text: &str) -> (i64, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_decode_is_case_insensitive() {
        assert_eq!(decode("ff", 16, false).unwrap(), 255);
        assert_eq!(decode("FF", 16, false).unwrap(), 255);
    }

    #[test]
    fn symbolic_round_trip_with_large_radix() {
        let encoded = encode(-123_456, 1000, true).unwrap();
        assert_eq!(encoded, "[(1000),-,123,456]");
        assert_eq!(decode(&encoded, 1000, true).unwrap(), -123_456);
    }

    #[test]
    fn group_digits_counts_from_the_right() {
        assert_eq!(group_digits("1111101000", 4, ' '), "11 1110 1000");
        assert_eq!(group_digits("1000", 4, ' '), "1000");
    }
}
