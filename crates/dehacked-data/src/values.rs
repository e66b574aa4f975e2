//! Small value grammars used inside patch lines.

use winnow::ModalResult;
use winnow::Parser;
use winnow::ascii::{dec_int, dec_uint, float, space0, space1};
use winnow::combinator::{opt, preceded};
use winnow::token::take_till;

/// Leading signed decimal integer of `s` and the number of bytes consumed,
/// after optional leading whitespace. Consumes nothing when there are no
/// digits. Out-of-range values saturate.
pub fn int_prefix(s: &str) -> (i64, usize) {
    let bytes = s.as_bytes();
    let mut i = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let digits_start = i;
    let mut value: i64 = 0;
    while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
        i += 1;
    }
    if i == digits_start {
        return (0, 0);
    }
    (if negative { -value } else { value }, i)
}

/// C `atoi`: the leading integer of `s`, or 0.
pub fn atoi(s: &str) -> i32 {
    int_prefix(s).0.clamp(i32::MIN.into(), i32::MAX.into()) as i32
}

/// C `atof`: the leading float of `s`, or 0.
pub fn atof(s: &str) -> f64 {
    let mut input = s.trim_start();
    let parsed: ModalResult<f64> = float.parse_next(&mut input);
    parsed.unwrap_or(0.0)
}

/// Whether `s` is a complete decimal or `0x` hexadecimal integer.
pub fn is_number(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Parse a complete decimal or `0x` hexadecimal integer with optional sign.
pub fn parse_number(s: &str) -> Option<i64> {
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u64::from_str_radix(hex, 16).ok()? as i64
        }
        Some(_) => return None,
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => {
            body.parse::<u64>().ok()? as i64
        }
        None => return None,
    };
    Some(if negative { magnitude.wrapping_neg() } else { magnitude })
}

/// Version number from a `Patch File for DeHackEd vX.Y` signature line.
pub fn signature_version(line: &str) -> Option<(u32, u32)> {
    let mut input = line;
    let parsed: ModalResult<(u32, Option<u32>)> = preceded(
        "Patch File for DeHackEd v",
        (dec_uint, opt(preceded('.', dec_uint))),
    )
    .parse_next(&mut input);
    parsed.ok().map(|(major, minor)| (major, minor.unwrap_or(0)))
}

/// `R G B A` powerup tint: three integers and a float alpha.
pub fn powerup_color(value: &str) -> Option<(i32, i32, i32, f32)> {
    let mut input = value;
    let parsed: ModalResult<(i32, i32, i32, f32)> = (
        preceded(space0, dec_int),
        preceded(space1, dec_int),
        preceded(space1, dec_int),
        preceded(space1, float),
    )
        .parse_next(&mut input);
    parsed.ok()
}

/// State number from a Boom-style `Pointer 0 (x 213)` header remainder:
/// the integer after the first space following `(`.
pub fn boom_state_number(rest: &str) -> Option<i32> {
    let mut input = rest;
    let parsed: ModalResult<i32> = preceded(
        (take_till(0.., '('), '(', take_till(0.., ' '), ' ', space0),
        dec_int,
    )
    .parse_next(&mut input);
    parsed.ok()
}

/// Decode BEX backslash escapes: `\n`, `\t`, `\r`, `\xHH` and up to three
/// octal digits. Any other escaped character stands for itself.
pub fn decode_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some('t' | 'T') => out.push('\t'),
            Some('r' | 'R') => out.push('\r'),
            Some('x' | 'X') => {
                let mut value = 0u32;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            value = value * 16 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from(value as u8));
            }
            Some(first @ '0'..='7') => {
                let mut value = first.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from((value & 0xff) as u8));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_matches_strtol() {
        assert_eq!(int_prefix("  42 frames"), (42, 4));
        assert_eq!(int_prefix("-7"), (-7, 2));
        assert_eq!(int_prefix("weapons/pistol"), (0, 0));
        assert_eq!(atoi("12abc"), 12);
        assert_eq!(atoi("99999999999"), i32::MAX);
    }

    #[test]
    fn atof_reads_leading_float() {
        assert_eq!(atof(" 0.5 "), 0.5);
        assert_eq!(atof("2"), 2.0);
        assert_eq!(atof("abc"), 0.0);
    }

    #[test]
    fn numbers_accept_hex() {
        assert_eq!(parse_number("0x40000000"), Some(0x4000_0000));
        assert_eq!(parse_number("4194305"), Some(4_194_305));
        assert_eq!(parse_number("-1"), Some(-1));
        assert!(!is_number("SOLID"));
        assert!(!is_number("0x"));
        assert!(!is_number(""));
    }

    #[test]
    fn reads_signature_version() {
        assert_eq!(signature_version("Patch File for DeHackEd v3.0"), Some((3, 0)));
        assert_eq!(signature_version("Patch File for DeHackEd v2.3\r"), Some((2, 3)));
        assert_eq!(signature_version("Patch File for DeHackEd"), None);
    }

    #[test]
    fn parses_powerup_color() {
        assert_eq!(powerup_color("255 0 0 0.5"), Some((255, 0, 0, 0.5)));
        assert_eq!(powerup_color("255 0"), None);
    }

    #[test]
    fn recovers_boom_state_number() {
        assert_eq!(boom_state_number("0 (x 213)"), Some(213));
        assert_eq!(boom_state_number("0 (frame  88)"), Some(88));
        assert_eq!(boom_state_number("5"), None);
        assert_eq!(boom_state_number("0 (x)"), None);
    }

    #[test]
    fn decodes_escapes() {
        assert_eq!(decode_escapes(r"You got it\n"), "You got it\n");
        assert_eq!(decode_escapes(r"a\tb\\c"), "a\tb\\c");
        assert_eq!(decode_escapes(r"\x41B"), "AB");
        assert_eq!(decode_escapes(r"\101\60"), "A0");
        assert_eq!(decode_escapes(r"\q"), "q");
    }
}
