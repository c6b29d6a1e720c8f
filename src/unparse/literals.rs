//! Spelling of literal constants.

use std::fmt::{self, Write};

use crate::ir::{Kind, Logical};

fn backslash_escape(byte: u8) -> Option<char> {
    match byte {
        0x07 => Some('a'),
        0x08 => Some('b'),
        0x0c => Some('f'),
        b'\n' => Some('n'),
        b'\r' => Some('r'),
        b'\t' => Some('t'),
        0x0b => Some('v'),
        b'\\' => Some('\\'),
        _ => None,
    }
}

fn write_quoted_byte<W: Write>(w: &mut W, byte: u8) -> fmt::Result {
    if byte >= b' ' && byte < 0x7f && byte != b'\\' {
        return w.write_char(char::from(byte));
    }

    w.write_char('\\')?;

    if let Some(escape) = backslash_escape(byte) {
        w.write_char(escape)
    } else if byte > 0o77 {
        write!(w, "{:03o}", byte)
    } else if byte > 0o7 {
        write!(w, "{:02o}", byte)
    } else {
        write!(w, "{:o}", byte)
    }
}

/// Writes `value` as a double-quoted character literal. Quotes are doubled;
/// control characters, backslashes and the UTF-8 bytes of non-ASCII
/// characters are written as backslash escapes.
pub fn write_quoted<W: Write>(w: &mut W, value: &str) -> fmt::Result {
    w.write_char('"')?;

    for ch in value.chars() {
        if ch == '"' {
            w.write_str("\"\"")?;
            continue;
        }

        let mut buf = [0; 4];

        for &byte in ch.encode_utf8(&mut buf).as_bytes() {
            write_quoted_byte(w, byte)?;
        }
    }

    w.write_char('"')
}

/// Returns `value` as a double-quoted character literal.
///
/// # Examples
///
/// ```
/// # use fortran_unparse::unparse::literals::quote_character_literal;
/// #
/// assert_eq!(quote_character_literal("it's"), r#""it's""#);
/// assert_eq!(quote_character_literal("say \"hi\""), r#""say ""hi""""#);
/// assert_eq!(quote_character_literal("a\tb"), r#""a\tb""#);
/// ```
pub fn quote_character_literal(value: &str) -> String {
    let mut buf = String::new();
    let _ = write_quoted(&mut buf, value);
    buf
}

pub fn write_character<W: Write>(
    w: &mut W,
    value: &str,
    kind: Kind,
) -> fmt::Result {
    if kind != 1 {
        write!(w, "{kind}_")?;
    }

    write_quoted(w, value)
}

pub fn write_integer<W: Write>(w: &mut W, value: i128, kind: Kind) -> fmt::Result {
    write!(w, "{value}_{kind}")
}

pub fn write_unsigned<W: Write>(
    w: &mut W,
    value: u128,
    kind: Kind,
) -> fmt::Result {
    write!(w, "{value}U_{kind}")
}

pub fn write_logical<W: Write>(
    w: &mut W,
    value: Logical,
    kind: Kind,
) -> fmt::Result {
    if !value.is_canonical() {
        write!(w, "transfer({}_8,.false._{kind})", value.word())
    } else if value.is_true() {
        write!(w, ".true._{kind}")
    } else {
        write!(w, ".false._{kind}")
    }
}

pub fn write_boz<W: Write>(w: &mut W, value: u128) -> fmt::Result {
    write!(w, "z'{value:X}'")
}

/// Shortest decimal digits that read back to `value` at the precision of
/// `kind`, in the form `d.ddde±x`.
fn real_digits(value: f64, kind: Kind) -> String {
    let digits = if kind <= 4 {
        format!("{:e}", value as f32)
    } else {
        format!("{value:e}")
    };

    match digits.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.e{exponent}")
        }
        _ => digits,
    }
}

/// Writes a real literal. Values without a literal form are written as
/// constant expressions: `(0._4/0.)` for NaN and `(1._4/0.)` or
/// `(-1._4/0.)` for infinities.
///
/// # Examples
///
/// ```
/// # use fortran_unparse::unparse::literals::write_real;
/// #
/// let mut buf = String::new();
/// write_real(&mut buf, 1.5, 4).unwrap();
/// assert_eq!(buf, "1.5e0_4");
/// ```
pub fn write_real<W: Write>(w: &mut W, value: f64, kind: Kind) -> fmt::Result {
    if value.is_nan() {
        write!(w, "(0._{kind}/0.)")
    } else if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };

        write!(w, "({sign}1._{kind}/0.)")
    } else {
        write!(w, "{}_{kind}", real_digits(value, kind))
    }
}

pub fn write_complex<W: Write>(
    w: &mut W,
    re: f64,
    im: f64,
    kind: Kind,
) -> fmt::Result {
    w.write_char('(')?;
    write_real(w, re, kind)?;
    w.write_char(',')?;
    write_real(w, im, kind)?;
    w.write_char(')')
}
