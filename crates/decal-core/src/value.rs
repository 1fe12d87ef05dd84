//! Parsers for the CSS-ish values the UI hands us: palette colors and
//! font-size inputs.
//!
//! Built on `winnow` 0.7. Both entry points accept surrounding whitespace
//! and reject trailing garbage.

use crate::model::Color;
use winnow::ascii::{Caseless, digit0, digit1, multispace0};
use winnow::combinator::{alt, opt, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` or
/// `rgba(r, g, b, a)`.
pub fn parse_color(input: &str) -> Option<Color> {
    let mut rest = input.trim();
    let color = alt((hex_color, rgb_color)).parse_next(&mut rest).ok()?;
    rest.trim().is_empty().then_some(color)
}

/// Coerce a font-size input such as `"32"`, `"32px"` or `" 28.5 "` to a number.
///
/// Sign is preserved; callers decide whether the value is in range.
pub fn parse_font_size(input: &str) -> Option<f64> {
    let mut rest = input.trim();
    let size = number.parse_next(&mut rest).ok()?;
    let _ = px_unit.parse_next(&mut rest).ok()?;
    (rest.trim().is_empty() && size.is_finite()).then_some(size)
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = '#'.parse_next(input)?;
    let digits: &str = take_while(3..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Color::from_hex(digits).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))
}

fn rgb_color(input: &mut &str) -> ModalResult<Color> {
    let _ = alt((Caseless("rgba"), Caseless("rgb"))).parse_next(input)?;
    let _ = (multispace0, '(', multispace0).parse_next(input)?;
    let channels: Vec<f64> =
        separated(3..=4, channel, (multispace0, ',', multispace0)).parse_next(input)?;
    let _ = (multispace0, ')').parse_next(input)?;

    let byte = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    let alpha = channels.get(3).map_or(255, |a| byte(a.clamp(0.0, 1.0) * 255.0));
    Ok(Color::rgba(
        byte(channels[0]),
        byte(channels[1]),
        byte(channels[2]),
        alpha,
    ))
}

fn px_unit<'a>(input: &mut &'a str) -> ModalResult<Option<&'a str>> {
    opt(Caseless("px")).parse_next(input)
}

fn channel(input: &mut &str) -> ModalResult<f64> {
    number.parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (opt(alt(('-', '+'))), digit1, opt(('.', digit0)))
        .take()
        .parse_to()
        .parse_next(input)
}
