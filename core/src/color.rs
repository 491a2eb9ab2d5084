//! Color resolution for output prefixes: named table, hex/rgb, and `auto` rotation.
use crossterm::style::Color;

use crate::command::ColorSpec;

/// Colors cycled through for `auto` and for `prefixColors` entries equal to the literal
/// `auto`, in rotation order.
const AUTO_ROTATION: &[Color] = &[
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

/// Resolve a [`ColorSpec`] to a concrete terminal color. Returns `None` when the spec names
/// an unknown color — the caller disables coloring for that prefix rather than guessing.
pub fn resolve(spec: &ColorSpec, index: usize) -> Option<Color> {
    match spec {
        ColorSpec::Auto => Some(auto_color(index)),
        ColorSpec::Hex(r, g, b) | ColorSpec::Rgb(r, g, b) => {
            Some(Color::Rgb { r: *r, g: *g, b: *b })
        }
        ColorSpec::Named(name) => named_color(name),
    }
}

/// Deterministic rotation of named colors by task index, for `auto`.
pub fn auto_color(index: usize) -> Color {
    AUTO_ROTATION[index % AUTO_ROTATION.len()]
}

fn named_color(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Grey),
        "darkgray" | "darkgrey" => Some(Color::DarkGrey),
        _ => None,
    }
}

/// Parse a `prefixColor`/`prefixColors` entry: a named color, `#RRGGBB`, `rgb(r,g,b)`, or
/// the literal `auto`.
pub fn parse_spec(raw: &str) -> Option<ColorSpec> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("auto") {
        return Some(ColorSpec::Auto);
    }
    if let Some(hex) = raw.strip_prefix('#') {
        return parse_hex(hex).map(|(r, g, b)| ColorSpec::Hex(r, g, b));
    }
    if let Some(inner) = raw.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_tuple(inner).map(|(r, g, b)| ColorSpec::Rgb(r, g, b));
    }
    Some(ColorSpec::Named(raw.to_string()))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn parse_rgb_tuple(inner: &str) -> Option<(u8, u8, u8)> {
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

/// Emit the ANSI prefix + suffix reset around `text`, or `text` unchanged if `color` is
/// `None` (the caller already decided coloring is disabled).
pub fn colorize(text: &str, color: Option<Color>) -> String {
    use crossterm::style::Stylize;
    match color {
        Some(c) => format!("{}", text.with(c)),
        None => text.to_string(),
    }
}
