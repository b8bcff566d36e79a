//! CSS color parsing.
//!
//! Supports the named-color table below, `#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa`,
//! and `rgb()`/`rgba()` with integer, percentage, or 0–1 components.
//!
//! Fallbacks are part of the contract, not errors: `none`/`transparent`/empty
//! input parses to transparent black, anything else unparsable to opaque
//! black.

use super::space::Rgba;

/// Fixed named-color table. Deliberately small: vectorizer output uses hex
/// almost exclusively, names only show up in hand-edited uploads.
const NAMED: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("beige", [245, 245, 220]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("salmon", [250, 128, 114]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];

/// Parse a CSS color value into [`Rgba`].
///
/// Never fails: see the module docs for the fallback rules.
pub fn parse_color(raw: &str) -> Rgba {
    let value = raw.trim().to_ascii_lowercase();

    if value.is_empty() || value == "none" || value == "transparent" {
        return Rgba::TRANSPARENT;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Rgba::BLACK);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args).unwrap_or(Rgba::BLACK);
    }

    if let Ok(idx) = NAMED.binary_search_by_key(&value.as_str(), |(name, _)| name) {
        let [r, g, b] = NAMED[idx].1;
        return Rgba::opaque(r, g, b);
    }

    Rgba::BLACK
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 | 4 => {
            let r = nibble(0)?;
            let g = nibble(1)?;
            let b = nibble(2)?;
            let a = if hex.len() == 4 {
                nibble(3)? as f32 * 17.0 / 255.0
            } else {
                1.0
            };
            Some(Rgba::new(r * 17, g * 17, b * 17, a))
        }
        6 | 8 => {
            let r = byte(0)?;
            let g = byte(2)?;
            let b = byte(4)?;
            let a = if hex.len() == 8 {
                byte(6)? as f32 / 255.0
            } else {
                1.0
            };
            Some(Rgba::new(r, g, b, a))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = if parts.len() == 4 {
        parse_alpha(parts[3])?
    } else {
        1.0
    };
    Some(Rgba::new(r, g, b, a))
}

/// A channel is an integer 0–255 or a percentage.
fn parse_channel(part: &str) -> Option<u8> {
    if let Some(pct) = part.strip_suffix('%') {
        let v: f32 = pct.parse().ok()?;
        return Some((v.clamp(0.0, 100.0) / 100.0 * 255.0).round() as u8);
    }
    let v: f32 = part.parse().ok()?;
    Some(v.clamp(0.0, 255.0).round() as u8)
}

/// Alpha is 0–1 or a percentage.
fn parse_alpha(part: &str) -> Option<f32> {
    if let Some(pct) = part.strip_suffix('%') {
        let v: f32 = pct.parse().ok()?;
        return Some((v / 100.0).clamp(0.0, 1.0));
    }
    let v: f32 = part.parse().ok()?;
    Some(v.clamp(0.0, 1.0))
}
