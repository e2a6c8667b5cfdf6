//! Cover colors from AniList hex strings

use egui::Color32;
use regex::Regex;
use std::sync::OnceLock;

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)#?([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})?")
            .expect("hex color pattern is valid")
    })
}

/// Parse `#rrggbb` or `#rrggbbaa` (case-insensitive, `#` optional)
///
/// Anything unparseable comes back black, which is what AniList entries
/// without a cover color get.
pub fn parse_hex_color(hex: &str) -> Color32 {
    let Some(caps) = hex_color_regex().captures(hex) else {
        return Color32::BLACK;
    };

    let channel = |i: usize| -> Option<u8> {
        caps.get(i).and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
    };

    match (channel(1), channel(2), channel(3)) {
        (Some(r), Some(g), Some(b)) => {
            let a = channel(4).unwrap_or(255);
            Color32::from_rgba_unmultiplied(r, g, b, a)
        }
        _ => Color32::BLACK,
    }
}

/// Scale the RGB channels down by `amount` (0.05 = 5% darker)
pub fn darken(color: Color32, amount: f32) -> Color32 {
    let factor = (1.0 - amount).clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * factor).round() as u8;
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(scale(r), scale(g), scale(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_hex_color("#ff0000"), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("00FF00"), Color32::from_rgb(0, 255, 0));
        assert_eq!(parse_hex_color("#e4a15d"), Color32::from_rgb(0xe4, 0xa1, 0x5d));
    }

    #[test]
    fn test_parse_alpha() {
        let color = parse_hex_color("#0000ff80");
        assert_eq!(color.a(), 128);
        assert_eq!((color.r(), color.g()), (0, 0));
        assert!(color.b() > 0);
    }

    #[test]
    fn test_invalid_is_black() {
        assert_eq!(parse_hex_color(""), Color32::BLACK);
        assert_eq!(parse_hex_color("#12"), Color32::BLACK);
        assert_eq!(parse_hex_color("not a color"), Color32::BLACK);
    }

    #[test]
    fn test_darken() {
        let color = darken(Color32::from_rgb(200, 100, 0), 0.05);
        assert_eq!(color, Color32::from_rgb(190, 95, 0));
        assert_eq!(darken(Color32::WHITE, 0.0), Color32::WHITE);
    }
}
