use courtside_engine::grade::{CellGrade, ColorBand};
use tui::style::{Color, Modifier, Style};

/// "#rrggbb" → (r, g, b). Keywords such as "transparent" have no RGB value.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Background and foreground for a band; neutral cells keep the terminal's colors.
pub fn band_rgb(band: ColorBand) -> Option<((u8, u8, u8), (u8, u8, u8))> {
    let colors = band.colors();
    Some((hex_rgb(colors.background_color)?, hex_rgb(colors.text_color)?))
}

pub fn cell_style(grade: &CellGrade) -> Style {
    let mut style = match band_rgb(grade.band) {
        Some(((br, bg, bb), (fr, fg, fb))) => Style::default().bg(Color::Rgb(br, bg, bb)).fg(Color::Rgb(fr, fg, fb)),
        None => Style::default(),
    };
    if grade.is_small_sample() {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_hex() {
        assert_eq!(hex_rgb("#1a7f37"), Some((0x1a, 0x7f, 0x37)));
        assert_eq!(hex_rgb("transparent"), None);
        assert_eq!(hex_rgb("#fff"), None);
    }

    #[test]
    fn neutral_cells_are_unstyled() {
        assert_eq!(cell_style(&CellGrade::NEUTRAL), Style::default());
        assert!(band_rgb(ColorBand::Excellent).is_some());
    }

    #[test]
    fn small_samples_are_dimmed() {
        let grade = CellGrade { band: ColorBand::Good, attempts_ratio: Some(0.5) };
        assert!(cell_style(&grade).add_modifier.contains(Modifier::DIM));
    }
}
