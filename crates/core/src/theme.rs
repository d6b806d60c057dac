//! Fixed palette, font table, and layout metrics shared by every renderer.
//!
//! Geometry is expressed in EMUs (English Metric Units, 914400 EMU = 1 inch)
//! so it can be written straight into OOXML.

/// EMUs per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// EMUs per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Slide width (13.333 inches, 16:9).
pub const SLIDE_WIDTH: i64 = 12_192_000;

/// Slide height (7.5 inches).
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Height of the white header bar.
pub const HEADER_HEIGHT: i64 = 457_200;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH).round() as i64
}

/// Convert points to the hundredths used by OOXML font sizes and spacing.
pub fn points(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

/// A 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form used by `<a:srgbClr val="..."/>`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Named palette tokens.
pub mod palette {
    use super::Rgb;

    pub const BG: Rgb = Rgb(245, 247, 250);
    pub const PRIMARY: Rgb = Rgb(33, 150, 243);
    pub const SECONDARY: Rgb = Rgb(99, 199, 126);
    pub const ACCENT: Rgb = Rgb(255, 193, 7);
    pub const INK: Rgb = Rgb(30, 41, 59);
    pub const MUTED: Rgb = Rgb(100, 116, 139);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const CARD: Rgb = Rgb(255, 255, 255);
}

/// Page margins.
pub mod margins {
    pub const LEFT: i64 = 640_080;
    pub const RIGHT: i64 = 640_080;
    pub const TOP: i64 = 548_640;
    pub const BOTTOM: i64 = 548_640;
}

/// Semantic text roles. Each maps to a fixed font family and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Subtitle,
    H2,
    Body,
    Caption,
}

/// A font family and point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: &'static str,
    pub size_pt: f64,
}

impl TextRole {
    /// Look up the font for this role.
    pub fn font(self) -> Font {
        let (family, size_pt) = match self {
            TextRole::Title => ("Montserrat", 44.0),
            TextRole::Subtitle => ("Inter", 20.0),
            TextRole::H2 => ("Montserrat", 28.0),
            TextRole::Body => ("Inter", 18.0),
            TextRole::Caption => ("Inter", 12.0),
        };
        Font { family, size_pt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(inches(1.0), 914_400);
        assert_eq!(inches(0.7), margins::LEFT);
        assert_eq!(inches(0.6), margins::TOP);
        assert_eq!(inches(0.5), HEADER_HEIGHT);
        assert_eq!(inches(7.5), SLIDE_HEIGHT);
    }

    #[test]
    fn test_points_to_hundredths() {
        assert_eq!(points(18.0), 1800);
        assert_eq!(points(10.0), 1000);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(palette::INK.hex(), "1E293B");
        assert_eq!(palette::PRIMARY.hex(), "2196F3");
        assert_eq!(palette::WHITE.hex(), "FFFFFF");
    }

    #[test]
    fn test_font_table() {
        assert_eq!(TextRole::Title.font().family, "Montserrat");
        assert_eq!(TextRole::Title.font().size_pt, 44.0);
        assert_eq!(TextRole::Caption.font().size_pt, 12.0);
        assert_eq!(TextRole::Body.font().family, "Inter");
    }
}
