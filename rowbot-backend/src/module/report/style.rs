//! Report themes.
//!
//! A theme is plain data: palette, fonts, geometry and which pieces of
//! decorative chrome to draw. Every theme runs through the same layout code.

use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn hex(value: u32) -> Self {
        Self((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: &'static str,
    pub size: f32,
    pub bold: bool,
}

impl FontSpec {
    pub const fn new(family: &'static str, size: f32, bold: bool) -> Self {
        Self { family, size, bold }
    }
}

/// Look of one class of table row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub text: Color,
    /// Background band behind the row, drawn at `band_opacity`
    pub band: Option<Color>,
    pub band_opacity: f32,
    /// Outline around the band
    pub outline: Option<Color>,
}

impl RowStyle {
    pub const fn text(color: Color) -> Self {
        Self {
            text: color,
            band: None,
            band_opacity: 1.0,
            outline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub scanline: Color,
    pub outer_border: Color,
    pub inner_border: Color,
    pub title: Color,
    pub date: Color,
    pub title_bars: Color,
    pub header_band: Color,
    pub header_border: Color,
    pub header_text: Color,
    pub separator: Color,
    pub mark_left: Color,
    pub mark_right: Color,
    pub caption: Color,
    /// Row 0, the workout summary
    pub summary: RowStyle,
    /// Rows with an even index (2, 4, ...)
    pub row_even: RowStyle,
    /// Rows with an odd index (1, 3, ...)
    pub row_odd: RowStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fonts {
    pub title: FontSpec,
    pub date: FontSpec,
    pub header: FontSpec,
    pub row: FontSpec,
    pub caption: FontSpec,
}

/// Pixel geometry. Vertical values that feed the canvas height are integers
/// so the height stays exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub canvas_width: u32,
    /// Inset of the outer border
    pub outer_margin: u32,
    /// Inset of the inner border
    pub inner_margin: u32,
    /// Left and right edge of the table
    pub content_left: u32,
    pub content_right: u32,
    pub title_baseline: u32,
    pub date_baseline: u32,
    /// Top of the three accent bars under the date
    pub title_bars_top: u32,
    pub header_top: u32,
    pub header_height: u32,
    /// Space between the header band and the first row
    pub header_gap: u32,
    pub row_height: u32,
    /// Text baseline measured from a row's top edge
    pub row_baseline: u32,
    /// Everything below the last row: corner marks, caption, borders
    pub footer_height: u32,
    /// Corner marks start this far below the last row
    pub marks_offset: u32,
    /// Caption baseline measured from the canvas bottom
    pub caption_from_bottom: u32,
}

impl Geometry {
    /// Top edge of row 0: the lower edge of the header band region
    pub fn rows_top(&self) -> u32 {
        self.header_top + self.header_height + self.header_gap
    }

    /// Height of a canvas without any rows
    pub fn base_height(&self) -> u32 {
        self.rows_top() + self.footer_height
    }

    pub fn canvas_height(&self, row_count: usize) -> u32 {
        self.base_height() + row_count as u32 * self.row_height
    }

    pub fn content_width(&self) -> u32 {
        self.content_right - self.content_left
    }
}

/// A table column: header label and anchor x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub x: u32,
}

/// Optional decorative pieces
#[derive(Debug, Clone, PartialEq)]
pub struct Chrome {
    /// Horizontal lines every `scanline_step` px across the whole canvas
    pub scanlines: bool,
    pub scanline_step: u32,
    pub inner_border: bool,
    /// Blur radius for neon-style glows; `None` draws flat
    pub glow: Option<f32>,
    pub title_bars: bool,
    pub corner_marks: bool,
    /// Dashed separators instead of solid lines
    pub dotted_separators: bool,
    pub title_prefix: &'static str,
    pub title_suffix: &'static str,
    pub caption: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleName {
    #[default]
    Forest,
    Cyberpunk,
    Ocean,
    Minimal,
}

impl StyleName {
    pub const ALL: [StyleName; 4] = [
        StyleName::Forest,
        StyleName::Cyberpunk,
        StyleName::Ocean,
        StyleName::Minimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleName::Forest => "forest",
            StyleName::Cyberpunk => "cyberpunk",
            StyleName::Ocean => "ocean",
            StyleName::Minimal => "minimal",
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StyleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forest" => Ok(StyleName::Forest),
            "cyberpunk" => Ok(StyleName::Cyberpunk),
            "ocean" => Ok(StyleName::Ocean),
            "minimal" => Ok(StyleName::Minimal),
            other => Err(format!("unknown report style: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    pub name: StyleName,
    pub palette: Palette,
    pub fonts: Fonts,
    pub geometry: Geometry,
    /// Time, distance, pace, stroke rate
    pub columns: [Column; 4],
    /// Shared by header labels and cell values
    pub align: TextAlign,
    pub chrome: Chrome,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self::forest()
    }
}

const MONO: &str = "monospace";
const SANS: &str = "Trebuchet MS, Helvetica, sans-serif";
const SYSTEM: &str = "Segoe UI, Roboto, Helvetica, sans-serif";

impl ReportStyle {
    pub fn named(name: StyleName) -> Self {
        match name {
            StyleName::Forest => Self::forest(),
            StyleName::Cyberpunk => Self::cyberpunk(),
            StyleName::Ocean => Self::ocean(),
            StyleName::Minimal => Self::minimal(),
        }
    }

    /// Dark green terminal look; the style posted to the channel by default
    pub fn forest() -> Self {
        let base200 = Color::hex(0x111827);
        let base300 = Color::hex(0x0F172A);
        let content = Color::hex(0xF9FAFB);
        let primary = Color::hex(0x22C55E);
        let secondary = Color::hex(0x14B8A6);
        let accent = Color::hex(0x06B6D4);
        let neutral = Color::hex(0x374151);

        Self {
            name: StyleName::Forest,
            palette: Palette {
                background: base300,
                scanline: neutral,
                outer_border: primary,
                inner_border: secondary,
                title: accent,
                date: secondary,
                title_bars: secondary,
                header_band: base200,
                header_border: accent,
                header_text: content,
                separator: neutral,
                mark_left: primary,
                mark_right: secondary,
                caption: neutral,
                summary: RowStyle {
                    text: primary,
                    band: Some(base200),
                    band_opacity: 1.0,
                    outline: Some(secondary),
                },
                row_even: RowStyle::text(accent),
                row_odd: RowStyle::text(secondary),
            },
            fonts: Fonts {
                title: FontSpec::new(MONO, 20.0, true),
                date: FontSpec::new(MONO, 14.0, false),
                header: FontSpec::new(MONO, 16.0, true),
                row: FontSpec::new(MONO, 14.0, false),
                caption: FontSpec::new(MONO, 12.0, false),
            },
            geometry: Geometry {
                canvas_width: 550,
                outer_margin: 20,
                inner_margin: 40,
                content_left: 60,
                content_right: 490,
                title_baseline: 74,
                date_baseline: 96,
                title_bars_top: 103,
                header_top: 120,
                header_height: 40,
                header_gap: 8,
                row_height: 28,
                row_baseline: 19,
                footer_height: 102,
                marks_offset: 22,
                caption_from_bottom: 48,
            },
            columns: [
                Column { label: "TIME", x: 160 },
                Column { label: "METERS", x: 260 },
                Column { label: "PACE/500M", x: 400 },
                Column { label: "S/MIN", x: 480 },
            ],
            align: TextAlign::End,
            chrome: Chrome {
                scanlines: true,
                scanline_step: 4,
                inner_border: true,
                glow: Some(8.0),
                title_bars: true,
                corner_marks: true,
                dotted_separators: true,
                title_prefix: ">>> ",
                title_suffix: " <<<",
                caption: None,
            },
        }
    }

    pub fn cyberpunk() -> Self {
        let neon_cyan = Color::hex(0x00FFFF);
        let neon_magenta = Color::hex(0xFF00FF);
        let neon_yellow = Color::hex(0xFFFF00);
        let dark_purple = Color::hex(0x1A0D26);
        let dark_cyan = Color::hex(0x0D4D4D);
        let bright_green = Color::hex(0x00FF41);
        let orange = Color::hex(0xFF6600);

        Self {
            name: StyleName::Cyberpunk,
            palette: Palette {
                background: dark_purple,
                scanline: dark_cyan,
                outer_border: neon_cyan,
                inner_border: neon_magenta,
                title: neon_yellow,
                date: neon_cyan,
                title_bars: neon_magenta,
                header_band: dark_cyan,
                header_border: bright_green,
                header_text: neon_yellow,
                separator: neon_magenta,
                mark_left: neon_cyan,
                mark_right: neon_magenta,
                caption: orange,
                summary: RowStyle {
                    text: neon_cyan,
                    band: Some(dark_cyan),
                    band_opacity: 1.0,
                    outline: Some(neon_magenta),
                },
                row_even: RowStyle::text(bright_green),
                row_odd: RowStyle::text(neon_yellow),
            },
            fonts: Fonts {
                title: FontSpec::new(MONO, 22.0, true),
                date: FontSpec::new(MONO, 16.0, false),
                header: FontSpec::new(MONO, 16.0, true),
                row: FontSpec::new(MONO, 15.0, false),
                caption: FontSpec::new(MONO, 12.0, false),
            },
            geometry: Geometry {
                canvas_width: 640,
                outer_margin: 20,
                inner_margin: 40,
                content_left: 60,
                content_right: 580,
                title_baseline: 80,
                date_baseline: 106,
                title_bars_top: 114,
                header_top: 132,
                header_height: 40,
                header_gap: 10,
                row_height: 32,
                row_baseline: 21,
                footer_height: 112,
                marks_offset: 18,
                caption_from_bottom: 50,
            },
            columns: [
                Column { label: "TIME_SPLIT", x: 80 },
                Column { label: "METERS", x: 220 },
                Column { label: "PACE/500M", x: 340 },
                Column { label: "S/MIN", x: 480 },
            ],
            align: TextAlign::Start,
            chrome: Chrome {
                scanlines: true,
                scanline_step: 4,
                inner_border: true,
                glow: Some(10.0),
                title_bars: true,
                corner_marks: true,
                dotted_separators: true,
                title_prefix: ">>> ",
                title_suffix: " <<<",
                caption: Some("SYSTEM_STATUS: ACTIVE | DATA_STREAM: LIVE"),
            },
        }
    }

    pub fn ocean() -> Self {
        let deep_navy = Color::hex(0x1E3A8A);
        let ocean_blue = Color::hex(0x3B82F6);
        let light_blue = Color::hex(0x60A5FA);
        let foam = Color::hex(0xF8FAFC);
        let secondary = Color::hex(0xCBD5E1);
        let accent = Color::hex(0x06B6D4);

        Self {
            name: StyleName::Ocean,
            palette: Palette {
                background: deep_navy,
                scanline: ocean_blue,
                outer_border: light_blue,
                inner_border: ocean_blue,
                title: foam,
                date: secondary,
                title_bars: accent,
                header_band: ocean_blue,
                header_border: light_blue,
                header_text: foam,
                separator: ocean_blue,
                mark_left: accent,
                mark_right: light_blue,
                caption: secondary,
                summary: RowStyle {
                    text: foam,
                    band: Some(accent),
                    band_opacity: 0.35,
                    outline: Some(accent),
                },
                row_even: RowStyle {
                    text: foam,
                    band: Some(ocean_blue),
                    band_opacity: 0.25,
                    outline: None,
                },
                row_odd: RowStyle::text(secondary),
            },
            fonts: Fonts {
                title: FontSpec::new(SANS, 30.0, true),
                date: FontSpec::new(SANS, 16.0, false),
                header: FontSpec::new(SANS, 14.0, true),
                row: FontSpec::new(SANS, 15.0, false),
                caption: FontSpec::new(SANS, 12.0, false),
            },
            geometry: Geometry {
                canvas_width: 600,
                outer_margin: 16,
                inner_margin: 30,
                content_left: 50,
                content_right: 550,
                title_baseline: 84,
                date_baseline: 110,
                title_bars_top: 118,
                header_top: 134,
                header_height: 36,
                header_gap: 8,
                row_height: 32,
                row_baseline: 21,
                footer_height: 90,
                marks_offset: 16,
                caption_from_bottom: 40,
            },
            columns: [
                Column { label: "Time", x: 70 },
                Column { label: "Meters", x: 200 },
                Column { label: "Pace /500m", x: 320 },
                Column { label: "Rate", x: 470 },
            ],
            align: TextAlign::Start,
            chrome: Chrome {
                scanlines: false,
                scanline_step: 4,
                inner_border: true,
                glow: None,
                title_bars: false,
                corner_marks: true,
                dotted_separators: false,
                title_prefix: "",
                title_suffix: "",
                caption: Some("Logged on the Concept2 logbook"),
            },
        }
    }

    pub fn minimal() -> Self {
        let background = Color::hex(0xF8F9FA);
        let primary = Color::hex(0x212529);
        let secondary = Color::hex(0x6C757D);
        let accent = Color::hex(0x007BFF);
        let border = Color::hex(0xDEE2E6);
        let stripe = Color::hex(0xEEF0F2);

        Self {
            name: StyleName::Minimal,
            palette: Palette {
                background,
                scanline: border,
                outer_border: border,
                inner_border: border,
                title: primary,
                date: secondary,
                title_bars: border,
                header_band: background,
                header_border: border,
                header_text: secondary,
                separator: border,
                mark_left: border,
                mark_right: border,
                caption: secondary,
                summary: RowStyle {
                    text: accent,
                    band: Some(accent),
                    band_opacity: 0.04,
                    outline: Some(accent),
                },
                row_even: RowStyle {
                    text: primary,
                    band: Some(stripe),
                    band_opacity: 1.0,
                    outline: None,
                },
                row_odd: RowStyle::text(primary),
            },
            fonts: Fonts {
                title: FontSpec::new(SYSTEM, 28.0, false),
                date: FontSpec::new(SYSTEM, 16.0, false),
                header: FontSpec::new(SYSTEM, 14.0, false),
                row: FontSpec::new(SYSTEM, 15.0, false),
                caption: FontSpec::new(SYSTEM, 12.0, false),
            },
            geometry: Geometry {
                canvas_width: 600,
                outer_margin: 30,
                inner_margin: 30,
                content_left: 50,
                content_right: 550,
                title_baseline: 80,
                date_baseline: 106,
                title_bars_top: 116,
                header_top: 126,
                header_height: 40,
                header_gap: 6,
                row_height: 34,
                row_baseline: 22,
                footer_height: 80,
                marks_offset: 16,
                caption_from_bottom: 42,
            },
            columns: [
                Column { label: "Time", x: 70 },
                Column { label: "Distance", x: 190 },
                Column { label: "Split /500m", x: 320 },
                Column { label: "Rate", x: 460 },
            ],
            align: TextAlign::Start,
            chrome: Chrome {
                scanlines: false,
                scanline_step: 4,
                inner_border: false,
                glow: None,
                title_bars: false,
                corner_marks: false,
                dotted_separators: false,
                title_prefix: "",
                title_suffix: "",
                caption: Some("Workout Summary"),
            },
        }
    }
}
