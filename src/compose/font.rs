//! Helvetica-Bold metrics and `WinAnsiEncoding` text bytes.

/// PostScript name of the greeting font (a standard 14 font, never embedded).
pub const GREETING_FONT: &str = "Helvetica-Bold";
/// Greeting size in points.
pub const GREETING_SIZE: f32 = 24.0;

/// Character widths for Helvetica-Bold (ASCII 32..=126) in 1/1000 em.
/// Source: Adobe Helvetica-Bold AFM data.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32..=47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48..=63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64..=79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80..=95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96..=111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112..=126
];

/// Character widths for Helvetica-Bold in `WinAnsiEncoding` 0xA0..=0xFF.
/// Source: Adobe Helvetica-Bold AFM data.
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0..=0xAF
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0..=0xBF
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0..=0xCF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0..=0xDF
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0..=0xEF
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 0xF0..=0xFF
];

/// Width of `?`, which replaces unencodable characters.
const REPLACEMENT_WIDTH: u16 = 611;

/// Width of one character in 1/1000 em, as it will be rendered.
fn char_width(ch: char) -> u16 {
    match u32::from(ch) {
        code @ 32..=126 => HELVETICA_BOLD_WIDTHS[(code - 32) as usize],
        code @ 0xA0..=0xFF => HELVETICA_BOLD_LATIN1_WIDTHS[(code - 0xA0) as usize],
        _ => REPLACEMENT_WIDTH,
    }
}

/// Measure `text` in points at `font_size`.
#[must_use]
pub fn measure_text(text: &str, font_size: f32) -> f32 {
    let total: u32 = text.chars().map(|ch| u32::from(char_width(ch))).sum();
    #[allow(clippy::cast_precision_loss)]
    let total = total as f32;
    total * font_size / 1000.0
}

/// Encode `text` for a `WinAnsiEncoding` simple font.
///
/// Latin-1 maps straight through; anything else becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            code @ (32..=126 | 0xA0..=0xFF) => u8::try_from(code).unwrap_or(b'?'),
            _ => b'?',
        })
        .collect()
}
