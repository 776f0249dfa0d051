//! Built-in 5x7 bitmap glyphs used when no system font can draw text

pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;
/// Horizontal advance per character, in glyph pixels
pub const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// Row bitmaps of a glyph, top row first; bit 4 is the leftmost pixel
pub type Glyph = [u8; GLYPH_HEIGHT as usize];

/// Look up the glyph for a character
///
/// Covers digits, both letter cases, the accented letters of Portuguese
/// labels and the punctuation used in chart text. Returns `None` for blanks
/// and unknown symbols.
pub fn glyph(ch: char) -> Option<Glyph> {
    match ch {
        'ç' => Some([0x00, 0x00, 0x0E, 0x10, 0x11, 0x0E, 0x04]),
        'Ç' => Some([0x0E, 0x11, 0x10, 0x10, 0x11, 0x0E, 0x04]),
        '²' => Some([0x0C, 0x02, 0x04, 0x08, 0x0E, 0x00, 0x00]),
        _ => match decompose(ch) {
            Some((base, accent)) => {
                let rows = base_glyph(base)?;
                Some(if base.is_ascii_lowercase() {
                    mark_lowercase(rows, accent)
                } else {
                    mark_uppercase(rows, accent)
                })
            }
            None => base_glyph(ch),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accent {
    Acute,
    Grave,
    Circumflex,
    Tilde,
}

fn decompose(ch: char) -> Option<(char, Accent)> {
    let (base, accent) = match ch {
        'á' => ('a', Accent::Acute),
        'à' => ('a', Accent::Grave),
        'â' => ('a', Accent::Circumflex),
        'ã' => ('a', Accent::Tilde),
        'é' => ('e', Accent::Acute),
        'ê' => ('e', Accent::Circumflex),
        'í' => ('i', Accent::Acute),
        'ó' => ('o', Accent::Acute),
        'ô' => ('o', Accent::Circumflex),
        'õ' => ('o', Accent::Tilde),
        'ú' => ('u', Accent::Acute),
        'Á' => ('A', Accent::Acute),
        'À' => ('A', Accent::Grave),
        'Â' => ('A', Accent::Circumflex),
        'Ã' => ('A', Accent::Tilde),
        'É' => ('E', Accent::Acute),
        'Ê' => ('E', Accent::Circumflex),
        'Í' => ('I', Accent::Acute),
        'Ó' => ('O', Accent::Acute),
        'Ô' => ('O', Accent::Circumflex),
        'Õ' => ('O', Accent::Tilde),
        'Ú' => ('U', Accent::Acute),
        _ => return None,
    };
    Some((base, accent))
}

/// Lowercase vowels keep their two empty top rows for the mark
fn mark_lowercase(mut rows: Glyph, accent: Accent) -> Glyph {
    let mark = match accent {
        Accent::Acute => [0x02, 0x04],
        Accent::Grave => [0x08, 0x04],
        Accent::Circumflex => [0x04, 0x0A],
        Accent::Tilde => [0x0D, 0x16],
    };
    rows[0] = mark[0];
    rows[1] = mark[1];
    rows
}

/// Capitals drop their third row to make room for a one-row mark on top
fn mark_uppercase(rows: Glyph, accent: Accent) -> Glyph {
    let mark = match accent {
        Accent::Acute => 0x06,
        Accent::Grave => 0x0C,
        Accent::Circumflex => 0x0A,
        Accent::Tilde => 0x0D,
    };
    [mark, rows[0], rows[1], rows[3], rows[4], rows[5], rows[6]]
}

fn base_glyph(ch: char) -> Option<Glyph> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'f' => [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
        'g' => [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
        'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'm' => [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'p' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        'q' => [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
        't' => [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'w' => [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
        'x' => [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'z' => [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '~' => [0x00, 0x00, 0x08, 0x15, 0x02, 0x00, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        _ => return None,
    };
    Some(rows)
}

/// Pixel scale that makes a glyph roughly match a font size in points
pub fn scale_for(font_size: f64) -> i32 {
    ((font_size * 0.7) / GLYPH_HEIGHT as f64).round().max(1.0) as i32
}

/// Size in pixels of `text` rendered at `scale`
pub fn text_size(text: &str, scale: i32) -> (u32, u32) {
    let chars = text.chars().count() as i32;
    let width = (chars * GLYPH_ADVANCE - 1).max(0) * scale;
    (width as u32, (GLYPH_HEIGHT * scale) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_cases_are_distinct() {
        for (lower, upper) in ('a'..='z').zip('A'..='Z') {
            assert!(glyph(lower).is_some(), "{}", lower);
            assert_ne!(glyph(lower), glyph(upper), "{}", lower);
        }
        assert!(glyph(' ').is_none());
        assert!(glyph('#').is_none());
    }

    #[test]
    fn test_accented_letters() {
        assert_ne!(glyph('ã'), glyph('a'));
        assert_ne!(glyph('ã'), glyph('á'));
        assert_ne!(glyph('é'), glyph('ê'));
        assert_ne!(glyph('ç'), glyph('c'));
        assert_ne!(glyph('Ç'), glyph('C'));
        assert_ne!(glyph('Á'), glyph('A'));
        assert_ne!(glyph('²'), glyph('2'));
        // Accent replaces the dot of the i
        assert_eq!(glyph('í').map(|rows| rows[2..].to_vec()), glyph('i').map(|rows| rows[2..].to_vec()));
        assert_ne!(glyph('í'), glyph('i'));
    }

    #[test]
    fn test_glyph_rows_fit_width() {
        let alphabet = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz\
            .,:-+=~/()?%_áàâãéêíóôõúçÁÀÂÃÉÊÍÓÔÕÚÇ²";
        for ch in alphabet.chars().filter(|c| !c.is_whitespace()) {
            let rows = glyph(ch).unwrap();
            assert!(rows.iter().all(|row| *row < (1 << GLYPH_WIDTH)), "{}", ch);
        }
    }

    #[test]
    fn test_chart_text_has_glyphs() {
        for chart in crate::charts::standard_charts() {
            for text in std::iter::once(chart.title).chain(chart.subtitle) {
                for ch in text.chars().filter(|c| !c.is_whitespace()) {
                    assert!(glyph(ch).is_some(), "{:?} in {:?}", ch, text);
                }
            }
        }
    }

    #[test]
    fn test_text_metrics() {
        assert_eq!(scale_for(10.0), 1);
        assert_eq!(scale_for(20.0), 2);
        assert_eq!(text_size("", 2), (0, 14));
        assert_eq!(text_size("ab", 1), (11, 7));
        assert_eq!(text_size("ab", 2), (22, 14));
    }
}
