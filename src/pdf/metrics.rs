//! Helvetica text metrics
//!
//! Word wrapping needs real advance widths, not a monospace guess. These
//! are the standard Helvetica AFM widths (units per 1000 em) for the
//! printable ASCII range; accented Latin letters measure as their base
//! letter, anything else as the average lowercase width.

const POINT_TO_MM: f64 = 0.352_778;
const DEFAULT_WIDTH: u16 = 556;

/// Advance widths for chars 0x20..=0x7E.
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

fn char_width_units(c: char) -> u16 {
    let c = fold_accent(c);
    match c {
        ' '..='~' => ASCII_WIDTHS[c as usize - 0x20],
        _ => DEFAULT_WIDTH,
    }
}

/// Map the accented letters of Portuguese text to their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        _ => c,
    }
}

/// Rendered width of `text` at `font_size` points, in millimeters.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| char_width_units(c) as u32).sum();
    units as f64 / 1000.0 * font_size * POINT_TO_MM
}

/// Greedy word wrap to `max_width` millimeters. Embedded newlines force
/// breaks; a single word wider than the column is broken mid-word rather
/// than overflowing.
pub fn wrap(text: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font_size) <= max_width {
                current = word.to_string();
            } else {
                current = break_long_word(word, font_size, max_width, &mut lines);
            }
        }
        lines.push(current);
    }
    lines
}

fn break_long_word(
    word: &str,
    font_size: f64,
    max_width: f64,
    lines: &mut Vec<String>,
) -> String {
    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if text_width(&chunk, font_size) > max_width && chunk.chars().count() > 1 {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(c);
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // 'W' is the widest letter, 'i' among the narrowest.
        assert!(text_width("W", 10.0) > text_width("i", 10.0) * 3.0);
        // 10pt space: 278/1000 * 10 * 0.352778 ≈ 0.98mm
        let space = text_width(" ", 10.0);
        assert!((space - 0.98).abs() < 0.01);
    }

    #[test]
    fn test_accents_measure_as_base_letter() {
        assert_eq!(text_width("ã", 10.0), text_width("a", 10.0));
        assert_eq!(text_width("Ç", 10.0), text_width("C", 10.0));
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap(
            "Obra em desacordo com o projeto aprovado pela prefeitura",
            10.0,
            30.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 30.0);
        }
    }

    #[test]
    fn test_wrap_short_text_is_single_line() {
        assert_eq!(wrap("Aberto", 10.0, 80.0), vec!["Aberto"]);
    }

    #[test]
    fn test_wrap_blank_text_yields_one_empty_line() {
        assert_eq!(wrap("", 10.0, 80.0), vec![""]);
    }

    #[test]
    fn test_wrap_honors_embedded_newlines() {
        let lines = wrap("linha um\nlinha dois", 10.0, 200.0);
        assert_eq!(lines, vec!["linha um", "linha dois"]);
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let lines = wrap("Regularização", 12.0, 5.0);
        assert!(lines.len() > 1);
        let joined: String = lines.concat();
        assert_eq!(joined, "Regularização");
    }
}
