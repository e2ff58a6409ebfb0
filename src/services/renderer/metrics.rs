//! 内置 Helvetica 字体的字宽表（单位：1/1000 em，ASCII 32..=126）

use super::layout::FontStyle;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// 非 ASCII 字符一律按较宽的字形估算，保证折行后不会越界
const FALLBACK_WIDTH: u16 = 667;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// 单个字符的宽度（毫米）
pub fn char_width(c: char, style: FontStyle, size_pt: f32) -> f32 {
    let table = match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        // Oblique 与正体字宽相同
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
    };
    let units = match c as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        _ => FALLBACK_WIDTH,
    };
    f32::from(units) / 1000.0 * size_pt * PT_TO_MM
}

/// 整段文本的宽度（毫米）
pub fn text_width(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    text.chars().map(|c| char_width(c, style, size_pt)).sum()
}

/// 内置字体（WinAnsi 编码）能否输出该字符
pub fn is_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7e | 0xa0..=0xff)
        || matches!(
            c,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž'
                | '‘' | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ'
                | 'ž' | 'Ÿ'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_lowercase_is_wider() {
        let text = "the quick brown fox";
        assert!(
            text_width(text, FontStyle::Bold, 12.0) > text_width(text, FontStyle::Regular, 12.0)
        );
        assert_eq!(
            text_width(text, FontStyle::Italic, 12.0),
            text_width(text, FontStyle::Regular, 12.0)
        );
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width("Hello", FontStyle::Regular, 6.0);
        let large = text_width("Hello", FontStyle::Regular, 12.0);
        assert!((large - 2.0 * small).abs() < 1e-4);
        // "M" = 833 units at 72pt = 0.833 inch
        assert!((text_width("M", FontStyle::Regular, 72.0) - 0.833 * 25.4).abs() < 1e-3);
    }

    #[test]
    fn test_encodable_repertoire() {
        assert!(is_encodable('A'));
        assert!(is_encodable('é'));
        assert!(is_encodable('“'));
        assert!(is_encodable('—'));
        assert!(!is_encodable('\u{7}'));
        assert!(!is_encodable('π'));
        assert!(!is_encodable('🎓'));
    }
}
