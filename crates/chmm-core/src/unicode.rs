//! Character-level Unicode classification for Chinese text.

use crate::term::PosTag;

/// CJK Unified Ideographs, Extension A and Extension B.
pub fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// ASCII or full-width decimal digit.
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('\u{FF10}'..='\u{FF19}').contains(&c)
}

/// ASCII or full-width Latin letter.
pub fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{FF21}'..='\u{FF3A}').contains(&c)
        || ('\u{FF41}'..='\u{FF5A}').contains(&c)
}

/// Chinese numeral characters, including the financial (大写) forms.
pub fn is_chinese_numeral(c: char) -> bool {
    matches!(
        c,
        '〇' | '零'
            | '一'
            | '二'
            | '两'
            | '三'
            | '四'
            | '五'
            | '六'
            | '七'
            | '八'
            | '九'
            | '十'
            | '百'
            | '千'
            | '万'
            | '亿'
            | '壹'
            | '贰'
            | '叁'
            | '肆'
            | '伍'
            | '陆'
            | '柒'
            | '捌'
            | '玖'
            | '拾'
            | '佰'
            | '仟'
    )
}

pub fn is_numeral(c: char) -> bool {
    is_digit(c) || is_chinese_numeral(c)
}

/// Decimal separator that may appear between digits of one number.
pub fn is_decimal_point(c: char) -> bool {
    matches!(c, '.' | '．')
}

pub fn is_percent(c: char) -> bool {
    matches!(c, '%' | '％' | '‰')
}

/// ASCII, CJK and full-width punctuation.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || ('\u{3000}'..='\u{303F}').contains(&c)
        || ('\u{FF01}'..='\u{FF0F}').contains(&c)
        || ('\u{FF1A}'..='\u{FF20}').contains(&c)
        || ('\u{FF3B}'..='\u{FF40}').contains(&c)
        || ('\u{FF5B}'..='\u{FF65}').contains(&c)
        || ('\u{2010}'..='\u{2027}').contains(&c)
        || matches!(c, '、' | '…' | '—' | '“' | '”' | '‘' | '’')
}

/// Category for a span the lexicon does not know, guessed from its chars.
pub fn guess_tag(surface: &str) -> PosTag {
    let mut chars = surface.chars();
    let Some(first) = chars.next() else {
        return PosTag::X;
    };
    if surface.chars().all(is_punctuation) {
        PosTag::W
    } else if is_digit(first) && surface.chars().all(|c| is_digit(c) || is_decimal_point(c)) {
        PosTag::M
    } else if surface.chars().all(is_latin) {
        PosTag::Nx
    } else {
        PosTag::X
    }
}
