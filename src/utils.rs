//! Various utility functions

pub fn is_katakana(c: char) -> bool {
    (0x30A0..=0x30FF).contains(&(c as u32))
}

/// Folds a katakana character to its hiragana counterpart.
/// Anything else, or a katakana character without a single-character counterpart, is returned as is.
pub fn fold_kana(c: char) -> char {
    if !is_katakana(c) {
        return c;
    }
    let mut buf = [0; 4];
    let folded = wana_kana::to_hiragana::to_hiragana(c.encode_utf8(&mut buf));
    let mut chars = folded.chars();
    match (chars.next(), chars.next()) {
        (Some(hiragana), None) => hiragana,
        _ => c,
    }
}

/// Folds every character of `text`, keeping the character count unchanged.
pub fn normalize(text: &str) -> String {
    text.chars().map(fold_kana).collect()
}

// checks whether a character of the text and a character of the reading can be matched literally
// ヶ (folded to ゖ) is read as か or が
pub fn literal_equivalent(text: char, reading: char) -> bool {
    text == reading || (matches!(text, 'け' | 'ゖ' | 'ヶ') && matches!(reading, 'が' | 'か'))
}
