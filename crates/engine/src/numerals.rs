// ABOUTME: Numeral normalization for mixed-script price and size strings.
// ABOUTME: Maps Arabic-Indic and Extended Arabic-Indic digits onto ASCII digits.

/// First code point of the Arabic-Indic digit block (U+0660..=U+0669).
const ARABIC_INDIC_ZERO: u32 = 0x0660;

/// First code point of the Extended Arabic-Indic (Persian) block (U+06F0..=U+06F9).
const EXTENDED_ARABIC_INDIC_ZERO: u32 = 0x06F0;

/// Returns the ASCII digit for a secondary-system digit, or `None` for any other char.
pub fn secondary_digit(c: char) -> Option<char> {
    let code = c as u32;
    let offset = match code {
        0x0660..=0x0669 => code - ARABIC_INDIC_ZERO,
        0x06F0..=0x06F9 => code - EXTENDED_ARABIC_INDIC_ZERO,
        _ => return None,
    };
    char::from_digit(offset, 10)
}

/// Replaces every Arabic-Indic or Persian digit with the matching ASCII digit.
///
/// This is a char-for-char substitution: the output has the same number of
/// chars as the input and every non-digit char is left untouched. Thousands
/// separators, decimal points and letters are not interpreted here.
pub fn normalize_numerals(text: &str) -> String {
    text.chars()
        .map(|c| secondary_digit(c).unwrap_or(c))
        .collect()
}
