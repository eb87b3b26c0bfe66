//! Splits a raw price label into its currency marker and numeric text.

use regex_lite::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Label starting with an ISO-style letter code: "USD 19.99", "RM94.90".
static CODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,3}) ?([0-9](?:[.,' ]?[0-9])*)").unwrap());

/// Label starting with a symbol: "€19,99", "HK$ 38.00", "Rp 329.000".
static SYMBOL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^0-9 ]+) ?([0-9](?:[.,' ]?[0-9])*)").unwrap());

/// A label separated into an optional currency marker and the numeric text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLabel {
    pub marker: Option<String>,
    pub numeric: String,
}

impl SplitLabel {
    fn new(marker: Option<&str>, numeric: &str) -> Self {
        Self { marker: marker.map(String::from), numeric: numeric.to_string() }
    }
}

/// Splits a raw label.
///
/// The label is first cleaned (encoding repair, non-breaking spaces folded to
/// plain spaces, whitespace collapsed and trimmed). A leading 2-3 letter
/// uppercase code wins over a leading symbol; a label with neither comes back
/// whole with no marker. Never fails: anything unparsable is left for the
/// normalizer to reject.
pub fn split_label(label: &str) -> SplitLabel {
    let cleaned = clean_label(label);

    for pattern in [&*CODE_PREFIX, &*SYMBOL_PREFIX] {
        if let Some(caps) = pattern.captures(&cleaned) {
            return SplitLabel::new(Some(&caps[1]), &caps[2]);
        }
    }

    SplitLabel::new(None, &cleaned)
}

/// Repairs encoding, folds every whitespace variant into a single space and trims.
pub fn clean_label(label: &str) -> String {
    let repaired = repair_encoding(label);
    repaired
        .split(char::is_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Undoes UTF-8 text that was decoded as Latin-1 / Windows-1252 ("â‚¬" -> "€").
///
/// Each char is mapped back to the single byte it came from; if every char
/// maps and the bytes form valid UTF-8, the decoded text wins. Text that was
/// decoded correctly in the first place fails one of those checks and is
/// returned unchanged.
pub fn repair_encoding(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let bytes: Option<Vec<u8>> = text.chars().map(single_byte).collect();
    match bytes.map(String::from_utf8) {
        Some(Ok(decoded)) if decoded != text => Cow::Owned(decoded),
        _ => Cow::Borrowed(text),
    }
}

/// Windows-1252 byte for a char, if it has one.
fn single_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if code <= 0xFF {
        return Some(code as u8);
    }

    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
