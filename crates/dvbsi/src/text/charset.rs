//! ISO/IEC 8859に基づく1バイト符号表群。
//!
//! 0x80..=0x9Fは復号前に取り除かれるため、その範囲だけが異なるWindows符号表で
//! 代替しているものがある。

use std::borrow::Cow;

use encoding_rs::Encoding;

/// 1バイト符号表の数。
pub const TABLE_COUNT: usize = 16;

/// 1バイト符号表の名前（添字は符号表番号）。
pub static TABLE_NAMES: [&str; TABLE_COUNT] = [
    "Latin1",
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-3",
    "ISO-8859-4",
    "ISO-8859-5",
    "ISO-8859-6",
    "ISO-8859-7",
    "ISO-8859-8",
    "ISO-8859-9",
    "ISO-8859-10",
    "ISO-8859-11",
    "ISO-8859-12",
    "ISO-8859-13",
    "ISO-8859-14",
    "ISO-8859-15",
];

/// 符号表番号に対応する`encoding_rs`の符号化方式。
///
/// ラテン1（0番と1番）は`None`を返し、[`decode_native`]で扱う。
/// 欠番の12番も`None`を返す。
fn encoding(index: u8) -> Option<&'static Encoding> {
    let encoding = match index {
        2 => encoding_rs::ISO_8859_2,
        3 => encoding_rs::ISO_8859_3,
        4 => encoding_rs::ISO_8859_4,
        5 => encoding_rs::ISO_8859_5,
        6 => encoding_rs::ISO_8859_6,
        7 => encoding_rs::ISO_8859_7,
        // 視覚順
        8 => encoding_rs::ISO_8859_8,
        9 => encoding_rs::WINDOWS_1254,
        10 => encoding_rs::ISO_8859_10,
        11 => encoding_rs::WINDOWS_874,
        13 => encoding_rs::ISO_8859_13,
        14 => encoding_rs::ISO_8859_14,
        15 => encoding_rs::ISO_8859_15,
        _ => return None,
    };
    Some(encoding)
}

/// 符号表番号`index`で`body`を復号する。
///
/// `index`が[`TABLE_COUNT`]以上の場合は`None`を返す。
pub fn decode_table(index: u8, body: &[u8]) -> Option<String> {
    if index as usize >= TABLE_COUNT {
        return None;
    }

    let text = match encoding(index) {
        Some(encoding) => encoding.decode_without_bom_handling(body).0,
        None => decode_native(body),
    };
    Some(text.into_owned())
}

/// 符号表の指定がない、または不明な場合に使う1バイト復号。
///
/// 各バイトをそのままU+0000..=U+00FFに対応させる。
#[inline]
pub fn decode_native(body: &[u8]) -> Cow<str> {
    encoding_rs::mem::decode_latin1(body)
}

/// 16ビット固定長（UCS-2ビッグエンディアン）の`body`を復号する。
///
/// 奇数長の場合、末尾の1バイトは無視する。
pub fn decode_fixed_width_16(body: &[u8]) -> String {
    let even = &body[..body.len() / 2 * 2];
    encoding_rs::UTF_16BE
        .decode_without_bom_handling(even)
        .0
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_table() {
        assert_eq!(decode_table(1, b"Caf\xE9").as_deref(), Some("Café"));
        assert_eq!(decode_table(0, b"\xC4").as_deref(), Some("Ä"));
        assert_eq!(decode_table(5, b"\xBF\xE0\xD0").as_deref(), Some("Пра"));
        assert_eq!(decode_table(7, b"\xC1\xE8\xDE\xED\xE1").as_deref(), Some("Αθήνα"));
        assert_eq!(decode_table(9, b"\xDD\xFE").as_deref(), Some("İş"));
        assert_eq!(decode_table(15, b"\xA4").as_deref(), Some("€"));
        // 欠番はラテン1として扱う
        assert_eq!(decode_table(12, b"\xE9").as_deref(), Some("é"));
        assert_eq!(decode_table(16, b"abc"), None);
    }

    #[test]
    fn test_decode_native() {
        assert_eq!(decode_native(b"ab\xFF"), "ab\u{FF}");
    }

    #[test]
    fn test_decode_fixed_width_16() {
        assert_eq!(decode_fixed_width_16(b"\x00H\x00i"), "Hi");
        assert_eq!(decode_fixed_width_16(b"\x04\x1F\x04\x40\x00"), "Пр");
        assert_eq!(decode_fixed_width_16(b""), "");
    }
}
