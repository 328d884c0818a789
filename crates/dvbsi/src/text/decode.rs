//! 文字符号化方式の判別と、判別結果に基づく復号。

use std::fmt;
use std::ops;

use arrayvec::ArrayVec;
use memchr::memchr;
use smallvec::SmallVec;
use thiserror::Error;

use super::{charset, huffman, iso6937};

/// ハフマン符号化された文字列を表す先頭バイト。
pub const HUFFMAN_LEAD: u8 = 0x1F;
/// 強調開始の制御符号。
pub const EMPHASIS_ON: u8 = 0x86;
/// 強調終了の制御符号。
pub const EMPHASIS_OFF: u8 = 0x87;
/// 改行の制御符号。
pub const CR_LF: u8 = 0x8A;
/// 短縮名の最大バイト数。
pub const SHORT_NAME_MAX: usize = 50;

/// 文字列の先頭バイトから判別される文字符号化方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingSelector {
    /// 先頭バイトが0x20以上（または空）で、既定の文字符号表（ISO/IEC 6937相当）を使う。
    Default7Bit,
    /// 1バイト符号表（番号は0～15）。
    SingleByteTable(u8),
    /// 16ビット固定長（UCS-2ビッグエンディアン）。
    FixedWidth16,
    /// UTF-8。
    Utf8,
    /// Freesat方式のハフマン符号化。
    Huffman,
    /// 多バイト符号化方式で、このクレートでは扱えない。
    Unsupported(u8),
    /// 不明な指定で、1バイトのまま復号する。
    Local8Bit,
}

impl EncodingSelector {
    /// `buf`の先頭から文字符号化方式を判別し、指定部分を除いた本体と共に返す。
    ///
    /// [`Default7Bit`][EncodingSelector::Default7Bit]の場合は`buf`全体が本体となる。
    pub fn select(buf: &[u8]) -> (EncodingSelector, &[u8]) {
        use EncodingSelector::*;

        match *buf {
            [] => (Default7Bit, buf),
            [lead @ 0x01..=0x0B, ref body @ ..] => (SingleByteTable(lead + 4), body),
            [0x10, hi, lo, ref body @ ..] => match u16::from_be_bytes([hi, lo]) {
                index @ 0..=15 => (SingleByteTable(index as u8), body),
                _ => (Local8Bit, body),
            },
            [0x10, ..] => (Local8Bit, &[]),
            [0x11, ref body @ ..] => (FixedWidth16, body),
            [0x15, ref body @ ..] => (Utf8, body),
            [HUFFMAN_LEAD, ref body @ ..] => (Huffman, body),
            [lead @ (0x12..=0x14 | 0x16..=0x1E), ref body @ ..] => (Unsupported(lead), body),
            [0x20..=0xFF, ..] => (Default7Bit, buf),
            // 0x00、0x0C..=0x0F
            [_, ref body @ ..] => (Local8Bit, body),
        }
    }
}

/// 復号はできたが、元の文字列に問題があったことを示す。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// 扱えない多バイト符号化方式が指定された。
    #[error("unsupported multi-byte encoding 0x{0:02X}")]
    UnsupportedEncoding(u8),

    /// 長さが規約の範囲を超えている。
    #[error("malformed length {0}")]
    MalformedLength(usize),

    /// 不明な文字符号化方式のため1バイトのまま復号した。
    #[error("unknown encoding 0x{0:02X}")]
    UnknownEncoding(u8),

    /// ハフマン符号表が登録されていない。
    #[error("huffman tables are not installed")]
    HuffmanUnavailable,

    /// ハフマン符号表にない符号があり、途中までしか復号できなかった。
    #[error("huffman code is missing in the table")]
    HuffmanIncomplete,
}

/// 文字列の復号に失敗した際のエラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    /// 宣言された長さがバッファの長さを超えている。
    #[error("declared length {declared} exceeds buffer of {available} bytes")]
    LengthExceedsBuffer {
        /// 宣言された長さ。
        declared: usize,
        /// バッファの長さ。
        available: usize,
    },
}

/// 復号された文字列。
///
/// 元の文字列が空である場合と、扱えない符号化方式のため空になった場合とは
/// [`diagnostic`][DecodedText::diagnostic]で区別できる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecodedText {
    text: String,
    diagnostic: Option<Diagnostic>,
}

impl DecodedText {
    #[inline]
    pub(crate) fn new(text: String) -> DecodedText {
        DecodedText {
            text,
            diagnostic: None,
        }
    }

    #[inline]
    pub(crate) fn with_diagnostic(text: String, diagnostic: Diagnostic) -> DecodedText {
        DecodedText {
            text,
            diagnostic: Some(diagnostic),
        }
    }

    /// 文字列を返す。
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `String`に変換する。
    #[inline]
    pub fn into_string(self) -> String {
        self.text
    }

    /// 復号時の診断を返す。
    #[inline]
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.diagnostic
    }

    /// 扱えない符号化方式のため空になったかどうかを返す。
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self.diagnostic, Some(Diagnostic::UnsupportedEncoding(_)))
    }
}

impl ops::Deref for DecodedText {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DecodedText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<str> for DecodedText {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for DecodedText {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl From<DecodedText> for String {
    #[inline]
    fn from(text: DecodedText) -> String {
        text.into_string()
    }
}

/// 制御符号を取り除き、改行を空白に置き換える。
#[inline]
fn strip_controls(buf: &[u8]) -> impl Iterator<Item = u8> + '_ {
    buf.iter().filter_map(|&b| match b {
        CR_LF => Some(b' '),
        0x80..=0x9F => None,
        b => Some(b),
    })
}

fn unsupported(lead: u8) -> DecodedText {
    log::error!("multi-byte coded text 0x{:02X} is not supported", lead);
    DecodedText::with_diagnostic(String::new(), Diagnostic::UnsupportedEncoding(lead))
}

/// `raw`全体を文字列として復号する。
///
/// `encoding_override`は、`raw`が既定の文字符号表を使う場合に限りその先頭に付加される。
pub(crate) fn decode(raw: &[u8], encoding_override: Option<&[u8]>) -> DecodedText {
    let Some(&lead) = raw.first() else {
        return DecodedText::default();
    };

    match lead {
        HUFFMAN_LEAD => return huffman::decode(raw),
        0x11 => return DecodedText::new(charset::decode_fixed_width_16(&raw[1..])),
        // 0x80..=0x9FはUTF-8の継続バイトでもあるため、制御符号の除去前に復号する
        0x15 => return DecodedText::new(String::from_utf8_lossy(&raw[1..]).into_owned()),
        0x12..=0x14 | 0x16..=0x1E => return unsupported(lead),
        _ => {}
    }

    let mut buf = SmallVec::<[u8; 256]>::new();
    if let Some(prefix) = encoding_override {
        if lead >= 0x20 {
            buf.extend_from_slice(prefix);
        }
    }
    buf.extend(strip_controls(raw));

    decode_table(&buf)
}

/// 制御符号を除去済みの`buf`を、先頭バイトの指定に従って復号する。
pub(crate) fn decode_table(buf: &[u8]) -> DecodedText {
    let (selector, body) = EncodingSelector::select(buf);
    let text = match selector {
        EncodingSelector::Default7Bit => iso6937::decode(body),
        EncodingSelector::SingleByteTable(index) => charset::decode_table(index, body)
            .unwrap_or_else(|| charset::decode_native(body).into_owned()),
        EncodingSelector::FixedWidth16 => charset::decode_fixed_width_16(body),
        EncodingSelector::Utf8 => String::from_utf8_lossy(body).into_owned(),
        EncodingSelector::Local8Bit => charset::decode_native(body).into_owned(),
        EncodingSelector::Huffman | EncodingSelector::Unsupported(_) => {
            // 符号化方式の上書きや短縮名の強調部分からのみ到達する
            let lead = buf[0];
            log::warn!("unknown encoding 0x{:02X}, decoding as 8-bit", lead);
            return DecodedText::with_diagnostic(
                charset::decode_native(body).into_owned(),
                Diagnostic::UnknownEncoding(lead),
            );
        }
    };
    DecodedText::new(text)
}

/// `raw`を短縮名として復号する。
///
/// 強調の制御符号で囲まれた部分だけを集めて復号する。
/// 強調部分がない場合は`raw`全体を通常の文字列として復号する。
pub(crate) fn decode_short(raw: &[u8]) -> DecodedText {
    if raw.len() > SHORT_NAME_MAX {
        log::warn!(
            "short name is {} bytes long, unlikely to be a short name",
            raw.len()
        );
        return DecodedText::with_diagnostic(String::new(), Diagnostic::MalformedLength(raw.len()));
    }
    if let Some(&lead @ (0x12..=0x14 | 0x16..=0x1E)) = raw.first() {
        return unsupported(lead);
    }

    // 長さは`raw`以下
    let mut buf = ArrayVec::<u8, SHORT_NAME_MAX>::new();
    let mut rest = raw;
    while let Some(start) = memchr(EMPHASIS_ON, rest) {
        let span = &rest[start + 1..];
        let end = memchr(EMPHASIS_OFF, span).unwrap_or(span.len());
        buf.extend(strip_controls(&span[..end]));
        rest = span.get(end + 1..).unwrap_or_default();
    }

    if buf.is_empty() {
        decode(raw, None)
    } else {
        decode_table(&buf)
    }
}

fn checked_prefix(raw: &[u8], raw_length: usize) -> Result<&[u8], TextError> {
    raw.get(..raw_length).ok_or(TextError::LengthExceedsBuffer {
        declared: raw_length,
        available: raw.len(),
    })
}

/// `raw`の先頭`raw_length`バイトを文字列として復号する。
///
/// 先頭バイトで示される文字符号化方式に従い復号する。`encoding_override`が指定された場合、
/// 既定の文字符号表が使われる文字列に限り、その先頭に付加して符号化方式を上書きする。
///
/// 扱えない符号化方式などは空文字列と[`Diagnostic`]で表され、エラーにはならない。
/// `raw_length`が`raw`の長さを超える場合のみエラーを返す。
pub fn decode_text(
    raw: &[u8],
    raw_length: usize,
    encoding_override: Option<&[u8]>,
) -> Result<DecodedText, TextError> {
    let raw = checked_prefix(raw, raw_length)?;
    Ok(decode(raw, encoding_override))
}

/// `raw`の先頭`raw_length`バイトを短縮名として復号する。
///
/// `raw_length`が50を超える場合は空文字列と[`Diagnostic::MalformedLength`]を返す。
pub fn decode_short_name(raw: &[u8], raw_length: usize) -> Result<DecodedText, TextError> {
    let raw = checked_prefix(raw, raw_length)?;
    Ok(decode_short(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn text(raw: &[u8]) -> DecodedText {
        decode_text(raw, raw.len(), None).unwrap()
    }

    #[test]
    fn test_selector_total() {
        for lead in 0..=0xFF_u8 {
            let buf = [lead, 0x00, 0x01, b'a'];
            let (selector, body) = EncodingSelector::select(&buf);
            match lead {
                0x01..=0x0B => assert_eq!(selector, EncodingSelector::SingleByteTable(lead + 4)),
                0x10 => assert_eq!(selector, EncodingSelector::SingleByteTable(1)),
                0x11 => assert_eq!(selector, EncodingSelector::FixedWidth16),
                0x15 => assert_eq!(selector, EncodingSelector::Utf8),
                0x1F => assert_eq!(selector, EncodingSelector::Huffman),
                0x12..=0x14 | 0x16..=0x1E => {
                    assert_eq!(selector, EncodingSelector::Unsupported(lead))
                }
                0x20..=0xFF => {
                    assert_eq!(selector, EncodingSelector::Default7Bit);
                    assert_eq!(body, &buf[..]);
                }
                _ => assert_eq!(selector, EncodingSelector::Local8Bit),
            }
        }

        assert_eq!(
            EncodingSelector::select(&[]),
            (EncodingSelector::Default7Bit, &[][..])
        );
        assert_eq!(
            EncodingSelector::select(&[0x10, 0x00, 0x10, b'a']),
            (EncodingSelector::Local8Bit, &b"a"[..])
        );
        assert_eq!(
            EncodingSelector::select(&[0x10, 0x00]),
            (EncodingSelector::Local8Bit, &[][..])
        );
    }

    #[test]
    fn test_decode_text_empty() {
        assert_eq!(text(b""), "");
        assert_eq!(text(b"").diagnostic(), None);
        assert_eq!(decode_text(b"ignored", 0, None).unwrap(), "");
    }

    #[test]
    fn test_decode_text_utf8() {
        assert_eq!(text(b"\x15Hi"), "Hi");
        assert_eq!(text("\x15Grüße".as_bytes()), "Grüße");
        // 制御符号の範囲のバイトも除去されない
        assert_eq!(text(b"\x15\xC2\x85"), "\u{85}");
    }

    #[test]
    fn test_decode_text_fixed_width_16() {
        let decoded = text(b"\x11\x00\x48\x00\x69");
        assert_eq!(decoded, "Hi");
        assert_eq!(decoded.chars().count(), 2);
        assert_eq!(text(b"\x11\x00\x48\x00"), "H");
    }

    #[test]
    fn test_decode_text_unsupported() {
        for lead in (0x12..=0x14).chain(0x16..=0x1E) {
            let decoded = text(&[lead, b'a', b'b', 0x00]);
            assert_eq!(decoded, "");
            assert!(decoded.is_unsupported());
            assert_eq!(decoded.diagnostic(), Some(Diagnostic::UnsupportedEncoding(lead)));
        }
    }

    #[test]
    fn test_decode_text_default() {
        assert_eq!(text(b"BBC One"), "BBC One");
        assert_eq!(text(b"Caf\xC2e"), "Café");
        // 制御符号の除去と改行の置き換え
        assert_eq!(text(b"BBC\x86 One\x87\x8Anews"), "BBC One news");
        assert_eq!(text(b"\x86\x87"), "");
    }

    #[test]
    fn test_decode_text_tables() {
        assert_eq!(text(b"\x01\xBF\xE0\xD0"), "Пра");
        assert_eq!(text(b"\x10\x00\x05\xBF\xE0\xD0"), "Пра");
        assert_eq!(text(b"\x10\x00\x01Caf\xE9"), "Café");
        // 16以上の符号表番号
        assert_eq!(text(b"\x10\x01\x00\xE9"), "é");
        assert_eq!(text(b"\x10\x00"), "");
        assert_eq!(text(b"\x0C\xE9"), "é");
        assert_eq!(text(b"\x00a"), "a");
    }

    #[test]
    fn test_decode_text_override() {
        let latin1 = Some(&b"\x10\x00\x01"[..]);
        assert_eq!(text(b"Caf\xE9"), "CafØ");
        assert_eq!(decode_text(b"Caf\xE9", 4, latin1).unwrap(), "Café");
        // 符号化方式が指定されている文字列には付加されない
        assert_eq!(decode_text(b"\x15Hi", 3, latin1).unwrap(), "Hi");
        assert_eq!(decode_text(b"\x01\xD0", 2, latin1).unwrap(), "\u{430}");

        // 上書きの判定は制御符号を除去する前の先頭バイトで行う
        let cyrillic = Some(&b"\x01"[..]);
        assert_eq!(decode_text(b"\x05\xD0", 2, cyrillic).unwrap(), "\u{11E}");
        assert_eq!(decode_text(b"\x86\x05\xD0", 3, cyrillic).unwrap(), "\u{5}\u{430}");

        let decoded = decode_text(b"abc", 3, Some(&[0x13])).unwrap();
        assert_eq!(decoded, "abc");
        assert_eq!(decoded.diagnostic(), Some(Diagnostic::UnknownEncoding(0x13)));
    }

    #[test]
    fn test_decode_text_length() {
        assert_eq!(decode_text(b"\x15Hi!", 3, None).unwrap(), "Hi");
        assert_matches!(
            decode_text(b"abc", 4, None),
            Err(TextError::LengthExceedsBuffer {
                declared: 4,
                available: 3
            })
        );
        assert_matches!(
            decode_short_name(b"abc", 10),
            Err(TextError::LengthExceedsBuffer { .. })
        );
    }

    #[test]
    fn test_decode_short_name() {
        let short = |raw: &[u8]| decode_short_name(raw, raw.len()).unwrap();

        assert_eq!(short(b"\x86BBC\x87 One"), "BBC");
        assert_eq!(short(b"\x86BBC\x87 \x86One\x87"), "BBCOne");
        assert_eq!(short(b"News \x86Today"), "Today");
        assert_eq!(short(b"\x86BBC\x8AOne\x87"), "BBC One");
        // 強調部分がなければ全体を復号する
        assert_eq!(short(b"BBC One"), "BBC One");
        assert_eq!(short(b"\x86\x87BBC"), "BBC");
        // 強調部分は符号表の指定を含み得る
        assert_eq!(short(b"\x86\x01\xBF\xE0\xD0\x87"), "Пра");

        let decoded = short(&[0x13, 0x86, b'a', 0x87]);
        assert_eq!(decoded, "");
        assert!(decoded.is_unsupported());
    }

    #[test]
    fn test_decode_short_name_length() {
        let raw = [b'a'; 60];
        for len in [51, 60] {
            let decoded = decode_short_name(&raw, len).unwrap();
            assert_eq!(decoded, "");
            assert_eq!(decoded.diagnostic(), Some(Diagnostic::MalformedLength(len)));
        }

        let decoded = decode_short_name(&raw, 50).unwrap();
        assert_eq!(decoded.len(), 50);
        assert_eq!(decoded.diagnostic(), None);
    }
}
