//! SIの文字列。
//!
//! 文字列の先頭バイトで文字符号化方式が指定される（EN 300 468 付属書A）。
//! 記述子からは未復号の[`DvbStr`]として得られ、[`DvbStr::decode`]等で`String`に変換する。

pub mod charset;
mod decode;
pub mod huffman;
mod iso6937;
mod str;

pub use decode::{
    decode_short_name, decode_text, DecodedText, Diagnostic, EncodingSelector, TextError, CR_LF,
    EMPHASIS_OFF, EMPHASIS_ON, HUFFMAN_LEAD, SHORT_NAME_MAX,
};
pub use self::str::{Display, DvbStr, DvbString};
