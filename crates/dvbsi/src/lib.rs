//! DVB（ETSI EN 300 468）のSI記述子とその文字列を読み込むためのクレート。
//!
//! 記述子は[`desc`]で、記述子中の文字列は[`text`]で扱う。
//! コンテント記述子のジャンルに対応する分類名は[`category`]で引ける。

#![deny(missing_docs)]

pub mod category;
pub mod desc;
pub mod lang;
pub mod text;
pub mod time;
pub mod types;
mod utils;

pub use category::{category_label, LabelId};
pub use text::{decode_short_name, decode_text, DecodedText, DvbStr, DvbString};
