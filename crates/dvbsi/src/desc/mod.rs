//! 記述子。
//!
//! 記述子群は[`DescriptorBlock`]として読み込み、必要な記述子だけを[`DescriptorBlock::get`]でパースする。
//! 各フィールドの読み取りは範囲検査され、記述子の長さを超える場合は[`DescriptorError`]となる。

mod base;
pub mod dump;
pub mod dvb;
pub mod private;

pub use base::*;
pub use dump::{BlockDump, Dump};
