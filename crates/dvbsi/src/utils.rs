use std::fmt;

/// バイト列から多バイトの値を読み取るための拡張トレイト。
///
/// いずれのメソッドも、事前に長さを確認していることを前提とする。
pub trait BytesExt {
    /// 先頭2バイトをビッグエンディアンの16ビット符号無し整数として読み込む。
    fn read_be_16(&self) -> u16;

    /// 先頭3バイトをビッグエンディアンの24ビット符号無し整数として読み込む。
    fn read_be_24(&self) -> u32;

    /// 先頭4バイトをビッグエンディアンの32ビット符号無し整数として読み込む。
    fn read_be_32(&self) -> u32;

    /// 先頭から`digits`桁の二進化十進数を読み込む。
    ///
    /// 各バイトの上位4ビットが上の桁となる。
    fn read_bcd(&self, digits: usize) -> u32;
}

impl BytesExt for [u8] {
    #[inline]
    fn read_be_16(&self) -> u16 {
        u16::from_be_bytes([self[0], self[1]])
    }

    #[inline]
    fn read_be_24(&self) -> u32 {
        u32::from_be_bytes([0, self[0], self[1], self[2]])
    }

    #[inline]
    fn read_be_32(&self) -> u32 {
        u32::from_be_bytes([self[0], self[1], self[2], self[3]])
    }

    fn read_bcd(&self, digits: usize) -> u32 {
        self.iter()
            .flat_map(|&b| [b >> 4, b & 0x0F])
            .take(digits)
            .fold(0, |acc, d| acc * 10 + d as u32)
    }
}

/// 1バイトの二進化十進数を読み込む。
#[inline]
pub fn read_bcd_digit(b: u8) -> u8 {
    (b >> 4) * 10 + (b & 0x0F)
}

/// スライス型用拡張トレイト。
pub trait SliceExt {
    /// スライスの要素型。
    type Item;

    /// スライスを`mid`の位置で分割する。
    ///
    /// `mid`が要素数より大きい場合は`None`を返す。
    fn split_at_checked(&self, mid: usize) -> Option<(&[Self::Item], &[Self::Item])>;
}

impl<T> SliceExt for [T] {
    type Item = T;

    #[inline]
    fn split_at_checked(&self, mid: usize) -> Option<(&[T], &[T])> {
        if mid > self.len() {
            None
        } else {
            Some(self.split_at(mid))
        }
    }
}

/// `Debug`で値を16進数表記するためのラッパー。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UpperHex<T>(pub T);

impl<T: fmt::UpperHex> fmt::Debug for UpperHex<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}
