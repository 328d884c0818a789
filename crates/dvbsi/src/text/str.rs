//! 未復号の文字列表現。

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::ops;

use super::decode::{self, DecodedText, EncodingSelector};

/// 借用された未復号の文字列を表す型。
///
/// `DvbStr`と[`DvbString`]は、<code>&[str]</code>と[`String`]の関係と相似しており、
/// 前者は借用された参照、後者は所有権を持つ文字列である。
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DvbStr([u8]);

impl DvbStr {
    /// バイト列から`DvbStr`を生成する。
    #[must_use]
    #[inline]
    pub const fn from_bytes(bytes: &[u8]) -> &DvbStr {
        // Safety: DvbStrは[u8]と同じ表現
        unsafe { &*(bytes as *const [u8] as *const DvbStr) }
    }

    /// この文字列の長さを返す。
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// この文字列が空であるかどうかを返す。
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 文字列スライスをバイトスライスに変換する。
    #[must_use]
    #[inline]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 先頭バイトから文字符号化方式を判別する。
    #[inline]
    pub fn selector(&self) -> EncodingSelector {
        EncodingSelector::select(self.as_bytes()).0
    }

    /// 文字列を復号する。
    #[inline]
    pub fn decode(&self) -> DecodedText {
        decode::decode(self.as_bytes(), None)
    }

    /// 既定の文字符号表が使われる場合に限り、`encoding_override`で符号化方式を上書きして復号する。
    ///
    /// 文字符号表の指定を省略する放送事業者向けに使う。
    #[inline]
    pub fn decode_with_override(&self, encoding_override: &[u8]) -> DecodedText {
        decode::decode(self.as_bytes(), Some(encoding_override))
    }

    /// 強調部分を短縮名として復号する。
    #[inline]
    pub fn decode_short_name(&self) -> DecodedText {
        decode::decode_short(self.as_bytes())
    }

    /// 文字列を表示するための、[`Display`][`fmt::Display`]を実装したオブジェクトを返す。
    #[inline]
    pub fn display(&self) -> Display {
        Display { inner: self }
    }
}

impl Default for &DvbStr {
    fn default() -> Self {
        DvbStr::from_bytes(&[])
    }
}

impl fmt::Debug for DvbStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DvbStr(")?;
        f.debug_list()
            .entries(self.0.iter().map(|c| crate::utils::UpperHex(c)))
            .finish()?;
        f.write_str(")")
    }
}

impl<'a> From<&'a DvbStr> for Cow<'a, DvbStr> {
    #[inline]
    fn from(s: &'a DvbStr) -> Self {
        Cow::Borrowed(s)
    }
}

impl AsRef<DvbStr> for DvbStr {
    #[inline]
    fn as_ref(&self) -> &DvbStr {
        self
    }
}

impl AsRef<DvbStr> for [u8] {
    #[inline]
    fn as_ref(&self) -> &DvbStr {
        DvbStr::from_bytes(self)
    }
}

/// 所有権を持つ未復号の文字列を表す型。
///
/// `DvbString`と<code>&[DvbStr]</code>は、[`String`]と<code>&[str]</code>の関係と相似しており、
/// 前者は所有権を持つ文字列、後者は借用された参照である。
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DvbString(Vec<u8>);

impl DvbString {
    /// 空の`DvbString`を生成する。
    #[inline]
    #[must_use]
    pub const fn new() -> DvbString {
        DvbString(Vec::new())
    }

    /// `DvbString`をバイトのベクタに変換する。
    ///
    /// `DvbString`を消費するため内容はコピーされない。
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// `DvbString`の内容をバイトのスライスで返す。
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 文字列全体を含む[`DvbStr`]スライスを抽出する。
    #[inline]
    #[must_use]
    pub fn as_dvb_str(&self) -> &DvbStr {
        self
    }

    /// `DvbString`を切り詰めて全内容を削除する。
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `DvbString`に指定された文字列を追記する。
    #[inline]
    pub fn push_str(&mut self, string: &DvbStr) {
        self.0.extend_from_slice(string.as_bytes());
    }
}

impl Default for DvbString {
    #[inline]
    fn default() -> DvbString {
        DvbString::new()
    }
}

impl ops::Deref for DvbString {
    type Target = DvbStr;

    #[inline]
    fn deref(&self) -> &Self::Target {
        DvbStr::from_bytes(&self.0)
    }
}

impl fmt::Debug for DvbString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl AsRef<DvbStr> for DvbString {
    #[inline]
    fn as_ref(&self) -> &DvbStr {
        self
    }
}

impl AsRef<[u8]> for DvbString {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for DvbString {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        DvbString(bytes)
    }
}

impl From<DvbString> for Vec<u8> {
    #[inline]
    fn from(s: DvbString) -> Self {
        s.into_bytes()
    }
}

impl From<&DvbStr> for DvbString {
    fn from(s: &DvbStr) -> Self {
        s.to_owned()
    }
}

impl From<Cow<'_, DvbStr>> for DvbString {
    #[inline]
    fn from(s: Cow<'_, DvbStr>) -> Self {
        s.into_owned()
    }
}

impl Borrow<DvbStr> for DvbString {
    #[inline]
    fn borrow(&self) -> &DvbStr {
        self
    }
}

impl ToOwned for DvbStr {
    type Owned = DvbString;

    fn to_owned(&self) -> Self::Owned {
        DvbString(self.as_bytes().into())
    }

    fn clone_into(&self, target: &mut Self::Owned) {
        let mut b = std::mem::take(&mut target.0);
        self.as_bytes().clone_into(&mut b);
        target.0 = b;
    }
}

/// [`DvbStr`]を復号して表示するための構造体。
pub struct Display<'a> {
    inner: &'a DvbStr,
}

impl<'a> fmt::Display for Display<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.inner.decode().as_str())
    }
}
