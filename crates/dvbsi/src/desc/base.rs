//! 記述子に関する基礎の型。

use std::fmt;
use std::slice::ChunksExact;

use thiserror::Error;

use crate::text::DvbStr;
use crate::utils::{BytesExt, SliceExt};

/// 記述子の読み取りで発生するエラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// フィールドが記述子の内容の範囲を超えている。
    #[error("{descriptor}::{field}: {len} bytes at offset {offset} exceed {available} bytes")]
    BoundsViolation {
        /// 記述子の名前。
        descriptor: &'static str,
        /// フィールドの名前。
        field: &'static str,
        /// フィールドの位置。
        offset: usize,
        /// フィールドの長さ。
        len: usize,
        /// 記述子の内容の長さ。
        available: usize,
    },

    /// 記述子のタグが読み取ろうとした記述子と異なる。
    #[error("descriptor tag mismatch: expected 0x{expected:02X}, found 0x{actual:02X}")]
    TagMismatch {
        /// 読み取ろうとした記述子のタグ。
        expected: u8,
        /// 実際のタグ。
        actual: u8,
    },
}

/// 記述子を表すトレイト。
pub trait Descriptor<'a>: Sized {
    /// この記述子のタグ。
    const TAG: u8;

    /// `data`から記述子を読み取る。
    ///
    /// `data`には`descriptor_tag`と`descriptor_length`は含まない。
    fn read(data: &'a [u8]) -> Result<Self, DescriptorError>;
}

/// 記述子の内容に対する、範囲検査付きの読み取り。
///
/// 範囲外の読み取りは[`DescriptorError::BoundsViolation`]となり、
/// 隣接するデータを読むことはない。
#[derive(Clone, Copy)]
pub struct Payload<'a> {
    name: &'static str,
    data: &'a [u8],
}

impl<'a> Payload<'a> {
    /// 名前が`name`である記述子の内容`data`から`Payload`を生成する。
    #[inline]
    pub fn new(name: &'static str, data: &'a [u8]) -> Payload<'a> {
        Payload { name, data }
    }

    /// 内容の長さを返す。
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 内容が空かどうかを返す。
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 内容全体を返す。
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    fn violation(&self, field: &'static str, offset: usize, len: usize) -> DescriptorError {
        log::debug!("invalid {}::{}", self.name, field);
        DescriptorError::BoundsViolation {
            descriptor: self.name,
            field,
            offset,
            len,
            available: self.data.len(),
        }
    }

    /// `offset`から`len`バイトを返す。
    pub fn bytes(
        &self,
        field: &'static str,
        offset: usize,
        len: usize,
    ) -> Result<&'a [u8], DescriptorError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.violation(field, offset, len))
    }

    /// `offset`から固定長の配列を返す。
    #[inline]
    pub fn array<const N: usize>(
        &self,
        field: &'static str,
        offset: usize,
    ) -> Result<&'a [u8; N], DescriptorError> {
        let bytes = self.bytes(field, offset, N)?;
        bytes
            .try_into()
            .map_err(|_| self.violation(field, offset, N))
    }

    /// `offset`の1バイトを返す。
    #[inline]
    pub fn u8(&self, field: &'static str, offset: usize) -> Result<u8, DescriptorError> {
        Ok(self.bytes(field, offset, 1)?[0])
    }

    /// `offset`からビッグエンディアンの16ビット値を返す。
    #[inline]
    pub fn be16(&self, field: &'static str, offset: usize) -> Result<u16, DescriptorError> {
        Ok(self.bytes(field, offset, 2)?.read_be_16())
    }

    /// `offset`からビッグエンディアンの24ビット値を返す。
    #[inline]
    pub fn be24(&self, field: &'static str, offset: usize) -> Result<u32, DescriptorError> {
        Ok(self.bytes(field, offset, 3)?.read_be_24())
    }

    /// `offset`からビッグエンディアンの32ビット値を返す。
    #[inline]
    pub fn be32(&self, field: &'static str, offset: usize) -> Result<u32, DescriptorError> {
        Ok(self.bytes(field, offset, 4)?.read_be_32())
    }

    /// `offset`の1バイトのうち`mask`で示されるビットを右詰めで返す。
    #[inline]
    pub fn bits(&self, field: &'static str, offset: usize, mask: u8) -> Result<u8, DescriptorError> {
        let b = self.u8(field, offset)?;
        Ok((b & mask) >> mask.trailing_zeros())
    }

    /// `offset`の1バイトのうち`mask`で示されるビットが立っているかどうかを返す。
    #[inline]
    pub fn flag(&self, field: &'static str, offset: usize, mask: u8) -> Result<bool, DescriptorError> {
        Ok(self.u8(field, offset)? & mask != 0)
    }

    /// `offset`から`digits`桁の二進化十進数を返す。
    pub fn bcd(
        &self,
        field: &'static str,
        offset: usize,
        digits: usize,
    ) -> Result<u32, DescriptorError> {
        Ok(self.bytes(field, offset, (digits + 1) / 2)?.read_bcd(digits))
    }

    /// `offset`から`len`バイトを文字列として返す。
    #[inline]
    pub fn text(
        &self,
        field: &'static str,
        offset: usize,
        len: usize,
    ) -> Result<&'a DvbStr, DescriptorError> {
        Ok(DvbStr::from_bytes(self.bytes(field, offset, len)?))
    }

    /// `offset`にある8ビットの長さとそれに続くデータを読み、データと次の位置を返す。
    pub fn prefixed(
        &self,
        field: &'static str,
        offset: usize,
    ) -> Result<(&'a [u8], usize), DescriptorError> {
        let len = self.u8(field, offset)? as usize;
        let data = self.bytes(field, offset + 1, len)?;
        Ok((data, offset + 1 + len))
    }

    /// `offset`にある8ビットの長さとそれに続く文字列を読み、文字列と次の位置を返す。
    #[inline]
    pub fn prefixed_text(
        &self,
        field: &'static str,
        offset: usize,
    ) -> Result<(&'a DvbStr, usize), DescriptorError> {
        let (data, next) = self.prefixed(field, offset)?;
        Ok((DvbStr::from_bytes(data), next))
    }

    /// `offset`以降のすべてを返す。`offset`が末尾を超える場合は空を返す。
    #[inline]
    pub fn rest(&self, offset: usize) -> &'a [u8] {
        self.data.get(offset..).unwrap_or_default()
    }

    /// `offset`から`len`バイトを、同じ名前の`Payload`として切り出す。
    #[inline]
    pub fn sub(
        &self,
        field: &'static str,
        offset: usize,
        len: usize,
    ) -> Result<Payload<'a>, DescriptorError> {
        Ok(Payload::new(self.name, self.bytes(field, offset, len)?))
    }

    /// `offset`以降を`size`バイトの繰り返しとして返す。
    ///
    /// 端数は無視する。
    pub fn records(&self, field: &'static str, offset: usize, size: usize) -> ChunksExact<'a, u8> {
        let rest = self.rest(offset);
        if rest.len() % size != 0 {
            log::debug!("invalid {}::{}", self.name, field);
        }
        rest.chunks_exact(size)
    }
}

impl<'a> fmt::Debug for Payload<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Payload({}, {} bytes)", self.name, self.data.len())
    }
}

/// パース前の記述子。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawDescriptor<'a> {
    /// 記述子のタグ。
    pub tag: u8,

    /// 記述子の内容。
    pub payload: &'a [u8],
}

impl<'a> RawDescriptor<'a> {
    /// `data`から記述子を1つ読み取り後続データと共に返す。
    pub fn read(data: &'a [u8]) -> Result<(RawDescriptor<'a>, &'a [u8]), DescriptorError> {
        let header = Payload::new("RawDescriptor", data);
        let tag = header.u8("descriptor_tag", 0)?;
        let length = header.u8("descriptor_length", 1)? as usize;
        let payload = header.bytes("payload", 2, length)?;

        Ok((RawDescriptor { tag, payload }, &data[2 + length..]))
    }

    /// 記述子の内容の長さを返す。
    #[inline]
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    /// 記述子の内容を`T`として読み取る。
    ///
    /// タグが`T`と異なる場合は[`DescriptorError::TagMismatch`]を返す。
    pub fn parse<T: Descriptor<'a>>(&self) -> Result<T, DescriptorError> {
        if self.tag != T::TAG {
            return Err(DescriptorError::TagMismatch {
                expected: T::TAG,
                actual: self.tag,
            });
        }
        T::read(self.payload)
    }
}

impl<'a> fmt::Debug for RawDescriptor<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct PrintBytes<'a>(&'a [u8]);
        impl<'a> fmt::Debug for PrintBytes<'a> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} bytes", self.0.len())
            }
        }

        f.debug_struct("RawDescriptor")
            .field("tag", &crate::utils::UpperHex(self.tag))
            .field("payload", &PrintBytes(self.payload))
            .finish()
    }
}

/// 複数の記述子からなる記述子群。
#[derive(Clone, PartialEq, Eq)]
pub struct DescriptorBlock<'a>(&'a [u8]);

impl<'a> DescriptorBlock<'a> {
    /// 記述子群全体を`data`とする`DescriptorBlock`を生成する。
    #[inline]
    pub fn new(data: &'a [u8]) -> DescriptorBlock<'a> {
        DescriptorBlock(data)
    }

    /// `data`から`length`バイト分の記述子群を読み取り後続データと共に返す。
    ///
    /// 記述子の内容はパースせず、`get`メソッドで初めてパースする。
    ///
    /// データ長が不足している場合は`None`を返す。
    // `length`が`u16`なのは規格上`u16`以上の長さになることがなく、
    // 呼び出し側でのキャストが無意味であるため。
    pub fn read_with_len(data: &'a [u8], length: u16) -> Option<(DescriptorBlock<'a>, &'a [u8])> {
        let (block, rem) = data.split_at_checked(length as usize)?;
        Some((DescriptorBlock(block), rem))
    }

    /// `data`から12ビットの長さを持つ記述子群を読み取り後続データと共に返す。
    ///
    /// 記述子の内容はパースせず、`get`メソッドで初めてパースする。
    ///
    /// データ長が不足している場合は`None`を返す。
    #[inline]
    pub fn read(data: &'a [u8]) -> Option<(DescriptorBlock<'a>, &'a [u8])> {
        if data.len() < 2 {
            return None;
        }

        let length = data[0..=1].read_be_16() & 0b0000_1111_1111_1111;
        DescriptorBlock::read_with_len(&data[2..], length)
    }

    /// 記述子群のバイト列を返す。
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// 内包する記述子群のイテレーターを返す。
    #[inline]
    pub fn iter(&self) -> DescriptorIter<'a> {
        DescriptorIter(self.0)
    }

    /// 内包する記述子群から`T`のタグと一致する最初の記述子を読み取って返す。
    ///
    /// `T`のタグと一致する記述子がない場合は`Ok(None)`を返す。
    pub fn get<T: Descriptor<'a>>(&self) -> Result<Option<T>, DescriptorError> {
        self.iter()
            .find(|d| d.tag == T::TAG)
            .map(|d| T::read(d.payload))
            .transpose()
    }

    /// 内包する記述子群から`T`のタグと一致する記述子をすべて読み取って返す。
    pub fn get_all<T: Descriptor<'a>>(
        &self,
    ) -> impl Iterator<Item = Result<T, DescriptorError>> + 'a {
        self.iter()
            .filter(|d| d.tag == T::TAG)
            .map(|d| T::read(d.payload))
    }
}

impl<'a> fmt::Debug for DescriptorBlock<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("DescriptorBlock(")?;
        f.debug_list().entries(self).finish()?;
        f.write_str(")")
    }
}

impl<'a> IntoIterator for &DescriptorBlock<'a> {
    type Item = RawDescriptor<'a>;
    type IntoIter = DescriptorIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`DescriptorBlock`]のイテレーター。
///
/// 途中で記述子が途切れている場合はそこで終了する。
#[derive(Clone)]
pub struct DescriptorIter<'a>(&'a [u8]);

impl<'a> Iterator for DescriptorIter<'a> {
    type Item = RawDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        match RawDescriptor::read(self.0) {
            Ok((raw, tail)) => {
                self.0 = tail;
                Some(raw)
            }
            Err(_) => {
                self.0 = &[];
                None
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for DescriptorIter<'a> {}

impl<'a> fmt::Debug for DescriptorIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DescriptorIter(")?;
        f.debug_list().entries(self.clone()).finish()?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[derive(Debug, PartialEq, Eq)]
    struct Dummy(u16);

    impl Descriptor<'_> for Dummy {
        const TAG: u8 = 0xFE;

        fn read(data: &[u8]) -> Result<Dummy, DescriptorError> {
            Ok(Dummy(Payload::new("Dummy", data).be16("value", 0)?))
        }
    }

    #[test]
    fn test_payload() {
        let p = Payload::new("Test", &hex!("12 34 56 78 9A"));
        assert_eq!(p.len(), 5);
        assert_eq!(p.u8("a", 0), Ok(0x12));
        assert_eq!(p.be16("a", 1), Ok(0x3456));
        assert_eq!(p.be24("a", 2), Ok(0x56789A));
        assert_eq!(p.be32("a", 0), Ok(0x12345678));
        assert_eq!(p.bits("a", 0, 0xF0), Ok(0x1));
        assert_eq!(p.bits("a", 4, 0b0000_1110), Ok(0b101));
        assert_eq!(p.flag("a", 4, 0x80), Ok(true));
        assert_eq!(p.flag("a", 4, 0x01), Ok(false));
        assert_eq!(p.bcd("a", 0, 3), Ok(123));
        assert_eq!(p.rest(3), &hex!("78 9A"));
        assert!(p.rest(9).is_empty());
        assert_eq!(p.array::<2>("a", 3), Ok(&hex!("78 9A")));
    }

    #[test]
    fn test_payload_bounds() {
        let p = Payload::new("Test", &hex!("12 34 56"));
        assert_eq!(
            p.be32("value", 0),
            Err(DescriptorError::BoundsViolation {
                descriptor: "Test",
                field: "value",
                offset: 0,
                len: 4,
                available: 3,
            })
        );
        assert_matches!(p.u8("value", 3), Err(DescriptorError::BoundsViolation { .. }));
        assert_matches!(
            p.bytes("value", usize::MAX, 2),
            Err(DescriptorError::BoundsViolation { .. })
        );
        // 長さ0x05に対して2バイトしかない
        assert_matches!(
            Payload::new("Test", &hex!("05 41 42")).prefixed("text", 0),
            Err(DescriptorError::BoundsViolation { field: "text", .. })
        );
    }

    #[test]
    fn test_payload_prefixed_and_records() {
        let p = Payload::new("Test", &hex!("02 41 42 00 01 00 02 00"));
        let (text, next) = p.prefixed_text("text", 0).unwrap();
        assert_eq!(text.as_bytes(), b"AB");
        assert_eq!(next, 3);

        let records: Vec<_> = p.records("records", next, 2).collect();
        assert_eq!(records, [&hex!("00 01")[..], &hex!("00 02")[..]]);
    }

    #[test]
    fn test_raw_descriptor() {
        let data = hex!("FE 02 12 34 40 00");
        let (raw, rest) = RawDescriptor::read(&data).unwrap();
        assert_eq!(raw.tag, 0xFE);
        assert_eq!(raw.length(), 2);
        assert_eq!(rest, &hex!("40 00"));
        assert_eq!(raw.parse::<Dummy>(), Ok(Dummy(0x1234)));

        let (raw, _) = RawDescriptor::read(rest).unwrap();
        assert_eq!(
            raw.parse::<Dummy>(),
            Err(DescriptorError::TagMismatch {
                expected: 0xFE,
                actual: 0x40
            })
        );

        assert_matches!(
            RawDescriptor::read(&hex!("FE 04 12 34")),
            Err(DescriptorError::BoundsViolation {
                field: "payload",
                ..
            })
        );
        assert_matches!(RawDescriptor::read(&hex!("FE")), Err(_));
    }

    #[test]
    fn test_descriptor_block() {
        let data = hex!("F0 0B FE 02 12 34 40 00 FE 01 56 FE 02");
        let (block, rest) = DescriptorBlock::read(&data).unwrap();
        assert!(rest.is_empty());
        // 最後の記述子は途切れている
        assert_eq!(block.iter().count(), 3);
        assert_eq!(block.get::<Dummy>(), Ok(Some(Dummy(0x1234))));

        let all: Vec<_> = block.get_all::<Dummy>().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], Ok(Dummy(0x1234)));
        assert_matches!(all[1], Err(DescriptorError::BoundsViolation { .. }));

        let block = DescriptorBlock::new(&hex!("40 00"));
        assert_eq!(block.get::<Dummy>(), Ok(None));
        assert!(DescriptorBlock::read(&hex!("00 05 00")).is_none());
    }
}
