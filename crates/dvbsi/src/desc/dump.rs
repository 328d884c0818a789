//! 記述子を診断用に表示するための型。

use std::fmt;

use crate::types::PrivateDataSpecifier;

use super::base::{Descriptor, DescriptorBlock, RawDescriptor};
use super::dvb::*;
use super::private::*;

macro_rules! dispatch {
    ($f:expr, $raw:expr, $($ty:ident),+ $(,)?) => {
        $(
            if $raw.tag == $ty::TAG {
                return render::<$ty>($f, $raw);
            }
        )+
    };
}

fn render<'a, T>(f: &mut fmt::Formatter, raw: &RawDescriptor<'a>) -> fmt::Result
where
    T: Descriptor<'a> + fmt::Display,
{
    match T::read(raw.payload) {
        Ok(desc) => fmt::Display::fmt(&desc, f),
        Err(e) => write!(
            f,
            "Invalid descriptor (0x{:02x}) length({}): {}",
            raw.tag,
            raw.length(),
            e
        ),
    }
}

/// 記述子を1つ表示するための、[`Display`][`fmt::Display`]を実装した構造体。
///
/// 0x80以上のタグは`specifier`に従って解釈する。
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
    raw: RawDescriptor<'a>,
    specifier: PrivateDataSpecifier,
}

impl<'a> Dump<'a> {
    /// プライベートデータ指定子`specifier`の下にある記述子`raw`の`Dump`を生成する。
    #[inline]
    pub fn new(raw: RawDescriptor<'a>, specifier: PrivateDataSpecifier) -> Dump<'a> {
        Dump { raw, specifier }
    }

    fn fmt_private(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let raw = &self.raw;
        match self.specifier {
            PrivateDataSpecifier::BSKYB => {
                dispatch!(f, raw, BskybLcnDescriptor);
            }
            PrivateDataSpecifier::FREESAT => {
                dispatch!(
                    f,
                    raw,
                    FreesatLcnDescriptor,
                    FreesatRegionDescriptor,
                    FreesatCallsignDescriptor,
                );
            }
            // 指定子を省略する放送事業者も多いため、それ以外はEACEMとして扱う
            _ => {
                dispatch!(f, raw, LogicalChannelDescriptor, SimulcastChannelDescriptor);
            }
        }
        fmt_unknown(f, raw)
    }
}

fn fmt_unknown(f: &mut fmt::Formatter, raw: &RawDescriptor) -> fmt::Result {
    write!(
        f,
        "Unknown descriptor (0x{:02x}) length({})",
        raw.tag,
        raw.length()
    )?;
    if !raw.payload.is_empty() {
        f.write_str(" 0x")?;
        for b in raw.payload {
            write!(f, "{:02x}", b)?;
        }
    }
    Ok(())
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let raw = &self.raw;
        if raw.tag >= 0x80 {
            return self.fmt_private(f);
        }

        dispatch!(
            f,
            raw,
            NetworkNameDescriptor,
            ServiceListDescriptor,
            SatelliteDeliverySystemDescriptor,
            CableDeliverySystemDescriptor,
            ServiceDescriptor,
            LinkageDescriptor,
            NvodReferenceDescriptor,
            ShortEventDescriptor,
            ExtendedEventDescriptor,
            ComponentDescriptor,
            CaIdentifierDescriptor,
            ContentDescriptor,
            TeletextDescriptor,
            LocalTimeOffsetDescriptor,
            TerrestrialDeliverySystemDescriptor,
            PrivateDataSpecifierDescriptor,
            FrequencyListDescriptor,
            PartialTransportStreamDescriptor,
            DataBroadcastDescriptor,
            Ac3Descriptor,
        );
        fmt_unknown(f, raw)
    }
}

/// 記述子群を1行に1つずつ表示するための構造体。
#[derive(Debug, Clone)]
pub struct BlockDump<'a> {
    block: DescriptorBlock<'a>,
    specifier: PrivateDataSpecifier,
}

impl<'a> BlockDump<'a> {
    /// 記述子群より前に現れたプライベートデータ指定子を`specifier`として設定する。
    #[inline]
    pub fn with_specifier(mut self, specifier: PrivateDataSpecifier) -> BlockDump<'a> {
        self.specifier = specifier;
        self
    }
}

impl fmt::Display for BlockDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut specifier = self.specifier;
        for (i, raw) in self.block.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if let Ok(pds) = raw.parse::<PrivateDataSpecifierDescriptor>() {
                specifier = pds.private_data_specifier;
            }
            fmt::Display::fmt(&Dump::new(raw, specifier), f)?;
        }
        Ok(())
    }
}

impl<'a> DescriptorBlock<'a> {
    /// 内包する記述子群を表示するための[`BlockDump`]を返す。
    ///
    /// プライベートデータ指定子記述子が現れると、以降の0x80以上のタグはその指定子に従って解釈される。
    #[inline]
    pub fn dump(&self) -> BlockDump<'a> {
        BlockDump {
            block: self.clone(),
            specifier: PrivateDataSpecifier::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn dump(data: &[u8], specifier: PrivateDataSpecifier) -> String {
        let (raw, _) = RawDescriptor::read(data).unwrap();
        Dump::new(raw, specifier).to_string()
    }

    #[test]
    fn test_dump_standard() {
        assert_eq!(
            dump(&hex!("53 02 09 63"), PrivateDataSpecifier::NONE),
            "CAIdentifierDescriptor ca_system_id(0x963) "
        );
        assert_eq!(
            dump(&hex!("40 03 42 42 43"), PrivateDataSpecifier::NONE),
            "NetworkNameDescriptor: BBC"
        );
    }

    #[test]
    fn test_dump_unknown() {
        assert_eq!(
            dump(&hex!("7F 02 AB CD"), PrivateDataSpecifier::NONE),
            "Unknown descriptor (0x7f) length(2) 0xabcd"
        );
        assert_eq!(
            dump(&hex!("C0 00"), PrivateDataSpecifier::NONE),
            "Unknown descriptor (0xc0) length(0)"
        );
    }

    #[test]
    fn test_dump_invalid() {
        assert_eq!(
            dump(&hex!("44 02 03 12"), PrivateDataSpecifier::NONE),
            "Invalid descriptor (0x44) length(2): \
             CableDeliverySystemDescriptor::frequency: 4 bytes at offset 0 exceed 2 bytes"
        );
    }

    #[test]
    fn test_dump_private() {
        let lcn = hex!("83 04 10 BF FC 01");
        assert_eq!(
            dump(&lcn, PrivateDataSpecifier::EACEM),
            "UKChannelListDescriptor sid->chan_num: 4287->1"
        );
        assert_eq!(
            dump(&lcn, PrivateDataSpecifier::NONE),
            "UKChannelListDescriptor sid->chan_num: 4287->1"
        );
        assert_eq!(
            dump(&lcn, PrivateDataSpecifier::FREESAT),
            "Unknown descriptor (0x83) length(4) 0x10bffc01"
        );

        let callsign = hex!("D5 07 65 6E 67 03 49 54 56");
        assert_eq!(
            dump(&callsign, PrivateDataSpecifier::FREESAT),
            "Freesat Callsign Descriptor (0xd5) length(7)  (eng) 'ITV'"
        );
        assert_eq!(
            dump(&callsign, PrivateDataSpecifier::BSKYB),
            "Unknown descriptor (0xd5) length(7) 0x656e6703495456"
        );
    }

    #[test]
    fn test_block_dump() {
        let data = hex!(
            "
            83 04 10 BF FC 01
            5F 04 46 53 41 54
            83 04 10 BF FC 01
            D5 07 65 6E 67 03 49 54 56
            "
        );
        let block = DescriptorBlock::new(&data);
        assert_eq!(
            block.dump().to_string(),
            "UKChannelListDescriptor sid->chan_num: 4287->1\n\
             PrivateDataSpecifierDescriptor: 0x46534154\n\
             Unknown descriptor (0x83) length(4) 0x10bffc01\n\
             Freesat Callsign Descriptor (0xd5) length(7)  (eng) 'ITV'"
        );

        assert_eq!(
            block
                .dump()
                .with_specifier(PrivateDataSpecifier::FREESAT)
                .to_string()
                .lines()
                .next(),
            Some("Unknown descriptor (0x83) length(4) 0x10bffc01")
        );
        assert_eq!(DescriptorBlock::new(&[]).dump().to_string(), "");
    }
}
