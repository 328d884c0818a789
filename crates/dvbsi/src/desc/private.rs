//! プライベートデータ指定子によって意味が決まる記述子の定義。
//!
//! 0x80以上のタグは事業者ごとに意味が異なるため、記述子群を走査する際は
//! 直前のプライベートデータ指定子に応じてどの型で読むかを決める必要がある。

use std::fmt;

use crate::lang::LangCode;
use crate::text::{DecodedText, DvbStr};
use crate::types::ServiceType;

use super::base::{Descriptor, DescriptorError, Payload};

/// 論理チャンネル番号の割り当て。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelNumber {
    /// サービス識別。
    pub service_id: u16,
    /// 受信機のチャンネル一覧に表示すべきであれば`true`。
    pub visible: bool,
    /// 論理チャンネル番号（10ビット）。
    pub channel_number: u16,
}

fn read_channel_numbers(
    name: &'static str,
    data: &[u8],
) -> Result<Vec<ChannelNumber>, DescriptorError> {
    Payload::new(name, data)
        .records("channels", 0, 4)
        .map(|chunk| {
            let r = Payload::new(name, chunk);
            Ok(ChannelNumber {
                service_id: r.be16("service_id", 0)?,
                visible: r.flag("visible_service_flag", 2, 0b1000_0000)?,
                channel_number: r.be16("logical_channel_number", 2)? & 0x03FF,
            })
        })
        .collect()
}

fn fmt_channel_numbers(f: &mut fmt::Formatter, channels: &[ChannelNumber]) -> fmt::Result {
    for (i, channel) in channels.iter().enumerate() {
        write!(f, "{}->{}", channel.service_id, channel.channel_number)?;
        if i + 1 < channels.len() {
            // 10件ごとに改行する
            if (i + 3) % 10 != 0 {
                f.write_str(", ")?;
            } else {
                f.write_str(",\n      ")?;
            }
        }
    }
    Ok(())
}

/// 論理チャンネル記述子（EACEM、英国Freeview等）。
#[derive(Debug, PartialEq, Eq)]
pub struct LogicalChannelDescriptor {
    /// チャンネル番号の割り当てを格納する配列。
    pub channels: Vec<ChannelNumber>,
}

impl Descriptor<'_> for LogicalChannelDescriptor {
    const TAG: u8 = 0x83;

    fn read(data: &[u8]) -> Result<LogicalChannelDescriptor, DescriptorError> {
        Ok(LogicalChannelDescriptor {
            channels: read_channel_numbers("LogicalChannelDescriptor", data)?,
        })
    }
}

impl fmt::Display for LogicalChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("UKChannelListDescriptor sid->chan_num: ")?;
        fmt_channel_numbers(f, &self.channels)
    }
}

/// HDサイマル放送論理チャンネル記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct SimulcastChannelDescriptor {
    /// チャンネル番号の割り当てを格納する配列。
    pub channels: Vec<ChannelNumber>,
}

impl Descriptor<'_> for SimulcastChannelDescriptor {
    const TAG: u8 = 0x88;

    fn read(data: &[u8]) -> Result<SimulcastChannelDescriptor, DescriptorError> {
        Ok(SimulcastChannelDescriptor {
            channels: read_channel_numbers("SimulcastChannelDescriptor", data)?,
        })
    }
}

impl fmt::Display for SimulcastChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("DVBSimulcastChannelDescriptor sid->chan_num: ")?;
        fmt_channel_numbers(f, &self.channels)
    }
}

/// BSkyBの論理チャンネル番号記述子におけるサービス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BskybService {
    /// サービス識別。
    pub service_id: u16,
    /// サービス形式種別。
    pub service_type: ServiceType,
    /// チャンネル識別。
    pub channel_id: u16,
    /// 論理チャンネル番号。
    pub logical_channel_number: u16,
    /// Sky独自の識別。
    pub sky_id: u16,
}

/// BSkyBの論理チャンネル番号記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct BskybLcnDescriptor {
    /// 地域識別を含む先頭2バイト。
    pub region_raw: u16,
    /// サービスを格納する配列。
    pub services: Vec<BskybService>,
}

impl BskybLcnDescriptor {
    /// 地域識別を返す。
    #[inline]
    pub fn region_id(&self) -> u16 {
        self.region_raw & 0x00FF
    }

    /// 同じ内容をOpenTVのチャンネル一覧の形式で表示するための[`OpenTvChannelList`]を返す。
    #[inline]
    pub fn opentv(&self) -> OpenTvChannelList<'_> {
        OpenTvChannelList(self)
    }
}

impl Descriptor<'_> for BskybLcnDescriptor {
    const TAG: u8 = 0xB1;

    fn read(data: &[u8]) -> Result<BskybLcnDescriptor, DescriptorError> {
        let p = Payload::new("BskybLcnDescriptor", data);
        let region_raw = p.be16("region_id", 0)?;
        let services = p
            .records("services", 2, 9)
            .map(|chunk| {
                let r = Payload::new("BskybLcnDescriptor", chunk);
                Ok(BskybService {
                    service_id: r.be16("service_id", 0)?,
                    service_type: ServiceType(r.u8("service_type", 2)?),
                    channel_id: r.be16("channel_id", 3)?,
                    logical_channel_number: r.be16("logical_channel_number", 5)?,
                    sky_id: r.be16("sky_id", 7)?,
                })
            })
            .collect::<Result<_, DescriptorError>>()?;

        Ok(BskybLcnDescriptor {
            region_raw,
            services,
        })
    }
}

impl fmt::Display for BskybLcnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BSkyB Logical Channel Number Descriptor (0x{:02x}) length({})",
            Self::TAG,
            2 + self.services.len() * 9
        )?;
        write!(
            f,
            "\n      RegionID ({}) (0x{:04x}) Raw (0x{:04x})",
            self.region_id(),
            self.region_id(),
            self.region_raw
        )?;
        for s in &self.services {
            write!(
                f,
                "\n        ServiceID ({}) (0x{:04x}) ServiceType (0x{:02x}) LCN ({}) U1(0x{:04x}) U2(0x{:04x}) ",
                s.service_id,
                s.service_id,
                s.service_type.0,
                s.logical_channel_number,
                s.channel_id,
                s.sky_id
            )?;
        }
        Ok(())
    }
}

/// OpenTVのチャンネル一覧として[`BskybLcnDescriptor`]を表示するための構造体。
///
/// [`BskybLcnDescriptor::opentv`]で生成する。
#[derive(Debug, Clone, Copy)]
pub struct OpenTvChannelList<'a>(&'a BskybLcnDescriptor);

impl fmt::Display for OpenTvChannelList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "OpenTV ChannelList Descriptor region: {} sid->chan_num(id): ",
            self.0.region_raw
        )?;
        for (i, s) in self.0.services.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}->{}({})",
                s.service_id, s.logical_channel_number, s.channel_id
            )?;
        }
        Ok(())
    }
}

/// Freesatの論理チャンネル番号記述子における地域ごとの番号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreesatLcn {
    /// 論理チャンネル番号（12ビット）。
    pub logical_channel_number: u16,
    /// 地域識別。
    pub region_id: u16,
}

/// Freesatの論理チャンネル番号記述子におけるサービス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreesatService {
    /// サービス識別。
    pub service_id: u16,
    /// チャンネル識別（15ビット）。
    pub channel_id: u16,
    /// 地域ごとの番号を格納する配列。
    pub lcns: Vec<FreesatLcn>,
}

/// Freesatの論理チャンネル番号記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct FreesatLcnDescriptor {
    /// サービスを格納する配列。
    pub services: Vec<FreesatService>,
    length: usize,
}

impl Descriptor<'_> for FreesatLcnDescriptor {
    const TAG: u8 = 0xD3;

    fn read(data: &[u8]) -> Result<FreesatLcnDescriptor, DescriptorError> {
        let p = Payload::new("FreesatLcnDescriptor", data);

        let mut services = Vec::new();
        let mut pos = 0;
        while pos < p.len() {
            let service_id = p.be16("service_id", pos)?;
            let channel_id = p.be16("channel_id", pos + 2)? & 0x7FFF;
            let lcn_len = p.u8("lcn_length", pos + 4)? as usize;
            let lcn_data = p.sub("lcns", pos + 5, lcn_len)?;
            let lcns = lcn_data
                .records("lcns", 0, 4)
                .map(|chunk| {
                    let r = Payload::new("FreesatLcnDescriptor", chunk);
                    Ok(FreesatLcn {
                        logical_channel_number: r.be16("logical_channel_number", 0)? & 0x0FFF,
                        region_id: r.be16("region_id", 2)?,
                    })
                })
                .collect::<Result<_, DescriptorError>>()?;
            pos += 5 + lcn_len;

            services.push(FreesatService {
                service_id,
                channel_id,
                lcns,
            });
        }

        Ok(FreesatLcnDescriptor {
            services,
            length: data.len(),
        })
    }
}

impl fmt::Display for FreesatLcnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Freesat Logical Channel Number Descriptor (0x{:02x}) length({})",
            Self::TAG,
            self.length
        )?;
        for s in &self.services {
            write!(
                f,
                "\n      ServiceID ({}) (0x{:04x}) ChanID (0x{:04x})",
                s.service_id, s.service_id, s.channel_id
            )?;
            for lcn in &s.lcns {
                write!(
                    f,
                    "\n        LCN: {:3} Region: {}",
                    lcn.logical_channel_number, lcn.region_id
                )?;
            }
        }
        Ok(())
    }
}

/// Freesatの地域記述子における地域。
#[derive(Debug, PartialEq, Eq)]
pub struct FreesatRegion<'a> {
    /// 地域識別。
    pub region_id: u16,
    /// 言語コード。
    pub lang_code: LangCode,
    /// 地域名。
    pub region_name: &'a DvbStr,
}

/// Freesatの地域記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct FreesatRegionDescriptor<'a> {
    /// 地域を格納する配列。
    pub regions: Vec<FreesatRegion<'a>>,
    length: usize,
}

impl<'a> Descriptor<'a> for FreesatRegionDescriptor<'a> {
    const TAG: u8 = 0xD4;

    fn read(data: &'a [u8]) -> Result<FreesatRegionDescriptor<'a>, DescriptorError> {
        let p = Payload::new("FreesatRegionDescriptor", data);

        let mut regions = Vec::new();
        let mut pos = 0;
        while pos < p.len() {
            let region_id = p.be16("region_id", pos)?;
            let lang_code = LangCode(*p.array("lang_code", pos + 2)?);
            let (region_name, next) = p.prefixed_text("region_name", pos + 5)?;
            pos = next;

            regions.push(FreesatRegion {
                region_id,
                lang_code,
                region_name,
            });
        }

        Ok(FreesatRegionDescriptor {
            regions,
            length: data.len(),
        })
    }
}

impl fmt::Display for FreesatRegionDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Freesat Region Descriptor (0x{:02x}) length({})",
            Self::TAG,
            self.length
        )?;
        for r in &self.regions {
            write!(
                f,
                "\n    Region ({:2}) ({}) '{}'",
                r.region_id,
                r.lang_code,
                r.region_name.display()
            )?;
        }
        Ok(())
    }
}

/// Freesatのコールサイン記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct FreesatCallsignDescriptor<'a> {
    /// 言語コード。
    pub lang_code: LangCode,
    /// コールサイン。
    pub callsign: &'a DvbStr,
}

impl FreesatCallsignDescriptor<'_> {
    /// コールサインを短縮名として復号する。
    ///
    /// 強調部分がなければ全体を復号する。
    #[inline]
    pub fn decode_callsign(&self) -> DecodedText {
        self.callsign.decode_short_name()
    }
}

impl<'a> Descriptor<'a> for FreesatCallsignDescriptor<'a> {
    const TAG: u8 = 0xD5;

    fn read(data: &'a [u8]) -> Result<FreesatCallsignDescriptor<'a>, DescriptorError> {
        let p = Payload::new("FreesatCallsignDescriptor", data);
        let lang_code = LangCode(*p.array("lang_code", 0)?);
        let (callsign, _) = p.prefixed_text("callsign", 3)?;

        Ok(FreesatCallsignDescriptor {
            lang_code,
            callsign,
        })
    }
}

impl fmt::Display for FreesatCallsignDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Freesat Callsign Descriptor (0x{:02x}) length({})  ({}) '{}'",
            Self::TAG,
            3 + 1 + self.callsign.len(),
            self.lang_code,
            self.decode_callsign()
        )
    }
}
