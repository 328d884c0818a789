//! ETSI EN 300 468で規定される記述子と関連する型の定義。

use std::fmt;

use indexmap::IndexMap;

use crate::category::{category_label, LabelId, ProgramCategory};
use crate::lang::{CountryCode, LangCode};
use crate::text::DvbStr;
use crate::time::{DateTime, TimeOffset};
use crate::types::{Polarization, PrivateDataSpecifier, ServiceType};
use crate::utils::BytesExt;

use super::base::{Descriptor, DescriptorError, Payload};

/// 内側符号化率を文字列で返す。
pub fn fec_inner_str(fec_inner: u8) -> &'static str {
    match fec_inner {
        0x1 => "1/2",
        0x2 => "2/3",
        0x3 => "3/4",
        0x4 => "5/6",
        0x5 => "7/8",
        0x6 => "8/9",
        0x7 => "3/5",
        0x8 => "4/5",
        0x9 => "9/10",
        0xF => "none",
        _ => "auto",
    }
}

/// ネットワーク名記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct NetworkNameDescriptor<'a> {
    /// ネットワーク名。
    pub network_name: &'a DvbStr,
}

impl<'a> Descriptor<'a> for NetworkNameDescriptor<'a> {
    const TAG: u8 = 0x40;

    fn read(data: &'a [u8]) -> Result<NetworkNameDescriptor<'a>, DescriptorError> {
        Ok(NetworkNameDescriptor {
            network_name: DvbStr::from_bytes(data),
        })
    }
}

impl fmt::Display for NetworkNameDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NetworkNameDescriptor: {}", self.network_name.display())
    }
}

/// サービスリスト記述子におけるサービス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceListEntry {
    /// サービス識別。
    pub service_id: u16,
    /// サービス形式種別。
    pub service_type: ServiceType,
}

/// サービスリスト記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ServiceListDescriptor {
    /// サービスを格納する配列。
    pub services: Vec<ServiceListEntry>,
}

impl Descriptor<'_> for ServiceListDescriptor {
    const TAG: u8 = 0x41;

    fn read(data: &[u8]) -> Result<ServiceListDescriptor, DescriptorError> {
        let p = Payload::new("ServiceListDescriptor", data);
        let services = p
            .records("services", 0, 3)
            .map(|chunk| {
                let r = Payload::new("ServiceListDescriptor", chunk);
                Ok(ServiceListEntry {
                    service_id: r.be16("service_id", 0)?,
                    service_type: ServiceType(r.u8("service_type", 2)?),
                })
            })
            .collect::<Result<_, DescriptorError>>()?;

        Ok(ServiceListDescriptor { services })
    }
}

impl fmt::Display for ServiceListDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ServiceListDescriptor:")?;
        for service in &self.services {
            write!(f, " {} ({})", service.service_id, service.service_type)?;
        }
        Ok(())
    }
}

/// 衛星分配システム記述子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatelliteDeliverySystemDescriptor {
    /// 周波数（単位は10kHz）。
    pub frequency: u32,
    /// 軌道位置（単位は0.1度）。
    pub orbital_position: u16,
    /// 東経であれば`true`。
    pub east: bool,
    /// 偏波。
    pub polarization: Polarization,
    /// ロールオフ率（2ビット）。
    pub roll_off: u8,
    /// DVB-S2であれば`true`。
    pub s2: bool,
    /// 変調（2ビット）。
    pub modulation_type: u8,
    /// シンボルレート（単位は100シンボル毎秒）。
    pub symbol_rate: u32,
    /// 内側符号化率（4ビット）。
    pub fec_inner: u8,
}

impl Descriptor<'_> for SatelliteDeliverySystemDescriptor {
    const TAG: u8 = 0x43;

    fn read(data: &[u8]) -> Result<SatelliteDeliverySystemDescriptor, DescriptorError> {
        let p = Payload::new("SatelliteDeliverySystemDescriptor", data);

        Ok(SatelliteDeliverySystemDescriptor {
            frequency: p.bcd("frequency", 0, 8)?,
            orbital_position: p.bcd("orbital_position", 4, 4)? as u16,
            east: p.flag("west_east_flag", 6, 0b1000_0000)?,
            polarization: Polarization::from_bits(p.bits("polarization", 6, 0b0110_0000)?),
            roll_off: p.bits("roll_off", 6, 0b0001_1000)?,
            s2: p.flag("modulation_system", 6, 0b0000_0100)?,
            modulation_type: p.bits("modulation_type", 6, 0b0000_0011)?,
            symbol_rate: p.bcd("symbol_rate", 7, 7)?,
            fec_inner: p.bits("fec_inner", 10, 0b0000_1111)?,
        })
    }
}

impl SatelliteDeliverySystemDescriptor {
    /// 周波数をkHzで返す。
    #[inline]
    pub fn frequency_khz(&self) -> u64 {
        self.frequency as u64 * 10
    }

    /// シンボルレートをシンボル毎秒で返す。
    #[inline]
    pub fn symbol_rate_hz(&self) -> u64 {
        self.symbol_rate as u64 * 100
    }

    /// 変調方式を文字列で返す。
    pub fn modulation_system_str(&self) -> &'static str {
        if self.s2 {
            "DVB-S2"
        } else {
            "DVB-S"
        }
    }

    /// 変調を文字列で返す。
    pub fn modulation_str(&self) -> &'static str {
        match self.modulation_type {
            0b01 => "qpsk",
            0b10 => "8psk",
            0b11 => "qam_16",
            _ => "auto",
        }
    }

    /// ロールオフ率を文字列で返す。
    pub fn roll_off_str(&self) -> &'static str {
        match self.roll_off {
            0b00 => "0.35",
            0b01 => "0.25",
            0b10 => "0.20",
            _ => "auto",
        }
    }

    /// 内側符号化率を文字列で返す。
    #[inline]
    pub fn fec_inner_str(&self) -> &'static str {
        fec_inner_str(self.fec_inner)
    }

    /// 軌道位置を`28.2E`のような文字列で返す。
    pub fn orbital_position_string(&self) -> String {
        format!(
            "{}.{}{}",
            self.orbital_position / 10,
            self.orbital_position % 10,
            if self.east { 'E' } else { 'W' }
        )
    }
}

impl fmt::Display for SatelliteDeliverySystemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "SatelliteDeliverySystemDescriptor: Frequency: {}, Type: {}",
            self.frequency_khz(),
            self.modulation_system_str()
        )?;
        write!(
            f,
            "      Mod={}, SymbR={}, FECInner={}, Orbit={}, Pol={}",
            self.modulation_str(),
            self.symbol_rate_hz(),
            self.fec_inner_str(),
            self.orbital_position_string(),
            self.polarization.as_str()
        )
    }
}

/// 有線分配システム記述子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CableDeliverySystemDescriptor {
    /// 周波数（単位は100Hz）。
    pub frequency: u32,
    /// 外側符号化率（4ビット）。
    pub fec_outer: u8,
    /// 変調。
    pub modulation: u8,
    /// シンボルレート（単位は100シンボル毎秒）。
    pub symbol_rate: u32,
    /// 内側符号化率（4ビット）。
    pub fec_inner: u8,
}

impl Descriptor<'_> for CableDeliverySystemDescriptor {
    const TAG: u8 = 0x44;

    fn read(data: &[u8]) -> Result<CableDeliverySystemDescriptor, DescriptorError> {
        let p = Payload::new("CableDeliverySystemDescriptor", data);

        Ok(CableDeliverySystemDescriptor {
            frequency: p.bcd("frequency", 0, 8)?,
            fec_outer: p.bits("fec_outer", 5, 0b0000_1111)?,
            modulation: p.u8("modulation", 6)?,
            symbol_rate: p.bcd("symbol_rate", 7, 7)?,
            fec_inner: p.bits("fec_inner", 10, 0b0000_1111)?,
        })
    }
}

impl CableDeliverySystemDescriptor {
    /// 周波数をHzで返す。
    #[inline]
    pub fn frequency_hz(&self) -> u64 {
        self.frequency as u64 * 100
    }

    /// シンボルレートをシンボル毎秒で返す。
    #[inline]
    pub fn symbol_rate_hz(&self) -> u64 {
        self.symbol_rate as u64 * 100
    }

    /// 変調を文字列で返す。
    pub fn modulation_str(&self) -> &'static str {
        match self.modulation {
            0x01 => "qam_16",
            0x02 => "qam_32",
            0x03 => "qam_64",
            0x04 => "qam_128",
            0x05 => "qam_256",
            _ => "auto",
        }
    }

    /// 外側符号化率を文字列で返す。
    pub fn fec_outer_str(&self) -> &'static str {
        match self.fec_outer {
            0x1 => "none",
            0x2 => "rs_204/188",
            _ => "auto",
        }
    }

    /// 内側符号化率を文字列で返す。
    #[inline]
    pub fn fec_inner_str(&self) -> &'static str {
        fec_inner_str(self.fec_inner)
    }
}

impl fmt::Display for CableDeliverySystemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "CableDeliverySystemDescriptor: Frequency: {}",
            self.frequency_hz()
        )?;
        write!(
            f,
            "      Mod={}, SymbR={}, FECInner={}, FECOuter={}",
            self.modulation_str(),
            self.symbol_rate_hz(),
            self.fec_inner_str(),
            self.fec_outer_str()
        )
    }
}

/// サービス記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ServiceDescriptor<'a> {
    /// サービス形式種別。
    pub service_type: ServiceType,
    /// 事業者名。
    pub service_provider_name: &'a DvbStr,
    /// サービス名。
    pub service_name: &'a DvbStr,
}

impl<'a> Descriptor<'a> for ServiceDescriptor<'a> {
    const TAG: u8 = 0x48;

    fn read(data: &'a [u8]) -> Result<ServiceDescriptor<'a>, DescriptorError> {
        let p = Payload::new("ServiceDescriptor", data);
        let service_type = ServiceType(p.u8("service_type", 0)?);
        let (service_provider_name, pos) = p.prefixed_text("service_provider_name", 1)?;
        let (service_name, _) = p.prefixed_text("service_name", pos)?;

        Ok(ServiceDescriptor {
            service_type,
            service_provider_name,
            service_name,
        })
    }
}

impl fmt::Display for ServiceDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ServiceDescriptor: {} provider({}) ({})",
            self.service_name.display(),
            self.service_provider_name.display(),
            self.service_type
        )
    }
}

/// リンク種別の名前（添字はリンク種別）。
static LINKAGE_TYPES: [&str; 14] = [
    "Reserved(0x00)",
    "Information Service",
    "EPG Service",
    "CA Replacement Service",
    "TS Containing Complete Network/Bouquet SI",
    "Service Replacement Service",
    "Data Broadcast Service",
    "RCS Map",
    "Mobile Hand-Over",
    "System Software Update Service",
    "TS Containing SSU, BAT or NIT",
    "IP/MAC Notification Service",
    "TS Containing INT, BAT or NIT",
    "Event Linkage",
];

/// リンク記述子のうち、移動受信のハンドオーバーに関する部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileHandOver {
    /// ハンドオーバー種別（4ビット）。
    pub hand_over_type: u8,
    /// 起点種別（NITであれば`false`、SDTであれば`true`）。
    pub origin_type: bool,
    /// ネットワーク識別。
    pub network_id: Option<u16>,
    /// 初期サービス識別。
    pub initial_service_id: Option<u16>,
}

impl MobileHandOver {
    /// 移動受信のハンドオーバーを表すリンク種別。
    pub const LINKAGE_TYPE: u8 = 0x08;

    /// 同一サービスへのハンドオーバー。
    pub const IDENTICAL: u8 = 0x01;
    /// 地域差し替えサービスへのハンドオーバー。
    pub const LOCAL_VARIATION: u8 = 0x02;
    /// 関連サービスへのハンドオーバー。
    pub const ASSOCIATED_SERVICE: u8 = 0x03;

    /// ハンドオーバー種別を文字列で返す。
    pub fn hand_over_type_str(&self) -> &'static str {
        match self.hand_over_type {
            Self::IDENTICAL => "Hand-Over to an Identical Service",
            Self::LOCAL_VARIATION => "Hand-Over to a Local Variation",
            Self::ASSOCIATED_SERVICE => "Hand-over to an Associated Service",
            _ => "Reserved",
        }
    }
}

/// リンク記述子のうち、イベントリンクに関する部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLinkage {
    /// リンク先のイベント識別。
    pub target_event_id: u16,
    /// リンク先がEITに掲載されていれば`true`。
    pub target_listed: bool,
    /// サイマル放送であれば`true`。
    pub event_simulcast: bool,
}

impl EventLinkage {
    /// イベントリンクを表すリンク種別。
    pub const LINKAGE_TYPE: u8 = 0x0D;
}

/// リンク記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct LinkageDescriptor<'a> {
    /// トランスポートストリーム識別。
    pub transport_stream_id: u16,
    /// オリジナルネットワーク識別。
    pub original_network_id: u16,
    /// サービス識別。
    pub service_id: u16,
    /// リンク種別。
    pub linkage_type: u8,
    /// リンク種別が移動受信のハンドオーバーの場合の情報。
    pub mobile_hand_over: Option<MobileHandOver>,
    /// リンク種別がイベントリンクの場合の情報。
    pub event_linkage: Option<EventLinkage>,
    /// プライベートデータ。
    pub private_data: &'a [u8],
}

impl LinkageDescriptor<'_> {
    /// リンク種別を文字列で返す。
    pub fn linkage_type_string(&self) -> String {
        match LINKAGE_TYPES.get(self.linkage_type as usize) {
            Some(name) => name.to_string(),
            None if self.linkage_type <= 0x7F => format!("Reserved(0x{:02x})", self.linkage_type),
            None => format!("User Defined(0x{:02x})", self.linkage_type),
        }
    }
}

impl<'a> Descriptor<'a> for LinkageDescriptor<'a> {
    const TAG: u8 = 0x4A;

    fn read(data: &'a [u8]) -> Result<LinkageDescriptor<'a>, DescriptorError> {
        let p = Payload::new("LinkageDescriptor", data);
        let transport_stream_id = p.be16("transport_stream_id", 0)?;
        let original_network_id = p.be16("original_network_id", 2)?;
        let service_id = p.be16("service_id", 4)?;
        let linkage_type = p.u8("linkage_type", 6)?;

        let mut pos = 7;
        let mut mobile_hand_over = None;
        let mut event_linkage = None;
        match linkage_type {
            MobileHandOver::LINKAGE_TYPE => {
                let hand_over_type = p.bits("hand_over_type", pos, 0b1111_0000)?;
                let origin_type = p.flag("origin_type", pos, 0b0000_0001)?;
                pos += 1;

                let network_id = if matches!(hand_over_type, 0x01..=0x03) {
                    pos += 2;
                    Some(p.be16("network_id", pos - 2)?)
                } else {
                    None
                };
                let initial_service_id = if !origin_type {
                    pos += 2;
                    Some(p.be16("initial_service_id", pos - 2)?)
                } else {
                    None
                };

                mobile_hand_over = Some(MobileHandOver {
                    hand_over_type,
                    origin_type,
                    network_id,
                    initial_service_id,
                });
            }
            EventLinkage::LINKAGE_TYPE => {
                event_linkage = Some(EventLinkage {
                    target_event_id: p.be16("target_event_id", pos)?,
                    target_listed: p.flag("target_listed", pos + 2, 0b1000_0000)?,
                    event_simulcast: p.flag("event_simulcast", pos + 2, 0b0100_0000)?,
                });
                pos += 3;
            }
            _ => {}
        }

        Ok(LinkageDescriptor {
            transport_stream_id,
            original_network_id,
            service_id,
            linkage_type,
            mobile_hand_over,
            event_linkage,
            private_data: p.rest(pos),
        })
    }
}

impl fmt::Display for LinkageDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LinkageDescriptor: tsid(0x{:04x}) onid(0x{:04x}) sid(0x{:04x}) type({})",
            self.transport_stream_id,
            self.original_network_id,
            self.service_id,
            self.linkage_type_string()
        )?;
        if let Some(hand_over) = &self.mobile_hand_over {
            write!(f, " hand_over({})", hand_over.hand_over_type_str())?;
            if let Some(network_id) = hand_over.network_id {
                write!(f, " nid(0x{:04x})", network_id)?;
            }
            if let Some(initial_service_id) = hand_over.initial_service_id {
                write!(f, " initial_sid(0x{:04x})", initial_service_id)?;
            }
        }
        if let Some(event) = &self.event_linkage {
            write!(
                f,
                " target_event_id(0x{:04x}) listed({}) simulcast({})",
                event.target_event_id, event.target_listed, event.event_simulcast
            )?;
        }
        Ok(())
    }
}

/// NVOD基準記述子における参照先。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvodReference {
    /// トランスポートストリーム識別。
    pub transport_stream_id: u16,
    /// オリジナルネットワーク識別。
    pub original_network_id: u16,
    /// サービス識別。
    pub service_id: u16,
}

/// NVOD基準記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct NvodReferenceDescriptor {
    /// 参照先を格納する配列。
    pub references: Vec<NvodReference>,
}

impl Descriptor<'_> for NvodReferenceDescriptor {
    const TAG: u8 = 0x4B;

    fn read(data: &[u8]) -> Result<NvodReferenceDescriptor, DescriptorError> {
        let p = Payload::new("NvodReferenceDescriptor", data);
        let references = p
            .records("references", 0, 6)
            .map(|chunk| {
                let r = Payload::new("NvodReferenceDescriptor", chunk);
                Ok(NvodReference {
                    transport_stream_id: r.be16("transport_stream_id", 0)?,
                    original_network_id: r.be16("original_network_id", 2)?,
                    service_id: r.be16("service_id", 4)?,
                })
            })
            .collect::<Result<_, DescriptorError>>()?;

        Ok(NvodReferenceDescriptor { references })
    }
}

impl fmt::Display for NvodReferenceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("NVODReferenceDescriptor ")?;
        for r in &self.references {
            write!(
                f,
                "transport_stream_id(0x{:x}) original_network_id(0x{:x}) service_id(0x{:x}) ",
                r.transport_stream_id, r.original_network_id, r.service_id
            )?;
        }
        Ok(())
    }
}

/// 短形式イベント記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ShortEventDescriptor<'a> {
    /// 言語コード。
    pub lang_code: LangCode,
    /// 番組名。
    pub event_name: &'a DvbStr,
    /// 番組記述。
    pub text: &'a DvbStr,
}

impl<'a> Descriptor<'a> for ShortEventDescriptor<'a> {
    const TAG: u8 = 0x4D;

    fn read(data: &'a [u8]) -> Result<ShortEventDescriptor<'a>, DescriptorError> {
        let p = Payload::new("ShortEventDescriptor", data);
        let lang_code = LangCode(*p.array("lang_code", 0)?);
        let (event_name, pos) = p.prefixed_text("event_name", 3)?;
        let (text, _) = p.prefixed_text("text", pos)?;

        Ok(ShortEventDescriptor {
            lang_code,
            event_name,
            text,
        })
    }
}

impl fmt::Display for ShortEventDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ShortEventDescriptor: lang({}) name({}) text({})",
            self.lang_code,
            self.event_name.display(),
            self.text.display()
        )
    }
}

/// 拡張形式イベント記述子における項目。
#[derive(Debug, PartialEq, Eq)]
pub struct ExtendedEventItem<'a> {
    /// 項目名。
    pub item_description: &'a DvbStr,
    /// 項目記述。
    pub item: &'a DvbStr,
}

/// 拡張形式イベント記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ExtendedEventDescriptor<'a> {
    /// 記述子番号（4ビット）。
    pub descriptor_number: u8,
    /// 最終記述子番号（4ビット）。
    pub last_descriptor_number: u8,
    /// 言語コード。
    pub lang_code: LangCode,
    /// 項目を格納する配列。
    pub items: Vec<ExtendedEventItem<'a>>,
    /// 拡張記述。
    pub text: &'a DvbStr,
}

impl<'a> Descriptor<'a> for ExtendedEventDescriptor<'a> {
    const TAG: u8 = 0x4E;

    fn read(data: &'a [u8]) -> Result<ExtendedEventDescriptor<'a>, DescriptorError> {
        let p = Payload::new("ExtendedEventDescriptor", data);
        let descriptor_number = p.bits("descriptor_number", 0, 0b1111_0000)?;
        let last_descriptor_number = p.bits("last_descriptor_number", 0, 0b0000_1111)?;
        let lang_code = LangCode(*p.array("lang_code", 1)?);
        let length_of_items = p.u8("length_of_items", 4)? as usize;
        let items_data = p.sub("items", 5, length_of_items)?;

        let mut items = Vec::new();
        let mut pos = 0;
        // 端数の1バイトは無視する
        while items_data.len() - pos >= 2 {
            let (item_description, next) = items_data.prefixed_text("item_description", pos)?;
            let (item, next) = items_data.prefixed_text("item", next)?;
            pos = next;

            items.push(ExtendedEventItem {
                item_description,
                item,
            });
        }

        let (text, _) = p.prefixed_text("text", 5 + length_of_items)?;

        Ok(ExtendedEventDescriptor {
            descriptor_number,
            last_descriptor_number,
            lang_code,
            items,
            text,
        })
    }
}

impl<'a> ExtendedEventDescriptor<'a> {
    /// 項目を復号し、項目名ごとに出現順で返す。
    ///
    /// 同じ項目名が複数ある場合は、その項目記述をすべて保持する。
    pub fn decoded_items(&self) -> IndexMap<String, Vec<String>> {
        let mut map = IndexMap::<String, Vec<String>>::new();
        for item in &self.items {
            map.entry(item.item_description.decode().into_string())
                .or_default()
                .push(item.item.decode().into_string());
        }
        map
    }
}

impl fmt::Display for ExtendedEventDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ExtendedEventDescriptor: {}/{} lang({})",
            self.descriptor_number, self.last_descriptor_number, self.lang_code
        )?;
        for (description, items) in self.decoded_items() {
            for item in items {
                write!(f, " {}({})", description, item)?;
            }
        }
        write!(f, " text({})", self.text.display())
    }
}

/// コンポーネント記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ComponentDescriptor<'a> {
    /// コンポーネント内容（4ビット）。
    pub stream_content: u8,
    /// コンポーネント種別。
    pub component_type: u8,
    /// コンポーネントタグ。
    pub component_tag: u8,
    /// 言語コード。
    pub lang_code: LangCode,
    /// コンポーネント記述。
    pub text: &'a DvbStr,
}

impl<'a> Descriptor<'a> for ComponentDescriptor<'a> {
    const TAG: u8 = 0x50;

    fn read(data: &'a [u8]) -> Result<ComponentDescriptor<'a>, DescriptorError> {
        let p = Payload::new("ComponentDescriptor", data);

        Ok(ComponentDescriptor {
            stream_content: p.bits("stream_content", 0, 0b0000_1111)?,
            component_type: p.u8("component_type", 1)?,
            component_tag: p.u8("component_tag", 2)?,
            lang_code: LangCode(*p.array("lang_code", 3)?),
            text: DvbStr::from_bytes(p.rest(6)),
        })
    }
}

impl ComponentDescriptor<'_> {
    /// 映像のコンポーネントかどうかを返す。
    #[inline]
    pub fn is_video(&self) -> bool {
        matches!(self.stream_content, 0x01 | 0x05 | 0x09)
    }

    /// 音声のコンポーネントかどうかを返す。
    #[inline]
    pub fn is_audio(&self) -> bool {
        matches!(self.stream_content, 0x02 | 0x04 | 0x06 | 0x07)
    }

    /// 字幕のコンポーネントかどうかを返す。
    #[inline]
    pub fn is_subtitle(&self) -> bool {
        self.stream_content == 0x03 && matches!(self.component_type, 0x10..=0x15 | 0x20..=0x25)
    }
}

impl fmt::Display for ComponentDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ComponentDescriptor: stream_content(0x{:x}) component_type(0x{:02x}) tag({}) lang({}) text({})",
            self.stream_content,
            self.component_type,
            self.component_tag,
            self.lang_code,
            self.text.display()
        )
    }
}

/// CA識別記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct CaIdentifierDescriptor {
    /// 限定受信方式識別を格納する配列。
    pub ca_system_ids: Vec<u16>,
}

impl Descriptor<'_> for CaIdentifierDescriptor {
    const TAG: u8 = 0x53;

    fn read(data: &[u8]) -> Result<CaIdentifierDescriptor, DescriptorError> {
        let p = Payload::new("CaIdentifierDescriptor", data);
        let ca_system_ids = p
            .records("ca_system_id", 0, 2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();

        Ok(CaIdentifierDescriptor { ca_system_ids })
    }
}

impl fmt::Display for CaIdentifierDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("CAIdentifierDescriptor ")?;
        for id in &self.ca_system_ids {
            write!(f, "ca_system_id(0x{:x}) ", id)?;
        }
        Ok(())
    }
}

/// コンテント記述子におけるジャンル。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentNibble {
    /// 大分類（上位4ビット）と中分類（下位4ビット）。
    pub nibble: u8,
    /// 事業者定義（8ビット）。
    pub user_byte: u8,
}

impl ContentNibble {
    /// 大分類を返す。
    #[inline]
    pub fn level1(&self) -> u8 {
        self.nibble >> 4
    }

    /// 中分類を返す。
    #[inline]
    pub fn level2(&self) -> u8 {
        self.nibble & 0x0F
    }

    /// 番組の大まかな種類を返す。
    #[inline]
    pub fn category(&self) -> ProgramCategory {
        ProgramCategory::from_nibble(self.nibble)
    }

    /// 分類名を返す。
    #[inline]
    pub fn label(&self) -> Option<LabelId> {
        category_label(self.nibble)
    }
}

/// コンテント記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct ContentDescriptor {
    /// ジャンルを格納する配列。
    pub nibbles: Vec<ContentNibble>,
}

impl Descriptor<'_> for ContentDescriptor {
    const TAG: u8 = 0x54;

    fn read(data: &[u8]) -> Result<ContentDescriptor, DescriptorError> {
        let p = Payload::new("ContentDescriptor", data);
        let nibbles = p
            .records("nibbles", 0, 2)
            .map(|chunk| ContentNibble {
                nibble: chunk[0],
                user_byte: chunk[1],
            })
            .collect();

        Ok(ContentDescriptor { nibbles })
    }
}

impl fmt::Display for ContentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ContentDescriptor: ")?;
        for nibble in &self.nibbles {
            write!(f, "{} : ", nibble.category())?;
            if let Some(label) = nibble.label() {
                write!(f, "{}", label)?;
            }
            f.write_str(", ")?;
        }
        Ok(())
    }
}

/// テレテキスト記述子におけるページ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeletextPage {
    /// 言語コード。
    pub lang_code: LangCode,
    /// テレテキスト種別（5ビット）。
    pub teletext_type: u8,
    /// マガジン番号（3ビット）。
    pub magazine_number: u8,
    /// ページ番号（二進化十進数）。
    pub page_number: u8,
}

/// テレテキスト記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct TeletextDescriptor {
    /// ページを格納する配列。
    pub pages: Vec<TeletextPage>,
}

impl Descriptor<'_> for TeletextDescriptor {
    const TAG: u8 = 0x56;

    fn read(data: &[u8]) -> Result<TeletextDescriptor, DescriptorError> {
        let p = Payload::new("TeletextDescriptor", data);
        let pages = p
            .records("pages", 0, 5)
            .map(|chunk| {
                let r = Payload::new("TeletextDescriptor", chunk);
                Ok(TeletextPage {
                    lang_code: LangCode(*r.array("lang_code", 0)?),
                    teletext_type: r.bits("teletext_type", 3, 0b1111_1000)?,
                    magazine_number: r.bits("magazine_number", 3, 0b0000_0111)?,
                    page_number: r.u8("page_number", 4)?,
                })
            })
            .collect::<Result<_, DescriptorError>>()?;

        Ok(TeletextDescriptor { pages })
    }
}

impl fmt::Display for TeletextDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Teletext Descriptor: {} pages", self.pages.len())?;
        for page in &self.pages {
            if self.pages.len() != 1 {
                f.write_str("\n ")?;
            }
            write!(
                f,
                "     type({}) mag({:x}) page({:02x}) lang({})",
                page.teletext_type, page.magazine_number, page.page_number, page.lang_code
            )?;
        }
        Ok(())
    }
}

/// ローカル時間オフセット記述子における地域ごとのオフセット。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTimeOffset {
    /// 国コード。
    pub country_code: CountryCode,
    /// 地域識別（6ビット）。
    pub country_region_id: u8,
    /// オフセットが負であれば`true`。
    pub negative: bool,
    /// 現在のオフセット。
    pub local_time_offset: TimeOffset,
    /// オフセットが変わる日時。
    pub time_of_change: DateTime,
    /// 変更後のオフセット。
    pub next_time_offset: TimeOffset,
}

impl LocalTimeOffset {
    /// 符号付きの現在のオフセットを分で返す。
    #[inline]
    pub fn offset_with_polarity(&self) -> i32 {
        Self::with_polarity(self.negative, &self.local_time_offset)
    }

    /// 符号付きの変更後のオフセットを分で返す。
    #[inline]
    pub fn next_offset_with_polarity(&self) -> i32 {
        Self::with_polarity(self.negative, &self.next_time_offset)
    }

    fn with_polarity(negative: bool, offset: &TimeOffset) -> i32 {
        if negative {
            -offset.as_minutes()
        } else {
            offset.as_minutes()
        }
    }
}

/// ローカル時間オフセット記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct LocalTimeOffsetDescriptor {
    /// 地域ごとのオフセットを格納する配列。
    pub offsets: Vec<LocalTimeOffset>,
}

impl Descriptor<'_> for LocalTimeOffsetDescriptor {
    const TAG: u8 = 0x58;

    fn read(data: &[u8]) -> Result<LocalTimeOffsetDescriptor, DescriptorError> {
        let p = Payload::new("LocalTimeOffsetDescriptor", data);
        let offsets = p
            .records("offsets", 0, 13)
            .map(|chunk| {
                let r = Payload::new("LocalTimeOffsetDescriptor", chunk);
                Ok(LocalTimeOffset {
                    country_code: CountryCode(*r.array("country_code", 0)?),
                    country_region_id: r.bits("country_region_id", 3, 0b1111_1100)?,
                    negative: r.flag("local_time_offset_polarity", 3, 0b0000_0001)?,
                    local_time_offset: TimeOffset::read(r.array("local_time_offset", 4)?),
                    time_of_change: DateTime::read(r.array("time_of_change", 6)?),
                    next_time_offset: TimeOffset::read(r.array("next_time_offset", 11)?),
                })
            })
            .collect::<Result<_, DescriptorError>>()?;

        Ok(LocalTimeOffsetDescriptor { offsets })
    }
}

impl fmt::Display for LocalTimeOffsetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("LocalTimeOffsetDescriptor ")?;
        for o in &self.offsets {
            write!(
                f,
                "country_code({}) country_region_id(0x{:x}) local_time_offset_with_polarity({}) \
                 time_of_change({}) next_time_offset_with_polarity({}) ",
                o.country_code,
                o.country_region_id,
                o.offset_with_polarity(),
                o.time_of_change,
                o.next_offset_with_polarity()
            )?;
        }
        Ok(())
    }
}

/// 地上分配システム記述子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrestrialDeliverySystemDescriptor {
    /// 中心周波数（単位は10Hz）。
    pub centre_frequency: u32,
    /// 帯域幅（3ビット）。
    pub bandwidth: u8,
    /// 階層伝送の高優先度であれば`true`。
    pub high_priority: bool,
    /// タイムスライシングを使用していなければ`true`。
    pub no_time_slicing: bool,
    /// MPE-FECを使用していなければ`true`。
    pub no_mpe_fec: bool,
    /// 変調（2ビット）。
    pub constellation: u8,
    /// 階層情報（3ビット）。
    pub hierarchy: u8,
    /// 高優先度ストリームの符号化率（3ビット）。
    pub code_rate_hp: u8,
    /// 低優先度ストリームの符号化率（3ビット）。
    pub code_rate_lp: u8,
    /// ガードインターバル（2ビット）。
    pub guard_interval: u8,
    /// 伝送モード（2ビット）。
    pub transmission_mode: u8,
    /// 他の周波数でも送信されていれば`true`。
    pub other_frequency: bool,
}

fn code_rate_str(code_rate: u8) -> &'static str {
    match code_rate {
        0b000 => "1/2",
        0b001 => "2/3",
        0b010 => "3/4",
        0b011 => "5/6",
        0b100 => "7/8",
        _ => "auto",
    }
}

impl Descriptor<'_> for TerrestrialDeliverySystemDescriptor {
    const TAG: u8 = 0x5A;

    fn read(data: &[u8]) -> Result<TerrestrialDeliverySystemDescriptor, DescriptorError> {
        let p = Payload::new("TerrestrialDeliverySystemDescriptor", data);

        Ok(TerrestrialDeliverySystemDescriptor {
            centre_frequency: p.be32("centre_frequency", 0)?,
            bandwidth: p.bits("bandwidth", 4, 0b1110_0000)?,
            high_priority: p.flag("priority", 4, 0b0001_0000)?,
            no_time_slicing: p.flag("time_slicing_indicator", 4, 0b0000_1000)?,
            no_mpe_fec: p.flag("mpe_fec_indicator", 4, 0b0000_0100)?,
            constellation: p.bits("constellation", 5, 0b1100_0000)?,
            hierarchy: p.bits("hierarchy_information", 5, 0b0011_1000)?,
            code_rate_hp: p.bits("code_rate_hp_stream", 5, 0b0000_0111)?,
            code_rate_lp: p.bits("code_rate_lp_stream", 6, 0b1110_0000)?,
            guard_interval: p.bits("guard_interval", 6, 0b0001_1000)?,
            transmission_mode: p.bits("transmission_mode", 6, 0b0000_0110)?,
            other_frequency: p.flag("other_frequency_flag", 6, 0b0000_0001)?,
        })
    }
}

impl TerrestrialDeliverySystemDescriptor {
    /// 中心周波数をHzで返す。
    #[inline]
    pub fn frequency_hz(&self) -> u64 {
        self.centre_frequency as u64 * 10
    }

    /// 帯域幅をMHz単位の文字列で返す。
    pub fn bandwidth_str(&self) -> &'static str {
        match self.bandwidth {
            0b000 => "8",
            0b001 => "7",
            0b010 => "6",
            0b011 => "5",
            _ => "auto",
        }
    }

    /// 変調を文字列で返す。
    pub fn constellation_str(&self) -> &'static str {
        match self.constellation {
            0b00 => "qpsk",
            0b01 => "qam_16",
            0b10 => "qam_64",
            _ => "auto",
        }
    }

    /// 階層情報を文字列で返す。
    pub fn hierarchy_str(&self) -> &'static str {
        match self.hierarchy & 0b011 {
            0b000 => "none",
            0b001 => "1",
            0b010 => "2",
            _ => "4",
        }
    }

    /// 高優先度ストリームの符号化率を文字列で返す。
    #[inline]
    pub fn code_rate_hp_str(&self) -> &'static str {
        code_rate_str(self.code_rate_hp)
    }

    /// 低優先度ストリームの符号化率を文字列で返す。
    #[inline]
    pub fn code_rate_lp_str(&self) -> &'static str {
        code_rate_str(self.code_rate_lp)
    }

    /// ガードインターバルを文字列で返す。
    pub fn guard_interval_str(&self) -> &'static str {
        match self.guard_interval {
            0b00 => "1/32",
            0b01 => "1/16",
            0b10 => "1/8",
            _ => "1/4",
        }
    }

    /// 伝送モードをFFTサイズ（k単位）の文字列で返す。
    pub fn transmission_mode_str(&self) -> &'static str {
        match self.transmission_mode {
            0b00 => "2",
            0b01 => "8",
            0b10 => "4",
            _ => "auto",
        }
    }
}

impl fmt::Display for TerrestrialDeliverySystemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "TerrestrialDeliverySystemDescriptor: Frequency: {}",
            self.frequency_hz()
        )?;
        write!(
            f,
            "      BW={}k, C={}, HP={}, LP={}, GI={}, TransMode={}k",
            self.bandwidth_str(),
            self.constellation_str(),
            self.code_rate_hp_str(),
            self.code_rate_lp_str(),
            self.guard_interval_str(),
            self.transmission_mode_str()
        )
    }
}

/// プライベートデータ指定子記述子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDataSpecifierDescriptor {
    /// プライベートデータ指定子。
    pub private_data_specifier: PrivateDataSpecifier,
}

impl Descriptor<'_> for PrivateDataSpecifierDescriptor {
    const TAG: u8 = 0x5F;

    fn read(data: &[u8]) -> Result<PrivateDataSpecifierDescriptor, DescriptorError> {
        let p = Payload::new("PrivateDataSpecifierDescriptor", data);

        Ok(PrivateDataSpecifierDescriptor {
            private_data_specifier: PrivateDataSpecifier(p.be32("private_data_specifier", 0)?),
        })
    }
}

impl fmt::Display for PrivateDataSpecifierDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PrivateDataSpecifierDescriptor: 0x{:08x}",
            self.private_data_specifier.0
        )
    }
}

/// 周波数リスト記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct FrequencyListDescriptor {
    /// 符号化種別（2ビット）。
    pub coding_type: u8,
    /// 符号化種別に従って符号化された周波数を格納する配列。
    pub frequencies: Vec<u32>,
}

impl FrequencyListDescriptor {
    /// 未定義。
    pub const CODING_UNDEFINED: u8 = 0b00;
    /// 衛星（単位は10kHzの二進化十進数）。
    pub const CODING_SATELLITE: u8 = 0b01;
    /// 有線（単位は100Hzの二進化十進数）。
    pub const CODING_CABLE: u8 = 0b10;
    /// 地上（単位は10Hz）。
    pub const CODING_TERRESTRIAL: u8 = 0b11;

    /// `frequency`を符号化種別に従いHzに変換する。
    pub fn to_hz(&self, frequency: u32) -> u64 {
        let bcd = || frequency.to_be_bytes()[..].read_bcd(8) as u64;
        match self.coding_type {
            Self::CODING_SATELLITE => bcd() * 10_000,
            Self::CODING_CABLE => bcd() * 100,
            Self::CODING_TERRESTRIAL => frequency as u64 * 10,
            _ => frequency as u64,
        }
    }

    /// 周波数をHzで返すイテレーターを返す。
    pub fn frequencies_hz(&self) -> impl Iterator<Item = u64> + '_ {
        self.frequencies.iter().map(|&f| self.to_hz(f))
    }
}

impl Descriptor<'_> for FrequencyListDescriptor {
    const TAG: u8 = 0x62;

    fn read(data: &[u8]) -> Result<FrequencyListDescriptor, DescriptorError> {
        let p = Payload::new("FrequencyListDescriptor", data);
        let coding_type = p.bits("coding_type", 0, 0b0000_0011)?;
        let frequencies = p
            .records("centre_frequency", 1, 4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(FrequencyListDescriptor {
            coding_type,
            frequencies,
        })
    }
}

impl fmt::Display for FrequencyListDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FrequencyListDescriptor: frequencies: ")?;
        for hz in self.frequencies_hz() {
            write!(f, " {}", hz)?;
        }
        Ok(())
    }
}

/// 部分トランスポートストリーム記述子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTransportStreamDescriptor {
    /// 最大伝送レート（22ビット、単位は400bps）。
    pub peak_rate: u32,
    /// 最小平滑化レート（22ビット、単位は400bps）。
    pub minimum_overall_smoothing_rate: u32,
    /// 最大平滑化バッファサイズ（14ビット、単位はバイト）。
    pub maximum_overall_smoothing_buffer: u16,
}

impl Descriptor<'_> for PartialTransportStreamDescriptor {
    const TAG: u8 = 0x63;

    fn read(data: &[u8]) -> Result<PartialTransportStreamDescriptor, DescriptorError> {
        let p = Payload::new("PartialTransportStreamDescriptor", data);

        Ok(PartialTransportStreamDescriptor {
            peak_rate: p.be24("peak_rate", 0)? & 0x3F_FFFF,
            minimum_overall_smoothing_rate: p.be24("minimum_overall_smoothing_rate", 3)?
                & 0x3F_FFFF,
            maximum_overall_smoothing_buffer: p.be16("maximum_overall_smoothing_buffer", 6)?
                & 0x3FFF,
        })
    }
}

impl fmt::Display for PartialTransportStreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PartialTransportStreamDescriptor peak_rate({}) min_overall_smooth_rate({}) \
             max_overall_smooth_buf({})",
            self.peak_rate, self.minimum_overall_smoothing_rate, self.maximum_overall_smoothing_buffer
        )
    }
}

/// データ放送記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct DataBroadcastDescriptor<'a> {
    /// データ放送識別。
    pub data_broadcast_id: u16,
    /// コンポーネントタグ。
    pub component_tag: u8,
    /// セレクタ。
    pub selector: &'a [u8],
    /// 言語コード。
    pub lang_code: LangCode,
    /// データ放送記述。
    pub text: &'a DvbStr,
}

impl<'a> Descriptor<'a> for DataBroadcastDescriptor<'a> {
    const TAG: u8 = 0x64;

    fn read(data: &'a [u8]) -> Result<DataBroadcastDescriptor<'a>, DescriptorError> {
        let p = Payload::new("DataBroadcastDescriptor", data);
        let data_broadcast_id = p.be16("data_broadcast_id", 0)?;
        let component_tag = p.u8("component_tag", 2)?;
        let (selector, pos) = p.prefixed("selector", 3)?;
        let lang_code = LangCode(*p.array("lang_code", pos)?);
        let (text, _) = p.prefixed_text("text", pos + 3)?;

        Ok(DataBroadcastDescriptor {
            data_broadcast_id,
            component_tag,
            selector,
            lang_code,
            text,
        })
    }
}

impl fmt::Display for DataBroadcastDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DataBroadcastDescriptor: data_broadcast_id({}) component_tag({}) selector(0x ",
            self.data_broadcast_id, self.component_tag
        )?;
        for b in self.selector {
            write!(f, "{:x} ", b)?;
        }
        write!(
            f,
            ") ISO_639_language_code({}) text({})",
            self.lang_code,
            self.text.display()
        )
    }
}

/// AC-3記述子。
#[derive(Debug, PartialEq, Eq)]
pub struct Ac3Descriptor<'a> {
    /// コンポーネント種別。
    pub component_type: Option<u8>,
    /// ビットストリーム識別。
    pub bsid: Option<u8>,
    /// 主音声識別。
    pub mainid: Option<u8>,
    /// 関連サービス。
    pub asvc: Option<u8>,
    /// 追加情報。
    pub additional_info: &'a [u8],
}

impl<'a> Descriptor<'a> for Ac3Descriptor<'a> {
    const TAG: u8 = 0x6A;

    fn read(data: &'a [u8]) -> Result<Ac3Descriptor<'a>, DescriptorError> {
        let p = Payload::new("Ac3Descriptor", data);
        let flags = p.u8("flags", 0)?;

        let mut pos = 1;
        let mut optional = |field: &'static str, mask: u8| -> Result<Option<u8>, DescriptorError> {
            if flags & mask == 0 {
                return Ok(None);
            }
            pos += 1;
            p.u8(field, pos - 1).map(Some)
        };
        let component_type = optional("component_type", 0b1000_0000)?;
        let bsid = optional("bsid", 0b0100_0000)?;
        let mainid = optional("mainid", 0b0010_0000)?;
        let asvc = optional("asvc", 0b0001_0000)?;

        Ok(Ac3Descriptor {
            component_type,
            bsid,
            mainid,
            asvc,
            additional_info: p.rest(pos),
        })
    }
}

impl fmt::Display for Ac3Descriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("AC3Descriptor ")?;
        if let Some(component_type) = self.component_type {
            write!(f, "component_type({}) ", component_type)?;
        }
        if let Some(bsid) = self.bsid {
            write!(f, "bsid(0x{:x}) ", bsid)?;
        }
        if let Some(mainid) = self.mainid {
            write!(f, "mainid(0x{:x}) ", mainid)?;
        }
        if let Some(asvc) = self.asvc {
            write!(f, "asvc({}) ", asvc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::base::RawDescriptor;
    use assert_matches::assert_matches;
    use hex_literal::hex;

    #[test]
    fn test_network_name() {
        let d = NetworkNameDescriptor::read(b"Freeview").unwrap();
        assert_eq!(d.network_name.decode(), "Freeview");
        assert_eq!(d.to_string(), "NetworkNameDescriptor: Freeview");
    }

    #[test]
    fn test_service_list() {
        let d = ServiceListDescriptor::read(&hex!("10 BF 01 10 C0 02")).unwrap();
        assert_eq!(
            d.services,
            [
                ServiceListEntry {
                    service_id: 0x10BF,
                    service_type: ServiceType::DIGITAL_TV,
                },
                ServiceListEntry {
                    service_id: 0x10C0,
                    service_type: ServiceType::DIGITAL_RADIO,
                },
            ]
        );
        assert_eq!(d.to_string(), "ServiceListDescriptor: 4287 (TV) 4288 (Radio)");
    }

    #[test]
    fn test_satellite_delivery_system() {
        let d = SatelliteDeliverySystemDescriptor::read(&hex!("01 17 57 25 02 82 A1 02 75 00 03"))
            .unwrap();
        assert_eq!(d.frequency_khz(), 11_757_250);
        assert_eq!(d.orbital_position_string(), "28.2E");
        assert_eq!(d.polarization, Polarization::LinearVertical);
        assert!(!d.s2);
        assert_eq!(d.symbol_rate_hz(), 27_500_000);
        assert_eq!(d.fec_inner_str(), "3/4");
        assert_eq!(
            d.to_string(),
            "SatelliteDeliverySystemDescriptor: Frequency: 11757250, Type: DVB-S\n      \
             Mod=qpsk, SymbR=27500000, FECInner=3/4, Orbit=28.2E, Pol=v"
        );

        assert_matches!(
            SatelliteDeliverySystemDescriptor::read(&hex!("01 17 57 25 02 82 A1 02 75 00")),
            Err(DescriptorError::BoundsViolation {
                field: "symbol_rate",
                offset: 7,
                ..
            })
        );
    }

    #[test]
    fn test_cable_delivery_system() {
        let d = CableDeliverySystemDescriptor::read(&hex!("03 12 00 00 FF F2 03 00 69 00 0F"))
            .unwrap();
        assert_eq!(d.frequency_hz(), 312_000_000);
        assert_eq!(d.symbol_rate_hz(), 6_900_000);
        assert_eq!(d.modulation_str(), "qam_64");
        assert_eq!(d.fec_outer_str(), "rs_204/188");
        assert_eq!(d.fec_inner_str(), "none");
        assert_eq!(
            d.to_string(),
            "CableDeliverySystemDescriptor: Frequency: 312000000\n      \
             Mod=qam_64, SymbR=6900000, FECInner=none, FECOuter=rs_204/188"
        );
    }

    #[test]
    fn test_service() {
        let d = ServiceDescriptor::read(&hex!("19 03 42 42 43 07 42 42 43 20 4F 6E 65")).unwrap();
        assert_eq!(d.service_type, ServiceType::ADVANCED_CODEC_HD_TV);
        assert_eq!(d.service_provider_name.decode(), "BBC");
        assert_eq!(d.service_name.decode(), "BBC One");
        assert_eq!(d.to_string(), "ServiceDescriptor: BBC One provider(BBC) (HDTV)");

        assert_matches!(
            ServiceDescriptor::read(&hex!("01 03 42 42 43 07 42")),
            Err(DescriptorError::BoundsViolation {
                field: "service_name",
                ..
            })
        );
    }

    #[test]
    fn test_linkage() {
        let d = LinkageDescriptor::read(&hex!("04 0D 23 3A 10 BF 09 AB CD")).unwrap();
        assert_eq!(d.transport_stream_id, 0x040D);
        assert_eq!(d.original_network_id, 0x233A);
        assert_eq!(d.service_id, 0x10BF);
        assert_eq!(d.linkage_type_string(), "System Software Update Service");
        assert_eq!(d.private_data, &hex!("AB CD"));
        assert_eq!(d.mobile_hand_over, None);

        // ハンドオーバー種別1、起点種別NIT
        let d = LinkageDescriptor::read(&hex!("00 01 00 02 00 03 08 10 30 00 00 04 FF")).unwrap();
        let hand_over = d.mobile_hand_over.as_ref().unwrap();
        assert_eq!(hand_over.hand_over_type_str(), "Hand-Over to an Identical Service");
        assert_eq!(hand_over.network_id, Some(0x3000));
        assert_eq!(hand_over.initial_service_id, Some(0x0004));
        assert_eq!(d.private_data, &hex!("FF"));

        let d = LinkageDescriptor::read(&hex!("00 01 00 02 00 03 0D 12 34 80")).unwrap();
        assert_eq!(
            d.event_linkage,
            Some(EventLinkage {
                target_event_id: 0x1234,
                target_listed: true,
                event_simulcast: false,
            })
        );
        assert!(d.private_data.is_empty());

        let d = LinkageDescriptor::read(&hex!("00 01 00 02 00 03 0E")).unwrap();
        assert_eq!(d.linkage_type_string(), "Reserved(0x0e)");
        let d = LinkageDescriptor::read(&hex!("00 01 00 02 00 03 80")).unwrap();
        assert_eq!(d.linkage_type_string(), "User Defined(0x80)");

        assert_matches!(
            LinkageDescriptor::read(&hex!("00 01 00 02 00 03 08 10 30")),
            Err(DescriptorError::BoundsViolation {
                field: "network_id",
                ..
            })
        );
    }

    #[test]
    fn test_nvod_reference() {
        let d = NvodReferenceDescriptor::read(&hex!("00 01 00 02 00 03 00 04 00 05 00 06")).unwrap();
        assert_eq!(d.references.len(), 2);
        assert_eq!(d.references[1].service_id, 6);
        assert_eq!(
            d.to_string(),
            "NVODReferenceDescriptor transport_stream_id(0x1) original_network_id(0x2) \
             service_id(0x3) transport_stream_id(0x4) original_network_id(0x5) service_id(0x6) "
        );
    }

    #[test]
    fn test_short_event() {
        let d = ShortEventDescriptor::read(&hex!("65 6E 67 04 4E 65 77 73 05 54 6F 64 61 79"))
            .unwrap();
        assert_eq!(d.lang_code, LangCode::ENG);
        assert_eq!(d.event_name.decode(), "News");
        assert_eq!(d.text.decode(), "Today");
        assert_eq!(
            d.to_string(),
            "ShortEventDescriptor: lang(eng) name(News) text(Today)"
        );

        assert_matches!(
            ShortEventDescriptor::read(&hex!("65 6E 67 09 4E 65 77 73")),
            Err(DescriptorError::BoundsViolation {
                field: "event_name",
                ..
            })
        );
    }

    #[test]
    fn test_extended_event() {
        let d = ExtendedEventDescriptor::read(&hex!(
            "
            12 65 6E 67 16
            08 44 69 72 65 63 74 6F 72 01 41
            08 44 69 72 65 63 74 6F 72 01 42
            04 54 65 78 74
            "
        ))
        .unwrap();
        assert_eq!(d.descriptor_number, 1);
        assert_eq!(d.last_descriptor_number, 2);
        assert_eq!(d.items.len(), 2);
        assert_eq!(d.text.decode(), "Text");

        let items = d.decoded_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items["Director"], ["A", "B"]);
        assert_eq!(
            d.to_string(),
            "ExtendedEventDescriptor: 1/2 lang(eng) Director(A) Director(B) text(Text)"
        );

        assert_matches!(
            ExtendedEventDescriptor::read(&hex!("12 65 6E 67 04 08 44 69 72 00")),
            Err(DescriptorError::BoundsViolation {
                field: "item_description",
                ..
            })
        );
    }

    #[test]
    fn test_component() {
        let d = ComponentDescriptor::read(&hex!("F3 10 05 65 6E 67 53 75 62 73")).unwrap();
        assert_eq!(d.stream_content, 0x03);
        assert!(d.is_subtitle());
        assert!(!d.is_video());
        assert_eq!(d.component_tag, 5);
        assert_eq!(d.text.decode(), "Subs");
    }

    #[test]
    fn test_ca_identifier() {
        let d = CaIdentifierDescriptor::read(&hex!("09 63 18 10")).unwrap();
        assert_eq!(d.ca_system_ids, [0x0963, 0x1810]);
        assert_eq!(
            d.to_string(),
            "CAIdentifierDescriptor ca_system_id(0x963) ca_system_id(0x1810) "
        );
    }

    #[test]
    fn test_content() {
        let d = ContentDescriptor::read(&hex!("14 00 43 00 C5 00")).unwrap();
        assert_eq!(d.nibbles.len(), 3);
        assert_eq!(d.nibbles[0].level1(), 1);
        assert_eq!(d.nibbles[0].level2(), 4);
        assert_eq!(d.nibbles[0].category(), ProgramCategory::Movie);
        assert_eq!(d.nibbles[1].category(), ProgramCategory::Sports);
        assert_eq!(d.nibbles[2].label(), None);
        assert_eq!(
            d.to_string(),
            "ContentDescriptor: movie : Movie - Comedy, sports : Football (Soccer), tvshow : , "
        );
    }

    #[test]
    fn test_teletext() {
        let d = TeletextDescriptor::read(&hex!("65 6E 67 09 00")).unwrap();
        assert_eq!(d.pages[0].teletext_type, 1);
        assert_eq!(d.pages[0].magazine_number, 1);
        assert_eq!(
            d.to_string(),
            "Teletext Descriptor: 1 pages     type(1) mag(1) page(00) lang(eng)"
        );
    }

    #[test]
    fn test_local_time_offset() {
        let d = LocalTimeOffsetDescriptor::read(&hex!("47 42 52 02 00 00 C0 79 01 00 00 01 00"))
            .unwrap();
        let o = &d.offsets[0];
        assert_eq!(o.country_code, CountryCode::GBR);
        assert_eq!(o.country_region_id, 0);
        assert_eq!(o.offset_with_polarity(), 0);
        assert_eq!(o.next_offset_with_polarity(), 60);
        assert_eq!(o.time_of_change.to_string(), "1993-10-13 01:00:00");

        let d = LocalTimeOffsetDescriptor::read(&hex!("47 42 52 07 01 30 C0 79 01 00 00 01 00"))
            .unwrap();
        assert_eq!(d.offsets[0].country_region_id, 1);
        assert_eq!(d.offsets[0].offset_with_polarity(), -90);
    }

    #[test]
    fn test_terrestrial_delivery_system() {
        let d = TerrestrialDeliverySystemDescriptor::read(&hex!("02 D3 44 40 1F 8A 21 FF FF FF FF"))
            .unwrap();
        assert_eq!(d.frequency_hz(), 474_000_000);
        assert_eq!(d.bandwidth_str(), "8");
        assert_eq!(d.constellation_str(), "qam_64");
        assert_eq!(d.code_rate_hp_str(), "3/4");
        assert_eq!(d.code_rate_lp_str(), "2/3");
        assert_eq!(d.guard_interval_str(), "1/32");
        assert_eq!(d.transmission_mode_str(), "2");
        assert!(d.other_frequency);
        assert_eq!(
            d.to_string(),
            "TerrestrialDeliverySystemDescriptor: Frequency: 474000000\n      \
             BW=8k, C=qam_64, HP=3/4, LP=2/3, GI=1/32, TransMode=2k"
        );
    }

    #[test]
    fn test_private_data_specifier() {
        let d = PrivateDataSpecifierDescriptor::read(&hex!("46 53 41 54")).unwrap();
        assert_eq!(d.private_data_specifier, PrivateDataSpecifier::FREESAT);
    }

    #[test]
    fn test_frequency_list() {
        let d = FrequencyListDescriptor::read(&hex!("FF 02 D3 44 40 03 28 B7 40")).unwrap();
        assert_eq!(d.coding_type, FrequencyListDescriptor::CODING_TERRESTRIAL);
        assert_eq!(d.frequencies_hz().collect::<Vec<_>>(), [474_000_000, 530_000_000]);
        assert_eq!(
            d.to_string(),
            "FrequencyListDescriptor: frequencies:  474000000 530000000"
        );

        let d = FrequencyListDescriptor::read(&hex!("FD 01 17 57 25")).unwrap();
        assert_eq!(d.frequencies_hz().collect::<Vec<_>>(), [11_757_250_000]);
        let d = FrequencyListDescriptor::read(&hex!("FE 03 12 00 00")).unwrap();
        assert_eq!(d.frequencies_hz().collect::<Vec<_>>(), [312_000_000]);
    }

    #[test]
    fn test_partial_transport_stream() {
        let d = PartialTransportStreamDescriptor::read(&hex!("C0 30 D4 FF FF FF C0 10")).unwrap();
        assert_eq!(d.peak_rate, 0x0030D4);
        assert_eq!(d.minimum_overall_smoothing_rate, 0x3F_FFFF);
        assert_eq!(d.maximum_overall_smoothing_buffer, 0x0010);
    }

    #[test]
    fn test_data_broadcast() {
        let d = DataBroadcastDescriptor::read(&hex!("01 06 0A 02 AB CD 65 6E 67 03 4D 48 50"))
            .unwrap();
        assert_eq!(d.data_broadcast_id, 0x0106);
        assert_eq!(d.component_tag, 10);
        assert_eq!(d.selector, &hex!("AB CD"));
        assert_eq!(d.text.decode(), "MHP");
        assert_eq!(
            d.to_string(),
            "DataBroadcastDescriptor: data_broadcast_id(262) component_tag(10) \
             selector(0x ab cd ) ISO_639_language_code(eng) text(MHP)"
        );
    }

    #[test]
    fn test_ac3() {
        let d = Ac3Descriptor::read(&hex!("C0 42 08 EE")).unwrap();
        assert_eq!(d.component_type, Some(0x42));
        assert_eq!(d.bsid, Some(0x08));
        assert_eq!(d.mainid, None);
        assert_eq!(d.additional_info, &hex!("EE"));
        assert_eq!(d.to_string(), "AC3Descriptor component_type(66) bsid(0x8) ");

        assert_matches!(
            Ac3Descriptor::read(&hex!("10")),
            Err(DescriptorError::BoundsViolation { field: "asvc", .. })
        );
    }

    #[test]
    fn test_parse_raw() {
        let (raw, _) = RawDescriptor::read(&hex!("4D 0A 65 6E 67 02 48 69 03 61 62 63")).unwrap();
        let d: ShortEventDescriptor = raw.parse().unwrap();
        assert_eq!(d.event_name.decode(), "Hi");
        assert_matches!(
            raw.parse::<NetworkNameDescriptor>(),
            Err(DescriptorError::TagMismatch {
                expected: 0x40,
                actual: 0x4D
            })
        );
    }
}
