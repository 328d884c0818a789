//! ETSI EN 300 468で定義されている、定数を伴う型。

use std::fmt;

/// サービス形式種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceType(pub u8);

impl ServiceType {
    /// デジタルテレビサービス。
    pub const DIGITAL_TV: ServiceType = ServiceType(0x01);
    /// デジタルラジオサービス。
    pub const DIGITAL_RADIO: ServiceType = ServiceType(0x02);
    /// テレテキストサービス。
    pub const TELETEXT: ServiceType = ServiceType(0x03);
    /// NVOD参照サービス。
    pub const NVOD_REFERENCE: ServiceType = ServiceType(0x04);
    /// NVODタイムシフトサービス。
    pub const NVOD_TIME_SHIFTED: ServiceType = ServiceType(0x05);
    /// モザイクサービス。
    pub const MOSAIC: ServiceType = ServiceType(0x06);
    /// FMラジオサービス。
    pub const FM_RADIO: ServiceType = ServiceType(0x07);
    /// DVB SRMサービス。
    pub const DVB_SRM: ServiceType = ServiceType(0x08);
    /// 高度符号化デジタルラジオサービス。
    pub const ADVANCED_CODEC_RADIO: ServiceType = ServiceType(0x0A);
    /// データ放送サービス。
    pub const DATA_BROADCAST: ServiceType = ServiceType(0x0C);
    /// DVB MHPサービス。
    pub const DVB_MHP: ServiceType = ServiceType(0x10);
    /// MPEG-2 HDテレビサービス。
    pub const MPEG2_HD_TV: ServiceType = ServiceType(0x11);
    /// 高度符号化SDテレビサービス。
    pub const ADVANCED_CODEC_SD_TV: ServiceType = ServiceType(0x16);
    /// 高度符号化SD NVODタイムシフトサービス。
    pub const ADVANCED_CODEC_SD_NVOD_TIME_SHIFTED: ServiceType = ServiceType(0x17);
    /// 高度符号化SD NVOD参照サービス。
    pub const ADVANCED_CODEC_SD_NVOD_REFERENCE: ServiceType = ServiceType(0x18);
    /// 高度符号化HDテレビサービス。
    pub const ADVANCED_CODEC_HD_TV: ServiceType = ServiceType(0x19);
    /// 高度符号化HD NVODタイムシフトサービス。
    pub const ADVANCED_CODEC_HD_NVOD_TIME_SHIFTED: ServiceType = ServiceType(0x1A);
    /// 高度符号化HD NVOD参照サービス。
    pub const ADVANCED_CODEC_HD_NVOD_REFERENCE: ServiceType = ServiceType(0x1B);
    /// 高度符号化フレームコンパチブル3D HDテレビサービス。
    pub const ADVANCED_CODEC_3D_HD_TV: ServiceType = ServiceType(0x1C);
    /// HEVCテレビサービス。
    pub const HEVC_TV: ServiceType = ServiceType(0x1F);

    /// SD映像のテレビサービスかどうかを返す。
    #[inline]
    pub fn is_dtv(&self) -> bool {
        matches!(self.0, 0x01 | 0x04 | 0x05 | 0x16..=0x18)
    }

    /// 音声のみのサービスかどうかを返す。
    #[inline]
    pub fn is_digital_audio(&self) -> bool {
        matches!(self.0, 0x02 | 0x07 | 0x0A)
    }

    /// HD映像のテレビサービスかどうかを返す。
    #[inline]
    pub fn is_hdtv(&self) -> bool {
        matches!(self.0, 0x11 | 0x19..=0x1E)
    }

    /// UHD映像のテレビサービスかどうかを返す。
    #[inline]
    pub fn is_uhdtv(&self) -> bool {
        self.0 == 0x1F
    }

    /// テレテキストサービスかどうかを返す。
    #[inline]
    pub fn is_teletext(&self) -> bool {
        self.0 == 0x03
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dtv() {
            f.write_str("TV")
        } else if self.is_digital_audio() {
            f.write_str("Radio")
        } else if self.is_hdtv() {
            f.write_str("HDTV")
        } else if self.is_uhdtv() {
            f.write_str("UHDTV")
        } else if self.is_teletext() {
            f.write_str("Teletext")
        } else {
            write!(f, "Unknown 0x{:02x}", self.0)
        }
    }
}

/// プライベートデータ指定子。
///
/// 0x80以上のタグを持つ記述子の意味は、直前のプライベートデータ指定子記述子で決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrivateDataSpecifier(pub u32);

impl PrivateDataSpecifier {
    /// 指定なし。
    pub const NONE: PrivateDataSpecifier = PrivateDataSpecifier(0x0000_0000);
    /// BSkyB。
    pub const BSKYB: PrivateDataSpecifier = PrivateDataSpecifier(0x0000_0002);
    /// EACEM（欧州の論理チャンネル番号）。
    pub const EACEM: PrivateDataSpecifier = PrivateDataSpecifier(0x0000_0028);
    /// Freesat。
    pub const FREESAT: PrivateDataSpecifier = PrivateDataSpecifier(0x4653_4154);
}

/// 偏波。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Polarization {
    /// 水平。
    LinearHorizontal,
    /// 垂直。
    LinearVertical,
    /// 左旋。
    CircularLeft,
    /// 右旋。
    CircularRight,
}

impl Polarization {
    /// 2ビットの値から偏波を得る。
    #[inline]
    pub fn from_bits(bits: u8) -> Polarization {
        match bits & 0b11 {
            0b00 => Polarization::LinearHorizontal,
            0b01 => Polarization::LinearVertical,
            0b10 => Polarization::CircularLeft,
            _ => Polarization::CircularRight,
        }
    }

    /// 偏波を1文字で返す。
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarization::LinearHorizontal => "h",
            Polarization::LinearVertical => "v",
            Polarization::CircularLeft => "l",
            Polarization::CircularRight => "r",
        }
    }
}
