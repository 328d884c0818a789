//! 記述子で使用される言語コードと国コード。

use std::fmt;

/// ISO 639-2で規定される3文字の言語コード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LangCode(pub [u8; 3]);

impl LangCode {
    /// 英語。
    pub const ENG: LangCode = LangCode(*b"eng");
    /// ドイツ語。
    pub const DEU: LangCode = LangCode(*b"deu");
    /// ドイツ語（書誌コード）。
    pub const GER: LangCode = LangCode(*b"ger");
    /// フランス語。
    pub const FRA: LangCode = LangCode(*b"fra");
    /// フランス語（書誌コード）。
    pub const FRE: LangCode = LangCode(*b"fre");
    /// イタリア語。
    pub const ITA: LangCode = LangCode(*b"ita");
    /// スペイン語。
    pub const SPA: LangCode = LangCode(*b"spa");
    /// オランダ語。
    pub const NLD: LangCode = LangCode(*b"nld");
    /// ウェールズ語。
    pub const CYM: LangCode = LangCode(*b"cym");
    /// ゲール語。
    pub const GLA: LangCode = LangCode(*b"gla");
    /// 言語未定。
    pub const UND: LangCode = LangCode(*b"und");

    /// `data`の先頭3バイトを言語コードとして読み取る。
    ///
    /// `data`が3バイトに満たない場合は`None`を返す。
    #[inline]
    pub fn read(data: &[u8]) -> Option<LangCode> {
        Some(LangCode(data.get(..3)?.try_into().ok()?))
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0.escape_ascii(), f)
    }
}

/// ISO 3166で規定される3文字の国コード。
///
/// ローカル時間オフセット記述子では国コードの代わりに地域グループを表す
/// 3桁の数字（`900`～`999`）が入ることもある。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode(pub [u8; 3]);

impl CountryCode {
    /// イギリス。
    pub const GBR: CountryCode = CountryCode(*b"GBR");
    /// ドイツ。
    pub const DEU: CountryCode = CountryCode(*b"DEU");
    /// フランス。
    pub const FRA: CountryCode = CountryCode(*b"FRA");

    /// `data`の先頭3バイトを国コードとして読み取る。
    #[inline]
    pub fn read(data: &[u8]) -> Option<CountryCode> {
        Some(CountryCode(data.get(..3)?.try_into().ok()?))
    }

    /// 地域グループを表す数字の国コードかどうかを返す。
    pub fn is_region_group(&self) -> bool {
        self.0[0] == b'9' && self.0.iter().all(u8::is_ascii_digit)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0.escape_ascii(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code() {
        assert_eq!(LangCode::read(b"engX"), Some(LangCode::ENG));
        assert_eq!(LangCode::read(b"en"), None);
        assert_eq!(LangCode::ENG.to_string(), "eng");
        assert_eq!(LangCode([b'e', 0x01, b'g']).to_string(), "e\\x01g");
    }

    #[test]
    fn test_country_code() {
        assert_eq!(CountryCode::read(b"GBR"), Some(CountryCode::GBR));
        assert!(!CountryCode::GBR.is_region_group());
        assert!(CountryCode(*b"902").is_region_group());
        assert!(!CountryCode(*b"102").is_region_group());
    }
}
