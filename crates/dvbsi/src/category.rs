//! コンテント記述子のジャンルに対応する分類名。
//!
//! 分類名の表はコンパイル時に構築され、実行中に変更されることはない。
//! 各言語への翻訳は[`LabelId`]をキーとして利用者側で行う。

use std::fmt;

/// ジャンル（`content_nibble_level_1`と`content_nibble_level_2`の組）と分類名の対応。
const ENTRIES: [(u8, &str); 80] = [
    (0x10, "Movie"),
    (0x11, "Movie - Detective/Thriller"),
    (0x12, "Movie - Adventure/Western/War"),
    (0x13, "Movie - Science Fiction/Fantasy/Horror"),
    (0x14, "Movie - Comedy"),
    (0x15, "Movie - Soap/melodrama/folkloric"),
    (0x16, "Movie - Romance"),
    (0x17, "Movie - Serious/Classical/Religious/Historical Movie/Drama"),
    (0x18, "Movie - Adult Movie"),
    (0x20, "News"),
    (0x21, "News/weather report"),
    (0x22, "News magazine"),
    (0x23, "Documentary"),
    (0x24, "Intelligent Programs"),
    (0x30, "Entertainment"),
    (0x31, "Game Show"),
    (0x32, "Variety Show"),
    (0x33, "Talk Show"),
    (0x40, "Sports"),
    (0x41, "Special Events (World Cup, World Series, etc)"),
    (0x42, "Sports Magazines"),
    (0x43, "Football (Soccer)"),
    (0x44, "Tennis/Squash"),
    (0x45, "Misc. Team Sports"),
    (0x46, "Athletics"),
    (0x47, "Motor Sport"),
    (0x48, "Water Sport"),
    (0x49, "Winter Sports"),
    (0x4A, "Equestrian"),
    (0x4B, "Martial Sports"),
    (0x50, "Kids"),
    (0x51, "Pre-School Children's Programs"),
    (0x52, "Entertainment Programs for 6 to 14"),
    (0x53, "Entertainment Programs for 10 to 16"),
    (0x54, "Informational/Educational"),
    (0x55, "Cartoons/Puppets"),
    (0x60, "Music/Ballet/Dance"),
    (0x61, "Rock/Pop"),
    (0x62, "Classical Music"),
    (0x63, "Folk Music"),
    (0x64, "Jazz"),
    (0x65, "Musical/Opera"),
    (0x66, "Ballet"),
    (0x70, "Arts/Culture"),
    (0x71, "Performing Arts"),
    (0x72, "Fine Arts"),
    (0x73, "Religion"),
    (0x74, "Popular Culture/Traditional Arts"),
    (0x75, "Literature"),
    (0x76, "Film/Cinema"),
    (0x77, "Experimental Film/Video"),
    (0x78, "Broadcasting/Press"),
    (0x79, "New Media"),
    (0x7A, "Arts/Culture Magazines"),
    (0x7B, "Fashion"),
    (0x80, "Social/Policical/Economics"),
    (0x81, "Magazines/Reports/Documentary"),
    (0x82, "Economics/Social Advisory"),
    (0x83, "Remarkable People"),
    (0x90, "Education/Science/Factual"),
    (0x91, "Nature/animals/Environment"),
    (0x92, "Technology/Natural Sciences"),
    (0x93, "Medicine/Physiology/Psychology"),
    (0x94, "Foreign Countries/Expeditions"),
    (0x95, "Social/Spiritual Sciences"),
    (0x96, "Further Education"),
    (0x97, "Languages"),
    (0xA0, "Leisure/Hobbies"),
    (0xA1, "Tourism/Travel"),
    (0xA2, "Handicraft"),
    (0xA3, "Motoring"),
    (0xA4, "Fitness & Health"),
    (0xA5, "Cooking"),
    (0xA6, "Advertizement/Shopping"),
    (0xA7, "Gardening"),
    (0xB0, "Original Language"),
    (0xB1, "Black & White"),
    (0xB2, "\"Unpublished\" Programs"),
    (0xB3, "Live Broadcast"),
    // 英国Freeview独自
    (0xF0, "Drama"),
];

const fn build() -> [Option<&'static str>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ENTRIES.len() {
        let (code, label) = ENTRIES[i];
        table[code as usize] = Some(label);
        i += 1;
    }
    table
}

static TABLE: [Option<&str>; 256] = build();

/// 分類名の識別子。
///
/// 値は表で一致したジャンルであり、翻訳の際のキーとして使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(u8);

impl LabelId {
    /// 表で一致したジャンルを返す。
    #[inline]
    pub fn code(&self) -> u8 {
        self.0
    }

    /// 翻訳前の英語の分類名を返す。
    pub fn source_text(&self) -> &'static str {
        // LabelIdは表にあるジャンルからしか生成されない
        TABLE[self.0 as usize].unwrap_or_default()
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.source_text())
    }
}

/// ジャンル`nibble_code`に対応する分類名を返す。
///
/// 大分類と中分類の組が表にない場合は大分類のみで引き直し、
/// それもない場合は`None`を返す。
pub fn category_label(nibble_code: u8) -> Option<LabelId> {
    [nibble_code, nibble_code & 0xF0]
        .into_iter()
        .find(|&code| TABLE[code as usize].is_some())
        .map(LabelId)
}

/// 番組の大まかな種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgramCategory {
    /// 映画。
    Movie,
    /// スポーツ。
    Sports,
    /// その他の番組。
    TvShow,
}

impl ProgramCategory {
    /// ジャンル`nibble_code`の大分類から番組の種類を得る。
    pub fn from_nibble(nibble_code: u8) -> ProgramCategory {
        match nibble_code >> 4 {
            0x1 => ProgramCategory::Movie,
            0x4 => ProgramCategory::Sports,
            _ => ProgramCategory::TvShow,
        }
    }

    /// 種類を小文字の英語で返す。
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramCategory::Movie => "movie",
            ProgramCategory::Sports => "sports",
            ProgramCategory::TvShow => "tvshow",
        }
    }
}

impl fmt::Display for ProgramCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_unique() {
        for (i, (code, _)) in ENTRIES.iter().enumerate() {
            assert!(
                ENTRIES[i + 1..].iter().all(|(other, _)| other != code),
                "duplicate category 0x{:02X}",
                code
            );
        }
    }

    #[test]
    fn test_category_label() {
        let label = category_label(0x14).unwrap();
        assert_eq!(label.code(), 0x14);
        assert_eq!(label.to_string(), "Movie - Comedy");
        assert_eq!(category_label(0x43).unwrap().source_text(), "Football (Soccer)");
        assert_eq!(category_label(0xF0).unwrap().source_text(), "Drama");

        // 大分類のみで引き直す
        let label = category_label(0x1F).unwrap();
        assert_eq!(label.code(), 0x10);
        assert_eq!(label.source_text(), "Movie");
        assert_eq!(category_label(0x2E).unwrap().source_text(), "News");
        assert_eq!(category_label(0xF5).unwrap().source_text(), "Drama");

        assert_eq!(category_label(0x00), None);
        assert_eq!(category_label(0x0F), None);
        assert_eq!(category_label(0xC3), None);
    }

    #[test]
    fn test_category_label_concurrent() {
        let expected: Vec<_> = (0..=0xFF).map(category_label).collect();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..16 {
                        let actual: Vec<_> = (0..=0xFF).map(category_label).collect();
                        assert_eq!(actual, expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_program_category() {
        assert_eq!(ProgramCategory::from_nibble(0x14), ProgramCategory::Movie);
        assert_eq!(ProgramCategory::from_nibble(0x40), ProgramCategory::Sports);
        assert_eq!(ProgramCategory::from_nibble(0x23), ProgramCategory::TvShow);
        assert_eq!(ProgramCategory::from_nibble(0xF0).to_string(), "tvshow");
    }
}
