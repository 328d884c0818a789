//! EN 300 468 図A.1の既定文字符号表（ISO/IEC 6937相当）。
//!
//! 0xC1..=0xCFはダイアクリティカルマークで、後続する基底文字と合わせて1文字を成す。

use memchr::memchr;

/// 割り当てのない符号に対応する文字。
const UNASSIGNED: char = char::REPLACEMENT_CHARACTER;

/// 0xA0..=0xFFの文字。0xC1..=0xCFはダイアクリティカルマークのため参照されない。
static UPPER_HALF: [char; 0x60] = [
    // 0xA0
    '\u{00A0}', '\u{00A1}', '\u{00A2}', '\u{00A3}', '$', '\u{00A5}', '#', '\u{00A7}',
    '\u{00A4}', '\u{2018}', '\u{201C}', '\u{00AB}', '\u{2190}', '\u{2191}', '\u{2192}', '\u{2193}',
    // 0xB0
    '\u{00B0}', '\u{00B1}', '\u{00B2}', '\u{00B3}', '\u{00D7}', '\u{00B5}', '\u{00B6}', '\u{00B7}',
    '\u{00F7}', '\u{2019}', '\u{201D}', '\u{00BB}', '\u{00BC}', '\u{00BD}', '\u{00BE}', '\u{00BF}',
    // 0xC0
    UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED,
    UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED,
    // 0xD0
    '\u{2015}', '\u{00B9}', '\u{00AE}', '\u{00A9}', '\u{2122}', '\u{266A}', '\u{00AC}', '\u{00A6}',
    UNASSIGNED, UNASSIGNED, UNASSIGNED, UNASSIGNED, '\u{215B}', '\u{215C}', '\u{215D}', '\u{215E}',
    // 0xE0
    '\u{2126}', '\u{00C6}', '\u{0110}', '\u{00AA}', '\u{0126}', UNASSIGNED, '\u{0132}', '\u{013F}',
    '\u{0141}', '\u{00D8}', '\u{0152}', '\u{00BA}', '\u{00DE}', '\u{0166}', '\u{014A}', '\u{0149}',
    // 0xF0
    '\u{0138}', '\u{00E6}', '\u{0111}', '\u{00F0}', '\u{0127}', '\u{0131}', '\u{0133}', '\u{0140}',
    '\u{0142}', '\u{00F8}', '\u{0153}', '\u{00DF}', '\u{00FE}', '\u{0167}', '\u{014B}', '\u{00AD}',
];

/// ダイアクリティカルマークごとの、合成可能な基底文字と合成後の文字。
///
/// 空白との組み合わせはダイアクリティカルマーク単体（スペーシング文字）となる。
static COMPOSITIONS: [(u8, &[u8], &str); 13] = [
    // 抑音符号
    (0xC1, b" AEIOUaeiou", "`ÀÈÌÒÙàèìòù"),
    // 揚音符号
    (
        0xC2,
        b" ACEILNORSUYZacegilnorsuyz",
        "´ÁĆÉÍĹŃÓŔŚÚÝŹáćéǵíĺńóŕśúýź",
    ),
    // 曲折符号
    (
        0xC3,
        b" ACEGHIJOSUWYaceghijosuwy",
        "^ÂĈÊĜĤÎĴÔŜÛŴŶâĉêĝĥîĵôŝûŵŷ",
    ),
    // チルダ
    (0xC4, b" AINOUainou", "~ÃĨÑÕŨãĩñõũ"),
    // マクロン
    (0xC5, b" AEIOUaeiou", "¯ĀĒĪŌŪāēīōū"),
    // ブレーヴェ
    (0xC6, b" AGUagu", "˘ĂĞŬăğŭ"),
    // 上付き点
    (0xC7, b" CEGIZcegz", "˙ĊĖĠİŻċėġż"),
    // 分音符号
    (0xC8, b" AEIOUYaeiouy", "¨ÄËÏÖÜŸäëïöüÿ"),
    // 上付き丸
    (0xCA, b" AUau", "˚ÅŮåů"),
    // セディーユ
    (0xCB, b" CGKLNRSTcgklnrst", "¸ÇĢĶĻŅŖŞŢçģķļņŗşţ"),
    // 二重揚音符号
    (0xCD, b" OUou", "˝ŐŰőű"),
    // オゴネク
    (0xCE, b" AEIUaeiu", "˛ĄĘĮŲąęįų"),
    // キャロン
    (
        0xCF,
        b" CDELNRSTZcdelnrstz",
        "ˇČĎĚĽŇŘŠŤŽčďěľňřšťž",
    ),
];

/// 基底表を引いた結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// 1バイトで完結する文字。
    Char(char),
    /// 後続バイトと合成されるダイアクリティカルマーク。
    Accent,
}

/// 1バイトを基底表で引く。
#[inline]
fn lookup_base(b: u8) -> Lookup {
    match b {
        0x00..=0x9F => Lookup::Char(b as char),
        0xC1..=0xCF => Lookup::Accent,
        _ => Lookup::Char(UPPER_HALF[(b - 0xA0) as usize]),
    }
}

/// ダイアクリティカルマーク`accent`と基底文字`base`を合成する。
///
/// 組み合わせが合成表にない場合は`None`を返す。
fn compose(accent: u8, base: u8) -> Option<char> {
    let (_, bases, composed) = COMPOSITIONS.iter().find(|(a, _, _)| *a == accent)?;
    let pos = memchr(base, bases)?;
    composed.chars().nth(pos)
}

/// 合成の状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// 新しい文字の先頭を待っている。
    Base,
    /// ダイアクリティカルマークを読み、基底文字を待っている。
    PendingAccent(u8),
}

/// 1文字ずつ合成しながら`String`に書き出す。
struct Composer {
    state: State,
    out: String,
}

impl Composer {
    fn new(capacity: usize) -> Composer {
        Composer {
            state: State::Base,
            out: String::with_capacity(capacity),
        }
    }

    fn feed(&mut self, b: u8) {
        self.state = match self.state {
            State::Base => self.enter_base(b),
            State::PendingAccent(accent) => match compose(accent, b) {
                Some(c) => {
                    self.out.push(c);
                    State::Base
                }
                // 合成できない組み合わせは、このバイトを新たな先頭として読み直す
                None => self.enter_base(b),
            },
        };
    }

    fn enter_base(&mut self, b: u8) -> State {
        match lookup_base(b) {
            Lookup::Char(c) => {
                self.out.push(c);
                State::Base
            }
            Lookup::Accent => State::PendingAccent(b),
        }
    }

    /// 末尾で待機中のダイアクリティカルマークは捨てる。
    fn finish(self) -> String {
        self.out
    }
}

/// 既定文字符号表で`buf`を復号する。
///
/// NULが現れた時点で終端とみなす。
pub(super) fn decode(buf: &[u8]) -> String {
    let buf = match memchr(0x00, buf) {
        Some(end) => &buf[..end],
        None => buf,
    };

    let mut composer = Composer::new(buf.len());
    for &b in buf {
        composer.feed(b);
    }
    composer.finish()
}
