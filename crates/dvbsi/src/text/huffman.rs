//! 先頭が0x1Fの、Freesat方式のハフマン符号化文字列の復号。
//!
//! 符号は直前に復号した文字ごとに用意され、先頭では[`START`]の符号表を使う。
//! [`ESCAPE`]に続く部分は8ビットの生の文字が並び、ASCII文字が現れるまで続く。
//!
//! 符号表そのものは放送事業者が公開しているものであり、このクレートには同梱しない。
//! 利用者は[`HuffmanTable`]を構築して[`install`]で登録する。

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::decode::{DecodedText, Diagnostic};

/// 文字列の先頭を表す文脈。
pub const START: u8 = 0x00;
/// 文字列の終端を表す符号の行き先。
pub const STOP: u8 = 0x00;
/// 8ビットの生の文字への切り替えを表す符号の行き先。
pub const ESCAPE: u8 = 0x01;

/// 符号表の構築で発生するエラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// 符号長が1～32ビットの範囲にない。
    #[error("invalid code length {0}")]
    CodeLength(usize),

    /// 符号に`0`と`1`以外の文字がある。
    #[error("invalid bit character {0:?}")]
    BitChar(char),

    /// 文字を表す字句が不正。
    #[error("invalid character token {0:?}")]
    CharToken(String),

    /// テキスト形式の行が不正。
    #[error("line {line}: {source}")]
    Line {
        /// 1始まりの行番号。
        line: usize,
        /// 行で発生したエラー。
        #[source]
        source: Box<HuffmanError>,
    },

    /// テキスト形式の行にフィールドが足りない。
    #[error("missing field")]
    MissingField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Code {
    /// 右詰めの符号値。
    value: u32,
    /// 符号長（1～32）。
    bits: u8,
    /// 復号される文字。
    next: u8,
}

impl Code {
    #[inline]
    fn matches(&self, window: u32) -> bool {
        window >> (32 - self.bits as u32) == self.value
    }
}

/// 直前の文字ごとのハフマン符号表。
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    contexts: Vec<Vec<Code>>,
}

impl Default for HuffmanTable {
    fn default() -> Self {
        HuffmanTable::new()
    }
}

impl HuffmanTable {
    /// 空の符号表を生成する。
    pub fn new() -> HuffmanTable {
        HuffmanTable {
            contexts: vec![Vec::new(); 256],
        }
    }

    /// 直前の文字`prev`の後に`code`（`0`と`1`からなる文字列）が現れた場合に
    /// `next`を復号するという符号を追加する。
    pub fn insert(&mut self, prev: u8, code: &str, next: u8) -> Result<(), HuffmanError> {
        if code.is_empty() || code.len() > 32 {
            return Err(HuffmanError::CodeLength(code.len()));
        }

        let mut value = 0;
        for c in code.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                c => return Err(HuffmanError::BitChar(c)),
            };
            value = (value << 1) | bit;
        }

        self.contexts[prev as usize].push(Code {
            value,
            bits: code.len() as u8,
            next,
        });
        Ok(())
    }

    /// `(直前の文字, 符号, 復号される文字)`の列から符号表を生成する。
    pub fn from_codes<'s, I>(codes: I) -> Result<HuffmanTable, HuffmanError>
    where
        I: IntoIterator<Item = (u8, &'s str, u8)>,
    {
        let mut table = HuffmanTable::new();
        for (prev, code, next) in codes {
            table.insert(prev, code, next)?;
        }
        Ok(table)
    }

    /// テキスト形式の符号表を読み込む。
    ///
    /// 各行は`直前の文字:符号:復号される文字:`の形式で、文字は1文字そのものか、
    /// `0x`で始まる16進数、または`START`・`STOP`・`ESCAPE`で表す。
    /// 空行と`#`で始まる行は無視する。
    pub fn parse(text: &str) -> Result<HuffmanTable, HuffmanError> {
        let mut table = HuffmanTable::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            Self::parse_line(&mut table, line).map_err(|e| HuffmanError::Line {
                line: i + 1,
                source: Box::new(e),
            })?;
        }
        Ok(table)
    }

    fn parse_line(table: &mut HuffmanTable, line: &str) -> Result<(), HuffmanError> {
        let mut fields = line.split(':');
        let (Some(prev), Some(code), Some(next)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(HuffmanError::MissingField);
        };

        table.insert(parse_char(prev)?, code, parse_char(next)?)
    }

    /// 符号の個数を返す。
    pub fn len(&self) -> usize {
        self.contexts.iter().map(Vec::len).sum()
    }

    /// 符号が1つもないかどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(Vec::is_empty)
    }

    fn lookup(&self, prev: u8, window: u32) -> Option<Code> {
        self.contexts[prev as usize]
            .iter()
            .find(|code| code.matches(window))
            .copied()
    }
}

fn parse_char(token: &str) -> Result<u8, HuffmanError> {
    match token {
        "START" => Ok(START),
        "STOP" => Ok(STOP),
        "ESCAPE" => Ok(ESCAPE),
        _ => {
            if let Some(hex) = token.strip_prefix("0x") {
                return u8::from_str_radix(hex, 16)
                    .map_err(|_| HuffmanError::CharToken(token.to_string()));
            }
            match token.as_bytes() {
                &[b] => Ok(b),
                _ => Err(HuffmanError::CharToken(token.to_string())),
            }
        }
    }
}

/// 2つ目のバイトで選ばれる2つの符号表の組。
#[derive(Debug, Clone, Default)]
pub struct HuffmanTables {
    tables: [HuffmanTable; 2],
}

impl HuffmanTables {
    /// 符号表1（2つ目のバイトが0x01）と符号表2（それ以外）から`HuffmanTables`を生成する。
    pub fn new(table1: HuffmanTable, table2: HuffmanTable) -> HuffmanTables {
        HuffmanTables {
            tables: [table1, table2],
        }
    }

    /// 先頭の0x1Fを含む`raw`を復号する。
    ///
    /// 符号表にない符号に出会った場合は、それまでの文字列に`...`を付けて返す。
    pub fn decode(&self, raw: &[u8]) -> DecodedText {
        let [_, table_id, ref body @ ..] = *raw else {
            return DecodedText::default();
        };
        let table = &self.tables[if table_id == 0x01 { 0 } else { 1 }];

        let mut reader = BitReader { data: body, pos: 0 };
        let mut out = Vec::with_capacity(body.len() * 3);
        let mut prev = START;
        loop {
            let window = reader.peek32();
            if prev == ESCAPE {
                let literal = (window >> 24) as u8;
                reader.consume(8);
                if literal != STOP {
                    out.push(literal);
                }
                if literal & 0x80 == 0 {
                    prev = literal;
                }
            } else {
                let Some(code) = table.lookup(prev, window) else {
                    log::warn!("huffman code missing after 0x{:02X}", prev);
                    let mut text = String::from_utf8_lossy(&out).into_owned();
                    text.push_str("...");
                    return DecodedText::with_diagnostic(text, Diagnostic::HuffmanIncomplete);
                };
                reader.consume(code.bits as usize);
                if code.next != STOP && code.next != ESCAPE {
                    out.push(code.next);
                }
                prev = code.next;
            }

            if prev == STOP || reader.peek32() == 0 {
                break;
            }
        }

        DecodedText::new(String::from_utf8_lossy(&out).into_owned())
    }
}

/// 32ビットの窓でビット列を先読みする。
struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// 現在位置から32ビットを左詰めで返す。データの終端以降は0で埋める。
    fn peek32(&self) -> u32 {
        let start = self.pos / 8;
        let shift = self.pos % 8;
        let bytes = (0..5).fold(0_u64, |acc, i| {
            (acc << 8) | self.data.get(start + i).copied().unwrap_or(0) as u64
        });
        ((bytes << shift) >> 8) as u32
    }

    #[inline]
    fn consume(&mut self, bits: usize) {
        self.pos += bits;
    }
}

static INSTALLED: RwLock<Option<Arc<HuffmanTables>>> = parking_lot::const_rwlock(None);

/// 0x1Fで始まる文字列の復号に使う符号表を登録する。
///
/// 既に登録されている符号表は置き換えられる。
pub fn install(tables: HuffmanTables) {
    *INSTALLED.write() = Some(Arc::new(tables));
}

/// 登録されている符号表を取り除く。
pub fn uninstall() {
    *INSTALLED.write() = None;
}

/// 登録されている符号表で`raw`を復号する。
pub(super) fn decode(raw: &[u8]) -> DecodedText {
    let tables = INSTALLED.read().clone();
    match tables {
        Some(tables) => tables.decode(raw),
        None => {
            log::warn!("huffman coded text without installed tables");
            DecodedText::with_diagnostic(String::new(), Diagnostic::HuffmanUnavailable)
        }
    }
}
