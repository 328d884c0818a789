use std::path::{Path, PathBuf};

use dvbsi::desc::DescriptorBlock;
use dvbsi::text::huffman::{self, HuffmanTable, HuffmanTables};
use dvbsi::types::PrivateDataSpecifier;
use dvbsi::DvbStr;

#[derive(Debug)]
struct AppArgs {
    input: String,
    text: bool,
    specifier: PrivateDataSpecifier,
    huffman1: Option<PathBuf>,
    huffman2: Option<PathBuf>,
}

impl AppArgs {
    const HELP: &str = "\
記述子群または文字列を表示するコマンド

USAGE:
  dump [OPTIONS] <INPUT>

FLAGS:
  -h, --help          このヘルプを表示する
  --text              入力を記述子群ではなく1つの文字列として復号する

OPTIONS:
  --pds <SPECIFIER>   記述子群より前に現れたプライベートデータ指定子（16進数）
  --huffman1 <PATH>   0x1F文字列の1つ目の符号表ファイル
  --huffman2 <PATH>   0x1F文字列の2つ目の符号表ファイル

ARGS:
  <INPUT>             16進数のバイト列、またはバイナリファイルのパス
";

    pub fn parse() -> Result<AppArgs, Box<dyn std::error::Error>> {
        let mut args = pico_args::Arguments::from_env();

        if args.contains(["-h", "--help"]) {
            println!("{}", Self::HELP);
            std::process::exit(0);
        }

        let text = args.contains("--text");
        let specifier = args
            .opt_value_from_fn("--pds", |s| u32::from_str_radix(s.trim_start_matches("0x"), 16))?
            .map_or(PrivateDataSpecifier::NONE, PrivateDataSpecifier);

        Ok(AppArgs {
            text,
            specifier,
            huffman1: args.opt_value_from_str("--huffman1")?,
            huffman2: args.opt_value_from_str("--huffman2")?,
            input: args.free_from_str()?,
        })
    }
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    if digits.len() % 2 != 0 {
        return None;
    }

    Some(digits.chunks_exact(2).map(|d| d[0] << 4 | d[1]).collect())
}

fn load_input(input: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if Path::new(input).is_file() {
        return Ok(std::fs::read(input)?);
    }

    parse_hex(input).ok_or_else(|| format!("invalid input: {}", input).into())
}

fn load_table(path: Option<&Path>) -> Result<HuffmanTable, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(HuffmanTable::parse(&std::fs::read_to_string(path)?)?),
        None => Ok(HuffmanTable::new()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = AppArgs::parse()?;

    env_logger::init();

    if args.huffman1.is_some() || args.huffman2.is_some() {
        let table1 = load_table(args.huffman1.as_deref())?;
        let table2 = load_table(args.huffman2.as_deref())?;
        log::info!("huffman tables: {} + {} codes", table1.len(), table2.len());
        huffman::install(HuffmanTables::new(table1, table2));
    }

    let data = load_input(&args.input)?;

    if args.text {
        let text = DvbStr::from_bytes(&data);
        let decoded = text.decode();
        println!("{:?}: {}", text.selector(), decoded);
        if let Some(diagnostic) = decoded.diagnostic() {
            println!("  {}", diagnostic);
        }

        let short = text.decode_short_name();
        if short.as_str() != decoded.as_str() {
            println!("short name: {}", short);
        }
        return Ok(());
    }

    let block = DescriptorBlock::new(&data);
    println!("{}", block.dump().with_specifier(args.specifier));

    let consumed: usize = block.iter().map(|d| 2 + d.length()).sum();
    if consumed < data.len() {
        log::warn!("{} trailing bytes", data.len() - consumed);
    }

    Ok(())
}
