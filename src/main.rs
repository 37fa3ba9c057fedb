//! Aligns a word with its reading and prints the segments.

use std::path::PathBuf;

use clap::Parser;
use furigana_align::{Layout, Ruby};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "furigana-align", about = "Aligns furigana with the kanji of a word")]
struct Args {
    /// The word, e.g. 食べる.
    kanji: String,

    /// Its reading, e.g. たべる.
    furigana: String,

    /// Tab-separated kanji readings.
    #[arg(long, env = "FURIGANA_TABLE")]
    furigana_table: Option<PathBuf>,

    /// Tab-separated jukujikun readings.
    #[arg(long, env = "JUKUJIKUN_TABLE")]
    jukujikun_table: Option<PathBuf>,

    /// Directory holding furigana.json and jukujikun.json.
    #[arg(long, env = "FURIGANA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep kanji left over after the reading runs out instead of failing.
    #[arg(long)]
    permissive: bool,

    /// Maximum number of positions to visit.
    #[arg(long)]
    step_limit: Option<usize>,

    /// Also print the alignment as HTML.
    #[arg(long)]
    html: bool,

    /// Use a single ruby element for the whole word.
    #[arg(long)]
    grouped: bool,

    /// Log the search to stderr.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut ruby = match &args.data_dir {
        Some(dir) => Ruby::from_dir(dir)?,
        None => Ruby::new(),
    };
    if let Some(path) = &args.furigana_table {
        ruby.load_furigana(path)?;
    }
    if let Some(path) = &args.jukujikun_table {
        ruby.load_jukujikun(path)?;
    }
    let ruby = ruby
        .explicit(!args.permissive)
        .step_limit(args.step_limit);

    match ruby.split(&args.kanji, &args.furigana) {
        Some(furigana) => println!("{} {} -> {:?}", args.kanji, args.furigana, furigana.pairs()),
        None => println!("{} {} -> None", args.kanji, args.furigana),
    }
    if args.html {
        let layout = if args.grouped {
            Layout::Grouped
        } else {
            Layout::Ungrouped
        };
        println!("{}", ruby.to_html5(&args.kanji, &args.furigana, layout));
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
