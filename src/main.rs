use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use peer_chess::board::{Color, GlyphStyle};
use peer_chess::game::GameOptions;
use peer_chess::terminal::run_hotseat_terminal;

/// Play chess against a friend on the same terminal.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Starting position as a layout string, e.g. "4k3/8/8/8/8/8/8/4K3".
    #[arg(long)]
    layout: Option<String>,

    /// Let Black make the first move.
    #[arg(long)]
    black_first: bool,

    /// Draw pieces as letters instead of chess symbols.
    #[arg(long)]
    ascii: bool,

    /// Log every accepted and rejected move to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for GameOptions {
    fn from(cli: Cli) -> Self {
        Self {
            layout: cli.layout,
            first: if cli.black_first {
                Color::Black
            } else {
                Color::White
            },
            glyphs: if cli.ascii {
                GlyphStyle::Ascii
            } else {
                GlyphStyle::Unicode
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .init();

    let options = GameOptions::from(cli);
    match run_hotseat_terminal(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
