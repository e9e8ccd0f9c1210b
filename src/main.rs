//! Kommandozeilen-Werkzeug zum Prüfen von Action-Ausdrücken.
//!
//! Liest einen Ausdruck als Argument oder aus einer Datei, dekodiert ihn
//! und gibt die kanonische Zeile, auf Wunsch die eingerückte Anzeigeform
//! und den strukturierten Record aus.

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use modkette::{Action, ActionParser};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "modkette", about = "Inspect controller action expressions")]
struct Cli {
    /// Action-Ausdruck, z.B. "sens(2.0, None)"
    expression: Option<String>,

    /// Ausdruck stattdessen aus einer Datei lesen
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Eingerückte Anzeigeform mit ausgeben
    #[arg(short, long)]
    multiline: bool,

    /// Strukturierten JSON-Record mit ausgeben
    #[arg(short, long)]
    record: bool,
}

fn main() -> Result<()> {
    setup()?;
    let cli = Cli::parse();

    let text = match (cli.expression, cli.file) {
        (Some(expression), _) => expression,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err(eyre!("either an expression or --file is required")),
    };

    let parser = ActionParser::new();
    let action = parser.parse(&text);

    println!("{}", action.to_source(false, 0));
    if cli.multiline {
        println!("{}", action.to_source(true, 0));
    }
    if cli.record {
        println!("{}", serde_json::to_string_pretty(&action.encode())?);
    }

    if let Some(err) = action.error() {
        return Err(eyre!("invalid action: {err}"));
    }
    Ok(())
}

fn setup() -> Result<()> {
    color_eyre::install()?;
    FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .init();
    Ok(())
}
