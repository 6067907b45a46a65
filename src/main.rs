//! Roll on a random table kept in a text file.
//!
//! The table is loaded into a document inside a `<table-roller>`
//! element, and the roller's own roll button is clicked once per
//! requested roll.
//!
//! ```bash
//! # Roll three times on a markdown table
//! table-roll encounters.md -n 3
//!
//! # Tab separated, no header row, numbered output
//! table-roll names.tsv --separator '\t' --no-headers --output-dice-column
//! ```

use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use table_roller::component::{Component, Registry};
use table_roller::config::{CLEAR_LABEL, DELIM, GLUE, NO_DICE_COLUMN, NO_HEADERS, OUTPUT_DICE_COLUMN, ROLL_LABEL};
use table_roller::document::Document;
use table_roller::dom::Element;
use table_roller::roller::{self, TableRoller, ROLL_ACTION};
use table_roller::table::RollTable;

/// Roll on a random table
#[derive(Parser, Debug)]
#[command(name = "table-roll")]
#[command(about = "Roll on a random table kept in a markdown or delimited text file", long_about = None)]
#[command(version)]
struct Cli {
    /// Table file: a markdown pipe table, or delimited text with --separator
    path: PathBuf,

    /// Number of rolls
    #[arg(short = 'n', long, default_value = "1")]
    rolls: usize,

    /// Read delimited text split on this character instead of markdown
    #[arg(long, value_parser = parse_separator)]
    separator: Option<char>,

    /// The first row is data, not a header
    #[arg(long)]
    no_headers: bool,

    /// The first column is data, not a dice column
    #[arg(long)]
    no_dice_column: bool,

    /// Number each result
    #[arg(long)]
    output_dice_column: bool,

    /// Text between column values
    #[arg(long)]
    delim: Option<String>,

    /// Comma separated 1-based columns joined to the next without a delimiter
    #[arg(long)]
    glue: Option<String>,

    /// Label of the roll button
    #[arg(long)]
    roll_label: Option<String>,

    /// Label of the clear button
    #[arg(long)]
    clear_label: Option<String>,

    /// Seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>
}

fn parse_separator(s: &str) -> Result<char, String> {
    match s {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("separator must be a single character, got {s:?}"))
            }
        }
    }
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace
        }
    }

    fn init_logging(&self) -> Result<()> {
        let level = self.log_level();
        match &self.log_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create log file {}", path.display()))?;
                WriteLogger::init(level, Config::default(), file)?;
            }
            None => {
                TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
            }
        }
        Ok(())
    }

    fn load_table(&self) -> Result<RollTable> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let table = match self.separator {
            Some(sep) => RollTable::parse_delimited(&text, sep),
            None => RollTable::parse_markdown(&text)
        };
        table.with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// The `<table-roller>` host, with the flags turned into attributes.
    fn host(&self, table: &RollTable) -> Element {
        let mut host = Element::new(roller::TAG);
        let flags = [
            (NO_HEADERS, self.no_headers),
            (NO_DICE_COLUMN, self.no_dice_column),
            (OUTPUT_DICE_COLUMN, self.output_dice_column)
        ];
        for (name, on) in flags {
            if on {
                host.set_attribute(name, "");
            }
        }

        let values = [
            (DELIM, &self.delim),
            (GLUE, &self.glue),
            (ROLL_LABEL, &self.roll_label),
            (CLEAR_LABEL, &self.clear_label)
        ];
        for (name, value) in values {
            if let Some(v) = value {
                host.set_attribute(name, v.as_str());
            }
        }

        host.child(table.to_element())
    }

    fn registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        match self.seed {
            Some(seed) => roller::register_with(
                &mut registry,
                Box::new(move || Box::new(TableRoller::with_rng(StdRng::seed_from_u64(seed))) as Box<dyn Component>)
            )?,
            None => roller::register(&mut registry)?
        }
        Ok(registry)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;

    let table = cli.load_table()?;
    let body = Element::new("body").child(cli.host(&table));
    let mut doc = Document::new(body, cli.registry()?);
    doc.connect();

    let Some(roll) = doc.root().find_where(|e| e.click_handler() == Some(ROLL_ACTION)) else {
        bail!("The table roller did not start, see the warning above");
    };
    let roll = roll.id.clone();

    for _ in 0..cli.rolls {
        doc.click(&roll)?;
    }

    if let Some(output) = roller::find_output_pane(doc.root()) {
        for line in output.children.iter() {
            println!("{}", line.text_content());
        }
    }
    Ok(())
}
