use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use lift_codec::{read_lift_file, Entry, Lexicon, LexiconConfig, LiftWriter, Query};
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lift-codec")]
#[command(version)]
#[command(about = "Inspect, search and rewrite LIFT lexicon files", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show producer, version and entry statistics
    Info {
        file: PathBuf,
    },

    /// Read a file and write it back through the model
    Roundtrip {
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Rank entries against a query
    Search {
        file: PathBuf,
        query: String,

        /// Only entries with a sense of this grammatical category
        #[arg(long)]
        pos: Option<String>,

        /// Only entries with this morph type
        #[arg(long)]
        morph: Option<String>,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 20)]
        limit: usize,
    },

    /// Print entries as JSON, including their raw fragments
    Dump {
        file: PathBuf,

        /// Only the entry with this guid
        #[arg(long)]
        guid: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logger = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;

    match cli.command {
        Commands::Info { file } => info(file),
        Commands::Roundtrip { input, output } => roundtrip(input, output),
        Commands::Search {
            file,
            query,
            pos,
            morph,
            limit,
        } => search(file, query, pos, morph, limit),
        Commands::Dump { file, guid } => dump(file, guid),
    }
}

fn load(file: PathBuf) -> Result<Lexicon, Box<dyn std::error::Error>> {
    let mut lexicon = Lexicon::new(LexiconConfig::default());
    let count = lexicon.import_file(&file)?;
    debug!("Loaded {} entries from {}", count, file.display());
    Ok(lexicon)
}

fn info(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let lexicon = load(file)?;

    if let Some(metadata) = lexicon.metadata() {
        println!("Producer: {}", metadata.lift_attributes.producer);
        println!("Version:  {}", metadata.lift_attributes.version);
        println!("Header:   {}", if metadata.header.is_some() { "yes" } else { "no" });
    }
    println!("\nStatistics:");
    println!("  Entries:  {}", lexicon.entry_count());
    println!("  Senses:   {}", lexicon.sense_count());
    println!("  Examples: {}", lexicon.example_count());
    println!("  Parts of speech: {}", lexicon.unique_pos_values().join(", "));
    println!("  Morph types:     {}", lexicon.unique_morph_types().join(", "));
    Ok(())
}

fn roundtrip(input: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_lift_file(&input)?;
    let writer = LiftWriter::default();

    match output {
        Some(path) => {
            writer.write_file(&path, &document.entries, &document.metadata)?;
            eprintln!("Wrote {} entries to {}", document.entries.len(), path.display());
        }
        None => print!("{}", writer.write(&document.entries, &document.metadata)?),
    }
    Ok(())
}

fn search(
    file: PathBuf,
    text: String,
    pos: Option<String>,
    morph_type: Option<String>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let lexicon = load(file)?;
    let query = Query {
        text,
        pos,
        morph_type,
        ..Query::default()
    };

    let results = lexicon.query(&query);
    for entry in results.iter().take(limit) {
        println!("{}", summary(entry));
    }
    if results.len() > limit {
        println!("... and {} more", results.len() - limit);
    }
    Ok(())
}

fn summary(entry: &Entry) -> String {
    let gloss = entry
        .senses()
        .iter()
        .find_map(|s| s.glosses.first_value())
        .unwrap_or_default();
    format!(
        "{:<24} {:<10} {}  [{}]",
        entry.word(),
        entry.sense_pos_list().join(","),
        gloss,
        entry.guid
    )
}

fn dump(file: PathBuf, guid: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_lift_file(&file)?;
    let entries: Vec<&Entry> = document
        .entries
        .iter()
        .filter(|e| guid.as_deref().map_or(true, |g| e.guid == g))
        .collect();

    if let Some(g) = guid.as_deref() {
        if entries.is_empty() {
            return Err(format!("no entry with guid '{}'", g).into());
        }
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
