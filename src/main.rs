use std::path::Path;
use std::process;
use cir::ircore::cfg::Cfg;
use cir::ircore::codec::Entry;
use cir::ircore::engine::Engine;
use cir::ircore::error::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[derive(Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// Inverted index search with a front-coded term dictionary
struct Cli {
    #[clap(short, long, value_parser, default_value_t = String::from(".cir/cir.idx"))]
    /// Index file
    index_path: String,
    #[clap(short, long, value_parser)]
    /// YAML config, overrides .circfg next to the corpus
    config: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[derive(Debug)]
enum Commands {
    /// Build index, one record per line of the corpus file
    Build {
        #[clap(short = 'f', long, value_parser)]
        /// Corpus file
        corpus: String,
        #[clap(long, action)]
        /// Compress the dictionary after building
        compress: bool,
    },
    /// Records containing all words of the query
    Search {
        #[clap(value_parser)]
        /// search query
        query: String,
    },
    /// Print the inverted index
    Show,
    /// Front-code the term dictionary
    Compress,
    /// Print the encoded dictionary
    Encoded,
    /// Print the decoded term list
    Decoded,
    /// Index statistics
    Stats,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let index_path = Path::new(&cli.index_path);
    let res = match &cli.command {
        Commands::Build { corpus, compress } =>
            command_build_index(Path::new(corpus), index_path, cli.config.as_deref(), *compress),
        Commands::Search { query } => command_search(index_path, query),
        Commands::Show => command_show(index_path),
        Commands::Compress => command_compress(index_path, cli.config.as_deref()),
        Commands::Encoded => command_encoded(index_path),
        Commands::Decoded => command_decoded(index_path),
        Commands::Stats => command_stats(index_path),
    };
    if let Err(e) = res {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn load_cfg(config: Option<&str>, corpus: &Path) -> Result<Cfg> {
    match config {
        Some(path) => Cfg::load_from(Path::new(path)),
        None => Cfg::for_corpus(corpus),
    }
}

fn command_build_index(corpus: &Path, index_path: &Path, config: Option<&str>, compress: bool) -> Result<()> {
    let mut cfg = load_cfg(config, corpus)?;
    if compress {
        cfg.set_compress(true);
    }
    let engine = Engine::build_from(corpus, &cfg)?;
    engine.save_to(index_path)?;
    println!("{} documents indexed", engine.doc_count());
    Ok(())
}

fn command_search(index_path: &Path, query: &str) -> Result<()> {
    let engine = Engine::load_from(index_path)?;
    let records = engine.search(query)?;
    println!("{} results", records.len());
    for record_id in records {
        println!("{}", record_id);
    }
    Ok(())
}

fn command_show(index_path: &Path) -> Result<()> {
    let engine = Engine::load_from(index_path)?;
    println!("{:<30} {:<10} {}", "term", "repeats", "records");
    for (term, postings) in engine.index().term_postings()? {
        let records: Vec<String> = postings.iter().map(|id| id.to_string()).collect();
        println!("{:<30} {:<10} {{{}}}", term, postings.len(), records.join(", "));
    }
    Ok(())
}

// uses the config stored at build time unless --config is given
fn command_compress(index_path: &Path, config: Option<&str>) -> Result<()> {
    let mut engine = Engine::load_from(index_path)?;
    if let Some(path) = config {
        engine.set_cfg(Cfg::load_from(Path::new(path))?);
    }
    if engine.compress() {
        engine.save_to(index_path)?;
        println!("Successfully compressed");
    } else {
        println!("already compressed");
    }
    Ok(())
}

fn command_encoded(index_path: &Path) -> Result<()> {
    let engine = Engine::load_from(index_path)?;
    match engine.index().encoded() {
        Some(encoded) => {
            for entry in encoded.entries() {
                match entry {
                    Entry::Anchor { text } => println!("anchor {:<4} {}", text.len(), text),
                    Entry::Diff { len, shared, suffix } => println!("diff   {:<4} {:<4} {}", len, shared, suffix),
                }
            }
            println!("{} entries, {} bytes", encoded.len(), encoded.encoded_size());
        }
        None => println!("index is not compressed"),
    }
    Ok(())
}

fn command_decoded(index_path: &Path) -> Result<()> {
    let engine = Engine::load_from(index_path)?;
    for term in engine.index().decoded()? {
        println!("{}", term);
    }
    Ok(())
}

fn command_stats(index_path: &Path) -> Result<()> {
    let engine = Engine::load_from(index_path)?;
    let stats = engine.stats();
    println!("records: {}", stats.document_count);
    println!("tokens: {}", stats.total_document_length);
    println!("average record length: {:.2}", stats.average_document_length);
    println!("terms: {}", stats.term_count);
    println!("compressed: {}", stats.compressed);
    println!("term bytes: {}", stats.raw_size);
    if let (Some(encoded_size), Some(anchor_count)) = (stats.encoded_size, stats.anchor_count) {
        println!("encoded bytes: {} ({} anchors)", encoded_size, anchor_count);
    }
    Ok(())
}
