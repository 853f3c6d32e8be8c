use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use mt_toolkit::{read_arpa, read_phrase_table, Gzip, LineSource, PlainText};

/// Loads a phrase table or an ARPA language model and prints a summary.
#[derive(Parser, Debug)]
#[command(name = "model-stats")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Moses phrase table (source ||| target ||| scores)
    PhraseTable {
        path: PathBuf,

        /// The file is gzip-compressed
        #[arg(short = 'z', long)]
        gzip: bool,

        /// Print the translation options of this source phrase
        #[arg(long)]
        query: Option<String>,
    },
    /// ARPA n-gram language model
    Lm {
        path: PathBuf,

        /// The file is gzip-compressed
        #[arg(short = 'z', long)]
        gzip: bool,

        /// Print the scores of this n-gram (space separated)
        #[arg(long)]
        query: Option<String>,
    },
}

fn line_source(path: PathBuf, gzip: bool) -> Box<dyn LineSource> {
    if gzip {
        Box::new(Gzip::new(path))
    } else {
        Box::new(PlainText::new(path))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::PhraseTable { path, gzip, query } => {
            let source = line_source(path, gzip);
            let table = read_phrase_table(&*source)
                .with_context(|| format!("failed to read phrase table {}", source.name()))?;

            println!("source phrases: {}", table.len());
            println!("phrase pairs: {}", table.pair_count());

            if let Some(query) = query {
                match table.translations(&query) {
                    Some(options) => {
                        let mut options: Vec<_> = options.iter().collect();
                        options.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
                        for (target, prob) in options {
                            println!("{} ||| {} ||| {}", query, target, prob);
                        }
                    }
                    None => info!("no entry for {:?}", query),
                }
            }
        }
        Command::Lm { path, gzip, query } => {
            let source = line_source(path, gzip);
            let model = read_arpa(&*source)
                .with_context(|| format!("failed to read language model {}", source.name()))?;

            println!("n-grams: {}", model.len());
            println!("order: {}", model.order());
            for n in 1..=model.order() {
                let count = model
                    .iter()
                    .filter(|(ngram, _)| ngram.split(' ').count() == n)
                    .count();
                println!("ngram {}={}", n, count);
            }

            if let Some(query) = query {
                let ngram: Vec<&str> = query.split_whitespace().collect();
                match model.get(&ngram) {
                    Some(score) => println!("{}\t{}\t{}", score.log_prob, query, score.backoff),
                    None => {
                        let unk = model.unknown();
                        println!("{}\t{}\t{} (unknown)", unk.log_prob, query, unk.backoff);
                    }
                }
            }
        }
    }

    Ok(())
}
