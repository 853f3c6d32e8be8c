use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use mt_toolkit::{precision_by_order, PrecisionCounts};

/// Corpus-level modified n-gram precision of a hypothesis read from stdin.
///
/// Reads the references from STEM0, STEM1, ... or from STEM itself when no
/// numbered file exists. Line i of every reference file is a translation of
/// hypothesis line i.
#[derive(Parser, Debug)]
#[command(name = "multi-precision")]
struct Args {
    /// Lowercase references and hypothesis before scoring
    #[arg(short = 'l', long = "lc")]
    lowercase: bool,

    /// Highest n-gram order to report
    #[arg(short = 'n', long, default_value_t = 4)]
    max_order: usize,

    /// Reference file, or prefix of numbered reference files
    stem: String,
}

/// Clipped counts pooled over every sentence, one entry per order.
#[derive(Debug, PartialEq)]
struct CorpusScore {
    totals: Vec<PrecisionCounts>,
    hyp_len: usize,
    sentences: usize,
}

impl CorpusScore {
    fn summary(&self) -> String {
        let precisions: Vec<String> = self
            .totals
            .iter()
            .map(|counts| format!("{:.1}", 100.0 * counts.precision()))
            .collect();
        format!(
            "MP = {} (hyp_len={}, sentences={})",
            precisions.join("/"),
            self.hyp_len,
            self.sentences
        )
    }
}

fn read_reference(path: &Path, lowercase: bool) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read reference {}", path.display()))?;
    Ok(text
        .lines()
        .map(|line| {
            if lowercase {
                line.to_lowercase()
            } else {
                line.to_string()
            }
        })
        .collect())
}

/// One entry per reference file, each holding that file's lines.
fn load_references(stem: &str, lowercase: bool) -> Result<Vec<Vec<String>>> {
    let mut references = Vec::new();
    let mut ref_index = 0;

    loop {
        let path = format!("{}{}", stem, ref_index);
        if !Path::new(&path).exists() {
            break;
        }
        let lines = read_reference(Path::new(&path), lowercase)?;
        if lines.is_empty() {
            if ref_index == 0 {
                bail!("reference {} is empty", path);
            }
            warn!("{} is empty, stopping", path);
            break;
        }
        debug!("loaded {} lines from {}", lines.len(), path);
        references.push(lines);
        ref_index += 1;
    }

    if references.is_empty() {
        references.push(read_reference(Path::new(stem), lowercase)?);
    }

    Ok(references)
}

fn score_corpus<R: BufRead>(
    hypothesis: R,
    references: &[Vec<String>],
    max_order: usize,
    lowercase: bool,
) -> Result<CorpusScore> {
    let ref_lines = references.iter().map(Vec::len).min().unwrap_or(0);
    let mut score = CorpusScore {
        totals: vec![PrecisionCounts::default(); max_order],
        hyp_len: 0,
        sentences: 0,
    };

    for line in hypothesis.lines() {
        let line = line?;
        if score.sentences >= ref_lines {
            bail!(
                "hypothesis has more lines than the references ({})",
                ref_lines
            );
        }

        let sentence = if lowercase { line.to_lowercase() } else { line };
        let words: Vec<&str> = sentence.split_whitespace().collect();

        let sentence_refs: Vec<Vec<&str>> = references
            .iter()
            .map(|reference| reference[score.sentences].split_whitespace().collect())
            .collect();

        let counts = precision_by_order(&sentence_refs, &words, max_order)?;
        for (total, count) in score.totals.iter_mut().zip(counts) {
            *total += count;
        }

        score.hyp_len += words.len();
        score.sentences += 1;

        if score.sentences % 10000 == 0 {
            info!("processing sentence: {}", score.sentences);
        }
    }

    if score.sentences < ref_lines {
        warn!(
            "hypothesis has {} lines, references have {}",
            score.sentences, ref_lines
        );
    }

    Ok(score)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.max_order == 0 {
        bail!("n-gram order must be at least 1");
    }

    let references = load_references(&args.stem, args.lowercase)?;
    info!(
        "{} reference files, {} sentences",
        references.len(),
        references.iter().map(Vec::len).min().unwrap_or(0)
    );

    let stdin = io::stdin();
    let score = score_corpus(stdin.lock(), &references, args.max_order, args.lowercase)?;
    println!("{}", score.summary());

    Ok(())
}
