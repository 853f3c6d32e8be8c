//! Moses phrase tables.
//!
//! Each record is `source ||| target ||| p1 p2 p3 p4 [||| alignment ...]`,
//! where the four scores are φ(f|e), lex(f|e), φ(e|f) and lex(e|f). Only
//! φ(f|e), the first score, is kept: it is the term the noisy channel model
//! needs when translating from the source side.

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::source::{latin1_lines, LineSource};

const FIELD_SEPARATOR: &str = " ||| ";
const PROGRESS_INTERVAL: usize = 100_000;

/// Source phrase -> target phrase -> φ(f|e).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseTable {
    entries: HashMap<String, HashMap<String, f64>>,
}

impl PhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one translation option.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>, prob: f64) {
        self.entries
            .entry(source.into())
            .or_default()
            .insert(target.into(), prob);
    }

    /// All target phrases known for `source`.
    pub fn translations(&self, source: &str) -> Option<&HashMap<String, f64>> {
        self.entries.get(source)
    }

    pub fn probability(&self, source: &str, target: &str) -> Option<f64> {
        self.entries.get(source)?.get(target).copied()
    }

    /// Number of distinct source phrases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (source, target) pairs.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, f64>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub fn read_phrase_table<S: LineSource + ?Sized>(source: &S) -> Result<PhraseTable> {
    info!("reading phrase table from {}", source.name());
    let table = parse_phrase_table(source.open()?)?;
    info!(
        "loaded {} source phrases, {} phrase pairs",
        table.len(),
        table.pair_count()
    );
    Ok(table)
}

pub fn parse_phrase_table<R: BufRead>(reader: R) -> Result<PhraseTable> {
    let mut table = PhraseTable::new();

    for (line_no, line) in latin1_lines(reader).enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let record = line.trim();

        if record.is_empty() {
            debug!("skipping blank line {}", line_no);
            continue;
        }

        let (src, trg, prob) = parse_record(record, line_no)?;
        table.insert(src, trg, prob);

        if line_no % PROGRESS_INTERVAL == 0 {
            info!("processing line: {}", line_no);
        }
    }

    Ok(table)
}

fn parse_record(record: &str, line_no: usize) -> Result<(&str, &str, f64)> {
    let mut fields = record.split(FIELD_SEPARATOR);
    let (src, trg, scores) = match (fields.next(), fields.next(), fields.next()) {
        (Some(src), Some(trg), Some(scores)) => (src, trg, scores),
        _ => {
            return Err(Error::format(
                line_no,
                "expected at least 3 fields separated by ' ||| '",
            ))
        }
    };

    let first = scores
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::format(line_no, "missing translation probability"))?;
    let prob = first
        .parse::<f64>()
        .map_err(|e| Error::format(line_no, format!("invalid probability {:?}: {}", first, e)))?;
    if !prob.is_finite() {
        return Err(Error::format(
            line_no,
            format!("invalid probability {:?}: not finite", first),
        ));
    }

    Ok((src, trg, prob))
}
