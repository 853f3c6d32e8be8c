//! N-gram language models in ARPA format.
//!
//! ```text
//! \data\
//! ngram 1=37344
//! ngram 2=715602
//!
//! \1-grams:
//! -2.785123	</s>
//! -99	<s>	-1.750062
//!
//! \2-grams:
//! -1.226477	it is	-1.013582
//! ```
//!
//! Entry rows are tab separated: log10 probability, the n-gram, and an
//! optional backoff weight. Rows with a single column carry no n-gram
//! (headers, counts, section markers) and are skipped.

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::source::{latin1_lines, LineSource};

pub const UNKNOWN_TOKEN: &str = "<unk>";

/// Score assigned to [`UNKNOWN_TOKEN`] when the model does not define it.
pub const DEFAULT_UNKNOWN_SCORE: NgramScore = NgramScore {
    log_prob: -100.0,
    backoff: 0.0,
};

const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NgramScore {
    pub log_prob: f64,
    pub backoff: f64,
}

/// N-grams are keyed by their words joined with a single space.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageModel {
    ngrams: HashMap<String, NgramScore>,
    order: usize,
}

impl LanguageModel {
    fn from_entries(mut ngrams: HashMap<String, NgramScore>, order: usize) -> Self {
        ngrams
            .entry(UNKNOWN_TOKEN.to_string())
            .or_insert(DEFAULT_UNKNOWN_SCORE);
        LanguageModel {
            ngrams,
            order: order.max(1),
        }
    }

    pub fn get<S: AsRef<str>>(&self, ngram: &[S]) -> Option<NgramScore> {
        match ngram {
            [word] => self.get_phrase(word.as_ref()),
            _ => {
                let words: Vec<&str> = ngram.iter().map(|w| w.as_ref()).collect();
                self.get_phrase(&words.join(" "))
            }
        }
    }

    /// Lookup by an n-gram whose words are already separated by single spaces.
    pub fn get_phrase(&self, phrase: &str) -> Option<NgramScore> {
        self.ngrams.get(phrase).copied()
    }

    /// Score of the unknown word; always present.
    pub fn unknown(&self) -> NgramScore {
        self.get_phrase(UNKNOWN_TOKEN).unwrap_or(DEFAULT_UNKNOWN_SCORE)
    }

    /// Length of the longest n-gram in the model.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    /// Entries as (space separated n-gram, score).
    pub fn iter(&self) -> impl Iterator<Item = (&str, NgramScore)> {
        self.ngrams.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

pub fn read_arpa<S: LineSource + ?Sized>(source: &S) -> Result<LanguageModel> {
    info!("reading language model from {}", source.name());
    let model = parse_arpa(source.open()?)?;
    info!(
        "loaded {} n-grams, highest order {}",
        model.len(),
        model.order()
    );
    Ok(model)
}

pub fn parse_arpa<R: BufRead>(reader: R) -> Result<LanguageModel> {
    let mut ngrams = HashMap::new();
    let mut order = 0;

    for (line_no, line) in latin1_lines(reader).enumerate() {
        let line = line?;
        let line_no = line_no + 1;

        let columns: Vec<&str> = line.trim().split('\t').collect();
        if columns.len() < 2 {
            continue;
        }

        let log_prob = parse_weight(columns[0], line_no)?;
        let words: Vec<&str> = columns[1].split_whitespace().collect();
        if words.is_empty() {
            return Err(Error::format(line_no, "empty n-gram"));
        }
        order = order.max(words.len());
        let backoff = match columns.get(2) {
            Some(column) => parse_weight(column, line_no)?,
            None => 0.0,
        };

        ngrams.insert(words.join(" "), NgramScore { log_prob, backoff });

        if line_no % PROGRESS_INTERVAL == 0 {
            info!("processing line: {}", line_no);
        }
    }

    if !ngrams.contains_key(UNKNOWN_TOKEN) {
        debug!("no {} entry, using default score", UNKNOWN_TOKEN);
    }
    Ok(LanguageModel::from_entries(ngrams, order))
}

fn parse_weight(column: &str, line_no: usize) -> Result<f64> {
    let column = column.trim();
    column
        .parse::<f64>()
        .map_err(|e| Error::format(line_no, format!("invalid weight {:?}: {}", column, e)))
}
