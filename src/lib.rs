//! Utilities for phrase-based machine translation: modified n-gram
//! precision for scoring hypotheses, and readers for Moses-style phrase
//! tables and ARPA language models.

pub mod error;
pub mod lm;
pub mod ngram;
pub mod phrase_table;
pub mod precision;
pub mod source;

pub use error::{Error, Result};
pub use lm::{parse_arpa, read_arpa, LanguageModel, NgramScore, UNKNOWN_TOKEN};
pub use phrase_table::{parse_phrase_table, read_phrase_table, PhraseTable};
pub use precision::{
    modified_precision, modified_precision_counts, precision_by_order, PrecisionCounts,
};
pub use source::{latin1_lines, Gzip, LineSource, PlainText};
