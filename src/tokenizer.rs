use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Message, Sentiment, WordCloudEntry};

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+").expect("Unable to compile tokenization regex"));

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "ao", "aos", "as", "com", "da", "das", "de", "dei", "dela", "dele", "deles", "dizer",
    "do", "dos", "e", "ela", "ele", "eles", "em", "era", "essa", "esse", "estava", "estive", "eu",
    "foi", "ja", "la", "le", "lhe", "maior", "mais", "mas", "me", "mesmo", "mim", "muita",
    "muitas", "muito", "muitos", "na", "nas", "nem", "no", "nos", "nossa", "nosso", "nunca", "o",
    "os", "ou", "para", "pelo", "pela", "por", "pra", "que", "quem", "se", "sem", "ser", "sua",
    "suas", "tambem", "tanto", "te", "tem", "tinha", "todas", "todos", "tu", "um", "uma", "vai",
    "voce",
];

pub const DEFAULT_MAX_WORDS: usize = 40;

#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub raw: &'a str,
    pub normalized: String,
    pub is_stopword: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Phrase {
    /// Normalized words joined by a single space; the aggregation key.
    pub key: String,
    /// Raw words, lowercased, joined by a single space.
    pub display: String,
    pub words: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhraseCount {
    pub count: u32,
    pub display: String,
}

/// Lowercase with combining diacritical marks removed.
pub fn normalize_word(word: &str) -> String {
    word.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
}

pub struct PhraseTokenizer {
    pub stopwords: HashSet<String>,
    pub min_word_length: usize,
    pub max_phrase_words: usize,
    pub max_words: usize,
}

impl Default for PhraseTokenizer {
    fn default() -> Self {
        PhraseTokenizer {
            stopwords: DEFAULT_STOPWORDS.iter().map(|word| word.to_string()).collect(),
            min_word_length: 3,
            max_phrase_words: 5,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl PhraseTokenizer {
    pub fn with_stopwords(mut self, value: &[&str]) -> Self {
        self.stopwords = value.iter().map(|word| normalize_word(word)).collect();
        self
    }

    pub fn with_min_word_length(mut self, size: usize) -> Self {
        self.min_word_length = size;
        self
    }

    pub fn with_max_phrase_words(mut self, size: usize) -> Self {
        self.max_phrase_words = size.max(1);
        self
    }

    pub fn with_max_words(mut self, size: usize) -> Self {
        self.max_words = size;
        self
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        WORD_REGEX
            .find_iter(text)
            .map(|mat| {
                let raw = mat.as_str();
                let normalized = normalize_word(raw);
                let is_stopword = self.stopwords.contains(&normalized);
                Token {
                    raw,
                    normalized,
                    is_stopword,
                }
            })
            .collect()
    }

    fn qualifies(&self, token: &Token) -> bool {
        !token.is_stopword && token.normalized.chars().count() >= self.min_word_length
    }

    /// Greedy left-to-right phrase scan over one message.
    ///
    /// A phrase starts at a qualifying word and grows while the following words
    /// qualify, bridging a stopword when the word after it qualifies and the
    /// phrase stays within `max_phrase_words`. Multi-word phrases consume their
    /// span; a single-word phrase only advances the scan by one token.
    pub fn extract_phrases(&self, text: &str) -> Vec<Phrase> {
        let tokens = self.tokenize(text);
        let mut phrases = Vec::new();

        let mut index = 0;
        while index < tokens.len() {
            if !self.qualifies(&tokens[index]) {
                index += 1;
                continue;
            }

            let mut parts = vec![&tokens[index]];
            let mut end_index = index;
            let mut candidate = index + 1;

            while candidate < tokens.len() && parts.len() < self.max_phrase_words {
                let next = &tokens[candidate];

                if next.is_stopword {
                    match tokens.get(candidate + 1) {
                        Some(following)
                            if self.qualifies(following)
                                && parts.len() + 2 <= self.max_phrase_words =>
                        {
                            parts.push(next);
                            parts.push(following);
                            end_index = candidate + 1;
                            candidate += 2;
                            continue;
                        }
                        _ => break,
                    }
                }

                if !self.qualifies(next) {
                    break;
                }

                parts.push(next);
                end_index = candidate;
                candidate += 1;
            }

            phrases.push(Phrase {
                key: parts
                    .iter()
                    .map(|part| part.normalized.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                display: parts
                    .iter()
                    .map(|part| part.raw.to_lowercase())
                    .collect::<Vec<_>>()
                    .join(" "),
                words: parts.len(),
            });

            index = if parts.len() > 1 {
                end_index + 1
            } else {
                index + 1
            };
        }

        phrases
    }

    pub fn get_phrase_frequencies(
        &self,
        messages: &[Message],
    ) -> HashMap<(Sentiment, String), PhraseCount> {
        let mut frequencies: HashMap<(Sentiment, String), PhraseCount> = HashMap::new();
        let mut neutral = 0;

        for message in messages {
            let sentiment = match Sentiment::classify(message.score) {
                Some(sentiment) => sentiment,
                None => {
                    neutral += 1;
                    continue;
                }
            };

            for phrase in self.extract_phrases(&message.text) {
                frequencies
                    .entry((sentiment, phrase.key))
                    .and_modify(|existing| existing.count += 1)
                    .or_insert(PhraseCount {
                        count: 1,
                        display: phrase.display,
                    });
            }
        }

        debug!(
            "{} messages, {} neutral skipped, {} distinct phrases",
            messages.len(),
            neutral,
            frequencies.len()
        );

        frequencies
    }

    /// Entries sorted by count, then negative before positive, then by word.
    pub fn get_ranked_entries(&self, messages: &[Message]) -> Vec<WordCloudEntry> {
        let mut entries: Vec<WordCloudEntry> = self
            .get_phrase_frequencies(messages)
            .into_iter()
            .map(|((sentiment, _), phrase)| WordCloudEntry {
                word: phrase.display,
                count: phrase.count,
                sentiment,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.sentiment.cmp(&b.sentiment))
                .then_with(|| a.word.cmp(&b.word))
        });
        entries.truncate(self.max_words);

        entries
    }
}
