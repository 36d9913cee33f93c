pub use error::{Error, Result};
pub use layout::layout_word_cloud;
pub use models::{
    average_score, count_range, messages_for_person, Message, Person, PositionedWordCloudEntry,
    Score, Sentiment, WordCloudEntry,
};
pub use text::scale_font_size;
pub use tokenizer::PhraseTokenizer;

pub mod config;
pub mod error;
mod layout;
mod models;
pub mod preview;
pub mod space;
pub mod text;
pub mod tokenizer;

/// Ranks the salient phrases of `messages`, keeping at most `limit` entries.
pub fn build_word_cloud(messages: &[Message], limit: usize) -> Vec<WordCloudEntry> {
    PhraseTokenizer::default()
        .with_max_words(limit)
        .get_ranked_entries(messages)
}

pub struct WordCloud {
    tokenizer: PhraseTokenizer,
    spread: f64,
}

impl Default for WordCloud {
    fn default() -> Self {
        WordCloud {
            tokenizer: PhraseTokenizer::default(),
            spread: 1.0,
        }
    }
}

impl WordCloud {
    pub fn with_tokenizer(mut self, value: PhraseTokenizer) -> Self {
        self.tokenizer = value;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.tokenizer.max_words = limit;
        self
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    pub fn build(&self, messages: &[Message]) -> Vec<WordCloudEntry> {
        self.tokenizer.get_ranked_entries(messages)
    }

    /// Lays out `entries` using their own count range.
    pub fn layout(&self, entries: &[WordCloudEntry]) -> Vec<PositionedWordCloudEntry> {
        match count_range(entries) {
            Some((min, max)) => layout_word_cloud(entries, min, max, self.spread),
            None => vec![],
        }
    }

    pub fn generate(&self, messages: &[Message]) -> Vec<PositionedWordCloudEntry> {
        self.layout(&self.build(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, score: f64) -> Message {
        Message::new(text, Score::try_from(score).unwrap())
    }

    #[test]
    fn empty_pipeline() {
        assert!(build_word_cloud(&[], 40).is_empty());
        assert!(WordCloud::default().generate(&[]).is_empty());
    }

    #[test]
    fn neutral_only_gives_empty_cloud() {
        let messages = vec![message("atendimento excelente", 0.5)];
        assert!(WordCloud::default().generate(&messages).is_empty());
    }

    #[test]
    fn generate_end_to_end() {
        let messages = vec![
            message("muito obrigado amigo", 0.2),
            message("muito obrigado amigo", 0.2),
            message("a entrega atrasou de novo", 0.9),
            message("entrega", 0.8),
            message("tanto faz", 0.5),
        ];

        let cloud = WordCloud::default().with_spread(1.2).generate(&messages);
        let words: Vec<&str> = cloud.iter().map(|entry| entry.entry.word.as_str()).collect();

        assert_eq!(words, vec!["obrigado amigo", "entrega", "entrega atrasou de novo"]);
        assert_eq!(cloud[0].z_index, 1000);
        assert!(cloud.iter().all(|entry| !entry.fallback));
    }

    #[test]
    fn limit_applies() {
        let messages = vec![
            message("alfa", 0.1),
            message("beta", 0.1),
            message("gama", 0.9),
        ];
        assert_eq!(build_word_cloud(&messages, 2).len(), 2);
        assert_eq!(WordCloud::default().with_limit(1).build(&messages).len(), 1);
    }
}
