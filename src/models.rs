use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Scores below this value are read as positive feedback.
pub const POSITIVE_BELOW: f64 = 0.4;
/// Scores above this value are read as negative feedback.
pub const NEGATIVE_ABOVE: f64 = 0.6;

/// A sentiment score in `[0, 1]`, produced by the scoring backend.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Score(value))
        } else {
            Err(Error::InvalidScore(value))
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "message")]
    pub text: String,
    #[serde(rename = "message_score")]
    pub score: Score,
    #[serde(default)]
    pub person_id: i64,
}

impl Message {
    pub fn new(text: impl Into<String>, score: Score) -> Self {
        Message {
            id: 0,
            text: text.into(),
            score,
            person_id: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub pfp_image: Option<String>,
    #[serde(default)]
    pub average_score: Option<f64>,
}

/// Variant order matters: negative entries rank ahead of positive ones on ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Returns `None` for the neutral band, whose messages never reach the cloud.
    pub fn classify(score: Score) -> Option<Sentiment> {
        let value = score.value();
        if value < POSITIVE_BELOW {
            Some(Sentiment::Positive)
        } else if value > NEGATIVE_ABOVE {
            Some(Sentiment::Negative)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordCloudEntry {
    pub word: String,
    pub count: u32,
    pub sentiment: Sentiment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionedWordCloudEntry {
    #[serde(flatten)]
    pub entry: WordCloudEntry,
    pub left: f64,
    pub top: f64,
    #[serde(rename = "zIndex")]
    pub z_index: i32,
    /// Set when the spiral search gave up and the entry may overlap others.
    #[serde(skip)]
    pub fallback: bool,
}

pub fn average_score(messages: &[Message]) -> Option<f64> {
    if messages.is_empty() {
        return None;
    }

    let total: f64 = messages.iter().map(|message| message.score.value()).sum();
    Some(total / messages.len() as f64)
}

pub fn messages_for_person(messages: &[Message], person_id: i64) -> Vec<Message> {
    messages
        .iter()
        .filter(|message| message.person_id == person_id)
        .cloned()
        .collect()
}

/// Smallest and largest count in the set, as expected by the layout engine.
pub fn count_range(entries: &[WordCloudEntry]) -> Option<(u32, u32)> {
    let min = entries.iter().map(|entry| entry.count).min()?;
    let max = entries.iter().map(|entry| entry.count).max()?;
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: f64) -> Score {
        Score::try_from(value).unwrap()
    }

    #[test]
    fn classify_bands() {
        assert_eq!(Sentiment::classify(score(0.0)), Some(Sentiment::Positive));
        assert_eq!(Sentiment::classify(score(0.39)), Some(Sentiment::Positive));
        assert_eq!(Sentiment::classify(score(0.4)), None);
        assert_eq!(Sentiment::classify(score(0.5)), None);
        assert_eq!(Sentiment::classify(score(0.6)), None);
        assert_eq!(Sentiment::classify(score(0.61)), Some(Sentiment::Negative));
        assert_eq!(Sentiment::classify(score(1.0)), Some(Sentiment::Negative));
    }

    #[test]
    fn score_rejects_out_of_range() {
        assert!(Score::try_from(-0.1).is_err());
        assert!(Score::try_from(1.5).is_err());
        assert!(Score::try_from(f64::NAN).is_err());
    }

    #[test]
    fn parse_api_messages() {
        let json = r#"[
            {"id": 1, "message": "muito obrigado", "message_score": 0.2, "person_id": 7},
            {"message": "sem id", "message_score": 0.9}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "muito obrigado");
        assert_eq!(messages[0].person_id, 7);
        assert_eq!(messages[1].id, 0);
        assert_eq!(messages[1].score.value(), 0.9);
    }

    #[test]
    fn parse_rejects_bad_score() {
        let json = r#"[{"message": "x", "message_score": 3.0}]"#;
        assert!(serde_json::from_str::<Vec<Message>>(json).is_err());
    }

    #[test]
    fn positioned_entry_json_shape() {
        let positioned = PositionedWordCloudEntry {
            entry: WordCloudEntry {
                word: "atendimento".to_string(),
                count: 3,
                sentiment: Sentiment::Negative,
            },
            left: 50.0,
            top: 42.5,
            z_index: 995,
            fallback: false,
        };
        let value = serde_json::to_value(&positioned).unwrap();

        assert_eq!(value["word"], "atendimento");
        assert_eq!(value["sentiment"], "negative");
        assert_eq!(value["zIndex"], 995);
        assert!(value.get("fallback").is_none());
    }

    #[test]
    fn average_and_person_filter() {
        let mut first = Message::new("a", score(0.2));
        first.person_id = 1;
        let mut second = Message::new("b", score(0.6));
        second.person_id = 2;
        let mut third = Message::new("c", score(0.4));
        third.person_id = 1;
        let messages = vec![first, second, third];

        assert_eq!(average_score(&[]), None);
        assert!((average_score(&messages).unwrap() - 0.4).abs() < 1e-9);

        let filtered = messages_for_person(&messages, 1);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|message| message.person_id == 1));
    }

    #[test]
    fn range_of_counts() {
        let entries = vec![
            WordCloudEntry {
                word: "a".into(),
                count: 4,
                sentiment: Sentiment::Positive,
            },
            WordCloudEntry {
                word: "b".into(),
                count: 1,
                sentiment: Sentiment::Negative,
            },
        ];
        assert_eq!(count_range(&entries), Some((1, 4)));
        assert_eq!(count_range(&[]), None);
    }
}
