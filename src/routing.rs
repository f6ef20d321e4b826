use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The routing key used when an answer carries no branching information.
pub const DEFAULT_KEY: &str = "default";

/// The kind of interactive control a video node offers, which also decides
/// how a raw answer is turned into a routing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerType {
    #[default]
    None,
    Button,
    #[serde(rename = "yesno", alias = "yesNo")]
    YesNo,
    Text,
    Email,
    Rating,
    MultipleChoice,
}

impl AnswerType {
    /// Parses the wire name of an answer type (`"yesno"`, `"multipleChoice"`, ...).
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "none" | "" => Some(AnswerType::None),
            "button" => Some(AnswerType::Button),
            "yesno" | "yesNo" => Some(AnswerType::YesNo),
            "text" => Some(AnswerType::Text),
            "email" => Some(AnswerType::Email),
            "rating" => Some(AnswerType::Rating),
            "multipleChoice" => Some(AnswerType::MultipleChoice),
            _ => None,
        }
    }

    /// Every routing key an answer of this type can produce, given the
    /// number of options of a multiple-choice node.
    pub fn routing_keys(&self, options: usize) -> Vec<String> {
        match self {
            AnswerType::YesNo => vec!["yes".to_string(), "no".to_string()],
            AnswerType::Rating => vec!["low".to_string(), "medium".to_string(), "high".to_string()],
            AnswerType::MultipleChoice if options > 0 => {
                (0..options).map(|index| index.to_string()).collect()
            }
            _ => vec![DEFAULT_KEY.to_string()],
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            AnswerType::None => "none",
            AnswerType::Button => "button",
            AnswerType::YesNo => "yesno",
            AnswerType::Text => "text",
            AnswerType::Email => "email",
            AnswerType::Rating => "rating",
            AnswerType::MultipleChoice => "multipleChoice",
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.wire_name())
    }
}

/// A raw answer as submitted by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    /// Whole numbers (option indices, ratings) are written as integers.
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Text(String),
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_INTEGER_LIMIT: f64 = (1u64 << 53) as f64;

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Answer::Bool(b) => write!(f, "{}", b),
            Answer::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

impl From<usize> for Answer {
    fn from(value: usize) -> Self {
        Answer::Number(value as f64)
    }
}

impl From<u8> for Answer {
    fn from(value: u8) -> Self {
        Answer::Number(f64::from(value))
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

/// Derives the routing key for an answer.
///
/// | answer type      | answer        | key                                  |
/// |------------------|---------------|--------------------------------------|
/// | `multipleChoice` | option index  | the index as a string (`"0"`, `"1"`) |
/// | `yesno`          | boolean       | `"yes"` / `"no"`                     |
/// | `rating`         | 1 to 5        | `"low"` (≤2), `"medium"`, `"high"` (≥5) |
/// | anything else    |               | `"default"`                          |
///
/// Multiple-choice keys are option positions, not labels, so `nextNodes` maps
/// must be keyed by index. An answer whose shape does not fit its declared type
/// routes with `"default"`.
pub fn routing_key(answer: &Answer, answer_type: AnswerType) -> String {
    match (answer_type, answer) {
        (AnswerType::MultipleChoice, Answer::Number(index)) => Answer::Number(*index).to_string(),
        (AnswerType::YesNo, Answer::Bool(yes)) => {
            if *yes {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }
        (AnswerType::Rating, Answer::Number(rating)) => {
            if *rating <= 2.0 {
                "low".to_string()
            } else if *rating >= 5.0 {
                "high".to_string()
            } else {
                "medium".to_string()
            }
        }
        _ => DEFAULT_KEY.to_string(),
    }
}
