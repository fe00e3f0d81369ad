use serde::{Deserialize, Serialize};

pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// May be empty when the question is carried by its image alone.
    #[serde(rename = "question", default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    pub fn new(text: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            text: text.to_string(),
            image: None,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
        }
    }

    pub fn has_option(&self, option_index: usize) -> bool {
        option_index < self.options.len()
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}
