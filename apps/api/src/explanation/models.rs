use serde::{Deserialize, Serialize};

/// Body of `POST /api/explain-word`. Never persisted.
///
/// `word` and `context` default to empty when absent so a missing field is
/// rejected by validation as an invalid request rather than by the JSON layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordExplanationRequest {
    #[serde(default)]
    pub word: String,
    /// The verse or sentence the word appears in.
    #[serde(default)]
    pub context: String,
    pub poem_title: Option<String>,
    pub poet_name: Option<String>,
}

/// `word` and `context` are always the request's values, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordExplanation {
    pub word: String,
    pub context: String,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_word_deserializes_as_empty() {
        let req: WordExplanationRequest =
            serde_json::from_value(serde_json::json!({ "context": "بيت" })).unwrap();
        assert!(req.word.is_empty());
        assert!(req.poem_title.is_none());
    }
}
