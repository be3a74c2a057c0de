//! Keyword mood heuristic.

const POSITIVE_WORDS: &[&str] = &["happy", "great", "awesome", "good"];
const NEGATIVE_WORDS: &[&str] = &["sad", "bad", "terrible", "down"];

/// Rough mood of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
}

impl Mood {
    /// Classify a message by keyword. Positive words win over negative ones.
    pub fn detect(message: &str) -> Self {
        let message = message.to_lowercase();
        if POSITIVE_WORDS.iter().any(|word| message.contains(word)) {
            Self::Positive
        } else if NEGATIVE_WORDS.iter().any(|word| message.contains(word)) {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// How the mood is described to the completion model.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Positive => "The user seems to be in a good mood. Celebrate it with them.",
            Self::Negative => {
                "The user seems to be feeling low. Be warm and reassuring, and remind them tough times pass."
            }
            Self::Neutral => "The user's mood is unclear. Gently encourage them to try something uplifting.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Mood::detect("I feel great today"), Mood::Positive);
        assert_eq!(Mood::detect("Such a terrible week"), Mood::Negative);
        assert_eq!(Mood::detect("Went to the store"), Mood::Neutral);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(Mood::detect("I am SAD"), Mood::Negative);
        assert_eq!(Mood::detect("Happy Friday"), Mood::Positive);
    }

    #[test]
    fn test_positive_takes_precedence() {
        assert_eq!(Mood::detect("good news after a bad day"), Mood::Positive);
    }
}
