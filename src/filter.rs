/// Case-insensitive substring blocklist.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    blocked_words: Vec<String>,
}

impl ContentFilter {
    /// Blank entries are dropped; they would match every message.
    pub fn new(blocked_words: Vec<String>) -> Self {
        let blocked_words = blocked_words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { blocked_words }
    }

    pub fn is_blocked(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.blocked_words.iter().any(|w| lowered.contains(w.as_str()))
    }

    pub fn word_count(&self) -> usize {
        self.blocked_words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ContentFilter {
        ContentFilter::new(vec!["badword1".to_string(), "BadWord2".to_string()])
    }

    #[test]
    fn test_matches_regardless_of_case_and_surroundings() {
        let f = filter();
        assert!(f.is_blocked("badword1"));
        assert!(f.is_blocked("you are a BADWORD1!!"));
        assert!(f.is_blocked("xxbadword2yy"));
    }

    #[test]
    fn test_clean_text_passes() {
        let f = filter();
        assert!(!f.is_blocked("How do I restart my server?"));
        assert!(!f.is_blocked(""));
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let f = ContentFilter::new(vec!["".to_string(), "  ".to_string()]);
        assert_eq!(f.word_count(), 0);
        assert!(!f.is_blocked("anything"));
    }
}
