//! Keyword allow-list deciding which rows describe products.

/// Case-insensitive substring matcher over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns the first keyword found in the row.
    pub fn find(&self, row: &str) -> Option<&str> {
        let lowered = row.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, row: &str) -> bool {
        self.find(row).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let matcher = KeywordMatcher::new(["iphone", "PS5"]);
        assert_eq!(matcher.find("Apple IPHONE 15"), Some("iphone"));
        assert!(matcher.matches("ps5 本体"));
        assert!(!matcher.matches("領収書"));
    }

    #[test]
    fn test_japanese_keywords() {
        let matcher = KeywordMatcher::new(["ポケモン", "一番くじ"]);
        assert!(matcher.matches("ポケモンカード 151 BOX"));
    }

    #[test]
    fn test_blank_keywords_are_dropped() {
        let matcher = KeywordMatcher::new(["", "  "]);
        assert!(matcher.is_empty());
        assert!(!matcher.matches("anything"));
    }
}
