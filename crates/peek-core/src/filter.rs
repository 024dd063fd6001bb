//! Comma-separated include/exclude text filter.
//!
//! `"health, -max"` matches text containing `health` unless it also
//! contains `max`. Matching is a case-insensitive substring test. A
//! filter with no terms matches everything and is not active.

use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Term {
    needle: String,
    exclude: bool,
}

/// Parsed filter query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFilter {
    text: String,
    terms: SmallVec<[Term; 4]>,
}

impl TextFilter {
    /// Parse `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let mut filter = Self::default();
        filter.set(text);
        filter
    }

    /// Replace the query.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.terms = self
            .text
            .split(',')
            .filter_map(|raw| {
                let raw = raw.trim();
                let (exclude, needle) = match raw.strip_prefix('-') {
                    Some(rest) => (true, rest.trim()),
                    None => (false, raw),
                };
                (!needle.is_empty()).then(|| Term {
                    needle: needle.to_lowercase(),
                    exclude,
                })
            })
            .collect();
    }

    /// The query as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable query buffer, for binding to a text input. Call
    /// [`rebuild`](Self::rebuild) after editing.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Re-parse after [`text_mut`](Self::text_mut) edits.
    pub fn rebuild(&mut self) {
        let text = std::mem::take(&mut self.text);
        self.set(text);
    }

    /// Whether the query has at least one term.
    pub fn is_active(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Whether the query has text but no usable terms, e.g. `" , -"`.
    pub fn is_degenerate(&self) -> bool {
        !self.text.trim().is_empty() && self.terms.is_empty()
    }

    /// Whether `candidate` passes.
    pub fn passes(&self, candidate: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let haystack = candidate.to_lowercase();
        let mut has_include = false;
        for term in &self.terms {
            let hit = haystack.contains(&term.needle);
            if term.exclude {
                if hit {
                    return false;
                }
            } else {
                if hit {
                    return true;
                }
                has_include = true;
            }
        }
        !has_include
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_filter_passes_everything() {
        let filter = TextFilter::new("");
        assert!(!filter.is_active());
        assert!(filter.passes("anything"));
    }

    #[test]
    fn include_is_case_insensitive_substring() {
        let filter = TextFilter::new("Health");
        assert!(filter.is_active());
        assert!(filter.passes("MaxHEALTH"));
        assert!(!filter.passes("Armor"));
    }

    #[test]
    fn exclude_wins_when_listed_first() {
        let filter = TextFilter::new("-max, health");
        assert!(filter.passes("Health"));
        assert!(!filter.passes("MaxHealth"));
    }

    #[test]
    fn exclude_only_passes_the_rest() {
        let filter = TextFilter::new("-tmp");
        assert!(filter.passes("Health"));
        assert!(!filter.passes("TmpBuffer"));
    }

    #[test]
    fn separators_only_is_degenerate() {
        let filter = TextFilter::new(" , ,- ");
        assert!(!filter.is_active());
        assert!(filter.is_degenerate());
    }

    #[test]
    fn text_mut_then_rebuild() {
        let mut filter = TextFilter::default();
        filter.text_mut().push_str("abc");
        filter.rebuild();
        assert!(filter.is_active());
        assert_eq!(filter.text(), "abc");
    }

    proptest! {
        #[test]
        fn single_term_matches_itself(word in "[a-zA-Z]{1,12}") {
            let filter = TextFilter::new(word.clone());
            prop_assert!(filter.passes(&word));
            let wrapped = format!("x{}y", word.to_uppercase());
            prop_assert!(filter.passes(&wrapped));
        }
    }
}
