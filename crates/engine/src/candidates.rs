//! Source keys offered when adding an input to a record.

use regex::Regex;
use serde::Serialize;

use crate::labels::LabelingService;

/// One entry of the "add input" picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub key: String,
    pub label: String,
}

impl Candidate {
    /// The blank first entry; choosing it cancels the add.
    pub fn cancel() -> Self {
        Self {
            key: String::new(),
            label: String::new(),
        }
    }

    pub fn is_cancel(&self) -> bool {
        self.key.is_empty()
    }
}

/// Builds the picker entries for adding an input.
///
/// Keys are kept when they match `filter` (if any) and differ from
/// `own_output_key`; a record consuming its own output would feed back into
/// itself. The surviving keys are labeled together so labels are unique among the
/// offered entries. The cancel entry is always first.
pub fn offer_candidates(
    keys: &[String],
    filter: Option<&Regex>,
    own_output_key: Option<&str>,
    labeler: &dyn LabelingService,
) -> Vec<Candidate> {
    let offered: Vec<String> = keys
        .iter()
        .filter(|key| filter.is_none_or(|pattern| pattern.is_match(key)))
        .filter(|key| own_output_key != Some(key.as_str()))
        .cloned()
        .collect();
    let labels = labeler.shorten_unique(&offered);

    let mut candidates = Vec::with_capacity(offered.len() + 1);
    candidates.push(Candidate::cancel());
    candidates.extend(
        offered
            .into_iter()
            .zip(labels)
            .map(|(key, label)| Candidate { key, label }),
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ShortUniqueLabeler;

    fn keys() -> Vec<String> {
        ["/cam/left/image_raw", "/cam/right/image_raw", "/cam/depth", "/seq/front"]
            .iter()
            .map(|key| key.to_string())
            .collect()
    }

    #[test]
    fn cancel_entry_comes_first() {
        let candidates = offer_candidates(&[], None, None, &ShortUniqueLabeler);
        assert_eq!(candidates, vec![Candidate::cancel()]);
        assert!(candidates[0].is_cancel());
    }

    #[test]
    fn excludes_own_output_key() {
        let candidates = offer_candidates(&keys(), None, Some("/seq/front"), &ShortUniqueLabeler);
        assert!(candidates.iter().all(|candidate| candidate.key != "/seq/front"));
        assert_eq!(candidates.len(), 4);
    }

    #[test]
    fn applies_pattern_filter_before_labeling() {
        let filter = Regex::new("image_raw$").unwrap();
        let candidates = offer_candidates(&keys(), Some(&filter), None, &ShortUniqueLabeler);

        let labels: Vec<&str> = candidates.iter().map(|candidate| candidate.label.as_str()).collect();
        assert_eq!(labels, vec!["", "left/image_raw", "right/image_raw"]);
    }

    #[test]
    fn labels_are_computed_over_offered_keys_only() {
        let all = vec!["/a/image".to_string(), "/b/image".to_string()];
        let candidates = offer_candidates(&all, None, Some("/b/image"), &ShortUniqueLabeler);
        assert_eq!(candidates[1].label, "image");
    }
}
