//! Labeling seam between the session and whatever produces display names.

use sequencer_types::DraftInput;

/// Label shown in the sentinel row at the top of the input list.
pub const SENTINEL_LABEL: &str = "...";

/// Produces short, human-distinguishing labels for raw keys.
///
/// Implementations must return exactly one label per key, in the same order, and
/// every label must be unique within a single call.
pub trait LabelingService: Send + Sync {
    fn shorten_unique(&self, keys: &[String]) -> Vec<String>;
}

/// Default labeler keeping the shortest unique trailing run of `/` segments.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortUniqueLabeler;

impl LabelingService for ShortUniqueLabeler {
    fn shorten_unique(&self, keys: &[String]) -> Vec<String> {
        sequencer_util::shorten_unique(keys)
    }
}

/// Builds the input-list labels for `inputs`: the sentinel first, then one label
/// per input.
///
/// Keys are deduplicated before labeling so that repeated sources share one label
/// instead of being forced apart by the labeler's uniqueness contract.
pub fn label_inputs(labeler: &dyn LabelingService, inputs: &[DraftInput]) -> Vec<String> {
    let mut unique_keys: Vec<String> = Vec::new();
    let mut positions: Vec<usize> = Vec::with_capacity(inputs.len());
    for input in inputs {
        match unique_keys.iter().position(|key| *key == input.source_key) {
            Some(position) => positions.push(position),
            None => {
                positions.push(unique_keys.len());
                unique_keys.push(input.source_key.clone());
            }
        }
    }

    let unique_labels = labeler.shorten_unique(&unique_keys);
    let mut labels = Vec::with_capacity(inputs.len() + 1);
    labels.push(SENTINEL_LABEL.to_string());
    labels.extend(
        positions
            .into_iter()
            .map(|position| unique_labels.get(position).cloned().unwrap_or_else(|| unique_keys[position].clone())),
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call so tests can assert on what was labeled.
    #[derive(Default)]
    struct RecordingLabeler {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl LabelingService for RecordingLabeler {
        fn shorten_unique(&self, keys: &[String]) -> Vec<String> {
            self.calls.lock().unwrap().push(keys.to_vec());
            keys.iter().map(|key| key.to_uppercase()).collect()
        }
    }

    #[test]
    fn duplicate_keys_share_a_label() {
        let labeler = RecordingLabeler::default();
        let inputs = vec![
            DraftInput::with_defaults("/cam/a"),
            DraftInput::with_defaults("/cam/b"),
            DraftInput::with_defaults("/cam/a"),
        ];

        let labels = label_inputs(&labeler, &inputs);

        assert_eq!(labels, vec!["...", "/CAM/A", "/CAM/B", "/CAM/A"]);
        assert_eq!(labeler.calls.lock().unwrap().as_slice(), &[vec!["/cam/a".to_string(), "/cam/b".to_string()]]);
    }

    #[test]
    fn empty_inputs_yield_only_the_sentinel() {
        assert_eq!(label_inputs(&ShortUniqueLabeler, &[]), vec![SENTINEL_LABEL]);
    }

    #[test]
    fn default_labeler_shortens_paths() {
        let inputs = vec![DraftInput::with_defaults("/robot/left/image"), DraftInput::with_defaults("/robot/right/image")];
        assert_eq!(label_inputs(&ShortUniqueLabeler, &inputs), vec!["...", "left/image", "right/image"]);
    }
}
