//! Short, human-distinguishing labels for slash-separated keys.
//!
//! Keys such as `/robot/cam_left/image_raw` are long and share most of their
//! prefix. [`shorten_unique`] keeps the shortest trailing run of segments that
//! still tells each key apart from the others passed in the same call.

use std::collections::{HashMap, HashSet};

/// Returns one label per key, in the same order, each unique within the call.
///
/// Every key starts with its last segment; distinct keys whose labels collide grow
/// one segment at a time until they are unique or fully spelled out. Exact
/// duplicate keys share the shortest label of their key, and later occurrences
/// receive a numeric suffix (`image_raw (2)`).
pub fn shorten_unique(keys: &[String]) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::new();
    let mut slot_of: HashMap<&str, usize> = HashMap::new();
    let slots: Vec<usize> = keys
        .iter()
        .map(|key| {
            *slot_of.entry(key.as_str()).or_insert_with(|| {
                distinct.push(key.as_str());
                distinct.len() - 1
            })
        })
        .collect();

    let labels = shortest_suffixes(&distinct);
    disambiguate(slots.into_iter().map(|slot| labels[slot].clone()).collect())
}

fn shortest_suffixes(keys: &[&str]) -> Vec<String> {
    let segments: Vec<Vec<&str>> = keys
        .iter()
        .map(|key| key.split('/').filter(|segment| !segment.is_empty()).collect())
        .collect();
    let mut depths: Vec<usize> = segments.iter().map(|parts| parts.len().min(1)).collect();

    loop {
        let labels = render(keys, &segments, &depths);
        let mut collisions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, label) in labels.iter().enumerate() {
            collisions.entry(label.as_str()).or_default().push(index);
        }

        let mut grew = false;
        for indices in collisions.values().filter(|indices| indices.len() > 1) {
            for &index in indices {
                if depths[index] < segments[index].len() {
                    depths[index] += 1;
                    grew = true;
                }
            }
        }
        if !grew {
            return labels;
        }
    }
}

fn render(keys: &[&str], segments: &[Vec<&str>], depths: &[usize]) -> Vec<String> {
    keys.iter()
        .zip(segments)
        .zip(depths)
        .map(|((key, parts), &depth)| {
            if parts.is_empty() {
                key.to_string()
            } else {
                parts[parts.len() - depth..].join("/")
            }
        })
        .collect()
}

fn disambiguate(labels: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(labels.len());
    labels
        .into_iter()
        .map(|label| {
            if used.insert(label.clone()) {
                return label;
            }
            let mut ordinal = 2;
            loop {
                let candidate = format!("{label} ({ordinal})");
                if used.insert(candidate.clone()) {
                    return candidate;
                }
                ordinal += 1;
            }
        })
        .collect()
}
