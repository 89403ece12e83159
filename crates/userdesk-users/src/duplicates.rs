//! Duplicate-name aggregation.

use std::collections::HashMap;

use crate::types::DuplicateName;

/// Threshold used when the caller gives none, or an unusable one.
pub const DEFAULT_MIN_COUNT: usize = 2;

/// Parse the `count` query parameter.
///
/// Missing, non-numeric and zero values fall back to `DEFAULT_MIN_COUNT`.
pub fn parse_min_count(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MIN_COUNT)
}

/// Count "first last" names and keep those seen at least `min_count` times.
///
/// Names are reported in order of first appearance.
pub fn find_duplicate_names<I, S>(names: I, min_count: usize) -> Vec<DuplicateName>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (first, last) in names {
        let full_name = format!("{} {}", first.as_ref(), last.as_ref());
        match counts.get_mut(&full_name) {
            Some(count) => *count += 1,
            None => {
                counts.insert(full_name.clone(), 1);
                order.push(full_name);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|name| {
            let count = counts.get(&name).copied().unwrap_or(0);
            (count >= min_count).then_some(DuplicateName { name, count })
        })
        .collect()
}
