use std::collections::HashMap;
use std::hash::Hash;

/// Round half-up to the nearest integer. Every presented average or rate
/// goes through here exactly once, on the final ratio.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Percentage of `part` over `whole`, rounded half-up. 0 when `whole` is 0.
pub fn percent(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        0
    } else {
        round_half_up(part / whole * 100.0)
    }
}

/// Mean of `values`, rounded half-up. 0 for an empty slice.
pub fn rounded_mean(values: &[f64]) -> i64 {
    if values.is_empty() {
        0
    } else {
        round_half_up(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Partition `items` by `key`, keeping groups in first-seen order.
pub fn group_by<T, K, F>(items: &[T], key: F) -> Vec<(K, Vec<&T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Subject label used by every per-subject grouping; blank names collapse
/// into a single "Unknown" group.
pub fn subject_label(name: &str) -> String {
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(1.4), 1);
        assert_eq!(round_half_up(83.5), 84);
        assert_eq!(round_half_up(92.49), 92);
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent(5.0, 0.0), 0);
        assert_eq!(percent(0.0, 0.0), 0);
    }

    #[test]
    fn percent_rounds_final_ratio_only() {
        assert_eq!(percent(28.0, 30.0), 93);
        assert_eq!(percent(1.0, 3.0), 33);
        assert_eq!(percent(2.0, 3.0), 67);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(rounded_mean(&[]), 0);
        assert_eq!(rounded_mean(&[95.0, 72.0]), 84);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let items = vec!["June", "July", "June", "August", "July"];
        let groups = group_by(&items, |label| label.to_string());

        let keys: Vec<&str> = groups.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["June", "July", "August"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[2].1.len(), 1);
    }

    #[test]
    fn blank_subject_names_become_unknown() {
        assert_eq!(subject_label(""), "Unknown");
        assert_eq!(subject_label("Mathematics"), "Mathematics");
    }
}
