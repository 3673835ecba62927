use std::collections::BTreeSet;

/// Names listed in an aggregated finding before truncation.
pub const SUMMARY_LIMIT: usize = 3;

/// Sorted, de-duplicated `names` joined by commas, cut after `max` entries
/// with a trailing `...`.
pub fn join_first<'a>(names: impl IntoIterator<Item = &'a str>, max: usize) -> String {
    let sorted: BTreeSet<&str> = names.into_iter().collect();
    let mut joined = sorted
        .iter()
        .take(max)
        .copied()
        .collect::<Vec<_>>()
        .join(",");
    if sorted.len() > max {
        joined.push_str("...");
    }
    joined
}

/// Resource id of an aggregated finding, e.g. `clusterroles:a,b,c...`.
pub fn aggregate_id<'a>(kind: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    format!("{kind}:{}", join_first(names, SUMMARY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_sorted_and_truncated() {
        assert_eq!(join_first(["c", "a", "b"], 3), "a,b,c");
        assert_eq!(join_first(["d", "c", "a", "b"], 3), "a,b,c...");
        assert_eq!(join_first(["b", "a", "b"], 3), "a,b");
        assert_eq!(join_first([], 3), "");
    }

    #[test]
    fn aggregate_id_prefixes_kind() {
        assert_eq!(
            aggregate_id("namespaces", ["web", "db", "cache", "api"]),
            "namespaces:api,cache,db..."
        );
    }
}
