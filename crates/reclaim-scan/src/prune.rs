//! Collapse overlapping selections so no kept path lies inside another.

use std::path::PathBuf;

use itertools::Itertools;

/// Sort paths and keep each one unless it equals or descends from a path
/// already kept.
///
/// Sorting is component-wise (`Path` ordering), so every descendant of a
/// path sorts directly after it.
pub fn prune_nested<T, F>(items: Vec<T>, path_of: F) -> Vec<T>
where
    F: Fn(&T) -> &PathBuf,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items
        .into_iter()
        .sorted_by(|a, b| path_of(a).cmp(path_of(b)))
    {
        let path = path_of(&item);
        if kept.iter().any(|k| path.starts_with(path_of(k))) {
            continue;
        }
        kept.push(item);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prune(paths: &[&str]) -> Vec<String> {
        let items: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        prune_nested(items, |p| p)
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_drops_descendants_and_duplicates() {
        assert_eq!(
            prune(&["a/build/tmp", "a/build", "b", "a/build", "b/x/y"]),
            vec!["a/build", "b"]
        );
    }

    #[test]
    fn test_keeps_prefix_siblings() {
        // "a/build-tools" shares a string prefix but is not a descendant
        assert_eq!(
            prune(&["a/build-tools", "a/build"]),
            vec!["a/build", "a/build-tools"]
        );
    }

    #[test]
    fn test_no_pair_is_nested() {
        let kept = prune(&["x", "x/y", "z/1", "z/1/2/3", "z/2", "w/x"]);
        for a in &kept {
            for b in &kept {
                if a != b {
                    assert!(!std::path::Path::new(a).starts_with(b));
                }
            }
        }
    }
}
