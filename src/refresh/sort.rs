//! Card ordering
//!
//! Ascending numeric sort with the dashboard's loose tie rule: comparing two
//! keys yields `Greater` exactly when the second is smaller, and `Less` in
//! every other case, including equal keys and NaN on either side. That rule
//! is not a total order, so the cards are ordered with a plain insertion
//! sort rather than the standard library sort, which rejects inconsistent
//! comparators.

use std::cmp::Ordering;

/// `Greater` iff `b < a`, else `Less`. Never `Equal`.
pub fn compare_keys(a: f64, b: f64) -> Ordering {
    if b < a {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Order `items` ascending by their numeric key. Items whose keys never
/// compare `Greater` against a neighbour (equal keys, NaN) keep their
/// relative position.
pub fn sort_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> f64,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare_keys(key(&items[j - 1]), key(&items[j])) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greater_iff_second_is_smaller() {
        assert_eq!(compare_keys(2.0, 1.0), Ordering::Greater);
        assert_eq!(compare_keys(1.0, 2.0), Ordering::Less);
    }

    #[test]
    fn equal_keys_yield_less() {
        // the first argument sorts first
        assert_eq!(compare_keys(1.5, 1.5), Ordering::Less);
    }

    #[test]
    fn nan_yields_less_on_either_side() {
        assert_eq!(compare_keys(f64::NAN, 1.0), Ordering::Less);
        assert_eq!(compare_keys(1.0, f64::NAN), Ordering::Less);
        assert_eq!(compare_keys(f64::NAN, f64::NAN), Ordering::Less);
    }

    #[test]
    fn sorts_ascending() {
        let mut items = vec![3.0, 1.0, 2.0, -1.0];
        sort_by_key(&mut items, |v| *v);
        assert_eq!(items, vec![-1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let mut items = vec![("a", 1.0), ("b", 1.0), ("c", 0.5)];
        sort_by_key(&mut items, |(_, v)| *v);
        assert_eq!(
            items.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn nan_keys_stay_in_place() {
        // a NaN key never compares Greater against a neighbour, so the
        // unfetched card acts as a barrier and keeps its slot
        let mut items = vec![("a", 2.0), ("b", f64::NAN), ("c", 1.0)];
        sort_by_key(&mut items, |(_, v)| *v);
        assert_eq!(
            items.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }
}
