//! Stable descending insertion sort over scored zones.
//!
//! The hand-rolled sort is a contract of this system, not an optimization
//! accident: the standard library sort must not be substituted here. The
//! function returns its comparison count so tests can pin the O(n²)
//! behavior (n·(n−1)/2 comparisons on reverse-ordered input, n−1 on
//! already-ordered input) and catch a silent swap-in of a library sort.

use crate::ranking::types::ScoredZone;

/// Sorts zones in place, descending by `score`, and returns the number of
/// score comparisons performed.
///
/// The backward walk shifts while the visited score is strictly less than
/// the current one; the strict `<` keeps equal-score zones in their input
/// order (stable, first-aggregated wins).
pub fn insertion_sort_by_score(zones: &mut [ScoredZone]) -> u64 {
    let n = zones.len();
    let mut comparisons: u64 = 0;

    for i in 1..n {
        let current = zones[i].clone();
        let mut j = i;

        while j > 0 {
            comparisons += 1;
            if zones[j - 1].score < current.score {
                zones[j] = zones[j - 1].clone();
                j -= 1;
            } else {
                break;
            }
        }

        zones[j] = current;
    }

    comparisons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(zone_id: u32, score: f64) -> ScoredZone {
        ScoredZone {
            zone_id,
            zone: format!("zone-{zone_id}"),
            borough: "Manhattan".to_string(),
            trip_count: 1,
            avg_fare: 1.0,
            avg_distance: 1.0,
            score,
        }
    }

    fn ids(zones: &[ScoredZone]) -> Vec<u32> {
        zones.iter().map(|z| z.zone_id).collect()
    }

    #[test]
    fn test_sorts_descending() {
        let mut zones = vec![scored(1, 9.0), scored(2, 16.5), scored(3, 12.0)];
        insertion_sort_by_score(&mut zones);

        assert_eq!(ids(&zones), vec![2, 3, 1]);
        for pair in zones.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_empty_and_single_are_noops() {
        let mut empty: Vec<ScoredZone> = vec![];
        assert_eq!(insertion_sort_by_score(&mut empty), 0);

        let mut one = vec![scored(1, 5.0)];
        assert_eq!(insertion_sort_by_score(&mut one), 0);
        assert_eq!(ids(&one), vec![1]);
    }

    #[test]
    fn test_stable_under_ties() {
        let mut zones = vec![
            scored(10, 5.0),
            scored(20, 5.0),
            scored(30, 5.0),
        ];
        insertion_sort_by_score(&mut zones);

        // All-equal scores keep input order exactly
        assert_eq!(ids(&zones), vec![10, 20, 30]);
    }

    #[test]
    fn test_stable_ties_among_mixed_scores() {
        let mut zones = vec![
            scored(1, 3.0),
            scored(2, 7.0),
            scored(3, 3.0),
            scored(4, 7.0),
        ];
        insertion_sort_by_score(&mut zones);

        assert_eq!(ids(&zones), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_quadratic_comparisons_on_reverse_ordered_input() {
        // Ascending scores are worst case for a descending sort: element i
        // walks all the way to the front, i comparisons each.
        let n = 20u32;
        let mut zones: Vec<ScoredZone> = (0..n).map(|i| scored(i, i as f64)).collect();

        let comparisons = insertion_sort_by_score(&mut zones);
        assert_eq!(comparisons, (n as u64) * (n as u64 - 1) / 2);

        let expected: Vec<u32> = (0..n).rev().collect();
        assert_eq!(ids(&zones), expected);
    }

    #[test]
    fn test_linear_comparisons_on_sorted_input() {
        let n = 20u32;
        let mut zones: Vec<ScoredZone> = (0..n).map(|i| scored(i, (n - i) as f64)).collect();

        let comparisons = insertion_sort_by_score(&mut zones);
        assert_eq!(comparisons, n as u64 - 1);
    }

    #[test]
    fn test_no_elements_created_or_dropped() {
        let mut zones = vec![scored(1, 2.0), scored(2, 8.0), scored(3, 4.0), scored(4, 8.0)];
        insertion_sort_by_score(&mut zones);

        let mut seen = ids(&zones);
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }
}
