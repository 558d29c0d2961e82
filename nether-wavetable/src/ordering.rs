//! Similarity ordering of key-frame patterns
//!
//! Neighbouring key frames get morphed into each other, so patterns are laid out
//! as a greedy nearest-neighbour tour over the Hamming distances of their
//! occupancy masks. The tour starts at the most central pattern.

use tracing::debug;

use crate::pattern::Pattern;

/// Pairwise Hamming distances between occupancy masks
///
/// Symmetric with a zero diagonal.
pub fn distance_matrix(patterns: &[Pattern]) -> Vec<Vec<u32>> {
    let masks: Vec<u64> = patterns.iter().map(Pattern::occupancy_mask).collect();
    masks
        .iter()
        .map(|a| masks.iter().map(|b| (a ^ b).count_ones()).collect())
        .collect()
}

/// Index of the pattern with the smallest average distance to all others
///
/// Ties resolve to the lowest index.
pub fn most_central(distances: &[Vec<u32>]) -> Option<usize> {
    // Every row averages over the same count, so comparing sums is enough
    distances
        .iter()
        .map(|row| row.iter().map(|&d| d as u64).sum::<u64>())
        .enumerate()
        .min_by_key(|&(idx, total)| (total, idx))
        .map(|(idx, _)| idx)
}

/// Greedy open-path tour starting at `start`
///
/// Always steps to the closest unvisited index, lowest index on ties.
pub fn nearest_neighbour_tour(distances: &[Vec<u32>], start: usize) -> Vec<usize> {
    let n = distances.len();
    if start >= n {
        return Vec::new();
    }
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);

    let mut current = start;
    visited[current] = true;
    tour.push(current);

    while tour.len() < n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by_key(|&j| (distances[current][j], j));
        let Some(next) = next else { break };
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour
}

/// Reorder patterns so structurally similar ones sit next to each other
///
/// Returns a permutation of the input; 0 or 1 patterns come back unchanged.
pub fn order_by_similarity(patterns: Vec<Pattern>) -> Vec<Pattern> {
    if patterns.len() <= 1 {
        return patterns;
    }

    let distances = distance_matrix(&patterns);
    let Some(start) = most_central(&distances) else {
        return patterns;
    };
    let tour = nearest_neighbour_tour(&distances, start);

    let cost: u32 = tour.windows(2).map(|w| distances[w[0]][w[1]]).sum();
    debug!(patterns = patterns.len(), start, cost, "Ordered patterns by similarity");

    let mut slots: Vec<Option<Pattern>> = patterns.into_iter().map(Some).collect();
    tour.into_iter().filter_map(|idx| slots[idx].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{StepKind, apply_combine, generate_unique_patterns};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn bits(mask: &str) -> Pattern {
        Pattern::with_events(
            mask.len(),
            mask.chars()
                .enumerate()
                .filter(|&(_, c)| c == '1')
                .map(|(i, _)| i),
        )
    }

    #[test]
    fn test_distance_matrix_symmetric() {
        let patterns = vec![bits("1100"), bits("1010"), bits("0011")];
        let d = distance_matrix(&patterns);
        assert_eq!(d, vec![vec![0, 2, 4], vec![2, 0, 2], vec![4, 2, 0]]);
    }

    #[test]
    fn test_double_event_occupies_next_step() {
        let double = Pattern::from_steps(vec![
            StepKind::DoubleEvent,
            StepKind::Silence,
            StepKind::Silence,
            StepKind::Silence,
        ]);
        let d = distance_matrix(&[double, bits("1100")]);
        assert_eq!(d[0][1], 0);
    }

    #[test]
    fn test_most_central_prefers_lowest_index_on_tie() {
        let d = vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]];
        assert_eq!(most_central(&d), Some(0));
        assert_eq!(most_central(&[]), None);
    }

    #[test]
    fn test_order_starts_central_and_walks_neighbours() {
        let patterns = vec![bits("1111"), bits("1000"), bits("1100"), bits("1110")];
        let ordered = order_by_similarity(patterns);
        // "1100" has the smallest total distance (2 + 1 + 0 + 1)
        assert_eq!(
            ordered,
            vec![bits("1100"), bits("1000"), bits("1110"), bits("1111")]
        );
    }

    #[test]
    fn test_small_inputs_unchanged() {
        assert!(order_by_similarity(Vec::new()).is_empty());
        let single = vec![bits("1010")];
        assert_eq!(order_by_similarity(single.clone()), single);
    }

    #[test]
    fn test_order_is_permutation() {
        let mut rng = Pcg64::seed_from_u64(99);
        for count in [0usize, 1, 2, 3, 17, 64] {
            let raw = generate_unique_patterns(&mut rng, count, 16, 5);
            let patterns = apply_combine(&mut rng, &raw, 0.5);
            let ordered = order_by_similarity(patterns.clone());
            assert_eq!(ordered.len(), patterns.len());

            let mut a: Vec<_> = patterns.iter().map(Pattern::key).collect();
            let mut b: Vec<_> = ordered.iter().map(Pattern::key).collect();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_tour_visits_everything_once() {
        let d = vec![
            vec![0, 5, 1, 9],
            vec![5, 0, 4, 2],
            vec![1, 4, 0, 7],
            vec![9, 2, 7, 0],
        ];
        assert_eq!(nearest_neighbour_tour(&d, 0), vec![0, 2, 1, 3]);
    }
}
