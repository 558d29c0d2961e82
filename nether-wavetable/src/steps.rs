//! Step partitioning
//!
//! Splits one frame's samples into evenly sized rhythmic steps.

/// Divide `total` samples into `steps` nearly-equal integer widths
///
/// Width `i` is `floor((i + 1) * total / steps) - floor(i * total / steps)`, so the
/// widths always sum to `total` and no two widths differ by more than one sample.
///
/// # Arguments
/// * `total` - Samples in one frame
/// * `steps` - Number of steps (1..=total)
///
/// # Returns
/// One width per step, in step order
pub fn partition(total: usize, steps: usize) -> Vec<usize> {
    if steps == 0 {
        return Vec::new();
    }

    (0..steps)
        .map(|i| (i + 1) * total / steps - i * total / steps)
        .collect()
}

/// Sample offset at which each step begins
///
/// Has one more entry than `sizes`; the last entry is the frame length.
pub fn step_offsets(sizes: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(sizes.len() + 1);
    let mut pos = 0;
    offsets.push(pos);
    for &size in sizes {
        pos += size;
        offsets.push(pos);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even() {
        assert_eq!(partition(2048, 16), vec![128; 16]);
    }

    #[test]
    fn test_partition_uneven() {
        let sizes = partition(10, 4);
        assert_eq!(sizes, vec![2, 3, 2, 3]);
        assert_eq!(sizes.iter().sum::<usize>(), 10);
    }

    #[test]
    fn test_partition_sums_and_spread() {
        for total in [1, 7, 100, 2048] {
            for steps in 1..=total.min(64) {
                let sizes = partition(total, steps);
                assert_eq!(sizes.len(), steps);
                assert_eq!(sizes.iter().sum::<usize>(), total);
                assert!(sizes.iter().all(|&s| s > 0), "zero width for {total}/{steps}");

                let min = *sizes.iter().min().unwrap();
                let max = *sizes.iter().max().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn test_partition_all_steps_of_one_frame() {
        for steps in 4..=32 {
            let sizes = partition(2048, steps);
            assert_eq!(sizes.iter().sum::<usize>(), 2048);
        }
    }

    #[test]
    fn test_partition_zero_steps() {
        assert!(partition(2048, 0).is_empty());
    }

    #[test]
    fn test_step_offsets() {
        let offsets = step_offsets(&[2, 3, 2, 3]);
        assert_eq!(offsets, vec![0, 2, 5, 7, 10]);
    }
}
