//! Frame interpolation
//!
//! Expands a handful of key frames to a fixed frame count by inserting linear
//! morphs between neighbours, then flattens the result into one sample buffer.

use tracing::debug;

use crate::render::KeyFrame;

/// Where a frame came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSource {
    /// Copied unmodified from key frame `index`
    Key { index: usize },
    /// Blend of key frames `from` and `to` at `position` (0.0 = `from`, 1.0 = `to`)
    Morph { from: usize, to: usize, position: f32 },
}

/// One frame of the finished wavetable
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub samples: Vec<f32>,
    pub source: FrameSource,
}

impl Frame {
    pub fn is_key(&self) -> bool {
        matches!(self.source, FrameSource::Key { .. })
    }
}

/// Number of morph frames inserted into each gap between key frames
///
/// `morphs` frames are spread over `gaps` gaps; the remainder goes one per gap
/// starting from the first.
pub fn gap_lengths(morphs: usize, gaps: usize) -> Vec<usize> {
    if gaps == 0 {
        return Vec::new();
    }
    let base = morphs / gaps;
    let extra = morphs % gaps;
    (0..gaps).map(|g| base + usize::from(g < extra)).collect()
}

/// Linear blend of two equally long sample buffers
pub fn blend(a: &[f32], b: &[f32], t: f32) -> Vec<f32> {
    a.iter().zip(b).map(|(&x, &y)| x + (y - x) * t).collect()
}

/// Expand key frames to exactly `total` frames
///
/// With one key frame it is repeated; with more, morph frames at
/// `t = m / (k + 1)` (m = 1..=k) fill each gap of k inserted frames. Key frames
/// past `total` are dropped.
pub fn expand(key_frames: &[KeyFrame], total: usize) -> Vec<Frame> {
    let keys = &key_frames[..key_frames.len().min(total)];

    match keys.len() {
        0 => Vec::new(),
        1 => (0..total)
            .map(|_| Frame {
                samples: keys[0].samples.clone(),
                source: FrameSource::Key { index: 0 },
            })
            .collect(),
        count => {
            let gaps = gap_lengths(total - count, count - 1);
            debug!(key_frames = count, total, ?gaps, "Expanding key frames");

            let mut frames = Vec::with_capacity(total);
            for (index, key) in keys.iter().enumerate() {
                frames.push(Frame {
                    samples: key.samples.clone(),
                    source: FrameSource::Key { index },
                });

                let Some(&inserted) = gaps.get(index) else {
                    continue;
                };
                let next = &keys[index + 1];
                for m in 1..=inserted {
                    let position = m as f32 / (inserted + 1) as f32;
                    frames.push(Frame {
                        samples: blend(&key.samples, &next.samples, position),
                        source: FrameSource::Morph {
                            from: index,
                            to: index + 1,
                            position,
                        },
                    });
                }
            }
            frames
        }
    }
}

/// Concatenate every frame's samples into one buffer
pub fn flatten(frames: &[Frame]) -> Vec<f32> {
    let total: usize = frames.iter().map(|f| f.samples.len()).sum();
    let mut out = Vec::with_capacity(total);
    for frame in frames {
        out.extend_from_slice(&frame.samples);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: f32, len: usize) -> KeyFrame {
        KeyFrame {
            samples: vec![value; len],
            amplitude: 1.0,
        }
    }

    #[test]
    fn test_gap_lengths() {
        assert_eq!(gap_lengths(10, 3), vec![4, 3, 3]);
        assert_eq!(gap_lengths(0, 4), vec![0, 0, 0, 0]);
        assert_eq!(gap_lengths(5, 0), Vec::<usize>::new());
        assert_eq!(gap_lengths(192, 63).iter().sum::<usize>(), 192);
    }

    #[test]
    fn test_expand_empty() {
        assert!(expand(&[], 256).is_empty());
    }

    #[test]
    fn test_expand_single_key_repeats() {
        let frames = expand(&[key(0.5, 4)], 256);
        assert_eq!(frames.len(), 256);
        assert!(frames.iter().all(|f| f.samples == vec![0.5; 4] && f.is_key()));
    }

    #[test]
    fn test_expand_two_keys() {
        let frames = expand(&[key(0.0, 2), key(1.0, 2)], 5);
        let values: Vec<f32> = frames.iter().map(|f| f.samples[0]).collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(frames[0].is_key() && frames[4].is_key());
        assert_eq!(
            frames[2].source,
            FrameSource::Morph {
                from: 0,
                to: 1,
                position: 0.5
            }
        );
    }

    #[test]
    fn test_expand_length_for_every_key_count() {
        let total = 256;
        let keys: Vec<KeyFrame> = (0..total).map(|i| key(i as f32, 3)).collect();
        for count in 1..=total {
            let frames = expand(&keys[..count], total);
            assert_eq!(frames.len(), total, "key count {count}");
            let expected_keys = if count == 1 { total } else { count };
            assert_eq!(frames.iter().filter(|f| f.is_key()).count(), expected_keys);
        }
    }

    #[test]
    fn test_expand_preserves_keys_in_order() {
        let keys = vec![key(-1.0, 8), key(0.3, 8), key(-0.2, 8), key(1.0, 8)];
        let frames = expand(&keys, 64);
        let kept: Vec<&Frame> = frames.iter().filter(|f| f.is_key()).collect();
        assert_eq!(kept.len(), 4);
        for (i, frame) in kept.iter().enumerate() {
            assert_eq!(frame.source, FrameSource::Key { index: i });
            assert_eq!(frame.samples, keys[i].samples);
        }
        assert_eq!(frames.first().unwrap().samples, keys[0].samples);
        assert_eq!(frames.last().unwrap().samples, keys[3].samples);
    }

    #[test]
    fn test_morphs_stay_between_bounding_keys() {
        let a = KeyFrame {
            samples: vec![-1.0, 0.5, 1.0, -0.25],
            amplitude: 1.0,
        };
        let b = KeyFrame {
            samples: vec![1.0, 0.5, -1.0, 0.75],
            amplitude: 1.0,
        };
        let frames = expand(&[a.clone(), b.clone()], 20);
        for pair in frames.windows(2) {
            for s in 0..4 {
                let lo = a.samples[s].min(b.samples[s]);
                let hi = a.samples[s].max(b.samples[s]);
                let (x, y) = (pair[0].samples[s], pair[1].samples[s]);
                assert!(x >= lo - 1e-6 && x <= hi + 1e-6);
                // Each step moves monotonically toward `b`
                let direction = b.samples[s] - a.samples[s];
                assert!((y - x) * direction >= -1e-6);
            }
        }
    }

    #[test]
    fn test_more_keys_than_total() {
        let keys: Vec<KeyFrame> = (0..10).map(|i| key(i as f32, 1)).collect();
        let frames = expand(&keys, 4);
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(Frame::is_key));
    }

    #[test]
    fn test_flatten() {
        let frames = expand(&[key(0.0, 3), key(1.0, 3)], 3);
        let flat = flatten(&frames);
        assert_eq!(flat, vec![0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]);
    }
}
