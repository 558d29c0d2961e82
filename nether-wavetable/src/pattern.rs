//! Rhythmic event patterns
//!
//! A [`Pattern`] holds one [`StepKind`] per step. Patterns are generated as
//! unique binary event sets, optionally merged into double-length events by
//! [`apply_combine`], then filtered by [`dedupe`].

use hashbrown::HashSet;
use rand::Rng;
use rand::seq::index;
use tracing::{debug, warn};

/// Maximum steps a pattern can hold (two key bits per step in a `u64`)
pub const MAX_PATTERN_STEPS: usize = 32;

/// What happens on a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepKind {
    #[default]
    Silence,
    Event,
    /// An event lasting this step and the following one
    DoubleEvent,
}

impl StepKind {
    fn code(self) -> u64 {
        match self {
            StepKind::Silence => 0,
            StepKind::Event => 1,
            StepKind::DoubleEvent => 2,
        }
    }

    pub fn is_event(self) -> bool {
        !matches!(self, StepKind::Silence)
    }
}

/// Fixed-width identity of a pattern's full marker sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    len: u8,
    bits: u64,
}

/// A contiguous run of steps rendered as one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: StepKind,
    pub start_step: usize,
    pub step_count: usize,
}

/// One frame's worth of step markers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    steps: Vec<StepKind>,
}

impl Pattern {
    /// All-silent pattern of `len` steps
    ///
    /// # Panics
    /// If `len` exceeds [`MAX_PATTERN_STEPS`].
    pub fn silent(len: usize) -> Self {
        assert!(
            len <= MAX_PATTERN_STEPS,
            "pattern of {len} steps exceeds {MAX_PATTERN_STEPS}"
        );
        Self {
            steps: vec![StepKind::Silence; len],
        }
    }

    /// # Panics
    /// If `steps` is longer than [`MAX_PATTERN_STEPS`].
    pub fn from_steps(steps: Vec<StepKind>) -> Self {
        assert!(
            steps.len() <= MAX_PATTERN_STEPS,
            "pattern of {} steps exceeds {MAX_PATTERN_STEPS}",
            steps.len()
        );
        Self { steps }
    }

    /// Pattern with single events at the given step indices
    pub fn with_events(len: usize, events: impl IntoIterator<Item = usize>) -> Self {
        let mut pattern = Self::silent(len);
        for idx in events {
            pattern.steps[idx] = StepKind::Event;
        }
        pattern
    }

    pub fn steps(&self) -> &[StepKind] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps holding `Event` or `DoubleEvent`
    pub fn event_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_event()).count()
    }

    /// Uniqueness key over the full marker sequence
    pub fn key(&self) -> PatternKey {
        let bits = self
            .steps
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, step)| acc | (step.code() << (i * 2)));
        PatternKey {
            len: self.steps.len() as u8,
            bits,
        }
    }

    /// Steps covered by any event; a double event also covers the next step
    pub fn occupancy_mask(&self) -> u64 {
        let last = self.steps.len().saturating_sub(1);
        let mut mask = 0u64;
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                StepKind::Silence => {}
                StepKind::Event => mask |= 1 << i,
                StepKind::DoubleEvent => {
                    mask |= 1 << i;
                    if i < last {
                        mask |= 1 << (i + 1);
                    }
                }
            }
        }
        mask
    }

    /// Event runs in step order
    ///
    /// A double event spans two steps unless it sits on the last step.
    pub fn spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut step = 0;
        while step < self.steps.len() {
            let kind = self.steps[step];
            match kind {
                StepKind::Silence => step += 1,
                StepKind::Event => {
                    spans.push(Span {
                        kind,
                        start_step: step,
                        step_count: 1,
                    });
                    step += 1;
                }
                StepKind::DoubleEvent => {
                    let step_count = if step + 1 < self.steps.len() { 2 } else { 1 };
                    spans.push(Span {
                        kind,
                        start_step: step,
                        step_count,
                    });
                    step += step_count;
                }
            }
        }
        spans
    }
}

/// Binomial coefficient C(n, k), saturating at `u64::MAX`
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// Generate unique single-event patterns with exactly `event_count` events
///
/// The number of patterns is capped at C(step_count, event_count) so the
/// rejection loop always terminates. An event count of 0 yields one silent
/// pattern.
///
/// # Arguments
/// * `rng` - Random source
/// * `desired_count` - How many unique patterns to collect at most
/// * `step_count` - Steps per pattern, clamped to [`MAX_PATTERN_STEPS`]
/// * `event_count` - Events per pattern, clamped to `step_count`
///
/// # Returns
/// Unique patterns in the order they were first drawn
pub fn generate_unique_patterns<R: Rng + ?Sized>(
    rng: &mut R,
    desired_count: usize,
    step_count: usize,
    event_count: usize,
) -> Vec<Pattern> {
    if step_count > MAX_PATTERN_STEPS {
        warn!(step_count, max = MAX_PATTERN_STEPS, "Too many steps, clamping");
    }
    let step_count = step_count.min(MAX_PATTERN_STEPS);
    let events = event_count.min(step_count);
    if events == 0 {
        return vec![Pattern::silent(step_count)];
    }

    let theoretical_max = binomial(step_count as u64, events as u64).max(1);
    let target = (desired_count as u64).min(theoretical_max) as usize;
    if (desired_count as u64) > theoretical_max {
        warn!(
            desired_count,
            theoretical_max, "Requested more patterns than exist, capping"
        );
    }

    let mut seen = HashSet::with_capacity(target);
    let mut patterns = Vec::with_capacity(target);
    let mut draws = 0usize;

    while patterns.len() < target {
        draws += 1;
        let picks = index::sample(rng, step_count, events);
        let pattern = Pattern::with_events(step_count, picks.iter());
        if seen.insert(pattern.key()) {
            patterns.push(pattern);
        }
    }

    debug!(target, draws, step_count, events, "Generated unique patterns");
    patterns
}

/// Probabilistically merge adjacent events into double-length events
///
/// Scans each pattern left to right. Whenever two neighbouring steps are both
/// `Event`, with probability `chance` the first becomes `DoubleEvent`, the second
/// becomes `Silence`, and the scan skips past both. Runs of three events can
/// therefore merge at most their first pair.
pub fn apply_combine<R: Rng + ?Sized>(rng: &mut R, patterns: &[Pattern], chance: f64) -> Vec<Pattern> {
    let mut merged = 0usize;
    let combined = patterns
        .iter()
        .map(|pattern| {
            let mut steps = pattern.steps.clone();
            let mut i = 0;
            while i + 1 < steps.len() {
                if steps[i] == StepKind::Event
                    && steps[i + 1] == StepKind::Event
                    && rng.random::<f64>() < chance
                {
                    steps[i] = StepKind::DoubleEvent;
                    steps[i + 1] = StepKind::Silence;
                    merged += 1;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            Pattern { steps }
        })
        .collect();

    debug!(merged, chance, "Applied combine");
    combined
}

/// Drop repeated patterns, keeping at most `cap` unique ones in first-seen order
pub fn dedupe(patterns: Vec<Pattern>, cap: usize) -> Vec<Pattern> {
    let total = patterns.len();
    let mut seen = HashSet::with_capacity(cap.min(total));
    let mut unique = Vec::with_capacity(cap.min(total));

    for pattern in patterns {
        if unique.len() >= cap {
            break;
        }
        if seen.insert(pattern.key()) {
            unique.push(pattern);
        }
    }

    debug!(kept = unique.len(), dropped = total - unique.len(), cap, "Deduplicated patterns");
    unique
}
