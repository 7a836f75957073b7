//! Average-pace reconstruction from a population of ghosts.
//!
//! All arithmetic is exact integer math so identical populations always
//! produce byte-identical output.

use crate::game::Ghost;

/// Average pace of a population, relative to a flat reference line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostAverage {
    /// Sum of the per-segment means
    pub score: i32,
    /// Per-segment floor mean across the population
    pub mean: Vec<i32>,
    /// Flattest integer line summing exactly to `score`
    pub reference: Vec<i32>,
    /// `mean - reference`, per segment
    pub delta: Vec<i32>,
}

impl GhostAverage {
    /// Delta encoded as signed bytes, saturating values that do not fit
    pub fn delta_ghost(&self) -> Ghost {
        Ghost::new(
            self.delta
                .iter()
                .map(|&d| d.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8)
                .collect(),
        )
    }
}

/// Average `traces` over `length` checkpoints.
///
/// Returns `None` for an empty population. Traces shorter than `length`
/// contribute zero past their end; longer traces are cut at `length`.
pub fn average_ghosts<'a, I>(traces: I, length: usize) -> Option<GhostAverage>
where
    I: IntoIterator<Item = &'a Ghost>,
{
    let mut sums = vec![0i32; length];
    let mut count = 0i32;

    for ghost in traces {
        for (index, sum) in sums.iter_mut().enumerate() {
            *sum += ghost.segment(index);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let mean: Vec<i32> = sums.iter().map(|sum| sum.div_euclid(count)).collect();
    let score = mean.iter().sum();
    let reference = reference_pace(score, length);
    let delta = mean.iter().zip(&reference).map(|(m, r)| m - r).collect();

    Some(GhostAverage {
        score,
        mean,
        reference,
        delta,
    })
}

/// Spread `total` over `length` buckets as evenly as integers allow.
///
/// Every bucket starts at the floor share; the remainder (always smaller
/// than `length`) is handed out one point at a time, striding across the
/// line so it is not piled into the leading buckets.
pub fn reference_pace(total: i32, length: usize) -> Vec<i32> {
    if length == 0 {
        return Vec::new();
    }

    let buckets = length as i32;
    let mut reference = vec![total.div_euclid(buckets); length];

    let shortfall = total.rem_euclid(buckets) as usize;
    if shortfall > 0 {
        let jump = (length / shortfall).max(1);
        for index in (0..length).step_by(jump).take(shortfall) {
            reference[index] += 1;
        }
    }

    debug_assert_eq!(reference.iter().sum::<i32>(), total);
    reference
}
