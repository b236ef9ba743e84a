//! Crossover helpers for fixed-length sequences.
//!
//! Every helper clones genes into a fresh `Vec`, so children never share
//! mutable state with their parents.

use crate::error::{EvolutionError, Result};
use crate::genotype::CrossoverKind;
use crate::rng::RandomSource;

fn ensure_same_length<T>(first: &[T], second: &[T]) -> Result<()> {
    if first.len() != second.len() {
        return Err(EvolutionError::Breeding(format!(
            "Parents differ in length ({} vs {})",
            first.len(),
            second.len()
        )));
    }
    Ok(())
}

/// Dispatches to [`one_point`] or [`uniform`].
pub fn crossover<T: Clone>(
    first: &[T],
    second: &[T],
    kind: CrossoverKind,
    rng: &mut dyn RandomSource,
) -> Result<Vec<T>> {
    match kind {
        CrossoverKind::OnePoint => one_point(first, second, rng),
        CrossoverKind::Uniform => uniform(first, second, rng),
    }
}

/// One-point crossover with a split drawn uniformly from `0..=len`.
pub fn one_point<T: Clone>(
    first: &[T],
    second: &[T],
    rng: &mut dyn RandomSource,
) -> Result<Vec<T>> {
    ensure_same_length(first, second)?;
    let split = rng.next_below(first.len() + 1);
    one_point_at(first, second, split)
}

/// One-point crossover at a fixed split: genes `[0, split)` come from
/// `first`, genes `[split, len)` from `second`.
pub fn one_point_at<T: Clone>(first: &[T], second: &[T], split: usize) -> Result<Vec<T>> {
    ensure_same_length(first, second)?;
    if split > first.len() {
        return Err(EvolutionError::Breeding(format!(
            "Split index {} exceeds genome length {}",
            split,
            first.len()
        )));
    }

    let mut child = Vec::with_capacity(first.len());
    child.extend_from_slice(&first[..split]);
    child.extend_from_slice(&second[split..]);
    Ok(child)
}

/// Uniform crossover: each gene comes from `first` when the coin flip is
/// `true`, otherwise from `second`.
pub fn uniform<T: Clone>(
    first: &[T],
    second: &[T],
    rng: &mut dyn RandomSource,
) -> Result<Vec<T>> {
    ensure_same_length(first, second)?;
    Ok(first
        .iter()
        .zip(second)
        .map(|(a, b)| if rng.next_bool() { a.clone() } else { b.clone() })
        .collect())
}
