//! Uniform sampling without replacement.

use rand::seq::index;
use rand::Rng;

use crate::fs_op::error::SubsetError;

/// Pick `count` distinct items from `population`, uniformly at random.
///
/// Every subset of size `count` is equally likely. The returned items are in
/// the (random) order they were drawn. A negative `count`, or one larger
/// than the population, is `InvalidSampleSize`.
pub fn select_subset<T, R>(population: &[T], count: i64, rng: &mut R) -> Result<Vec<T>, SubsetError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let available = population.len();
    let amount = usize::try_from(count)
        .ok()
        .filter(|n| *n <= available)
        .ok_or(SubsetError::InvalidSampleSize {
            requested: count,
            available,
        })?;

    Ok(index::sample(rng, available, amount)
        .into_iter()
        .map(|i| population[i].clone())
        .collect())
}
