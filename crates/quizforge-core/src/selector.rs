//! Question selection.
//!
//! Practice draws with exposure-inverse weights, `1 / (shown + 1)`, so fresh
//! questions come up more often without any seen question dropping to zero.
//! Tests draw uniformly without replacement.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::Rng;

use crate::error::{QuizError, Result};
use crate::model::QuestionRecord;

/// Smallest active pool a practice or test session will start with.
pub const MIN_POOL_SIZE: usize = 5;

/// Sampling weight for a record with the given exposure count.
pub fn weight(shown: u32) -> f64 {
    1.0 / (shown as f64 + 1.0)
}

/// Fail with [`QuizError::InsufficientPool`] unless `available >= required`.
pub fn ensure_pool(available: usize, required: usize) -> Result<()> {
    if available < required {
        return Err(QuizError::InsufficientPool {
            available,
            required,
        });
    }
    Ok(())
}

/// Exposure-inverse weighted draw over a pool of records.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedSelector;

impl WeightedSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one record. Weights come from the current `shown` values, so
    /// repeated calls see counter changes immediately. The same record may be
    /// returned twice in a row.
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a [QuestionRecord],
        rng: &mut R,
    ) -> Result<&'a QuestionRecord> {
        ensure_pool(pool.len(), 1)?;

        let dist = WeightedIndex::new(pool.iter().map(|r| weight(r.shown)))
            .map_err(|e| QuizError::validation(format!("cannot weight question pool: {e}")))?;
        let picked = &pool[dist.sample(rng)];

        tracing::debug!(id = picked.id, shown = picked.shown, "selected question");
        Ok(picked)
    }
}

/// Draw `count` distinct records uniformly at random, in random order.
pub fn sample_uniform<'a, R: Rng + ?Sized>(
    pool: &'a [QuestionRecord],
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a QuestionRecord>> {
    ensure_pool(pool.len(), count)?;
    Ok(index::sample(rng, pool.len(), count)
        .into_iter()
        .map(|i| &pool[i])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewQuestion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(shown: &[u32]) -> Vec<QuestionRecord> {
        shown
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let mut r = NewQuestion::free_form(format!("Q{}", i + 1), "a")
                    .into_record(i as u32 + 1)
                    .unwrap();
                r.shown = s;
                r
            })
            .collect()
    }

    #[test]
    fn weights_shrink_with_exposure() {
        assert_eq!(weight(0), 1.0);
        assert_eq!(weight(1), 0.5);
        assert!(weight(1000) > 0.0);
    }

    #[test]
    fn unseen_question_dominates() {
        let pool = pool(&[100, 150, 0, 120, 200]);
        let selector = WeightedSelector::new();
        let mut rng = StdRng::seed_from_u64(99);

        let hits = (0..1000)
            .filter(|_| selector.select(&pool, &mut rng).unwrap().id == 3)
            .count();
        assert!(hits > 900, "unseen question picked {hits}/1000 times");
    }

    #[test]
    fn seen_questions_still_get_picked() {
        let pool = pool(&[0, 3]);
        let selector = WeightedSelector::new();
        let mut rng = StdRng::seed_from_u64(5);

        let ids: HashSet<u32> = (0..500)
            .map(|_| selector.select(&pool, &mut rng).unwrap().id)
            .collect();
        assert!(ids.contains(&2));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = WeightedSelector::new().select(&[], &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientPool { available: 0, .. }));
    }

    #[test]
    fn uniform_sample_is_distinct() {
        let pool = pool(&[0; 8]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let picked = sample_uniform(&pool, 5, &mut rng).unwrap();
            let ids: HashSet<u32> = picked.iter().map(|r| r.id).collect();
            assert_eq!(ids.len(), 5);
        }
    }

    #[test]
    fn uniform_sample_larger_than_pool_fails() {
        let pool = pool(&[0; 3]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_uniform(&pool, 4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InsufficientPool {
                available: 3,
                required: 4
            }
        ));
    }
}
