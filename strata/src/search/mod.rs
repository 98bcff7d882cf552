// SPDX-License-Identifier: AGPL-3.0-only

//! Parallel stochastic variation search.
//!
//! A batch perturbs a read-only template N times, scores every candidate
//! with the statistics engine and keeps the lowest score. Candidates are
//! split into fixed-size worker groups scheduled on the rayon pool. Each
//! group evaluates its lanes and reduces them in lane order; the group
//! winners are then merged on the calling thread in group order. The batch
//! result is bit-identical for any thread count.
//!
//! Candidate `i` is a pure function of `(seed, i)`, so any candidate (for
//! instance the runners-up in [`VariationSearch::top_k`]) can be rebuilt
//! later without storing the batch.

pub mod config;
pub mod perturb;
pub mod reduce;
pub mod rng;

pub use config::{SearchConfig, DEFAULT_GROUP_SIZE};
pub use perturb::{generate_candidate, PerturbationFactors};
pub use reduce::{merge_groups, reduce_group, GroupBest, Tournament};
pub use rng::Pcg32;

use crate::error::StrataError;
use crate::model::Model;
use crate::physics::layered::{score_model, ScoringPolicy};
use crate::tolerances::INVALID_SCORE_SENTINEL;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Candidates evaluated.
    pub evaluated: usize,
    /// Candidates with a score below the sentinel.
    pub valid: usize,
    /// Candidates that scored the sentinel.
    pub invalid: usize,
    /// Mean score over valid candidates, if any.
    pub mean_valid_score: Option<f64>,
    /// Lowest score in the batch.
    pub min_score: f64,
}

impl BatchSummary {
    fn from_scores(scores: &[f64]) -> Self {
        let valid: Vec<f64> = scores
            .iter()
            .copied()
            .filter(|s| s.is_finite() && *s < INVALID_SCORE_SENTINEL)
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let mean_valid_score =
            (!valid.is_empty()).then(|| valid.iter().sum::<f64>() / valid.len() as f64);
        Self {
            evaluated: scores.len(),
            valid: valid.len(),
            invalid: scores.len() - valid.len(),
            mean_valid_score,
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Lowest-scoring candidate, scored.
    pub best: Model,
    /// Its candidate index.
    pub best_index: usize,
    /// Its score.
    pub best_score: f64,
    /// Winner of every worker group, in group order.
    pub group_bests: Vec<GroupBest>,
    /// Score of every candidate, by index.
    pub scores: Vec<f64>,
    /// Every scored candidate, when `keep_candidates` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Model>>,
    /// Batch counts.
    pub summary: BatchSummary,
}

/// A configured search over one template.
#[derive(Debug, Clone)]
pub struct VariationSearch<'a> {
    template: &'a Model,
    config: SearchConfig,
}

struct GroupOutcome {
    best: Option<GroupBest>,
    scores: Vec<f64>,
    kept: Vec<Model>,
}

impl<'a> VariationSearch<'a> {
    /// Validate the template and configuration.
    ///
    /// # Errors
    ///
    /// Template validation failures and [`StrataError::InvalidConfig`].
    pub fn new(template: &'a Model, config: SearchConfig) -> Result<Self, StrataError> {
        template.validate()?;
        config.validate()?;
        Ok(Self { template, config })
    }

    /// The batch configuration.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Scoring policy derived from the configuration.
    #[must_use]
    pub const fn policy(&self) -> ScoringPolicy {
        ScoringPolicy::new(self.config.error_threshold)
    }

    /// Build and score candidate `index`.
    #[must_use]
    pub fn candidate(&self, index: usize) -> Model {
        // `validate` bounds num_variations to u32; larger indices wrap.
        #[allow(clippy::cast_possible_truncation)]
        let key = index as u32;
        let mut model = generate_candidate(
            self.template,
            self.config.seed,
            key,
            self.config.annealing_temperature,
        );
        model.stats = score_model(&model, self.policy(), self.config.precision);
        model
    }

    /// Run the batch.
    ///
    /// # Errors
    ///
    /// Never for a search built by [`VariationSearch::new`]; the result type
    /// covers an empty reduction.
    pub fn run(&self) -> Result<BatchResult, StrataError> {
        let n = self.config.num_variations;
        let group_size = self.config.group_size;
        let keep = self.config.keep_candidates;

        let outcomes: Vec<GroupOutcome> = (0..self.config.num_groups())
            .into_par_iter()
            .map(|group| {
                let start = group * group_size;
                let end = (start + group_size).min(n);
                let lanes: Vec<(usize, Model)> =
                    (start..end).map(|i| (i, self.candidate(i))).collect();
                let scores = lanes.iter().map(|(_, m)| m.stats.score).collect();
                let kept = if keep {
                    lanes.iter().map(|(_, m)| m.clone()).collect()
                } else {
                    Vec::new()
                };
                let best = reduce_group(group, lanes);
                if let Some(b) = &best {
                    log::debug!(
                        "group {group}: lanes {start}..{end}, best index {} score {:.6e}",
                        b.index,
                        b.score
                    );
                }
                GroupOutcome { best, scores, kept }
            })
            .collect();

        let mut group_bests = Vec::with_capacity(outcomes.len());
        let mut scores = Vec::with_capacity(n);
        let mut candidates = keep.then(|| Vec::with_capacity(n));
        for outcome in outcomes {
            scores.extend(outcome.scores);
            if let Some(all) = candidates.as_mut() {
                all.extend(outcome.kept);
            }
            if let Some(best) = outcome.best {
                group_bests.push(best);
            }
        }

        let winner = merge_groups(&group_bests)
            .cloned()
            .ok_or_else(|| StrataError::InvalidConfig("batch produced no candidates".into()))?;
        let summary = BatchSummary::from_scores(&scores);

        log::info!(
            "batch of {n} ({} groups, {}): best index {} score {:.6e}, {} valid / {} invalid",
            group_bests.len(),
            self.config.precision,
            winner.index,
            winner.score,
            summary.valid,
            summary.invalid
        );

        Ok(BatchResult {
            best: winner.model,
            best_index: winner.index,
            best_score: winner.score,
            group_bests,
            scores,
            candidates,
            summary,
        })
    }

    /// The `k` lowest-scoring candidates of a finished batch, ties by index,
    /// rebuilt from their keys.
    #[must_use]
    pub fn top_k(&self, result: &BatchResult, k: usize) -> Vec<(usize, Model)> {
        let mut order: Vec<usize> = (0..result.scores.len()).collect();
        order.sort_by(|&i, &j| {
            result.scores[i]
                .total_cmp(&result.scores[j])
                .then(i.cmp(&j))
        });
        order
            .into_iter()
            .take(k)
            .map(|i| (i, self.candidate(i)))
            .collect()
    }
}

/// Validate, run and return the batch for `template`.
///
/// # Errors
///
/// See [`VariationSearch::new`].
pub fn run_batch(template: &Model, config: SearchConfig) -> Result<BatchResult, StrataError> {
    VariationSearch::new(template, config)?.run()
}
