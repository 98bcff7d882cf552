// SPDX-License-Identifier: AGPL-3.0-only

//! Deterministic min-score reduction.
//!
//! Within a group, lanes offer their (score, index) in lane order to a
//! running minimum that only moves on a strictly lower score. Groups are
//! then merged the same way in group order. Equal scores therefore resolve
//! to the lowest candidate index regardless of how groups were scheduled.

use crate::model::Model;
use serde::{Deserialize, Serialize};

/// Running minimum over (score, index) offers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tournament {
    best: Option<(f64, usize)>,
}

impl Tournament {
    /// Empty tournament; the first offer always wins.
    #[must_use]
    pub const fn new() -> Self {
        Self { best: None }
    }

    /// Offer a contender. Returns `true` when it becomes the new minimum.
    pub fn offer(&mut self, score: f64, index: usize) -> bool {
        let wins = match self.best {
            None => true,
            Some((current, _)) => score < current,
        };
        if wins {
            self.best = Some((score, index));
        }
        wins
    }

    /// Current (score, index), if anything was offered.
    #[must_use]
    pub const fn best(&self) -> Option<(f64, usize)> {
        self.best
    }
}

/// Winner of one worker group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBest {
    /// Group number.
    pub group: usize,
    /// Candidate index of the winner.
    pub index: usize,
    /// Winner's score.
    pub score: f64,
    /// Winner's scored model.
    pub model: Model,
}

/// Reduce one group's scored lanes, given in lane order.
///
/// Returns `None` for an empty group.
pub fn reduce_group<I>(group: usize, lanes: I) -> Option<GroupBest>
where
    I: IntoIterator<Item = (usize, Model)>,
{
    let mut tournament = Tournament::new();
    let mut winner: Option<Model> = None;
    for (index, model) in lanes {
        if tournament.offer(model.stats.score, index) {
            winner = Some(model);
        }
    }
    let (score, index) = tournament.best()?;
    Some(GroupBest {
        group,
        index,
        score,
        model: winner?,
    })
}

/// Merge group winners in group order; strict `<` keeps the earliest
/// group on ties.
#[must_use]
pub fn merge_groups(groups: &[GroupBest]) -> Option<&GroupBest> {
    let mut tournament = Tournament::new();
    let mut winner = None;
    for g in groups {
        if tournament.offer(g.score, g.index) {
            winner = Some(g);
        }
    }
    winner
}
