use crate::analytics::metrics::Metric;
use nba_stats_api::PlayerSeasonRecord;
use std::collections::HashMap;

/// Percentile rank (0–100] of every value within `values`.
///
/// Values are ranked 1..=n in ascending order; tied values share the mean of
/// the ranks they span. The rank is then expressed as a share of `n`, so the
/// largest value always lands on 100.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut ranks = vec![0.0; n];
    if n == 0 {
        return ranks;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let shared_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared_rank / n as f64 * 100.0;
        }
        start = end;
    }

    ranks
}

/// Per-player percentile scores for a population, one score per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PercentileProfile {
    metrics: Vec<Metric>,
    scores: HashMap<u32, Vec<f64>>,
}

impl PercentileProfile {
    /// Rank every player of `population` on every metric.
    ///
    /// The population is taken as given: callers filter it first, and a new
    /// profile must be computed whenever that filter changes.
    pub fn compute(population: &[PlayerSeasonRecord], metrics: &[Metric]) -> Self {
        let mut scores: HashMap<u32, Vec<f64>> = population
            .iter()
            .map(|p| (p.player_id, Vec::with_capacity(metrics.len())))
            .collect();

        for metric in metrics {
            let values: Vec<f64> = population.iter().map(|p| metric.value(p)).collect();
            let ranks = percentile_ranks(&values);
            for (player, rank) in population.iter().zip(ranks) {
                if let Some(row) = scores.get_mut(&player.player_id) {
                    row.push(rank);
                }
            }
        }

        Self {
            metrics: metrics.to_vec(),
            scores,
        }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Scores for `player_id`, in [`Self::metrics`] order.
    pub fn scores(&self, player_id: u32) -> Option<&[f64]> {
        self.scores.get(&player_id).map(Vec::as_slice)
    }

    pub fn score(&self, player_id: u32, metric: Metric) -> Option<f64> {
        let idx = self.metrics.iter().position(|m| *m == metric)?;
        self.scores.get(&player_id)?.get(idx).copied()
    }
}
