use nba_stats_api::PlayerSeasonRecord;

/// The metrics a player is ranked on, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Minutes,
    Points36,
    FreeThrowRate,
    TrueShooting,
    EffectiveFg,
    ThreePoint,
    AssistPct,
    OffensiveRebPct,
    DefensiveRebPct,
    Steals36,
    Blocks36,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Minutes,
        Metric::Points36,
        Metric::FreeThrowRate,
        Metric::TrueShooting,
        Metric::EffectiveFg,
        Metric::ThreePoint,
        Metric::AssistPct,
        Metric::OffensiveRebPct,
        Metric::DefensiveRebPct,
        Metric::Steals36,
        Metric::Blocks36,
    ];

    /// Source column name.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Minutes => "MIN",
            Metric::Points36 => "PTS_36",
            Metric::FreeThrowRate => "FTr",
            Metric::TrueShooting => "TS_PCT",
            Metric::EffectiveFg => "EFG_PCT",
            Metric::ThreePoint => "FG3_PCT",
            Metric::AssistPct => "AST_PCT",
            Metric::OffensiveRebPct => "OREB_PCT",
            Metric::DefensiveRebPct => "DREB_PCT",
            Metric::Steals36 => "STL_36",
            Metric::Blocks36 => "BLK_36",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Minutes => "Minutes",
            Metric::Points36 => "PTS / 36",
            Metric::FreeThrowRate => "FT Rate",
            Metric::TrueShooting => "True Shooting %",
            Metric::EffectiveFg => "eFG %",
            Metric::ThreePoint => "3P %",
            Metric::AssistPct => "Assist %",
            Metric::OffensiveRebPct => "O-Reb %",
            Metric::DefensiveRebPct => "D-Reb %",
            Metric::Steals36 => "Steals / 36",
            Metric::Blocks36 => "Blocks / 36",
        }
    }

    pub fn value(&self, player: &PlayerSeasonRecord) -> f64 {
        match self {
            Metric::Minutes => player.minutes,
            Metric::Points36 => player.points_per36,
            Metric::FreeThrowRate => player.ft_rate,
            Metric::TrueShooting => player.ts_pct,
            Metric::EffectiveFg => player.efg_pct,
            Metric::ThreePoint => player.fg3_pct,
            Metric::AssistPct => player.ast_pct,
            Metric::OffensiveRebPct => player.oreb_pct,
            Metric::DefensiveRebPct => player.dreb_pct,
            Metric::Steals36 => player.steals_per36,
            Metric::Blocks36 => player.blocks_per36,
        }
    }

    /// Percentage columns and rates display as percentages.
    pub fn is_percentage(&self) -> bool {
        self.column().contains("PCT") || self.label().contains("Rate")
    }

    /// `0.612` → `"61.2%"` for percentage metrics; `33.6` → `"33.6"` otherwise.
    ///
    /// A percentage metric already at 1.0 or above is assumed to be on the
    /// 0–100 scale and is printed as-is.
    pub fn format_value(&self, value: f64) -> String {
        if self.is_percentage() {
            if value < 1.0 {
                format!("{:.1}%", value * 100.0)
            } else {
                format!("{value:.1}%")
            }
        } else {
            format!("{value:.1}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_metrics_with_unique_columns() {
        let mut columns: Vec<_> = Metric::ALL.iter().map(|m| m.column()).collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), 11);
    }

    #[test]
    fn percentage_metrics() {
        assert!(Metric::TrueShooting.is_percentage());
        assert!(Metric::ThreePoint.is_percentage());
        assert!(Metric::FreeThrowRate.is_percentage());
        assert!(!Metric::Minutes.is_percentage());
        assert!(!Metric::Steals36.is_percentage());
    }

    #[test]
    fn format_value_scales_fractions() {
        assert_eq!(Metric::TrueShooting.format_value(0.644), "64.4%");
        assert_eq!(Metric::FreeThrowRate.format_value(0.532), "53.2%");
        assert_eq!(Metric::FreeThrowRate.format_value(2.0), "2.0%");
        assert_eq!(Metric::Minutes.format_value(33.62), "33.6");
        assert_eq!(Metric::Blocks36.format_value(1.76), "1.8");
    }

    #[test]
    fn value_reads_matching_field() {
        let player = PlayerSeasonRecord {
            minutes: 30.0,
            points_per36: 25.0,
            ts_pct: 0.6,
            blocks_per36: 2.0,
            ..Default::default()
        };
        assert_eq!(Metric::Minutes.value(&player), 30.0);
        assert_eq!(Metric::Points36.value(&player), 25.0);
        assert_eq!(Metric::TrueShooting.value(&player), 0.6);
        assert_eq!(Metric::Blocks36.value(&player), 2.0);
    }
}
