use std::collections::HashMap;

use crate::core::{GameRecord, GameResult, PlayerStats};

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Fold completed game records into per-player summary rows.
///
/// `InProgress` records are skipped. Output is sorted by wins descending,
/// tie-broken by total games descending.
pub fn aggregate(records: &[GameRecord]) -> Vec<PlayerStats> {
    let mut by_player: HashMap<&str, Vec<&GameRecord>> = HashMap::new();
    for record in records.iter().filter(|r| r.result.is_completed()) {
        by_player.entry(&record.player_name).or_default().push(record);
    }

    let mut stats: Vec<PlayerStats> = by_player
        .into_iter()
        .map(|(player_name, games)| {
            let total_games = games.len() as u32;
            let won: Vec<&&GameRecord> = games
                .iter()
                .filter(|g| g.result == GameResult::Won)
                .collect();
            let wins = won.len() as u32;
            let losses = total_games - wins;

            let win_rate = if total_games > 0 {
                round_to(wins as f64 / total_games as f64 * 100.0, 1)
            } else {
                0.0
            };

            let avg_attempts_to_win = if wins > 0 {
                let sum: u64 = won.iter().map(|g| g.attempts_count as u64).sum();
                Some(round_to(sum as f64 / wins as f64, 2))
            } else {
                None
            };

            PlayerStats {
                player_name: player_name.to_string(),
                total_games,
                wins,
                losses,
                win_rate,
                avg_attempts_to_win,
                min_attempts_to_win: won.iter().map(|g| g.attempts_count).min(),
                max_attempts_to_win: won.iter().map(|g| g.attempts_count).max(),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.total_games.cmp(&a.total_games))
            .then(a.player_name.cmp(&b.player_name))
    });

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: i64, player: &str, result: GameResult, attempts: u32) -> GameRecord {
        GameRecord {
            id,
            player_name: player.to_string(),
            max_number: 100,
            secret_number: 42,
            max_attempts: 10,
            attempts_count: attempts,
            result,
            started_at: Utc::now(),
            completed_at: result.is_completed().then(Utc::now),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_skips_in_progress() {
        let records = vec![
            record(1, "Ann", GameResult::Won, 4),
            record(2, "Ann", GameResult::InProgress, 2),
        ];

        let stats = aggregate(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_games, 1);
        assert_eq!(stats[0].wins, 1);
    }

    #[test]
    fn test_aggregate_zero_wins_has_no_attempt_aggregates() {
        let records = vec![
            record(1, "Bob", GameResult::Lost, 10),
            record(2, "Bob", GameResult::Lost, 10),
        ];

        let stats = aggregate(&records);
        assert_eq!(stats[0].wins, 0);
        assert_eq!(stats[0].losses, 2);
        assert_eq!(stats[0].win_rate, 0.0);
        assert_eq!(stats[0].avg_attempts_to_win, None);
        assert_eq!(stats[0].min_attempts_to_win, None);
        assert_eq!(stats[0].max_attempts_to_win, None);
    }

    #[test]
    fn test_aggregate_rounding() {
        let records = vec![
            record(1, "Ann", GameResult::Won, 3),
            record(2, "Ann", GameResult::Won, 4),
            record(3, "Ann", GameResult::Lost, 10),
        ];

        let stats = aggregate(&records);
        assert_eq!(stats[0].total_games, 3);
        // 2/3 -> 66.666... -> 66.7
        assert_eq!(stats[0].win_rate, 66.7);
        // (3 + 4) / 2 = 3.5
        assert_eq!(stats[0].avg_attempts_to_win, Some(3.5));
        assert_eq!(stats[0].min_attempts_to_win, Some(3));
        assert_eq!(stats[0].max_attempts_to_win, Some(4));
    }

    #[test]
    fn test_aggregate_sort_order() {
        let records = vec![
            record(1, "Ann", GameResult::Won, 3),
            record(2, "Bob", GameResult::Won, 3),
            record(3, "Bob", GameResult::Won, 5),
            record(4, "Cid", GameResult::Lost, 10),
        ];

        let stats = aggregate(&records);
        let names: Vec<&str> = stats.iter().map(|s| s.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann", "Cid"]);
    }
}
