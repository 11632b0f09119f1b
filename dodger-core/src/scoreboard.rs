use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::TOP_SCORES_LIMIT;
use crate::error::ScoreBoardError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub high_score: i64,
}

/// Persistence collaborator: records finished sessions and serves the
/// leaderboard.
pub trait ScoreBoard {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError>;
    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError>;
}

impl<T: ScoreBoard + ?Sized> ScoreBoard for &mut T {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        (**self).top_scores()
    }

    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError> {
        (**self).submit_score(player, score)
    }
}

/// Best score on the board, or 0 when the board is empty or unreachable.
pub fn resolve_high_score(board: &mut impl ScoreBoard) -> i64 {
    match board.top_scores() {
        Ok(entries) => entries
            .iter()
            .map(|entry| entry.high_score)
            .max()
            .unwrap_or(0)
            .max(0),
        Err(err) => {
            tracing::warn!("could not fetch global high score: {err}");
            0
        }
    }
}

/// Board that never persists anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineScoreBoard;

impl ScoreBoard for OfflineScoreBoard {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        Ok(Vec::new())
    }

    fn submit_score(&mut self, _player: &str, _score: i64) -> Result<(), ScoreBoardError> {
        Ok(())
    }
}

/// Process-local board keyed by case-folded player name.
#[derive(Clone, Debug, Default)]
pub struct InMemoryScoreBoard {
    // folded name -> (display name, every submitted score)
    players: HashMap<String, (String, Vec<i64>)>,
}

impl InMemoryScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores_for(&self, player: &str) -> &[i64] {
        self.players
            .get(&player_key(player))
            .map(|(_, scores)| scores.as_slice())
            .unwrap_or(&[])
    }
}

impl ScoreBoard for InMemoryScoreBoard {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        let mut entries: Vec<ScoreEntry> = self
            .players
            .values()
            .map(|(name, scores)| ScoreEntry {
                name: name.clone(),
                high_score: scores.iter().copied().max().unwrap_or(0),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.high_score
                .cmp(&a.high_score)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries.truncate(TOP_SCORES_LIMIT);
        Ok(entries)
    }

    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError> {
        let name = player.trim();
        if name.is_empty() {
            return Err(ScoreBoardError::Rejected(
                "player name is required".to_string(),
            ));
        }
        if score < 0 {
            return Err(ScoreBoardError::Rejected(format!(
                "score must not be negative, got {score}"
            )));
        }
        self.players
            .entry(player_key(name))
            .or_insert_with(|| (name.to_string(), Vec::new()))
            .1
            .push(score);
        Ok(())
    }
}

/// Key under which player names are compared: trimmed, Unicode lowercase.
#[inline]
pub fn player_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl ScoreBoard for Unreachable {
        fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
            Err(ScoreBoardError::Unavailable("connection refused".to_string()))
        }

        fn submit_score(&mut self, _player: &str, _score: i64) -> Result<(), ScoreBoardError> {
            Err(ScoreBoardError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn unreachable_board_falls_back_to_zero() {
        assert_eq!(resolve_high_score(&mut Unreachable), 0);
        assert_eq!(resolve_high_score(&mut OfflineScoreBoard), 0);
    }

    #[test]
    fn names_fold_case_and_whitespace() {
        let mut board = InMemoryScoreBoard::new();
        board.submit_score("Ada", 12).unwrap();
        board.submit_score("  ada ", 30).unwrap();
        board.submit_score("Grace", 7).unwrap();

        assert_eq!(board.scores_for("ADA"), &[12, 30]);
        let top = board.top_scores().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Ada");
        assert_eq!(top[0].high_score, 30);
        assert_eq!(resolve_high_score(&mut board), 30);
    }

    #[test]
    fn player_keys_fold_beyond_ascii() {
        assert_eq!(player_key(" Émile "), player_key("émile"));
        assert_eq!(player_key("ÅSA"), "åsa");

        let mut board = InMemoryScoreBoard::new();
        board.submit_score("Émile", 1).unwrap();
        board.submit_score("émile", 2).unwrap();
        assert_eq!(board.scores_for("ÉMILE"), &[1, 2]);
    }

    #[test]
    fn top_scores_are_capped_and_ordered() {
        let mut board = InMemoryScoreBoard::new();
        for (index, name) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            board.submit_score(name, index as i64).unwrap();
        }
        let top = board.top_scores().unwrap();
        assert_eq!(top.len(), TOP_SCORES_LIMIT);
        assert_eq!(top[0].name, "g");
        assert!(top.windows(2).all(|w| w[0].high_score >= w[1].high_score));
    }

    #[test]
    fn rejects_blank_names_and_negative_scores() {
        let mut board = InMemoryScoreBoard::new();
        assert!(matches!(
            board.submit_score("   ", 1),
            Err(ScoreBoardError::Rejected(_))
        ));
        assert!(matches!(
            board.submit_score("ada", -1),
            Err(ScoreBoardError::Rejected(_))
        ));
    }
}
