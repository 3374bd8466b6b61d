use crate::teams::Team;

/// Phase of a scheduled game, mapped from the schedule source's
/// abstract game state ("Preview" / "Live" / "Final").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Live,
    Final,
}

impl GamePhase {
    pub fn from_abstract_state(raw: &str) -> GamePhase {
        match raw {
            "Live" => GamePhase::Live,
            "Final" => GamePhase::Final,
            _ => GamePhase::NotStarted,
        }
    }
}

/// Probable starter with season pitching numbers, when the schedule
/// hydration provides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitcherLine {
    pub name: String,
    pub era: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

impl PitcherLine {
    pub fn summary(&self) -> String {
        let era = self.era.as_deref().unwrap_or("—");
        let wins = self
            .wins
            .map(|w| w.to_string())
            .unwrap_or_else(|| "—".to_string());
        let losses = self
            .losses
            .map(|l| l.to_string())
            .unwrap_or_else(|| "—".to_string());
        format!("{} — ERA {era} ({wins}-{losses})", self.name)
    }
}

/// One contest on the slate. Rebuilt every refresh cycle from the
/// schedule plus the per-game live feed; team ids stay unset when the
/// schedule name does not resolve to a known franchise.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub game_pk: u64,
    pub home_name: String,
    pub away_name: String,
    pub home: Option<Team>,
    pub away: Option<Team>,
    pub phase: GamePhase,
    pub detailed_state: String,
    pub actual_runs: u32,
    pub inning: Option<u8>,
    pub is_top: Option<bool>,
    pub home_pitcher: Option<PitcherLine>,
    pub away_pitcher: Option<PitcherLine>,
}

impl GameRecord {
    /// Short in-game descriptor: "Final", "Top 5" / "Bot 5", or the
    /// detailed status when no inning information is available.
    pub fn phase_label(&self) -> String {
        if self.phase == GamePhase::Final {
            return "Final".to_string();
        }
        match (self.inning, self.is_top) {
            (Some(inning), Some(true)) => format!("Top {inning}"),
            (Some(inning), Some(false)) => format!("Bot {inning}"),
            _ => self.detailed_state.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlateCounts {
    pub final_games: usize,
    pub live: usize,
    pub not_started: usize,
}

/// One game's share of the slate projection, with the note string that
/// explains exactly the number folded into the sum.
#[derive(Debug, Clone, PartialEq)]
pub struct GameProjection {
    pub game_pk: u64,
    pub contribution: f64,
    pub note: String,
}

/// Derived per cycle, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SlateProjection {
    pub runs_scored: u32,
    pub projected_total: f64,
    pub counts: SlateCounts,
    pub games: Vec<GameProjection>,
}
