//! Canonical MLB team identities and the alias table used to reconcile
//! bookmaker team labels against schedule names.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Diamondbacks,
    Braves,
    Orioles,
    RedSox,
    Cubs,
    WhiteSox,
    Reds,
    Guardians,
    Rockies,
    Tigers,
    Astros,
    Royals,
    Angels,
    Dodgers,
    Marlins,
    Brewers,
    Twins,
    Mets,
    Yankees,
    Athletics,
    Phillies,
    Pirates,
    Padres,
    Giants,
    Mariners,
    Cardinals,
    Rays,
    Rangers,
    BlueJays,
    Nationals,
}

// Each entry leads with the full franchise name, followed by the
// abbreviations and alternate spellings books are known to use.
const TEAM_ALIASES: [(Team, &[&str]); 30] = [
    (
        Team::Diamondbacks,
        &[
            "Arizona Diamondbacks",
            "ARI",
            "Arizona D-Backs",
            "Arizona Dbacks",
        ],
    ),
    (Team::Braves, &["Atlanta Braves", "ATL"]),
    (Team::Orioles, &["Baltimore Orioles", "BAL"]),
    (Team::RedSox, &["Boston Red Sox", "BOS"]),
    (Team::Cubs, &["Chicago Cubs", "CHC"]),
    (Team::WhiteSox, &["Chicago White Sox", "CWS", "Chi White Sox"]),
    (Team::Reds, &["Cincinnati Reds", "CIN"]),
    (Team::Guardians, &["Cleveland Guardians", "CLE"]),
    (Team::Rockies, &["Colorado Rockies", "COL"]),
    (Team::Tigers, &["Detroit Tigers", "DET"]),
    (Team::Astros, &["Houston Astros", "HOU"]),
    (Team::Royals, &["Kansas City Royals", "KC", "KCR"]),
    (Team::Angels, &["Los Angeles Angels", "LAA", "LA Angels"]),
    (Team::Dodgers, &["Los Angeles Dodgers", "LAD", "LA Dodgers"]),
    (Team::Marlins, &["Miami Marlins", "MIA"]),
    (Team::Brewers, &["Milwaukee Brewers", "MIL"]),
    (Team::Twins, &["Minnesota Twins", "MIN"]),
    (Team::Mets, &["New York Mets", "NYM", "NY Mets"]),
    (Team::Yankees, &["New York Yankees", "NYY", "NY Yankees"]),
    (
        Team::Athletics,
        &["Oakland Athletics", "OAK", "Oakland A's", "Athletics"],
    ),
    (Team::Phillies, &["Philadelphia Phillies", "PHI"]),
    (Team::Pirates, &["Pittsburgh Pirates", "PIT"]),
    (Team::Padres, &["San Diego Padres", "SD", "SDP"]),
    (Team::Giants, &["San Francisco Giants", "SF", "SFG"]),
    (Team::Mariners, &["Seattle Mariners", "SEA"]),
    (Team::Cardinals, &["St. Louis Cardinals", "STL"]),
    (Team::Rays, &["Tampa Bay Rays", "TB", "TBR"]),
    (Team::Rangers, &["Texas Rangers", "TEX"]),
    (Team::BlueJays, &["Toronto Blue Jays", "TOR"]),
    (Team::Nationals, &["Washington Nationals", "WSH", "WAS"]),
];

/// Lowercase a label and strip everything that is not a letter, so
/// "LA Dodgers", "L.A. Dodgers" and "la dodgers" all compare equal.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter_map(|ch| {
            let lower = ch.to_ascii_lowercase();
            lower.is_ascii_lowercase().then_some(lower)
        })
        .collect()
}

/// Immutable alias lookup shared by the consensus aggregator and the
/// schedule loader. Constructed once at startup and passed by reference.
#[derive(Debug, Clone, Copy)]
pub struct TeamDirectory {
    entries: &'static [(Team, &'static [&'static str])],
}

impl TeamDirectory {
    pub fn standard() -> Self {
        Self {
            entries: &TEAM_ALIASES,
        }
    }

    pub fn full_name(&self, team: Team) -> &'static str {
        self.aliases(team)[0]
    }

    fn aliases(&self, team: Team) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == team)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// Does a free-text market label denote this team?
    pub fn matches(&self, team: Team, label: &str) -> bool {
        let normalized = normalize(label);
        self.aliases(team)
            .iter()
            .any(|alias| normalize(alias) == normalized)
    }

    /// Resolve a schedule-provided name to a canonical team, using the
    /// same normalized-alias comparison as `matches`.
    pub fn resolve(&self, label: &str) -> Option<Team> {
        let normalized = normalize(label);
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| normalize(alias) == normalized))
            .map(|(team, _)| *team)
    }
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::standard()
    }
}
