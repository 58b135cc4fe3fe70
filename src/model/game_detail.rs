use serde::Serialize;

/// Verdict for one suggested-player-count group, derived from the community
/// vote tallies. Output records never carry `NotRecommended`; those groups
/// are filtered during derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Best,
    Recommended,
    NotRecommended,
}

/// A surviving player-count group and its verdict, in document order.
/// `players` is kept as the raw attribute text ("2", "4+", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerCountVerdict {
    pub players: String,
    pub verdict: Verdict,
}

/// An expansion relationship. `inbound` is true when the link points from an
/// expansion back to its base game; the attribute is absent on most links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionLink {
    pub id: u32,
    pub inbound: bool,
}

/// One game from a `/thing?stats=1` response.
///
/// Numeric-looking fields (`weight`, `rank`, `rating`, `playing_time`) are
/// kept as the raw attribute text; BGG reports "Not Ranked" and similar
/// non-numbers, and the downstream pipeline does its own coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    pub id: u32,
    #[serde(rename = "type")]
    pub game_type: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub expansions: Vec<ExpansionLink>,
    pub suggested_numplayers: Vec<PlayerCountVerdict>,
    pub weight: String,
    pub rank: String,
    pub rating: String,
    pub playing_time: String,
}
