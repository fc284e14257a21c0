use serde::{Deserialize, Serialize};

/// Placeholder used whenever an artist cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// A song/artist pair proposed by the extraction model, not yet scored.
/// The artist may be blank when the comments only named the song; duplicate
/// song names across candidates are meaningful frequency signal and are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub artist: String,
}

/// A candidate with its computed likelihood, in [0, 100] rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub song: String,
    pub artist: String,
    pub likelihood: f64,
}

impl ScoredCandidate {
    /// Zero-score sentinel returned when no candidate survived the pipeline.
    pub fn unknown() -> Self {
        Self {
            song: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            likelihood: 0.0,
        }
    }
}

/// Final pipeline output: every scored candidate in descending likelihood
/// order, plus the top pick (or the sentinel when the list is empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub all_songs: Vec<ScoredCandidate>,
    pub most_likely: ScoredCandidate,
}
