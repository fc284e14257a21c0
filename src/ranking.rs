use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Candidate, ScoredCandidate, UNKNOWN};

/// Scores every candidate against the full candidate and comment sets and
/// returns them sorted by descending likelihood. The sort is stable, so
/// equal-score candidates keep their extraction order.
///
/// The 50/30/20 weighting is an inherited heuristic; the arithmetic is kept
/// exactly as-is for compatibility with prior runs.
pub fn rank(candidates: Vec<Candidate>, comments: &[String]) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let total = candidates.len() as f64;
    let mut song_counts: HashMap<String, usize> = HashMap::new();
    for candidate in &candidates {
        *song_counts.entry(candidate.song.to_lowercase()).or_insert(0) += 1;
    }

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let song_name = candidate.song.to_lowercase();

            // Frequency (50% weight): share of candidates naming this song.
            let frequency_score =
                song_counts.get(&song_name).copied().unwrap_or(0) as f64 / total * 50.0;

            // Clarity (30% weight): a resolved artist is a stronger signal.
            let clarity_score = if !candidate.artist.is_empty() && candidate.artist != UNKNOWN {
                30.0
            } else {
                15.0
            };

            // Context (20% weight): the song named verbatim in a comment.
            let context_score = if comments
                .iter()
                .any(|comment| comment.to_lowercase().contains(&song_name))
            {
                20.0
            } else {
                10.0
            };

            ScoredCandidate {
                song: candidate.song,
                artist: candidate.artist,
                likelihood: round2(frequency_score + clarity_score + context_score),
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.likelihood
            .partial_cmp(&a.likelihood)
            .unwrap_or(Ordering::Equal)
    });
    scored
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
