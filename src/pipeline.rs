use async_trait::async_trait;

use crate::models::{Candidate, RankedResult, ScoredCandidate, UNKNOWN};
use crate::ranking::rank;

/// External capability that turns a comment batch into song/artist candidates.
/// Implementations absorb their own failures and degrade to an empty list;
/// nothing here may abort the pipeline.
#[async_trait]
pub trait SongExtractor: Send + Sync {
    async fn extract_candidates(&self, comments: &[String]) -> Vec<Candidate>;
}

/// External capability that resolves an artist name for a song title.
/// `None` means the lookup failed or found nothing usable.
#[async_trait]
pub trait ArtistLookup: Send + Sync {
    async fn lookup_artist(&self, song: &str) -> Option<String>;
}

/// Sequences extraction, per-candidate artist enrichment, and ranking.
/// Intentionally thin: all scoring and parsing lives in the collaborators.
pub struct Pipeline<E, L> {
    extractor: E,
    lookup: L,
}

impl<E, L> Pipeline<E, L>
where
    E: SongExtractor,
    L: ArtistLookup,
{
    pub fn new(extractor: E, lookup: L) -> Self {
        Self { extractor, lookup }
    }

    pub async fn run(&self, comments: &[String]) -> RankedResult {
        let candidates = self.extractor.extract_candidates(comments).await;
        tracing::info!("extracted {} candidate songs", candidates.len());

        let mut completed = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            completed.push(self.enrich(candidate).await);
        }

        let all_songs = rank(completed, comments);
        let most_likely = all_songs
            .first()
            .cloned()
            .unwrap_or_else(ScoredCandidate::unknown);

        RankedResult {
            all_songs,
            most_likely,
        }
    }

    /// Fills in a missing artist via one lookup call; a still-unresolved
    /// artist becomes the `"Unknown"` sentinel.
    async fn enrich(&self, mut candidate: Candidate) -> Candidate {
        if let Some(rest) = candidate.artist.strip_prefix('@') {
            candidate.artist = rest.to_string();
        }

        if !candidate.song.is_empty() && candidate.artist.is_empty() {
            if let Some(artist) = self.lookup.lookup_artist(&candidate.song).await {
                candidate.artist = artist;
            }
        }

        if candidate.artist.is_empty() {
            candidate.artist = UNKNOWN.to_string();
        }

        candidate
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct FixedExtractor(Vec<Candidate>);

    #[async_trait]
    impl SongExtractor for FixedExtractor {
        async fn extract_candidates(&self, _comments: &[String]) -> Vec<Candidate> {
            self.0.clone()
        }
    }

    /// Records every queried song so tests can assert which candidates
    /// actually triggered a lookup.
    struct RecordingLookup {
        answer: Option<String>,
        queries: Mutex<Vec<String>>,
    }

    impl RecordingLookup {
        fn new(answer: Option<&str>) -> Self {
            Self {
                answer: answer.map(str::to_string),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ArtistLookup for RecordingLookup {
        async fn lookup_artist(&self, song: &str) -> Option<String> {
            self.queries.lock().unwrap().push(song.to_string());
            self.answer.clone()
        }
    }

    fn candidate(song: &str, artist: &str) -> Candidate {
        Candidate {
            song: song.to_string(),
            artist: artist.to_string(),
        }
    }

    #[tokio::test]
    async fn frequency_dominates_end_to_end() {
        let comments = vec![
            "i think its blinding lights by the weeknd".to_string(),
            "weeknd weeknd!!".to_string(),
            "no its levitating".to_string(),
        ];
        let extractor = FixedExtractor(vec![
            candidate("blinding lights", "the weeknd"),
            candidate("blinding lights", ""),
            candidate("levitating", "dua lipa"),
        ]);
        let lookup = RecordingLookup::new(None);

        let pipeline = Pipeline::new(extractor, lookup);
        let result = pipeline.run(&comments).await;

        // Only the artist-less duplicate needed a lookup.
        assert_eq!(
            *pipeline.lookup.queries.lock().unwrap(),
            vec!["blinding lights".to_string()]
        );

        assert_eq!(result.most_likely.song, "blinding lights");
        assert_eq!(result.all_songs.len(), 3);
        assert_eq!(result.all_songs[2].song, "levitating");
    }

    #[tokio::test]
    async fn failed_extraction_yields_sentinel() {
        let pipeline = Pipeline::new(FixedExtractor(Vec::new()), RecordingLookup::new(None));
        let result = pipeline.run(&["some comment".to_string()]).await;

        assert!(result.all_songs.is_empty());
        assert_eq!(result.most_likely, ScoredCandidate::unknown());
    }

    #[tokio::test]
    async fn lookup_fills_missing_artist() {
        let extractor = FixedExtractor(vec![candidate("levitating", "")]);
        let lookup = RecordingLookup::new(Some("Dua Lipa"));

        let pipeline = Pipeline::new(extractor, lookup);
        let result = pipeline.run(&[]).await;

        assert_eq!(result.most_likely.artist, "Dua Lipa");
    }

    #[tokio::test]
    async fn unresolved_artist_defaults_to_unknown() {
        let extractor = FixedExtractor(vec![candidate("levitating", "")]);
        let lookup = RecordingLookup::new(None);

        let pipeline = Pipeline::new(extractor, lookup);
        let result = pipeline.run(&[]).await;

        assert_eq!(result.most_likely.artist, UNKNOWN);
    }

    #[tokio::test]
    async fn handle_prefix_is_stripped_before_lookup() {
        let extractor = FixedExtractor(vec![candidate("basket case", "@greenday")]);
        let lookup = RecordingLookup::new(Some("should not be used"));

        let pipeline = Pipeline::new(extractor, lookup);
        let result = pipeline.run(&[]).await;

        // A handle-style artist counts as present once the '@' is gone.
        assert!(pipeline.lookup.queries.lock().unwrap().is_empty());
        assert_eq!(result.most_likely.artist, "greenday");
    }

    #[tokio::test]
    async fn empty_song_names_are_never_looked_up() {
        let extractor = FixedExtractor(vec![candidate("", "")]);
        let lookup = RecordingLookup::new(Some("nobody"));

        let pipeline = Pipeline::new(extractor, lookup);
        let result = pipeline.run(&[]).await;

        assert!(pipeline.lookup.queries.lock().unwrap().is_empty());
        assert_eq!(result.most_likely.artist, UNKNOWN);
    }
}
