use super::picker::{Picker, choose};
use crate::models::Track;
use std::cmp::Ordering;

/// How many of the newest low-popularity tracks the emerging pick samples from
pub const EMERGING_SAMPLE_SIZE: usize = 10;

/// Popularity-based track filtering using static helper functions
pub struct TrackFilters;

impl TrackFilters {
    /// Check if a track is below the popularity threshold (strictly)
    pub fn is_below_popularity(track: &Track, threshold: u32) -> bool {
        track.popularity < threshold
    }

    /// Keep only tracks strictly below the threshold, preserving order
    pub fn below_popularity(candidates: Vec<Track>, threshold: u32) -> Vec<Track> {
        candidates
            .into_iter()
            .filter(|track| Self::is_below_popularity(track, threshold))
            .collect()
    }

    /// Uniform random pick among tracks under the threshold
    pub fn pick_indie(
        candidates: Vec<Track>,
        threshold: u32,
        picker: &mut dyn Picker,
    ) -> Option<Track> {
        let eligible = Self::below_popularity(candidates, threshold);
        choose(&eligible, picker).cloned()
    }

    /// Deterministic pick of the least popular track under the threshold
    /// Ties keep the earlier search result
    pub fn pick_least_popular(candidates: Vec<Track>, threshold: u32) -> Option<Track> {
        Self::below_popularity(candidates, threshold)
            .into_iter()
            .min_by_key(|track| track.popularity)
    }

    /// Sort newest first, then least popular, and sample from the head
    pub fn pick_emerging(
        candidates: Vec<Track>,
        threshold: u32,
        picker: &mut dyn Picker,
    ) -> Option<Track> {
        let mut eligible = Self::below_popularity(candidates, threshold);
        eligible.sort_by(Self::newest_then_least_popular);
        eligible.truncate(EMERGING_SAMPLE_SIZE);
        choose(&eligible, picker).cloned()
    }

    /// Ordering used by the emerging-artist pick; undated tracks go last
    fn newest_then_least_popular(a: &Track, b: &Track) -> Ordering {
        let by_date = match (a.release_date(), b.release_date()) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| a.popularity.cmp(&b.popularity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Album;
    use crate::radio::picker::FixedPicker;

    fn track(id: &str, popularity: u32, release_date: Option<&str>) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Song {id}"),
            popularity,
            album: Album {
                release_date: release_date.map(str::to_string),
                ..Album::default()
            },
            ..Track::default()
        }
    }

    #[test]
    fn test_indie_threshold_is_strict() {
        let candidates = vec![
            track("a", 10, None),
            track("b", 45, None),
            track("c", 28, None),
            track("d", 60, None),
            track("e", 30, None),
        ];
        let eligible = TrackFilters::below_popularity(candidates, 30);
        let ids: Vec<&str> = eligible.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_indie_pick_comes_from_eligible_subset() {
        let candidates = || {
            vec![
                track("a", 10, None),
                track("b", 45, None),
                track("c", 28, None),
                track("d", 60, None),
            ]
        };

        for index in 0..4 {
            let picked =
                TrackFilters::pick_indie(candidates(), 30, &mut FixedPicker(index)).unwrap();
            assert!(picked.popularity < 30);
            assert!(picked.id == "a" || picked.id == "c");
        }
    }

    #[test]
    fn test_no_fallback_to_popular_tracks() {
        let candidates = vec![track("a", 80, None), track("b", 31, None)];
        assert!(TrackFilters::pick_indie(candidates.clone(), 30, &mut FixedPicker(0)).is_none());
        assert!(TrackFilters::pick_least_popular(candidates.clone(), 30).is_none());
        assert!(TrackFilters::pick_emerging(candidates, 30, &mut FixedPicker(0)).is_none());
    }

    #[test]
    fn test_least_popular_is_deterministic() {
        let candidates = vec![
            track("a", 22, None),
            track("b", 5, None),
            track("c", 5, None),
            track("d", 40, None),
        ];
        let picked = TrackFilters::pick_least_popular(candidates, 30).unwrap();
        assert_eq!(picked.id, "b");
    }

    #[test]
    fn test_emerging_prefers_newest_then_least_popular() {
        let candidates = vec![
            track("old", 1, Some("2015-03-01")),
            track("new-popular", 20, Some("2024-05-01")),
            track("new-quiet", 3, Some("2024-05-01")),
            track("undated", 0, None),
            track("too-big", 24, Some("2025")),
            track("mainstream", 70, Some("2025-01-01")),
        ];

        let first =
            TrackFilters::pick_emerging(candidates.clone(), 25, &mut FixedPicker(0)).unwrap();
        assert_eq!(first.id, "too-big");

        let second =
            TrackFilters::pick_emerging(candidates.clone(), 25, &mut FixedPicker(1)).unwrap();
        assert_eq!(second.id, "new-quiet");

        let last = TrackFilters::pick_emerging(candidates, 25, &mut FixedPicker(99)).unwrap();
        assert_eq!(last.id, "undated");
    }

    #[test]
    fn test_emerging_samples_only_top_ten() {
        let candidates: Vec<Track> = (0..15)
            .map(|i| track(&format!("t{i}"), 1, Some(format!("{}-01-01", 2010 + i).as_str())))
            .collect();

        let picked = TrackFilters::pick_emerging(candidates, 25, &mut FixedPicker(99)).unwrap();
        // Tenth newest of 2010..=2024 is 2015
        assert_eq!(picked.id, "t5");
    }
}
