use crate::models::Track;
use std::collections::HashSet;

/// Ordered, id-unique tracks; order is playback order
#[derive(Debug, Clone, Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
    seen_ids: HashSet<String>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the track unless its id is already present; returns whether it was added
    pub fn insert(&mut self, track: Track) -> bool {
        if !self.seen_ids.insert(track.id.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Track> {
        self.tracks
    }
}

impl FromIterator<Track> for TrackSet {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut set = TrackSet::new();
        for track in iter {
            set.insert(track);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TrackSet {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
