use super::aggregator::MultiTrackAggregator;
use super::config::RadioConfig;
use super::cover;
use super::mood::{MoodProfile, classify};
use super::picker::Picker;
use super::resolver::FallbackResolver;
use super::script::{self, DjScript};
use super::track_set::TrackSet;
use crate::client::{CatalogService, PlaylistService};
use crate::enrichment::ArtistEnricher;
use crate::generation::GenerationService;
use crate::models::Track;
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use log::{info, warn};
use thiserror::Error;

/// Spotify rejects playlist descriptions longer than this
const MAX_DESCRIPTION_CHARS: usize = 300;

/// Terminal conditions of a show; reported once and not retried
#[derive(Debug, Error, PartialEq)]
pub enum ShowError {
    #[error("Could not find a suitable track for '{0}'. Please try again.")]
    NoTrackFound(String),

    #[error("Could not find any tracks for '{0}'. Please try again.")]
    NoTracksFound(String),
}

/// Everything the presentation layer keeps between user actions
///
/// Operations never mutate a state in place; they return the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowState {
    pub tracks: Vec<Track>,
    pub current_index: usize,
    pub mood: Option<String>,
    pub playlist_id: Option<String>,
    pub radio_active: bool,
}

impl ShowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// A fresh single-track show
    pub fn with_track(&self, mood: &str, track: Track) -> ShowState {
        ShowState {
            tracks: vec![track],
            current_index: 0,
            mood: Some(mood.to_string()),
            playlist_id: None,
            radio_active: false,
        }
    }

    /// A fresh continuous-play session positioned at the first track
    pub fn with_radio(&self, mood: &str, tracks: TrackSet) -> ShowState {
        ShowState {
            tracks: tracks.into_vec(),
            current_index: 0,
            mood: Some(mood.to_string()),
            playlist_id: None,
            radio_active: true,
        }
    }

    /// The next track in continuous play, or `None` at the end or when radio is off
    pub fn advanced(&self) -> Option<ShowState> {
        if !self.radio_active || self.current_index + 1 >= self.tracks.len() {
            return None;
        }
        Some(ShowState {
            current_index: self.current_index + 1,
            ..self.clone()
        })
    }

    pub fn with_playlist(&self, playlist_id: &str) -> ShowState {
        ShowState {
            playlist_id: Some(playlist_id.to_string()),
            ..self.clone()
        }
    }

    pub fn stopped(&self) -> ShowState {
        ShowState {
            radio_active: false,
            ..self.clone()
        }
    }

    pub fn remaining(&self) -> usize {
        self.tracks.len().saturating_sub(self.current_index + 1)
    }
}

/// One spoken-and-played block of the show
#[derive(Debug, Clone)]
pub struct ShowSegment {
    pub track: Track,
    pub narration: String,
    pub artist_note: String,
    pub voice: Option<Vec<u8>>,
    pub album_art: Option<Vec<u8>>,
}

/// The opening of a show: the DJ's script, its mood, and the first segment
#[derive(Debug, Clone)]
pub struct ShowOpening {
    pub script: DjScript,
    pub mood: MoodProfile,
    pub segment: ShowSegment,
}

/// Runs the script → mood → track → voice/art chain for one user action
pub struct ShowProducer<'a> {
    catalog: &'a dyn CatalogService,
    generator: &'a dyn GenerationService,
    enricher: &'a ArtistEnricher,
    config: &'a RadioConfig,
}

impl<'a> ShowProducer<'a> {
    pub fn new(
        catalog: &'a dyn CatalogService,
        generator: &'a dyn GenerationService,
        enricher: &'a ArtistEnricher,
        config: &'a RadioConfig,
    ) -> Self {
        Self {
            catalog,
            generator,
            enricher,
            config,
        }
    }

    /// Ask the generator for a DJ script, falling back to the canned one
    pub fn write_script(&self) -> DjScript {
        match self.generator.chat(script::DJ_SCRIPT_PROMPT) {
            Ok(text) => DjScript::parse(&text),
            Err(e) => {
                warn!("DJ script generation failed, using fallback script: {e}");
                DjScript::fallback()
            }
        }
    }

    /// Single-track show: one script, one resolved track
    pub fn start_show(
        &self,
        state: &ShowState,
        picker: &mut dyn Picker,
    ) -> Result<(ShowState, ShowOpening), ShowError> {
        let script = self.write_script();
        let mood = classify(&script.mood);
        info!("DJ mood '{}' classified as {}", script.mood, mood.category);

        let track = FallbackResolver::new(self.catalog, self.config)
            .resolve_track(&mood, &self.config.market, picker)
            .ok_or_else(|| ShowError::NoTrackFound(script.mood.clone()))?;

        let narration = script.narration(&track);
        let note = self.enricher.describe(track.primary_artist());
        let next_state = state.with_track(&script.mood, track.clone());
        let segment = self.dress(&script.mood, track, note, narration);

        Ok((next_state, ShowOpening { script, mood, segment }))
    }

    /// Continuous play: a mood-driven list of up to `count` tracks
    pub fn start_radio(
        &self,
        state: &ShowState,
        count: usize,
        picker: &mut dyn Picker,
    ) -> Result<(ShowState, ShowOpening), ShowError> {
        let script = self.write_script();
        let mood = classify(&script.mood);
        info!("DJ mood '{}' classified as {}", script.mood, mood.category);

        let tracks = MultiTrackAggregator::new(self.catalog, self.config).build_playlist(
            mood.category,
            count,
            picker,
        );
        if tracks.is_empty() {
            return Err(ShowError::NoTracksFound(script.mood.clone()));
        }

        let next_state = state.with_radio(&script.mood, tracks);
        let track = next_state
            .current_track()
            .cloned()
            .ok_or_else(|| ShowError::NoTracksFound(script.mood.clone()))?;
        let narration = script.narration(&track);
        let note = self.enricher.describe(track.primary_artist());
        let segment = self.dress(&script.mood, track, note, narration);

        Ok((next_state, ShowOpening { script, mood, segment }))
    }

    /// Advance continuous play by one track with a short spoken link
    pub fn next_segment(&self, state: &ShowState) -> Option<(ShowState, ShowSegment)> {
        let next_state = state.advanced()?;
        let track = next_state.current_track()?.clone();
        let mood = next_state.mood.clone().unwrap_or_else(|| script::DEFAULT_MOOD.to_string());

        let note = self.enricher.describe(track.primary_artist());
        let narration = script::transition_line(&track, &note);
        let segment = self.dress(&mood, track, note, narration);
        Some((next_state, segment))
    }

    /// Save the show's tracks as a private playlist with a generated cover
    /// A failed cover upload is logged; the playlist is still returned
    pub fn publish_playlist(
        &self,
        playlists: &dyn PlaylistService,
        state: &ShowState,
    ) -> Result<ShowState> {
        if state.tracks.is_empty() {
            return Err(anyhow!("No tracks to save"));
        }
        let mood = state.mood.as_deref().unwrap_or(script::DEFAULT_MOOD);

        let owner = playlists
            .current_user_id()
            .context("Failed to look up the current user")?;
        let name = playlist_name(mood);
        let description = self.playlist_description(mood, &state.tracks);
        let playlist_id = playlists
            .create_playlist(&owner, &name, &description)
            .context("Failed to create playlist")?;

        let uris: Vec<String> = state.tracks.iter().map(Track::spotify_uri).collect();
        playlists
            .add_items(&playlist_id, &uris)
            .context("Failed to add tracks to playlist")?;
        info!("Saved {} tracks to playlist {playlist_id}", uris.len());

        self.upload_cover(playlists, &playlist_id, mood);
        Ok(state.with_playlist(&playlist_id))
    }

    /// Add the track on air to the listener's saved library
    pub fn save_current_track(
        &self,
        library: &dyn PlaylistService,
        state: &ShowState,
    ) -> Result<Track> {
        let track = state
            .current_track()
            .ok_or_else(|| anyhow!("No track on air to save"))?;
        if track.id.is_empty() {
            return Err(anyhow!("'{}' has no catalog id", track.name));
        }

        library
            .save_tracks(std::slice::from_ref(&track.id))
            .with_context(|| format!("Failed to save '{}'", track.name))?;
        info!("Saved '{}' to the library", track.name);
        Ok(track.clone())
    }

    fn upload_cover(&self, playlists: &dyn PlaylistService, playlist_id: &str, mood: &str) {
        let generated = match self.generator.image(&script::playlist_cover_prompt(mood)) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Playlist cover generation failed: {e}");
                return;
            }
        };
        let jpeg = match cover::to_cover_jpeg(&generated) {
            Ok(jpeg) => jpeg,
            Err(e) => {
                warn!("Keeping the default playlist cover: {e:#}");
                return;
            }
        };
        if let Err(e) = playlists.upload_cover_image(playlist_id, &jpeg) {
            warn!("Playlist cover upload failed: {e}");
        }
    }

    fn playlist_description(&self, mood: &str, tracks: &[Track]) -> String {
        let mut artists: Vec<&str> = Vec::new();
        for track in tracks {
            let artist = track.primary_artist();
            if !artists.contains(&artist) {
                artists.push(artist);
            }
        }
        let featuring = artists.iter().take(3).copied().collect::<Vec<_>>().join(", ");
        let lead_note = artists
            .first()
            .map(|artist| self.enricher.describe(artist))
            .unwrap_or_default();

        let description =
            format!("AI DJ OPM radio para sa {mood} mood, kasama sina {featuring}. {lead_note}");
        truncate_chars(description.replace('\n', " ").trim(), MAX_DESCRIPTION_CHARS)
    }

    fn dress(
        &self,
        mood: &str,
        track: Track,
        artist_note: String,
        narration: String,
    ) -> ShowSegment {
        let voice = self
            .generator
            .speech(&narration)
            .map_err(|e| warn!("Narration synthesis failed: {e}"))
            .ok();
        let album_art = self
            .generator
            .image(&script::album_art_prompt(mood, &track.name))
            .map_err(|e| warn!("Album art generation failed: {e}"))
            .ok();

        ShowSegment {
            track,
            narration,
            artist_note,
            voice,
            album_art,
        }
    }
}

pub fn playlist_name(mood: &str) -> String {
    format!("AI Radio: {} ({})", mood, Local::now().format("%b %-d, %Y"))
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
