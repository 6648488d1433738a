use crate::config::Config;
use crate::models::{
    CreatedPlaylist, CurrentUser, RecommendationsResponse, SearchResponse, Track,
};
use crate::radio::TargetFeatures;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use thiserror::Error;
use ureq::Agent;
use urlencoding::encode;

/// Largest base64 payload the playlist cover endpoint accepts
pub const MAX_COVER_BYTES: usize = 256 * 1024;

/// Outcome of a failed call to the catalog or playlist service
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("API returned status {0}: {1}")]
    Status(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Cover image is {0} bytes encoded, limit is {MAX_COVER_BYTES}")]
    CoverTooLarge(usize),
}

impl From<ureq::Error> for CatalogError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                CatalogError::Status(code, body)
            }
            ureq::Error::Transport(transport) => CatalogError::Transport(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

/// Track search and recommendation capability of the music catalog
#[cfg_attr(test, mockall::automock)]
pub trait CatalogService {
    /// Full-text track search; supports `artist:`, `label:`, `year:` and `genre:` qualifiers
    fn search_tracks(&self, query: &str, limit: u32, market: &str)
    -> Result<Vec<Track>, CatalogError>;

    /// Genre-seeded recommendations biased toward the target features
    fn recommendations(
        &self,
        seed_genres: &[String],
        market: &str,
        features: &TargetFeatures,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError>;
}

/// Playlist and saved-library mutation capability of the music catalog
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistService {
    fn current_user_id(&self) -> Result<String, CatalogError>;

    fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, CatalogError>;

    fn add_items(&self, playlist_id: &str, track_uris: &[String]) -> Result<(), CatalogError>;

    /// Upload raw JPEG bytes as the playlist cover
    fn upload_cover_image(&self, playlist_id: &str, jpeg: &[u8]) -> Result<(), CatalogError>;

    /// Add tracks to the current user's saved library ("Liked Songs")
    fn save_tracks(&self, track_ids: &[String]) -> Result<(), CatalogError>;
}

/// A blocking Spotify Web API client authenticated with a bearer token
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        SpotifyClient {
            agent: Agent::new(),
            base_url: config.spotify_api_url.trim_end_matches('/').to_string(),
            access_token: config.spotify_access_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn get(&self, path: &str) -> ureq::Request {
        self.agent
            .get(&self.url(path))
            .set("Authorization", &self.bearer())
    }

    fn post(&self, path: &str) -> ureq::Request {
        self.agent
            .post(&self.url(path))
            .set("Authorization", &self.bearer())
    }
}

impl CatalogService for SpotifyClient {
    fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        market: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        debug!("Searching tracks: q={query:?} limit={limit} market={market}");

        let response: SearchResponse = self
            .get("/search")
            .query("q", query)
            .query("type", "track")
            .query("limit", &limit.to_string())
            .query("market", market)
            .call()?
            .into_json()?;

        Ok(response.into_tracks())
    }

    fn recommendations(
        &self,
        seed_genres: &[String],
        market: &str,
        features: &TargetFeatures,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        debug!("Requesting recommendations: seeds={seed_genres:?} market={market}");

        let mut request = self
            .get("/recommendations")
            .query("seed_genres", &seed_genres.join(","))
            .query("market", market)
            .query("limit", &limit.to_string());

        for (name, value) in features.query_params() {
            request = request.query(&name, &value);
        }

        let response: RecommendationsResponse = request.call()?.into_json()?;
        Ok(response.into_tracks())
    }
}

impl PlaylistService for SpotifyClient {
    fn current_user_id(&self) -> Result<String, CatalogError> {
        let user: CurrentUser = self.get("/me").call()?.into_json()?;
        Ok(user.id)
    }

    fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, CatalogError> {
        println!("Creating playlist '{name}'...");

        let created: CreatedPlaylist = self
            .post(&format!("/users/{}/playlists", encode(owner_id)))
            .send_json(serde_json::json!({
                "name": name,
                "description": description,
                "public": false,
            }))?
            .into_json()?;

        debug!("Created playlist '{}' with ID {}", created.name, created.id);
        Ok(created.id)
    }

    fn add_items(&self, playlist_id: &str, track_uris: &[String]) -> Result<(), CatalogError> {
        // The endpoint accepts at most 100 URIs per request
        for chunk in track_uris.chunks(100) {
            self.post(&format!("/playlists/{}/tracks", encode(playlist_id)))
                .send_json(serde_json::json!({ "uris": chunk }))?;
        }
        Ok(())
    }

    fn upload_cover_image(&self, playlist_id: &str, jpeg: &[u8]) -> Result<(), CatalogError> {
        let encoded = STANDARD.encode(jpeg);
        if encoded.len() > MAX_COVER_BYTES {
            return Err(CatalogError::CoverTooLarge(encoded.len()));
        }

        self.agent
            .put(&self.url(&format!("/playlists/{}/images", encode(playlist_id))))
            .set("Authorization", &self.bearer())
            .set("Content-Type", "image/jpeg")
            .send_string(&encoded)?;
        Ok(())
    }

    fn save_tracks(&self, track_ids: &[String]) -> Result<(), CatalogError> {
        // The endpoint accepts at most 50 ids per request
        for chunk in track_ids.chunks(50) {
            self.agent
                .put(&self.url("/me/tracks"))
                .set("Authorization", &self.bearer())
                .send_json(serde_json::json!({ "ids": chunk }))?;
        }
        debug!("Saved {} tracks to the library", track_ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            spotify_api_url: "http://localhost:9/v1/".to_string(),
            spotify_access_token: "token".to_string(),
            openai_api_url: "http://localhost:9/v1".to_string(),
            openai_api_key: "key".to_string(),
            search_api_url: "http://localhost:9/search".to_string(),
            search_api_key: None,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = SpotifyClient::new(&test_config());
        assert_eq!(client.url("/search"), "http://localhost:9/v1/search");
        assert_eq!(client.bearer(), "Bearer token");
    }

    #[test]
    fn test_oversized_cover_rejected_before_upload() {
        let client = SpotifyClient::new(&test_config());
        let jpeg = vec![0xFFu8; 200_000];

        match client.upload_cover_image("pl1", &jpeg) {
            Err(CatalogError::CoverTooLarge(size)) => assert!(size > MAX_COVER_BYTES),
            other => panic!("expected CoverTooLarge, got {other:?}"),
        }
    }
}
