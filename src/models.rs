use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog track with the fields the Spotify Web API returns that we use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String, // empty for local files and other unplayable entries
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub popularity: u32, // 0-100, higher means more mainstream
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>, // "YYYY", "YYYY-MM" or "YYYY-MM-DD"
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Track {
    /// Name of the first credited artist, or "Unknown"
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(|artist| artist.name.as_str())
            .unwrap_or("Unknown")
    }

    /// All credited artist names in credit order
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    /// Album release date, padding partial dates to the first day of the period
    pub fn release_date(&self) -> Option<NaiveDate> {
        let raw = self.album.release_date.as_deref()?.trim();
        let padded = match raw.len() {
            4 => format!("{raw}-01-01"),
            7 => format!("{raw}-01"),
            _ => raw.to_string(),
        };
        NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
    }

    /// Spotify URI for playlist mutation calls
    pub fn spotify_uri(&self) -> String {
        self.uri
            .clone()
            .unwrap_or_else(|| format!("spotify:track:{}", self.id))
    }

    pub fn share_url(&self) -> String {
        format!("https://open.spotify.com/track/{}", self.id)
    }
}

impl Default for Track {
    fn default() -> Self {
        Track {
            id: String::new(),
            name: "Unknown".to_string(),
            artists: Vec::new(),
            popularity: 0,
            album: Album::default(),
            uri: None,
        }
    }
}

/// Response structure for the search endpoint with `type=track`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Option<Track>>, // the API occasionally returns null entries
}

/// Response structure for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

/// Drop null entries and tracks without an id; neither can be played or deduplicated
fn playable(items: Vec<Option<Track>>) -> Vec<Track> {
    items
        .into_iter()
        .flatten()
        .filter(|track| !track.id.is_empty())
        .collect()
}

impl SearchResponse {
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks.map(|page| playable(page.items)).unwrap_or_default()
    }
}

impl RecommendationsResponse {
    pub fn into_tracks(self) -> Vec<Track> {
        playable(self.tracks)
    }
}

/// Response structure for `GET /me`
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Response structure for playlist creation
#[derive(Debug, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
}
