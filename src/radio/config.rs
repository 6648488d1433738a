use serde::{Deserialize, Serialize};

/// Tuning knobs for track selection; every field has a default
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    pub market: String,      // ISO country code all searches are scoped to
    pub seed_genre: String,  // genre seed for the recommendation step
    pub limits: SearchLimits,
    pub popularity: PopularityThresholds,
    pub diversity: DiversitySettings,
    pub priority_artists: Vec<String>, // ordered; the resolver only tries the first few
    pub artist_search_depth: usize,
    pub fallback_query: String,
    pub indie_queries: Vec<String>,
    pub regional_scenes: Vec<String>,
    pub labels: Vec<String>,
    pub emerging_queries: Vec<String>,
    pub genre_tags: Vec<String>,
    pub default_track_count: usize,
}

/// Result limits for each kind of catalog call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub recommendations: u32,
    pub keyword_search: u32,
    pub artist_search: u32,
    pub fallback_search: u32,
    pub discovery_search: u32,
}

/// Popularity ceilings (exclusive) for the indie-biased strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularityThresholds {
    pub emerging: u32,
    pub indie: u32,
    pub regional: u32,
}

/// How wide the "random among top K" picks are in diverse mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversitySettings {
    pub recommendation_top_k: usize,
    pub search_top_k: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            recommendations: 20,
            keyword_search: 50,
            artist_search: 20,
            fallback_search: 20,
            discovery_search: 50,
        }
    }
}

impl Default for PopularityThresholds {
    fn default() -> Self {
        Self {
            emerging: 25,
            indie: 30,
            regional: 35,
        }
    }
}

impl Default for DiversitySettings {
    fn default() -> Self {
        Self {
            recommendation_top_k: 10,
            search_top_k: 20,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            market: "PH".to_string(),
            seed_genre: "philippines-opm".to_string(),
            limits: SearchLimits::default(),
            popularity: PopularityThresholds::default(),
            diversity: DiversitySettings::default(),
            priority_artists: strings(&[
                "Ben&Ben",
                "Moira Dela Torre",
                "December Avenue",
                "The Juans",
                "IV of Spades",
                "Unique Salonga",
                "SB19",
                "BINI",
                "Parokya ni Edgar",
                "Rivermaya",
                "Eraserheads",
                "Bamboo",
                "Sponge Cola",
                "Silent Sanctuary",
                "Kamikazee",
                "Callalily",
                "Moonstar88",
                "Itchyworms",
                "Orange and Lemons",
            ]),
            artist_search_depth: 5,
            fallback_query: "OPM Filipino music".to_string(),
            indie_queries: strings(&[
                "Filipino indie",
                "OPM indie",
                "Pinoy indie folk",
                "Manila bedroom pop",
                "Pinoy underground",
            ]),
            regional_scenes: strings(&[
                "Bisrock",
                "Cebuano indie",
                "Davao indie",
                "Baguio folk",
                "Ilocano songs",
                "Kapampangan music",
            ]),
            labels: strings(&[
                "Sony Music Philippines",
                "Warner Music Philippines",
                "Universal Records Philippines",
                "Viva Records",
                "Offshore Music",
                "O/C Records",
            ]),
            emerging_queries: strings(&["OPM", "Filipino", "Pinoy"]),
            genre_tags: strings(&["opm", "pinoy rock", "p-pop", "manila sound"]),
            default_track_count: 10,
        }
    }
}

impl RadioConfig {
    /// Load a radio configuration from a JSON file; missing fields use defaults
    pub fn load_from_file(path: &str) -> Result<RadioConfig, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: RadioConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The prioritized artists the single-track resolver tries
    pub fn resolver_artists(&self) -> &[String] {
        let depth = self.artist_search_depth.min(self.priority_artists.len());
        &self.priority_artists[..depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "market": "US",
            "popularity": { "indie": 40 },
            "priority_artists": ["Zild", "Cup of Joe"]
        }"#;
        let config: RadioConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.market, "US");
        assert_eq!(config.popularity.indie, 40);
        assert_eq!(config.popularity.emerging, 25);
        assert_eq!(config.popularity.regional, 35);
        assert_eq!(config.limits.keyword_search, 50);
        assert_eq!(config.seed_genre, "philippines-opm");
        assert_eq!(config.resolver_artists(), ["Zild", "Cup of Joe"]);
    }

    #[test]
    fn test_resolver_artists_capped_at_depth() {
        let config = RadioConfig::default();
        let artists = config.resolver_artists();

        assert_eq!(artists.len(), 5);
        assert_eq!(artists[0], "Ben&Ben");
        assert_eq!(artists[4], "IV of Spades");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(RadioConfig::load_from_file("/nonexistent/radio.json").is_err());
    }
}
