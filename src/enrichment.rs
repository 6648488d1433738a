use crate::config::Config;
use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use serde::Deserialize;
use ureq::Agent;

/// Short snippets about an artist from a web search service
#[cfg_attr(test, mockall::automock)]
pub trait WebSearch {
    fn snippets(&self, query: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    content: Option<String>,
}

/// Web search client for a Tavily-style JSON search endpoint
pub struct WebSearchClient {
    agent: Agent,
    url: String,
    api_key: String,
}

impl WebSearchClient {
    pub fn new(url: &str, api_key: &str) -> Self {
        WebSearchClient {
            agent: Agent::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl WebSearch for WebSearchClient {
    fn snippets(&self, query: &str) -> Result<Vec<String>> {
        let response: SearchResults = self
            .agent
            .post(&self.url)
            .send_json(serde_json::json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": 3,
            }))
            .map_err(|e| anyhow!("Web search failed: {}", e))?
            .into_json()?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|result| result.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .collect())
    }
}

/// Whether live web enrichment can be used; resolved once at startup
pub enum EnrichmentCapability {
    Available(Box<dyn WebSearch>),
    Unavailable,
}

impl EnrichmentCapability {
    pub fn from_config(config: &Config) -> Self {
        match &config.search_api_key {
            Some(key) => {
                info!("Web search enrichment enabled");
                EnrichmentCapability::Available(Box::new(WebSearchClient::new(
                    &config.search_api_url,
                    key,
                )))
            }
            None => {
                info!("Web search enrichment unavailable, using built-in artist notes");
                EnrichmentCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, EnrichmentCapability::Available(_))
    }
}

/// Built-in notes for well-known OPM artists, keyed by lower-cased name
const ARTIST_NOTES: &[(&str, &str)] = &[
    (
        "ben&ben",
        "Ang nine-piece folk-pop band na nagpasikat ng 'Kathang Isip' at 'Maybe The Night'.",
    ),
    ("moira dela torre", "Ang reyna ng hugot na kilala sa 'Tagpuan' at 'Paubaya'."),
    (
        "december avenue",
        "Ang pop-rock band sa likod ng 'Kung 'Di Rin Lang Ikaw' at 'Sa Ngalan ng Pag-ibig'.",
    ),
    ("the juans", "Ang OPM band na kilala sa madamdaming 'Hindi Tayo Pwede'."),
    ("iv of spades", "Ang retro-funk na banda na nagbigay sa atin ng 'Mundo' at 'Hey Barbara'."),
    ("unique salonga", "Ang dating frontman ng IV of Spades na kilala sa 'Midnight Sky'."),
    ("sb19", "Ang P-pop kings na nagdala ng 'Gento' at 'Bazinga' sa buong mundo."),
    ("bini", "Ang nation's girl group na nagpasikat ng 'Pantropiko' at 'Salamin, Salamin'."),
    (
        "parokya ni edgar",
        "Ang pambansang banda ng kalokohan at puso, mula 'Harana' hanggang 'Buloy'.",
    ),
    ("rivermaya", "Ang alamat ng 90s Pinoy rock sa likod ng '214' at 'Kisapmata'."),
    ("eraserheads", "Ang Beatles ng Pilipinas na may 'Ang Huling El Bimbo' at 'Pare Ko'."),
    ("bamboo", "Ang rock icon na kilala sa 'Noypi' at 'Hallelujah'."),
    ("sponge cola", "Ang pop-rock band na nagpasikat ng 'Jeepney' at 'Gemini'."),
    ("silent sanctuary", "Ang orchestral pop-rock band sa likod ng 'Ikaw Lamang' at 'Sayo'."),
    ("kamikazee", "Ang rock band ng 'Narda' at 'Chinito Problems'."),
    ("callalily", "Ang banda ng 'Magbalik' at 'Stars'."),
    ("moonstar88", "Ang banda na nagbigay sa atin ng walang kamatayang 'Migraine'."),
    ("itchyworms", "Ang witty pop-rock band sa likod ng 'Beer' at 'Akin Ka Na Lang'."),
    ("orange and lemons", "Ang jangle-pop band na kilala sa 'Pinoy Ako' at 'Hanggang Kailan'."),
];

/// Produces a one-line note about an artist for narration and playlist copy
pub struct ArtistEnricher {
    capability: EnrichmentCapability,
}

impl ArtistEnricher {
    pub fn new(capability: EnrichmentCapability) -> Self {
        Self { capability }
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    /// Live snippet when available, else the built-in note, else a templated sentence
    pub fn describe(&self, artist: &str) -> String {
        if let EnrichmentCapability::Available(search) = &self.capability {
            match search.snippets(&format!("{artist} OPM artist")) {
                Ok(snippets) => {
                    if let Some(snippet) = snippets.into_iter().next() {
                        return first_sentence(&snippet);
                    }
                    debug!("Web search returned nothing for {artist}");
                }
                Err(e) => warn!("Web search enrichment failed for {artist}: {e}"),
            }
        }

        Self::static_note(artist).unwrap_or_else(|| Self::generic_note(artist))
    }

    pub fn static_note(artist: &str) -> Option<String> {
        let key = artist.trim().to_lowercase();
        ARTIST_NOTES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, note)| note.to_string())
    }

    pub fn generic_note(artist: &str) -> String {
        format!("Si {artist} ay isa sa mga boses ng OPM na dapat ninyong pakinggan!")
    }
}

fn first_sentence(text: &str) -> String {
    match text.find(". ") {
        Some(end) => text[..=end].to_string(),
        None => text.to_string(),
    }
}
