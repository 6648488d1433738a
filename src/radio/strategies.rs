use super::config::RadioConfig;
use super::filters::TrackFilters;
use super::mood::{MoodCategory, MoodProfile, TargetFeatures};
use super::picker::{Picker, choose};
use super::resolver::FallbackResolver;
use crate::client::{CatalogError, CatalogService};
use crate::models::Track;
use log::debug;

/// Everything a strategy needs for one attempt
pub struct SearchContext<'a> {
    pub catalog: &'a dyn CatalogService,
    pub config: &'a RadioConfig,
    pub market: &'a str,
    pub picker: &'a mut dyn Picker,
}

/// One self-contained, independently failable way to produce a candidate track
pub trait TrackStrategy {
    fn name(&self) -> String;

    /// `Ok(None)` means the catalog answered but nothing qualified
    fn attempt(&self, ctx: &mut SearchContext<'_>) -> Result<Option<Track>, CatalogError>;
}

/// How a strategy chooses among an ordered result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Always the first result
    #[default]
    First,
    /// Uniformly among the top K results
    Diverse,
}

impl SelectionPolicy {
    pub fn select(
        self,
        mut candidates: Vec<Track>,
        top_k: usize,
        picker: &mut dyn Picker,
    ) -> Option<Track> {
        match self {
            SelectionPolicy::First => candidates.into_iter().next(),
            SelectionPolicy::Diverse => {
                candidates.truncate(top_k.max(1));
                choose(&candidates, picker).cloned()
            }
        }
    }
}

/// The built-in search strategies
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Genre-seeded recommendations toward a feature vector
    Recommendation {
        features: TargetFeatures,
        policy: SelectionPolicy,
    },
    /// Ordered keyword queries; the first non-empty result set wins
    KeywordSearch {
        queries: Vec<String>,
        policy: SelectionPolicy,
    },
    /// `artist:` qualified searches in priority order
    ArtistSearch { artists: Vec<String> },
    /// Last-resort catch-all query
    CatchAll { query: String },
    /// Search a randomly chosen OPM artist from the priority list
    RandomArtist,
    /// Themed query filtered to the indie popularity ceiling
    IndieDiscovery,
    /// Regional scene query filtered to the regional ceiling
    RegionalScene,
    /// `label:` query, least popular track under the indie ceiling
    LabelSearch,
    /// Recent releases under the emerging ceiling, newest and quietest first
    EmergingArtist { since: i32, until: i32 },
    /// `genre:` qualified search
    GenreQualified { genre: String },
    /// The full fallback cascade for a mood, in diverse mode
    Mood { category: MoodCategory },
}

impl TrackStrategy for Strategy {
    fn name(&self) -> String {
        match self {
            Strategy::Recommendation { .. } => "recommendation".to_string(),
            Strategy::KeywordSearch { .. } => "keyword search".to_string(),
            Strategy::ArtistSearch { .. } => "artist search".to_string(),
            Strategy::CatchAll { query } => format!("catch-all '{query}'"),
            Strategy::RandomArtist => "random OPM artist".to_string(),
            Strategy::IndieDiscovery => "indie discovery".to_string(),
            Strategy::RegionalScene => "regional scene".to_string(),
            Strategy::LabelSearch => "label search".to_string(),
            Strategy::EmergingArtist { .. } => "emerging artist".to_string(),
            Strategy::GenreQualified { genre } => format!("genre '{genre}'"),
            Strategy::Mood { category } => format!("{category} mood"),
        }
    }

    fn attempt(&self, ctx: &mut SearchContext<'_>) -> Result<Option<Track>, CatalogError> {
        let config = ctx.config;
        let limits = &config.limits;
        let diversity = &config.diversity;
        let popularity = &config.popularity;

        match self {
            Strategy::Recommendation { features, policy } => {
                let seeds = [config.seed_genre.clone()];
                let tracks = ctx.catalog.recommendations(
                    &seeds,
                    ctx.market,
                    features,
                    limits.recommendations,
                )?;
                Ok(policy.select(tracks, diversity.recommendation_top_k, ctx.picker))
            }

            Strategy::KeywordSearch { queries, policy } => {
                let top_k = diversity.search_top_k;
                first_hit(ctx, queries.iter().cloned(), limits.keyword_search, |tracks, picker| {
                    policy.select(tracks, top_k, picker)
                })
            }

            Strategy::ArtistSearch { artists } => {
                let queries = artists.iter().map(|artist| artist_query(artist));
                first_hit(ctx, queries, limits.artist_search, |tracks, _| {
                    tracks.into_iter().next()
                })
            }

            Strategy::CatchAll { query } => {
                let tracks = ctx
                    .catalog
                    .search_tracks(query, limits.fallback_search, ctx.market)?;
                Ok(tracks.into_iter().next())
            }

            Strategy::RandomArtist => {
                let Some(artist) = choose(&config.priority_artists, ctx.picker).cloned() else {
                    return Ok(None);
                };
                let tracks =
                    ctx.catalog
                        .search_tracks(&artist_query(&artist), limits.artist_search, ctx.market)?;
                Ok(SelectionPolicy::Diverse.select(tracks, diversity.search_top_k, ctx.picker))
            }

            Strategy::IndieDiscovery => {
                let Some(query) = choose(&config.indie_queries, ctx.picker).cloned() else {
                    return Ok(None);
                };
                let tracks = ctx
                    .catalog
                    .search_tracks(&query, limits.discovery_search, ctx.market)?;
                Ok(TrackFilters::pick_indie(tracks, popularity.indie, ctx.picker))
            }

            Strategy::RegionalScene => {
                let Some(scene) = choose(&config.regional_scenes, ctx.picker).cloned() else {
                    return Ok(None);
                };
                let tracks = ctx
                    .catalog
                    .search_tracks(&scene, limits.discovery_search, ctx.market)?;
                Ok(TrackFilters::pick_indie(tracks, popularity.regional, ctx.picker))
            }

            Strategy::LabelSearch => {
                let Some(label) = choose(&config.labels, ctx.picker).cloned() else {
                    return Ok(None);
                };
                let tracks = ctx.catalog.search_tracks(
                    &format!("label:\"{label}\""),
                    limits.discovery_search,
                    ctx.market,
                )?;
                Ok(TrackFilters::pick_least_popular(tracks, popularity.indie))
            }

            Strategy::EmergingArtist { since, until } => {
                let Some(term) = choose(&config.emerging_queries, ctx.picker).cloned() else {
                    return Ok(None);
                };
                let tracks = ctx.catalog.search_tracks(
                    &format!("{term} year:{since}-{until}"),
                    limits.discovery_search,
                    ctx.market,
                )?;
                Ok(TrackFilters::pick_emerging(tracks, popularity.emerging, ctx.picker))
            }

            Strategy::GenreQualified { genre } => {
                let tracks = ctx.catalog.search_tracks(
                    &format!("genre:\"{genre}\""),
                    limits.keyword_search,
                    ctx.market,
                )?;
                Ok(SelectionPolicy::Diverse.select(tracks, diversity.search_top_k, ctx.picker))
            }

            Strategy::Mood { category } => {
                let resolver = FallbackResolver::new(ctx.catalog, config)
                    .with_policy(SelectionPolicy::Diverse);
                Ok(resolver.resolve_track(&MoodProfile::from(*category), ctx.market, ctx.picker))
            }
        }
    }
}

fn artist_query(artist: &str) -> String {
    format!("artist:\"{artist}\"")
}

/// Run queries in order until one yields a selected track
/// Individual query failures are skipped; the last one is returned only if every query failed
fn first_hit<I, F>(
    ctx: &mut SearchContext<'_>,
    queries: I,
    limit: u32,
    mut select: F,
) -> Result<Option<Track>, CatalogError>
where
    I: IntoIterator<Item = String>,
    F: FnMut(Vec<Track>, &mut dyn Picker) -> Option<Track>,
{
    let mut answered = false;
    let mut last_error = None;

    for query in queries {
        match ctx.catalog.search_tracks(&query, limit, ctx.market) {
            Ok(tracks) => {
                answered = true;
                if let Some(track) = select(tracks, ctx.picker) {
                    debug!("Query {query:?} selected '{}'", track.name);
                    return Ok(Some(track));
                }
            }
            Err(e) => {
                debug!("Query {query:?} failed: {e}");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !answered => Err(e),
        _ => Ok(None),
    }
}

/// Builds the fixed, ordered strategy lists
pub struct StrategyCatalog;

impl StrategyCatalog {
    /// The single-track fallback cascade for a mood
    pub fn cascade(
        profile: &MoodProfile,
        config: &RadioConfig,
        policy: SelectionPolicy,
    ) -> Vec<Strategy> {
        vec![
            Strategy::Recommendation {
                features: profile.features,
                policy,
            },
            Strategy::KeywordSearch {
                queries: profile
                    .category
                    .queries()
                    .iter()
                    .map(|q| q.to_string())
                    .collect(),
                policy,
            },
            Strategy::ArtistSearch {
                artists: config.resolver_artists().to_vec(),
            },
            Strategy::CatchAll {
                query: config.fallback_query.clone(),
            },
        ]
    }

    /// The multi-track strategy order for continuous play
    pub fn continuous_play(
        category: MoodCategory,
        config: &RadioConfig,
        this_year: i32,
    ) -> Vec<Strategy> {
        let mut strategies = vec![
            Strategy::Mood { category },
            Strategy::RandomArtist,
            Strategy::IndieDiscovery,
            Strategy::RegionalScene,
            Strategy::LabelSearch,
            Strategy::EmergingArtist {
                since: this_year - 1,
                until: this_year,
            },
        ];
        strategies.extend(
            category
                .alternates()
                .iter()
                .map(|&category| Strategy::Mood { category }),
        );
        strategies.extend(config.genre_tags.iter().map(|genre| Strategy::GenreQualified {
            genre: genre.clone(),
        }));
        strategies
    }
}
