use super::config::RadioConfig;
use super::mood::MoodProfile;
use super::picker::Picker;
use super::strategies::{SearchContext, SelectionPolicy, StrategyCatalog, TrackStrategy};
use crate::client::CatalogService;
use crate::models::Track;
use log::{debug, warn};

/// Resolves a mood to one playable track by cascading through search strategies
///
/// Steps run in a fixed order: genre-seeded recommendations, the mood's keyword
/// queries, the prioritized artists, and a catch-all query. Each step runs only
/// if the previous one produced nothing. A failing step is logged and skipped.
pub struct FallbackResolver<'a> {
    catalog: &'a dyn CatalogService,
    config: &'a RadioConfig,
    policy: SelectionPolicy,
}

impl<'a> FallbackResolver<'a> {
    pub fn new(catalog: &'a dyn CatalogService, config: &'a RadioConfig) -> Self {
        Self {
            catalog,
            config,
            policy: SelectionPolicy::First,
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the first track any cascade step selects, or `None` once every step is exhausted
    pub fn resolve_track(
        &self,
        profile: &MoodProfile,
        market: &str,
        picker: &mut dyn Picker,
    ) -> Option<Track> {
        let mut ctx = SearchContext {
            catalog: self.catalog,
            config: self.config,
            market,
            picker,
        };

        for strategy in StrategyCatalog::cascade(profile, self.config, self.policy) {
            match strategy.attempt(&mut ctx) {
                Ok(Some(track)) => {
                    debug!(
                        "{} resolved {} mood to '{}' by {}",
                        strategy.name(),
                        profile.category,
                        track.name,
                        track.primary_artist()
                    );
                    return Some(track);
                }
                Ok(None) => debug!(
                    "{} found nothing for {} mood",
                    strategy.name(),
                    profile.category
                ),
                Err(e) => warn!("{} failed for {} mood: {e}", strategy.name(), profile.category),
            }
        }

        warn!("Every strategy exhausted for {} mood", profile.category);
        None
    }
}
