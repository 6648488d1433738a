use super::config::RadioConfig;
use super::mood::MoodCategory;
use super::picker::Picker;
use super::strategies::{SearchContext, StrategyCatalog, TrackStrategy};
use super::track_set::TrackSet;
use crate::client::CatalogService;
use chrono::{Datelike, Local};
use log::{debug, info, warn};

/// Builds an ordered, duplicate-free track list for continuous play
pub struct MultiTrackAggregator<'a> {
    catalog: &'a dyn CatalogService,
    config: &'a RadioConfig,
}

impl<'a> MultiTrackAggregator<'a> {
    pub fn new(catalog: &'a dyn CatalogService, config: &'a RadioConfig) -> Self {
        Self { catalog, config }
    }

    /// Up to `target_count` unique tracks for a mood; fewer is not an error
    pub fn build_playlist(
        &self,
        category: MoodCategory,
        target_count: usize,
        picker: &mut dyn Picker,
    ) -> TrackSet {
        let strategies =
            StrategyCatalog::continuous_play(category, self.config, Local::now().year());
        let mut ctx = SearchContext {
            catalog: self.catalog,
            config: self.config,
            market: &self.config.market,
            picker,
        };

        let tracks = aggregate(&strategies, &mut ctx, target_count);
        info!(
            "Collected {}/{} tracks for {} mood",
            tracks.len(),
            target_count,
            category
        );
        tracks
    }
}

/// Invoke each strategy once, in order, until `target_count` unique tracks are collected
pub fn aggregate<S: TrackStrategy>(
    strategies: &[S],
    ctx: &mut SearchContext<'_>,
    target_count: usize,
) -> TrackSet {
    let mut tracks = TrackSet::new();

    for strategy in strategies {
        if tracks.len() >= target_count {
            break;
        }

        match strategy.attempt(ctx) {
            Ok(Some(track)) => {
                let (id, name) = (track.id.clone(), track.name.clone());
                if tracks.insert(track) {
                    debug!("{} added '{name}'", strategy.name());
                } else {
                    debug!("{} returned duplicate {id}, skipping", strategy.name());
                }
            }
            Ok(None) => debug!("{} found nothing", strategy.name()),
            Err(e) => warn!("{} failed: {e}", strategy.name()),
        }
    }

    tracks
}
