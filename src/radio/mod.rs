pub mod aggregator;
pub mod config;
pub mod cover;
pub mod filters;
pub mod mood;
pub mod picker;
pub mod resolver;
pub mod script;
pub mod show;
pub mod strategies;
pub mod track_set;

pub use config::*;
pub use mood::*;
pub use picker::*;
pub use show::*;
