pub mod config;
pub mod error;
pub mod insight;
pub mod player_resolver;
pub mod player_stats;
pub mod player_summary;
pub mod player_timeline;
pub mod riot_api;
pub mod server;
