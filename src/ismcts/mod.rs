pub mod config;
pub mod error;
pub mod game;
pub mod node;
pub mod search;
pub mod tree;

pub use config::{SearchConfig, DEFAULT_EXPLORATION};
pub use error::SearchError;
pub use game::{GameResult, GameState};
pub use search::{
    estimate_value, estimate_value_with_rng, rollout, search, search_with_config,
    search_with_rng, IsmctsHandler, SearchReport,
};
