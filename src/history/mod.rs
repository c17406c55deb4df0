//! Local history of past games

pub mod score_history;
pub mod store;

pub use score_history::{DEFAULT_LISTING, GameRecord, HISTORY_CAPACITY, ScoreHistory};
pub use store::HistoryBook;
