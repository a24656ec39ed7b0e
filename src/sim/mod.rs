pub mod error;
pub mod scenarios;
pub mod standings;

pub use error::SimError;
pub use scenarios::{
    find_qualifying_scenarios, outcome_space_size, search, ScenarioQuery, SearchOptions,
    SearchReport,
};
pub use standings::compute_standings;
