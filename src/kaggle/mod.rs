pub mod client;
pub mod extract;
pub mod parse;
pub mod types;

pub use client::{create_client, preflight, BASE_URL};
pub use extract::{ExtractError, KaggleSource, RecordSource};
pub use types::{CompetitionView, Placement};
