pub mod formatter;
pub mod standings;

pub use formatter::{
    format_leaderboard, format_score, format_student_detail, format_tsv, should_use_colors,
    RankedEntry,
};
pub use standings::write_standings;
