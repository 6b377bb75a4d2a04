use chrono::{DateTime, Utc};

/// One competition result scraped from a profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub rank: u64,          // final leaderboard position, 1-based
    pub field_size: u64,    // number of teams on that leaderboard
    pub competition: String,
    pub ended_at: Option<DateTime<Utc>>, // deadline, when the page exposes it
}

impl Placement {
    pub fn new(rank: u64, field_size: u64, competition: impl Into<String>) -> Self {
        Self {
            rank,
            field_size,
            competition: competition.into(),
            ended_at: None,
        }
    }

    /// A placement with a zero rank or zero field size cannot be scored;
    /// the formula is undefined at rank 0.
    pub fn is_well_formed(&self) -> bool {
        self.rank >= 1 && self.field_size >= 1
    }
}

/// The three competition tabs on a profile, extracted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompetitionView {
    Completed,
    Active,
    Tutorial,
}

impl CompetitionView {
    pub const ALL: [CompetitionView; 3] = [
        CompetitionView::Completed,
        CompetitionView::Active,
        CompetitionView::Tutorial,
    ];

    /// Tab name as it appears in the page's group query parameter.
    pub fn group_slug(&self) -> &'static str {
        match self {
            CompetitionView::Completed => "completed",
            CompetitionView::Active => "active",
            CompetitionView::Tutorial => "tutorial",
        }
    }
}

impl std::fmt::Display for CompetitionView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.group_slug())
    }
}
