use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Finished,
    Postponed,
    Cancelled,
    Unknown,
}

/// One row of a day's schedule, reduced to the fields the scan looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub id: u64,
    pub competition_id: Option<u64>,
    pub competition_slug: Option<String>,
    pub status: MatchStatus,
    pub home_team: String,
    pub away_team: String,
    pub start_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupPlayer {
    pub player_id: Option<u64>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub rating: Option<f64>,
    pub minutes_played: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupPayload {
    pub home: Vec<LineupPlayer>,
    pub away: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 4] = [
        PositionGroup::Goalkeeper,
        PositionGroup::Defender,
        PositionGroup::Midfielder,
        PositionGroup::Forward,
    ];

    pub fn index(self) -> usize {
        match self {
            PositionGroup::Goalkeeper => 0,
            PositionGroup::Defender => 1,
            PositionGroup::Midfielder => 2,
            PositionGroup::Forward => 3,
        }
    }
}

/// One value per position group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerGroup<T> {
    pub goalkeeper: T,
    pub defender: T,
    pub midfielder: T,
    pub forward: T,
}

impl<T: Copy> PerGroup<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            goalkeeper: value,
            defender: value,
            midfielder: value,
            forward: value,
        }
    }

    pub fn get(&self, group: PositionGroup) -> T {
        match group {
            PositionGroup::Goalkeeper => self.goalkeeper,
            PositionGroup::Defender => self.defender,
            PositionGroup::Midfielder => self.midfielder,
            PositionGroup::Forward => self.forward,
        }
    }

    pub fn set(&mut self, group: PositionGroup, value: T) {
        match group {
            PositionGroup::Goalkeeper => self.goalkeeper = value,
            PositionGroup::Defender => self.defender = value,
            PositionGroup::Midfielder => self.midfielder = value,
            PositionGroup::Forward => self.forward = value,
        }
    }
}

pub fn group_label(group: PositionGroup) -> &'static str {
    match group {
        PositionGroup::Goalkeeper => "Goalkeepers",
        PositionGroup::Defender => "Defenders",
        PositionGroup::Midfielder => "Midfielders",
        PositionGroup::Forward => "Forwards",
    }
}
