/// Completed workouts per week, shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekProgress {
    pub week: &'static str,
    pub workouts: u32,
}

pub static PROGRESS_DATA: [WeekProgress; 6] = [
    WeekProgress { week: "Week 1", workouts: 3 },
    WeekProgress { week: "Week 2", workouts: 4 },
    WeekProgress { week: "Week 3", workouts: 3 },
    WeekProgress { week: "Week 4", workouts: 5 },
    WeekProgress { week: "Week 5", workouts: 4 },
    WeekProgress { week: "Week 6", workouts: 6 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub icon: &'static str,
}

pub const STAT_CARDS: [StatCard; 3] = [
    StatCard { title: "Workouts This Week", value: "4", icon: "🏋️" },
    StatCard { title: "Current Streak", value: "12 Days", icon: "🔥" },
    StatCard { title: "Calories Burned", value: "2,150", icon: "⚡" },
];

pub fn peak_week() -> Option<&'static WeekProgress> {
    PROGRESS_DATA.iter().max_by_key(|w| w.workouts)
}
