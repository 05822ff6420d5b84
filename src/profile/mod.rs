//! Form-held inputs. Values are kept as the user typed them; the prompt
//! builders interpolate them verbatim.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    #[value(alias = "fat_loss")]
    FatLoss,
    #[value(alias = "muscle_gain")]
    MuscleGain,
    Maintenance,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::FatLoss => "fat loss",
            Goal::MuscleGain => "muscle gain",
            Goal::Maintenance => "maintenance",
        }
    }
}

impl Goal {
    /// Parse a typed answer: `fat-loss`, `fat_loss` and `Fat Loss` all work.
    pub fn parse_choice(input: &str) -> Option<Self> {
        let norm = input.trim().replace(' ', "-");
        <Self as ValueEnum>::from_str(&norm, true).ok()
    }

    /// Name accepted on the command line and by [`Goal::parse_choice`].
    pub fn choice_name(self) -> String {
        self.to_possible_value().map(|v| v.get_name().to_string()).unwrap_or_default()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietPreference {
    Balanced,
    #[default]
    HighProtein,
    LowCarb,
    Vegetarian,
}

impl DietPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            DietPreference::Balanced => "balanced",
            DietPreference::HighProtein => "high-protein",
            DietPreference::LowCarb => "low-carb",
            DietPreference::Vegetarian => "vegetarian",
        }
    }
}

impl fmt::Display for DietPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseType {
    #[default]
    Squat,
    #[value(name = "push-up", alias = "pushup")]
    PushUp,
    Deadlift,
    #[value(name = "bicep-curl", alias = "curl")]
    BicepCurl,
}

impl ExerciseType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Squat => "Squat",
            ExerciseType::PushUp => "Push-up",
            ExerciseType::Deadlift => "Deadlift",
            ExerciseType::BicepCurl => "Bicep Curl",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training-page details form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// kg
    pub weight: String,
    /// cm
    pub height: String,
    pub age: String,
    pub goal: Goal,
    pub days_per_week: String,
    /// minutes per session
    pub minutes_per_session: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight: "75".into(),
            height: "180".into(),
            age: "30".into(),
            goal: Goal::MuscleGain,
            days_per_week: "4".into(),
            minutes_per_session: "60".into(),
        }
    }
}

/// Diet-page form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietForm {
    pub goal: Goal,
    pub preference: DietPreference,
}

impl Default for DietForm {
    fn default() -> Self {
        Self { goal: Goal::FatLoss, preference: DietPreference::HighProtein }
    }
}
