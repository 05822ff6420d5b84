//! Bundled workout video catalog and its filter.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

pub mod progress;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BodyPart {
    Chest,
    Back,
    Legs,
    Arms,
    Core,
    #[value(name = "full-body")]
    FullBody,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum VideoType {
    Strength,
    Cardio,
    Flexibility,
}

impl BodyPart {
    pub const ALL: [BodyPart; 6] =
        [BodyPart::Chest, BodyPart::Back, BodyPart::Legs, BodyPart::Arms, BodyPart::Core, BodyPart::FullBody];
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced];
}

impl VideoType {
    pub const ALL: [VideoType; 3] = [VideoType::Strength, VideoType::Cardio, VideoType::Flexibility];
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BodyPart::Chest => "Chest",
            BodyPart::Back => "Back",
            BodyPart::Legs => "Legs",
            BodyPart::Arms => "Arms",
            BodyPart::Core => "Core",
            BodyPart::FullBody => "Full Body",
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        })
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VideoType::Strength => "Strength",
            VideoType::Cardio => "Cardio",
            VideoType::Flexibility => "Flexibility",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutVideo {
    pub id: u32,
    pub title: &'static str,
    pub thumbnail: &'static str,
    pub body_part: BodyPart,
    pub difficulty: Difficulty,
    pub kind: VideoType,
}

const fn video(
    id: u32,
    title: &'static str,
    thumbnail: &'static str,
    body_part: BodyPart,
    difficulty: Difficulty,
    kind: VideoType,
) -> WorkoutVideo {
    WorkoutVideo { id, title, thumbnail, body_part, difficulty, kind }
}

use BodyPart as B;
use Difficulty as D;
use VideoType as T;

pub static WORKOUT_VIDEOS: [WorkoutVideo; 12] = [
    video(1, "Classic Bench Press", "https://picsum.photos/seed/bench/400/225", B::Chest, D::Intermediate, T::Strength),
    video(2, "Beginner Bodyweight Squat", "https://picsum.photos/seed/squat/400/225", B::Legs, D::Beginner, T::Strength),
    video(3, "Advanced Pull-ups", "https://picsum.photos/seed/pullup/400/225", B::Back, D::Advanced, T::Strength),
    video(4, "Bicep Curls", "https://picsum.photos/seed/bicep/400/225", B::Arms, D::Beginner, T::Strength),
    video(5, "Plank for Core Strength", "https://picsum.photos/seed/plank/400/225", B::Core, D::Beginner, T::Strength),
    video(6, "High-Intensity Interval Training (HIIT)", "https://picsum.photos/seed/hiit/400/225", B::FullBody, D::Intermediate, T::Cardio),
    video(7, "Deadlift Form Guide", "https://picsum.photos/seed/deadlift/400/225", B::Back, D::Advanced, T::Strength),
    video(8, "Yoga for Flexibility", "https://picsum.photos/seed/yoga/400/225", B::FullBody, D::Beginner, T::Flexibility),
    video(9, "Lunge Variations", "https://picsum.photos/seed/lunge/400/225", B::Legs, D::Intermediate, T::Strength),
    video(10, "Overhead Press", "https://picsum.photos/seed/press/400/225", B::Arms, D::Intermediate, T::Strength),
    video(11, "Russian Twists", "https://picsum.photos/seed/twist/400/225", B::Core, D::Intermediate, T::Strength),
    video(12, "Advanced Push-up Variations", "https://picsum.photos/seed/pushup/400/225", B::Chest, D::Advanced, T::Strength),
];

/// `None` in a dimension means "All". Active dimensions combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoFilter {
    pub body_part: Option<BodyPart>,
    pub difficulty: Option<Difficulty>,
    pub kind: Option<VideoType>,
}

impl VideoFilter {
    pub fn matches(&self, v: &WorkoutVideo) -> bool {
        self.body_part.map_or(true, |b| v.body_part == b)
            && self.difficulty.map_or(true, |d| v.difficulty == d)
            && self.kind.map_or(true, |k| v.kind == k)
    }

    pub fn apply<'a>(&self, videos: &'a [WorkoutVideo]) -> Vec<&'a WorkoutVideo> {
        videos.iter().filter(|v| self.matches(v)).collect()
    }
}

pub fn filter_catalog(filter: &VideoFilter) -> Vec<&'static WorkoutVideo> {
    filter.apply(&WORKOUT_VIDEOS)
}

/// Option labels per dimension, "All" first.
pub fn filter_options() -> [(&'static str, Vec<String>); 3] {
    fn with_all<T: fmt::Display>(items: &[T]) -> Vec<String> {
        std::iter::once("All".to_string()).chain(items.iter().map(|i| i.to_string())).collect()
    }
    [
        ("Body Part", with_all(&BodyPart::ALL)),
        ("Difficulty", with_all(&Difficulty::ALL)),
        ("Type", with_all(&VideoType::ALL)),
    ]
}
