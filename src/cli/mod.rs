use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{BodyPart, Difficulty, VideoFilter, VideoType};
use crate::config::Config;
use crate::profile::{DietPreference, ExerciseType, Goal};

#[derive(Parser, Debug)]
#[command(name = "jimbo", version, about = "AI fitness coach: training plans, diet plans and form feedback")]
pub struct Args {
    /// TOML config file; flags below override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, global = true, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a weekly training plan by chatting with the coach.
    Training(TrainingArgs),
    /// Generate a 7-day diet plan.
    Diet(DietArgs),
    /// Get feedback on exercise form from a photo or a video frame.
    Analyze(AnalyzeArgs),
    /// Browse the workout video library.
    Videos(VideoArgs),
    /// Weekly summary.
    Dashboard,
}

#[derive(ClapArgs, Debug)]
pub struct TrainingArgs {
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub height: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long, value_enum)]
    pub goal: Option<Goal>,
    #[arg(long)]
    pub days_per_week: Option<String>,
    #[arg(long)]
    pub minutes: Option<String>,
    /// Skip the details form and use the flags / defaults as-is.
    #[arg(long, default_value_t = false)]
    pub skip_form: bool,
    /// Scripted chat messages, sent in order instead of reading stdin.
    #[arg(long = "message", short = 'm')]
    pub messages: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DietArgs {
    #[arg(long, value_enum, default_value_t = Goal::FatLoss)]
    pub goal: Goal,
    #[arg(long, value_enum, default_value_t = DietPreference::HighProtein)]
    pub preference: DietPreference,
}

#[derive(ClapArgs, Debug)]
pub struct AnalyzeArgs {
    /// Image (jpg/png/webp) or video file.
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = ExerciseType::Squat)]
    pub exercise: ExerciseType,
    /// Offset into a video, in seconds, of the frame to analyze.
    #[arg(long, default_value_t = 0.0)]
    pub at: f64,
}

#[derive(ClapArgs, Debug)]
pub struct VideoArgs {
    #[arg(long, value_enum)]
    pub body_part: Option<BodyPart>,
    #[arg(long, value_enum)]
    pub difficulty: Option<Difficulty>,
    #[arg(long = "type", value_enum)]
    pub kind: Option<VideoType>,
}

impl VideoArgs {
    pub fn filter(&self) -> VideoFilter {
        VideoFilter { body_part: self.body_part, difficulty: self.difficulty, kind: self.kind }
    }
}

impl Args {
    /// Apply command-line overrides on top of a loaded config.
    pub fn overlay(&self, mut cfg: Config) -> Config {
        if let Some(m) = &self.model {
            cfg.model = m.clone();
        }
        if self.timeout_secs.is_some() {
            cfg.timeout_secs = self.timeout_secs;
        }
        cfg.save_request |= self.save_request;
        cfg.save_response |= self.save_response;
        cfg
    }
}
