use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

use crate::catalog::progress::{peak_week, PROGRESS_DATA, STAT_CARDS};
use crate::catalog::{self, VideoFilter, WorkoutVideo};
use crate::plan::{DailyDiet, DailyWorkout, DietPlan, TrainingPlan};
use crate::profile::{Goal, UserProfile};
use crate::state::{ConversationTurn, Role};

const BAR_WIDTH: usize = 30;

pub fn header(title: &str, subtitle: &str) -> String {
    format!("\n{}\n{}\n", title.bold(), subtitle.dimmed())
}

pub fn render_workout_day(d: &DailyWorkout) -> String {
    let mut out = format!("{} - {}\n", d.day.green().bold(), d.focus);
    if d.is_rest_day() {
        out.push_str(&format!("  {}\n", "Rest Day".dimmed()));
        return out;
    }
    for ex in &d.exercises {
        out.push_str(&format!(
            "  {}  Sets: {}  Reps: {}  Rest: {}\n",
            ex.name.bold(),
            ex.sets,
            ex.reps,
            ex.rest
        ));
    }
    out
}

pub fn render_training_plan(plan: &TrainingPlan) -> String {
    let mut out = header("Your Weekly Plan", "One card per day.");
    for d in &plan.weekly_plan {
        out.push('\n');
        out.push_str(&render_workout_day(d));
    }
    out
}

pub fn render_diet_day(d: &DailyDiet) -> String {
    let mut out = format!("{}  {} kcal\n", d.day.green().bold(), d.total_calories);
    for m in &d.meals {
        out.push_str(&format!("  {}: {} ({} kcal)\n", m.meal_type.bold(), m.description, m.calories));
    }
    out
}

pub fn render_diet_plan(plan: &DietPlan, warnings: &[String]) -> String {
    let mut out = header("Your Weekly Diet Plan", "Meals and estimated calories per day.");
    for d in &plan.diet_plan {
        out.push('\n');
        out.push_str(&render_diet_day(d));
    }
    if !warnings.is_empty() {
        out.push_str(&format!("\n{}\n", "Calorie check:".yellow().bold()));
        for w in warnings {
            out.push_str(&format!(" - {}\n", w));
        }
    }
    out
}

pub fn render_turn(t: &ConversationTurn) -> String {
    match t.role {
        Role::User => format!("{} {}", "you  >".cyan().bold(), t.text),
        Role::Model => format!("{} {}", "jimbo>".green().bold(), t.text),
    }
}

pub fn render_video(v: &WorkoutVideo) -> String {
    format!(
        "#{:<3} {}\n      {} | {} | {}\n      {}",
        v.id,
        v.title.bold(),
        v.body_part,
        v.difficulty,
        v.kind,
        v.thumbnail.dimmed()
    )
}

pub fn render_library(filter: &VideoFilter) -> String {
    let mut out = header("Video Library", "Find the perfect workout video.");
    let active = [
        filter.body_part.map(|b| b.to_string()),
        filter.difficulty.map(|d| d.to_string()),
        filter.kind.map(|k| k.to_string()),
    ];
    for ((label, options), current) in catalog::filter_options().iter().zip(active.iter()) {
        let current = current.as_deref().unwrap_or("All");
        let rendered: Vec<String> = options
            .iter()
            .map(|o| if o == current { format!("[{}]", o).green().bold().to_string() } else { o.clone() })
            .collect();
        out.push_str(&format!("{:<11} {}\n", format!("{label}:"), rendered.join("  ")));
    }
    let videos = catalog::filter_catalog(filter);
    out.push_str(&format!("\n{} videos\n", videos.len()));
    for v in videos {
        out.push('\n');
        out.push_str(&render_video(v));
        out.push('\n');
    }
    out
}

pub fn render_feedback(markdown: &str, missing: &[&str]) -> String {
    let mut out = header("AI Feedback", "Form analysis for the selected frame.");
    out.push('\n');
    out.push_str(markdown.trim_end());
    out.push('\n');
    if !missing.is_empty() {
        out.push_str(&format!("\n{} {}\n", "note: feedback is missing".yellow(), missing.join(", ")));
    }
    out
}

pub fn render_dashboard() -> String {
    let mut out = header("Dashboard", "Welcome back! Here's your fitness summary.");
    out.push('\n');
    for c in &STAT_CARDS {
        out.push_str(&format!("{} {:<20} {}\n", c.icon, c.title, c.value.bold()));
    }
    out.push_str(&format!("\n{}\n", "Weekly Workout Progress".bold()));
    let peak = peak_week();
    let max = peak.map_or(1, |w| w.workouts).max(1) as usize;
    for w in PROGRESS_DATA.iter() {
        let len = w.workouts as usize * BAR_WIDTH / max;
        let best = if peak == Some(w) { format!("  {}", "best week".yellow()) } else { String::new() };
        out.push_str(&format!("{:<7} {} {}{}\n", w.week, "█".repeat(len).green(), w.workouts, best));
    }
    out
}

pub fn error_line(msg: &str) -> String {
    msg.red().to_string()
}

/// Line source for the interactive prompts.
///
/// Stdin is read on its own thread and handed over a channel, so a prompt can
/// be raced against [`LeaveSignal`]. The thread is never joined; it ends with
/// the process.
#[derive(Debug)]
pub struct Console {
    lines: mpsc::UnboundedReceiver<String>,
    echo: bool,
}

impl Console {
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines: rx, echo: false }
    }

    /// Fixed answers, echoed after their prompt. EOF after the last one.
    pub fn scripted<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, mut console) = Self::channel();
        for a in answers {
            let _ = tx.send(a.into());
        }
        console.echo = true;
        console
    }

    /// Console fed by the returned sender; EOF once the sender is dropped.
    pub fn channel() -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { lines: rx, echo: false })
    }

    /// Print `prompt` and wait for the next line. `None` on EOF.
    pub async fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let line = self.lines.recv().await?;
        if self.echo {
            println!("{}", line);
        }
        Some(line.trim_end_matches('\r').to_string())
    }

    /// Ask with a default; an empty answer keeps `current`.
    pub async fn ask(&mut self, label: &str, current: &str) -> Option<String> {
        let ans = self.read_line(&format!("{} [{}]: ", label, current)).await?;
        let ans = ans.trim();
        Some(if ans.is_empty() { current.to_string() } else { ans.to_string() })
    }
}

/// Ctrl-C, read as "leave the page".
///
/// One listener runs for the whole command. Presses are kept as a pending
/// permit, so a press while nothing is racing the signal is seen by the next
/// [`LeaveSignal::unless_left`].
#[derive(Debug, Clone, Default)]
pub struct LeaveSignal(Arc<Notify>);

impl LeaveSignal {
    /// Install the process-wide Ctrl-C listener. Needs a running runtime.
    pub fn ctrl_c() -> Self {
        let signal = Self::default();
        let notify = signal.0.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                notify.notify_one();
            }
        });
        signal
    }

    pub fn trigger(&self) {
        self.0.notify_one();
    }

    /// Run `fut` to completion unless the user leaves first (`None`).
    pub async fn unless_left<F: Future>(&self, fut: F) -> Option<F::Output> {
        // A pending press wins over an already-finished future.
        tokio::select! {
            biased;
            _ = self.0.notified() => None,
            v = fut => Some(v),
        }
    }
}

/// Details form. Every field is offered with its current value; `None` on EOF.
pub async fn edit_profile(console: &mut Console, current: &UserProfile) -> Option<UserProfile> {
    let mut p = current.clone();
    p.weight = console.ask("Weight (kg)", &p.weight).await?;
    p.height = console.ask("Height (cm)", &p.height).await?;
    p.age = console.ask("Age", &p.age).await?;
    loop {
        let ans = console.ask("Primary goal (fat-loss, muscle-gain, maintenance)", &p.goal.choice_name()).await?;
        match Goal::parse_choice(&ans) {
            Some(g) => {
                p.goal = g;
                break;
            }
            None => println!("{}", error_line(&format!("unknown goal: {ans}"))),
        }
    }
    p.days_per_week = console.ask("Days per week", &p.days_per_week).await?;
    p.minutes_per_session = console.ask("Time per day (min)", &p.minutes_per_session).await?;
    Some(p)
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
