use anyhow::Context;
use clap::Parser;
use std::future::Future;
use tracing::info;

use jimbo_coach::cli::{self, AnalyzeArgs, Command, DietArgs, TrainingArgs};
use jimbo_coach::config::Config;
use jimbo_coach::errors::{CoachError, CoachResult};
use jimbo_coach::plan::{self, TrainingPlan};
use jimbo_coach::profile::DietForm;
use jimbo_coach::state::{analysis, AnalysisPage, Commit, DietPage, Outbound, TrainingSession};
use jimbo_coach::ux::{Console, LeaveSignal};
use jimbo_coach::{frame, log, provider, schema, ux, Gateway};

/// Await `fut` unless the user leaves first, in which case the request's
/// token is cancelled and its reply will never be committed.
async fn await_or_leave<T, F>(leave: &LeaveSignal, out: &Outbound, fut: F) -> CoachResult<T>
where
    F: Future<Output = CoachResult<T>>,
{
    match leave.unless_left(fut).await {
        Some(r) => r,
        None => {
            out.token.cancel();
            Err(CoachError::Cancelled)
        }
    }
}

async fn run_training(gw: &Gateway, leave: &LeaveSignal, args: TrainingArgs) -> anyhow::Result<()> {
    let mut session = TrainingSession::default();
    session
        .update_profile(|p| {
            if let Some(v) = args.weight {
                p.weight = v;
            }
            if let Some(v) = args.height {
                p.height = v;
            }
            if let Some(v) = args.age {
                p.age = v;
            }
            if let Some(v) = args.goal {
                p.goal = v;
            }
            if let Some(v) = args.days_per_week {
                p.days_per_week = v;
            }
            if let Some(v) = args.minutes {
                p.minutes_per_session = v;
            }
        })
        .context("updating details")?;

    let scripted = !args.messages.is_empty();
    let mut console = if scripted { Console::scripted(args.messages) } else { Console::stdin() };
    print!("{}", ux::header("Personalized Training Plan", "Let's build the perfect workout plan for you."));

    if !scripted && !args.skip_form {
        let current = session.profile().clone();
        match leave.unless_left(ux::edit_profile(&mut console, &current)).await {
            Some(Some(edited)) => session.update_profile(|p| *p = edited).context("updating details")?,
            Some(None) | None => return Ok(()),
        }
    }

    session.submit_details();
    for t in session.transcript() {
        println!("{}", ux::render_turn(t));
    }

    loop {
        let line = match leave.unless_left(console.read_line("> ")).await {
            None => {
                info!("left the training page");
                break;
            }
            Some(None) => break,
            Some(Some(l)) if l.trim() == "/quit" => break,
            Some(Some(l)) => l,
        };

        let Some(out) = session.begin_send(&line) else { continue };
        let pb = ux::spinner("Jimbo is thinking...");
        let outcome: CoachResult<TrainingPlan> = await_or_leave(
            leave,
            &out,
            gw.request_structured("training", &out.prompt, &schema::training_plan_schema()),
        )
        .await;
        pb.finish_and_clear();

        let commit = session.finish_send(&out, outcome);
        if commit == Commit::Dropped {
            info!("training request cancelled");
            break;
        }
        if let Some(t) = session.transcript().last() {
            println!("{}", ux::render_turn(t));
        }
        if commit == Commit::Stored {
            if let Some(p) = session.plan() {
                for w in plan::audit_training(p) {
                    tracing::warn!(warning = %w, "training plan shape");
                }
                print!("{}", ux::render_training_plan(p));
            }
        }
    }
    session.leave();
    Ok(())
}

async fn run_diet(gw: &Gateway, leave: &LeaveSignal, args: DietArgs) -> anyhow::Result<()> {
    let mut page = DietPage::new(DietForm { goal: args.goal, preference: args.preference });
    let Some(out) = page.begin_submit() else { return Ok(()) };
    let pb = ux::spinner("Generating your personalized diet plan...");
    let outcome =
        await_or_leave(leave, &out, gw.request_structured("diet", &out.prompt, &schema::diet_plan_schema())).await;
    pb.finish_and_clear();

    match page.finish_submit(&out, outcome) {
        Commit::Stored => {
            if let Some(p) = page.plan() {
                print!("{}", ux::render_diet_plan(p, page.warnings()));
            }
        }
        Commit::Failed => println!("{}", ux::error_line(page.error().unwrap_or_default())),
        Commit::Dropped => info!("diet request cancelled"),
    }
    Ok(())
}

async fn run_analyze(gw: &Gateway, leave: &LeaveSignal, args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut page = AnalysisPage::default();
    page.exercise = args.exercise;
    let image = frame::load_frame(&args.file, args.at)
        .await
        .with_context(|| format!("loading frame from {}", args.file.display()))?;
    page.select_frame(args.file.display().to_string(), image);

    let Some(out) = page.begin_analyze() else { return Ok(()) };
    let pb = ux::spinner("Analyzing...");
    let outcome = await_or_leave(leave, &out, gw.request_text("analysis", &out.prompt, out.image.clone())).await;
    pb.finish_and_clear();

    match page.finish_analyze(&out, outcome) {
        Commit::Stored => {
            if let Some(md) = page.feedback() {
                print!("{}", ux::render_feedback(md, &analysis::missing_headings(md)));
            }
        }
        Commit::Failed => println!("{}", ux::error_line(page.error().unwrap_or_default())),
        Commit::Dropped => info!("analysis request cancelled"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let cfg = args.overlay(Config::load(args.config.as_deref())?);
    log::init_tracing(&cfg.log_level, args.debug);

    // The credential is checked before anything else runs, whatever the command.
    let api_key = cfg.api_key()?;
    let gw = Gateway::new(provider::make_provider(&cfg, api_key)?, cfg.clone());

    match args.command {
        Command::Training(t) => run_training(&gw, &LeaveSignal::ctrl_c(), t).await,
        Command::Diet(d) => run_diet(&gw, &LeaveSignal::ctrl_c(), d).await,
        Command::Analyze(a) => run_analyze(&gw, &LeaveSignal::ctrl_c(), a).await,
        Command::Videos(v) => {
            print!("{}", ux::render_library(&v.filter()));
            Ok(())
        }
        Command::Dashboard => {
            print!("{}", ux::render_dashboard());
            Ok(())
        }
    }
}
