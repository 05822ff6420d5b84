use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use super::{Commit, Outbound, Slot};
use crate::errors::CoachResult;
use crate::gateway::Gateway;
use crate::profile::ExerciseType;
use crate::prompt;
use crate::wire::InlineImage;

pub const FAILURE: &str = "Failed to analyze video. Please try again.";
pub const REQUIRED_HEADINGS: [&str; 2] = ["Positive Points", "Areas for Improvement"];

#[derive(Debug, Clone)]
pub struct SelectedFrame {
    pub label: String,
    pub image: InlineImage,
}

/// Form-analysis page: one selected frame, markdown feedback.
#[derive(Debug)]
pub struct AnalysisPage {
    pub exercise: ExerciseType,
    frame: Option<SelectedFrame>,
    feedback: Slot<String>,
}

impl Default for AnalysisPage {
    fn default() -> Self {
        Self { exercise: ExerciseType::default(), frame: None, feedback: Slot::new(FAILURE) }
    }
}

impl AnalysisPage {
    pub fn frame(&self) -> Option<&SelectedFrame> {
        self.frame.as_ref()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.result().map(String::as_str)
    }

    pub fn error(&self) -> Option<&str> {
        self.feedback.error()
    }

    pub fn is_loading(&self) -> bool {
        self.feedback.is_loading()
    }

    /// Replace the selected frame. Feedback and error for the old one are cleared,
    /// and an analysis still running for it is cancelled.
    pub fn select_frame(&mut self, label: impl Into<String>, image: InlineImage) {
        self.feedback.cancel();
        self.feedback.clear_result();
        self.feedback.clear_error();
        self.frame = Some(SelectedFrame { label: label.into(), image });
    }

    pub fn begin_analyze(&mut self) -> Option<Outbound> {
        let image = self.frame.as_ref()?.image.clone();
        let token = self.feedback.begin()?;
        Some(Outbound { prompt: prompt::form_analysis_prompt(self.exercise), image: Some(image), token })
    }

    pub fn finish_analyze(&mut self, out: &Outbound, outcome: CoachResult<String>) -> Commit {
        let commit = self.feedback.finish(&out.token, outcome);
        if commit == Commit::Stored {
            let missing = self.feedback().map(missing_headings).unwrap_or_default();
            if !missing.is_empty() {
                warn!(?missing, "feedback lacks expected headings");
            }
        }
        commit
    }

    pub async fn analyze(&mut self, gw: &Gateway) -> Option<Commit> {
        let out = self.begin_analyze()?;
        let outcome = gw.request_text("analysis", &out.prompt, out.image.clone()).await;
        Some(self.finish_analyze(&out, outcome))
    }

    pub fn leave(&mut self) {
        self.feedback.cancel();
    }
}

fn heading_text() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Markup, numbering, emoji and trailing colons around the words of a line.
    RE.get_or_init(|| Regex::new(r"^[^\p{L}]*(.*?)[^\p{L}]*$").ok()).as_ref()
}

/// Required headings that do not appear in `markdown`.
///
/// A heading counts when a line reads as the heading once surrounding
/// non-letters are stripped, so `## Positive Points`, `**Positive Points:**`
/// and `### 1. Positive Points` all match.
pub fn missing_headings(markdown: &str) -> Vec<&'static str> {
    let found: Vec<String> = match heading_text() {
        Some(re) => markdown
            .lines()
            .filter_map(|line| re.captures(line.trim()))
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_lowercase()))
            .filter(|t| !t.is_empty())
            .collect(),
        None => Vec::new(),
    };
    REQUIRED_HEADINGS
        .iter()
        .copied()
        .filter(|h| !found.iter().any(|f| f == &h.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoachError;

    fn page_with_frame() -> AnalysisPage {
        let mut p = AnalysisPage::default();
        p.select_frame("squat.jpg", InlineImage::jpeg("Zm9v"));
        p
    }

    #[test]
    fn analyze_requires_a_frame() {
        let mut p = AnalysisPage::default();
        assert!(p.begin_analyze().is_none());
        assert!(!p.is_loading());
    }

    #[test]
    fn outbound_carries_frame_and_exercise() {
        let mut p = page_with_frame();
        p.exercise = ExerciseType::PushUp;
        let out = p.begin_analyze().unwrap();
        assert_eq!(out.image.unwrap().data, "Zm9v");
        assert!(out.prompt.contains("form for a Push-up"));
    }

    #[test]
    fn reselecting_clears_feedback_error_and_pending() {
        let mut p = page_with_frame();
        let out = p.begin_analyze().unwrap();
        p.finish_analyze(&out, Ok("## Positive Points\nok".into()));
        let out = p.begin_analyze().unwrap();
        p.select_frame("deadlift.jpg", InlineImage::jpeg("YmFy"));
        assert!(p.feedback().is_none());
        assert!(p.error().is_none());
        assert!(!p.is_loading());
        assert_eq!(p.finish_analyze(&out, Ok("late".into())), Commit::Dropped);
        assert_eq!(p.frame().unwrap().label, "deadlift.jpg");
    }

    #[test]
    fn failure_keeps_prior_feedback() {
        let mut p = page_with_frame();
        let out = p.begin_analyze().unwrap();
        p.finish_analyze(&out, Ok("first".into()));
        let out = p.begin_analyze().unwrap();
        assert_eq!(p.finish_analyze(&out, Err(CoachError::Request("x".into()))), Commit::Failed);
        assert_eq!(p.feedback(), Some("first"));
        assert_eq!(p.error(), Some(FAILURE));
    }

    #[test]
    fn headings_detected_in_common_markdown_styles() {
        let md = "## Positive Points\n- depth\n\n**Areas for Improvement**\n- knees";
        assert!(missing_headings(md).is_empty());
        let md = "### positive points:\ntext";
        assert_eq!(missing_headings(md), vec!["Areas for Improvement"]);
        assert_eq!(missing_headings("just prose"), REQUIRED_HEADINGS.to_vec());
    }

    #[test]
    fn colon_inside_bold_still_counts() {
        let md = "**Positive Points:**\n- good depth\n\n**Areas for Improvement:**\n- knees cave";
        assert!(missing_headings(md).is_empty());
    }

    #[test]
    fn numbered_and_emoji_prefixes_still_count() {
        let md = "### 1. Positive Points\n- depth\n### ✅ Areas for Improvement\n- knees";
        assert!(missing_headings(md).is_empty());
        let md = "#### 2) areas for improvement 🔧\n- elbows";
        assert_eq!(missing_headings(md), vec!["Positive Points"]);
    }

    #[test]
    fn heading_words_inside_prose_do_not_count() {
        let md = "Your positive points are many, and areas for improvement are few.";
        assert_eq!(missing_headings(md), REQUIRED_HEADINGS.to_vec());
    }
}
