use thiserror::Error;
use tracing::info;

use super::{Commit, ConversationTurn, Outbound, Slot};
use crate::errors::CoachResult;
use crate::gateway::Gateway;
use crate::plan::TrainingPlan;
use crate::profile::UserProfile;
use crate::prompt;
use crate::schema;

pub const GREETING: &str =
    "Great! I've got your details. Just hit send to generate your first plan, or add any other requirements you have.";
pub const PLAN_READY: &str = "Here is your updated plan! Let me know if you want any more adjustments.";
pub const FAILURE: &str = "Sorry, I had trouble generating the plan. Please try rephrasing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CollectingDetails,
    AwaitingFirstSend,
    Chatting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("details are locked once the conversation has started")]
    FieldsLocked,
}

/// Training page: details form, then a chat that regenerates the plan.
#[derive(Debug)]
pub struct TrainingSession {
    phase: Phase,
    profile: UserProfile,
    transcript: Vec<ConversationTurn>,
    plan: Slot<TrainingPlan>,
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self::new(UserProfile::default())
    }
}

impl TrainingSession {
    pub fn new(profile: UserProfile) -> Self {
        Self { phase: Phase::CollectingDetails, profile, transcript: Vec::new(), plan: Slot::new(FAILURE) }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn plan(&self) -> Option<&TrainingPlan> {
        self.plan.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.plan.error()
    }

    pub fn is_loading(&self) -> bool {
        self.plan.is_loading()
    }

    pub fn update_profile<F>(&mut self, edit: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut UserProfile),
    {
        if self.phase != Phase::CollectingDetails {
            return Err(FormError::FieldsLocked);
        }
        edit(&mut self.profile);
        Ok(())
    }

    /// Lock the details and open the chat. Only the first call has an effect.
    pub fn submit_details(&mut self) -> bool {
        if self.phase != Phase::CollectingDetails {
            return false;
        }
        self.phase = Phase::AwaitingFirstSend;
        self.transcript = vec![ConversationTurn::model(GREETING)];
        info!(goal = %self.profile.goal, "training details submitted");
        true
    }

    /// Append the user's message and build the prompt for it.
    ///
    /// `None` when the details are not submitted yet, the text is blank, or a
    /// reply is still pending; the transcript is left unchanged in that case.
    pub fn begin_send(&mut self, text: &str) -> Option<Outbound> {
        if self.phase == Phase::CollectingDetails || text.trim().is_empty() || self.plan.is_loading() {
            return None;
        }
        let token = self.plan.begin()?;
        self.transcript.push(ConversationTurn::user(text));
        self.phase = Phase::Chatting;
        Some(Outbound {
            prompt: prompt::training_prompt(&self.profile, &self.transcript),
            image: None,
            token,
        })
    }

    pub fn finish_send(&mut self, out: &Outbound, outcome: CoachResult<TrainingPlan>) -> Commit {
        let commit = self.plan.finish(&out.token, outcome);
        match commit {
            Commit::Stored => self.transcript.push(ConversationTurn::model(PLAN_READY)),
            Commit::Failed => self.transcript.push(ConversationTurn::model(FAILURE)),
            Commit::Dropped => {}
        }
        commit
    }

    /// Send one chat message through `gw` and commit the reply.
    pub async fn send(&mut self, gw: &Gateway, text: &str) -> Option<Commit> {
        let out = self.begin_send(text)?;
        let outcome = gw
            .request_structured("training", &out.prompt, &schema::training_plan_schema())
            .await;
        Some(self.finish_send(&out, outcome))
    }

    /// Leaving the page: any in-flight reply will be dropped.
    pub fn leave(&mut self) {
        self.plan.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoachError;
    use crate::plan::DailyWorkout;
    use crate::state::Role;

    fn plan(focus: &str) -> TrainingPlan {
        TrainingPlan {
            weekly_plan: vec![DailyWorkout { day: "Monday".into(), focus: focus.into(), exercises: vec![] }],
        }
    }

    fn started() -> TrainingSession {
        let mut s = TrainingSession::default();
        assert!(s.submit_details());
        s
    }

    #[test]
    fn submit_transitions_exactly_once_and_locks_fields() {
        let mut s = TrainingSession::default();
        assert_eq!(s.phase(), Phase::CollectingDetails);
        s.update_profile(|p| p.age = "35".into()).unwrap();
        assert!(s.submit_details());
        assert_eq!(s.phase(), Phase::AwaitingFirstSend);
        assert!(!s.submit_details());
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.update_profile(|p| p.age = "99".into()), Err(FormError::FieldsLocked));
        assert_eq!(s.profile().age, "35");
    }

    #[test]
    fn chat_before_submit_is_ignored() {
        let mut s = TrainingSession::default();
        assert!(s.begin_send("hello").is_none());
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn blank_message_makes_no_call_and_no_turn() {
        let mut s = started();
        assert!(s.begin_send("").is_none());
        assert!(s.begin_send("   \n\t").is_none());
        assert_eq!(s.transcript().len(), 1);
        assert!(!s.is_loading());
    }

    #[test]
    fn send_appends_user_turn_then_model_turn() {
        let mut s = started();
        let out = s.begin_send("make it 3 days").unwrap();
        assert_eq!(s.phase(), Phase::Chatting);
        assert_eq!(s.transcript().last().unwrap(), &ConversationTurn::user("make it 3 days"));
        assert!(out.prompt.contains("- make it 3 days"));
        assert!(!out.prompt.contains(GREETING));
        assert_eq!(s.finish_send(&out, Ok(plan("Legs"))), Commit::Stored);
        assert_eq!(s.transcript().last().unwrap().text, PLAN_READY);
        assert_eq!(s.plan().unwrap().weekly_plan[0].focus, "Legs");
    }

    #[test]
    fn second_send_while_loading_is_ignored() {
        let mut s = started();
        let _out = s.begin_send("one").unwrap();
        assert!(s.begin_send("two").is_none());
        assert_eq!(s.transcript().iter().filter(|t| t.role == Role::User).count(), 1);
    }

    #[test]
    fn failure_appends_error_turn_and_keeps_plan() {
        let mut s = started();
        let out = s.begin_send("first").unwrap();
        s.finish_send(&out, Ok(plan("Push")));
        let out = s.begin_send("second").unwrap();
        assert_eq!(s.finish_send(&out, Err(CoachError::Parse("junk".into()))), Commit::Failed);
        assert_eq!(s.error(), Some(FAILURE));
        assert_eq!(s.transcript().last().unwrap(), &ConversationTurn::model(FAILURE));
        assert_eq!(s.plan().unwrap().weekly_plan[0].focus, "Push");
    }

    #[test]
    fn reply_after_leaving_is_not_committed() {
        let mut s = started();
        let out = s.begin_send("hi").unwrap();
        s.leave();
        assert_eq!(s.finish_send(&out, Ok(plan("Legs"))), Commit::Dropped);
        assert!(s.plan().is_none());
        assert_eq!(s.transcript().last().unwrap().role, Role::User);
    }

    #[test]
    fn history_accumulates_user_turns_only() {
        let mut s = started();
        let out = s.begin_send("a").unwrap();
        s.finish_send(&out, Ok(plan("x")));
        let out = s.begin_send("b").unwrap();
        assert!(out.prompt.ends_with("- a\n- b"));
        assert!(!out.prompt.contains(PLAN_READY));
    }
}
