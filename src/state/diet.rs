use tracing::warn;

use super::{Commit, Outbound, Slot};
use crate::errors::CoachResult;
use crate::gateway::Gateway;
use crate::plan::{self, DietPlan};
use crate::profile::DietForm;
use crate::prompt;
use crate::schema;

pub const FAILURE: &str = "Failed to generate diet plan. Please try again.";

/// Diet page: one submit, one call, newest good plan wins.
#[derive(Debug)]
pub struct DietPage {
    pub form: DietForm,
    plan: Slot<DietPlan>,
    warnings: Vec<String>,
}

impl Default for DietPage {
    fn default() -> Self {
        Self::new(DietForm::default())
    }
}

impl DietPage {
    pub fn new(form: DietForm) -> Self {
        Self { form, plan: Slot::new(FAILURE), warnings: Vec::new() }
    }

    pub fn plan(&self) -> Option<&DietPlan> {
        self.plan.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.plan.error()
    }

    pub fn is_loading(&self) -> bool {
        self.plan.is_loading()
    }

    /// Calorie audit of the current plan.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn begin_submit(&mut self) -> Option<Outbound> {
        let token = self.plan.begin()?;
        Some(Outbound { prompt: prompt::diet_prompt(&self.form), image: None, token })
    }

    pub fn finish_submit(&mut self, out: &Outbound, outcome: CoachResult<DietPlan>) -> Commit {
        let commit = self.plan.finish(&out.token, outcome);
        if commit == Commit::Stored {
            self.warnings = self.plan.result().map(plan::audit_diet).unwrap_or_default();
            for w in &self.warnings {
                warn!(warning = %w, "diet plan calorie mismatch");
            }
        }
        commit
    }

    pub async fn submit(&mut self, gw: &Gateway) -> Option<Commit> {
        let out = self.begin_submit()?;
        let outcome = gw.request_structured("diet", &out.prompt, &schema::diet_plan_schema()).await;
        Some(self.finish_submit(&out, outcome))
    }

    pub fn leave(&mut self) {
        self.plan.cancel();
    }
}
