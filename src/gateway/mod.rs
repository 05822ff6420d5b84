//! Boundary between page state and the hosted model.
//!
//! One network call per invocation. No retry, no caching; a failure is handed
//! straight back to the caller.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{CoachError, CoachResult};
use crate::log;
use crate::provider::DynProvider;
use crate::schema::ResponseSchema;
use crate::wire::{InlineImage, ModelReply, ModelRequest};

#[derive(Clone)]
pub struct Gateway {
    provider: DynProvider,
    cfg: Config,
}

impl Gateway {
    pub fn new(provider: DynProvider, cfg: Config) -> Self {
        Self { provider, cfg }
    }

    /// Ask for JSON constrained to `schema` and parse it into `T`.
    ///
    /// A body that is not JSON, or that misses required fields / has the wrong
    /// primitive types, is a [`CoachError::Parse`]; no repair is attempted.
    pub async fn request_structured<T: DeserializeOwned>(
        &self,
        stage: &str,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> CoachResult<T> {
        let req = ModelRequest::structured(prompt, schema.clone());
        let body = self.exchange(stage, &req).await?;
        parse_structured(&body, schema)
    }

    /// Free-text (markdown) request, optionally with one still frame.
    pub async fn request_text(
        &self,
        stage: &str,
        prompt: &str,
        image: Option<InlineImage>,
    ) -> CoachResult<String> {
        let req = ModelRequest::text(prompt, image);
        self.exchange(stage, &req).await
    }

    async fn exchange(&self, stage: &str, req: &ModelRequest) -> CoachResult<String> {
        debug!(stage, provider = self.provider.name(), prompt_bytes = req.prompt.len(), "dispatching");
        let result = self.provider.send(req).await;
        let reply = result.as_ref().ok().map(|body| ModelReply {
            mode: req.mode,
            transaction: req.transaction.clone(),
            body: body.clone(),
        });
        if let Err(e) = log::save_stage(stage, req, reply.as_ref(), &self.cfg) {
            warn!(stage, error = %e, "could not save exchange artifacts");
        }
        result
    }
}

pub fn parse_structured<T: DeserializeOwned>(body: &str, schema: &ResponseSchema) -> CoachResult<T> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| CoachError::Parse(format!("model reply is not JSON: {e}")))?;
    let violations = schema.validate(&value);
    if !violations.is_empty() {
        let joined = violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ");
        return Err(CoachError::Parse(format!("reply does not match schema: {joined}")));
    }
    serde_json::from_value(value).map_err(|e| CoachError::Parse(format!("reply shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DietPlan, TrainingPlan};
    use crate::provider::Provider;
    use crate::schema;
    use crate::wire::Mode;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Canned {
        body: CoachResult<String>,
        seen: Mutex<Vec<ModelRequest>>,
    }

    impl Canned {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self { body: Ok(body.into()), seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl Provider for Canned {
        async fn send(&self, req: &ModelRequest) -> CoachResult<String> {
            self.seen.lock().unwrap().push(req.clone());
            match &self.body {
                Ok(b) => Ok(b.clone()),
                Err(e) => Err(CoachError::Request(e.to_string())),
            }
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn gateway(p: Arc<Canned>) -> Gateway {
        Gateway::new(p, Config::default())
    }

    #[tokio::test]
    async fn structured_reply_round_trips_required_fields() {
        let body = r#"{"weekly_plan":[{"day":"Monday","focus":"Push","exercises":[{"name":"Bench","sets":"3","reps":"8-12","rest":"90s"}]}]}"#;
        let p = Canned::ok(body);
        let plan: TrainingPlan = gateway(p.clone())
            .request_structured("training", "prompt", &schema::training_plan_schema())
            .await
            .unwrap();
        assert_eq!(plan.weekly_plan[0].exercises[0].reps, "8-12");

        let value = serde_json::to_value(&plan).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, schema::training_plan_schema().required_fields());

        let seen = p.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mode, Mode::Structured);
        assert!(seen[0].schema.is_some());
    }

    #[tokio::test]
    async fn non_json_reply_is_parse_error() {
        let p = Canned::ok("Sure! Here's your plan: ...");
        let err = gateway(p)
            .request_structured::<DietPlan>("diet", "prompt", &schema::diet_plan_schema())
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Parse(ref m) if m.contains("not JSON")));
    }

    #[tokio::test]
    async fn schema_mismatch_is_parse_error() {
        let p = Canned::ok(r#"{"diet_plan":[{"day":"Monday","meals":[]}]}"#);
        let err = gateway(p)
            .request_structured::<DietPlan>("diet", "prompt", &schema::diet_plan_schema())
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Parse(ref m) if m.contains("total_calories")));
    }

    #[tokio::test]
    async fn text_request_forwards_image_and_returns_body() {
        let p = Canned::ok("## Positive Points\n- good depth");
        let out = gateway(p.clone())
            .request_text("analysis", "look", Some(InlineImage::jpeg("Zm9v")))
            .await
            .unwrap();
        assert!(out.starts_with("## Positive Points"));
        let seen = p.seen.lock().unwrap();
        assert_eq!(seen[0].mode, Mode::Text);
        assert_eq!(seen[0].image.as_ref().unwrap().data, "Zm9v");
    }

    #[tokio::test]
    async fn provider_failure_surfaces_once_without_retry() {
        let p = Arc::new(Canned {
            body: Err(CoachError::Request("boom".into())),
            seen: Mutex::new(Vec::new()),
        });
        let err = gateway(p.clone()).request_text("analysis", "x", None).await.unwrap_err();
        assert!(matches!(err, CoachError::Request(_)));
        assert_eq!(p.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn fenced_json_is_not_repaired() {
        let err = parse_structured::<TrainingPlan>(
            "```json\n{\"weekly_plan\":[]}\n```",
            &schema::training_plan_schema(),
        )
        .unwrap_err();
        assert!(matches!(err, CoachError::Parse(_)));
    }
}
