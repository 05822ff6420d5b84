use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::CoachResult;
use crate::wire::ModelRequest;

pub mod gemini;

/// Sends one request to a hosted model and returns its raw text body.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn send(&self, req: &ModelRequest) -> CoachResult<String>;

    fn name(&self) -> &'static str;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(cfg: &Config, api_key: String) -> CoachResult<DynProvider> {
    let p = gemini::GeminiProvider::new(api_key, cfg.model.clone(), cfg.api_base.clone(), cfg.timeout_secs)?;
    Ok(Arc::new(p))
}
