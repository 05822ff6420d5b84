use crate::config::Config;
use crate::wire::{ModelReply, ModelRequest};
use fs_err as fs;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Install the stderr subscriber. `RUST_LOG` wins over `level`; `debug` forces debug.
pub fn init_tracing(level: &str, debug: bool) {
    let fallback = if debug { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Persist one gateway exchange under `<artifacts_dir>/tx/<id>/`.
/// Returns `None` when both save flags are off.
pub fn save_stage(
    stage: &str,
    req: &ModelRequest,
    reply: Option<&ModelReply>,
    cfg: &Config,
) -> anyhow::Result<Option<SavedPaths>> {
    if !cfg.save_request && !cfg.save_response {
        return Ok(None);
    }
    let dir = tx_dir(Path::new(&cfg.artifacts_dir), req.transaction.id);
    fs::create_dir_all(&dir)?;

    let mut request_path = None;
    let mut response_path = None;

    if cfg.save_request {
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(&req.redacted())?)?;
        request_path = Some(p);
    }

    if let (true, Some(reply)) = (cfg.save_response, reply) {
        let p = dir.join(format!("{stage}.response.json"));
        fs::write(&p, to_string_pretty(reply)?)?;
        response_path = Some(p);
    }

    tracing::debug!(stage, dir = %dir.display(), "saved exchange artifacts");
    Ok(Some(SavedPaths { dir, request: request_path, response: response_path }))
}
