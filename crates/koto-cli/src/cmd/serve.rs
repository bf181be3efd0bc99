use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub fn run(config_path: &Path, port: u16) -> Result<()> {
    let orchestrator = Arc::new(super::build_orchestrator(config_path)?);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(koto_server::serve(orchestrator, port))
}
