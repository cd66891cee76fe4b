//! Atelier Server Binary
//!
//! Standalone entry point - delegates to lib.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = atelier_core::load_config(&cwd)?;

    atelier_server::run_server(config).await
}
