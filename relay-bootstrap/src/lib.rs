pub mod context;
pub mod lifecycle;

pub use lifecycle::{build_router_with_layers, run_standalone, serve};

pub async fn run() -> anyhow::Result<()> {
    run_standalone().await
}
