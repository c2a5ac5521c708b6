use crate::AppState;
use relay_domain::RegistrySnapshot;

pub async fn get_connection_snapshot(state: &AppState) -> RegistrySnapshot {
    let summaries = state.registry.snapshot().await;
    RegistrySnapshot::from_summaries(&summaries)
}
