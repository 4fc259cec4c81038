//! Stack resource discovery.

use cloud_ports::{PortResult, StackResource, StackResources};
use tracing::info;

use crate::pagination::fetch_all_pages;

/// List every resource of `stack_id`, draining all pages.
pub async fn list_stack_resources(
    lister: &dyn StackResources,
    stack_id: &str,
) -> PortResult<Vec<StackResource>> {
    info!(stack_id = %stack_id, "listing stack resources");
    let resources = fetch_all_pages(|token: Option<String>| async move {
        lister.list_stack_resources(stack_id, token.as_deref()).await
    })
    .await?;
    info!(stack_id = %stack_id, count = resources.len(), "stack resources listed");
    Ok(resources)
}
