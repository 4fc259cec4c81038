//! Policy-compliance scoring for one resource.

use cloud_ports::{
    ComplianceEvaluations, ComplianceQuery, EvaluationResult, PortResult, StackResource,
};
use tracing::info;

use crate::domain::CheckOutcome;
use crate::pagination::fetch_all_pages;

/// Fetch every `COMPLIANT` evaluation recorded for `resource`.
pub async fn compliant_evaluations(
    evaluations: &dyn ComplianceEvaluations,
    resource: &StackResource,
) -> PortResult<Vec<EvaluationResult>> {
    let query = ComplianceQuery::compliant_only(&resource.resource_type, &resource.resource_id);
    let query = &query;
    fetch_all_pages(|token: Option<String>| async move {
        evaluations
            .compliance_details(query, token.as_deref())
            .await
    })
    .await
}

/// Score `resource` at `weight` points per compliant rule.
///
/// Query failures are not handled here; they abort the gate.
pub async fn check_compliance(
    evaluations: &dyn ComplianceEvaluations,
    resource: &StackResource,
    weight: u64,
) -> PortResult<CheckOutcome> {
    info!(
        resource_type = %resource.resource_type,
        resource_id = %resource.resource_id,
        "checking rule compliance"
    );
    let compliant = compliant_evaluations(evaluations, resource).await?;
    let count = compliant.len() as u64;
    info!(
        resource_type = %resource.resource_type,
        resource_id = %resource.resource_id,
        compliant_rules = count,
        "resource compliance evaluated"
    );
    Ok(CheckOutcome::scored(weight.saturating_mul(count)))
}
