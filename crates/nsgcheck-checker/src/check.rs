use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use nsgcheck_azure::{SecurityGroupReader, SubnetReader};
use nsgcheck_config::OutputBindings;
use nsgcheck_domain::{
    extract_subnet_name, Pairing, ResourceGroupName, SecurityGroupName, VnetName,
};
use nsgcheck_terraform::OutputSource;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CheckError;
use crate::report::{CheckOutcome, CheckReport, SubnetCheck};

// ── AssociationChecker ────────────────────────────────────────────────────────

/// Verifies that a deployed network security group is attached to the
/// expected subnets. Resource names come from deployment outputs; live
/// state comes from the injected readers. Purely read-only.
pub struct AssociationChecker {
    security_groups: Arc<dyn SecurityGroupReader>,
    subnets: Arc<dyn SubnetReader>,
    bindings: OutputBindings,
    pairing: Pairing,
}

impl AssociationChecker {
    pub fn new(
        security_groups: Arc<dyn SecurityGroupReader>,
        subnets: Arc<dyn SubnetReader>,
    ) -> Self {
        Self {
            security_groups,
            subnets,
            bindings: OutputBindings::default(),
            pairing: Pairing::Product,
        }
    }

    pub fn with_bindings(mut self, bindings: OutputBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Run the check. Sequential, no retries: any fetch failure (including
    /// "resource does not exist") aborts the run with no partial report.
    /// A subnet with no association is a failed sub-check, not an abort —
    /// remaining combinations still run.
    pub async fn run(&self, outputs: &dyn OutputSource) -> Result<CheckReport, CheckError> {
        let started_at = Utc::now();

        let resource_group =
            ResourceGroupName::parse(&outputs.value(&self.bindings.resource_group)?)?;
        let nsg_name = SecurityGroupName::parse(&outputs.value(&self.bindings.security_group)?)?;
        let vnets = outputs.map(&self.bindings.vnet_names)?;
        let subnet_entries = outputs.map(&self.bindings.vnet_subnets)?;

        let nsg = self
            .security_groups
            .get_security_group(&resource_group, &nsg_name)
            .await?;
        info!(
            nsg = %nsg.name, resource_group = %resource_group,
            "security group exists"
        );

        let mut checks = Vec::new();
        for (vnet_id, subnet_raw) in combinations(&vnets, &subnet_entries, self.pairing) {
            let vnet = VnetName::new(vnet_id);
            let subnet = extract_subnet_name(&subnet_raw);

            let record = self.subnets.get_subnet(&resource_group, &vnet, &subnet).await?;

            let name = format!("{}/{}", vnet, subnet);
            let outcome = match record.network_security_group {
                Some(nsg_id) if !nsg_id.is_empty() => {
                    info!(check = %name, nsg_id, "subnet has a security group associated");
                    CheckOutcome::Associated { nsg_id }
                }
                _ => {
                    warn!(check = %name, "subnet does not have a security group associated");
                    CheckOutcome::NotAssociated
                }
            };
            checks.push(SubnetCheck {
                name,
                vnet: vnet.0,
                subnet: subnet.0,
                outcome,
            });
        }

        Ok(CheckReport {
            run_id: Uuid::new_v4(),
            resource_group: resource_group.0,
            security_group: nsg_name.0,
            started_at,
            finished_at: Utc::now(),
            checks,
        })
    }
}

// ── Combination walk ──────────────────────────────────────────────────────────

/// Expand the vnet and subnet output maps into (vnet identifier, raw subnet
/// entry) pairs. `Product` walks every combination; `Paired` only entries
/// sharing a logical output key. Keys are sorted for a deterministic order.
fn combinations(
    vnets: &HashMap<String, String>,
    subnet_entries: &HashMap<String, String>,
    pairing: Pairing,
) -> Vec<(String, String)> {
    let mut vnet_keys: Vec<&String> = vnets.keys().collect();
    vnet_keys.sort();
    let mut subnet_keys: Vec<&String> = subnet_entries.keys().collect();
    subnet_keys.sort();

    let mut out = Vec::new();
    match pairing {
        Pairing::Product => {
            for vk in &vnet_keys {
                for sk in &subnet_keys {
                    out.push((vnets[*vk].clone(), subnet_entries[*sk].clone()));
                }
            }
        }
        Pairing::Paired => {
            for vk in &vnet_keys {
                if let Some(entry) = subnet_entries.get(*vk) {
                    out.push((vnets[*vk].clone(), entry.clone()));
                }
            }
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nsgcheck_azure::AzureError;
    use nsgcheck_domain::{SecurityGroupRecord, SubnetName, SubnetRecord};
    use nsgcheck_terraform::StaticOutputs;

    // In-memory reader over a fixed deployment snapshot.
    #[derive(Default)]
    struct FakeNetwork {
        nsgs: HashMap<String, SecurityGroupRecord>,
        subnets: HashMap<String, SubnetRecord>,
        broken_subnets: Vec<String>,
    }

    impl FakeNetwork {
        fn with_nsg(mut self, name: &str) -> Self {
            self.nsgs.insert(
                name.to_string(),
                SecurityGroupRecord {
                    id: format!("/subscriptions/s/…/networkSecurityGroups/{}", name),
                    name: name.to_string(),
                    location: Some("eastus2".into()),
                },
            );
            self
        }

        fn with_subnet(mut self, vnet: &str, subnet: &str, nsg: Option<&str>) -> Self {
            self.subnets.insert(
                format!("{}/{}", vnet, subnet),
                SubnetRecord {
                    id: format!("/subscriptions/s/…/{}/subnets/{}", vnet, subnet),
                    name: subnet.to_string(),
                    address_prefix: None,
                    network_security_group: nsg
                        .map(|n| format!("/subscriptions/s/…/networkSecurityGroups/{}", n)),
                },
            );
            self
        }

        fn with_broken_subnet(mut self, vnet: &str, subnet: &str) -> Self {
            self.broken_subnets.push(format!("{}/{}", vnet, subnet));
            self
        }
    }

    #[async_trait]
    impl SecurityGroupReader for FakeNetwork {
        async fn get_security_group(
            &self,
            _resource_group: &ResourceGroupName,
            name: &SecurityGroupName,
        ) -> Result<SecurityGroupRecord, AzureError> {
            self.nsgs.get(name.as_str()).cloned().ok_or_else(|| AzureError::NotFound {
                resource: format!("security group '{}'", name),
            })
        }
    }

    #[async_trait]
    impl SubnetReader for FakeNetwork {
        async fn get_subnet(
            &self,
            _resource_group: &ResourceGroupName,
            vnet: &VnetName,
            subnet: &SubnetName,
        ) -> Result<SubnetRecord, AzureError> {
            let key = format!("{}/{}", vnet, subnet);
            if self.broken_subnets.contains(&key) {
                return Err(AzureError::Api {
                    url: key.clone(),
                    status: 500,
                    message: "InternalServerError: boom".into(),
                });
            }
            self.subnets.get(&key).cloned().ok_or_else(|| AzureError::NotFound {
                resource: format!("subnet '{}'", key),
            })
        }
    }

    fn checker(net: FakeNetwork) -> AssociationChecker {
        let net = Arc::new(net);
        AssociationChecker::new(net.clone(), net)
    }

    fn outputs_one_vnet_two_subnets() -> StaticOutputs {
        StaticOutputs::new()
            .with_value("resource_group_name", "rg-app")
            .with_value("name", "nsg-app")
            .with_map("vnet_names", &[("app", "vnet-app")])
            .with_map(
                "vnet_subnets",
                &[
                    ("subnet1", "[\"rg-app/vnet-app/subnet1\"]"),
                    ("subnet2", "[\"rg-app/vnet-app/subnet2\"]"),
                ],
            )
    }

    // ── happy path ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn two_associated_subnets_pass() {
        let net = FakeNetwork::default()
            .with_nsg("nsg-app")
            .with_subnet("vnet-app", "subnet1", Some("nsg-app"))
            .with_subnet("vnet-app", "subnet2", Some("nsg-app"));

        let report = checker(net).run(&outputs_one_vnet_two_subnets()).await.unwrap();
        assert_eq!(report.checks.len(), 2);
        assert!(report.passed());
        assert!(report.failures().is_empty());
        assert_eq!(report.security_group, "nsg-app");
    }

    // ── failed sub-check does not abort ──────────────────────────────────────

    #[tokio::test]
    async fn unassociated_subnet_fails_but_run_completes() {
        let net = FakeNetwork::default()
            .with_nsg("nsg-app")
            .with_subnet("vnet-app", "subnet1", Some("nsg-app"))
            .with_subnet("vnet-app", "subnet2", None);

        let report = checker(net).run(&outputs_one_vnet_two_subnets()).await.unwrap();
        assert_eq!(report.checks.len(), 2, "remaining checks still run");
        assert!(!report.passed());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "vnet-app/subnet2");
    }

    // ── fatal aborts ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn missing_nsg_aborts_before_subnet_checks() {
        let net = FakeNetwork::default()
            .with_subnet("vnet-app", "subnet1", Some("nsg-app"));

        let err = checker(net).run(&outputs_one_vnet_two_subnets()).await.unwrap_err();
        assert!(matches!(err, CheckError::Azure(AzureError::NotFound { .. })), "got: {}", err);
    }

    #[tokio::test]
    async fn subnet_fetch_error_aborts_with_no_partial_report() {
        let net = FakeNetwork::default()
            .with_nsg("nsg-app")
            .with_subnet("vnet-app", "subnet1", Some("nsg-app"))
            .with_broken_subnet("vnet-app", "subnet2");

        let err = checker(net).run(&outputs_one_vnet_two_subnets()).await.unwrap_err();
        assert!(matches!(err, CheckError::Azure(AzureError::Api { .. })), "got: {}", err);
    }

    #[tokio::test]
    async fn missing_output_key_is_fatal() {
        let net = FakeNetwork::default().with_nsg("nsg-app");
        let outputs = StaticOutputs::new()
            .with_value("resource_group_name", "rg-app")
            .with_value("name", "nsg-app")
            .with_map("vnet_names", &[("app", "vnet-app")]);
        // vnet_subnets never declared

        let err = checker(net).run(&outputs).await.unwrap_err();
        assert!(matches!(err, CheckError::Output(_)), "got: {}", err);
    }

    #[tokio::test]
    async fn empty_resource_group_output_is_fatal() {
        let net = FakeNetwork::default().with_nsg("nsg-app");
        let outputs = StaticOutputs::new()
            .with_value("resource_group_name", "")
            .with_value("name", "nsg-app")
            .with_map("vnet_names", &[])
            .with_map("vnet_subnets", &[]);

        let err = checker(net).run(&outputs).await.unwrap_err();
        assert!(matches!(err, CheckError::Domain(_)), "got: {}", err);
    }

    // ── product vs paired ────────────────────────────────────────────────────

    #[tokio::test]
    async fn product_walks_every_combination() {
        // Two vnets × two subnet entries = four checks, even though each
        // subnet belongs to only one of the vnets.
        let net = FakeNetwork::default()
            .with_nsg("nsg-app")
            .with_subnet("vnet-a", "subnet1", Some("nsg-app"))
            .with_subnet("vnet-a", "subnet2", Some("nsg-app"))
            .with_subnet("vnet-b", "subnet1", Some("nsg-app"))
            .with_subnet("vnet-b", "subnet2", Some("nsg-app"));

        let outputs = StaticOutputs::new()
            .with_value("resource_group_name", "rg-app")
            .with_value("name", "nsg-app")
            .with_map("vnet_names", &[("a", "vnet-a"), ("b", "vnet-b")])
            .with_map(
                "vnet_subnets",
                &[("s1", "vnet-a/subnet1"), ("s2", "vnet-a/subnet2")],
            );

        let report = checker(net).run(&outputs).await.unwrap();
        assert_eq!(report.checks.len(), 4);
    }

    #[tokio::test]
    async fn paired_restricts_to_matching_keys() {
        let net = FakeNetwork::default()
            .with_nsg("nsg-app")
            .with_subnet("vnet-a", "subnet1", Some("nsg-app"))
            .with_subnet("vnet-b", "subnet2", Some("nsg-app"));

        let outputs = StaticOutputs::new()
            .with_value("resource_group_name", "rg-app")
            .with_value("name", "nsg-app")
            .with_map("vnet_names", &[("a", "vnet-a"), ("b", "vnet-b")])
            .with_map(
                "vnet_subnets",
                &[("a", "rg-app/vnet-a/subnet1"), ("b", "rg-app/vnet-b/subnet2")],
            );

        let net = Arc::new(net);
        let report = AssociationChecker::new(net.clone(), net)
            .with_pairing(Pairing::Paired)
            .run(&outputs)
            .await
            .unwrap();
        assert_eq!(report.checks.len(), 2);
        assert!(report.passed());
    }

    // ── combinations (pure) ──────────────────────────────────────────────────

    #[test]
    fn combinations_order_is_deterministic() {
        let vnets: HashMap<String, String> =
            [("b".into(), "vnet-b".into()), ("a".into(), "vnet-a".into())].into();
        let subnets: HashMap<String, String> =
            [("s".into(), "subnet1".into())].into();

        let combos = combinations(&vnets, &subnets, Pairing::Product);
        assert_eq!(
            combos,
            vec![
                ("vnet-a".to_string(), "subnet1".to_string()),
                ("vnet-b".to_string(), "subnet1".to_string()),
            ]
        );
    }

    #[test]
    fn paired_skips_unmatched_keys() {
        let vnets: HashMap<String, String> = [("a".into(), "vnet-a".into())].into();
        let subnets: HashMap<String, String> = [("other".into(), "subnet1".into())].into();

        let combos = combinations(&vnets, &subnets, Pairing::Paired);
        assert!(combos.is_empty());
    }
}
