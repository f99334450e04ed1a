use serde::{Deserialize, Serialize};

/// Raw YAML representation of a check plan file (nsgcheck.yml).
/// Every field is optional; absent fields fall back to defaults so the
/// tool runs against a conventional Terraform module unconfigured.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RawCheckPlan {
    /// Directory `terraform output` runs in. Absent = current directory.
    pub terraform_dir: Option<String>,
    /// Override the IaC binary. Absent = "terraform".
    pub tool: Option<String>,
    pub outputs: Option<RawOutputBindings>,
    /// "product" (default) or "paired".
    pub pairing: Option<String>,
}

/// Names of the Terraform outputs the checker reads.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RawOutputBindings {
    pub resource_group: Option<String>,
    pub security_group: Option<String>,
    pub vnet_names: Option<String>,
    pub vnet_subnets: Option<String>,
}
