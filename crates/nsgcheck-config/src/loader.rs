use std::path::{Path, PathBuf};

use nsgcheck_domain::Pairing;
use tracing::debug;

use crate::error::ConfigError;
use crate::raw::RawCheckPlan;

/// Default plan file name, looked up in the current directory when no
/// explicit path is given.
const DEFAULT_PLAN_FILE: &str = "nsgcheck.yml";

/// Resolved check plan.
#[derive(Debug, Clone)]
pub struct CheckPlan {
    /// Directory `terraform output` runs in.
    pub terraform_dir: PathBuf,
    /// IaC binary name ("terraform" or "tofu").
    pub tool: String,
    pub outputs: OutputBindings,
    pub pairing: Pairing,
}

impl Default for CheckPlan {
    fn default() -> Self {
        Self {
            terraform_dir: PathBuf::from("."),
            tool: "terraform".to_string(),
            outputs: OutputBindings::default(),
            pairing: Pairing::Product,
        }
    }
}

/// Names of the Terraform outputs the checker reads. The defaults match
/// the conventional NSG module outputs.
#[derive(Debug, Clone)]
pub struct OutputBindings {
    pub resource_group: String,
    pub security_group: String,
    pub vnet_names: String,
    pub vnet_subnets: String,
}

impl Default for OutputBindings {
    fn default() -> Self {
        Self {
            resource_group: "resource_group_name".to_string(),
            security_group: "name".to_string(),
            vnet_names: "vnet_names".to_string(),
            vnet_subnets: "vnet_subnets".to_string(),
        }
    }
}

/// Load a check plan from an explicit path, or from `nsgcheck.yml` in the
/// current directory when present. Absent both, the defaults apply.
pub fn load_plan_or_default(path: Option<&Path>) -> Result<CheckPlan, ConfigError> {
    match path {
        Some(p) => load_plan(p),
        None => {
            let fallback = Path::new(DEFAULT_PLAN_FILE);
            if fallback.exists() {
                load_plan(fallback)
            } else {
                Ok(CheckPlan::default())
            }
        }
    }
}

pub fn load_plan(path: &Path) -> Result<CheckPlan, ConfigError> {
    debug!("Loading check plan from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let raw: RawCheckPlan =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.display().to_string(),
            source: e,
        })?;
    convert_plan(raw, path)
}

fn convert_plan(raw: RawCheckPlan, path: &Path) -> Result<CheckPlan, ConfigError> {
    let defaults = OutputBindings::default();
    let outputs = match raw.outputs {
        Some(o) => OutputBindings {
            resource_group: o.resource_group.unwrap_or(defaults.resource_group),
            security_group: o.security_group.unwrap_or(defaults.security_group),
            vnet_names: o.vnet_names.unwrap_or(defaults.vnet_names),
            vnet_subnets: o.vnet_subnets.unwrap_or(defaults.vnet_subnets),
        },
        None => defaults,
    };

    let pairing = match raw.pairing.as_deref() {
        None => Pairing::Product,
        Some(s) => parse_pairing(s, path)?,
    };

    Ok(CheckPlan {
        terraform_dir: raw.terraform_dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        tool: raw.tool.unwrap_or_else(|| "terraform".to_string()),
        outputs,
        pairing,
    })
}

fn parse_pairing(s: &str, path: &Path) -> Result<Pairing, ConfigError> {
    match s {
        "product" => Ok(Pairing::Product),
        "paired" => Ok(Pairing::Paired),
        other => Err(ConfigError::Conversion {
            path: path.display().to_string(),
            message: format!("unknown pairing mode '{}'", other),
        }),
    }
}
