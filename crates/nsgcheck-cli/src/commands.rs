use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use nsgcheck_azure::{default_chain, ArmNetworkClient, CredentialSettings};
use nsgcheck_checker::AssociationChecker;
use nsgcheck_config::{load_plan_or_default, CheckPlan};
use nsgcheck_domain::{extract_subnet_name, SubscriptionId};
use nsgcheck_terraform::{load_outputs, OutputSource, ParsedOutputs};

use crate::cli::ReportFormat;
use crate::output;

// ── Check ─────────────────────────────────────────────────────────────────────

pub async fn check(
    subscription_id: Option<String>,
    config: Option<PathBuf>,
    terraform_dir: Option<PathBuf>,
    outputs_file: Option<PathBuf>,
    format: ReportFormat,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<bool> {
    // Checked before anything else touches the network or a subprocess.
    let subscription = SubscriptionId::parse(subscription_id.as_deref())
        .context("ARM_SUBSCRIPTION_ID is not set in the environment")?;

    let plan = resolve_plan(config, terraform_dir)?;

    let settings = CredentialSettings { tenant_id, client_id, client_secret };
    let token = default_chain(&settings);
    let client = Arc::new(
        ArmNetworkClient::new(subscription, token).context("Failed to construct ARM client")?,
    );

    let outputs = resolve_outputs(&plan, outputs_file).await?;

    let checker = AssociationChecker::new(client.clone(), client)
        .with_bindings(plan.outputs.clone())
        .with_pairing(plan.pairing);
    let report = checker.run(outputs.as_ref()).await?;

    match format {
        ReportFormat::Text => print!("{}", output::render_text(&report)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.passed())
}

// ── Outputs ───────────────────────────────────────────────────────────────────

pub async fn outputs(
    config: Option<PathBuf>,
    terraform_dir: Option<PathBuf>,
    outputs_file: Option<PathBuf>,
) -> Result<()> {
    let plan = resolve_plan(config, terraform_dir)?;
    let outputs = resolve_outputs(&plan, outputs_file).await?;

    let resource_group = outputs.value(&plan.outputs.resource_group)?;
    let security_group = outputs.value(&plan.outputs.security_group)?;
    let vnets = outputs.map(&plan.outputs.vnet_names)?;
    let subnets = outputs.map(&plan.outputs.vnet_subnets)?;

    println!("resource group:  {}", resource_group);
    println!("security group:  {}", security_group);

    let mut vnet_keys: Vec<&String> = vnets.keys().collect();
    vnet_keys.sort();
    for k in vnet_keys {
        println!("vnet {}: {}", k, vnets[k]);
    }

    let mut subnet_keys: Vec<&String> = subnets.keys().collect();
    subnet_keys.sort();
    for k in subnet_keys {
        println!("subnet {}: {} -> {}", k, subnets[k], extract_subnet_name(&subnets[k]));
    }

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_plan(config: Option<PathBuf>, terraform_dir: Option<PathBuf>) -> Result<CheckPlan> {
    let mut plan =
        load_plan_or_default(config.as_deref()).context("Failed to load check plan")?;
    if let Some(dir) = terraform_dir {
        plan.terraform_dir = dir;
    }
    Ok(plan)
}

async fn resolve_outputs(
    plan: &CheckPlan,
    outputs_file: Option<PathBuf>,
) -> Result<Box<dyn OutputSource>> {
    let parsed = match outputs_file {
        Some(path) => ParsedOutputs::from_file(&path)
            .with_context(|| format!("Failed to read outputs file {}", path.display()))?,
        None => load_outputs(&plan.tool, &plan.terraform_dir)
            .await
            .context("Failed to read terraform outputs")?,
    };
    Ok(Box::new(parsed))
}
