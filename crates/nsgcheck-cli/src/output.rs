use nsgcheck_checker::{CheckOutcome, CheckReport};

/// Render a check report as human-readable text.
pub fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "nsg '{}' in resource group '{}'\n",
        report.security_group, report.resource_group
    ));

    for check in &report.checks {
        let line = match &check.outcome {
            CheckOutcome::Associated { nsg_id } => {
                format!("+ {} associated ({})", check.name, nsg_id)
            }
            CheckOutcome::NotAssociated => {
                format!("- {} no security group associated", check.name)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }

    let failed = report.failures().len();
    if failed == 0 {
        out.push_str(&format!("{} checks passed\n", report.checks.len()));
    } else {
        out.push_str(&format!(
            "{} of {} checks failed\n",
            failed,
            report.checks.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nsgcheck_checker::SubnetCheck;
    use uuid::Uuid;

    fn report() -> CheckReport {
        CheckReport {
            run_id: Uuid::new_v4(),
            resource_group: "rg-app".into(),
            security_group: "nsg-app".into(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            checks: vec![
                SubnetCheck {
                    name: "vnet-app/subnet1".into(),
                    vnet: "vnet-app".into(),
                    subnet: "subnet1".into(),
                    outcome: CheckOutcome::Associated {
                        nsg_id: "/subscriptions/s/…/networkSecurityGroups/nsg-app".into(),
                    },
                },
                SubnetCheck {
                    name: "vnet-app/subnet2".into(),
                    vnet: "vnet-app".into(),
                    subnet: "subnet2".into(),
                    outcome: CheckOutcome::NotAssociated,
                },
            ],
        }
    }

    #[test]
    fn text_lists_each_check_and_summary() {
        let text = render_text(&report());
        assert!(text.contains("+ vnet-app/subnet1 associated"), "got: {}", text);
        assert!(text.contains("- vnet-app/subnet2 no security group associated"), "got: {}", text);
        assert!(text.contains("1 of 2 checks failed"), "got: {}", text);
    }

    #[test]
    fn all_passing_summary() {
        let mut r = report();
        r.checks.truncate(1);
        let text = render_text(&r);
        assert!(text.contains("1 checks passed"), "got: {}", text);
    }
}
