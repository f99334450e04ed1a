#[cfg(test)]
mod tests {
    use crate::error::DomainError;
    use crate::types::*;

    // ── SubscriptionId::parse ────────────────────────────────────────────────

    #[test]
    fn subscription_id_present() {
        let id = SubscriptionId::parse(Some("0000-1111")).unwrap();
        assert_eq!(id.as_str(), "0000-1111");
    }

    #[test]
    fn subscription_id_absent_rejected() {
        assert!(matches!(
            SubscriptionId::parse(None),
            Err(DomainError::EmptySubscriptionId)
        ));
    }

    #[test]
    fn subscription_id_blank_rejected() {
        assert!(matches!(
            SubscriptionId::parse(Some("   ")),
            Err(DomainError::EmptySubscriptionId)
        ));
    }

    // ── name parsing ─────────────────────────────────────────────────────────

    #[test]
    fn resource_group_empty_rejected() {
        assert!(matches!(
            ResourceGroupName::parse(""),
            Err(DomainError::EmptyResourceGroup)
        ));
    }

    #[test]
    fn security_group_name_trimmed() {
        let name = SecurityGroupName::parse(" nsg-app ").unwrap();
        assert_eq!(name.as_str(), "nsg-app");
    }

    // ── extract_subnet_name ──────────────────────────────────────────────────

    #[test]
    fn plain_name_passes_through() {
        assert_eq!(extract_subnet_name("subnet1").as_str(), "subnet1");
    }

    #[test]
    fn path_takes_trailing_segment() {
        assert_eq!(extract_subnet_name("rg/vnet/subnet1").as_str(), "subnet1");
    }

    #[test]
    fn bracketed_composite_is_stripped() {
        assert_eq!(
            extract_subnet_name("[\"rg/vnet/subnet1\"]").as_str(),
            "subnet1"
        );
    }

    #[test]
    fn brackets_without_path() {
        assert_eq!(extract_subnet_name("[\"subnet1\"]").as_str(), "subnet1");
    }

    // ── SubnetRecord association ─────────────────────────────────────────────

    #[test]
    fn subnet_with_nsg_is_associated() {
        let s = SubnetRecord {
            id: "/subscriptions/s/…/subnets/subnet1".into(),
            name: "subnet1".into(),
            address_prefix: Some("10.0.1.0/24".into()),
            network_security_group: Some("/subscriptions/s/…/networkSecurityGroups/nsg".into()),
        };
        assert!(s.is_associated());
    }

    #[test]
    fn subnet_without_nsg_is_not_associated() {
        let s = SubnetRecord {
            id: "/subscriptions/s/…/subnets/subnet2".into(),
            name: "subnet2".into(),
            address_prefix: None,
            network_security_group: None,
        };
        assert!(!s.is_associated());
    }

    #[test]
    fn subnet_with_empty_nsg_id_is_not_associated() {
        let s = SubnetRecord {
            id: "/subscriptions/s/…/subnets/subnet3".into(),
            name: "subnet3".into(),
            address_prefix: None,
            network_security_group: Some(String::new()),
        };
        assert!(!s.is_associated());
    }

    // ── Pairing ──────────────────────────────────────────────────────────────

    #[test]
    fn pairing_default_is_product() {
        assert_eq!(Pairing::default(), Pairing::Product);
    }
}
