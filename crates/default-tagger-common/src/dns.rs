//! Default internal DNS suffixes
//!
//! DHCP option sets are not scoped to a VPC. The one AWS created alongside a
//! default VPC is recognised by content: its `domain-name` option is
//! `<region>.compute.internal`, or `ec2.internal` in us-east-1.

/// Domain name of default DHCP option sets in us-east-1
pub const US_EAST_1_DOMAIN_NAME: &str = "ec2.internal";

/// Suffix of default DHCP option set domain names in every other region
pub const COMPUTE_INTERNAL_SUFFIX: &str = "compute.internal";

/// Build the list of default domain names for all known regions.
///
/// Every region's `<region>.compute.internal` is included, not just the
/// region being processed, followed by `ec2.internal`. The list is built once
/// from the regions known at run start.
pub fn default_domain_names<S: AsRef<str>>(regions: &[S]) -> Vec<String> {
    regions
        .iter()
        .map(|r| format!("{}.{}", r.as_ref(), COMPUTE_INTERNAL_SUFFIX))
        .chain(std::iter::once(US_EAST_1_DOMAIN_NAME.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_names_for_regions() {
        let names = default_domain_names(&["us-east-1", "eu-west-1"]);
        assert_eq!(
            names,
            vec![
                "us-east-1.compute.internal",
                "eu-west-1.compute.internal",
                "ec2.internal",
            ]
        );
    }

    #[test]
    fn test_domain_names_without_regions() {
        let names = default_domain_names::<&str>(&[]);
        assert_eq!(names, vec!["ec2.internal"]);
    }
}
