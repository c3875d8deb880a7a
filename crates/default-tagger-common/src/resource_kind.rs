//! Resource categories touched by default-tagger
//!
//! The EC2 categories are queried, and their identifiers accumulated, in
//! [`ResourceKind::DEFAULT_VPC_ORDER`]. The order only matters for log
//! readability; tagging treats the identifiers as a set.

/// AWS service that owns a resource, as printed in log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Service {
    #[display("EC2")]
    Ec2,
    #[display("RDS")]
    Rds,
}

/// EC2 resource categories that make up a default VPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResourceKind {
    /// The default VPC itself
    #[display("vpc")]
    Vpc,
    #[display("subnet")]
    Subnet,
    #[display("security-group")]
    SecurityGroup,
    #[display("network-acl")]
    NetworkAcl,
    #[display("route-table")]
    RouteTable,
    /// Internet gateway attached to the default VPC
    #[display("internet-gateway")]
    InternetGateway,
    /// DHCP option set whose domain name is a default internal suffix
    #[display("dhcp-options")]
    DhcpOptions,
}

impl ResourceKind {
    /// Category order of a default VPC resource set. The VPC always comes first.
    pub const DEFAULT_VPC_ORDER: [ResourceKind; 7] = [
        ResourceKind::Vpc,
        ResourceKind::Subnet,
        ResourceKind::SecurityGroup,
        ResourceKind::NetworkAcl,
        ResourceKind::RouteTable,
        ResourceKind::InternetGateway,
        ResourceKind::DhcpOptions,
    ];

    /// Categories that belong to the VPC, in [`Self::DEFAULT_VPC_ORDER`]
    pub fn dependents() -> &'static [ResourceKind] {
        let order: &'static [ResourceKind] = &Self::DEFAULT_VPC_ORDER;
        &order[1..]
    }
}
