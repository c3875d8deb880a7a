//! default-tagger - mark provider-created default resources in every region
//!
//! For each region visible to the caller's credentials this crate finds the
//! default VPC and everything that belongs to it, plus the legacy RDS
//! security group named `default`, and tags them `isDefault=true`.

pub mod aws;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod orchestrator;
pub mod regions;
pub mod tagging;
