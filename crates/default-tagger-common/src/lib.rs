//! default-tagger-common - Shared types and utilities
//!
//! This crate provides the pieces of default-tagger that do not depend on
//! the AWS SDK, so they can be tested and reused without pulling it in.
//!
//! ## Modules
//!
//! - [`defaults`]: Default configuration values
//! - [`dns`]: Default DHCP domain names used to recognise default option sets
//! - [`resource_kind`]: Resource categories and the service that owns them
//! - [`tags`]: The fixed `isDefault=true` tag

pub mod defaults;
pub mod dns;
pub mod resource_kind;
pub mod tags;

// Re-export commonly used types
pub use dns::default_domain_names;
pub use resource_kind::{ResourceKind, Service};
pub use tags::ResourceTag;
