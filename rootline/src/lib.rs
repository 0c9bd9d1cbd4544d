//! # Rootline
//!
//! A family graph engine: typed kinship edges between members, derived
//! relative computation (siblings, grandparents, cousins of first and second
//! degree, bounded ancestor/descendant trees), rooted family trees, and a
//! multi-party verification ledger that promotes members and relationships
//! once enough distinct users attest to them.
//!
//! ## Quick Start
//!
//! ```rust
//! use rootline::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // In-process storage; see ConfigBuilder for persistent options
//!     let config = ConfigBuilder::development().build()?;
//!     let graph = rootline::init(config).await?;
//!
//!     let family = graph.create_family(Family::builder("Okonkwo").build()).await?;
//!     let parent = graph
//!         .add_member(Member::builder(&family.id, "Ngozi", "Okonkwo").build())
//!         .await?;
//!     let child = graph
//!         .add_member(Member::builder(&family.id, "Chidi", "Okonkwo").build())
//!         .await?;
//!
//!     // `related_member_id` is the parent, `member_id` the child
//!     graph
//!         .add_relationship(NewRelationship {
//!             member_id: child.id.clone(),
//!             related_member_id: parent.id.clone(),
//!             kind: RelationshipKind::Mother,
//!             qualifier: None,
//!         })
//!         .await?;
//!
//!     let parents = graph.parents(&child.id).await?;
//!     assert_eq!(parents.len(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Storage**: trait-based store contract (`storage::traits`) with a
//!   SurrealDB implementation and an in-process memory store
//! - **Kinship resolver**: batched, deduplicated derived-relative queries
//! - **Family-tree builder**: rooted trees anchored at the eldest member
//! - **Verification ledger**: attestation consensus with per-family
//!   thresholds
//!
//! The surrounding HTTP API, authentication, notifications and image
//! hosting are external collaborators; this crate owns only the graph.

pub mod config;
pub mod core;
pub mod kinship;
pub mod logging;
pub mod models;
pub mod storage;
pub mod tree;
pub mod verification;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export core initialization functions
    pub use crate::{init, init_with_defaults};

    // Re-export config types
    pub use crate::config::{ConfigBuilder, LogLevel, RootlineConfig};

    // Re-export model types
    pub use crate::models::{
        DateQualifier, Family, FamilyBuilder, Gender, Member, MemberBuilder, MemberRole,
        PersonSummary,
    };

    // Re-export the manager and its inputs
    pub use crate::core::{FamilyGraphManager, NewRelationship, RelationshipView};

    // Re-export kinship result types
    pub use crate::kinship::{
        AncestorLookup, DescendantLookup, KinshipResolver, RelationLabel, Relative,
    };

    // Re-export tree and verification types
    pub use crate::tree::{FamilyTree, TreeNode};
    pub use crate::verification::{is_verified, VerificationStatus};

    // Re-export storage types for advanced usage
    pub use crate::storage::{RelationshipKind, StorageError};

    // Re-export essential result type
    pub use crate::{Result, RootlineError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Rootline operations
#[derive(Debug, thiserror::Error)]
pub enum RootlineError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Referenced member, relationship or family does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// An edge between the pair is already recorded
    #[error("A relationship between {member_id} and {related_member_id} already exists")]
    DuplicateRelationship {
        /// First endpoint of the rejected edge
        member_id: String,
        /// Second endpoint of the rejected edge
        related_member_id: String,
    },

    /// The attestor has already attested this target
    #[error("User {attestor_id} has already attested {target_id}")]
    DuplicateAttestation {
        /// The attesting user
        attestor_id: String,
        /// The already-attested member or relationship
        target_id: String,
    },

    /// A family with members cannot be deleted
    #[error("Family {family_id} still has members and cannot be deleted")]
    FamilyNotEmpty {
        /// The family that still owns members
        family_id: String,
    },

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::storage::StorageError> for RootlineError {
    fn from(err: crate::storage::StorageError) -> Self {
        match err {
            crate::storage::StorageError::NotFound(msg) => RootlineError::NotFound(msg),
            other => RootlineError::Storage(other.to_string()),
        }
    }
}

impl From<crate::config::ConfigError> for RootlineError {
    fn from(err: crate::config::ConfigError) -> Self {
        RootlineError::Configuration(err.to_string())
    }
}

/// Result type for Rootline operations
pub type Result<T> = std::result::Result<T, RootlineError>;

/// Initialize Rootline with default configuration
///
/// Sets up the family graph with sensible defaults and returns a
/// [`core::FamilyGraphManager`] for interacting with it.
pub async fn init_with_defaults() -> Result<core::FamilyGraphManager> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(config).await
}

/// Initialize Rootline with the provided configuration
///
/// Initializes logging, creates the configured storage backend and returns
/// a [`core::FamilyGraphManager`] wired to it.
pub async fn init(config: config::RootlineConfig) -> Result<core::FamilyGraphManager> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let store = storage::create_storage_service(&config)
        .await
        .map_err(|e| RootlineError::Storage(e.to_string()))?;

    Ok(core::FamilyGraphManager::new(store, config))
}
