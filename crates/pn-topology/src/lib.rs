//! pn-topology: pipe network model for pumpnet.
//!
//! Provides:
//! - Segment and fitting entities
//! - The topology (suction, discharge-before, parallel branches, discharge-after)
//! - The topology store with identity-stable mutation operations
//! - Structural validation used when a topology is loaded wholesale
//!
//! # Example
//!
//! ```
//! use pn_topology::{SegmentDraft, TopologyStore};
//!
//! let mut store = TopologyStore::new();
//! let s1 = store.add_suction(SegmentDraft::new("Suction 1", 10.0, 102.3));
//! store.add_branch("Branch A");
//! store.add_to_branch("Branch A", SegmentDraft::new("Bypass", 5.0, 52.5));
//!
//! assert_eq!(store.topology().segment_count(), 2);
//! assert!(store.topology().contains(&s1));
//! ```

pub mod branches;
pub mod error;
pub mod segment;
pub mod store;
pub mod topology;
pub mod validate;

// Re-exports for ergonomics
pub use branches::{Branch, ParallelBranches};
pub use error::{TopologyError, TopologyResult};
pub use segment::{Fitting, Segment, SegmentDraft, SegmentPatch};
pub use store::TopologyStore;
pub use topology::{Region, Topology};
pub use validate::{validate_identities, validate_topology};
