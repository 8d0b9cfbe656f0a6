//! Configuration for the HUD
//!
//! - **node**: the config node tree and its change queue
//! - **schema**: field kinds and the section builder
//! - **sections**: the compiled-in default tree
//! - **notify**: deferred change delivery
//! - **codec**: portable blobs
//! - **profiles**: named profile store

pub mod codec;
pub mod error;
pub mod node;
pub mod notify;
pub mod profiles;
pub mod schema;
pub mod sections;

// Re-export commonly used types
pub use error::{CodecError, ConfigError, ProfileError};
pub use node::{ChangeEvent, ConfigNode, ConfigTree, NodeKind, NodeMeta, Value};
pub use notify::{ChangeBus, SubscriptionId};
pub use profiles::ProfileStore;
pub use schema::{FieldKind, SectionBuilder};
pub use sections::default_tree;
