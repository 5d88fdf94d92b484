//! Refchain: Token-Addressed Reference Workflows
//!
//! Values are stored once as immutable references, labelled by tokens, and
//! derived from one another by composable commands. Every derived reference
//! carries the lineage of transforms that produced it; the directory-backed
//! context writes that lineage as a YAML frontmatter header next to the content.

pub mod card;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod provenance;
pub mod reference;
pub mod tooling;
pub mod types;
pub mod workflow;
