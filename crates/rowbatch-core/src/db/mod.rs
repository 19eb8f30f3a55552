//! Multi-row insert engine.
//!
//! Control flow, once per entity type then once per batch:
//! - `eligibility` decides whether the type may batch, and `registry`
//!   caches that decision for the process lifetime
//! - `template` splits the single-row insert and synthesizes N-row text
//! - `pipeline` stamps versions and in-memory generated values per row
//! - `executor` drives all of the above against a host `Session`
pub mod config;
pub mod eligibility;
pub mod executor;
pub mod pipeline;
pub mod registry;
pub mod session;
pub mod template;

// re-exports
pub use config::InsertConfig;
pub use eligibility::{EligibilityDescriptor, IneligibleReason, InsertPlan, analyze};
pub use executor::{BatchInsertError, MultiRowInsert};
pub use pipeline::ValueGenerationPipeline;
pub use registry::{decision, lookup};
pub use session::{Session, Statement};
pub use template::InsertTemplate;
