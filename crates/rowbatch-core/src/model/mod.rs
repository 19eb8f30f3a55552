//! Runtime mapping model definitions.
//!
//! Types in `model` describe *how one entity type maps onto its table*:
//! the table span, the ordered properties and their columns, the identifier
//! column, the version property, and the flags that decide whether inserts
//! can be batched. They are plain, read-only descriptors supplied by the
//! host persistence layer through `EntityPersister::model`.
//!
//! In general:
//! - The host framework defines *what is mapped*
//! - `model` defines *what the executor binds*
pub mod entity;
pub mod identifier;
pub mod property;
pub mod version;
