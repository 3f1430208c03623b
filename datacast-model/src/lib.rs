//! Data object model for datacast.
//!
//! Defines the capabilities a typed DTO can have:
//! - [`DataObject`]: a serde struct with a stable type name that can be
//!   hydrated from and extracted to a [`Payload`](datacast_types::Payload)
//! - [`Data`]: the object-safe view used once the concrete type is only
//!   known at runtime (after morph resolution)
//! - [`Validatable`]: post-hydration validation rules
//! - [`Transformable`]: conversion back to mappings/JSON, optionally partial
//!
//! Types opt into the capabilities they need; nothing here knows about
//! morph maps, encryption or storage.

mod data;
mod error;
mod transform;
mod validate;

pub use data::{Data, DataObject};
pub use error::{ModelError, ModelResult};
pub use transform::{PartialTransform, Transformable};
pub use validate::{Validatable, ValidationErrors};
