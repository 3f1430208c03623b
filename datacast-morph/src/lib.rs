//! Polymorphic Data objects for datacast.
//!
//! A field declared as a base type ("any `Shape`") is stored as the
//! concrete subtype's payload plus a tag naming it:
//!
//! ```json
//! {"radius": 5, "type": "c"}
//! ```
//!
//! - [`TypeRegistry`]: concrete types, bases, subtypes and morph maps
//!   (short aliases such as `c` for `shapes::Circle`)
//! - [`MorphResolver`]: picks the subtype for a payload via custom resolver,
//!   alias or literal type name
//! - [`Codec`]: encodes instances to tagged payloads and decodes them back
//! - [`EncryptedCodec`]: the same, stored as encrypted text
//! - [`MorphSettings`]: TOML configuration applied to a registry
//!
//! The registry is configured once at start-up and then shared as
//! `Arc<TypeRegistry>`.

mod codec;
mod encrypted;
mod error;
mod registry;
mod resolver;
mod settings;

pub use codec::{Codec, Encodable};
pub use encrypted::EncryptedCodec;
pub use error::{MorphError, MorphResult};
pub use registry::{
    BaseEntry, BaseTypeDef, HydrateFn, ResolverFn, SingleSubtypePolicy, Subtype, TypeRegistry,
};
pub use resolver::{MorphResolver, Resolution, ResolvedBy};
pub use settings::{BaseSettings, MorphSettings};
