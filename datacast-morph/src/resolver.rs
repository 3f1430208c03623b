//! Concrete subtype resolution for polymorphic bases.
//!
//! Order, first success wins:
//! 1. the base's custom resolver over all payloads
//! 2. the tag field of the first payload, as an alias
//! 3. the same tag as a literal subtype name
//!
//! An untagged payload fails as ambiguous, except for a base with exactly
//! one subtype under [`SingleSubtypePolicy::Resolve`].

use crate::error::{MorphError, MorphResult};
use crate::registry::{BaseEntry, SingleSubtypePolicy, Subtype, TypeRegistry};
use datacast_types::{Payload, TypeName};
use serde_json::Value;
use tracing::debug;

/// Which rule picked the subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Resolver,
    Alias,
    Identifier,
    SingleSubtype,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution<'r> {
    pub subtype: &'r Subtype,
    pub resolved_by: ResolvedBy,
}

/// Stateless resolver reading a [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct MorphResolver<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> MorphResolver<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the concrete subtype of `base` for the given payloads.
    pub fn resolve(&self, base: &str, payloads: &[&Payload]) -> MorphResult<Resolution<'r>> {
        let entry = self.registry.base_entry(base)?;
        let base_name = entry.def().name();

        if let Some(resolver) = entry.def().resolver_fn() {
            if let Some(name) = resolver(payloads) {
                let (subtype, _) = self.interpret(entry, name.as_str())?;
                debug!(base, subtype = %subtype.name(), "resolved by custom resolver");
                return Ok(Resolution {
                    subtype,
                    resolved_by: ResolvedBy::Resolver,
                });
            }
        }

        let tag_key = entry.def().key();
        let tag = payloads.first().and_then(|payload| payload.get(tag_key));
        match tag {
            None | Some(Value::Null) => self.untagged(entry),
            Some(Value::String(tag)) => {
                let (subtype, resolved_by) = self.interpret(entry, tag)?;
                debug!(base, tag = %tag, subtype = %subtype.name(), ?resolved_by, "resolved by tag");
                Ok(Resolution {
                    subtype,
                    resolved_by,
                })
            }
            Some(other) => Err(MorphError::UnknownSubtype {
                base: base_name.clone(),
                tag: other.to_string(),
            }),
        }
    }

    /// Interprets a tag or resolver result: alias first, then literal name.
    fn interpret(&self, entry: &BaseEntry, tag: &str) -> MorphResult<(&'r Subtype, ResolvedBy)> {
        let base = entry.def().name();
        let (name, resolved_by) = match self.registry.resolve_alias(base.as_str(), tag) {
            Some(name) => (name.as_str(), ResolvedBy::Alias),
            None if entry.has_subtype(tag) => (tag, ResolvedBy::Identifier),
            None => {
                return Err(MorphError::UnknownSubtype {
                    base: base.clone(),
                    tag: tag.to_string(),
                });
            }
        };
        let subtype = self.registry.subtype(name).ok_or_else(|| {
            MorphError::configuration(format!("{name} is listed under {base} but has no factory"))
        })?;
        Ok((subtype, resolved_by))
    }

    fn untagged(&self, entry: &BaseEntry) -> MorphResult<Resolution<'r>> {
        let base = entry.def().name();
        if let [only] = entry.subtypes() {
            if self.registry.single_subtype_policy() == SingleSubtypePolicy::Resolve {
                let subtype = self.lookup(only)?;
                debug!(base = %base, subtype = %only, "resolved as the only subtype");
                return Ok(Resolution {
                    subtype,
                    resolved_by: ResolvedBy::SingleSubtype,
                });
            }
        }
        Err(MorphError::AmbiguousType {
            base: base.clone(),
            tag_key: entry.def().key().to_string(),
        })
    }

    fn lookup(&self, name: &TypeName) -> MorphResult<&'r Subtype> {
        self.registry
            .subtype(name.as_str())
            .ok_or_else(|| MorphError::configuration(format!("{name} has no factory")))
    }
}
