//! Type registry: concrete Data types, polymorphic bases and morph maps.
//!
//! The registry is built once during start-up through `&mut self` calls and
//! then shared read-only (usually as `Arc<TypeRegistry>`), so lookups never
//! take a lock.

use crate::error::{MorphError, MorphResult};
use datacast_model::{Data, DataObject, ModelResult};
use datacast_types::{Alias, DEFAULT_TAG_KEY, Payload, TypeName};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Hydration factory stored in the dispatch table.
pub type HydrateFn = fn(&Payload) -> ModelResult<Box<dyn Data>>;

/// Custom subtype resolution over one or more payloads.
pub type ResolverFn = Arc<dyn Fn(&[&Payload]) -> Option<TypeName> + Send + Sync>;

fn hydrate_boxed<T: DataObject>(payload: &Payload) -> ModelResult<Box<dyn Data>> {
    Ok(Box::new(T::hydrate(payload)?))
}

/// A concrete Data type and its hydration factory.
#[derive(Clone)]
pub struct Subtype {
    name: TypeName,
    type_id: TypeId,
    hydrate: HydrateFn,
}

impl Subtype {
    pub fn of<T: DataObject>() -> Self {
        Self {
            name: TypeName::new(T::TYPE_NAME),
            type_id: TypeId::of::<T>(),
            hydrate: hydrate_boxed::<T>,
        }
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Builds an instance of this subtype from a payload.
    pub fn hydrate(&self, payload: &Payload) -> ModelResult<Box<dyn Data>> {
        (self.hydrate)(payload)
    }
}

impl fmt::Debug for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtype").field("name", &self.name).finish()
    }
}

/// What to do when a base has exactly one subtype and a payload has no tag
/// and no resolver decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleSubtypePolicy {
    /// Use the only registered subtype.
    #[default]
    Resolve,
    /// Fail with an ambiguous-type error like any other untagged payload.
    RequireTag,
}

/// Declaration of a polymorphic base type.
#[derive(Clone)]
pub struct BaseTypeDef {
    name: TypeName,
    tag_key: String,
    resolver: Option<ResolverFn>,
    tag_on_encode: Option<bool>,
}

impl BaseTypeDef {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
            resolver: None,
            tag_on_encode: None,
        }
    }

    /// Key the tag is stored under. Defaults to `"type"`.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Custom resolution consulted before the tag.
    ///
    /// The function may return a subtype name or an alias. Returning `None`
    /// falls through to tag-based resolution.
    pub fn resolver<F, N>(mut self, resolver: F) -> Self
    where
        F: Fn(&[&Payload]) -> Option<N> + Send + Sync + 'static,
        N: Into<TypeName>,
    {
        let resolver: ResolverFn =
            Arc::new(move |payloads: &[&Payload]| resolver(payloads).map(Into::into));
        self.resolver = Some(resolver);
        self
    }

    /// Whether encoding writes the tag field.
    ///
    /// Defaults to `true` without a resolver and `false` with one: a base
    /// that discriminates on its own properties does not need the tag.
    pub fn tag_on_encode(mut self, enabled: bool) -> Self {
        self.tag_on_encode = Some(enabled);
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.tag_key
    }

    pub(crate) fn resolver_fn(&self) -> Option<&ResolverFn> {
        self.resolver.as_ref()
    }

    pub fn writes_tag(&self) -> bool {
        self.tag_on_encode.unwrap_or(self.resolver.is_none())
    }
}

impl fmt::Debug for BaseTypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseTypeDef")
            .field("name", &self.name)
            .field("tag_key", &self.tag_key)
            .field("resolver", &self.resolver.is_some())
            .field("tag_on_encode", &self.writes_tag())
            .finish()
    }
}

/// A base type with its subtypes and morph map.
#[derive(Debug, Clone)]
pub struct BaseEntry {
    def: BaseTypeDef,
    subtypes: Vec<TypeName>,
    aliases: BTreeMap<Alias, TypeName>,
    alias_by_subtype: HashMap<TypeName, Alias>,
}

impl BaseEntry {
    fn new(def: BaseTypeDef) -> Self {
        Self {
            def,
            subtypes: Vec::new(),
            aliases: BTreeMap::new(),
            alias_by_subtype: HashMap::new(),
        }
    }

    pub fn def(&self) -> &BaseTypeDef {
        &self.def
    }

    /// Registered subtypes in registration order.
    pub fn subtypes(&self) -> &[TypeName] {
        &self.subtypes
    }

    pub fn has_subtype(&self, name: &str) -> bool {
        self.subtypes.iter().any(|s| s.as_str() == name)
    }

    pub fn morph_map(&self) -> &BTreeMap<Alias, TypeName> {
        &self.aliases
    }
}

/// Registry of Data types, polymorphic bases and their morph maps.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeName, Subtype>,
    bases: HashMap<TypeName, BaseEntry>,
    enforce_morph_map: bool,
    single_subtype: SingleSubtypePolicy,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a concrete Data type so it can be decoded by name.
    pub fn register<T: DataObject>(&mut self) -> MorphResult<&mut Self> {
        self.insert_type(Subtype::of::<T>())?;
        Ok(self)
    }

    fn insert_type(&mut self, subtype: Subtype) -> MorphResult<()> {
        if self.check_type(&subtype)? {
            debug!(subtype = %subtype.name, "registered data type");
            self.types.insert(subtype.name.clone(), subtype);
        }
        Ok(())
    }

    /// Checks that `subtype` may be registered. `Ok(false)` when it already is.
    fn check_type(&self, subtype: &Subtype) -> MorphResult<bool> {
        if self.bases.contains_key(&subtype.name) {
            return Err(reject(format!(
                "{} is registered as a base type and cannot be concrete",
                subtype.name
            )));
        }
        match self.types.get(&subtype.name) {
            Some(existing) if existing.type_id != subtype.type_id => Err(reject(format!(
                "type name {} is already used by a different Rust type",
                subtype.name
            ))),
            Some(_) => Ok(false),
            None => Ok(true),
        }
    }

    /// Declares (or reconfigures) a base type. Subtypes and aliases already
    /// registered for the base are kept.
    pub fn define_base(&mut self, def: BaseTypeDef) -> MorphResult<&mut Self> {
        if self.types.contains_key(&def.name) {
            return Err(reject(format!(
                "{} is registered as a concrete type and cannot be a base",
                def.name
            )));
        }
        match self.bases.get_mut(&def.name) {
            Some(entry) => entry.def = def,
            None => {
                debug!(base = %def.name, tag_key = %def.tag_key, "defined base type");
                self.bases.insert(def.name.clone(), BaseEntry::new(def));
            }
        }
        Ok(self)
    }

    /// Records concrete subtypes for a base, defining the base with default
    /// settings if needed. Re-registering known subtypes is a no-op.
    ///
    /// Every subtype is checked before anything is written, so a rejected
    /// call leaves the registry (including an undefined base) untouched.
    pub fn register_subtypes(
        &mut self,
        base: &str,
        subtypes: impl IntoIterator<Item = Subtype>,
    ) -> MorphResult<&mut Self> {
        if self.types.contains_key(base) {
            return Err(reject(format!(
                "{base} is registered as a concrete type and cannot be a base"
            )));
        }
        let mut staged: Vec<Subtype> = Vec::new();
        for subtype in subtypes {
            if subtype.name.as_str() == base {
                return Err(reject(format!("{base} cannot be a subtype of itself")));
            }
            self.check_type(&subtype)?;
            match staged.iter().find(|s| s.name == subtype.name) {
                Some(earlier) if earlier.type_id != subtype.type_id => {
                    return Err(reject(format!(
                        "type name {} is used by two different Rust types",
                        subtype.name
                    )));
                }
                Some(_) => {}
                None => staged.push(subtype),
            }
        }

        if !self.bases.contains_key(base) {
            self.define_base(BaseTypeDef::new(base))?;
        }
        for subtype in staged {
            let name = subtype.name.clone();
            self.insert_type(subtype)?;
            let entry = self.base_entry_mut(base)?;
            if !entry.has_subtype(name.as_str()) {
                debug!(base, subtype = %name, "registered subtype");
                entry.subtypes.push(name);
            }
        }
        Ok(self)
    }

    /// Installs aliases for a base's subtypes.
    ///
    /// The whole map is checked before anything is written: every target must
    /// be a registered subtype, and aliases must stay one-to-one with
    /// subtypes. Repeating an existing alias → subtype pair is a no-op.
    pub fn set_morph_map<A, S>(
        &mut self,
        base: &str,
        map: impl IntoIterator<Item = (A, S)>,
    ) -> MorphResult<&mut Self>
    where
        A: Into<String>,
        S: Into<TypeName>,
    {
        let entry = self.base_entry(base)?;
        let mut staged: BTreeMap<Alias, TypeName> = BTreeMap::new();
        let mut staged_by_subtype: HashMap<TypeName, Alias> = HashMap::new();

        for (alias, subtype) in map {
            let alias = Alias::parse(&alias.into())
                .map_err(|e| reject(format!("invalid morph map for {base}: {e}")))?;
            let subtype: TypeName = subtype.into();

            if !entry.has_subtype(subtype.as_str()) {
                return Err(reject(format!(
                    "alias {alias:?} targets {subtype}, which is not a registered subtype of {base}"
                )));
            }
            let current = entry.aliases.get(&alias).or_else(|| staged.get(&alias));
            if let Some(current) = current.filter(|current| **current != subtype) {
                return Err(reject(format!(
                    "alias {alias:?} for {base} already maps to {current}, cannot map it to {subtype}"
                )));
            }
            let existing_alias = entry
                .alias_by_subtype
                .get(&subtype)
                .or_else(|| staged_by_subtype.get(&subtype));
            if let Some(existing) = existing_alias.filter(|existing| **existing != alias) {
                return Err(reject(format!(
                    "{subtype} already has alias {existing:?} under {base}, cannot add {alias:?}"
                )));
            }
            staged_by_subtype.insert(subtype.clone(), alias.clone());
            staged.insert(alias, subtype);
        }

        let entry = self.base_entry_mut(base)?;
        for (alias, subtype) in staged {
            debug!(base, alias = %alias, subtype = %subtype, "registered morph alias");
            entry.alias_by_subtype.insert(subtype.clone(), alias.clone());
            entry.aliases.insert(alias, subtype);
        }
        Ok(self)
    }

    /// When enabled, encoding a tagged subtype without an alias fails.
    pub fn enforce_morph_map(&mut self, enforce: bool) -> &mut Self {
        self.enforce_morph_map = enforce;
        self
    }

    pub fn enforces_morph_map(&self) -> bool {
        self.enforce_morph_map
    }

    pub fn set_single_subtype_policy(&mut self, policy: SingleSubtypePolicy) -> &mut Self {
        self.single_subtype = policy;
        self
    }

    pub fn single_subtype_policy(&self) -> SingleSubtypePolicy {
        self.single_subtype
    }

    /// Changes where a base stores its tag.
    pub fn set_tag_key(&mut self, base: &str, key: impl Into<String>) -> MorphResult<&mut Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(reject(format!("tag key for {base} must not be empty")));
        }
        self.base_entry_mut(base)?.def.tag_key = key;
        Ok(self)
    }

    /// Looks up the subtype an alias stands for.
    pub fn resolve_alias(&self, base: &str, alias: &str) -> Option<&TypeName> {
        self.bases.get(base)?.aliases.get(alias)
    }

    /// The alias of `subtype` under `base`, or the subtype's own name when
    /// none is registered.
    pub fn alias_for<'a>(&'a self, base: &str, subtype: &'a str) -> &'a str {
        self.bases
            .get(base)
            .and_then(|entry| entry.alias_by_subtype.get(subtype))
            .map_or(subtype, Alias::as_str)
    }

    /// The tag to write for `subtype`, honouring `enforce_morph_map`.
    pub fn tag_for(&self, base: &str, subtype: &str) -> MorphResult<String> {
        let entry = self.base_entry(base)?;
        if let Some(alias) = entry.alias_by_subtype.get(subtype) {
            return Ok(alias.to_string());
        }
        if self.enforce_morph_map {
            return Err(MorphError::configuration(format!(
                "morph map is enforced but {subtype} has no alias under {base}"
            )));
        }
        Ok(subtype.to_string())
    }

    pub fn is_base(&self, name: &str) -> bool {
        self.bases.contains_key(name)
    }

    pub fn base(&self, name: &str) -> Option<&BaseEntry> {
        self.bases.get(name)
    }

    /// A registered concrete type.
    pub fn subtype(&self, name: &str) -> Option<&Subtype> {
        self.types.get(name)
    }

    pub(crate) fn base_entry(&self, base: &str) -> MorphResult<&BaseEntry> {
        self.bases
            .get(base)
            .ok_or_else(|| MorphError::configuration(format!("{base} is not a registered base type")))
    }

    fn base_entry_mut(&mut self, base: &str) -> MorphResult<&mut BaseEntry> {
        self.bases
            .get_mut(base)
            .ok_or_else(|| MorphError::configuration(format!("{base} is not a registered base type")))
    }
}

fn reject(message: String) -> MorphError {
    warn!("{message}");
    MorphError::Configuration(message)
}
