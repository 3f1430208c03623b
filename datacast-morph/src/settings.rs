//! Declarative morph settings loaded from TOML.
//!
//! ```toml
//! enforce_morph_map = true
//! single_subtype = "require_tag"
//!
//! [bases."shapes::Shape"]
//! tag_key = "kind"
//!
//! [bases."shapes::Shape".morph_map]
//! c = "shapes::Circle"
//! s = "shapes::Square"
//! ```
//!
//! Subtypes are Rust types and are always registered in code; settings only
//! configure what already exists.

use crate::error::{MorphError, MorphResult};
use crate::registry::{SingleSubtypePolicy, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Registry-wide settings plus per-base overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MorphSettings {
    pub enforce_morph_map: bool,
    pub single_subtype: SingleSubtypePolicy,
    /// Keyed by base type name.
    pub bases: BTreeMap<String, BaseSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseSettings {
    pub tag_key: Option<String>,
    /// Alias to subtype name.
    pub morph_map: BTreeMap<String, String>,
}

impl MorphSettings {
    pub fn from_toml_str(source: &str) -> MorphResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Applies the settings to a registry whose bases and subtypes are
    /// already registered.
    ///
    /// Every base named here must exist. The settings are applied to a copy
    /// that replaces `registry` only once every step has succeeded, so a
    /// rejected alias in any base leaves the registry exactly as it was.
    pub fn apply(&self, registry: &mut TypeRegistry) -> MorphResult<()> {
        if let Some(missing) = self.bases.keys().find(|base| !registry.is_base(base)) {
            return Err(MorphError::configuration(format!(
                "settings configure {missing}, which is not a registered base type"
            )));
        }

        let mut staged = registry.clone();
        for (base, settings) in &self.bases {
            if let Some(tag_key) = &settings.tag_key {
                staged.set_tag_key(base, tag_key.as_str())?;
            }
            if !settings.morph_map.is_empty() {
                staged.set_morph_map(
                    base,
                    settings
                        .morph_map
                        .iter()
                        .map(|(alias, subtype)| (alias.as_str(), subtype.as_str())),
                )?;
            }
            debug!(base = %base, aliases = settings.morph_map.len(), "applied base settings");
        }
        staged
            .enforce_morph_map(self.enforce_morph_map)
            .set_single_subtype_policy(self.single_subtype);

        *registry = staged;
        Ok(())
    }
}
