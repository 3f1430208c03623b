use crate::error::{ModelError, ModelResult};
use crate::validate::Validatable;
use datacast_types::{Payload, TypeName, into_payload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// Object-safe view of a Data object.
///
/// Codecs and casts hold `Box<dyn Data>` because the concrete subtype is
/// only known after morph resolution. Every [`DataObject`] implements this
/// automatically.
pub trait Data: Any + fmt::Debug + Send + Sync {
    /// Canonical identifier of the concrete type.
    fn type_name(&self) -> TypeName;

    /// Extracts the instance into a flat property mapping.
    fn extract(&self) -> ModelResult<Payload>;

    /// Runs the type's validation rules.
    fn validate_data(&self) -> ModelResult<()>;

    /// Deep equality against another Data object of any type.
    fn data_eq(&self, other: &dyn Data) -> bool;

    fn clone_data(&self) -> Box<dyn Data>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Data {
    /// True if the concrete type is `T`.
    pub fn is<T: Data>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Data>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for dyn Data {
    fn eq(&self, other: &Self) -> bool {
        self.data_eq(other)
    }
}

impl Clone for Box<dyn Data> {
    fn clone(&self) -> Self {
        self.clone_data()
    }
}

/// A typed Data object.
///
/// Implementors are plain serde structs with a stable [`TYPE_NAME`]. The
/// name is what ends up in stored tags when no alias is registered, so it
/// must not change once data has been written.
///
/// [`TYPE_NAME`]: DataObject::TYPE_NAME
pub trait DataObject:
    Serialize + DeserializeOwned + fmt::Debug + Clone + PartialEq + Validatable + Send + Sync + 'static
{
    const TYPE_NAME: &'static str;

    /// Builds an instance from a property mapping. Unknown keys are ignored
    /// unless the type denies them.
    fn hydrate(payload: &Payload) -> ModelResult<Self> {
        serde_path_to_error::deserialize(Value::Object(payload.clone()))
            .map_err(|e| ModelError::hydration(Self::TYPE_NAME, e))
    }

    /// Mapping of an instance whose fields all hold their default value.
    fn empty_payload() -> ModelResult<Payload>
    where
        Self: Default,
    {
        Self::default().extract()
    }
}

impl<T: DataObject> Data for T {
    fn type_name(&self) -> TypeName {
        TypeName::new(T::TYPE_NAME)
    }

    fn extract(&self) -> ModelResult<Payload> {
        let value = serde_json::to_value(self).map_err(|e| ModelError::Extraction {
            type_name: T::TYPE_NAME.to_string(),
            message: e.to_string(),
        })?;
        into_payload(value).map_err(|e| ModelError::Extraction {
            type_name: T::TYPE_NAME.to_string(),
            message: e.to_string(),
        })
    }

    fn validate_data(&self) -> ModelResult<()> {
        self.validate().map_err(|errors| ModelError::Validation {
            type_name: T::TYPE_NAME.to_string(),
            errors,
        })
    }

    fn data_eq(&self, other: &dyn Data) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
