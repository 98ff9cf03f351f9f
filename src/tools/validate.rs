//! Schema-checked tool arguments.
//!
//! [`Validated<T>`] deserializes tool arguments in two steps: the raw JSON is
//! first checked against the JSON schema generated for `T`, then `T`'s own
//! [`ValidateInput`] rules run. Either failure becomes
//! [`UpstashError::InvalidInput`] naming the offending field, so no handler
//! (and no request) ever sees malformed input.

use crate::error::{UpstashError, UpstashResult};
use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Semantic checks that a JSON schema cannot express.
pub trait ValidateInput {
    fn validate(&self) -> UpstashResult<()> {
        Ok(())
    }
}

/// Tool arguments that passed schema and semantic validation.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T>
where
    T: DeserializeOwned + JsonSchema + ValidateInput + 'static,
{
    /// Validate raw arguments and deserialize them.
    pub fn parse(value: JsonValue) -> UpstashResult<T> {
        let validator = validator_for::<T>()?;
        if let Some(err) = validator.iter_errors(&value).next() {
            let field = match &err.kind {
                ValidationErrorKind::Required { property } => property
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| property.to_string()),
                _ => field_from_path(&err.instance_path.to_string()),
            };
            return Err(UpstashError::invalid_input(field, err.to_string()));
        }

        let input: T = serde_json::from_value(value)
            .map_err(|e| UpstashError::invalid_input("arguments", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

}

impl<'de, T> Deserialize<'de> for Validated<T>
where
    T: DeserializeOwned + JsonSchema + ValidateInput + 'static,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::parse(value).map(Validated).map_err(D::Error::custom)
    }
}

impl<T: JsonSchema> JsonSchema for Validated<T> {
    fn inline_schema() -> bool {
        T::inline_schema()
    }

    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

/// Reject empty or whitespace-only strings.
pub fn require_non_blank(field: &str, value: &str) -> UpstashResult<()> {
    if value.trim().is_empty() {
        Err(UpstashError::invalid_input(field, "must not be blank"))
    } else {
        Ok(())
    }
}

/// Reject identifiers that are blank or could alter a request path.
pub fn require_id(field: &str, value: &str) -> UpstashResult<()> {
    require_non_blank(field, value)?;
    let id = value.trim();
    if id == "." || id == ".." {
        return Err(UpstashError::invalid_input(
            field,
            format!("'{id}' is not a valid identifier"),
        ));
    }
    if id.contains(['/', '\\']) {
        return Err(UpstashError::invalid_input(field, "must not contain '/' or '\\'"));
    }
    Ok(())
}

fn field_from_path(path: &str) -> String {
    let field = path.trim_start_matches('/');
    if field.is_empty() {
        "arguments".to_string()
    } else {
        field.to_string()
    }
}

type ValidatorCache = RwLock<HashMap<TypeId, Arc<Validator>>>;

fn validator_for<T: JsonSchema + 'static>() -> UpstashResult<Arc<Validator>> {
    static CACHE: OnceLock<ValidatorCache> = OnceLock::new();
    let cache = CACHE.get_or_init(Default::default);
    let key = TypeId::of::<T>();

    if let Some(validator) = cache.read().ok().and_then(|c| c.get(&key).cloned()) {
        return Ok(validator);
    }

    let schema = schemars::schema_for!(T);
    let validator = jsonschema::validator_for(schema.as_value()).map_err(|e| {
        UpstashError::internal(format!("invalid schema for {}: {e}", T::schema_name()))
    })?;
    let validator = Arc::new(validator);
    if let Ok(mut c) = cache.write() {
        c.insert(key, validator.clone());
    }
    Ok(validator)
}
