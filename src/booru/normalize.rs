// Response normalization — collapse the API's shape variations into lists.
//
// Upstream may answer with null, a bare array, an object keyed by the
// resource name, the same key holding a single object instead of a list,
// or a pluralized key. All of those collapse here into one canonical
// `Vec<T>`; anything unrecognizable becomes an empty list with a logged
// warning. Nothing past this module ever sees a raw body.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Which resource a response is expected to carry. Determines the
/// expected object key and its pluralized alias.
#[derive(Debug, Clone, Copy)]
pub enum Resource {
    Post,
    Tag,
    Comment,
}

impl Resource {
    fn key(&self) -> &'static str {
        match self {
            Resource::Post => "post",
            Resource::Tag => "tag",
            Resource::Comment => "comment",
        }
    }

    fn plural_key(&self) -> &'static str {
        match self {
            Resource::Post => "posts",
            Resource::Tag => "tags",
            Resource::Comment => "comments",
        }
    }
}

/// Reduce a response body to the list of raw records for `resource`.
///
/// The rules, in order:
/// 1. `null` (or a missing key) is zero results.
/// 2. A bare top-level array is already the list.
/// 3. An object is looked up by the resource key, then the plural alias.
/// 4. A single object under the key wraps into a one-element list.
/// 5. Everything else is zero results, logged, never an error.
pub fn records(body: Value, resource: Resource) -> Vec<Value> {
    match body {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let inner = map
                .remove(resource.key())
                .or_else(|| map.remove(resource.plural_key()));
            match inner {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(obj @ Value::Object(_)) => vec![obj],
                Some(other) => {
                    warn!(
                        resource = resource.key(),
                        found = %value_kind(&other),
                        "unexpected value under resource key, treating as empty"
                    );
                    Vec::new()
                }
            }
        }
        other => {
            warn!(
                resource = resource.key(),
                found = %value_kind(&other),
                "unexpected response shape, treating as empty"
            );
            Vec::new()
        }
    }
}

/// Decode each record, dropping the ones that don't fit the model.
/// A malformed record costs one entry, never the whole response.
pub fn decode_records<T: DeserializeOwned>(resource: Resource, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    resource = resource.key(),
                    error = %err,
                    "skipping undecodable record"
                );
                None
            }
        })
        .collect()
}

/// Normalize and decode in one step.
pub fn decode<T: DeserializeOwned>(body: Value, resource: Resource) -> Vec<T> {
    decode_records(resource, records(body, resource))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
