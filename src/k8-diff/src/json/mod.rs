mod diff;

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use crate::Changes;
use crate::Diff;
use crate::DiffError;

pub type JsonDiff = Diff<Value, PatchObject>;

/// key used to match items of a list, kubeconfig lists are keyed by name
pub const LIST_TAG: &str = "name";

/// changes keyed by object key, or by list tag for merges
#[derive(Debug, Default)]
pub struct PatchObject(BTreeMap<String, JsonDiff>);

impl PatchObject {
    pub fn get_inner_ref(&self) -> &BTreeMap<String, JsonDiff> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn diff(old: &Map<String, Value>, new: &Map<String, Value>) -> Result<Self, DiffError> {
        let mut map = BTreeMap::new();

        for (key, new_val) in new.iter() {
            match old.get(key) {
                Some(old_val) => {
                    if old_val != new_val {
                        trace!("key: {} changed", key);
                        map.insert(key.clone(), old_val.diff(new_val)?);
                    }
                }
                None => {
                    trace!("key: {} added", key);
                    map.insert(key.clone(), Diff::Add(new_val.clone()));
                }
            }
        }

        for (key, old_val) in old.iter() {
            if !new.contains_key(key) {
                trace!("key: {} removed", key);
                map.insert(key.clone(), Diff::Delete(old_val.clone()));
            }
        }

        Ok(Self(map))
    }

    /// diff two lists whose items all carry a string tag.
    /// returns None when either list is not tagged
    fn diff_tagged(old: &[Value], new: &[Value]) -> Result<Option<Self>, DiffError> {
        let (old_items, new_items) = match (index_by_tag(old)?, index_by_tag(new)?) {
            (Some(old_items), Some(new_items)) => (old_items, new_items),
            _ => return Ok(None),
        };

        let mut map = BTreeMap::new();

        for (tag, new_val) in new_items.iter() {
            match old_items.get(tag) {
                Some(old_val) => {
                    let change = old_val.diff(new_val)?;
                    if !change.is_none() {
                        map.insert(tag.to_string(), change);
                    }
                }
                None => {
                    map.insert(tag.to_string(), Diff::Add((*new_val).clone()));
                }
            }
        }

        for (tag, old_val) in old_items.iter() {
            if !new_items.contains_key(tag) {
                map.insert(tag.to_string(), Diff::Delete((*old_val).clone()));
            }
        }

        Ok(Some(Self(map)))
    }
}

fn index_by_tag(items: &[Value]) -> Result<Option<BTreeMap<&str, &Value>>, DiffError> {
    let mut index = BTreeMap::new();
    for item in items {
        let tag = match item.get(LIST_TAG).and_then(Value::as_str) {
            Some(tag) => tag,
            None => return Ok(None),
        };
        if index.insert(tag, item).is_some() {
            return Err(DiffError::DuplicateTag(tag.to_owned()));
        }
    }
    Ok(Some(index))
}
