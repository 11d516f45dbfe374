use serde_json::Value;

use super::JsonDiff;
use super::PatchObject;
use crate::Changes;
use crate::Diff;
use crate::DiffError;

impl Changes for Value {
    type Replace = Value;
    type Patch = PatchObject;

    fn diff(&self, new: &Self) -> Result<JsonDiff, DiffError> {
        if *self == *new {
            return Ok(Diff::None);
        }
        match (self, new) {
            (Value::Null, _) => Ok(Diff::Add(new.clone())),
            (_, Value::Null) => Ok(Diff::Delete(self.clone())),
            (Value::Object(old_val), Value::Object(new_val)) => {
                Ok(Diff::Patch(PatchObject::diff(old_val, new_val)?))
            }
            (Value::Array(old_val), Value::Array(new_val)) => {
                match PatchObject::diff_tagged(old_val, new_val)? {
                    Some(patch) => Ok(Diff::Merge(patch)),
                    None => Ok(Diff::Replace {
                        old: self.clone(),
                        new: new.clone(),
                    }),
                }
            }
            _ => Ok(Diff::Replace {
                old: self.clone(),
                new: new.clone(),
            }),
        }
    }
}
