use std::fmt::Write;

use serde_json::Value;

use crate::Diff;
use crate::JsonDiff;

const MASK: &str = "<redacted>";

/// Render diff as text, one line per changed leaf.
///
/// Object keys are joined with `.`, items of tagged lists are addressed as `list[name]`.
/// Added leaves are prefixed with `+`, removed ones with `-`; a replaced value shows both.
/// Returns an empty string when there is no change.
pub fn render(diff: &JsonDiff) -> String {
    render_masked(diff, &[])
}

/// Same as [`render`] but values of leaves whose key is in `masked` are hidden.
pub fn render_masked(diff: &JsonDiff, masked: &[&str]) -> String {
    let mut renderer = Renderer {
        out: String::new(),
        masked,
    };
    renderer.write_diff("", None, diff);
    renderer.out
}

struct Renderer<'a> {
    out: String,
    masked: &'a [&'a str],
}

impl Renderer<'_> {
    fn write_diff(&mut self, path: &str, key: Option<&str>, diff: &JsonDiff) {
        match diff {
            Diff::None => {}
            Diff::Add(value) => self.write_leaves('+', path, key, value),
            Diff::Delete(value) => self.write_leaves('-', path, key, value),
            Diff::Replace { old, new } => {
                self.write_leaves('-', path, key, old);
                self.write_leaves('+', path, key, new);
            }
            Diff::Patch(patch) => {
                for (child, change) in patch.get_inner_ref() {
                    self.write_diff(&child_path(path, child), Some(child), change);
                }
            }
            Diff::Merge(patch) => {
                for (tag, change) in patch.get_inner_ref() {
                    self.write_diff(&format!("{}[{}]", path, tag), None, change);
                }
            }
        }
    }

    fn write_leaves(&mut self, sign: char, path: &str, key: Option<&str>, value: &Value) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (child, value) in map {
                    self.write_leaves(sign, &child_path(path, child), Some(child), value);
                }
            }
            _ => {
                let path = if path.is_empty() { "." } else { path };
                let masked = key.map_or(false, |key| self.masked.contains(&key));
                // writing into a String can't fail
                let _ = if masked {
                    writeln!(self.out, "{} {}: {}", sign, path, MASK)
                } else {
                    writeln!(self.out, "{} {}: {}", sign, path, value)
                };
            }
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{}.{}", parent, key)
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::render;
    use super::render_masked;
    use crate::Changes;

    #[test]
    fn test_render_no_change() {
        let config = json!({ "kind": "Config" });
        let diff = config.diff(&config.clone()).expect("diff");
        assert_eq!(render(&diff), "");
    }

    #[test]
    fn test_render_exec_added() {
        //given
        let old_config = json!({
            "users": [
                { "name": "user1", "user": { "token": "hoge" } }
            ]
        });
        let new_config = json!({
            "users": [
                {
                    "name": "user1",
                    "user": {
                        "exec": {
                            "apiVersion": "client.authentication.k8s.io/v1beta1",
                            "args": ["credentials-broker"],
                            "command": "kubectl",
                            "provideClusterInfo": false
                        }
                    }
                }
            ]
        });

        //when
        let diff = old_config.diff(&new_config).expect("diff");

        //then
        assert_eq!(
            render(&diff),
            r#"+ users[user1].user.exec.apiVersion: "client.authentication.k8s.io/v1beta1"
+ users[user1].user.exec.args: ["credentials-broker"]
+ users[user1].user.exec.command: "kubectl"
+ users[user1].user.exec.provideClusterInfo: false
- users[user1].user.token: "hoge"
"#
        );
    }

    #[test]
    fn test_render_replace() {
        let old_config = json!({ "current-context": "context1" });
        let new_config = json!({ "current-context": "context2" });

        let diff = old_config.diff(&new_config).expect("diff");

        assert_eq!(
            render(&diff),
            "- current-context: \"context1\"\n+ current-context: \"context2\"\n"
        );
    }

    #[test]
    fn test_render_masked_secrets() {
        //given
        let old_config = json!({
            "users": [
                { "name": "user1", "user": { "token": "hoge", "password": "secret" } }
            ]
        });
        let new_config = json!({
            "users": [
                { "name": "user1", "user": { "client-key-data": "a2V5", "username": "admin" } }
            ]
        });

        //when
        let diff = old_config.diff(&new_config).expect("diff");
        let text = render_masked(&diff, &["token", "client-key-data", "password"]);

        //then
        assert_eq!(
            text,
            r#"+ users[user1].user.client-key-data: <redacted>
- users[user1].user.password: <redacted>
- users[user1].user.token: <redacted>
+ users[user1].user.username: "admin"
"#
        );
        assert!(!text.contains("hoge"));
        assert!(!text.contains("secret"));
    }
}
