//! Symbolic references between template nodes
//!
//! A reference is one of:
//! - `{"Ref": "Name"}`
//! - `{"Fn::GetAtt": ["Name", "Attribute"]}` or `{"Fn::GetAtt": "Name.Attribute"}`
//! - `"DependsOn": "Name"` or `"DependsOn": ["Name", ...]` on a resource
use serde_json::Value;

const REF: &str = "Ref";
const GET_ATT: &str = "Fn::GetAtt";
const DEPENDS_ON: &str = "DependsOn";

/// Prefix of pseudo parameters, which resolve without being declared
pub const PSEUDO_PREFIX: &str = "AWS::";

/// Point every reference to `from` inside of `node` at `to`
///
/// The shape of a reference never changes, only the name it carries. Plain strings
/// that happen to equal `from` are left alone. Returns the number of rewritten references.
pub fn rewrite_references(node: &mut Value, from: &str, to: &str) -> usize {
    match node {
        Value::Array(items) => items
            .iter_mut()
            .map(|item| rewrite_references(item, from, to))
            .sum(),

        Value::Object(map) => {
            let is_wrapper = map.len() == 1;

            map.iter_mut()
                .map(|(key, value)| match (key.as_str(), value) {
                    (REF, Value::String(target)) if is_wrapper => rename(target, from, to),

                    (GET_ATT, Value::Array(args)) if is_wrapper => {
                        let mut args = args.iter_mut();

                        let head = match args.next() {
                            Some(Value::String(target)) => rename(target, from, to),
                            Some(other) => rewrite_references(other, from, to),
                            None => 0,
                        };

                        head + args
                            .map(|arg| rewrite_references(arg, from, to))
                            .sum::<usize>()
                    }

                    (GET_ATT, Value::String(path)) if is_wrapper => match path.split_once('.') {
                        Some((target, attribute)) if target == from => {
                            *path = format!("{to}.{attribute}");
                            1
                        }
                        _ => 0,
                    },

                    (DEPENDS_ON, Value::String(target)) => rename(target, from, to),

                    (DEPENDS_ON, Value::Array(targets)) => targets
                        .iter_mut()
                        .map(|target| match target {
                            Value::String(target) => rename(target, from, to),
                            _ => 0,
                        })
                        .sum(),

                    (_, value) => rewrite_references(value, from, to),
                })
                .sum()
        }

        _ => 0,
    }
}

fn rename(target: &mut String, from: &str, to: &str) -> usize {
    if target != from {
        return 0;
    }

    *target = to.to_string();
    1
}

/// Names of all nodes referenced from inside of `node`, in document order
///
/// Pseudo parameters (e.g. `AWS::StackName`) are included as is.
pub fn collect_references(node: &Value) -> Vec<String> {
    let mut names = Vec::new();
    collect_into(node, &mut names);
    names
}

fn collect_into(node: &Value, names: &mut Vec<String>) {
    match node {
        Value::Array(items) => items.iter().for_each(|item| collect_into(item, names)),

        Value::Object(map) => {
            let is_wrapper = map.len() == 1;

            for (key, value) in map {
                match (key.as_str(), value) {
                    (REF, Value::String(target)) if is_wrapper => names.push(target.clone()),

                    (GET_ATT, Value::Array(args)) if is_wrapper => {
                        for (i, arg) in args.iter().enumerate() {
                            match arg {
                                Value::String(target) if i == 0 => names.push(target.clone()),
                                other => collect_into(other, names),
                            }
                        }
                    }

                    (GET_ATT, Value::String(path)) if is_wrapper => {
                        if let Some((target, _)) = path.split_once('.') {
                            names.push(target.to_string());
                        }
                    }

                    (DEPENDS_ON, Value::String(target)) => names.push(target.clone()),

                    (DEPENDS_ON, Value::Array(targets)) => {
                        names.extend(targets.iter().filter_map(|t| t.as_str()).map(String::from))
                    }

                    (_, value) => collect_into(value, names),
                }
            }
        }

        _ => {}
    }
}
