//! Patching of the bootstrap script embedded into launch configurations
//!
//! The script is an array of tokens joined at deploy time. A token is either a literal
//! chunk of shell code or a structured reference, e.g. `{"Ref": "AWS::StackName"}`.
//! Patches locate their spot by literal markers, only string tokens are ever inspected
//! or changed, and the order of tokens is kept.
use serde_json::Value;

/// Start of the labels array in the Docker daemon config written by the script
pub const LABELS_MARKER: &str = r#""labels":["os=linux""#;

/// Line reserved for commands run after the Docker daemon started
pub const INIT_SENTINEL: &str = "# init-aws\n";

/// Edits of a bootstrap script
///
/// Every method is a no-op on empty input. Methods returning `bool` report
/// whether their anchor was found, a missing anchor is not an error.
pub trait ScriptPatcher {
    /// Add daemon labels right after the default `os=linux` label
    fn inject_labels(&mut self, labels: &[String]) -> bool;

    /// Replace the init sentinel line with the commands
    fn insert_commands(&mut self, commands: &[String]) -> bool;

    /// Add the commands as a single token at the very end
    fn append_commands(&mut self, commands: &[String]);

    /// Replace a token equal to `line` with `replacement`
    fn replace_line(&mut self, line: &str, replacement: &str) -> bool;
}

/// [`ScriptPatcher`] locating its anchors by literal string matching
pub struct MarkerScript<'a> {
    /// Name of the launch configuration, for logging
    resource: &'a str,

    tokens: &'a mut Vec<Value>,
}

impl<'a> MarkerScript<'a> {
    pub fn new(resource: &'a str, tokens: &'a mut Vec<Value>) -> Self {
        MarkerScript { resource, tokens }
    }

    pub fn tokens(&self) -> &[Value] {
        &self.tokens[..]
    }

    /// Index of the first string token matching the predicate
    fn find(&self, anchor: &str, matches: impl Fn(&str) -> bool) -> Option<usize> {
        let mut found = self
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| token.as_str().filter(|&s| matches(s)).map(|_| i));

        let first = found.next();

        if first.is_none() {
            log::debug!("{anchor:?} not found in the script of {}", self.resource);
        } else if found.next().is_some() {
            log::warn!(
                "{anchor:?} found more than once in the script of {}, patching the first one",
                self.resource
            );
        }

        first
    }
}

impl ScriptPatcher for MarkerScript<'_> {
    fn inject_labels(&mut self, labels: &[String]) -> bool {
        if labels.is_empty() {
            return false;
        }

        let Some(i) = self.find(LABELS_MARKER, |s| s.contains(LABELS_MARKER)) else {
            return false;
        };

        let labels = labels
            .iter()
            .map(|label| format!("\"{label}\""))
            .collect::<Vec<String>>()
            .join(",");

        if let Value::String(token) = &mut self.tokens[i] {
            *token = token.replacen(LABELS_MARKER, &format!("{LABELS_MARKER},{labels}"), 1);
        }

        log::debug!("Injected labels {labels} into {}", self.resource);
        true
    }

    fn insert_commands(&mut self, commands: &[String]) -> bool {
        if commands.is_empty() {
            return false;
        }

        let Some(i) = self.find(INIT_SENTINEL, |s| s == INIT_SENTINEL) else {
            return false;
        };

        self.tokens[i] = Value::String(commands.concat());
        log::debug!("Inserted {} command(s) into {}", commands.len(), self.resource);
        true
    }

    fn append_commands(&mut self, commands: &[String]) {
        if commands.is_empty() {
            return;
        }

        self.tokens.push(Value::String(commands.concat()));
        log::debug!("Appended {} command(s) to {}", commands.len(), self.resource);
    }

    fn replace_line(&mut self, line: &str, replacement: &str) -> bool {
        let Some(i) = self.find(line, |s| s == line) else {
            return false;
        };

        self.tokens[i] = Value::String(replacement.to_string());
        true
    }
}
