use crate::error::{Error, Kind, Result};
use crate::layout::Layout;
use crate::script::MarkerScript;
use serde_json::{Map, Value};

/// Location of the tokenized bootstrap script inside of a launch configuration
const SCRIPT_POINTER: &str = "/Properties/UserData/Fn::Base64/Fn::Join/1";

/// Top level sections holding named nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Parameters,
    Resources,
}

impl Section {
    pub fn key(&self) -> &'static str {
        match self {
            Section::Parameters => "Parameters",
            Section::Resources => "Resources",
        }
    }

    fn kind(&self) -> Kind {
        match self {
            Section::Parameters => Kind::Parameter,
            Section::Resources => Kind::Resource,
        }
    }
}

/// Working revision of a CloudFormation template
///
/// Owns the document for the whole run. Overlays mutate it in place, one after another.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    document: Value,
}

impl Template {
    pub fn new(document: Value) -> Result<Self> {
        match document {
            Value::Null => Err(Error::MissingTemplate),
            Value::Object(_) => Ok(Template { document }),
            _ => Err(Error::not_found(Kind::Location, "template root object")),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }

    fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        self.document.get(section.key()).and_then(Value::as_object)
    }

    fn section_mut(&mut self, section: Section) -> Result<&mut Map<String, Value>> {
        self.document
            .get_mut(section.key())
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::not_found(Kind::Location, section.key()))
    }

    /// A named parameter or resource
    pub fn node(&self, section: Section, name: &str) -> Result<&Value> {
        self.section(section)
            .and_then(|nodes| nodes.get(name))
            .ok_or_else(|| Error::not_found(section.kind(), name))
    }

    pub fn contains(&self, section: Section, name: &str) -> bool {
        self.section(section)
            .is_some_and(|nodes| nodes.contains_key(name))
    }

    /// Names of all nodes in a section, in document order
    pub fn names(&self, section: Section) -> impl Iterator<Item = &str> {
        self.section(section)
            .into_iter()
            .flat_map(|nodes| nodes.keys().map(String::as_str))
    }

    pub fn parameter(&self, name: &str) -> Result<&Value> {
        self.node(Section::Parameters, name)
    }

    pub fn resource(&self, name: &str) -> Result<&Value> {
        self.node(Section::Resources, name)
    }

    /// Insert a batch of nodes, replacing existing ones with the same names
    ///
    /// Either every node gets inserted or none, the sections are checked upfront.
    pub(crate) fn insert_all(&mut self, nodes: Vec<(Section, String, Value)>) -> Result<()> {
        for (section, _, _) in nodes.iter() {
            self.section_mut(*section)?;
        }

        for (section, name, node) in nodes {
            self.section_mut(section)?.insert(name, node);
        }

        Ok(())
    }

    /// Version string with all dots and dashes removed, e.g. "17.05.0-ce" -> "17050ce"
    ///
    /// Appended to the names of launch configurations.
    pub fn version_suffix(&self, layout: &Layout) -> Result<String> {
        let version = self
            .document
            .pointer(&layout.version_pointer)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::not_found(Kind::Location, layout.version_pointer.as_str()))?;

        Ok(version_suffix(version))
    }

    pub fn auto_scaling_group<'a>(&'a mut self, name: &'a str) -> Result<AutoScalingGroup<'a>> {
        let node = self
            .section_mut(Section::Resources)?
            .get_mut(name)
            .ok_or_else(|| Error::not_found(Kind::Resource, name))?;

        Ok(AutoScalingGroup::new(name, node))
    }

    pub fn launch_config<'a>(&'a mut self, name: &'a str) -> Result<LaunchConfig<'a>> {
        let node = self
            .section_mut(Section::Resources)?
            .get_mut(name)
            .ok_or_else(|| Error::not_found(Kind::Resource, name))?;

        Ok(LaunchConfig::new(name, node))
    }
}

pub fn version_suffix(version: &str) -> String {
    version.replace(['.', '-'], "")
}

/// A resource in the role of an autoscaling group
pub struct AutoScalingGroup<'a> {
    name: &'a str,
    node: &'a mut Value,
}

impl<'a> AutoScalingGroup<'a> {
    pub fn new(name: &'a str, node: &'a mut Value) -> Self {
        AutoScalingGroup { name, node }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// The `Properties.Tags` list
    pub fn tags_mut(&mut self) -> Result<&mut Vec<Value>> {
        let name = self.name;

        self.node
            .pointer_mut("/Properties/Tags")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| Error::not_found(Kind::Location, format!("{name}.Properties.Tags")))
    }
}

/// A resource in the role of a launch configuration
pub struct LaunchConfig<'a> {
    name: &'a str,
    node: &'a mut Value,
}

impl<'a> LaunchConfig<'a> {
    pub fn new(name: &'a str, node: &'a mut Value) -> Self {
        LaunchConfig { name, node }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn has_script(&self) -> bool {
        self.node
            .pointer(SCRIPT_POINTER)
            .is_some_and(Value::is_array)
    }

    /// The bootstrap script from `Properties.UserData`, ready to be patched
    pub fn script(&mut self) -> Result<MarkerScript<'_>> {
        let name = self.name;

        let tokens = self
            .node
            .pointer_mut(SCRIPT_POINTER)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| Error::not_found(Kind::Location, format!("{name}.Properties.UserData")))?;

        Ok(MarkerScript::new(name, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptPatcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template() -> Template {
        Template::new(json!({
            "Mappings": {"DockerForAWS": {"version": {"forAws": "17.05.0-ce"}}},
            "Parameters": {"ClusterSize": {"Type": "Number", "Default": "5"}},
            "Resources": {
                "NodeAsg": {"Properties": {"Tags": []}},
                "NodeLaunchConfig17050ce": {
                    "Properties": {
                        "UserData": {"Fn::Base64": {"Fn::Join": ["", ["#!/bin/sh\n"]]}}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_template() {
        assert_eq!(Template::new(Value::Null), Err(Error::MissingTemplate));
    }

    #[test]
    fn test_version_suffix() {
        assert_eq!(version_suffix("17.05.0-ce"), "17050ce");
        assert_eq!(version_suffix("18.03.0-ce-aws1"), "18030ceaws1");
        assert_eq!(template().version_suffix(&Layout::default()).unwrap(), "17050ce");
    }

    #[test]
    fn test_version_suffix_missing() {
        let template = Template::new(json!({"Resources": {}})).unwrap();

        assert_eq!(
            template.version_suffix(&Layout::default()),
            Err(Error::not_found(
                Kind::Location,
                "/Mappings/DockerForAWS/version/forAws"
            ))
        );
    }

    #[test]
    fn test_node_lookup() {
        let template = template();

        assert_eq!(template.parameter("ClusterSize").unwrap()["Default"], "5");
        assert!(template.contains(Section::Resources, "NodeAsg"));
        assert!(!template.contains(Section::Parameters, "NodeAsg"));
        assert_eq!(
            template.resource("ManagerAsg"),
            Err(Error::not_found(Kind::Resource, "ManagerAsg"))
        );
        assert_eq!(
            template.names(Section::Resources).collect::<Vec<_>>(),
            vec!["NodeAsg", "NodeLaunchConfig17050ce"]
        );
    }

    #[test]
    fn test_typed_handles() {
        let mut template = template();
        template
            .auto_scaling_group("NodeAsg")
            .unwrap()
            .tags_mut()
            .unwrap()
            .push(json!({"Key": "a"}));

        template
            .launch_config("NodeLaunchConfig17050ce")
            .unwrap()
            .script()
            .unwrap()
            .append_commands(&["echo hi\n".to_string()]);

        assert_eq!(
            template.resource("NodeAsg").unwrap()["Properties"]["Tags"],
            json!([{"Key": "a"}])
        );
        assert_eq!(
            template.as_value().pointer(&format!("/Resources/NodeLaunchConfig17050ce{SCRIPT_POINTER}")),
            Some(&json!(["#!/bin/sh\n", "echo hi\n"]))
        );
    }

    #[test]
    fn test_handles_report_missing_locations() {
        let mut template = template();
        let mut node = json!({"Properties": {}});

        assert!(template.auto_scaling_group("Missing").is_err());
        assert_eq!(
            AutoScalingGroup::new("Bare", &mut node).tags_mut().err(),
            Some(Error::not_found(Kind::Location, "Bare.Properties.Tags"))
        );
        assert!(!LaunchConfig::new("Bare", &mut node).has_script());
    }
}
