use crate::error::Result;
use crate::template::{Section, Template};
use serde_json::Value;

/// Deep copy of a named parameter or resource
///
/// The copy shares nothing with the template, so it can be modified and inserted
/// under another name later on.
pub fn clone_node(template: &Template, section: Section, source: &str) -> Result<Value> {
    let node = template.node(section, source)?.clone();
    log::debug!("Cloned {}.{source}", section.key());
    Ok(node)
}

pub fn clone_parameter(template: &Template, source: &str) -> Result<Value> {
    clone_node(template, Section::Parameters, source)
}

pub fn clone_resource(template: &Template, source: &str) -> Result<Value> {
    clone_node(template, Section::Resources, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Kind};
    use serde_json::json;

    fn template() -> Template {
        Template::new(json!({
            "Parameters": {"InstanceType": {"Type": "String", "Default": "t2.micro"}},
            "Resources": {
                "NodeLaunchConfig": {
                    "Type": "AWS::AutoScaling::LaunchConfiguration",
                    "Properties": {"InstanceType": {"Ref": "InstanceType"}}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_clone_is_independent() {
        let template = template();
        let mut copy = clone_resource(&template, "NodeLaunchConfig").unwrap();

        copy["Properties"]["InstanceType"] = json!({"Ref": "InfraWorkerInstanceType"});

        assert_eq!(
            template.resource("NodeLaunchConfig").unwrap()["Properties"]["InstanceType"]["Ref"],
            "InstanceType"
        );
    }

    #[test]
    fn test_clone_parameter() {
        let copy = clone_parameter(&template(), "InstanceType").unwrap();
        assert_eq!(copy["Default"], "t2.micro");
    }

    #[test]
    fn test_clone_missing_node() {
        assert_eq!(
            clone_parameter(&template(), "ClusterSize"),
            Err(Error::not_found(Kind::Parameter, "ClusterSize"))
        );

        // Sections are not mixed up
        assert_eq!(
            clone_resource(&template(), "InstanceType"),
            Err(Error::not_found(Kind::Resource, "InstanceType"))
        );
    }
}
