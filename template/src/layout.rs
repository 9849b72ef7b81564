use serde::{Deserialize, Serialize};

/// Naming conventions of the base template
///
/// Defaults match the Docker for AWS templates. Every field can be overridden
/// from the config file, missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Layout {
    /// JSON pointer to the version string, e.g. "17.05.0-ce"
    pub version_pointer: String,

    /// Parameter sizing the base worker pool
    pub cluster_size: String,

    /// Parameter holding the instance type of the base worker pool
    pub instance_type: String,

    /// Other parameters of the base pool, copied to `{Name}{Parameter}` if present
    pub companion_parameters: Vec<String>,

    /// Autoscaling group of the base worker pool
    pub node_asg: String,

    /// Launch configuration of the base worker pool, without the version suffix
    pub node_launch_config: String,

    pub manager_asg: String,

    /// Launch configuration of the managers, without the version suffix
    pub manager_launch_config: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            version_pointer: "/Mappings/DockerForAWS/version/forAws".into(),
            cluster_size: "ClusterSize".into(),
            instance_type: "InstanceType".into(),
            companion_parameters: vec!["WorkerDiskSize".into(), "WorkerDiskType".into()],
            node_asg: "NodeAsg".into(),
            node_launch_config: "NodeLaunchConfig".into(),
            manager_asg: "ManagerAsg".into(),
            manager_launch_config: "ManagerLaunchConfig".into(),
        }
    }
}
