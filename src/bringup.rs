use crate::descriptor::{ExitPolicy, LaunchDescriptor, OutputSink, ProcessSpec};
use crate::error::Result;
use crate::resolve::AmentIndex;
use std::path::PathBuf;

/// Map file shipped with this package, used when `--map` is not given.
const DEFAULT_MAP_FILE: &str = "playground.yaml";

/// Build the turtlebot navigation bringup descriptor: a ROS1/ROS2 protocol
/// bridge, a depth-image-to-laserscan converter, a joystick driver, a
/// joystick teleop node, a map server, and the AMCL localization node.
///
/// Topic remappings and restart policies mirror the stack this bringup was
/// written for: every long-running node is relaunched on exit, while the
/// map server serves its map once and stays down if it fails. The bridge
/// and AMCL relay their console output live.
pub fn bringup_descriptor(index: &AmentIndex, map: Option<PathBuf>) -> Result<LaunchDescriptor> {
    let mut ld = LaunchDescriptor::new();

    ld.add_process(
        ProcessSpec::new(
            "dynamic_bridge",
            vec![resolve(index, "ros1_bridge", "dynamic_bridge")?],
        )
        .with_exit_policy(ExitPolicy::RestartOnExit)
        .with_output(OutputSink::Console),
    )?;

    ld.add_process(
        ProcessSpec::new(
            "depthimage_to_laserscan_node",
            vec![
                resolve(index, "depthimage_to_laserscan", "depthimage_to_laserscan_node")?,
                "/depth:=/camera/depth/image_raw".to_string(),
                "/depth_camera_info:=/camera/depth/camera_info".to_string(),
            ],
        )
        .with_exit_policy(ExitPolicy::RestartOnExit),
    )?;

    ld.add_process(
        ProcessSpec::new("joy_node", vec![resolve(index, "joy", "joy_node")?])
            .with_exit_policy(ExitPolicy::RestartOnExit),
    )?;

    ld.add_process(
        ProcessSpec::new(
            "teleop_node",
            vec![
                resolve(index, "teleop_twist_joy", "teleop_node")?,
                "/cmd_vel:=/cmd_vel_mux/input/teleop".to_string(),
            ],
        )
        .with_exit_policy(ExitPolicy::RestartOnExit),
    )?;

    let map_path = match map {
        Some(path) => path,
        None => default_map_path(index)?,
    };
    ld.add_process(ProcessSpec::new(
        "map_server",
        vec![
            resolve(index, "map_server", "map_server")?,
            map_path.to_string_lossy().into_owned(),
        ],
    ))?;

    ld.add_process(
        ProcessSpec::new("amcl", vec![resolve(index, "amcl", "amcl")?])
            .with_exit_policy(ExitPolicy::RestartOnExit)
            .with_output(OutputSink::Console),
    )?;

    Ok(ld)
}

fn resolve(index: &AmentIndex, package: &str, executable: &str) -> Result<String> {
    Ok(index
        .executable_path(package, executable)?
        .to_string_lossy()
        .into_owned())
}

fn default_map_path(index: &AmentIndex) -> Result<PathBuf> {
    Ok(index
        .share_directory("navlaunch")?
        .join("maps")
        .join(DEFAULT_MAP_FILE))
}
