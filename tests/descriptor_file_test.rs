use navlaunch::descriptor::{ExitPolicy, LaunchDescriptor, OutputSink};
use navlaunch::error::LaunchError;
use navlaunch::launch::restart::BackoffStrategy;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_from_file_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bringup.toml");

    let toml_content = r#"
        [[processes]]
        name = "dynamic_bridge"
        command = ["/opt/ros/lib/ros1_bridge/dynamic_bridge"]
        exit_policy = "restart_on_exit"
        output = ["console"]

        [[processes]]
        name = "map_server"
        command = ["/opt/ros/lib/map_server/map_server", "/maps/playground.yaml"]
        critical = true
    "#;

    fs::write(&path, toml_content).unwrap();

    let ld = LaunchDescriptor::from_file(&path).unwrap();
    assert_eq!(ld.len(), 2);

    let bridge = &ld.specs()[0];
    assert_eq!(bridge.name, "dynamic_bridge");
    assert_eq!(bridge.exit_policy, ExitPolicy::RestartOnExit);
    assert_eq!(bridge.output, vec![OutputSink::Console]);
    assert!(!bridge.critical);

    let map_server = &ld.specs()[1];
    assert_eq!(map_server.exit_policy, ExitPolicy::NoRestart);
    assert!(map_server.critical);
    assert_eq!(map_server.command.len(), 2);
}

#[test]
fn test_from_file_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bringup.json");

    let json_content = r#"
        {
            "processes": [
                {
                    "name": "amcl",
                    "command": ["/opt/ros/lib/amcl/amcl"],
                    "exit_policy": "restart_on_exit",
                    "output": ["console", "log_file"]
                }
            ]
        }
    "#;

    fs::write(&path, json_content).unwrap();

    let ld = LaunchDescriptor::from_file(&path).unwrap();
    assert_eq!(ld.len(), 1);
    assert_eq!(
        ld.specs()[0].output,
        vec![OutputSink::Console, OutputSink::LogFile]
    );
}

#[test]
fn test_restart_settings_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("restarts.toml");

    let toml_content = r#"
        [[processes]]
        name = "joy_node"
        command = ["/opt/ros/lib/joy/joy_node"]
        exit_policy = "restart_on_exit"

        [processes.restart]
        initial_delay_secs = 1
        max_restarts = 5

        [processes.restart.backoff.exponential]
        max_delay_secs = 60
    "#;

    fs::write(&path, toml_content).unwrap();

    let ld = LaunchDescriptor::from_file(&path).unwrap();
    let joy = &ld.specs()[0];
    assert_eq!(joy.restart.initial_delay_secs, 1);
    assert_eq!(joy.restart.max_restarts, Some(5));
    assert_eq!(
        joy.restart.backoff,
        BackoffStrategy::Exponential { max_delay_secs: 60 }
    );
}

#[test]
fn test_from_file_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bringup.yaml");

    fs::write(&path, "processes: []").unwrap();

    let result = LaunchDescriptor::from_file(&path);
    assert!(matches!(result, Err(LaunchError::InvalidDescriptor(_))));
}

#[test]
fn test_from_file_empty_descriptor_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.toml");

    fs::write(&path, "").unwrap();

    let result = LaunchDescriptor::from_file(&path);
    assert!(matches!(result, Err(LaunchError::InvalidDescriptor(_))));
}

#[test]
fn test_from_file_duplicate_names_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dup.toml");

    let toml_content = r#"
        [[processes]]
        name = "node"
        command = ["/bin/true"]

        [[processes]]
        name = "node"
        command = ["/bin/false"]
    "#;

    fs::write(&path, toml_content).unwrap();

    let result = LaunchDescriptor::from_file(&path);
    assert!(matches!(result, Err(LaunchError::DuplicateName(_))));
}

#[test]
fn test_from_file_missing_file() {
    let result = LaunchDescriptor::from_file(std::path::Path::new("/nonexistent/bringup.toml"));
    assert!(matches!(result, Err(LaunchError::DescriptorFile(_))));
}
