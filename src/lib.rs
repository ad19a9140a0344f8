// Library exports for the navlaunch supervisor

pub mod bringup;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod launch;
pub mod logging;
pub mod resolve;
