//! Use cases

pub mod command_center;

pub use command_center::CommandCenter;
