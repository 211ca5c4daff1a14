//! This is a plugin for Bevy game engine to build way-point visibility graphs over sectored 2d maps and find paths across them
//!

pub mod plugin;
pub mod waypoints;

pub mod prelude;
