//! `use bevy_waypoint_map_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::waypoints::{
	collision::*,
	definition::*,
	map::*,
	sectors::{map_object::*, *},
	utilities::*,
	way::*,
	way_point::*,
};

#[doc(hidden)]
pub use crate::plugin::{object_layer::*, path_layer::*, *};
