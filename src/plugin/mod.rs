//! Defines the Bevy [Plugin] for WaypointMap
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod object_layer;
pub mod path_layer;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	Rebuild,
	Calculate,
}

pub struct WaypointMapPlugin;

impl Plugin for WaypointMapPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<SectorID>()
			.register_type::<WayPointID>()
			.register_type::<ObjectID>()
			.register_type::<WayPoint>()
			.register_type::<Collision>()
			.register_type::<CollisionState>()
			.register_type::<MapObject>()
			.register_type::<CrossSectorVisibility>()
			.add_event::<object_layer::EventMoveObject>()
			.add_event::<object_layer::EventRebuildWayPointGraph>()
			.add_event::<object_layer::EventSectorLeaving>()
			.add_event::<object_layer::EventMovementBlocked>()
			.add_event::<path_layer::EventPathRequest>()
			.configure_sets(Update, (OrderingSet::Rebuild, OrderingSet::Calculate).chain())
			.add_systems(
				Update,
				(
					(
						object_layer::process_object_moves,
						object_layer::rebuild_way_point_graphs,
					)
						.chain()
						.in_set(OrderingSet::Rebuild),
					path_layer::process_path_requests.in_set(OrderingSet::Calculate),
				),
			);
	}
}
