//! Logic relating to obstacles and actors moving around the map and keeping
//! the way-point graph up to date
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Rebuild the way-point graph of every map, send after obstacles or
/// way-points have changed
#[derive(Event, Debug, Default, Clone)]
pub struct EventRebuildWayPointGraph;

/// Request to shift a [MapObject] by `delta`
#[derive(Event, Debug, Clone)]
pub struct EventMoveObject {
	/// Object to move
	object: ObjectID,
	/// Displacement in the map frame
	delta: Vec2,
}

impl EventMoveObject {
	pub fn new(object: ObjectID, delta: Vec2) -> Self {
		EventMoveObject { object, delta }
	}
}

/// Emitted when a moved object now belongs to a different sector
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EventSectorLeaving {
	/// Object that moved
	object: ObjectID,
	/// Sector the object left
	from: SectorID,
	/// Sector now owning the object
	to: SectorID,
}

impl EventSectorLeaving {
	pub fn get_object(&self) -> ObjectID {
		self.object
	}
	pub fn get_from(&self) -> SectorID {
		self.from
	}
	pub fn get_to(&self) -> SectorID {
		self.to
	}
}

/// Emitted when a move was refused and reverted
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EventMovementBlocked {
	/// Object that tried to move
	object: ObjectID,
	/// Object in the way, [None] when the move would have left the map
	blocker: Option<ObjectID>,
}

impl EventMovementBlocked {
	pub fn get_object(&self) -> ObjectID {
		self.object
	}
	pub fn get_blocker(&self) -> Option<ObjectID> {
		self.blocker
	}
}

/// Apply each [EventMoveObject] to the map owning the object and report
/// sector changes and refused moves
#[cfg(not(tarpaulin_include))]
pub fn process_object_moves(
	mut events: EventReader<EventMoveObject>,
	mut map_q: Query<&mut WaypointMap>,
	mut leaving: EventWriter<EventSectorLeaving>,
	mut blocked: EventWriter<EventMovementBlocked>,
) {
	for event in events.read() {
		for mut map in map_q.iter_mut() {
			if map.find_object(event.object).is_none() {
				continue;
			}
			match map.move_object(event.object, event.delta) {
				Ok(MoveResult::Moved) => {}
				Ok(MoveResult::ChangedSector { from, to }) => {
					leaving.write(EventSectorLeaving {
						object: event.object,
						from,
						to,
					});
				}
				Ok(MoveResult::Blocked(blocker)) => {
					blocked.write(EventMovementBlocked {
						object: event.object,
						blocker: Some(blocker),
					});
				}
				Ok(MoveResult::OutOfMap) => {
					blocked.write(EventMovementBlocked {
						object: event.object,
						blocker: None,
					});
				}
				Err(e) => warn!("Failed moving {:?}: {}", event.object, e),
			}
		}
	}
}

/// Rebuild every map graph once no matter how many [EventRebuildWayPointGraph] were sent
#[cfg(not(tarpaulin_include))]
pub fn rebuild_way_point_graphs(
	mut events: EventReader<EventRebuildWayPointGraph>,
	mut map_q: Query<&mut WaypointMap>,
) {
	if events.read().count() == 0 {
		return;
	}
	for mut map in map_q.iter_mut() {
		map.find_way_points_edges();
	}
}
