//! Logic relating to [Way] generation
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A request to find a [Way] for an actor. When a path exists the [Way] is
/// inserted onto the `actor` entity
#[derive(Event, Debug, Clone)]
pub struct EventPathRequest {
	/// Entity that receives the [Way]
	actor: Entity,
	/// World position the actor starts from
	departure: Vec2,
	/// World position the actor wants to reach
	target: Vec2,
}

impl EventPathRequest {
	pub fn new(actor: Entity, departure: Vec2, target: Vec2) -> Self {
		EventPathRequest {
			actor,
			departure,
			target,
		}
	}
	pub fn get_actor(&self) -> Entity {
		self.actor
	}
	pub fn get_departure(&self) -> Vec2 {
		self.departure
	}
	pub fn get_target(&self) -> Vec2 {
		self.target
	}
}

/// Serve each [EventPathRequest] from the first [WaypointMap] able to find a [Way]
#[cfg(not(tarpaulin_include))]
pub fn process_path_requests(
	mut events: EventReader<EventPathRequest>,
	map_q: Query<&WaypointMap>,
	mut commands: Commands,
) {
	for event in events.read() {
		let mut last_error = None;
		let served = map_q
			.iter()
			.any(|map| match map.get_way(event.departure, event.target) {
				Ok(way) => {
					debug!(
						"Way of length {} found on map '{}'",
						way.get_length(),
						map.get_name()
					);
					commands.entity(event.actor).try_insert(way);
					true
				}
				Err(e) => {
					last_error = Some(e);
					false
				}
			});
		if !served {
			match last_error {
				Some(e) => warn!("Path request for {:?} failed: {}", event.actor, e),
				None => warn!("Path request for {:?} ignored, no map exists", event.actor),
			}
		}
	}
}
