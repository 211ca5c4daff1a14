//! Drive the plugin through its events inside a minimal [App]
//!

use bevy::ecs::event::Events;
use bevy::prelude::*;
use bevy_waypoint_map_plugin::prelude::*;

/// Two sectors side by side, each `50x50`, with a way-point in the middle of each
fn pair_map() -> WaypointMap {
	let mut west = MapSector::new(SectorID::new(0), Vec2::ZERO, Vec2::new(50.0, 50.0));
	west.set_way_points(vec![WayPoint::new(Vec2::new(25.0, 25.0), 5.0)]);
	let mut east = MapSector::new(SectorID::new(1), Vec2::new(50.0, 0.0), Vec2::new(50.0, 50.0));
	east.set_way_points(vec![WayPoint::new(Vec2::new(75.0, 25.0), 5.0)]);
	let mut map = WaypointMap::new("pair");
	map.insert_sector(west);
	map.insert_sector(east);
	map.find_way_points_edges();
	map
}

/// Small square actor with its origin at `position`
fn actor(id: u32, position: Vec2) -> MapObject {
	let mut collision = Collision::new(vec![
		Vec2::ZERO,
		Vec2::new(2.0, 0.0),
		Vec2::new(2.0, 2.0),
		Vec2::new(0.0, 2.0),
	]);
	collision.set_position(position);
	MapObject::new(ObjectID::new(id), collision)
}

/// Collect every event of type `E` written during the last update
fn drain<E: Event + Clone>(app: &App) -> Vec<E> {
	let events = app.world().resource::<Events<E>>();
	let mut cursor = events.get_cursor();
	cursor.read(events).cloned().collect()
}

#[test]
fn path_request_inserts_way() {
	let mut app = App::new();
	app.add_plugins(WaypointMapPlugin);
	app.world_mut().spawn(pair_map());
	let agent = app.world_mut().spawn_empty().id();
	app.world_mut().send_event(EventPathRequest::new(
		agent,
		Vec2::new(24.0, 25.0),
		Vec2::new(78.0, 25.0),
	));
	app.update();
	let way = app.world().get::<Way>(agent).unwrap();
	assert_eq!(Some(&Vec2::new(70.0, 25.0)), way.get_points().front());
	assert_eq!(Some(&Vec2::new(78.0, 25.0)), way.get_points().back());
}

#[test]
fn failed_request_inserts_nothing() {
	let mut app = App::new();
	app.add_plugins(WaypointMapPlugin);
	app.world_mut().spawn(pair_map());
	let agent = app.world_mut().spawn_empty().id();
	app.world_mut().send_event(EventPathRequest::new(
		agent,
		Vec2::new(24.0, 25.0),
		Vec2::new(500.0, 25.0),
	));
	app.update();
	assert!(app.world().get::<Way>(agent).is_none());
}

#[test]
fn move_across_sector_boundary() {
	let mut app = App::new();
	app.add_plugins(WaypointMapPlugin);
	let mut map = pair_map();
	map.attach_object(SectorID::new(0), actor(1, Vec2::new(45.0, 10.0)))
		.unwrap();
	let entity = app.world_mut().spawn(map).id();
	app.world_mut()
		.send_event(EventMoveObject::new(ObjectID::new(1), Vec2::new(10.0, 0.0)));
	app.update();
	let leaving = drain::<EventSectorLeaving>(&app);
	assert_eq!(1, leaving.len());
	assert_eq!(ObjectID::new(1), leaving[0].get_object());
	assert_eq!(SectorID::new(0), leaving[0].get_from());
	assert_eq!(SectorID::new(1), leaving[0].get_to());
	let map = app.world().get::<WaypointMap>(entity).unwrap();
	assert_eq!(Some(SectorID::new(1)), map.find_object(ObjectID::new(1)));
}

#[test]
fn move_blocked_by_other_object() {
	let mut app = App::new();
	app.add_plugins(WaypointMapPlugin);
	let mut map = pair_map();
	map.attach_object(SectorID::new(0), actor(1, Vec2::new(10.0, 10.0)))
		.unwrap();
	map.attach_object(SectorID::new(0), actor(2, Vec2::new(15.0, 10.0)))
		.unwrap();
	app.world_mut().spawn(map);
	app.world_mut()
		.send_event(EventMoveObject::new(ObjectID::new(1), Vec2::new(4.0, 0.0)));
	app.world_mut()
		.send_event(EventMoveObject::new(ObjectID::new(2), Vec2::new(0.0, -20.0)));
	app.update();
	let blocked = drain::<EventMovementBlocked>(&app);
	assert_eq!(2, blocked.len());
	assert_eq!(ObjectID::new(1), blocked[0].get_object());
	assert_eq!(Some(ObjectID::new(2)), blocked[0].get_blocker());
	assert_eq!(ObjectID::new(2), blocked[1].get_object());
	assert_eq!(None, blocked[1].get_blocker());
}

#[test]
fn rebuild_event_refreshes_graph() {
	let mut app = App::new();
	app.add_plugins(WaypointMapPlugin);
	let entity = app.world_mut().spawn(pair_map()).id();
	app.world_mut()
		.get_mut::<WaypointMap>(entity)
		.unwrap()
		.attach_object(SectorID::new(0), actor(3, Vec2::new(5.0, 5.0)))
		.unwrap();
	assert!(app.world().get::<WaypointMap>(entity).unwrap().is_graph_stale());
	app.world_mut().send_event(EventRebuildWayPointGraph);
	app.world_mut().send_event(EventRebuildWayPointGraph);
	app.update();
	assert!(!app.world().get::<WaypointMap>(entity).unwrap().is_graph_stale());
}
