//! The [WaypointMap] owns every [MapSector], stitches their way-points into
//! a single visibility graph and answers path queries over it.
//!
//! A query resolves the sectors holding the departure and target, snaps each
//! to its nearest [WayPoint] and runs an a-star search between them. The
//! resulting [Way] approaches each way-point only as far as the edge of its
//! capture radius and finishes on the exact target.
//!

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, VecDeque};

use crate::prelude::*;
use bevy::prelude::*;

/// Which obstacle lists may block an edge between way-points of two different sectors
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub enum CrossSectorVisibility {
	/// Only the obstacles of the sector initiating the link are tested
	#[default]
	SourceSectorOnly,
	/// Obstacles of both sectors are tested
	BothSectors,
}

/// Reasons a path query or object update can fail
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PathError {
	#[error("Departure {0} is not inside any sector")]
	DepartureOutsideMap(Vec2),
	#[error("Target {0} is not inside any sector")]
	TargetOutsideMap(Vec2),
	#[error("Sector {0:?} has no way-points")]
	NoWayPoints(SectorID),
	#[error("Sector {0:?} does not exist")]
	UnknownSector(SectorID),
	#[error("Way-point {0:?} does not exist")]
	UnknownWayPoint(WayPointID),
	#[error("Object {0:?} does not exist")]
	UnknownObject(ObjectID),
	#[error("Object {0:?} is already attached to the map")]
	DuplicateObject(ObjectID),
	#[error("No path exists from {departure:?} to {target:?}")]
	NoPath {
		/// Way-point the search started from
		departure: WayPointID,
		/// Way-point the search could not reach
		target: WayPointID,
	},
}

/// Result of moving an object with [WaypointMap::move_object]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveResult {
	/// The object moved within its sector
	Moved,
	/// The object overlapped another, the move was reverted
	Blocked(ObjectID),
	/// The object moved and now belongs to a different sector
	ChangedSector {
		/// Sector the object left
		from: SectorID,
		/// Sector now owning the object
		to: SectorID,
	},
	/// The new position lies outside every sector, the move was reverted
	OutOfMap,
}

/// An entry of the open set used by the a-star search
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
	/// Distance travelled plus the straight line distance remaining
	priority: f32,
	/// Distance travelled from the departure
	passed: f32,
	/// Insertion counter, earlier entries win ties
	order: u64,
	/// Way-point reached by this entry
	point: WayPointID,
	/// Way-point this entry was reached from
	parent: Option<WayPointID>,
}

impl Ord for OpenEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		// reversed so the BinaryHeap pops the smallest priority first
		other
			.priority
			.total_cmp(&self.priority)
			.then_with(|| other.passed.total_cmp(&self.passed))
			.then_with(|| other.order.cmp(&self.order))
	}
}

impl PartialOrd for OpenEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for OpenEntry {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}
impl Eq for OpenEntry {}

/// A map made of sectors and the way-point graph spanning them
#[derive(Component, Default, Clone, Debug)]
pub struct WaypointMap {
	/// Human readable name
	name: String,
	/// World position of the map frame origin
	offset: Vec2,
	/// Sectors keyed by their ID
	sectors: BTreeMap<SectorID, MapSector>,
	/// Which obstacles may block links across sectors
	cross_sector_visibility: CrossSectorVisibility,
	/// Set when sector content changed after the graph was last built
	graph_stale: bool,
	/// File the map was loaded from, used by `reload`
	#[cfg(feature = "ron")]
	source: Option<String>,
}

impl WaypointMap {
	/// Create a new instance of an empty [WaypointMap]
	pub fn new(name: &str) -> Self {
		WaypointMap {
			name: name.to_string(),
			..Default::default()
		}
	}
	/// Set how links between sectors are tested
	pub fn with_cross_sector_visibility(mut self, visibility: CrossSectorVisibility) -> Self {
		self.set_cross_sector_visibility(visibility);
		self
	}
	pub fn set_cross_sector_visibility(&mut self, visibility: CrossSectorVisibility) {
		if self.cross_sector_visibility != visibility {
			self.cross_sector_visibility = visibility;
			self.graph_stale = true;
		}
	}
	pub fn get_cross_sector_visibility(&self) -> CrossSectorVisibility {
		self.cross_sector_visibility
	}
	pub fn get_name(&self) -> &str {
		&self.name
	}
	pub fn get_offset(&self) -> Vec2 {
		self.offset
	}
	/// Move the whole map within the world, the graph is unaffected
	pub fn set_offset(&mut self, offset: Vec2) {
		self.offset = offset;
	}
	pub fn get_sectors(&self) -> &BTreeMap<SectorID, MapSector> {
		&self.sectors
	}
	pub fn get_sector(&self, sector_id: SectorID) -> Option<&MapSector> {
		self.sectors.get(&sector_id)
	}
	/// Add or replace a sector
	pub fn insert_sector(&mut self, sector: MapSector) -> Option<MapSector> {
		self.graph_stale = true;
		self.sectors.insert(sector.get_id(), sector)
	}
	/// Whether sector content changed since [WaypointMap::find_way_points_edges] last ran
	pub fn is_graph_stale(&self) -> bool {
		self.graph_stale
	}
	/// Replace the way-points of a sector
	pub fn set_way_points(
		&mut self,
		sector_id: SectorID,
		way_points: Vec<WayPoint>,
	) -> Result<(), PathError> {
		let sector = self
			.sectors
			.get_mut(&sector_id)
			.ok_or(PathError::UnknownSector(sector_id))?;
		sector.set_way_points(way_points);
		self.graph_stale = true;
		Ok(())
	}
	/// Give ownership of `object` to a sector. Object IDs are unique across the map
	pub fn attach_object(&mut self, sector_id: SectorID, object: MapObject) -> Result<(), PathError> {
		if self.find_object(object.get_id()).is_some() {
			return Err(PathError::DuplicateObject(object.get_id()));
		}
		let sector = self
			.sectors
			.get_mut(&sector_id)
			.ok_or(PathError::UnknownSector(sector_id))?;
		sector.attach_object(object);
		self.graph_stale = true;
		Ok(())
	}
	/// Take an object out of whichever sector owns it
	pub fn remove_object(&mut self, id: ObjectID) -> Result<MapObject, PathError> {
		let sector_id = self.find_object(id).ok_or(PathError::UnknownObject(id))?;
		let object = self
			.sectors
			.get_mut(&sector_id)
			.and_then(|sector| sector.remove_object(id))
			.ok_or(PathError::UnknownObject(id))?;
		self.graph_stale = true;
		Ok(object)
	}
	/// Find the sector owning an object
	pub fn find_object(&self, id: ObjectID) -> Option<SectorID> {
		self.sectors
			.values()
			.find(|sector| sector.get_object(id).is_some())
			.map(|sector| sector.get_id())
	}
	/// Get a [WayPoint] from its ID
	pub fn get_way_point(&self, id: WayPointID) -> Result<&WayPoint, PathError> {
		self.sectors
			.get(&id.get_sector_id())
			.and_then(|sector| sector.get_way_point(id.get_index()))
			.ok_or(PathError::UnknownWayPoint(id))
	}
	/// Find the sector holding a `position` given in the world frame
	pub fn get_sector_containing(&self, position: Vec2) -> Option<SectorID> {
		let local = position - self.offset;
		self.find_sector_local(local)
	}
	/// Find the sector holding a `position` given in the map frame
	fn find_sector_local(&self, position: Vec2) -> Option<SectorID> {
		self.sectors
			.values()
			.find(|sector| sector.contains_position(position))
			.map(|sector| sector.get_id())
	}
	/// Rebuild the visibility graph from scratch, first within each sector and
	/// then between every pair of sectors
	pub fn find_way_points_edges(&mut self) {
		for sector in self.sectors.values_mut() {
			sector.clear_edges();
		}
		let mut links = 0;
		for sector in self.sectors.values_mut() {
			links += sector.connect_way_points();
		}
		let ids: Vec<SectorID> = self.sectors.keys().copied().collect();
		for (i, source_id) in ids.iter().enumerate() {
			for target_id in ids.iter().skip(i + 1) {
				// lift the target out so both sectors can be borrowed mutably
				let Some(mut target) = self.sectors.remove(target_id) else {
					continue;
				};
				if let Some(source) = self.sectors.get_mut(source_id) {
					links += source.connect_way_points_with(&mut target, self.cross_sector_visibility);
				}
				self.sectors.insert(*target_id, target);
			}
		}
		self.graph_stale = false;
		debug!(
			"Rebuilt way-point graph of map '{}', {} sectors, {} links",
			self.name,
			ids.len(),
			links
		);
	}
	/// Point on the capture circle of `next` facing `previous`. When
	/// `previous` is already within the radius of `next` its own position is used
	pub fn get_way_step(&self, previous: WayPointID, next: WayPointID) -> Result<Vec2, PathError> {
		let from = self.get_way_point(previous)?;
		let to = self.get_way_point(next)?;
		let distance = from.get_position().distance(to.get_position());
		if distance <= to.get_radius() {
			return Ok(from.get_position());
		}
		let direction = (to.get_position() - from.get_position()) / distance;
		Ok(to.get_position() - direction * to.get_radius())
	}
	/// Search the way-point graph for a route from `departure` to `target`.
	///
	/// The result holds one step per graph link travelled, front to back,
	/// excluding the departure. The first link found into the target ends
	/// the search
	pub fn find_way(&self, departure: WayPointID, target: WayPointID) -> Result<Vec<Vec2>, PathError> {
		let target_position = self.get_way_point(target)?.get_position();
		let departure_position = self.get_way_point(departure)?.get_position();

		let mut order = 0;
		let mut open = BinaryHeap::new();
		open.push(OpenEntry {
			priority: departure_position.distance(target_position),
			passed: 0.0,
			order,
			point: departure,
			parent: None,
		});
		// way-point -> the way-point it was reached from
		let mut closed: HashMap<WayPointID, Option<WayPointID>> = HashMap::new();

		let arrival = loop {
			let Some(current) = open.pop() else {
				return Err(PathError::NoPath { departure, target });
			};
			if current.point == target {
				break current;
			}
			if closed.contains_key(&current.point) {
				continue;
			}
			let way_point = self.get_way_point(current.point)?;
			for edge in way_point.get_edges() {
				let neighbour = self.get_way_point(*edge)?;
				let passed = current.passed + way_point.get_position().distance(neighbour.get_position());
				order += 1;
				if *edge == target {
					open.push(OpenEntry {
						priority: 0.0,
						passed,
						order,
						point: *edge,
						parent: Some(current.point),
					});
					break;
				}
				if !closed.contains_key(edge) {
					open.push(OpenEntry {
						priority: passed + neighbour.get_position().distance(target_position),
						passed,
						order,
						point: *edge,
						parent: Some(current.point),
					});
				}
			}
			closed.insert(current.point, current.parent);
		};

		let mut steps = VecDeque::new();
		let mut child = arrival.point;
		let mut parent = arrival.parent;
		while let Some(previous) = parent {
			steps.push_front(self.get_way_step(previous, child)?);
			child = previous;
			parent = *closed
				.get(&previous)
				.ok_or(PathError::UnknownWayPoint(previous))?;
		}
		Ok(steps.into())
	}
	/// Find a [Way] between two world positions. The way ends exactly on `target`
	pub fn get_way(&self, departure: Vec2, target: Vec2) -> Result<Way, PathError> {
		if self.graph_stale {
			warn!(
				"Way-point graph of map '{}' is stale, call find_way_points_edges after changing sectors",
				self.name
			);
		}
		let local_departure = departure - self.offset;
		let local_target = target - self.offset;
		let departure_sector = self
			.find_sector_local(local_departure)
			.ok_or(PathError::DepartureOutsideMap(departure))?;
		let target_sector = self
			.find_sector_local(local_target)
			.ok_or(PathError::TargetOutsideMap(target))?;
		let departure_id = self.nearest_way_point_id(departure_sector, local_departure)?;
		let target_id = self.nearest_way_point_id(target_sector, local_target)?;

		let mut points = self.find_way(departure_id, target_id)?;
		points.push(local_target);
		debug!(
			"Found way from {:?} to {:?} with {} points",
			departure_id,
			target_id,
			points.len()
		);
		Ok(Way::new(points.into_iter().map(|p| p + self.offset).collect()))
	}
	/// ID of the way-point nearest `position` within a sector
	fn nearest_way_point_id(&self, sector_id: SectorID, position: Vec2) -> Result<WayPointID, PathError> {
		let sector = self
			.sectors
			.get(&sector_id)
			.ok_or(PathError::UnknownSector(sector_id))?;
		let index = sector
			.get_nearest_way_point(position)
			.ok_or(PathError::NoWayPoints(sector_id))?;
		Ok(WayPointID::new(sector_id, index))
	}
	/// Shift an object by `delta`. A blocked move, or one ending outside every
	/// sector, is reverted. Crossing into a neighbour hands the object over
	pub fn move_object(&mut self, id: ObjectID, delta: Vec2) -> Result<MoveResult, PathError> {
		let from = self.find_object(id).ok_or(PathError::UnknownObject(id))?;
		let mut moved = self
			.sectors
			.get(&from)
			.and_then(|sector| sector.get_object(id))
			.cloned()
			.ok_or(PathError::UnknownObject(id))?;
		moved.translate(delta);

		let outcome = self
			.sectors
			.get(&from)
			.map(|sector| sector.movement_outcome(&moved))
			.ok_or(PathError::UnknownSector(from))?;
		let result = match outcome {
			MovementOutcome::Blocked(blocker) => return Ok(MoveResult::Blocked(blocker)),
			MovementOutcome::Free => MoveResult::Moved,
			MovementOutcome::LeavesSector => {
				let Some(to) = self.find_sector_local(moved.get_position()) else {
					return Ok(MoveResult::OutOfMap);
				};
				let arrival = self
					.sectors
					.get(&to)
					.map(|sector| sector.movement_outcome(&moved))
					.ok_or(PathError::UnknownSector(to))?;
				if let MovementOutcome::Blocked(blocker) = arrival {
					return Ok(MoveResult::Blocked(blocker));
				}
				MoveResult::ChangedSector { from, to }
			}
		};

		if let MoveResult::ChangedSector { to, .. } = result {
			let mut object = self.remove_object(id)?;
			object.set_position(moved.get_position());
			self.attach_object(to, object)?;
		} else {
			let object = self
				.sectors
				.get_mut(&from)
				.and_then(|sector| sector.get_object_mut(id))
				.ok_or(PathError::UnknownObject(id))?;
			object.set_position(moved.get_position());
			self.graph_stale = true;
		}
		Ok(result)
	}
}

#[cfg(feature = "ron")]
impl WaypointMap {
	/// Create a new instance of [WaypointMap] from a `ron` [MapDefinition]
	pub fn from_ron(path: &str) -> Result<WaypointMap, MapLoadError> {
		let definition = MapDefinition::from_ron(path)?;
		let mut map = WaypointMap::from_definition(&definition)?;
		map.source = Some(path.to_string());
		Ok(map)
	}
	/// Read the map file again, replacing every sector and rebuilding the graph
	pub fn reload(&mut self) -> Result<(), MapLoadError> {
		let path = self.source.clone().ok_or(MapLoadError::NoSource)?;
		let fresh = WaypointMap::from_ron(&path)?;
		*self = fresh;
		Ok(())
	}
}
