//! A map is split into a series of rectangular sectors. Each sector owns the
//! way-points and obstacles that sit within its bounds and knows how to link
//! its way-points into a visibility graph.
//!
//! ```text
//!  offset
//!    x________________________
//!    |   o-----o-----o       |
//!    |    \   ____   |       |
//!    |     \ |    |  o       |
//!    |      o|____|  |       |
//!    |_______________o_______x offset + size
//! ```
//!

pub mod map_object;

use crate::prelude::*;
use bevy::prelude::*;

/// Unique ID of a sector
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct SectorID(u32);

impl SectorID {
	/// Create a new instance of [SectorID]
	pub fn new(id: u32) -> Self {
		SectorID(id)
	}
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// What happens when an object occupies its current position within a sector
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MovementOutcome {
	/// The position is legal
	Free,
	/// The object overlaps another object of the sector
	Blocked(ObjectID),
	/// The object no longer lies within the sector bounds
	LeavesSector,
}

/// A rectangular region of the map with its own way-points and obstacles
#[derive(Default, Clone, Debug)]
pub struct MapSector {
	/// Key of the sector within the map
	sector_id: SectorID,
	/// Top-left corner in the map frame
	offset: Vec2,
	/// Width and height
	size: Vec2,
	/// Graph nodes, index is the [WayPointID] index
	way_points: Vec<WayPoint>,
	/// Obstacles and actors owned by the sector
	objects: Vec<MapObject>,
}

impl MapSector {
	/// Create a new instance of an empty [MapSector]
	pub fn new(sector_id: SectorID, offset: Vec2, size: Vec2) -> Self {
		MapSector {
			sector_id,
			offset,
			size,
			way_points: Vec::new(),
			objects: Vec::new(),
		}
	}
	pub fn get_id(&self) -> SectorID {
		self.sector_id
	}
	pub fn get_offset(&self) -> Vec2 {
		self.offset
	}
	pub fn get_size(&self) -> Vec2 {
		self.size
	}
	pub fn get_way_points(&self) -> &[WayPoint] {
		&self.way_points
	}
	pub fn get_way_point(&self, index: usize) -> Option<&WayPoint> {
		self.way_points.get(index)
	}
	/// Replace the way-points of the sector. Edges are dropped, the graph must
	/// be rebuilt before the next path query
	pub fn set_way_points(&mut self, way_points: Vec<WayPoint>) {
		self.way_points = way_points;
		self.clear_edges();
	}
	pub fn get_objects(&self) -> &[MapObject] {
		&self.objects
	}
	pub fn get_object(&self, id: ObjectID) -> Option<&MapObject> {
		self.objects.iter().find(|o| o.get_id() == id)
	}
	/// Mutable access for moves that stay within the sector
	pub(crate) fn get_object_mut(&mut self, id: ObjectID) -> Option<&mut MapObject> {
		self.objects.iter_mut().find(|o| o.get_id() == id)
	}
	/// Take ownership of `object` and point it back at this sector
	pub fn attach_object(&mut self, mut object: MapObject) {
		object.set_sector(Some(self.sector_id));
		self.objects.push(object);
	}
	/// Hand back ownership of an object, it is detached from the sector
	pub fn remove_object(&mut self, id: ObjectID) -> Option<MapObject> {
		let index = self.objects.iter().position(|o| o.get_id() == id)?;
		let mut object = self.objects.remove(index);
		object.set_sector(None);
		Some(object)
	}
	/// Whether `position` lies within `offset..offset + size`
	pub fn contains_position(&self, position: Vec2) -> bool {
		let end = self.offset + self.size;
		position.x >= self.offset.x
			&& position.y >= self.offset.y
			&& position.x < end.x
			&& position.y < end.y
	}
	/// Whether the position of `object` lies within the sector
	pub fn is_object_in_sector(&self, object: &MapObject) -> bool {
		self.contains_position(object.get_position())
	}
	/// `true` when no object of this sector has an edge crossing the segment
	/// `start -> end`. Standing inside an obstacle does not block passage
	pub fn check_pass(&self, start: Vec2, end: Vec2) -> bool {
		self.objects.iter().all(|object| {
			object.get_collision().check_segment(start, end) != CollisionState::Intersection
		})
	}
	/// Link a way-point to `neighbour` without any visibility test
	#[cfg(test)]
	pub(crate) fn link_way_point(&mut self, index: usize, neighbour: WayPointID) {
		self.way_points[index].add_edge(neighbour);
	}
	/// Drop every edge held by this sectors way-points
	pub fn clear_edges(&mut self) {
		for way_point in self.way_points.iter_mut() {
			way_point.clear_edges();
		}
	}
	/// Link every pair of way-points within the sector that can see each
	/// other. Returns the number of pairs linked
	pub fn connect_way_points(&mut self) -> usize {
		let mut visible = Vec::new();
		for (i, source) in self.way_points.iter().enumerate() {
			for (j, target) in self.way_points.iter().enumerate().skip(i + 1) {
				if self.check_pass(source.get_position(), target.get_position()) {
					visible.push((i, j));
				}
			}
		}
		for (i, j) in visible.iter() {
			self.way_points[*i].add_edge(WayPointID::new(self.sector_id, *j));
			self.way_points[*j].add_edge(WayPointID::new(self.sector_id, *i));
		}
		visible.len()
	}
	/// Link the way-points of this sector with those of `other`. Which
	/// obstacle lists may block a link is decided by `visibility`. Returns
	/// the number of pairs linked
	pub fn connect_way_points_with(
		&mut self,
		other: &mut MapSector,
		visibility: CrossSectorVisibility,
	) -> usize {
		let mut visible = Vec::new();
		for (i, source) in self.way_points.iter().enumerate() {
			for (j, target) in other.way_points.iter().enumerate() {
				let (start, end) = (source.get_position(), target.get_position());
				let is_clear = match visibility {
					CrossSectorVisibility::SourceSectorOnly => self.check_pass(start, end),
					CrossSectorVisibility::BothSectors => {
						self.check_pass(start, end) && other.check_pass(start, end)
					}
				};
				if is_clear {
					visible.push((i, j));
				}
			}
		}
		for (i, j) in visible.iter() {
			self.way_points[*i].add_edge(WayPointID::new(other.sector_id, *j));
			other.way_points[*j].add_edge(WayPointID::new(self.sector_id, *i));
		}
		visible.len()
	}
	/// Find the way-point whose capture radius holds `point` and whose centre
	/// is closest. If no radius holds the point the first way-point is
	/// returned, [None] only when the sector has no way-points
	pub fn get_nearest_way_point(&self, point: Vec2) -> Option<usize> {
		if self.way_points.is_empty() {
			return None;
		}
		let mut nearest = 0;
		let mut nearest_distance = f32::INFINITY;
		for (i, way_point) in self.way_points.iter().enumerate() {
			let distance = way_point.check_area(point);
			if distance < nearest_distance {
				nearest = i;
				nearest_distance = distance;
			}
		}
		if nearest_distance.is_infinite() {
			debug!(
				"No way-point of sector {:?} captures {}, falling back to the first",
				self.sector_id, point
			);
		}
		Some(nearest)
	}
	/// Decide whether `object` may stay where it is. Other objects of the
	/// sector are tested first, then the sector bounds
	pub fn movement_outcome(&self, object: &MapObject) -> MovementOutcome {
		for other in self.objects.iter() {
			if other.get_id() != object.get_id() && object.overlaps(other) {
				return MovementOutcome::Blocked(other.get_id());
			}
		}
		if !self.is_object_in_sector(object) {
			return MovementOutcome::LeavesSector;
		}
		MovementOutcome::Free
	}
	/// `true` when `object` neither overlaps another object nor leaves the sector
	pub fn check_movement(&self, object: &MapObject) -> bool {
		self.movement_outcome(object) == MovementOutcome::Free
	}
}
