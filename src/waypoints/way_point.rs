//! A [WayPoint] is a disc shaped node of the visibility graph. Edges point at
//! other way-points by [WayPointID] so a graph can span several sectors
//! without borrowing into them.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Identifies a [WayPoint] by the sector owning it and its index within that sector
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct WayPointID {
	/// Sector the way-point belongs to
	sector_id: SectorID,
	/// Position within the sectors way-point list
	index: usize,
}

impl WayPointID {
	/// Create a new instance of [WayPointID]
	pub fn new(sector_id: SectorID, index: usize) -> Self {
		WayPointID { sector_id, index }
	}
	pub fn get_sector_id(&self) -> SectorID {
		self.sector_id
	}
	pub fn get_index(&self) -> usize {
		self.index
	}
}

/// A passable location with a capture radius and a list of the way-points it
/// can see without an obstacle in the way
#[derive(Default, Clone, Debug, PartialEq, Reflect)]
pub struct WayPoint {
	/// Centre of the way-point in the map frame
	position: Vec2,
	/// An agent within this distance of `position` has reached the way-point
	radius: f32,
	/// Visible neighbours
	edges: Vec<WayPointID>,
}

impl WayPoint {
	/// Create a new instance of [WayPoint] without any edges
	pub fn new(position: Vec2, radius: f32) -> Self {
		WayPoint {
			position,
			radius,
			edges: Vec::new(),
		}
	}
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
	pub fn get_radius(&self) -> f32 {
		self.radius
	}
	/// Get the visible neighbours
	pub fn get_edges(&self) -> &[WayPointID] {
		&self.edges
	}
	/// Link this way-point to a visible neighbour
	pub(crate) fn add_edge(&mut self, neighbour: WayPointID) {
		self.edges.push(neighbour);
	}
	/// Drop all edges, used before the graph is rebuilt
	pub(crate) fn clear_edges(&mut self) {
		self.edges.clear();
	}
	/// Distance from `point` to the centre when `point` lies within the
	/// capture radius, otherwise [f32::INFINITY]
	pub fn check_area(&self, point: Vec2) -> f32 {
		let distance = self.position.distance(point);
		if distance <= self.radius {
			distance
		} else {
			f32::INFINITY
		}
	}
}
