//! Obstacles and actors living inside a [crate::prelude::MapSector]
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Unique ID of a [MapObject] across a whole map
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct ObjectID(u32);

impl ObjectID {
	/// Create a new instance of [ObjectID]
	pub fn new(id: u32) -> Self {
		ObjectID(id)
	}
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// An entity with a [Collision] owned by exactly one sector
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct MapObject {
	/// Identity of the object
	id: ObjectID,
	/// Shape used to block way-point visibility and movement
	collision: Collision,
	/// Sector currently owning the object, this is a lookup key only and is
	/// revalidated whenever the object changes sector
	sector: Option<SectorID>,
}

impl MapObject {
	/// Create a new instance of [MapObject] not yet attached to a sector
	pub fn new(id: ObjectID, collision: Collision) -> Self {
		MapObject {
			id,
			collision,
			sector: None,
		}
	}
	pub fn get_id(&self) -> ObjectID {
		self.id
	}
	pub fn get_collision(&self) -> &Collision {
		&self.collision
	}
	/// Position of the objects [Collision] in the map frame
	pub fn get_position(&self) -> Vec2 {
		self.collision.get_position()
	}
	pub fn set_position(&mut self, position: Vec2) {
		self.collision.set_position(position);
	}
	/// Shift the object by `delta`
	pub fn translate(&mut self, delta: Vec2) {
		self.collision.translate(delta);
	}
	/// The sector owning this object, [None] when detached
	pub fn get_sector(&self) -> Option<SectorID> {
		self.sector
	}
	/// Record the owning sector
	pub(crate) fn set_sector(&mut self, sector: Option<SectorID>) {
		self.sector = sector;
	}
	/// Whether the interiors of the two objects overlap, touching is allowed
	pub fn overlaps(&self, other: &MapObject) -> bool {
		self.collision.overlaps(&other.collision)
	}
}
