//! Plain data description of a map used to load sectors, way-points and
//! obstacles from disk.
//!
//! A `ron` file mirrors [MapDefinition]:
//!
//! ```text
//! (
//!     name: "line",
//!     offset: (0.0, 0.0),
//!     sectors: [
//!         (
//!             id: 0,
//!             offset: (0.0, 0.0),
//!             size: (100.0, 100.0),
//!             way_points: [(x: 10.0, y: 10.0, radius: 8.0)],
//!             obstacles: [(id: 0, position: (20.0, 20.0), points: [(0.0, 0.0), (30.0, 0.0), (30.0, 30.0)])],
//!         ),
//!     ],
//! )
//! ```
//!
//! Way-point lists can also be read from headerless `csv` rows of `x,y,radius`.
//!

use std::collections::BTreeSet;

use crate::prelude::*;
use bevy::prelude::*;

/// Reasons a [MapDefinition] could not be read or turned into a [WaypointMap]
#[derive(thiserror::Error, Debug)]
pub enum MapLoadError {
	#[error("Failed reading map file: {0}")]
	Io(#[from] std::io::Error),
	#[cfg(feature = "ron")]
	#[error("Failed deserializing map: {0}")]
	Ron(#[from] ron::error::SpannedError),
	#[cfg(feature = "csv")]
	#[error("Failed reading way-point csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("Sector {0:?} is defined more than once")]
	DuplicateSector(SectorID),
	#[error("Obstacle {0:?} is defined more than once")]
	DuplicateObject(ObjectID),
	#[error("Obstacle {0:?} needs at least 3 points")]
	DegenerateCircuit(ObjectID),
	#[error("Way-point {index} of sector {sector:?} has a non-finite position or radius")]
	NonFiniteWayPoint {
		/// Sector holding the way-point
		sector: SectorID,
		/// Position of the way-point in the sector list
		index: usize,
	},
	#[error("Map was not loaded from a file and cannot be reloaded")]
	NoSource,
}

/// A way-point as stored on disk
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WayPointDefinition {
	pub x: f32,
	pub y: f32,
	pub radius: f32,
}

impl WayPointDefinition {
	/// Create a new [WayPointDefinition]
	pub fn new(x: f32, y: f32, radius: f32) -> Self {
		WayPointDefinition { x, y, radius }
	}
	/// Whether every value is a real number
	fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.radius.is_finite()
	}
	/// Read headerless `x,y,radius` rows
	#[cfg(feature = "csv")]
	pub fn from_csv(path: &str) -> Result<Vec<WayPointDefinition>, MapLoadError> {
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.trim(csv::Trim::All)
			.from_path(path)?;
		let mut way_points = Vec::new();
		for record in reader.deserialize::<WayPointDefinition>() {
			way_points.push(record?);
		}
		Ok(way_points)
	}
}

/// An obstacle polygon as stored on disk
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleDefinition {
	pub id: u32,
	/// Translation applied to `points`
	#[cfg_attr(feature = "serde", serde(default))]
	pub position: [f32; 2],
	/// Polygon in its local frame
	pub points: Vec<[f32; 2]>,
}

/// A sector as stored on disk
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorDefinition {
	pub id: u32,
	pub offset: [f32; 2],
	pub size: [f32; 2],
	#[cfg_attr(feature = "serde", serde(default))]
	pub way_points: Vec<WayPointDefinition>,
	#[cfg_attr(feature = "serde", serde(default))]
	pub obstacles: Vec<ObstacleDefinition>,
}

/// A whole map as stored on disk
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapDefinition {
	pub name: String,
	/// World position of the map origin
	#[cfg_attr(feature = "serde", serde(default))]
	pub offset: [f32; 2],
	#[cfg_attr(feature = "serde", serde(default))]
	pub cross_sector_visibility: CrossSectorVisibility,
	pub sectors: Vec<SectorDefinition>,
}

impl MapDefinition {
	/// Read a [MapDefinition] from a `ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<MapDefinition, MapLoadError> {
		let file = std::fs::File::open(path)?;
		let definition = ron::de::from_reader(file)?;
		Ok(definition)
	}
}

/// Log a rejected definition before handing back the error
fn reject(error: MapLoadError) -> MapLoadError {
	error!("Rejected map definition: {}", error);
	error
}

/// Validate a [SectorDefinition] and build the [MapSector] it describes
fn build_sector(definition: &SectorDefinition) -> Result<MapSector, MapLoadError> {
	let sector_id = SectorID::new(definition.id);
	let mut sector = MapSector::new(
		sector_id,
		Vec2::from_array(definition.offset),
		Vec2::from_array(definition.size),
	);
	let mut way_points = Vec::with_capacity(definition.way_points.len());
	for (index, way_point) in definition.way_points.iter().enumerate() {
		if !way_point.is_finite() {
			return Err(reject(MapLoadError::NonFiniteWayPoint {
				sector: sector_id,
				index,
			}));
		}
		way_points.push(WayPoint::new(
			Vec2::new(way_point.x, way_point.y),
			way_point.radius,
		));
	}
	sector.set_way_points(way_points);
	for obstacle in definition.obstacles.iter() {
		let object_id = ObjectID::new(obstacle.id);
		if obstacle.points.len() < 3 {
			return Err(reject(MapLoadError::DegenerateCircuit(object_id)));
		}
		let mut collision =
			Collision::new(obstacle.points.iter().map(|p| Vec2::from_array(*p)).collect());
		collision.set_position(Vec2::from_array(obstacle.position));
		sector.attach_object(MapObject::new(object_id, collision));
	}
	Ok(sector)
}

impl WaypointMap {
	/// Create a new instance of [WaypointMap] from a [MapDefinition] with the
	/// way-point graph already built
	pub fn from_definition(definition: &MapDefinition) -> Result<WaypointMap, MapLoadError> {
		let mut map = WaypointMap::new(&definition.name)
			.with_cross_sector_visibility(definition.cross_sector_visibility);
		map.set_offset(Vec2::from_array(definition.offset));
		let mut object_ids = BTreeSet::new();
		for sector_definition in definition.sectors.iter() {
			for obstacle in sector_definition.obstacles.iter() {
				if !object_ids.insert(obstacle.id) {
					return Err(reject(MapLoadError::DuplicateObject(ObjectID::new(obstacle.id))));
				}
			}
			let sector = build_sector(sector_definition)?;
			if map.get_sector(sector.get_id()).is_some() {
				return Err(reject(MapLoadError::DuplicateSector(sector.get_id())));
			}
			map.insert_sector(sector);
		}
		map.find_way_points_edges();
		info!(
			"Loaded map '{}' with {} sectors",
			map.get_name(),
			map.get_sectors().len()
		);
		Ok(map)
	}
}
