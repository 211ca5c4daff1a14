//! Way-points are a means of pathfinding across open, obstacle strewn maps
//! where actors should walk straight lines between sparse navigation nodes.
//!
//! A map is divided into a series of rectangular Sectors. Each Sector owns a
//! list of Way-points and a list of Objects (obstacles and actors) carrying a
//! polygon Collision. Way-points that can see each other without any obstacle
//! edge crossing the line between them are linked, forming a visibility graph
//! which spans every Sector of the map.
//!
//! ```text
//!  _______________________________
//! |  o----------o  |              |
//! |  |  ______  |\ |              |
//! |  | |      | | \|              |
//! |  | |______| |  o--------o     |
//! |  o----------o  |              |
//! |________________|______________|
//! ```
//!
//! Definitions:
//!
//! * Sector - a rectangular region described by an `offset` (top-left corner) and a `size`
//! * Way-point - a graph node with a position and a capture radius, an actor within the radius has reached it
//! * Circuit - an ordered list of points forming a closed polygon
//! * Collision - a Circuit plus a translation, used to test crossings and containment
//! * Way - the resolved route produced by a path query, consumed a step at a time by an actor
//!

pub mod collision;
pub mod definition;
pub mod map;
pub mod sectors;
pub mod utilities;
pub mod way;
pub mod way_point;
