//! A [Way] is the resolved route handed to an actor. Each simulation tick the
//! actor asks for a movement vector capped by how far it may travel and the
//! [Way] keeps track of which point is being approached.
//!

use std::collections::VecDeque;

use bevy::prelude::*;

/// Ordered points of a route with a cursor marking the point being approached
#[derive(Component, Default, Clone, Debug, PartialEq)]
pub struct Way {
	/// Route points, front to back
	points: VecDeque<Vec2>,
	/// Index of the point currently being approached
	current_point: usize,
}

impl Way {
	/// Create a new instance of [Way] with the cursor on the first point
	pub fn new(points: Vec<Vec2>) -> Self {
		Way {
			points: points.into(),
			current_point: 0,
		}
	}
	pub fn get_points(&self) -> &VecDeque<Vec2> {
		&self.points
	}
	/// The point currently being approached, [None] once the way is complete
	pub fn get_current_point(&self) -> Option<Vec2> {
		self.points.get(self.current_point).copied()
	}
	/// Whether every point has been reached
	pub fn is_finished(&self) -> bool {
		self.current_point >= self.points.len()
	}
	/// Total length of the stored route, independent of the cursor
	pub fn get_length(&self) -> f32 {
		self.points
			.iter()
			.zip(self.points.iter().skip(1))
			.map(|(a, b)| a.distance(*b))
			.sum()
	}
	/// Insert a point at the start of the route, traversal restarts from it
	pub fn push_point_front(&mut self, point: Vec2) {
		self.points.push_front(point);
		self.current_point = 0;
	}
	/// Append a point to the end of the route, traversal restarts from the front
	pub fn push_point_back(&mut self, point: Vec2) {
		self.points.push_back(point);
		self.current_point = 0;
	}
	/// Displacement moving from `position` along the route by at most `step`.
	///
	/// Points reached along the way are consumed and any leftover distance
	/// carries on towards the next point. Once the route is complete a zero
	/// vector is returned
	pub fn get_moving_vector(&mut self, position: Vec2, step: f32) -> Vec2 {
		let mut displacement = Vec2::ZERO;
		let mut position = position;
		let mut remaining = step.max(0.0);
		while let Some(target) = self.get_current_point() {
			let to_target = target - position;
			let distance = to_target.length();
			if remaining < distance {
				return displacement + to_target * (remaining / distance);
			}
			displacement += to_target;
			remaining -= distance;
			position = target;
			self.current_point += 1;
		}
		displacement
	}
}
