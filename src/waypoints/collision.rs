//! Rigid polygon geometry used to decide whether obstacles block a line of
//! sight between way-points and whether moving objects overlap.
//!
//! A [Collision] stores its [Circuit] in a local frame and a separate
//! `position`. The offset is only applied while querying so moving a
//! collision never touches its point list.
//!
//! ```text
//!   (0,10)_________(10,10)
//!        |         |
//!        |  INSIDE |   OUTSIDE
//!        |_________|
//!   (0,0)           (10,0)
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Ordered list of points forming a closed polygon, the last point links back
/// to the first. At least 3 points are needed for a meaningful test
pub type Circuit = Vec<Vec2>;

/// Result of a [Collision] query
#[derive(Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub enum CollisionState {
	/// Edges of the two shapes cross
	Intersection,
	/// No edges cross and the probed point lies within the polygon
	Inside,
	/// No edges cross and the probed point lies beyond the polygon
	Outside,
}

/// A polygon with a translation offset
#[derive(Default, Clone, Debug, PartialEq, Reflect)]
pub struct Collision {
	/// Polygon points in the local frame
	points: Circuit,
	/// Translation added to every point at query time
	position: Vec2,
}

impl Collision {
	/// Create a new instance of [Collision] from a [Circuit] positioned at the origin
	pub fn new(points: Circuit) -> Self {
		Collision {
			points,
			position: Vec2::ZERO,
		}
	}
	/// Get the local frame points
	pub fn get_points(&self) -> &[Vec2] {
		&self.points
	}
	/// Replace the local frame points
	pub fn set_points(&mut self, points: Circuit) {
		self.points = points;
	}
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
	/// Replace the translation offset
	pub fn set_position(&mut self, position: Vec2) {
		self.position = position;
	}
	/// Accumulate `delta` onto the translation offset
	pub fn translate(&mut self, delta: Vec2) {
		self.position += delta;
	}
	/// Iterate over each edge in the map frame, wrapping from the last point to the first
	fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
		let count = self.points.len();
		(0..count).map(move |i| {
			(
				self.points[i] + self.position,
				self.points[(i + 1) % count] + self.position,
			)
		})
	}
	/// Test this polygon against `other`.
	///
	/// Any pair of crossing edges gives [CollisionState::Intersection]. Otherwise
	/// the first point of `self` is probed against `other`, so
	/// [CollisionState::Inside] means `self` sits within `other`. The probe is
	/// only reliable for convex shapes
	pub fn check(&self, other: &Collision) -> CollisionState {
		for (a, b) in self.edges() {
			for (c, d) in other.edges() {
				if !segment_collision(a, b, c, d) {
					return CollisionState::Intersection;
				}
			}
		}
		match self.points.first() {
			Some(first) => other.check_point(*first + self.position),
			None => CollisionState::Outside,
		}
	}
	/// Probe the segment `start -> end` against every edge of the polygon
	pub fn check_segment(&self, start: Vec2, end: Vec2) -> CollisionState {
		for (a, b) in self.edges() {
			if !segment_collision(a, b, start, end) {
				return CollisionState::Intersection;
			}
		}
		CollisionState::Outside
	}
	/// Point containment by comparing the side of each consecutive edge the
	/// `point` falls on, starting from the closing edge. A single change of
	/// side, or a point lying on an edge line, means outside
	pub fn check_point(&self, point: Vec2) -> CollisionState {
		let count = self.points.len();
		if count < 3 {
			return CollisionState::Outside;
		}
		let last = self.points[count - 1] + self.position;
		let first = self.points[0] + self.position;
		let mut previous = epsilon_sign(cross_from(last, first, point));
		if previous == 0 {
			return CollisionState::Outside;
		}
		for (a, b) in self.edges().take(count - 1) {
			let side = epsilon_sign(cross_from(a, b, point));
			if side != previous {
				return CollisionState::Outside;
			}
			previous = side;
		}
		CollisionState::Inside
	}
	/// Lowest and highest map frame point projected onto `axis`
	fn project(&self, axis: Vec2) -> (f32, f32) {
		self.edges()
			.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (point, _)| {
				let dot = point.dot(axis);
				(lo.min(dot), hi.max(dot))
			})
	}
	/// Separating axis test over the edge normals of both polygons.
	///
	/// The shapes overlap when their projections share more than
	/// [COLLISION_EPSILON] along every axis, so shapes only touching along an
	/// edge or at a corner do not overlap. Exact for convex shapes, a concave
	/// shape may report an overlap where only its hull meets `other`
	pub fn overlaps(&self, other: &Collision) -> bool {
		if self.points.len() < 3 || other.points.len() < 3 {
			return false;
		}
		for (a, b) in self.edges().chain(other.edges()) {
			let axis = (b - a).perp().normalize_or_zero();
			if axis == Vec2::ZERO {
				continue;
			}
			let (min_self, max_self) = self.project(axis);
			let (min_other, max_other) = other.project(axis);
			if max_self - min_other <= COLLISION_EPSILON || max_other - min_self <= COLLISION_EPSILON {
				return false;
			}
		}
		true
	}
}

/// Segment `a-b` against segment `c-d`.
///
/// Returns `true` when the segments do **not** cross, callers read `false`
/// as blocked. Endpoints within [COLLISION_EPSILON] of the other line are
/// treated as on the line so touching segments are not a crossing
pub fn segment_collision(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
	let c_side = epsilon_sign(cross_from(a, b, c));
	let d_side = epsilon_sign(cross_from(a, b, d));
	let a_side = epsilon_sign(cross_from(c, d, a));
	let b_side = epsilon_sign(cross_from(c, d, b));
	let straddles_ab = c_side * d_side < 0;
	let straddles_cd = a_side * b_side < 0;
	!(straddles_ab && straddles_cd)
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, Rng, SeedableRng};

	/// Axis aligned square with the bottom-left corner at the origin
	fn square(size: f32) -> Circuit {
		vec![
			Vec2::new(0.0, 0.0),
			Vec2::new(size, 0.0),
			Vec2::new(size, size),
			Vec2::new(0.0, size),
		]
	}
	#[test]
	fn segments_cross() {
		let result = segment_collision(
			Vec2::new(0.0, 0.0),
			Vec2::new(3.0, 3.0),
			Vec2::new(-1.0, 5.0),
			Vec2::new(3.0, 2.0),
		);
		assert!(!result);
	}
	#[test]
	fn segments_parallel() {
		let result = segment_collision(
			Vec2::new(0.0, 0.0),
			Vec2::new(3.0, 3.0),
			Vec2::new(-1.0, 0.0),
			Vec2::new(2.0, 3.0),
		);
		assert!(result);
	}
	#[test]
	fn segments_cross_out_of_bounds() {
		let result = segment_collision(
			Vec2::new(0.0, 0.0),
			Vec2::new(3.0, 3.0),
			Vec2::new(-1.0, 5.0),
			Vec2::new(-0.5, 1.25),
		);
		assert!(result);
	}
	#[test]
	fn segments_touching_endpoint() {
		// T shape, the end of one segment lies on the other
		let result = segment_collision(
			Vec2::new(0.0, 0.0),
			Vec2::new(10.0, 0.0),
			Vec2::new(5.0, 0.0),
			Vec2::new(5.0, 5.0),
		);
		assert!(result);
	}
	#[test]
	fn segments_collinear_overlap() {
		let result = segment_collision(
			Vec2::new(0.0, 0.0),
			Vec2::new(10.0, 0.0),
			Vec2::new(5.0, 0.0),
			Vec2::new(15.0, 0.0),
		);
		assert!(result);
	}
	#[test]
	fn point_inside_square() {
		let collision = Collision::new(square(10.0));
		assert_eq!(CollisionState::Inside, collision.check_point(Vec2::new(5.0, 5.0)));
	}
	#[test]
	fn point_outside_square_each_direction() {
		let collision = Collision::new(square(10.0));
		for point in [
			Vec2::new(25.0, 5.0),
			Vec2::new(-15.0, 5.0),
			Vec2::new(5.0, 25.0),
			Vec2::new(5.0, -15.0),
		] {
			assert_eq!(CollisionState::Outside, collision.check_point(point));
		}
	}
	#[test]
	fn point_inside_clockwise_square() {
		let mut points = square(10.0);
		points.reverse();
		let collision = Collision::new(points);
		assert_eq!(CollisionState::Inside, collision.check_point(Vec2::new(2.0, 8.0)));
	}
	#[test]
	fn point_inside_uses_position() {
		let mut collision = Collision::new(square(10.0));
		collision.set_position(Vec2::new(100.0, 100.0));
		assert_eq!(CollisionState::Outside, collision.check_point(Vec2::new(5.0, 5.0)));
		assert_eq!(CollisionState::Inside, collision.check_point(Vec2::new(105.0, 105.0)));
	}
	#[test]
	fn point_on_edge_is_outside() {
		let collision = Collision::new(square(10.0));
		assert_eq!(CollisionState::Outside, collision.check_point(Vec2::new(10.0, 5.0)));
	}
	#[test]
	fn point_degenerate_circuit() {
		let collision = Collision::new(vec![Vec2::ZERO, Vec2::new(1.0, 1.0)]);
		assert_eq!(CollisionState::Outside, collision.check_point(Vec2::new(0.5, 0.5)));
		let empty = Collision::default();
		assert_eq!(CollisionState::Outside, empty.check_point(Vec2::ZERO));
	}
	#[test]
	fn random_points_in_triangle() {
		let a = Vec2::new(0.0, 0.0);
		let b = Vec2::new(40.0, 5.0);
		let c = Vec2::new(15.0, 30.0);
		let collision = Collision::new(vec![a, b, c]);
		let area = cross_from(a, b, c);
		let mut rng = StdRng::seed_from_u64(17);
		for _ in 0..2000 {
			let point = Vec2::new(rng.random_range(-5.0..45.0), rng.random_range(-5.0..35.0));
			// barycentric weights, all positive inside
			let w_a = cross_from(b, c, point) / area;
			let w_b = cross_from(c, a, point) / area;
			let w_c = cross_from(a, b, point) / area;
			let margin = w_a.min(w_b).min(w_c);
			if margin.abs() < 1e-3 {
				// too close to an edge to compare against the dead zone
				continue;
			}
			let actual = if margin > 0.0 {
				CollisionState::Inside
			} else {
				CollisionState::Outside
			};
			assert_eq!(actual, collision.check_point(point), "point {}", point);
		}
	}
	#[test]
	fn segment_blocked() {
		let collision = Collision::new(square(10.0));
		let result = collision.check_segment(Vec2::new(-5.0, 5.0), Vec2::new(5.0, 5.0));
		assert_eq!(CollisionState::Intersection, result);
	}
	#[test]
	fn segment_through_corner() {
		let collision = Collision::new(square(10.0));
		let result = collision.check_segment(Vec2::new(0.0, 20.0), Vec2::new(20.0, 0.0));
		assert_eq!(CollisionState::Outside, result);
	}
	#[test]
	fn segment_fully_inside() {
		let collision = Collision::new(square(10.0));
		let result = collision.check_segment(Vec2::new(2.0, 2.0), Vec2::new(8.0, 8.0));
		assert_eq!(CollisionState::Outside, result);
	}
	#[test]
	fn disjoint_shapes_outside_both_ways() {
		let a = Collision::new(square(10.0));
		let mut b = Collision::new(square(10.0));
		b.set_position(Vec2::new(30.0, 0.0));
		assert_eq!(CollisionState::Outside, a.check(&b));
		assert_eq!(CollisionState::Outside, b.check(&a));
	}
	#[test]
	fn enclosing_shape_is_asymmetric() {
		let mut outer = Collision::new(square(20.0));
		outer.set_position(Vec2::new(-10.0, -10.0));
		let mut inner = Collision::new(square(4.0));
		inner.set_position(Vec2::new(-2.0, -2.0));
		assert_eq!(CollisionState::Inside, inner.check(&outer));
		assert_eq!(CollisionState::Outside, outer.check(&inner));
	}
	#[test]
	fn moving_changes_state() {
		let outer = Collision::new(square(20.0));
		let mut inner = Collision::new(square(4.0));
		inner.set_position(Vec2::new(-30.0, 8.0));
		assert_eq!(CollisionState::Outside, inner.check(&outer));
		// straddle the western edge
		inner.translate(Vec2::new(28.0, 0.0));
		assert_eq!(CollisionState::Intersection, inner.check(&outer));
		// fully inside
		inner.translate(Vec2::new(6.0, 0.0));
		assert_eq!(CollisionState::Inside, inner.check(&outer));
	}
	#[test]
	fn set_points_replaces_circuit() {
		let mut collision = Collision::new(square(10.0));
		collision.set_points(square(2.0));
		assert_eq!(4, collision.get_points().len());
		assert_eq!(CollisionState::Outside, collision.check_point(Vec2::new(5.0, 5.0)));
	}
	#[test]
	fn identical_shapes_overlap() {
		let a = Collision::new(square(2.0));
		let b = Collision::new(square(2.0));
		assert!(a.overlaps(&b));
		// every edge is shared so the containment probe alone misses it
		assert_eq!(CollisionState::Outside, a.check(&b));
	}
	#[test]
	fn edge_aligned_shapes_overlap() {
		let mut a = Collision::new(square(2.0));
		a.set_position(Vec2::new(14.0, 10.0));
		let mut b = Collision::new(square(2.0));
		b.set_position(Vec2::new(15.0, 10.0));
		assert!(a.overlaps(&b));
		assert!(b.overlaps(&a));
	}
	#[test]
	fn touching_shapes_do_not_overlap() {
		let a = Collision::new(square(2.0));
		let mut beside = Collision::new(square(2.0));
		beside.set_position(Vec2::new(2.0, 0.0));
		assert!(!a.overlaps(&beside));
		let mut corner = Collision::new(square(2.0));
		corner.set_position(Vec2::new(2.0, 2.0));
		assert!(!a.overlaps(&corner));
	}
	#[test]
	fn enclosed_and_disjoint_overlap() {
		let outer = Collision::new(square(20.0));
		let mut inner = Collision::new(square(4.0));
		inner.set_position(Vec2::new(8.0, 8.0));
		assert!(outer.overlaps(&inner));
		assert!(inner.overlaps(&outer));
		inner.set_position(Vec2::new(30.0, 8.0));
		assert!(!outer.overlaps(&inner));
	}
	#[test]
	fn rotated_triangle_separated() {
		let a = Collision::new(vec![Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)]);
		let mut b = Collision::new(square(2.0));
		// bounding boxes overlap but the hypotenuse separates them
		b.set_position(Vec2::new(2.5, 2.5));
		assert!(!a.overlaps(&b));
		assert!(!b.overlaps(&a));
	}
	#[test]
	fn degenerate_shapes_never_overlap() {
		let a = Collision::new(vec![Vec2::ZERO, Vec2::new(4.0, 4.0)]);
		let b = Collision::new(square(10.0));
		assert!(!a.overlaps(&b));
		assert!(!b.overlaps(&Collision::default()));
	}
}
