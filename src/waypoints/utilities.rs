//! Useful constants and helpers shared by the geometry and graph code
//!

use bevy::prelude::*;

/// Dead zone used by every cross-product comparison in [crate::prelude::Collision].
/// Values within this distance of zero are treated as lying on the line, so
/// touching or near-collinear segments never count as a crossing
pub const COLLISION_EPSILON: f32 = 1e-4;

/// Signed area of the parallelogram spanned by `origin -> a` and `origin -> b`.
/// Positive when `b` sits counter-clockwise of `a`
pub fn cross_from(origin: Vec2, a: Vec2, b: Vec2) -> f32 {
	(a - origin).perp_dot(b - origin)
}

/// Classify a cross product against [COLLISION_EPSILON], `0` meaning "on the line"
pub fn epsilon_sign(value: f32) -> i8 {
	if value > COLLISION_EPSILON {
		1
	} else if value < -COLLISION_EPSILON {
		-1
	} else {
		0
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn cross_counter_clockwise() {
		let result = cross_from(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
		assert_eq!(1.0, result);
	}
	#[test]
	fn cross_clockwise() {
		let result = cross_from(Vec2::new(1.0, 1.0), Vec2::new(1.0, 2.0), Vec2::new(2.0, 1.0));
		assert_eq!(-1.0, result);
	}
	#[test]
	fn sign_dead_zone() {
		assert_eq!(0, epsilon_sign(COLLISION_EPSILON / 2.0));
		assert_eq!(0, epsilon_sign(-COLLISION_EPSILON / 2.0));
		assert_eq!(1, epsilon_sign(0.5));
		assert_eq!(-1, epsilon_sign(-0.5));
	}
}
