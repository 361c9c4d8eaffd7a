//! Follower steering: classic boid rules over a forward-looking
//! neighbourhood, plus a turn-limited pursuit of the leader.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::agent::Body;
use crate::config::FlockConfig;
use crate::vector::{Vec2, ZERO_EPSILON};

/// Averaged rule vectors over one follower's neighbourhood, each already
/// normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    pub count: usize,
    pub alignment: Vec2,
    pub cohesion: Vec2,
    pub separation: Vec2,
}

pub struct FlockEngine {
    config: FlockConfig,
}

impl Default for FlockEngine {
    fn default() -> Self {
        Self::new(FlockConfig::default())
    }
}

impl FlockEngine {
    pub fn new(config: FlockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// `other` is seen by `me` when it is within the radius of `me` and also
    /// within the radius of a point one radius ahead along `me`'s heading.
    /// The two-circle overlap stands in for a proper view cone.
    pub fn is_neighbor(&self, me: &Body, other: &Body) -> bool {
        let radius = self.config.neighbor_radius;
        if me.position.distance(other.position) >= radius {
            return false;
        }
        let ahead = me.position + me.velocity.normalize() * radius;
        ahead.distance(other.position) < radius
    }

    /// Rule vectors for `bodies[index]`, or `None` when it sees nobody.
    pub fn neighborhood(&self, index: usize, bodies: &[Body]) -> Option<Neighborhood> {
        let me = bodies.get(index)?;
        let mut count = 0usize;
        let mut velocity_sum = Vec2::ZERO;
        let mut position_sum = Vec2::ZERO;
        let mut offset_sum = Vec2::ZERO;
        for (other_index, other) in bodies.iter().enumerate() {
            if other_index == index || !self.is_neighbor(me, other) {
                continue;
            }
            count += 1;
            velocity_sum = velocity_sum + other.velocity;
            position_sum = position_sum + other.position;
            offset_sum = offset_sum + (other.position - me.position);
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let centroid = position_sum * (1.0 / n);
        Some(Neighborhood {
            count,
            alignment: (velocity_sum * (1.0 / n)).normalize(),
            cohesion: (centroid - me.position).normalize(),
            separation: (-(offset_sum * (1.0 / n))).normalize(),
        })
    }

    /// Flocking contribution. Without neighbours this is just the current
    /// heading as a unit vector; otherwise the weighted blend at cruise speed.
    pub fn flock_velocity(&self, index: usize, bodies: &[Body]) -> Vec2 {
        let Some(me) = bodies.get(index) else {
            return Vec2::ZERO;
        };
        let heading = me.velocity.normalize();
        let Some(hood) = self.neighborhood(index, bodies) else {
            return heading;
        };
        let steered = heading
            + hood.alignment * self.config.alignment_weight
            + hood.cohesion * self.config.cohesion_weight
            + hood.separation * self.config.separation_weight;
        steered.normalize() * self.config.cruise_speed
    }

    /// Signed rotation (radians) applied to the follower's heading this tick.
    /// Turns toward the leader by the shorter way round, or away at double
    /// rate when inside the standoff distance.
    pub fn steering_step(&self, me: &Body, leader: Vec2) -> f64 {
        let toward = leader - me.position;
        let bearing = heading_angle(toward.normalize());
        let current = heading_angle(me.velocity);
        let step = self.config.turn_step_radians() * turn_direction(current, bearing);
        if toward.magnitude() < self.config.standoff_distance {
            -step * 2.0
        } else {
            step
        }
    }

    /// Leader-following contribution at follow speed.
    pub fn follow_velocity(&self, me: &Body, leader: Vec2) -> Vec2 {
        let angle = heading_angle(me.velocity) + self.steering_step(me, leader);
        Vec2::from_angle(angle) * self.config.follow_speed
    }

    /// Velocity for `bodies[index]` this tick.
    pub fn velocity(&self, index: usize, bodies: &[Body], leader: Vec2) -> Vec2 {
        let Some(me) = bodies.get(index) else {
            return Vec2::ZERO;
        };
        (self.flock_velocity(index, bodies) + self.follow_velocity(me, leader))
            * self.config.speed_multiplier
    }
}

/// Angle of `v` from the +x axis in `[0, 2π)`, from `atan(y / x)` with
/// explicit quadrant correction. A vertical vector maps to π/2 or 3π/2 and
/// the zero vector to 0.
pub fn heading_angle(v: Vec2) -> f64 {
    if v.x.abs() <= ZERO_EPSILON {
        return if v.y > ZERO_EPSILON {
            FRAC_PI_2
        } else if v.y < -ZERO_EPSILON {
            3.0 * FRAC_PI_2
        } else {
            0.0
        };
    }
    let base = (v.y / v.x).atan();
    let angle = if v.x < 0.0 {
        PI + base
    } else if v.y < 0.0 {
        TAU + base
    } else {
        base
    };
    // a sliver below +x can round up to a full turn
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// +1 for counter-clockwise, -1 for clockwise: whichever reaches `target`
/// from `current` in less than half a turn. Exact ties keep +1.
pub fn turn_direction(current: f64, target: f64) -> f64 {
    let gap = (current - target).abs();
    if current > target && gap > PI {
        1.0
    } else if current > target && gap < PI {
        -1.0
    } else if current < target && gap > PI {
        -1.0
    } else {
        1.0
    }
}
