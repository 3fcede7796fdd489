//! Boats carried by the ocean currents.

use serde::{Deserialize, Serialize};

use crate::schema::BoatDynamics;

/// Default hull length in cells.
pub const DEFAULT_BOAT_LENGTH: f32 = 20.0;

/// Speed above which the heading follows the velocity.
const HEADING_THRESHOLD: f32 = 0.01;

/// Player input shared by every boat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// A point boat in world coordinates (cells).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub x: f32,
    pub y: f32,
    /// Velocity in cells per tick
    pub vx: f32,
    pub vy: f32,
    pub length: f32,
    /// Heading in radians
    pub angle: f32,
}

impl Boat {
    pub fn new(x: f32, y: f32, length: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            length,
            angle: 0.0,
        }
    }

    /// Thrust and steering for one tick.
    pub fn apply_controls(&mut self, controls: Controls, dynamics: &BoatDynamics) {
        let (sin, cos) = self.angle.sin_cos();

        if controls.up {
            self.vx += cos * dynamics.engine_force;
            self.vy += sin * dynamics.engine_force;
        }
        if controls.down {
            self.vx -= cos * dynamics.engine_force * 0.5;
            self.vy -= sin * dynamics.engine_force * 0.5;
        }
        if controls.left {
            self.angle -= dynamics.turn_force;
        }
        if controls.right {
            self.angle += dynamics.turn_force;
        }

        if controls.is_idle() {
            self.vx += cos * dynamics.idle_thrust;
            self.vy += sin * dynamics.idle_thrust;
        }
    }

    /// Couple to the local fluid velocity, lose some speed to friction, then move.
    pub fn advect(&mut self, fluid: (f32, f32), dynamics: &BoatDynamics) {
        self.vx += fluid.0 * dynamics.advection - self.vx * dynamics.friction;
        self.vy += fluid.1 * dynamics.advection - self.vy * dynamics.friction;
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Keep the boat outside a circle of `radius` around `center` on a torus of
    /// `width x height`. Returns true on contact.
    pub fn push_out_of(
        &mut self,
        center: (f32, f32),
        radius: f32,
        world: (f32, f32),
        damping: f32,
    ) -> bool {
        let dx = minimum_image(self.x - center.0, world.0);
        let dy = minimum_image(self.y - center.1, world.1);

        let dist = (dx * dx + dy * dy).sqrt();
        if dist >= radius {
            return false;
        }

        let away = dy.atan2(dx);
        self.x += away.cos() * (radius - dist);
        self.y += away.sin() * (radius - dist);
        self.vx *= damping;
        self.vy *= damping;
        true
    }

    /// Wrap the position into `[0, width) x [0, height)`.
    pub fn wrap(&mut self, width: f32, height: f32) {
        self.x = wrap_coord(self.x, width);
        self.y = wrap_coord(self.y, height);
    }

    pub fn update_heading(&mut self) {
        if self.vx.abs() > HEADING_THRESHOLD || self.vy.abs() > HEADING_THRESHOLD {
            self.angle = self.vy.atan2(self.vx);
        }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Shortest signed offset on a periodic axis of length `extent`.
#[inline]
pub fn minimum_image(d: f32, extent: f32) -> f32 {
    let half = extent / 2.0;
    if d > half {
        d - extent
    } else if d < -half {
        d + extent
    } else {
        d
    }
}

/// Wrap `v` into `[0, extent)`.
#[inline]
pub(crate) fn wrap_coord(v: f32, extent: f32) -> f32 {
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round up to exactly `extent` for tiny negative inputs.
    if wrapped >= extent { 0.0 } else { wrapped }
}
