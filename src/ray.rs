use std::f64::consts::TAU;

/// Default number of rays per update (2 degree spacing)
pub const DEFAULT_RAY_COUNT: u32 = 180;

/// Unit direction of one sampled ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayDirection {
    pub dx: f64,
    pub dy: f64,
}

impl RayDirection {
    /// Direction at `angle` radians, measured from +x towards +y
    pub fn from_angle(angle: f64) -> Self {
        RayDirection {
            dx: angle.cos(),
            dy: angle.sin(),
        }
    }
}

/// A fan of rays evenly covering 360 degrees.
///
/// Ray `i` points at angle `i * TAU / ray_count`, so ray 0 always points
/// along +x. Coarse fans can skip single cells between neighbouring rays at
/// long range; raising `ray_count` trades cost for coverage.
#[derive(Debug, Clone)]
pub struct RayFan {
    directions: Vec<RayDirection>,
}

impl RayFan {
    /// Build a fan of `ray_count` rays. Zero is raised to one ray.
    pub fn new(ray_count: u32) -> Self {
        let count = ray_count.max(1);
        let directions = (0..count)
            .map(|i| RayDirection::from_angle(i as f64 * TAU / count as f64))
            .collect();
        RayFan { directions }
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn direction(&self, index: usize) -> Option<RayDirection> {
        self.directions.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = RayDirection> + '_ {
        self.directions.iter().copied()
    }
}

impl Default for RayFan {
    fn default() -> Self {
        RayFan::new(DEFAULT_RAY_COUNT)
    }
}

/// Cell containing the point `distance` units along `direction`.
///
/// Rays leave from the center of the origin cell, and a point belongs to the
/// cell whose index is the floor of its coordinate. Floor rounds toward
/// negative infinity on both axes, which keeps rays pointing into negative
/// coordinates symmetric with their positive mirrors. Together with the
/// half-cell origin offset this picks the nearest cell to each sample point.
pub fn sample_cell(origin_x: i32, origin_y: i32, direction: RayDirection, distance: i32) -> (i32, i32) {
    let step = distance as f64;
    let x = origin_x as f64 + 0.5 + direction.dx * step;
    let y = origin_y as f64 + 0.5 + direction.dy * step;
    (x.floor() as i32, y.floor() as i32)
}
