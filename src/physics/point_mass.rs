use glam::DVec3;

/// CODATA 2018 value, m³/(kg·s²).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// 1 µGal = 1e-8 m/s².
pub const MICROGAL_PER_SI: f64 = 1e8;

/// Vertical attraction at `station` of a point mass `mass` located at `source`.
///
/// Coordinates use depth for z (positive downward), so a mass below the
/// station pulls in +z and yields a positive value. Returns `None` when the
/// two points are closer than `min_distance`; the caller decides how to
/// report the excluded contribution.
#[inline]
pub fn vertical_attraction(
    g: f64,
    mass: f64,
    source: DVec3,
    station: DVec3,
    min_distance: f64,
) -> Option<f64> {
    let d = source - station;
    let r = d.length();
    if r < min_distance {
        return None;
    }
    Some(g * mass * d.z / (r * r * r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mass_directly_below_follows_inverse_square() {
        let depth = 100.0;
        let mass = 1.0e6;
        let g = vertical_attraction(
            GRAVITATIONAL_CONSTANT,
            mass,
            DVec3::new(0.0, 0.0, depth),
            DVec3::ZERO,
            1e-6,
        )
        .unwrap();
        assert_relative_eq!(g, GRAVITATIONAL_CONSTANT * mass / (depth * depth), max_relative = 1e-14);
    }

    #[test]
    fn level_and_overhead_masses() {
        let level = vertical_attraction(1.0, 1.0, DVec3::new(3.0, 4.0, 0.0), DVec3::ZERO, 1e-6);
        assert_eq!(level, Some(0.0));

        let above = vertical_attraction(1.0, 1.0, DVec3::new(0.0, 0.0, -2.0), DVec3::ZERO, 1e-6);
        assert_relative_eq!(above.unwrap(), -0.25);
    }

    #[test]
    fn coincident_points_are_excluded() {
        let p = DVec3::new(0.5, 0.5, 0.5);
        assert_eq!(vertical_attraction(1.0, 1.0, p, p, 1e-6), None);
    }
}
