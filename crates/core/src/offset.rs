//! Pixel-pair offsets
//!
//! An [`Offset`] is a (distance, angle) candidate. The search space of the
//! offset selector is the Cartesian product of a distance list and an angle
//! list, enumerated distance-major.

use std::fmt;

/// A pixel-pair offset: `distance` pixels along `angle` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Pixel distance, > 0
    pub distance: usize,
    /// Angle in degrees (0 = along a row, 90 = along a column)
    pub angle: i32,
}

impl Offset {
    pub fn new(distance: usize, angle: i32) -> Self {
        Self { distance, angle }
    }

    /// Row/column displacement of the partner pixel.
    ///
    /// `(round(sin θ · d), round(cos θ · d))` with θ in radians; the pixel at
    /// `(r, c)` pairs with the pixel at `(r + d_row, c + d_col)`.
    pub fn displacement(&self) -> (isize, isize) {
        let theta = (self.angle as f64).to_radians();
        let d = self.distance as f64;
        let d_row = (theta.sin() * d).round() as isize;
        let d_col = (theta.cos() * d).round() as isize;
        (d_row, d_col)
    }

    /// All candidates, distance-index outer and angle-index inner.
    pub fn candidates(distances: &[usize], angles: &[i32]) -> Vec<Offset> {
        distances
            .iter()
            .flat_map(|&d| angles.iter().map(move |&a| Offset::new(d, a)))
            .collect()
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d={} a={}°", self.distance, self.angle)
    }
}

impl From<(usize, i32)> for Offset {
    fn from((distance, angle): (usize, i32)) -> Self {
        Self { distance, angle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displacement_cardinal_angles() {
        assert_eq!(Offset::new(1, 0).displacement(), (0, 1));
        assert_eq!(Offset::new(1, 45).displacement(), (1, 1));
        assert_eq!(Offset::new(1, 90).displacement(), (1, 0));
        assert_eq!(Offset::new(1, 135).displacement(), (1, -1));
        assert_eq!(Offset::new(3, 180).displacement(), (0, -3));
    }

    #[test]
    fn test_displacement_scales_with_distance() {
        assert_eq!(Offset::new(2, 45).displacement(), (1, 1));
        assert_eq!(Offset::new(4, 45).displacement(), (3, 3));
    }

    #[test]
    fn test_candidates_are_distance_major() {
        let c = Offset::candidates(&[1, 3], &[0, 90]);
        assert_eq!(
            c,
            vec![
                Offset::new(1, 0),
                Offset::new(1, 90),
                Offset::new(3, 0),
                Offset::new(3, 90),
            ]
        );
    }
}
