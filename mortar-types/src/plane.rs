/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Infinite planes and point classification against them.

use std::ops::Neg;

use crate::{Vector3, DIST_EPSILON, NORMAL_EPSILON};

/// Which side of a plane something lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum PlaneSide {
    Front,
    Back,
    On,
    /// Only produced when classifying a whole winding, never for a single point.
    Cross,
}

/// An infinite plane, with everything behind it considered inside.
/// Points `p` on the plane satisfy `normal.dot(p) == dist`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Plane {
    /// Plane normal, unit length
    pub normal: Vector3,

    /// Distance from origin to plane along normal
    pub dist: f64,
}

impl Plane {
    pub fn new(normal: Vector3, dist: f64) -> Plane {
        Plane { normal, dist }
    }

    /// Plane through three points. Seen from the front, the points run counter-clockwise.
    /// Returns `None` if the points are colinear.
    pub fn from_points(p0: &Vector3, p1: &Vector3, p2: &Vector3) -> Option<Plane> {
        let normal = (p1 - p0).cross(&(p2 - p0));
        let len = normal.norm();
        if len == 0.0 {
            return None;
        }

        let normal = normal / len;
        Some(Plane {
            normal,
            dist: normal.dot(p0),
        })
    }

    /// Signed distance from the plane to the given point. Positive is in front.
    pub fn distance(&self, point: &Vector3) -> f64 {
        self.normal.dot(point) - self.dist
    }

    /// The point on the plane closest to `point`.
    pub fn project_point(&self, point: &Vector3) -> Vector3 {
        point - self.normal * self.distance(point)
    }

    /// Scale so the normal is unit length. Returns `None` for a zero normal.
    pub fn normalised(&self) -> Option<Plane> {
        let len = self.normal.norm();
        if len == 0.0 {
            return None;
        }

        Some(Plane {
            normal: self.normal / len,
            dist: self.dist / len,
        })
    }

    /// Classify a single point, with `epsilon` of tolerance either side.
    pub fn classify_point(&self, point: &Vector3, epsilon: f64) -> PlaneSide {
        let d = self.distance(point);
        if d > epsilon {
            PlaneSide::Front
        } else if d < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }

    /// The same plane moved along its normal.
    pub fn offset(&self, amount: f64) -> Plane {
        Plane {
            normal: self.normal,
            dist: self.dist + amount,
        }
    }

    /// The same plane after moving all of space by `translation`.
    pub fn translated(&self, translation: &Vector3) -> Plane {
        Plane {
            normal: self.normal,
            dist: self.dist + self.normal.dot(translation),
        }
    }

    /// A plane is valid if its normal is (close to) unit length.
    pub fn is_valid(&self) -> bool {
        (self.normal.norm_squared() - 1.0).abs() < NORMAL_EPSILON * 10.0
    }

    /// Snap nearly-axial normals onto the axis, and nearly-integral distances to the integer.
    pub fn snapped(&self) -> Plane {
        let mut normal = self.normal;
        for i in 0..3 {
            if (normal[i] - 1.0).abs() < NORMAL_EPSILON {
                normal = Vector3::zeros();
                normal[i] = 1.0;
                break;
            }
            if (normal[i] + 1.0).abs() < NORMAL_EPSILON {
                normal = Vector3::zeros();
                normal[i] = -1.0;
                break;
            }
        }

        let mut dist = self.dist;
        if (dist - dist.round()).abs() < DIST_EPSILON {
            dist = dist.round();
        }

        Plane { normal, dist }
    }
}

impl PartialEq for Plane {
    /// Planes are equal if their normals and distances match within epsilon.
    fn eq(&self, other: &Plane) -> bool {
        (self.normal - other.normal).iter().all(|c| c.abs() < NORMAL_EPSILON)
            && (self.dist - other.dist).abs() < DIST_EPSILON
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Plane {
        Plane {
            normal: -self.normal,
            dist: -self.dist,
        }
    }
}
