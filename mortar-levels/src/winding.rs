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

//! Convex polygons lying on a plane

use std::ops::AddAssign;

use smallvec::SmallVec;

use mortar_types::{
    Aabb, Plane, PlaneSide, Vector2, Vector3, MAX_WORLD_COORD, MAX_WORLD_SIZE, MIN_WORLD_COORD,
    ON_EPSILON,
};

/// Edges shorter than this don't count towards a winding being a real polygon.
pub const EDGE_LENGTH: f64 = 0.2;

/// Half the size of the polygon made by `Winding::from_plane`.
const BASE_WINDING_SIZE: f64 = MAX_WORLD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct WindingVertex {
    pub vertex: Vector3,
    pub texcoord: Vector2,
}

impl WindingVertex {
    pub fn new(vertex: Vector3) -> WindingVertex {
        WindingVertex {
            vertex,
            texcoord: Vector2::zeros(),
        }
    }
}

/// How many points of something were in front of, behind, and on a plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub front: usize,
    pub back: usize,
    pub on: usize,
}

impl SplitCounts {
    pub fn add(&mut self, side: PlaneSide) {
        match side {
            PlaneSide::Front => self.front += 1,
            PlaneSide::Back => self.back += 1,
            _ => self.on += 1,
        }
    }
}

impl AddAssign for SplitCounts {
    fn add_assign(&mut self, other: SplitCounts) {
        self.front += other.front;
        self.back += other.back;
        self.on += other.on;
    }
}

/// A convex polygon.
/// Points are wound clockwise when looking at the front of the polygon.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Winding {
    points: SmallVec<[WindingVertex; 8]>,
}

impl Winding {
    pub fn new() -> Winding {
        Winding {
            points: SmallVec::new(),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vector3>>(points: I) -> Winding {
        Winding {
            points: points.into_iter().map(WindingVertex::new).collect(),
        }
    }

    /// A huge square lying on the given plane, facing the same way.
    pub fn from_plane(plane: &Plane) -> Winding {
        // Pick the major axis to find a vector that isn't parallel to the normal
        let normal = plane.normal;
        let mut axis = 0;
        for i in 1..3 {
            if normal[i].abs() > normal[axis].abs() {
                axis = i;
            }
        }

        let mut up = if axis == 2 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        up = (up - normal * up.dot(&normal)).normalize();
        let right = up.cross(&normal);

        let origin = normal * plane.dist;
        let up = up * BASE_WINDING_SIZE;
        let right = right * BASE_WINDING_SIZE;

        Winding::from_points(vec![
            origin - right + up,
            origin + right + up,
            origin + right - up,
            origin - right - up,
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn push(&mut self, point: WindingVertex) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[WindingVertex] {
        &self.points
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vector3> + '_ {
        self.points.iter().map(|p| &p.vertex)
    }

    /// Keep only the part of this winding in front of `plane`.
    /// Returns false if nothing is left.
    pub fn clip(&mut self, plane: &Plane, epsilon: f64) -> bool {
        let count = self.points.len();
        if count == 0 {
            return false;
        }

        let (dists, sides, counts) = self.distances(plane, epsilon);

        if counts.front == 0 {
            self.points.clear();
            return false;
        }

        if counts.back == 0 {
            return true;
        }

        let max_points = count + 4;
        let mut clipped: SmallVec<[WindingVertex; 8]> = SmallVec::new();

        for i in 0..count {
            let p1 = self.points[i];

            if clipped.len() + 1 > max_points {
                return true;
            }

            match sides[i] {
                PlaneSide::On => {
                    clipped.push(p1);
                    continue;
                }
                PlaneSide::Front => clipped.push(p1),
                _ => {}
            }

            if sides[i + 1] == PlaneSide::On || sides[i + 1] == sides[i] {
                continue;
            }

            if clipped.len() + 1 > max_points {
                return true;
            }

            let p2 = self.points[(i + 1) % count];
            let t = dists[i] / (dists[i] - dists[i + 1]);
            clipped.push(split_point(&p1, &p2, t, plane));
        }

        self.points = clipped;
        true
    }

    pub fn clipped(&self, plane: &Plane, epsilon: f64) -> Winding {
        let mut w = self.clone();
        w.clip(plane, epsilon);
        w
    }

    /// Split into the parts in front of and behind `plane`.
    /// A winding lying on the plane goes to whichever side it faces.
    pub fn split(&self, plane: &Plane, epsilon: f64) -> (Winding, Winding) {
        let count = self.points.len();
        let (dists, sides, counts) = self.distances(plane, epsilon);

        if counts.front == 0 && counts.back == 0 {
            return match self.plane() {
                Some(own) if own.normal.dot(&plane.normal) > 0.0 => (self.clone(), Winding::new()),
                _ => (Winding::new(), self.clone()),
            };
        }

        if counts.front == 0 {
            return (Winding::new(), self.clone());
        }

        if counts.back == 0 {
            return (self.clone(), Winding::new());
        }

        let mut front = Winding::new();
        let mut back = Winding::new();

        for i in 0..count {
            let p1 = self.points[i];

            match sides[i] {
                PlaneSide::On => {
                    front.push(p1);
                    back.push(p1);
                    continue;
                }
                PlaneSide::Front => front.push(p1),
                _ => back.push(p1),
            }

            if sides[i + 1] == PlaneSide::On || sides[i + 1] == sides[i] {
                continue;
            }

            // Always interpolate from the front side so both halves share the exact same point
            let p2 = self.points[(i + 1) % count];
            let mid = if sides[i] == PlaneSide::Front {
                split_point(&p1, &p2, dists[i] / (dists[i] - dists[i + 1]), plane)
            } else {
                split_point(&p2, &p1, dists[i + 1] / (dists[i + 1] - dists[i]), plane)
            };

            front.push(mid);
            back.push(mid);
        }

        (front, back)
    }

    /// Which side of `plane` the whole winding is on.
    pub fn plane_side(&self, plane: &Plane, epsilon: f64) -> PlaneSide {
        let mut front = false;
        let mut back = false;

        for point in self.vertices() {
            let d = plane.distance(point);
            if d < -epsilon {
                if front {
                    return PlaneSide::Cross;
                }
                back = true;
            } else if d > epsilon {
                if back {
                    return PlaneSide::Cross;
                }
                front = true;
            }
        }

        if back {
            PlaneSide::Back
        } else if front {
            PlaneSide::Front
        } else {
            PlaneSide::On
        }
    }

    pub fn classify_plane(&self, plane: &Plane, epsilon: f64) -> SplitCounts {
        let mut counts = SplitCounts::default();
        for point in self.vertices() {
            counts.add(plane.classify_point(point, epsilon));
        }
        counts
    }

    pub fn center(&self) -> Vector3 {
        if self.points.is_empty() {
            return Vector3::zeros();
        }

        let sum = self
            .vertices()
            .fold(Vector3::zeros(), |acc, point| acc + point);
        sum / self.points.len() as f64
    }

    /// The plane this winding lies on, if it isn't degenerate.
    pub fn plane(&self) -> Option<Plane> {
        if self.points.len() < 3 {
            return None;
        }

        let center = self.center();
        let v1 = self.points[0].vertex - center;
        let v2 = self.points[1].vertex - center;
        let normal = v2.cross(&v1);

        let length = normal.norm();
        if length == 0.0 {
            return None;
        }

        let normal = normal / length;
        Some(Plane::new(normal, self.points[0].vertex.dot(&normal)))
    }

    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let first = self.points[0].vertex;
        let total: f64 = (2..self.points.len())
            .map(|i| {
                let d1 = self.points[i - 1].vertex - first;
                let d2 = self.points[i].vertex - first;
                d1.cross(&d2).norm()
            })
            .sum();

        total * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for point in self.vertices() {
            bounds.add_point(point);
        }
        bounds
    }

    /// True if there aren't at least three edges of a useful length.
    pub fn is_tiny(&self) -> bool {
        let count = self.points.len();
        let mut edges = 0;

        for i in 0..count {
            let delta = self.points[(i + 1) % count].vertex - self.points[i].vertex;
            if delta.norm_squared() > EDGE_LENGTH * EDGE_LENGTH {
                edges += 1;
                if edges == 3 {
                    return false;
                }
            }
        }

        true
    }

    /// True if any point reaches the edge of the world.
    pub fn is_huge(&self) -> bool {
        self.vertices()
            .any(|p| (0..3).any(|i| p[i] <= MIN_WORLD_COORD || p[i] >= MAX_WORLD_COORD))
    }

    pub fn reversed(&self) -> Winding {
        Winding {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    pub fn translate(&mut self, translation: &Vector3) {
        for point in self.points.iter_mut() {
            point.vertex += translation;
        }
    }

    /// Grow this winding to the convex hull of itself and `other`.
    /// Both must lie on the same plane, facing `normal`.
    pub fn add_to_convex_hull(&mut self, other: &Winding, normal: &Vector3, epsilon: f64) {
        if other.is_empty() {
            return;
        }

        if self.points.is_empty() {
            *self = other.clone();
            return;
        }

        let mut edge_normals: SmallVec<[Vector3; 8]> = SmallVec::new();
        let mut hull_side: SmallVec<[bool; 8]> = SmallVec::new();

        for new_point in other.points.iter() {
            let count = self.points.len();

            edge_normals.clear();
            for j in 0..count {
                let dir = (self.points[(j + 1) % count].vertex - self.points[j].vertex).normalize();
                edge_normals.push(normal.cross(&dir));
            }

            hull_side.clear();
            let mut outside = false;
            for j in 0..count {
                let d = (new_point.vertex - self.points[j].vertex).dot(&edge_normals[j]);
                if d >= epsilon {
                    outside = true;
                }
                hull_side.push(d >= -epsilon);
            }

            if !outside {
                continue;
            }

            // Find where the hull goes from behind the point to in front of it
            let start = match (0..count).find(|&j| !hull_side[j] && hull_side[(j + 1) % count]) {
                Some(j) => (j + 1) % count,
                None => continue,
            };

            let mut points: SmallVec<[WindingVertex; 8]> = SmallVec::new();
            points.push(*new_point);

            // Drop every point that sits between two edges facing the new point
            for k in 0..count {
                if hull_side[(start + k) % count] && hull_side[(start + k + 1) % count] {
                    continue;
                }
                points.push(self.points[(start + k + 1) % count]);
            }

            self.points = points;
        }
    }

    fn distances(
        &self,
        plane: &Plane,
        epsilon: f64,
    ) -> (SmallVec<[f64; 9]>, SmallVec<[PlaneSide; 9]>, SplitCounts) {
        let mut dists: SmallVec<[f64; 9]> = SmallVec::new();
        let mut sides: SmallVec<[PlaneSide; 9]> = SmallVec::new();
        let mut counts = SplitCounts::default();

        for point in self.vertices() {
            let d = plane.distance(point);
            let side = if d > epsilon {
                PlaneSide::Front
            } else if d < -epsilon {
                PlaneSide::Back
            } else {
                PlaneSide::On
            };

            counts.add(side);
            dists.push(d);
            sides.push(side);
        }

        if !dists.is_empty() {
            dists.push(dists[0]);
            sides.push(sides[0]);
        }

        (dists, sides, counts)
    }
}

/// The point a fraction `t` along the edge `p1 -> p2`, snapped onto axial planes exactly.
fn split_point(p1: &WindingVertex, p2: &WindingVertex, t: f64, plane: &Plane) -> WindingVertex {
    let mut vertex = Vector3::zeros();
    for j in 0..3 {
        vertex[j] = if plane.normal[j] == 1.0 {
            plane.dist
        } else if plane.normal[j] == -1.0 {
            -plane.dist
        } else {
            p1.vertex[j] + t * (p2.vertex[j] - p1.vertex[j])
        };
    }

    WindingVertex {
        vertex,
        texcoord: p1.texcoord + (p2.texcoord - p1.texcoord) * t,
    }
}

/// True if either winding pokes out in front of the other's plane.
pub fn planes_concave(w1: &Winding, w2: &Winding, plane1: &Plane, plane2: &Plane) -> bool {
    w1.vertices().any(|p| plane2.distance(p) > ON_EPSILON)
        || w2.vertices().any(|p| plane1.distance(p) > ON_EPSILON)
}
