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

//! Axis-aligned bounding boxes

use crate::Vector3;

/// An axis-aligned box. A freshly cleared box is inverted, so adding any point makes it valid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub mins: Vector3,
    pub maxs: Vector3,
}

impl Aabb {
    pub fn new(mins: Vector3, maxs: Vector3) -> Aabb {
        Aabb { mins, maxs }
    }

    /// A box containing nothing.
    pub fn empty() -> Aabb {
        Aabb {
            mins: Vector3::repeat(f64::INFINITY),
            maxs: Vector3::repeat(f64::NEG_INFINITY),
        }
    }

    pub fn clear(&mut self) {
        *self = Aabb::empty();
    }

    /// True if at least one point has been added.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.mins[i] <= self.maxs[i])
    }

    pub fn add_point(&mut self, point: &Vector3) {
        for i in 0..3 {
            self.mins[i] = self.mins[i].min(point[i]);
            self.maxs[i] = self.maxs[i].max(point[i]);
        }
    }

    pub fn add_aabb(&mut self, other: &Aabb) {
        if other.is_valid() {
            self.add_point(&other.mins);
            self.add_point(&other.maxs);
        }
    }

    pub fn origin(&self) -> Vector3 {
        (self.mins + self.maxs) * 0.5
    }

    pub fn extents(&self) -> Vector3 {
        (self.maxs - self.mins) * 0.5
    }

    /// Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }

        let a = self.origin();
        let b = other.origin();
        let ea = self.extents();
        let eb = other.extents();

        (0..3).all(|i| (a[i] - b[i]).abs() < ea[i] + eb[i])
    }

    /// Like `intersects`, but boxes touching within `epsilon` count.
    pub fn overlaps(&self, other: &Aabb, epsilon: f64) -> bool {
        self.is_valid()
            && other.is_valid()
            && (0..3).all(|i| {
                self.mins[i] <= other.maxs[i] + epsilon && other.mins[i] <= self.maxs[i] + epsilon
            })
    }

    pub fn contains_point(&self, point: &Vector3) -> bool {
        (0..3).all(|i| point[i] >= self.mins[i] && point[i] <= self.maxs[i])
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}
