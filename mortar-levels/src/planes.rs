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

//! Shared storage for the planes brush sides lie on

use std::ops::Index;

use log::debug;

use mortar_types::Plane;

/// Index into a `PlaneSet`.
pub type PlaneRef = usize;

/// The other half of a plane pair.
#[inline]
pub fn opposite(plane_num: PlaneRef) -> PlaneRef {
    plane_num ^ 1
}

/// Deduplicated planes, stored in pairs.
/// Plane `n` and plane `n ^ 1` are always each other's negation, so flipping a side is just flipping a bit.
#[derive(Debug, Clone, Default)]
pub struct PlaneSet {
    planes: Vec<Plane>,
}

impl PlaneSet {
    pub fn new() -> PlaneSet {
        PlaneSet { planes: Vec::new() }
    }

    /// Find the index of a plane equal to `plane`, adding it (and its opposite) if it isn't here yet.
    /// The plane is snapped first, so near-identical planes end up sharing an index.
    pub fn find_or_insert(&mut self, plane: Plane) -> PlaneRef {
        let plane = plane.snapped();
        if let Some(idx) = self.find(&plane) {
            return idx;
        }

        let idx = self.planes.len();
        self.planes.push(plane);
        self.planes.push(-plane);

        debug!("New plane pair {} ({:?}, {})", idx, plane.normal, plane.dist);

        idx
    }

    pub fn find(&self, plane: &Plane) -> Option<PlaneRef> {
        self.planes.iter().position(|p| p == plane)
    }

    pub fn get(&self, plane_num: PlaneRef) -> Option<&Plane> {
        self.planes.get(plane_num)
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plane> + '_ {
        self.planes.iter()
    }
}

impl Index<PlaneRef> for PlaneSet {
    type Output = Plane;

    fn index(&self, plane_num: PlaneRef) -> &Plane {
        &self.planes[plane_num]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortar_types::Vector3;

    #[test]
    fn planes_come_in_pairs() {
        let mut set = PlaneSet::new();
        let up = set.find_or_insert(Plane::new(Vector3::new(0.0, 0.0, 1.0), 8.0));
        let down = set.find_or_insert(Plane::new(Vector3::new(0.0, 0.0, -1.0), -8.0));

        assert_eq!(up, 0);
        assert_eq!(down, opposite(up));
        assert_eq!(set.len(), 2);
        assert_eq!(set[down], -set[up]);
    }

    #[test]
    fn near_planes_are_merged() {
        let mut set = PlaneSet::new();
        let a = set.find_or_insert(Plane::new(Vector3::new(1.0, 0.0, 0.0), 32.0));
        let b = set.find_or_insert(Plane::new(Vector3::new(0.999_999_9, 0.0, 0.0), 32.001));
        let c = set.find_or_insert(Plane::new(Vector3::new(1.0, 0.0, 0.0), 33.0));

        assert_eq!(a, b);
        assert_eq!(c, 2);
        assert_eq!(set[b].dist, 32.0);
        assert!(set.get(4).is_none());
    }
}
