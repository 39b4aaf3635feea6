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

//! Convex brushes, built from the planes of their sides

use std::borrow::Cow;

use log::{debug, warn};

use mortar_materials::ContentsFlags;
use mortar_types::{Aabb, Plane, PlaneSide, Vector3, MAX_WORLD_COORD, MIN_WORLD_COORD, ON_EPSILON};

use crate::material::MaterialHandle;
use crate::planes::{opposite, PlaneRef, PlaneSet};
use crate::winding::{SplitCounts, Winding};

/// Adding a face to a brush with this many faces fails.
pub const MAX_BRUSH_FACES: usize = 1024;

/// A non-owning reference to another brush, by index in whatever holds it.
pub type BrushId = usize;

/// One side of a brush.
#[derive(Debug, Clone)]
pub struct BrushSide {
    /// Plane the side lies on, facing out of the brush
    pub plane_num: PlaneRef,

    pub material: Option<MaterialHandle>,

    /// The side's polygon after clipping by every other side of the brush
    pub winding: Winding,

    /// The part of `winding` not hidden inside other brushes
    pub visible_hull: Winding,
}

impl BrushSide {
    pub fn new(plane_num: PlaneRef, material: Option<MaterialHandle>) -> BrushSide {
        BrushSide {
            plane_num,
            material,
            winding: Winding::new(),
            visible_hull: Winding::new(),
        }
    }

    /// True if this side is actually part of the brush's surface.
    pub fn contributes(&self) -> bool {
        self.winding.len() >= 3
    }

    /// Sides with no material are drawn.
    pub fn is_visible(&self) -> bool {
        self.material.as_ref().map_or(true, |m| m.is_visible())
    }
}

/// A convex solid: the space behind all of its sides' planes.
/// Windings are derived from the planes by `evaluate_brep`, and go stale whenever sides change.
#[derive(Debug, Clone)]
pub struct Brush {
    pub(crate) sides: Vec<BrushSide>,
    pub(crate) bounds: Aabb,
    pub(crate) contents: ContentsFlags,
    pub(crate) opaque: bool,
    pub(crate) evaluated: bool,

    /// The brush this one was made from, if any
    pub original: Option<BrushId>,
    pub entity_num: usize,
    pub brush_num: usize,
}

impl Brush {
    pub fn new() -> Brush {
        Brush {
            sides: Vec::new(),
            bounds: Aabb::empty(),
            contents: ContentsFlags::empty(),
            opaque: true,
            evaluated: false,
            original: None,
            entity_num: 0,
            brush_num: 0,
        }
    }

    /// A brush behind every one of `bounding`, with `material` on all sides.
    pub fn from_planes<I>(planes: &mut PlaneSet, bounding: I, material: Option<MaterialHandle>) -> Brush
    where
        I: IntoIterator<Item = Plane>,
    {
        let mut brush = Brush::new();
        for plane in bounding {
            let plane_num = planes.find_or_insert(plane);
            brush.add_face(plane_num, material.clone());
        }

        brush.evaluate_brep(planes);
        brush
    }

    /// An axis-aligned box.
    pub fn cuboid(
        planes: &mut PlaneSet,
        mins: Vector3,
        maxs: Vector3,
        material: Option<MaterialHandle>,
    ) -> Brush {
        let mut bounding = Vec::with_capacity(6);
        for axis in 0..3 {
            let mut normal = Vector3::zeros();
            normal[axis] = 1.0;
            bounding.push(Plane::new(normal, maxs[axis]));
            bounding.push(Plane::new(-normal, -mins[axis]));
        }

        Brush::from_planes(planes, bounding, material)
    }

    /// An empty brush carrying over everything but the sides of `self`.
    pub(crate) fn empty_copy(&self) -> Brush {
        Brush {
            sides: Vec::new(),
            bounds: Aabb::empty(),
            evaluated: false,
            ..*self
        }
    }

    pub fn sides(&self) -> &[BrushSide] {
        &self.sides
    }

    pub fn contributing_sides(&self) -> impl Iterator<Item = &BrushSide> + '_ {
        self.sides.iter().filter(|s| s.contributes())
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn contents(&self) -> ContentsFlags {
        self.contents
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// False if sides have changed since the last `evaluate_brep`.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Add a side. Returns `None` if the brush already has as many sides as it can.
    pub fn add_face(
        &mut self,
        plane_num: PlaneRef,
        material: Option<MaterialHandle>,
    ) -> Option<&mut BrushSide> {
        if self.sides.len() >= MAX_BRUSH_FACES {
            warn!("Brush has too many faces ({})", self.sides.len());
            return None;
        }

        self.evaluated = false;
        self.sides.push(BrushSide::new(plane_num, material));
        self.sides.last_mut()
    }

    pub fn remove_side(&mut self, idx: usize) -> Option<BrushSide> {
        if idx >= self.sides.len() {
            return None;
        }

        self.evaluated = false;
        Some(self.sides.remove(idx))
    }

    /// Move a side onto a different plane.
    pub fn set_plane(&mut self, idx: usize, plane_num: PlaneRef) {
        if let Some(side) = self.sides.get_mut(idx) {
            side.plane_num = plane_num;
            self.evaluated = false;
        }
    }

    pub fn set_material(&mut self, material: Option<MaterialHandle>) {
        for side in self.sides.iter_mut() {
            side.material = material.clone();
        }
        self.evaluated = false;
    }

    /// Rebuild every side's winding from the planes, then the bounds and contents.
    /// Returns the result of `bound`.
    pub fn evaluate_brep(&mut self, planes: &PlaneSet) -> bool {
        for i in 0..self.sides.len() {
            let plane_num = self.sides[i].plane_num;

            // Only the first of several sides on one plane gets a winding
            let duplicate = self.sides[..i].iter().any(|s| s.plane_num == plane_num);
            let mut winding = Winding::new();

            if !duplicate && planes[plane_num].is_valid() {
                winding = Winding::from_plane(&planes[plane_num]);

                for (j, other) in self.sides.iter().enumerate() {
                    if winding.is_empty() {
                        break;
                    }

                    if i == j
                        || other.plane_num == plane_num
                        || other.plane_num == opposite(plane_num)
                    {
                        continue;
                    }

                    winding.clip(&planes[opposite(other.plane_num)], 0.0);
                }
            }

            self.sides[i].winding = winding;
        }

        self.update_contents();
        self.evaluated = true;

        self.bound()
    }

    /// Evaluate if anything has changed.
    pub fn ensure_evaluated(&mut self, planes: &PlaneSet) {
        if !self.evaluated {
            self.evaluate_brep(planes);
        }
    }

    fn update_contents(&mut self) {
        let mut contents = ContentsFlags::empty();
        let mut opaque = true;

        for side in self.sides.iter() {
            match &side.material {
                Some(material) => {
                    contents |= material.content_flags();
                    if !material.is_opaque() {
                        opaque = false;
                    }
                }
                None => contents |= ContentsFlags::SOLID | ContentsFlags::OPAQUE,
            }
        }

        self.contents = contents;
        self.opaque = opaque;
    }

    /// Recalculate the bounds from the current windings.
    /// Returns false if the brush is flat, open, or reaches outside the world.
    pub fn bound(&mut self) -> bool {
        self.bounds.clear();
        for side in self.sides.iter() {
            for point in side.winding.vertices() {
                self.bounds.add_point(point);
            }
        }

        let valid = (0..3).all(|i| {
            self.bounds.mins[i] >= MIN_WORLD_COORD
                && self.bounds.maxs[i] <= MAX_WORLD_COORD
                && self.bounds.mins[i] < self.bounds.maxs[i]
        });

        if !valid {
            debug!(
                "Brush has invalid bounds {:?} - {:?}",
                self.bounds.mins, self.bounds.maxs
            );
        }

        valid
    }

    /// Count the points of every contributing side in front of, behind and on `plane`.
    pub fn classify_plane(&mut self, planes: &PlaneSet, plane: &Plane) -> SplitCounts {
        self.ensure_evaluated(planes);

        let mut counts = SplitCounts::default();
        for side in self.contributing_sides() {
            counts += side.winding.classify_plane(plane, ON_EPSILON);
        }
        counts
    }

    /// The side of `plane` the brush reaches furthest into. Never `Cross`.
    pub fn mostly_on_side(&self, plane: &Plane) -> PlaneSide {
        let mut max = 0.0;
        let mut side = PlaneSide::Front;

        for point in self.sides.iter().flat_map(|s| s.winding.vertices()) {
            let d = plane.distance(point);
            if d > max {
                max = d;
                side = PlaneSide::Front;
            }
            if -d > max {
                max = -d;
                side = PlaneSide::Back;
            }
        }

        side
    }

    /// Drop sides that don't contribute to the surface.
    pub fn remove_empty_faces(&mut self, planes: &PlaneSet) {
        self.ensure_evaluated(planes);
        self.sides.retain(|s| s.contributes());
    }

    /// Move the brush, adding any new planes it needs to `planes`.
    pub fn translate(&mut self, planes: &mut PlaneSet, translation: &Vector3) {
        for side in self.sides.iter_mut() {
            let moved = planes[side.plane_num].translated(translation);
            side.plane_num = planes.find_or_insert(moved);
            side.winding.translate(translation);
            side.visible_hull.translate(translation);
        }

        self.evaluated = false;
        self.evaluate_brep(planes);
    }

    /// Volume, as the sum of pyramids from one corner to each side.
    pub fn volume(&self, planes: &PlaneSet) -> f64 {
        let corner = match self.sides.iter().find_map(|s| s.winding.vertices().next()) {
            Some(point) => *point,
            None => return 0.0,
        };

        let total: f64 = self
            .sides
            .iter()
            .filter(|s| !s.winding.is_empty())
            .map(|s| -planes[s.plane_num].distance(&corner) * s.winding.area())
            .sum();

        total / 3.0
    }
}

impl Default for Brush {
    fn default() -> Brush {
        Brush::new()
    }
}

/// `brush`, evaluated. Only clones if it needs to.
pub fn evaluated<'a>(brush: &'a Brush, planes: &PlaneSet) -> Cow<'a, Brush> {
    if brush.is_evaluated() {
        Cow::Borrowed(brush)
    } else {
        let mut brush = brush.clone();
        brush.evaluate_brep(planes);
        Cow::Owned(brush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(planes: &mut PlaneSet, min: f64, max: f64) -> Brush {
        Brush::cuboid(planes, Vector3::repeat(min), Vector3::repeat(max), None)
    }

    #[test]
    fn cuboid_evaluates() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0.0, 64.0);

        assert!(brush.is_evaluated());
        assert_eq!(brush.contributing_sides().count(), 6);
        assert!(brush.sides().iter().all(|s| s.winding.len() == 4));
        assert_eq!(brush.bounds().mins, Vector3::zeros());
        assert_eq!(brush.bounds().maxs, Vector3::repeat(64.0));
        assert!((brush.volume(&planes) - 64.0 * 64.0 * 64.0).abs() < 1e-6);
        assert!(brush.is_opaque());
        assert!(brush.contents().contains(ContentsFlags::SOLID));
    }

    #[test]
    fn sides_face_outwards() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0.0, 64.0);

        for side in brush.sides() {
            assert_eq!(side.winding.plane(), Some(planes[side.plane_num]));
        }
    }

    #[test]
    fn open_brushes_do_not_bound() {
        let mut planes = PlaneSet::new();
        let mut brush = cube(&mut planes, 0.0, 64.0);

        assert!(brush.remove_side(0).is_some());
        assert!(!brush.is_evaluated());
        assert!(!brush.evaluate_brep(&planes));
    }

    #[test]
    fn brushes_outside_the_world_do_not_bound() {
        let mut planes = PlaneSet::new();
        let mut brush = Brush::cuboid(
            &mut planes,
            Vector3::zeros(),
            Vector3::new(MAX_WORLD_COORD + 64.0, 64.0, 64.0),
            None,
        );

        assert!(!brush.bound());

        let mut inside = cube(&mut planes, 0.0, 64.0);
        assert!(inside.bound());
    }

    #[test]
    fn redundant_sides_do_not_contribute() {
        let mut planes = PlaneSet::new();
        let mut brush = cube(&mut planes, 0.0, 64.0);
        let outside = planes.find_or_insert(Plane::new(Vector3::new(1.0, 0.0, 0.0), 128.0));
        let duplicate = brush.sides()[0].plane_num;

        brush.add_face(outside, None);
        brush.add_face(duplicate, None);
        assert!(brush.evaluate_brep(&planes));
        assert_eq!(brush.sides().len(), 8);
        assert_eq!(brush.contributing_sides().count(), 6);

        brush.remove_empty_faces(&planes);
        assert_eq!(brush.sides().len(), 6);
    }

    #[test]
    fn classify_counts_points() {
        let mut planes = PlaneSet::new();
        let mut brush = cube(&mut planes, 0.0, 64.0);

        let through = Plane::new(Vector3::new(1.0, 0.0, 0.0), 32.0);
        let counts = brush.classify_plane(&planes, &through);
        assert_eq!(counts.front, 12);
        assert_eq!(counts.back, 12);
        assert_eq!(counts.on, 0);

        let touching = Plane::new(Vector3::new(1.0, 0.0, 0.0), 64.0);
        let counts = brush.classify_plane(&planes, &touching);
        assert_eq!(counts.front, 0);
        assert_eq!(counts.on, 12);
    }

    #[test]
    fn mostly_on_side_picks_the_bigger_part() {
        let mut planes = PlaneSet::new();
        let brush = cube(&mut planes, 0.0, 64.0);

        assert_eq!(
            brush.mostly_on_side(&Plane::new(Vector3::new(1.0, 0.0, 0.0), 16.0)),
            PlaneSide::Front
        );
        assert_eq!(
            brush.mostly_on_side(&Plane::new(Vector3::new(1.0, 0.0, 0.0), 48.0)),
            PlaneSide::Back
        );
        assert_eq!(
            brush.mostly_on_side(&Plane::new(Vector3::new(1.0, 0.0, 0.0), 32.0)),
            PlaneSide::Front
        );
    }

    #[test]
    fn translate_moves_planes() {
        let mut planes = PlaneSet::new();
        let mut brush = cube(&mut planes, 0.0, 64.0);
        brush.translate(&mut planes, &Vector3::new(8.0, 0.0, -8.0));

        assert!(brush.is_evaluated());
        assert_eq!(brush.bounds().mins, Vector3::new(8.0, 0.0, -8.0));
        assert_eq!(brush.bounds().maxs, Vector3::new(72.0, 64.0, 56.0));
    }

    #[test]
    fn too_many_faces() {
        let mut planes = PlaneSet::new();
        let plane_num = planes.find_or_insert(Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0));
        let mut brush = Brush::new();

        for _ in 0..MAX_BRUSH_FACES {
            assert!(brush.add_face(plane_num, None).is_some());
        }
        assert!(brush.add_face(plane_num, None).is_none());
    }

    #[test]
    fn evaluated_only_clones_stale_brushes() {
        let mut planes = PlaneSet::new();
        let mut brush = cube(&mut planes, 0.0, 8.0);

        assert!(matches!(evaluated(&brush, &planes), Cow::Borrowed(_)));

        brush.set_material(None);
        let fresh = evaluated(&brush, &planes);
        assert!(matches!(fresh, Cow::Owned(_)));
        assert!(fresh.is_evaluated());
    }
}
