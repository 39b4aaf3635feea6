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

//! Constructive solid geometry on brushes

use log::debug;

use crate::brush::{evaluated, Brush};
use crate::material::same_material;
use crate::planes::{opposite, PlaneSet};
use crate::winding::planes_concave;

/// What was left of a brush after taking another away from it.
#[derive(Debug, Clone)]
pub enum Subtraction {
    /// The brushes don't overlap, so nothing changed
    Disjoint,

    /// The brush was entirely inside the other one
    Consumed,

    /// The parts of the brush outside the other one
    Fragments(Vec<Brush>),
}

/// Take `other` away from `brush`.
pub fn subtract_brush(brush: &Brush, other: &Brush, planes: &PlaneSet) -> Subtraction {
    let other = evaluated(other, planes);

    let mut back = brush.clone();
    back.ensure_evaluated(planes);

    if !back.bounds().intersects(other.bounds()) {
        return Subtraction::Disjoint;
    }

    let mut fragments = Vec::new();
    for side in other.contributing_sides() {
        let counts = back.classify_plane(planes, &planes[side.plane_num]);

        if counts.front != 0 && counts.back != 0 {
            // The part of what's left in front of this side is outside `other`
            let mut fragment = back.clone();
            if fragment
                .add_face(opposite(side.plane_num), side.material.clone())
                .is_some()
            {
                fragment.remove_empty_faces(planes);
                fragments.push(fragment);
            }

            back.add_face(side.plane_num, side.material.clone());
        } else if counts.back == 0 {
            // Entirely in front of one of the sides, so not touching at all
            return Subtraction::Disjoint;
        }
    }

    if fragments.is_empty() {
        Subtraction::Consumed
    } else {
        Subtraction::Fragments(fragments)
    }
}

/// Take `other` away from `brush`.
/// Returns false with no fragments if the brushes don't overlap, or `brush` is entirely inside `other`.
pub fn subtract(brush: &Brush, other: &Brush, planes: &PlaneSet) -> (bool, Vec<Brush>) {
    match subtract_brush(brush, other, planes) {
        Subtraction::Fragments(fragments) => (true, fragments),
        _ => (false, Vec::new()),
    }
}

/// Combine `inputs` into a single brush.
/// Returns `None` if the result wouldn't be convex, or, unless `only_shape` is set,
/// if two inputs have different materials on the same plane.
pub fn merge(inputs: &[&Brush], planes: &PlaneSet, only_shape: bool) -> Option<Brush> {
    let inputs: Vec<_> = inputs.iter().map(|b| evaluated(b, planes)).collect();

    // (brush, side) of every face that ends up on the outside
    let mut faces: Vec<(usize, usize)> = Vec::new();

    for (i, brush) in inputs.iter().enumerate() {
        for (j, side) in brush.sides().iter().enumerate() {
            if !side.contributes() {
                continue;
            }

            // Faces pressed against another input are inside the result
            let internal = inputs.iter().enumerate().any(|(k, other)| {
                k != i
                    && other
                        .sides()
                        .iter()
                        .any(|s| s.plane_num == opposite(side.plane_num))
            });
            if internal {
                continue;
            }

            let mut duplicate = false;
            for &(fi, fj) in faces.iter() {
                let face = &inputs[fi].sides()[fj];

                if face.plane_num == side.plane_num {
                    if !only_shape && !same_material(&face.material, &side.material) {
                        debug!("Can't merge, materials differ on plane {}", side.plane_num);
                        return None;
                    }

                    duplicate = true;
                    break;
                }

                if planes_concave(
                    &side.winding,
                    &face.winding,
                    &planes[side.plane_num],
                    &planes[face.plane_num],
                ) {
                    return None;
                }
            }

            if !duplicate {
                faces.push((i, j));
            }
        }
    }

    let mut output = Brush::new();
    for (i, j) in faces {
        let side = &inputs[i].sides()[j];
        output.add_face(side.plane_num, side.material.clone())?;
    }

    output.remove_empty_faces(planes);
    Some(output)
}

/// Turn `source` into walls `offset` thick, one for each of its faces.
/// Walls normally fill the inside of the brush. With `make_room` they are moved out to surround it.
pub fn hollow(source: &Brush, planes: &mut PlaneSet, offset: f64, make_room: bool) -> Vec<Brush> {
    let mut source = source.clone();
    source.ensure_evaluated(planes);

    let mut walls = Vec::new();
    for side in source.contributing_sides() {
        let mut wall = source.clone();

        let inner = planes[opposite(side.plane_num)].offset(offset);
        let inner = planes.find_or_insert(inner);
        if wall.add_face(inner, side.material.clone()).is_none() {
            continue;
        }

        if make_room {
            let translation = planes[side.plane_num].normal * offset;
            wall.translate(planes, &translation);
        }

        wall.remove_empty_faces(planes);
        if !wall.bound() || wall.contributing_sides().count() < 4 {
            debug!("Dropping degenerate wall");
            continue;
        }

        walls.push(wall);
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortar_types::Vector3;

    fn cuboid(planes: &mut PlaneSet, mins: [f64; 3], maxs: [f64; 3]) -> Brush {
        Brush::cuboid(
            planes,
            Vector3::new(mins[0], mins[1], mins[2]),
            Vector3::new(maxs[0], maxs[1], maxs[2]),
            None,
        )
    }

    #[test]
    fn disjoint_brushes() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [128.0; 3], [192.0; 3]);

        assert!(matches!(subtract_brush(&a, &b, &planes), Subtraction::Disjoint));
        let (changed, fragments) = subtract(&a, &b, &planes);
        assert!(!changed);
        assert!(fragments.is_empty());
    }

    #[test]
    fn identical_brushes_are_consumed() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = a.clone();

        assert!(matches!(subtract_brush(&a, &b, &planes), Subtraction::Consumed));
        let (changed, fragments) = subtract(&a, &b, &planes);
        assert!(!changed);
        assert!(fragments.is_empty());
    }

    #[test]
    fn subtract_corner() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [32.0, -16.0, -16.0], [96.0, 80.0, 80.0]);

        let (changed, fragments) = subtract(&a, &b, &planes);
        assert!(changed);
        assert_eq!(fragments.len(), 1);

        let fragment = &fragments[0];
        assert_eq!(fragment.sides().len(), 6);
        assert_eq!(fragment.bounds().mins, Vector3::zeros());
        assert_eq!(fragment.bounds().maxs, Vector3::new(32.0, 64.0, 64.0));
    }

    #[test]
    fn subtract_middle() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [96.0; 3]);
        let b = cuboid(&mut planes, [32.0, 32.0, -16.0], [64.0, 64.0, 112.0]);

        let (changed, fragments) = subtract(&a, &b, &planes);
        assert!(changed);
        assert_eq!(fragments.len(), 4);

        let volume: f64 = fragments.iter().map(|f| f.volume(&planes)).sum();
        assert!((volume - (96.0 * 96.0 - 32.0 * 32.0) * 96.0).abs() < 1e-3);
    }

    #[test]
    fn merge_neighbours() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [64.0, 0.0, 0.0], [128.0, 64.0, 64.0]);

        let merged = merge(&[&a, &b], &planes, true).unwrap();
        assert_eq!(merged.sides().len(), 6);
        assert_eq!(merged.bounds().mins, Vector3::zeros());
        assert_eq!(merged.bounds().maxs, Vector3::new(128.0, 64.0, 64.0));
    }

    #[test]
    fn merge_rejects_concave() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [32.0, 32.0, 0.0], [96.0, 96.0, 64.0]);

        assert!(merge(&[&a, &b], &planes, true).is_none());
    }

    #[test]
    fn hollow_walls() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);

        let walls = hollow(&a, &mut planes, 8.0, false);
        assert_eq!(walls.len(), 6);

        let east = &walls[0];
        assert_eq!(east.bounds().mins, Vector3::new(56.0, 0.0, 0.0));
        assert_eq!(east.bounds().maxs, Vector3::new(64.0, 64.0, 64.0));
    }

    #[test]
    fn make_room_walls() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);

        let walls = hollow(&a, &mut planes, 8.0, true);
        assert_eq!(walls.len(), 6);

        let east = &walls[0];
        assert_eq!(east.bounds().mins, Vector3::new(64.0, 0.0, 0.0));
        assert_eq!(east.bounds().maxs, Vector3::new(72.0, 64.0, 64.0));

        let west = &walls[1];
        assert_eq!(west.bounds().mins, Vector3::new(-8.0, 0.0, 0.0));
        assert_eq!(west.bounds().maxs, Vector3::new(0.0, 64.0, 64.0));
    }

    #[test]
    fn walls_thicker_than_the_brush_fill_it() {
        let mut planes = PlaneSet::new();
        let a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);

        // The new face sits behind the opposite face, so every wall is the whole brush
        let walls = hollow(&a, &mut planes, 80.0, false);
        assert!(walls.iter().all(|w| w.contributing_sides().count() == 6));
    }
}
