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

//! Splitting brushes by planes, and finding which parts of their sides can be seen

use log::{debug, warn};

use mortar_types::{PlaneSide, ON_EPSILON};

use crate::brush::{evaluated, Brush, BrushSide};
use crate::planes::{opposite, PlaneRef, PlaneSet};
use crate::winding::Winding;

/// Brushes reaching less than this far past a splitting plane aren't split.
const SPLIT_EPSILON: f64 = 0.1;

/// Parts smaller than this are thrown away.
const MIN_VOLUME: f64 = 1.0;

/// Split `brush` into the parts in front of and behind plane `plane_num`.
/// A brush that barely crosses the plane is returned whole on the side it is mostly on.
pub fn split_brush(
    brush: &Brush,
    plane_num: PlaneRef,
    planes: &PlaneSet,
) -> (Option<Brush>, Option<Brush>) {
    let brush = evaluated(brush, planes);
    let plane = &planes[plane_num];

    let mut d_front: f64 = 0.0;
    let mut d_back: f64 = 0.0;
    for point in brush.sides().iter().flat_map(|s| s.winding.vertices()) {
        let d = plane.distance(point);
        if d > 0.0 && d > d_front {
            d_front = d;
        }
        if d < 0.0 && d < d_back {
            d_back = d;
        }
    }

    if d_front < SPLIT_EPSILON {
        return (None, Some(brush.into_owned()));
    }
    if d_back > -SPLIT_EPSILON {
        return (Some(brush.into_owned()), None);
    }

    // The polygon the plane makes inside the brush
    let mut mid = Winding::from_plane(plane);
    for side in brush.sides() {
        if mid.is_empty() {
            break;
        }
        mid.clip(&planes[opposite(side.plane_num)], 0.0);
    }

    if mid.is_empty() || mid.is_tiny() {
        return match brush.mostly_on_side(plane) {
            PlaneSide::Front => (Some(brush.into_owned()), None),
            _ => (None, Some(brush.into_owned())),
        };
    }

    if mid.is_huge() {
        warn!("Huge winding splitting brush {}", brush.brush_num);
    }

    let mut front = brush.empty_copy();
    let mut back = brush.empty_copy();

    for side in brush.sides() {
        if side.winding.is_empty() {
            continue;
        }

        let (front_winding, back_winding) = side.winding.split(plane, 0.0);
        if !front_winding.is_empty() {
            front.sides.push(BrushSide {
                winding: front_winding,
                visible_hull: Winding::new(),
                ..side.clone()
            });
        }
        if !back_winding.is_empty() {
            back.sides.push(BrushSide {
                winding: back_winding,
                visible_hull: Winding::new(),
                ..side.clone()
            });
        }
    }

    let mut front = if usable_part(&mut front) { Some(front) } else { None };
    let mut back = if usable_part(&mut back) { Some(back) } else { None };

    match (&front, &back) {
        (Some(_), Some(_)) => {}
        (None, None) => {
            warn!("Split removed brush {}", brush.brush_num);
            return (None, None);
        }
        _ => {
            warn!("Split not on both sides of brush {}", brush.brush_num);
            return if front.is_some() {
                (Some(brush.into_owned()), None)
            } else {
                (None, Some(brush.into_owned()))
            };
        }
    }

    // Close each part with the mid polygon, facing out of it
    if let Some(part) = front.as_mut() {
        let mut side = BrushSide::new(opposite(plane_num), None);
        side.winding = mid.reversed();
        part.sides.push(side);
    }
    if let Some(part) = back.as_mut() {
        let mut side = BrushSide::new(plane_num, None);
        side.winding = mid.clone();
        part.sides.push(side);
    }

    if front.as_ref().map_or(false, |b| b.volume(planes) < MIN_VOLUME) {
        debug!("Dropping tiny front part of split brush {}", brush.brush_num);
        front = None;
    }
    if back.as_ref().map_or(false, |b| b.volume(planes) < MIN_VOLUME) {
        debug!("Dropping tiny back part of split brush {}", brush.brush_num);
        back = None;
    }

    (front, back)
}

/// Bound a freshly split part, and check it is still a solid.
fn usable_part(part: &mut Brush) -> bool {
    part.evaluated = true;
    if !part.bound() {
        debug!("Bogus brush after split");
        return false;
    }

    part.sides.len() >= 3
}

impl Brush {
    /// Work out which parts of each side can be seen, given some other brushes.
    /// Each side's `visible_hull` becomes the convex hull of the pieces of its winding that aren't
    /// inside any opaque occluder. Invisible sides end up with an empty hull.
    pub fn clip_sides_by_brushes<'a, I>(&mut self, occluders: I, planes: &PlaneSet)
    where
        I: IntoIterator<Item = &'a Brush>,
    {
        self.ensure_evaluated(planes);

        let occluders: Vec<_> = occluders
            .into_iter()
            .filter(|b| b.is_opaque())
            .map(|b| evaluated(b, planes))
            .collect();

        for side in self.sides.iter_mut() {
            side.visible_hull.clear();
            if !side.contributes() || !side.is_visible() {
                continue;
            }

            let plane_num = side.plane_num;
            let side_bounds = side.winding.bounds();
            let mut fragments = vec![side.winding.clone()];

            for occluder in occluders.iter() {
                if fragments.is_empty() {
                    break;
                }
                if !occluder.bounds().overlaps(&side_bounds, ON_EPSILON) {
                    continue;
                }

                fragments = fragments
                    .into_iter()
                    .flat_map(|f| outside_of(f, plane_num, occluder, planes))
                    .collect();
            }

            let normal = planes[plane_num].normal;
            for fragment in fragments.iter() {
                side.visible_hull.add_to_convex_hull(fragment, &normal, ON_EPSILON);
            }
        }
    }
}

/// The pieces of `winding` (lying on plane `plane_num`) that are outside `occluder`.
fn outside_of(
    winding: Winding,
    plane_num: PlaneRef,
    occluder: &Brush,
    planes: &PlaneSet,
) -> Vec<Winding> {
    let mut outside = Vec::new();
    let mut inside = winding;

    for side in occluder.sides() {
        // Lying on the occluder's surface and facing the same way is outside
        if side.plane_num == plane_num {
            outside.push(inside);
            return outside;
        }

        // Facing into the occluder is inside, as far as this side is concerned
        if side.plane_num == opposite(plane_num) {
            continue;
        }

        let (front, back) = inside.split(&planes[side.plane_num], ON_EPSILON);
        if !front.is_empty() {
            outside.push(front);
        }

        inside = back;
        if inside.is_empty() {
            break;
        }
    }

    outside
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortar_types::{Plane, Vector3};

    fn cuboid(planes: &mut PlaneSet, mins: [f64; 3], maxs: [f64; 3]) -> Brush {
        Brush::cuboid(
            planes,
            Vector3::new(mins[0], mins[1], mins[2]),
            Vector3::new(maxs[0], maxs[1], maxs[2]),
            None,
        )
    }

    #[test]
    fn split_through_the_middle() {
        let mut planes = PlaneSet::new();
        let brush = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let plane_num = planes.find_or_insert(Plane::new(Vector3::new(1.0, 0.0, 0.0), 32.0));

        let (front, back) = split_brush(&brush, plane_num, &planes);
        let front = front.unwrap();
        let back = back.unwrap();

        assert_eq!(front.sides().len(), 6);
        assert_eq!(back.sides().len(), 6);
        assert_eq!(front.bounds().mins, Vector3::new(32.0, 0.0, 0.0));
        assert_eq!(back.bounds().maxs, Vector3::new(32.0, 64.0, 64.0));
        assert!((front.volume(&planes) - 32.0 * 64.0 * 64.0).abs() < 1e-6);

        // The new sides face out of each part
        assert!(front.sides().iter().any(|s| s.plane_num == opposite(plane_num)));
        assert!(back.sides().iter().any(|s| s.plane_num == plane_num));
    }

    #[test]
    fn barely_crossing_goes_to_one_side() {
        let mut planes = PlaneSet::new();
        let brush = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let plane_num =
            planes.find_or_insert(Plane::new(Vector3::new(1.0, 0.0, 0.0), 63.95));

        let (front, back) = split_brush(&brush, plane_num, &planes);
        assert!(front.is_none());
        assert_eq!(back.unwrap().sides().len(), 6);
    }

    #[test]
    fn missing_the_brush() {
        let mut planes = PlaneSet::new();
        let brush = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let plane_num = planes.find_or_insert(Plane::new(Vector3::new(0.0, 0.0, 1.0), -16.0));

        let (front, back) = split_brush(&brush, plane_num, &planes);
        assert!(front.is_some());
        assert!(back.is_none());
    }

    #[test]
    fn shared_faces_are_hidden() {
        let mut planes = PlaneSet::new();
        let mut a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [64.0, 0.0, 0.0], [128.0, 64.0, 64.0]);

        a.clip_sides_by_brushes(vec![&b], &planes);

        let visible = a
            .sides()
            .iter()
            .filter(|s| !s.visible_hull.is_empty())
            .count();
        assert_eq!(visible, 5);

        let touching = &a.sides()[0];
        assert_eq!(planes[touching.plane_num].normal, Vector3::new(1.0, 0.0, 0.0));
        assert!(touching.visible_hull.is_empty());
    }

    #[test]
    fn partly_covered_faces_keep_the_rest() {
        let mut planes = PlaneSet::new();
        let mut a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);
        let b = cuboid(&mut planes, [64.0, 0.0, 0.0], [128.0, 32.0, 64.0]);

        a.clip_sides_by_brushes(vec![&b], &planes);

        let hull = &a.sides()[0].visible_hull;
        assert!((hull.area() - 32.0 * 64.0).abs() < 1e-6);
        assert_eq!(hull.bounds().mins, Vector3::new(64.0, 32.0, 0.0));
    }

    #[test]
    fn nothing_in_the_way() {
        let mut planes = PlaneSet::new();
        let mut a = cuboid(&mut planes, [0.0; 3], [64.0; 3]);

        a.clip_sides_by_brushes(Vec::new(), &planes);
        for side in a.sides() {
            assert_eq!(side.visible_hull, side.winding);
        }
    }
}
