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

mod helpers;
use helpers::*;

use mortar_levels::csg::{subtract_brush, Subtraction};
use mortar_levels::{merge, split_brush, subtract, PlaneSet};
use mortar_types::Plane;

#[test]
fn carved_faces_take_the_subtracting_material() {
    let mut planes = PlaneSet::new();
    let a = cuboid(&mut planes, [0.0; 3], [64.0; 3], Some(solid("textures/stone")));
    let b = cuboid(
        &mut planes,
        [32.0, -16.0, -16.0],
        [96.0, 80.0, 80.0],
        Some(solid("textures/cutter")),
    );

    let (changed, fragments) = subtract(&a, &b, &planes);
    assert!(changed);
    assert_eq!(fragments.len(), 1);

    let fragment = &fragments[0];
    for side in fragment.sides() {
        let on_cut = planes[side.plane_num] == Plane::new(v(1.0, 0.0, 0.0), 32.0);
        let expected = if on_cut {
            "textures/cutter"
        } else {
            "textures/stone"
        };
        assert_eq!(material_name(&side.material), Some(expected));
    }
}

#[test]
fn subtracting_leaves_the_inputs_alone() {
    let mut planes = PlaneSet::new();
    let a = cuboid(&mut planes, [0.0; 3], [64.0; 3], None);
    let b = cuboid(&mut planes, [32.0; 3], [96.0; 3], None);
    let sides_before = a.sides().len();

    match subtract_brush(&a, &b, &planes) {
        Subtraction::Fragments(fragments) => assert_eq!(fragments.len(), 3),
        other => panic!("expected fragments, got {:?}", other),
    }

    assert_eq!(a.sides().len(), sides_before);
    assert!(a.is_evaluated());
}

#[test]
fn fragments_fill_what_is_left() {
    let mut planes = PlaneSet::new();
    let a = cuboid(&mut planes, [0.0; 3], [64.0; 3], None);
    let b = cuboid(&mut planes, [32.0; 3], [96.0; 3], None);

    let (_, fragments) = subtract(&a, &b, &planes);
    let volume: f64 = fragments.iter().map(|f| f.volume(&planes)).sum();

    let expected = 64.0 * 64.0 * 64.0 - 32.0 * 32.0 * 32.0;
    assert!((volume - expected).abs() < 1e-3);
    assert!(fragments.iter().all(|f| f.is_evaluated()));
    assert!(fragments.iter().all(|f| f.sides().iter().all(|s| s.contributes())));
}

#[test]
fn merge_checks_materials_unless_only_shape() {
    let mut planes = PlaneSet::new();
    let a = cuboid(&mut planes, [0.0; 3], [64.0; 3], Some(solid("textures/stone")));
    let b = cuboid(
        &mut planes,
        [64.0, 0.0, 0.0],
        [128.0, 64.0, 64.0],
        Some(solid("textures/brick")),
    );
    let c = cuboid(
        &mut planes,
        [64.0, 0.0, 0.0],
        [128.0, 64.0, 64.0],
        Some(solid("Textures/Stone")),
    );

    assert!(merge(&[&a, &b], &planes, false).is_none());
    assert!(merge(&[&a, &b], &planes, true).is_some());
    assert!(merge(&[&a, &c], &planes, false).is_some());
}

#[test]
fn merging_a_stack() {
    let mut planes = PlaneSet::new();
    let a = cuboid(&mut planes, [0.0; 3], [64.0; 3], None);
    let b = cuboid(&mut planes, [0.0, 0.0, 64.0], [64.0, 64.0, 128.0], None);
    let c = cuboid(&mut planes, [0.0, 0.0, 128.0], [64.0, 64.0, 192.0], None);

    let merged = merge(&[&a, &b, &c], &planes, true).unwrap();
    assert_eq!(merged.sides().len(), 6);
    assert_eq!(merged.bounds().maxs, v(64.0, 64.0, 192.0));
    assert!((merged.volume(&planes) - 64.0 * 64.0 * 192.0).abs() < 1e-3);
}

#[test]
fn diagonal_split_halves_volume() {
    let mut planes = PlaneSet::new();
    let brush = cuboid(&mut planes, [0.0; 3], [64.0; 3], None);

    let normal = v(1.0, 1.0, 0.0).normalize();
    let plane_num = planes.find_or_insert(Plane::new(normal, normal.dot(&v(32.0, 32.0, 0.0))));

    let (front, back) = split_brush(&brush, plane_num, &planes);
    let front = front.unwrap();
    let back = back.unwrap();

    let half = 64.0 * 64.0 * 64.0 / 2.0;
    assert!((front.volume(&planes) - half).abs() < 1e-3);
    assert!((back.volume(&planes) - half).abs() < 1e-3);
    assert_eq!(front.sides().len(), 5);
    assert_eq!(back.sides().len(), 5);
}

#[test]
fn translucent_brushes_hide_nothing() {
    let mut planes = PlaneSet::new();
    let mut a = cuboid(&mut planes, [0.0; 3], [64.0; 3], Some(solid("textures/stone")));
    let b = cuboid(
        &mut planes,
        [64.0, 0.0, 0.0],
        [128.0, 64.0, 64.0],
        Some(glass("textures/glass")),
    );
    let c = cuboid(
        &mut planes,
        [-64.0, 0.0, 0.0],
        [0.0, 64.0, 64.0],
        Some(solid("textures/stone")),
    );

    assert!(!b.is_opaque());
    assert!(c.is_opaque());

    a.clip_sides_by_brushes(vec![&b, &c], &planes);

    let visible = a
        .sides()
        .iter()
        .filter(|s| !s.visible_hull.is_empty())
        .count();
    assert_eq!(visible, 5);
}

#[test]
fn invisible_sides_have_no_hull() {
    let mut planes = PlaneSet::new();
    let mut a = cuboid(&mut planes, [0.0; 3], [64.0; 3], Some(nodraw("textures/nodraw")));

    a.clip_sides_by_brushes(Vec::new(), &planes);
    assert!(a.sides().iter().all(|s| s.visible_hull.is_empty()));
}
