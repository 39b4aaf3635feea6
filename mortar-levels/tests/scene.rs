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

use mortar_levels::{CsgError, CsgSettingsBuilder, Scene, SubtractReport};
use mortar_materials::registry::MemorySource;
use mortar_materials::{ContentsFlags, MaterialLoadConfig, MaterialRegistry};

#[test]
fn subtraction_chains_through_the_selection() {
    let mut scene = Scene::default();
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
    let target = add_cuboid(&mut scene, world, [0.0; 3], [96.0; 3]);
    let left = add_cuboid(&mut scene, world, [-16.0; 3], [32.0, 112.0, 112.0]);
    let right = add_cuboid(&mut scene, world, [64.0, -16.0, -16.0], [112.0; 3]);
    scene.select(left);
    scene.select(right);

    let report = scene.subtract_selected_from_unselected().unwrap();
    assert_eq!(report, SubtractReport { before: 1, after: 1 });
    assert!(scene.node(target).is_none());

    let remaining = *scene.brushes().last().unwrap();
    let bounds = scene.brush(remaining).unwrap().bounds();
    assert_eq!(bounds.mins, v(32.0, 0.0, 0.0));
    assert_eq!(bounds.maxs, v(64.0, 96.0, 96.0));
}

#[test]
fn brushes_under_hidden_entities_are_not_subtracted_from() {
    let mut scene = Scene::default();
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
    let door = scene.add_entity(scene.root(), "func_static").unwrap();
    let target = add_cuboid(&mut scene, door, [0.0; 3], [96.0; 3]);
    let cutter = add_cuboid(&mut scene, world, [64.0, -16.0, -16.0], [112.0; 3]);
    scene.set_visible(door, false);
    scene.select(cutter);

    let report = scene.subtract_selected_from_unselected().unwrap();
    assert_eq!(report, SubtractReport { before: 0, after: 0 });
    assert!(scene.node(target).is_some());
    assert_eq!(scene.brush(target).unwrap().bounds().maxs, v(96.0, 96.0, 96.0));
}

#[test]
fn consumed_brushes_are_removed() {
    let mut scene = Scene::default();
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
    let target = add_cuboid(&mut scene, world, [16.0; 3], [48.0; 3]);
    let cutter = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
    scene.select(cutter);

    let report = scene.subtract_selected_from_unselected().unwrap();
    assert_eq!(report, SubtractReport { before: 1, after: 0 });
    assert!(scene.node(target).is_none());
    assert_eq!(scene.brushes(), vec![cutter]);
}

#[test]
fn merge_needs_two_brushes() {
    let mut scene = Scene::default();
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
    let a = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
    scene.select(a);
    scene.select(world);

    assert_eq!(scene.merge_selected(), Err(CsgError::NotEnoughBrushes));
    assert!(scene.node(a).is_some());
}

#[test]
fn walls_use_the_grid_size() {
    let settings = CsgSettingsBuilder::default()
        .grid_size(16.0)
        .warn_on_subtract(false)
        .build()
        .unwrap();
    let mut scene = Scene::new(settings);
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
    let a = add_cuboid(&mut scene, world, [0.0; 3], [128.0; 3]);
    scene.select(a);

    let walls = scene.hollow_selected().unwrap();
    assert_eq!(walls.len(), 6);

    let top = scene.brush(walls[4]).unwrap().bounds();
    assert_eq!(top.mins, v(0.0, 0.0, 112.0));
    assert_eq!(top.maxs, v(128.0, 128.0, 128.0));
}

#[test]
fn brushes_with_declared_materials() {
    let mut source = MemorySource::new();
    source.add(
        "base.mtr",
        "textures/stone { diffusemap textures/stone_d }\n\
         textures/water { translucent water { blend add map textures/water_d } }",
    );

    let mut registry = MaterialRegistry::new(MaterialLoadConfig::default());
    registry.load(&source).unwrap();

    let stone: mortar_levels::MaterialHandle =
        registry.material("textures/stone").material().cloned().unwrap();
    let water: mortar_levels::MaterialHandle =
        registry.material("textures/water").material().cloned().unwrap();

    let mut scene = Scene::default();
    let world = scene.add_entity(scene.root(), "worldspawn").unwrap();

    let floor = cuboid(scene.planes_mut(), [0.0; 3], [256.0, 256.0, 16.0], Some(stone));
    let pool = cuboid(
        scene.planes_mut(),
        [64.0, 64.0, 8.0],
        [192.0, 192.0, 64.0],
        Some(water),
    );
    let floor = scene.add_brush(world, floor).unwrap();
    let pool = scene.add_brush(world, pool).unwrap();

    assert!(scene.brush(floor).unwrap().is_opaque());
    let pool_brush = scene.brush(pool).unwrap();
    assert!(!pool_brush.is_opaque());
    assert!(pool_brush.contents().contains(ContentsFlags::WATER));

    scene.select(pool);
    let report = scene.subtract_selected_from_unselected().unwrap();
    assert_eq!(report.before, 1);
    assert_eq!(report.after, 5);
}
