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


//! Builds a small room out of brushes, carves a doorway and a window into it, and logs what
//! each CSG operation did.
//!
//! Pass a base folder to load materials from its `materials/*.mtr` files, otherwise a few
//! built-in declarations are used.

use std::env;

use anyhow::{Context, Result};
use log::{info, warn};

use mortar_levels::{full_error_display, CsgSettingsBuilder, MaterialHandle, NodeId, Scene};
use mortar_materials::registry::{FolderSource, MemorySource};
use mortar_materials::{MaterialLoadConfig, MaterialRegistry, MaterialSource};
use mortar_types::Vector3;

const BUILTIN_MATERIALS: &str = r#"
textures/base/wall
{
    qer_editorimage textures/base/wall_ed
    diffusemap textures/base/wall_d
    bumpmap textures/base/wall_local
}

textures/base/glass
{
    translucent
    {
        blend add
        map textures/base/glass_d
    }
}
"#;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{}", full_error_display(err));
    }
}

fn try_main() -> Result<()> {
    // Initialise logger
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_max_level(log::LevelFilter::Debug)
            .set_thread_mode(simplelog::ThreadLogMode::Names)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("Error initialising logger")?;

    let config = MaterialLoadConfig::default();
    let mut registry = MaterialRegistry::new(config.clone());

    let source: Box<dyn MaterialSource> = match env::args().nth(1) {
        Some(base) => Box::new(FolderSource::new(base, &config)),
        None => {
            let mut source = MemorySource::new();
            source.add("builtin.mtr", BUILTIN_MATERIALS);
            Box::new(source)
        }
    };

    let count = registry
        .load(source.as_ref())
        .context("Error loading materials")?;
    info!("Loaded {} materials", count);

    let mut lookup = |name: &str| -> Option<MaterialHandle> {
        let found = registry.material(name);
        if !found.is_found() {
            warn!("Material {} is missing or has no editor image", name);
        }
        found.material().cloned().map(|m| m as MaterialHandle)
    };
    let wall = lookup("textures/base/wall");
    let glass = lookup("textures/base/glass");

    let settings = CsgSettingsBuilder::default()
        .grid_size(16.0)
        .build()
        .context("Error building CSG settings")?;
    let mut scene = Scene::new(settings);
    let world = scene
        .add_entity(scene.root(), "worldspawn")
        .context("Error adding worldspawn")?;

    // A solid block, replaced by the walls of a room
    let block = add_box(&mut scene, world, [0.0; 3], [512.0, 384.0, 256.0], wall.clone())?;
    scene.select(block);
    let walls = scene.hollow_selected()?;
    info!("Hollowed block into {} walls", walls.len());
    scene.clear_selection();

    // Doorway through the west wall, and a window through the east one
    let door = add_box(
        &mut scene,
        world,
        [-32.0, 160.0, 16.0],
        [32.0, 224.0, 144.0],
        wall.clone(),
    )?;
    let window = add_box(
        &mut scene,
        world,
        [480.0, 128.0, 96.0],
        [544.0, 256.0, 192.0],
        glass.clone(),
    )?;
    scene.select(door);
    scene.select(window);

    let report = scene.subtract_selected_from_unselected()?;
    info!(
        "Subtract replaced {} brushes with {}",
        report.before, report.after
    );

    scene.remove(door);
    scene.remove(window);
    scene.clear_selection();

    // Two slabs of floor that line up can become one
    let a = add_box(&mut scene, world, [16.0, 16.0, 16.0], [256.0, 368.0, 32.0], wall.clone())?;
    let b = add_box(&mut scene, world, [256.0, 16.0, 16.0], [496.0, 368.0, 32.0], wall)?;
    scene.select(a);
    scene.select(b);
    match scene.merge_selected() {
        Ok(merged) => info!("Merged floor into {} brush(es)", merged.len()),
        Err(e) => warn!("Couldn't merge floor: {}", e),
    }

    // A pillar with room made around it
    scene.clear_selection();
    let pillar = add_box(
        &mut scene,
        world,
        [240.0, 176.0, 32.0],
        [272.0, 208.0, 240.0],
        glass,
    )?;
    scene.select(pillar);
    let casing = scene.make_room_for_selected()?;
    info!("Made room around pillar with {} brushes", casing.len());

    for id in scene.brushes() {
        if let Some(brush) = scene.brush(id) {
            let bounds = brush.bounds();
            info!(
                "Brush {}: {} sides, {:?} to {:?}, opaque: {}",
                id.index(),
                brush.contributing_sides().count(),
                bounds.mins.as_slice(),
                bounds.maxs.as_slice(),
                brush.is_opaque()
            );
        }
    }

    Ok(())
}

fn add_box(
    scene: &mut Scene,
    parent: NodeId,
    mins: [f64; 3],
    maxs: [f64; 3],
    material: Option<MaterialHandle>,
) -> Result<NodeId> {
    let brush = mortar_levels::Brush::cuboid(
        scene.planes_mut(),
        Vector3::new(mins[0], mins[1], mins[2]),
        Vector3::new(maxs[0], maxs[1], maxs[2]),
        material,
    );

    scene
        .add_brush(parent, brush)
        .context("Error adding brush to scene")
}
