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

#![allow(dead_code)]

use std::sync::Arc;

use mortar_levels::{Brush, MaterialHandle, NodeId, PlaneSet, Scene, SurfaceMaterial};
use mortar_materials::{ContentsFlags, SurfaceFlags};
use mortar_types::Vector3;

/// A material with fixed properties, for when a real declaration isn't needed.
#[derive(Debug)]
pub struct StubMaterial {
    pub name: String,
    pub visible: bool,
    pub opaque: bool,
}

impl SurfaceMaterial for StubMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn surface_flags(&self) -> SurfaceFlags {
        if self.opaque {
            SurfaceFlags::OPAQUE
        } else {
            SurfaceFlags::empty()
        }
    }

    fn content_flags(&self) -> ContentsFlags {
        if self.opaque {
            ContentsFlags::SOLID | ContentsFlags::OPAQUE
        } else {
            ContentsFlags::SOLID
        }
    }
}

fn stub(name: &str, visible: bool, opaque: bool) -> MaterialHandle {
    Arc::new(StubMaterial {
        name: name.to_string(),
        visible,
        opaque,
    })
}

pub fn solid(name: &str) -> MaterialHandle {
    stub(name, true, true)
}

pub fn glass(name: &str) -> MaterialHandle {
    stub(name, true, false)
}

pub fn nodraw(name: &str) -> MaterialHandle {
    stub(name, false, true)
}

pub fn v(x: f64, y: f64, z: f64) -> Vector3 {
    Vector3::new(x, y, z)
}

pub fn cuboid(
    planes: &mut PlaneSet,
    mins: [f64; 3],
    maxs: [f64; 3],
    material: Option<MaterialHandle>,
) -> Brush {
    Brush::cuboid(
        planes,
        v(mins[0], mins[1], mins[2]),
        v(maxs[0], maxs[1], maxs[2]),
        material,
    )
}

/// Add a box under `parent`, with no material.
pub fn add_cuboid(scene: &mut Scene, parent: NodeId, mins: [f64; 3], maxs: [f64; 3]) -> NodeId {
    let brush = cuboid(scene.planes_mut(), mins, maxs, None);
    scene.add_brush(parent, brush).unwrap()
}

pub fn material_name(material: &Option<MaterialHandle>) -> Option<&str> {
    material.as_ref().map(|m| m.name())
}
