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

//! What brush geometry needs to know about the material on a side

use std::fmt::Debug;
use std::sync::Arc;

use mortar_materials::{ContentsFlags, Material, SurfaceFlags};

/// The view of a material that brush operations use.
pub trait SurfaceMaterial: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// False for materials that never draw anything, like clip or trigger textures.
    fn is_visible(&self) -> bool;

    fn surface_flags(&self) -> SurfaceFlags;

    fn content_flags(&self) -> ContentsFlags;

    /// Opaque materials hide whatever is behind them.
    fn is_opaque(&self) -> bool {
        self.content_flags().contains(ContentsFlags::OPAQUE)
    }
}

/// A shared reference to a side's material.
pub type MaterialHandle = Arc<dyn SurfaceMaterial>;

impl SurfaceMaterial for Material {
    fn name(&self) -> &str {
        Material::name(self)
    }

    fn is_visible(&self) -> bool {
        Material::is_visible(self)
    }

    fn surface_flags(&self) -> SurfaceFlags {
        Material::surface_flags(self)
    }

    fn content_flags(&self) -> ContentsFlags {
        Material::content_flags(self)
    }
}

/// Materials are the same if their names match, ignoring case. No material only matches no material.
pub fn same_material(a: &Option<MaterialHandle>, b: &Option<MaterialHandle>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.name().eq_ignore_ascii_case(b.name()),
        (None, None) => true,
        _ => false,
    }
}
