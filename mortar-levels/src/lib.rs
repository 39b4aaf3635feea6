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

//! Brush geometry for level editing.
//!
//! Brushes are convex solids described by the planes of their sides, all drawn from one
//! shared [`planes::PlaneSet`]. This crate builds the polygons for those sides, and
//! implements the constructive solid geometry the editor offers on top of them: subtract,
//! merge, hollow and make room. Splitting brushes by a plane, and working out which parts of
//! their sides are hidden by other brushes, are here too.

#[macro_use]
extern crate derive_builder;

#[cfg(feature = "serde-1")]
#[macro_use]
extern crate serde;

pub mod brush;
pub mod commands;
pub mod csg;
pub mod error;
pub mod material;
pub mod planes;
pub mod scene;
pub mod settings;
pub mod split;
pub mod winding;

pub use brush::{Brush, BrushSide};
pub use commands::SubtractReport;
pub use csg::{hollow, merge, subtract, Subtraction};
pub use error::{full_error_display, CsgError};
pub use material::{MaterialHandle, SurfaceMaterial};
pub use planes::{PlaneRef, PlaneSet};
pub use scene::{NodeId, Scene};
pub use settings::{CsgSettings, CsgSettingsBuilder};
pub use split::split_brush;
pub use winding::{SplitCounts, Winding, WindingVertex};
