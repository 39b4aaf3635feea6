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

//! Common types for all mortar crates.
//! Vectors are double precision, since brush geometry is clipped against huge base windings.

extern crate nalgebra as na;

#[cfg(feature = "serde-1")]
#[macro_use]
extern crate serde;

pub mod bounds;
pub mod plane;

pub use bounds::Aabb;
pub use plane::{Plane, PlaneSide};

/// Alias for convenience
pub type Vector2 = na::base::Vector2<f64>;

/// Alias for convenience
pub type Vector3 = na::base::Vector3<f64>;

/// Alias for convenience
pub type Vector4 = na::base::Vector4<f64>;

/// Largest coordinate any bounded brush may reach on any axis.
pub const MAX_WORLD_COORD: f64 = 128.0 * 1024.0;

/// Smallest coordinate any bounded brush may reach on any axis.
pub const MIN_WORLD_COORD: f64 = -128.0 * 1024.0;

/// Extent of the world along one axis. Base windings are this big.
pub const MAX_WORLD_SIZE: f64 = MAX_WORLD_COORD - MIN_WORLD_COORD;

/// Tolerance used when classifying points against planes in the editor.
pub const ON_EPSILON: f64 = 1.0 / 256.0;

/// Tolerance used when clipping compiler windings.
pub const CLIP_EPSILON: f64 = 0.1;

/// Tolerance for comparing plane normals.
pub const NORMAL_EPSILON: f64 = 0.0001;

/// Tolerance for comparing plane distances.
pub const DIST_EPSILON: f64 = 0.01;
