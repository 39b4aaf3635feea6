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

//! Reading material declaration files.
//!
//! Files are split into named declarations up front, but each body is only parsed into a
//! [`template::ShaderTemplate`] when the material is first asked for. Templates can take
//! parameters, which are substituted when the template is evaluated into a
//! [`evaluate::Material`].

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate derive_builder;

#[cfg(feature = "serde-1")]
#[macro_use]
extern crate serde;

pub mod blend;
pub mod config;
pub mod decl;
pub mod error;
pub mod evaluate;
pub mod expr;
pub mod flags;
pub mod layer;
pub mod registry;
mod stage;
pub mod template;
pub mod tokeniser;

pub use blend::{BlendFactor, BlendFunc};
pub use config::{MaterialLoadConfig, MaterialLoadConfigBuilder};
pub use error::{LoadError, ParseError};
pub use evaluate::{MapLayer, Material};
pub use flags::{ContentsFlags, Coverage, FrobStageType, MaterialFlags, SurfaceFlags};
pub use registry::{MaterialLookup, MaterialRegistry, MaterialSource};
pub use template::ShaderTemplate;
