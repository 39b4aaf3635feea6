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

//! Settings for the CSG commands

/// Values the editor would normally read from its registry.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(public)]
pub struct CsgSettings {
    /// Wall thickness used by hollow and make room
    #[builder(default = "8.0")]
    pub grid_size: f64,

    /// Log a reminder that subtraction can leave lots of small brushes behind
    #[builder(default = "true")]
    pub warn_on_subtract: bool,
}

impl Default for CsgSettings {
    fn default() -> CsgSettings {
        CsgSettings {
            grid_size: 8.0,
            warn_on_subtract: true,
        }
    }
}
