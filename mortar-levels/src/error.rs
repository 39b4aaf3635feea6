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

//! Error types

use thiserror::Error;

/// Why a CSG command couldn't run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CsgError {
    #[error("No brushes selected")]
    NoBrushesSelected,

    #[error("At least two brushes have to be selected")]
    NotEnoughBrushes,

    #[error("Result would not be convex")]
    NotConvex,
}

/// Displays an error along with everything that caused it
pub fn full_error_display(err: anyhow::Error) -> String {
    let cont = err
        .chain()
        .skip(1)
        .map(|cause| format!("    caused by: {}", cause))
        .collect::<Vec<String>>()
        .join("\n");

    format!("Error: {}\n{}", err, cont)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn display_includes_causes() {
        let err = Err::<(), _>(CsgError::NotConvex)
            .context("CSG Merge failed")
            .unwrap_err();

        assert_eq!(
            full_error_display(err),
            "Error: CSG Merge failed\n    caused by: Result would not be convex"
        );
    }
}
