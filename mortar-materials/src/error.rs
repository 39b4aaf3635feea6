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

//! Errors raised while reading material declarations

use std::io;

use thiserror::Error;

/// An error in the text of a declaration file or material body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Expected '{expected}' but found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Unbalanced braces in declaration '{0}'")]
    UnbalancedBraces(String),
}

/// An error reading declarations from a source of files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Couldn't list material folder {folder}")]
    ListFolder {
        folder: String,
        #[source]
        source: io::Error,
    },

    #[error("Couldn't read material file {file}")]
    ReadFile {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing material file {file}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
