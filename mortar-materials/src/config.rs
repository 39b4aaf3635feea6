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

//! Settings for finding and loading declaration files

/// Where declaration files are found, and how to treat what's in them.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(public)]
pub struct MaterialLoadConfig {
    /// Folder holding declaration files, relative to the source root
    #[builder(default = "\"materials\".to_string()")]
    pub folder: String,

    /// Extension of declaration files, without the dot
    #[builder(default = "\"mtr\".to_string()")]
    pub extension: String,

    /// Log a warning when a name is declared more than once
    #[builder(default = "true")]
    pub warn_on_redefinition: bool,
}

impl Default for MaterialLoadConfig {
    fn default() -> MaterialLoadConfig {
        MaterialLoadConfig {
            folder: "materials".to_string(),
            extension: "mtr".to_string(),
            warn_on_redefinition: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = MaterialLoadConfigBuilder::default().build().unwrap();
        assert_eq!(built, MaterialLoadConfig::default());

        let custom = MaterialLoadConfigBuilder::default()
            .extension("shader".to_string())
            .build()
            .unwrap();
        assert_eq!(custom.extension, "shader");
        assert_eq!(custom.folder, "materials");
    }
}
