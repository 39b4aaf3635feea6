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

use mortar_materials::registry::MemorySource;
use mortar_materials::{MaterialLoadConfig, MaterialRegistry};

/// A source with the given files, in order.
pub fn source(files: &[(&str, &str)]) -> MemorySource {
    let mut source = MemorySource::new();
    for (name, text) in files {
        source.add(name, text);
    }
    source
}

/// A registry with the given files loaded.
pub fn registry(files: &[(&str, &str)]) -> MaterialRegistry {
    let mut registry = MaterialRegistry::new(MaterialLoadConfig::default());
    registry.load(&source(files)).unwrap();
    registry
}

pub fn strings(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
}
