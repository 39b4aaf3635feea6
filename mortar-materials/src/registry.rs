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

//! Keeps every declared material, parsing and evaluating them only when asked for.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::MaterialLoadConfig;
use crate::decl::{normalise_name, parse_declarations, Declaration};
use crate::error::LoadError;
use crate::evaluate::Material;
use crate::template::ShaderTemplate;

/// Somewhere declaration files can be read from.
pub trait MaterialSource {
    /// Names of every declaration file, in the order they should be loaded.
    fn files(&self) -> Result<Vec<String>, LoadError>;

    fn read(&self, file: &str) -> Result<String, LoadError>;
}

/// Reads declaration files with the configured extension from a folder on disk.
#[derive(Debug, Clone)]
pub struct FolderSource {
    folder: PathBuf,
    extension: String,
}

impl FolderSource {
    pub fn new<P: AsRef<Path>>(root: P, config: &MaterialLoadConfig) -> FolderSource {
        FolderSource {
            folder: root.as_ref().join(&config.folder),
            extension: config.extension.clone(),
        }
    }
}

impl MaterialSource for FolderSource {
    fn files(&self) -> Result<Vec<String>, LoadError> {
        let entries = fs::read_dir(&self.folder).map_err(|source| LoadError::ListFolder {
            folder: self.folder.display().to_string(),
            source,
        })?;

        let mut files = vec![];
        for entry in entries.flatten() {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case(&self.extension));

            if matches && path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push(name.to_string());
                }
            }
        }

        // Directory order isn't stable, and load order decides which duplicate wins
        files.sort();
        Ok(files)
    }

    fn read(&self, file: &str) -> Result<String, LoadError> {
        fs::read_to_string(self.folder.join(file)).map_err(|source| LoadError::ReadFile {
            file: file.to_string(),
            source,
        })
    }
}

/// Declaration files held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    pub fn add(&mut self, file: &str, text: &str) -> &mut MemorySource {
        self.files.push((file.to_string(), text.to_string()));
        self
    }
}

impl MaterialSource for MemorySource {
    fn files(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.files.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read(&self, file: &str) -> Result<String, LoadError> {
        self.files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| LoadError::ReadFile {
                file: file.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
    }
}

/// Decides whether a texture can actually be loaded.
pub trait TextureLookup {
    fn texture_exists(&self, texture: &str) -> bool;
}

impl<F: Fn(&str) -> bool> TextureLookup for F {
    fn texture_exists(&self, texture: &str) -> bool {
        self(texture)
    }
}

/// Result of looking up a material by name.
#[derive(Debug, Clone)]
pub enum MaterialLookup {
    Found(Arc<Material>),

    /// The material is declared, but its editor texture couldn't be found.
    MissingTexture(Arc<Material>),

    NotFound,
}

impl MaterialLookup {
    /// The material, if one is declared.
    pub fn material(&self) -> Option<&Arc<Material>> {
        match self {
            MaterialLookup::Found(m) | MaterialLookup::MissingTexture(m) => Some(m),
            MaterialLookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MaterialLookup::Found(_))
    }
}

/// Where a material name leads: a template, and the arguments to evaluate it with.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDefinition {
    pub template: String,
    pub args: Vec<String>,

    /// File the definition was read from
    pub file: String,
}

/// Every material declared in the loaded files.
pub struct MaterialRegistry {
    config: MaterialLoadConfig,
    templates: HashMap<String, ShaderTemplate>,
    definitions: HashMap<String, MaterialDefinition>,
    active: HashMap<String, Arc<Material>>,
    textures: Option<Box<dyn TextureLookup>>,
}

impl MaterialRegistry {
    pub fn new(config: MaterialLoadConfig) -> MaterialRegistry {
        MaterialRegistry {
            config,
            templates: HashMap::new(),
            definitions: HashMap::new(),
            active: HashMap::new(),
            textures: None,
        }
    }

    pub fn config(&self) -> &MaterialLoadConfig {
        &self.config
    }

    /// Used to report materials whose texture is missing.
    pub fn set_texture_lookup(&mut self, lookup: Box<dyn TextureLookup>) {
        self.textures = Some(lookup);
        self.active.clear();
    }

    /// Load every file from `source`. A file that can't be read or parsed is skipped with a
    /// warning, and doesn't stop the others loading.
    /// Returns the number of material definitions added.
    pub fn load(&mut self, source: &dyn MaterialSource) -> Result<usize, LoadError> {
        let files = source.files()?;
        let mut added = 0;

        for file in files.iter() {
            let result = source
                .read(file)
                .and_then(|text| self.load_file(file, &text));

            match result {
                Ok(n) => added += n,
                Err(e) => warn!("{:#}", anyhow::Error::from(e)),
            }
        }

        info!(
            "Loaded {} material definitions from {} files",
            added,
            files.len()
        );
        Ok(added)
    }

    /// Add the declarations in one file. Nothing is added if the file fails to parse.
    /// Returns the number of material definitions added.
    pub fn load_file(&mut self, file: &str, text: &str) -> Result<usize, LoadError> {
        let decls = parse_declarations(text).map_err(|source| LoadError::Parse {
            file: file.to_string(),
            source,
        })?;

        let mut added = 0;
        for decl in decls {
            match decl {
                Declaration::Material { name, block } => {
                    if self.define(&name, &name, vec![], file) {
                        self.templates
                            .insert(name.clone(), ShaderTemplate::new(&name, &block));
                        added += 1;
                    }
                }
                Declaration::Template {
                    name,
                    params,
                    block,
                } => {
                    if self.templates.contains_key(&name) {
                        self.warn_redefinition("Template", &name, file);
                    } else {
                        self.templates.insert(
                            name.clone(),
                            ShaderTemplate::with_params(&name, &block, params),
                        );
                    }
                }
                Declaration::Guide {
                    name,
                    template,
                    args,
                } => {
                    if self.define(&name, &template, args, file) {
                        added += 1;
                    }
                }
            }
        }

        debug!("Read {} material definitions from {}", added, file);
        Ok(added)
    }

    /// Point `name` at a template. The first definition of a name wins.
    fn define(&mut self, name: &str, template: &str, args: Vec<String>, file: &str) -> bool {
        if self.definitions.contains_key(name) || self.templates.contains_key(name) {
            self.warn_redefinition("Material", name, file);
            return false;
        }

        self.definitions.insert(
            name.to_string(),
            MaterialDefinition {
                template: template.to_string(),
                args,
                file: file.to_string(),
            },
        );
        true
    }

    fn warn_redefinition(&self, kind: &str, name: &str, file: &str) {
        if !self.config.warn_on_redefinition {
            return;
        }

        let first = self
            .definitions
            .get(name)
            .map(|d| d.file.as_str())
            .unwrap_or("an earlier file");
        warn!(
            "{} {} already defined in {}, ignoring definition in {}",
            kind, name, first, file
        );
    }

    /// True if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(&normalise_name(name))
    }

    /// Number of declared materials.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Names of every declared material, sorted.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// True once the template `name` has had its body parsed.
    pub fn is_template_parsed(&self, name: &str) -> bool {
        self.templates
            .get(&normalise_name(name))
            .map_or(false, ShaderTemplate::is_parsed)
    }

    pub fn definition(&self, name: &str) -> Option<&MaterialDefinition> {
        self.definitions.get(&normalise_name(name))
    }

    /// Get a template by name, parsing it if this is the first time it's been used.
    pub fn template(&mut self, name: &str) -> Option<&ShaderTemplate> {
        let template = self.templates.get_mut(&normalise_name(name))?;
        if let Err(e) = template.parse().map(|_| ()) {
            warn!("Error parsing material {}: {}", template.name(), e);
        }

        Some(template)
    }

    /// Get a material by name, evaluating it on first use.
    pub fn material(&mut self, name: &str) -> MaterialLookup {
        let name = normalise_name(name);

        if let Some(material) = self.active.get(&name) {
            let material = material.clone();
            return self.check_texture(material);
        }

        let definition = match self.definitions.get(&name) {
            Some(d) => d.clone(),
            None => return MaterialLookup::NotFound,
        };

        let material = {
            let template = match self.templates.get_mut(&definition.template) {
                Some(t) => t,
                None => {
                    warn!(
                        "Material {} uses undeclared template {}",
                        name, definition.template
                    );
                    return MaterialLookup::NotFound;
                }
            };

            if let Err(e) = template.parse().map(|_| ()) {
                warn!("Error parsing material {}: {}", template.name(), e);
            }

            let data = match template.data() {
                Some(d) => d,
                None => return MaterialLookup::NotFound,
            };

            Arc::new(Material::evaluate(
                &name,
                template.name(),
                data,
                template.params(),
                &definition.args,
            ))
        };

        self.active.insert(name, material.clone());
        self.check_texture(material)
    }

    fn check_texture(&self, material: Arc<Material>) -> MaterialLookup {
        match &self.textures {
            Some(lookup) if !lookup.texture_exists(material.editor_texture()) => {
                MaterialLookup::MissingTexture(material)
            }
            _ => MaterialLookup::Found(material),
        }
    }

    /// Throw away parsed and evaluated state, so everything is parsed again from the
    /// declarations on next use.
    pub fn reload(&mut self) {
        for template in self.templates.values_mut() {
            template.invalidate();
        }
        self.active.clear();
        info!("Reloading {} material templates", self.templates.len());
    }

    /// Forget every declaration.
    pub fn clear(&mut self) {
        self.templates.clear();
        self.definitions.clear();
        self.active.clear();
    }
}
