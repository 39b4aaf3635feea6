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

//! Turning a parsed template and a set of arguments into a concrete material.

use log::warn;

use crate::blend::BlendFunc;
use crate::expr::normalise_map_expression;
use crate::flags::{
    ClampType, ContentsFlags, Coverage, CullType, MaterialFlags, SurfaceFlags, SurfaceType,
};
use crate::layer::{LayerType, ShaderLayer};
use crate::template::TemplateData;

/// Replace parameter names in `expression` with the matching arguments.
///
/// The text is scanned left to right, each time replacing the parameter whose first
/// occurrence starts earliest. When two parameters start at the same place, the one declared
/// first wins. Parameters without a matching argument are left alone.
pub fn substitute_parameters(expression: &str, params: &[String], args: &[String]) -> String {
    let mut result = String::with_capacity(expression.len());
    let mut rest = expression;

    loop {
        let mut best: Option<(usize, usize)> = None;
        for (i, param) in params.iter().enumerate().take(args.len()) {
            if param.is_empty() {
                continue;
            }

            if let Some(offset) = rest.find(param.as_str()) {
                if best.map_or(true, |(b, _)| offset < b) {
                    best = Some((offset, i));
                }
            }
        }

        match best {
            Some((offset, i)) => {
                result.push_str(&rest[..offset]);
                result.push_str(&args[i]);
                rest = &rest[offset + params[i].len()..];
            }
            None => {
                result.push_str(rest);
                return result;
            }
        }
    }
}

/// A layer with its arguments substituted and blend resolved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct MapLayer {
    pub layer_type: LayerType,

    /// Image for this layer, empty if it has none
    pub texture: String,
    pub blend_func: BlendFunc,
    pub clamp_to_border: bool,
    pub alpha_test: f32,
    pub condition: Option<String>,
}

impl MapLayer {
    /// Evaluate `layer` using `args` for the template's `params`.
    /// `clamp_type` is the material's own clamp, used when the layer doesn't set one.
    pub fn evaluate(
        layer: &ShaderLayer,
        clamp_type: ClampType,
        params: &[String],
        args: &[String],
    ) -> MapLayer {
        let sub = |s: &str| substitute_parameters(s, params, args);

        let texture = layer
            .map_expression
            .as_deref()
            .map(|m| normalise_map_expression(&sub(m)))
            .unwrap_or_default();

        // Lit layers are combined by the renderer, their blend strings only name the type
        let blend_func = if layer.is_blend() {
            BlendFunc::from_strings(&sub(&layer.blend_strings.0), &sub(&layer.blend_strings.1))
        } else {
            BlendFunc::default()
        };

        let clamp = if layer.clamp_type == ClampType::Repeat {
            clamp_type
        } else {
            layer.clamp_type
        };

        let alpha_test = match &layer.alpha_test {
            Some(expr) => {
                let value = sub(expr);
                value.trim().parse::<f32>().unwrap_or_else(|_| {
                    warn!("Alpha test value is not a constant: {}", value);
                    0.0
                })
            }
            None => 0.0,
        };

        MapLayer {
            layer_type: layer.layer_type,
            texture,
            blend_func,
            clamp_to_border: matches!(clamp, ClampType::ZeroClamp | ClampType::AlphaZeroClamp),
            alpha_test,
            condition: layer.condition.as_ref().map(|c| sub(c)),
        }
    }
}

/// A material ready for use: a template evaluated with a particular set of arguments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Material {
    name: String,
    template: String,
    args: Vec<String>,
    description: String,
    editor_texture: String,
    layers: Vec<MapLayer>,
    material_flags: MaterialFlags,
    surface_flags: SurfaceFlags,
    content_flags: ContentsFlags,
    surface_type: SurfaceType,
    cull_type: CullType,
    clamp_type: ClampType,
    coverage: Coverage,
    sort_request: f32,
    polygon_offset: f32,
    light: LightInfo,
    gui_surface: bool,
}

/// Light material settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct LightInfo {
    pub ambient: bool,
    pub blend: bool,
    pub fog: bool,
    pub cubic: bool,
    pub falloff: Option<String>,
}

impl Material {
    /// Evaluate the parsed `data` of template `template` with `args`.
    pub fn evaluate(
        name: &str,
        template: &str,
        data: &TemplateData,
        params: &[String],
        args: &[String],
    ) -> Material {
        if args.len() != params.len() {
            warn!(
                "Material {} passes {} arguments to {}, which takes {}",
                name,
                args.len(),
                template,
                params.len()
            );
        }

        let sub = |s: &str| normalise_map_expression(&substitute_parameters(s, params, args));

        let layers: Vec<MapLayer> = data
            .layers
            .iter()
            .map(|l| MapLayer::evaluate(l, data.clamp_type, params, args))
            .collect();

        // Fall back to the diffuse map, then the material's own name
        let editor_texture = match &data.editor_texture {
            Some(e) => sub(e),
            None => layers
                .iter()
                .find(|l| l.layer_type == LayerType::Diffuse && !l.texture.is_empty())
                .map(|l| l.texture.clone())
                .unwrap_or_else(|| name.to_string()),
        };

        Material {
            name: name.to_string(),
            template: template.to_string(),
            args: args.to_vec(),
            description: data.description.clone(),
            editor_texture,
            layers,
            material_flags: data.material_flags,
            surface_flags: data.surface_flags,
            content_flags: ContentsFlags::from_surface(data.surface_flags, data.coverage),
            surface_type: data.surface_type,
            cull_type: data.cull_type,
            clamp_type: data.clamp_type,
            coverage: data.coverage,
            sort_request: data.sort_request,
            polygon_offset: data.polygon_offset,
            light: LightInfo {
                ambient: data.ambient_light,
                blend: data.blend_light,
                fog: data.fog_light,
                cubic: data.cubic_light,
                falloff: data.light_falloff.as_deref().map(|f| sub(f)),
            },
            gui_surface: data.surface_flags.contains(SurfaceFlags::GUI_SURF),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the template this was evaluated from. Equal to `name` for plain materials.
    pub fn template_name(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Image shown for this material in the editor.
    pub fn editor_texture(&self) -> &str {
        &self.editor_texture
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// First layer of the given type.
    pub fn layer(&self, layer_type: LayerType) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.layer_type == layer_type)
    }

    pub fn material_flags(&self) -> MaterialFlags {
        self.material_flags
    }

    pub fn surface_flags(&self) -> SurfaceFlags {
        self.surface_flags
    }

    pub fn content_flags(&self) -> ContentsFlags {
        self.content_flags
    }

    pub fn surface_type(&self) -> SurfaceType {
        self.surface_type
    }

    pub fn cull_type(&self) -> CullType {
        self.cull_type
    }

    pub fn clamp_type(&self) -> ClampType {
        self.clamp_type
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn sort_request(&self) -> f32 {
        self.sort_request
    }

    pub fn polygon_offset(&self) -> f32 {
        self.polygon_offset
    }

    pub fn light(&self) -> &LightInfo {
        &self.light
    }

    /// True if anything is drawn for surfaces using this material.
    pub fn is_visible(&self) -> bool {
        !self.layers.is_empty() || self.gui_surface
    }
}
