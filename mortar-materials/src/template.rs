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

//! Material templates: the raw body of a declaration, parsed into layers and flags on first use.

use log::{debug, warn};

use crate::blend::BlendFunc;
use crate::error::{ParseError, Result};
use crate::expr::{read_expression, read_expression_list, read_map_expression};
use crate::flags::{
    lookup, sort, ClampType, Coverage, CullType, DeformType, FrobStageType, MaterialFlags,
    ParseFlags,
    SurfaceFlags, SurfaceType, MATERIAL_FLAG_KEYWORDS, SURFACE_FLAG_KEYWORDS,
    SURFACE_TYPE_KEYWORDS,
};
use crate::layer::{LayerType, MapType, ShaderLayer};
use crate::tokeniser::DefTokeniser;

/// Falloff used by ambient and blend lights that don't name one.
pub const DEFAULT_LIGHT_FALLOFF: &str = "makeintensity(lights/squarelight1a)";

/// How long a decal stays and fades, and its colour as it does.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct DecalInfo {
    pub stay_milliseconds: u32,
    pub fade_milliseconds: u32,
    pub start_colour: [f32; 4],
    pub end_colour: [f32; 4],
}

impl Default for DecalInfo {
    fn default() -> DecalInfo {
        DecalInfo {
            stay_milliseconds: 0,
            fade_milliseconds: 0,
            start_colour: [1.0, 1.0, 1.0, 1.0],
            end_colour: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Everything read from a template body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct TemplateData {
    pub description: String,
    pub editor_texture: Option<String>,
    pub layers: Vec<ShaderLayer>,
    pub material_flags: MaterialFlags,
    pub parse_flags: ParseFlags,
    pub cull_type: CullType,
    pub clamp_type: ClampType,
    pub surface_flags: SurfaceFlags,
    pub surface_type: SurfaceType,
    pub deform_type: DeformType,
    pub deform_expressions: Vec<String>,
    pub deform_decl: Option<String>,
    pub spectrum: i32,
    pub sort_request: f32,
    pub polygon_offset: f32,
    pub decal_info: DecalInfo,
    pub coverage: Coverage,
    pub ambient_light: bool,
    pub blend_light: bool,
    pub fog_light: bool,
    pub cubic_light: bool,
    pub light_falloff: Option<String>,
    pub gui_decl: Option<String>,
    pub render_bump_arguments: Option<String>,
    pub render_bump_flat_arguments: Option<String>,
    pub frob_stage_type: FrobStageType,
    pub frob_stage_map_expression: Option<String>,
    /// Colour multiplier and additive colour of the frob highlight.
    pub frob_stage_rgb: [[f32; 3]; 2],
    pub ambient_rim_colour: Option<[String; 3]>,
}

impl Default for TemplateData {
    fn default() -> TemplateData {
        TemplateData {
            description: String::new(),
            editor_texture: None,
            layers: vec![],
            material_flags: MaterialFlags::empty(),
            parse_flags: ParseFlags::empty(),
            cull_type: CullType::Back,
            clamp_type: ClampType::Repeat,
            surface_flags: SurfaceFlags::empty(),
            surface_type: SurfaceType::Default,
            deform_type: DeformType::None,
            deform_expressions: vec![],
            deform_decl: None,
            spectrum: 0,
            sort_request: sort::UNDEFINED,
            polygon_offset: 0.0,
            decal_info: DecalInfo::default(),
            coverage: Coverage::Undetermined,
            ambient_light: false,
            blend_light: false,
            fog_light: false,
            cubic_light: false,
            light_falloff: None,
            gui_decl: None,
            render_bump_arguments: None,
            render_bump_flat_arguments: None,
            frob_stage_type: FrobStageType::Default,
            frob_stage_map_expression: None,
            frob_stage_rgb: [[0.0; 3]; 2],
            ambient_rim_colour: None,
        }
    }
}

impl TemplateData {
    /// True for any of the light material kinds.
    pub fn is_light(&self) -> bool {
        self.ambient_light || self.blend_light || self.fog_light || self.cubic_light
    }

    /// Work out coverage from the layers, unless a keyword already decided it.
    fn determine_coverage(&mut self) {
        if self.material_flags.contains(MaterialFlags::TRANSLUCENT) {
            self.coverage = Coverage::Translucent;
        } else if self.material_flags.contains(MaterialFlags::FORCE_OPAQUE) {
            self.coverage = Coverage::Opaque;
        } else if self.coverage == Coverage::Undetermined {
            self.coverage = if self.layers.is_empty() {
                Coverage::Translucent
            } else if self.layers.iter().any(|l| !l.is_blend()) {
                if self.layers.iter().any(|l| l.alpha_test.is_some()) {
                    Coverage::Perforated
                } else {
                    Coverage::Opaque
                }
            } else {
                let first = &self.layers[0];
                let func = BlendFunc::from_strings(&first.blend_strings.0, &first.blend_strings.1);
                if func.is_translucent() {
                    Coverage::Translucent
                } else {
                    Coverage::Opaque
                }
            };
        }

        if self.coverage == Coverage::Translucent {
            self.material_flags |= MaterialFlags::NO_SHADOWS;
        } else {
            self.surface_flags |= SurfaceFlags::OPAQUE;
        }
    }

    /// Pick a sort for materials that didn't ask for one.
    fn determine_sort(&mut self) {
        if self.material_flags.contains(MaterialFlags::HAS_SORT_DEFINED) {
            return;
        }

        let subview = self.material_flags.contains(MaterialFlags::MIRROR)
            || self.layers.iter().any(|l| {
                matches!(
                    l.map_type,
                    MapType::RemoteRenderMap | MapType::MirrorRenderMap
                )
            });

        self.sort_request = if subview {
            sort::SUBVIEW
        } else if self.surface_flags.contains(SurfaceFlags::GUI_SURF) {
            sort::GUI
        } else if self.material_flags.contains(MaterialFlags::TRANSLUCENT)
            || (self.coverage == Coverage::Translucent && !self.layers.is_empty())
        {
            // Layerless materials are translucent, but have nothing to draw after opaque ones
            sort::MEDIUM
        } else {
            sort::OPAQUE
        };
    }

    fn apply_light_defaults(&mut self) {
        if (self.ambient_light || self.blend_light) && self.light_falloff.is_none() {
            self.light_falloff = Some(DEFAULT_LIGHT_FALLOFF.to_string());
        }
    }
}

/// A declared material or template. The body is only parsed when first needed.
#[derive(Debug, Clone)]
pub struct ShaderTemplate {
    name: String,
    block: String,
    params: Vec<String>,
    parsed: Option<TemplateData>,
}

impl ShaderTemplate {
    pub fn new(name: &str, block: &str) -> ShaderTemplate {
        ShaderTemplate::with_params(name, block, vec![])
    }

    /// A template whose body refers to named parameters.
    pub fn with_params(name: &str, block: &str, params: Vec<String>) -> ShaderTemplate {
        ShaderTemplate {
            name: name.to_string(),
            block: block.to_string(),
            params,
            parsed: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unparsed body, without its outer braces.
    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// The parsed definition, if `parse` has been called.
    pub fn data(&self) -> Option<&TemplateData> {
        self.parsed.as_ref()
    }

    /// Parse the body if it hasn't been already.
    /// On failure the template is left holding default values, so it is only reported once.
    pub fn parse(&mut self) -> Result<&TemplateData> {
        if self.parsed.is_none() {
            debug!("Parsing material template {}", self.name);
            match TemplateParser::new(&self.block).parse() {
                Ok(data) => self.parsed = Some(data),
                Err(e) => {
                    self.parsed = Some(TemplateData::default());
                    return Err(e);
                }
            }
        }

        Ok(self.parsed.get_or_insert_with(TemplateData::default))
    }

    /// Forget the parsed state, so the body is parsed again on next use.
    pub fn invalidate(&mut self) {
        self.parsed = None;
    }
}

/// Parsing state while reading a template body.
pub(crate) struct TemplateParser<'a> {
    pub(crate) tok: DefTokeniser<'a>,
    pub(crate) data: TemplateData,
    pub(crate) current_layer: ShaderLayer,
}

impl<'a> TemplateParser<'a> {
    fn new(block: &'a str) -> TemplateParser<'a> {
        TemplateParser {
            tok: DefTokeniser::new(block),
            data: TemplateData::default(),
            current_layer: ShaderLayer::new(LayerType::Blend),
        }
    }

    fn parse(mut self) -> Result<TemplateData> {
        // 1 is the material body, 2 is inside a stage
        let mut level = 1;

        while self.tok.has_more() {
            let token = self.tok.next_token()?;

            match token.as_str() {
                "{" => {
                    level += 1;
                    if level == 2 {
                        self.current_layer = ShaderLayer::new(LayerType::Blend);
                    }
                }
                "}" => {
                    level -= 1;
                    if level == 1 {
                        self.save_layer();
                    } else if level < 1 {
                        return Err(ParseError::UnexpectedToken {
                            expected: "keyword".to_string(),
                            found: token,
                        });
                    }
                }
                _ => {
                    let keyword = token.to_lowercase();
                    if level == 1 {
                        if !self.global_keyword(&keyword)? {
                            warn!("Material keyword not recognised: {}", token);
                        }
                    } else if level == 2 && !self.stage_keyword(&keyword)? {
                        warn!("Stage keyword not recognised: {}", token);
                    }
                }
            }
        }

        if level != 1 {
            return Err(ParseError::UnexpectedEof);
        }

        self.data.determine_coverage();
        self.data.determine_sort();
        self.data.apply_light_defaults();

        Ok(self.data)
    }

    fn save_layer(&mut self) {
        let layer = std::mem::replace(
            &mut self.current_layer,
            ShaderLayer::new(LayerType::Blend),
        );

        if layer.is_drawable() {
            self.data.layers.push(layer);
        }
    }

    /// Add a layer given by a single global keyword, like `diffusemap`.
    fn add_shortcut_layer(&mut self, layer_type: LayerType) -> Result<()> {
        let mut layer = ShaderLayer::new(layer_type);
        layer.map_expression = Some(read_map_expression(&mut self.tok)?);
        self.data.layers.push(layer);
        Ok(())
    }

    /// Handle a keyword outside of any stage. Returns false if it isn't recognised.
    fn global_keyword(&mut self, keyword: &str) -> Result<bool> {
        if let Some(flag) = lookup(MATERIAL_FLAG_KEYWORDS, keyword) {
            self.data.material_flags |= flag;
            return Ok(true);
        }
        if let Some(flag) = lookup(SURFACE_FLAG_KEYWORDS, keyword) {
            self.data.surface_flags |= flag;
            return Ok(true);
        }
        if let Some(surface_type) = lookup(SURFACE_TYPE_KEYWORDS, keyword) {
            self.data.surface_type = surface_type;
            return Ok(true);
        }

        let data = &mut self.data;
        match keyword {
            "translucent" => data.material_flags |= MaterialFlags::TRANSLUCENT,
            "decal_macro" | "twosided_decal_macro" => {
                data.material_flags |= MaterialFlags::TRANSLUCENT
                    | MaterialFlags::NO_SHADOWS
                    | MaterialFlags::POLYGON_OFFSET
                    | MaterialFlags::HAS_SORT_DEFINED;
                data.surface_flags |= SurfaceFlags::DISCRETE | SurfaceFlags::NON_SOLID;
                data.polygon_offset = 1.0;
                data.sort_request = sort::DECAL;

                if keyword == "decal_macro" {
                    data.parse_flags |= ParseFlags::HAS_DECAL_MACRO;
                } else {
                    data.cull_type = CullType::None;
                    data.parse_flags |= ParseFlags::HAS_TWO_SIDED_DECAL_MACRO;
                }
            }
            "particle_macro" => {
                data.material_flags |= MaterialFlags::NO_SHADOWS;
                data.surface_flags |= SurfaceFlags::DISCRETE | SurfaceFlags::NON_SOLID;
                data.parse_flags |= ParseFlags::HAS_PARTICLE_MACRO;
            }
            "glass_macro" => {
                data.cull_type = CullType::None;
                data.material_flags |= MaterialFlags::NO_SHADOWS | MaterialFlags::NO_SELF_SHADOW;
                data.parse_flags |= ParseFlags::HAS_GLASS_MACRO;
            }
            "twosided" => data.cull_type = CullType::None,
            "backsided" => data.cull_type = CullType::Front,
            "description" => data.description = self.tok.next_token()?,
            "polygonoffset" => {
                data.material_flags |= MaterialFlags::POLYGON_OFFSET;
                data.polygon_offset = match self.tok.peek().map(str::parse::<f32>) {
                    Some(Ok(offset)) => {
                        self.tok.next_token()?;
                        offset
                    }
                    _ => 1.0,
                };
            }
            "clamp" => data.clamp_type = ClampType::NoRepeat,
            "zeroclamp" => data.clamp_type = ClampType::ZeroClamp,
            "alphazeroclamp" => data.clamp_type = ClampType::AlphaZeroClamp,
            "sort" => {
                let value = self.tok.next_token()?;
                data.sort_request = match sort::from_name(&value) {
                    Some(s) => s,
                    None => value
                        .parse()
                        .map_err(|_| ParseError::InvalidNumber(value))?,
                };
                data.material_flags |= MaterialFlags::HAS_SORT_DEFINED;
            }
            "decalinfo" => {
                let stay = self.tok.next_float()?;
                let fade = self.tok.next_float()?;
                let start_colour = read_colour(&mut self.tok)?;
                let end_colour = read_colour(&mut self.tok)?;

                data.decal_info = DecalInfo {
                    stay_milliseconds: (stay * 1000.0) as u32,
                    fade_milliseconds: (fade * 1000.0) as u32,
                    start_colour,
                    end_colour,
                };
                data.parse_flags |= ParseFlags::HAS_DECAL_INFO;
            }
            "deform" => self.parse_deform()?,
            "renderbump" => {
                data.render_bump_arguments = Some(read_render_bump(&mut self.tok, 2)?);
                data.parse_flags |= ParseFlags::HAS_RENDER_BUMP;
            }
            "renderbumpflat" => {
                data.render_bump_flat_arguments = Some(read_render_bump(&mut self.tok, 1)?);
                data.parse_flags |= ParseFlags::HAS_RENDER_BUMP_FLAT;
            }
            "spectrum" => {
                data.spectrum = self.tok.next_int()?;
                data.parse_flags |= ParseFlags::HAS_SPECTRUM;
            }
            "guisurf" => {
                let gui = self.tok.next_token()?;
                data.surface_flags |= SurfaceFlags::GUI_SURF;
                match gui.to_lowercase().as_str() {
                    "entity" => data.surface_flags |= SurfaceFlags::ENTITY_GUI,
                    "entity2" => data.surface_flags |= SurfaceFlags::ENTITY_GUI2,
                    "entity3" => data.surface_flags |= SurfaceFlags::ENTITY_GUI3,
                    _ => data.gui_decl = Some(gui),
                }
            }

            "frobstage_texture" => {
                data.frob_stage_map_expression = Some(read_map_expression(&mut self.tok)?);
                data.frob_stage_rgb = [
                    read_scalar_or_vector3(&mut self.tok)?,
                    read_scalar_or_vector3(&mut self.tok)?,
                ];
                data.frob_stage_type = FrobStageType::Texture;
            }
            "frobstage_diffuse" => {
                data.frob_stage_rgb = [
                    read_scalar_or_vector3(&mut self.tok)?,
                    read_scalar_or_vector3(&mut self.tok)?,
                ];
                data.frob_stage_type = FrobStageType::Diffuse;
            }
            "frobstage_none" => data.frob_stage_type = FrobStageType::NoFrobStage,
            "ambientrimcolor" => {
                let exprs = read_expression_list(&mut self.tok, 3)?;
                data.ambient_rim_colour =
                    Some([exprs[0].clone(), exprs[1].clone(), exprs[2].clone()]);
                data.parse_flags |= ParseFlags::HAS_AMBIENT_RIM_COLOUR;
            }

            // Light materials
            "ambientlight" => data.ambient_light = true,
            "blendlight" => data.blend_light = true,
            "foglight" => data.fog_light = true,
            "cubiclight" => data.cubic_light = true,
            "ambientcubiclight" => {
                data.ambient_light = true;
                data.cubic_light = true;
            }
            "lightfalloffimage" | "lightfalloffcubemap" => {
                let falloff = read_map_expression(&mut self.tok)?;
                if !self.data.fog_light {
                    self.data.light_falloff = Some(falloff);
                }
            }

            // Layer shortcuts
            "qer_editorimage" => {
                data.editor_texture = Some(read_map_expression(&mut self.tok)?);
            }
            "diffusemap" => self.add_shortcut_layer(LayerType::Diffuse)?,
            "bumpmap" => self.add_shortcut_layer(LayerType::Bump)?,
            "specularmap" => self.add_shortcut_layer(LayerType::Specular)?,

            _ => return Ok(false),
        }

        Ok(true)
    }

    fn parse_deform(&mut self) -> Result<()> {
        let kind = self.tok.next_token()?.to_lowercase();

        let (deform_type, expressions, has_decl) = match kind.as_str() {
            "sprite" => (DeformType::Sprite, 0, false),
            "tube" => (DeformType::Tube, 0, false),
            "eyeball" => (DeformType::EyeBall, 0, false),
            "flare" => (DeformType::Flare, 1, false),
            "expand" => (DeformType::Expand, 1, false),
            "move" => (DeformType::Move, 1, false),
            "turbulent" => (DeformType::Turbulent, 3, true),
            "particle" => (DeformType::Particle, 0, true),
            "particle2" => (DeformType::Particle2, 0, true),
            _ => {
                warn!("Unrecognised deform type: {}", kind);
                return Ok(());
            }
        };

        self.data.deform_type = deform_type;
        if has_decl {
            self.data.deform_decl = Some(self.tok.next_token()?);
        }

        self.data.deform_expressions = (0..expressions)
            .map(|_| read_expression(&mut self.tok))
            .collect::<Result<Vec<_>>>()?;

        Ok(())
    }
}

/// Read `( r g b a )`
fn read_colour(tok: &mut DefTokeniser) -> Result<[f32; 4]> {
    tok.assert_next("(")?;
    let mut colour = [0.0; 4];
    for c in colour.iter_mut() {
        *c = tok.next_float()?;
    }
    tok.assert_next(")")?;

    Ok(colour)
}

/// Read either `( r g b )` or a single value used for all three channels.
fn read_scalar_or_vector3(tok: &mut DefTokeniser) -> Result<[f32; 3]> {
    if tok.peek() != Some("(") {
        let value = tok.next_float()?;
        return Ok([value; 3]);
    }

    tok.assert_next("(")?;
    let mut vector = [0.0; 3];
    for v in vector.iter_mut() {
        *v = tok.next_float()?;
    }
    tok.assert_next(")")?;

    Ok(vector)
}

/// Read renderbump options followed by `files` file names, as one string.
fn read_render_bump(tok: &mut DefTokeniser, files: usize) -> Result<String> {
    let mut args = vec![];

    while let Some(option) = tok.peek() {
        let values = match option.to_lowercase().as_str() {
            "-size" => 2,
            "-aa" | "-trace" => 1,
            "-colormap" => 0,
            _ => break,
        };

        args.push(tok.next_token()?);
        for _ in 0..values {
            args.push(tok.next_token()?);
        }
    }

    for _ in 0..files {
        args.push(tok.next_token()?);
    }

    Ok(args.join(" "))
}

/// Helper for stage keywords taking a fixed number of comma separated expressions.
pub(crate) fn read_pair(tok: &mut DefTokeniser) -> Result<(String, String)> {
    let mut exprs = read_expression_list(tok, 2)?;
    let y = exprs.pop().unwrap_or_default();
    let x = exprs.pop().unwrap_or_default();
    Ok((x, y))
}
