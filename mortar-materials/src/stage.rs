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

//! Keywords valid inside a stage block.

use log::warn;
use smallvec::SmallVec;

use crate::error::Result;
use crate::expr::{read_expression, read_expression_list, read_map_expression};
use crate::flags::{ClampType, Coverage};
use crate::layer::{
    FragmentMap, LayerType, MapType, StageFlags, TexGenType, Transform, TransformType,
    VertexColourMode, VertexParm,
};
use crate::template::{read_pair, TemplateParser};

/// Highest vertex parameter index plus one
pub const MAX_VERTEX_PARMS: usize = 4;

/// Highest fragment map index plus one
pub const MAX_FRAGMENT_MAPS: usize = 8;

const FRAGMENT_MAP_OPTIONS: &[&str] = &[
    "cubemap",
    "cameracubemap",
    "nearest",
    "linear",
    "clamp",
    "noclamp",
    "zeroclamp",
    "alphazeroclamp",
    "forcehighquality",
    "uncompressed",
    "highquality",
    "nopicmip",
];

const STAGE_FLAG_KEYWORDS: &[(&str, StageFlags)] = &[
    ("ignorealphatest", StageFlags::IGNORE_ALPHA_TEST),
    ("nearest", StageFlags::FILTER_NEAREST),
    ("linear", StageFlags::FILTER_LINEAR),
    ("highquality", StageFlags::HIGH_QUALITY),
    ("forcehighquality", StageFlags::FORCE_HIGH_QUALITY),
    ("nopicmip", StageFlags::NO_PICMIP),
    ("uncompressed", StageFlags::UNCOMPRESSED),
    ("maskred", StageFlags::MASK_RED),
    ("maskgreen", StageFlags::MASK_GREEN),
    ("maskblue", StageFlags::MASK_BLUE),
    ("maskalpha", StageFlags::MASK_ALPHA),
    ("maskdepth", StageFlags::MASK_DEPTH),
    ("ignoredepth", StageFlags::IGNORE_DEPTH),
    ("colored", StageFlags::COLOURED),
];

impl TemplateParser<'_> {
    /// Handle a keyword inside a stage. Returns false if it isn't recognised.
    pub(crate) fn stage_keyword(&mut self, keyword: &str) -> Result<bool> {
        if let Some(flag) = crate::flags::lookup(STAGE_FLAG_KEYWORDS, keyword) {
            self.current_layer.stage_flags |= flag;
            return Ok(true);
        }

        let tok = &mut self.tok;
        let layer = &mut self.current_layer;

        match keyword {
            "if" => layer.condition = Some(read_expression(tok)?),
            "blend" => {
                let first = tok.next_token()?.to_lowercase();
                let second = if first.starts_with("gl_") {
                    tok.assert_next(",")?;
                    tok.next_token()?.to_lowercase()
                } else {
                    String::new()
                };

                match first.as_str() {
                    "diffusemap" => layer.layer_type = LayerType::Diffuse,
                    "bumpmap" => layer.layer_type = LayerType::Bump,
                    "specularmap" => layer.layer_type = LayerType::Specular,
                    _ => (),
                }
                layer.blend_strings = (first, second);
            }

            // Image sources
            "map" => {
                layer.map_type = MapType::Map;
                layer.map_expression = Some(read_map_expression(tok)?);
            }
            "cubemap" => {
                layer.map_type = MapType::CubeMap;
                layer.map_expression = Some(read_map_expression(tok)?);
            }
            "cameracubemap" => {
                layer.map_type = MapType::CameraCubeMap;
                layer.map_expression = Some(read_map_expression(tok)?);
            }
            "videomap" => {
                let mut file = tok.next_token()?;
                if file.eq_ignore_ascii_case("loop") {
                    file = tok.next_token()?;
                }
                layer.map_type = MapType::VideoMap;
                layer.map_expression = Some(file);
            }
            "soundmap" => {
                if tok.peek().map_or(false, |t| t.eq_ignore_ascii_case("waveform")) {
                    tok.next_token()?;
                }
                layer.map_type = MapType::SoundMap;
                layer.map_expression = Some("_scratch".to_string());
            }
            "remoterendermap" | "mirrorrendermap" => {
                layer.map_type = if keyword == "remoterendermap" {
                    MapType::RemoteRenderMap
                } else {
                    MapType::MirrorRenderMap
                };
                let width = tok.next_int()?;
                let height = tok.next_int()?;
                layer.render_map_size = Some((width, height));
            }
            "texgen" => {
                let kind = tok.next_token()?.to_lowercase();
                let tex_gen = match kind.as_str() {
                    "normal" => TexGenType::Normal,
                    "reflect" => TexGenType::Reflect,
                    "skybox" => TexGenType::Skybox,
                    "wobblesky" => TexGenType::WobbleSky,
                    "screen" => TexGenType::Screen,
                    _ => {
                        warn!("Unrecognised texgen type: {}", kind);
                        TexGenType::Normal
                    }
                };

                if tex_gen == TexGenType::WobbleSky {
                    layer.tex_gen_expressions = (0..3)
                        .map(|_| read_expression(tok))
                        .collect::<Result<Vec<_>>>()?;
                }
                layer.tex_gen = tex_gen;
            }

            // Colours
            "vertexcolor" => layer.vertex_colour = VertexColourMode::Multiply,
            "inversevertexcolor" => layer.vertex_colour = VertexColourMode::InverseMultiply,
            "red" | "green" | "blue" | "alpha" => {
                let index = match keyword {
                    "red" => 0,
                    "green" => 1,
                    "blue" => 2,
                    _ => 3,
                };
                layer.colour_expressions[index] = Some(read_expression(tok)?);
            }
            "rgb" => {
                let expr = read_expression(tok)?;
                for c in layer.colour_expressions.iter_mut().take(3) {
                    *c = Some(expr.clone());
                }
            }
            "rgba" => {
                let expr = read_expression(tok)?;
                for c in layer.colour_expressions.iter_mut() {
                    *c = Some(expr.clone());
                }
            }
            "color" => {
                let exprs = read_expression_list(tok, 4)?;
                for (c, expr) in layer.colour_expressions.iter_mut().zip(exprs) {
                    *c = Some(expr);
                }
            }

            // Programs
            "program" => {
                let program = tok.next_token()?;
                layer.vertex_program = Some(program.clone());
                layer.fragment_program = Some(program);
            }
            "vertexprogram" => layer.vertex_program = Some(tok.next_token()?),
            "fragmentprogram" => layer.fragment_program = Some(tok.next_token()?),
            "vertexparm" => {
                let index = tok.next_int()?;
                let mut expressions: SmallVec<[String; 4]> = SmallVec::new();
                expressions.push(read_expression(tok)?);
                while expressions.len() < 4 && tok.peek() == Some(",") {
                    tok.next_token()?;
                    expressions.push(read_expression(tok)?);
                }

                if index < 0 || index as usize >= MAX_VERTEX_PARMS {
                    warn!("Vertex parm index out of range: {}", index);
                } else {
                    layer.vertex_parms.push(VertexParm {
                        index: index as usize,
                        expressions,
                    });
                }
            }
            "fragmentmap" => {
                let index = tok.next_int()?;
                let mut options = vec![];
                while let Some(option) = tok.peek() {
                    let option = option.to_lowercase();
                    if !FRAGMENT_MAP_OPTIONS.contains(&option.as_str()) {
                        break;
                    }
                    tok.next_token()?;
                    options.push(option);
                }
                let map = read_map_expression(tok)?;

                if index < 0 || index as usize >= MAX_FRAGMENT_MAPS {
                    warn!("Fragment map index out of range: {}", index);
                } else {
                    layer.fragment_maps.push(FragmentMap {
                        index: index as usize,
                        options,
                        map,
                    });
                }
            }

            "alphatest" => {
                layer.alpha_test = Some(read_expression(tok)?);
                self.data.coverage = Coverage::Perforated;
            }

            // Texture matrix
            "scale" | "centerscale" | "shear" | "translate" | "scroll" => {
                let kind = match keyword {
                    "scale" => TransformType::Scale,
                    "centerscale" => TransformType::CenterScale,
                    "shear" => TransformType::Shear,
                    _ => TransformType::Translate,
                };
                let (x, y) = read_pair(tok)?;
                layer.transforms.push(Transform {
                    kind,
                    x,
                    y: Some(y),
                });
            }
            "rotate" => {
                let x = read_expression(tok)?;
                layer.transforms.push(Transform {
                    kind: TransformType::Rotate,
                    x,
                    y: None,
                });
            }

            "clamp" => layer.clamp_type = ClampType::NoRepeat,
            "noclamp" => layer.clamp_type = ClampType::Repeat,
            "zeroclamp" => layer.clamp_type = ClampType::ZeroClamp,
            "alphazeroclamp" => layer.clamp_type = ClampType::AlphaZeroClamp,
            "maskcolor" => {
                layer.stage_flags |= StageFlags::MASK_RED | StageFlags::MASK_GREEN | StageFlags::MASK_BLUE
            }
            "privatepolygonoffset" => {
                layer.stage_flags |= StageFlags::PRIVATE_POLYGON_OFFSET;
                layer.private_polygon_offset = tok.next_float()?;
            }

            _ => return Ok(false),
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::blend::{BlendFactor, BlendFunc};
    use crate::flags::{ClampType, Coverage};
    use crate::layer::*;
    use crate::template::{ShaderTemplate, TemplateData};

    fn parsed(block: &str) -> TemplateData {
        ShaderTemplate::new("test", block).parse().unwrap().clone()
    }

    #[test]
    fn blend_stage() {
        let data = parsed("{ blend gl_dst_color, gl_zero map textures/foo.tga clamp }");
        let layer = &data.layers[0];

        assert_eq!(layer.layer_type, LayerType::Blend);
        assert_eq!(
            layer.blend_strings,
            ("gl_dst_color".to_string(), "gl_zero".to_string())
        );
        assert_eq!(layer.map_expression.as_deref(), Some("textures/foo"));
        assert_eq!(layer.clamp_type, ClampType::NoRepeat);
        assert_eq!(
            BlendFunc::from_strings(&layer.blend_strings.0, &layer.blend_strings.1),
            BlendFunc::new(BlendFactor::DstColour, BlendFactor::Zero)
        );
        assert_eq!(data.coverage, Coverage::Translucent);
    }

    #[test]
    fn blend_shortcut_has_empty_second_string() {
        let data = parsed("{ blend add map textures/glow }");
        assert_eq!(
            data.layers[0].blend_strings,
            ("add".to_string(), String::new())
        );
    }

    #[test]
    fn lit_stages() {
        let data = parsed(
            "{ blend diffusemap map textures/d } { blend bumpmap map textures/b } { blend specularmap map textures/s }",
        );
        let types: Vec<_> = data.layers.iter().map(|l| l.layer_type).collect();

        assert_eq!(
            types,
            vec![LayerType::Diffuse, LayerType::Bump, LayerType::Specular]
        );
        assert_eq!(data.coverage, Coverage::Opaque);
    }

    #[test]
    fn stages_without_images_are_dropped() {
        let data = parsed("{ blend add } diffusemap textures/foo");
        assert_eq!(data.layers.len(), 1);
        assert_eq!(data.layers[0].layer_type, LayerType::Diffuse);
    }

    #[test]
    fn alpha_test_makes_perforated() {
        let data = parsed("{ blend diffusemap map textures/grate alphaTest 0.5 }");

        assert_eq!(data.layers[0].alpha_test.as_deref(), Some("0.5"));
        assert_eq!(data.coverage, Coverage::Perforated);
    }

    #[test]
    fn conditions_and_colours() {
        let data = parsed(
            "{ if ( parm7 > 0 ) blend add map textures/lamp rgb 0.5 * parm0 alpha 0.25 vertexColor }",
        );
        let layer = &data.layers[0];

        assert_eq!(layer.condition.as_deref(), Some("(parm7 > 0)"));
        assert_eq!(layer.colour_expressions[0].as_deref(), Some("0.5 * parm0"));
        assert_eq!(layer.colour_expressions[2].as_deref(), Some("0.5 * parm0"));
        assert_eq!(layer.colour_expressions[3].as_deref(), Some("0.25"));
        assert_eq!(layer.vertex_colour, VertexColourMode::Multiply);
    }

    #[test]
    fn programs_and_parms() {
        let data = parsed(
            "{ program heatHaze.vfp vertexParm 0 time * 0.1, 0 vertexParm 9 1 fragmentMap 0 cubeMap env/sky fragmentMap 1 _currentRender }",
        );
        let layer = &data.layers[0];

        assert_eq!(layer.fragment_program.as_deref(), Some("heatHaze.vfp"));
        assert_eq!(layer.vertex_parms.len(), 1);
        assert_eq!(layer.vertex_parms[0].expressions.as_slice(), ["time * 0.1", "0"]);
        assert_eq!(layer.fragment_maps.len(), 2);
        assert_eq!(layer.fragment_maps[0].options, vec!["cubemap"]);
        assert_eq!(layer.fragment_maps[0].map, "env/sky");
    }

    #[test]
    fn transforms() {
        let data = parsed("{ map textures/water scroll time * 0.1, 0 rotate 0.5 zeroclamp maskDepth }");
        let layer = &data.layers[0];

        assert_eq!(layer.transforms.len(), 2);
        assert_eq!(layer.transforms[0].kind, TransformType::Translate);
        assert_eq!(layer.transforms[0].x, "time * 0.1");
        assert_eq!(layer.transforms[1].y, None);
        assert_eq!(layer.clamp_type, ClampType::ZeroClamp);
        assert!(layer.stage_flags.contains(StageFlags::MASK_DEPTH));
    }

    #[test]
    fn mirror_render_map_is_subview() {
        let data = parsed("{ mirrorRenderMap 256 256 }");

        assert_eq!(data.layers[0].render_map_size, Some((256, 256)));
        assert_eq!(data.sort_request, crate::flags::sort::SUBVIEW);
    }
}
