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

//! One stage of a material, as written in the source.

use smallvec::SmallVec;

use crate::flags::ClampType;

/// What a layer contributes to lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum LayerType {
    Diffuse,
    Bump,
    Specular,
    /// A plain blended stage, not lit
    Blend,
}

/// Where the layer's image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum MapType {
    Map,
    CubeMap,
    CameraCubeMap,
    VideoMap,
    SoundMap,
    RemoteRenderMap,
    MirrorRenderMap,
}

/// How texture coordinates are generated for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum TexGenType {
    Normal,
    Reflect,
    Skybox,
    WobbleSky,
    Screen,
}

/// Use of vertex colours when drawing a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum VertexColourMode {
    None,
    Multiply,
    InverseMultiply,
}

bitflags!(
    /// Boolean options that can appear anywhere in a stage.
    #[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
    pub struct StageFlags: u32 {
        const IGNORE_ALPHA_TEST = 1 << 0;
        const FILTER_NEAREST = 1 << 1;
        const FILTER_LINEAR = 1 << 2;
        const HIGH_QUALITY = 1 << 3;
        const FORCE_HIGH_QUALITY = 1 << 4;
        const NO_PICMIP = 1 << 5;
        const UNCOMPRESSED = 1 << 6;
        const MASK_RED = 1 << 7;
        const MASK_GREEN = 1 << 8;
        const MASK_BLUE = 1 << 9;
        const MASK_ALPHA = 1 << 10;
        const MASK_DEPTH = 1 << 11;
        const IGNORE_DEPTH = 1 << 12;
        const COLOURED = 1 << 13;
        const PRIVATE_POLYGON_OFFSET = 1 << 14;
    }
);

/// Texture matrix operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum TransformType {
    Translate,
    Scale,
    CenterScale,
    Shear,
    Rotate,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct Transform {
    pub kind: TransformType,
    pub x: String,
    /// Absent for rotations
    pub y: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct VertexParm {
    pub index: usize,
    pub expressions: SmallVec<[String; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct FragmentMap {
    pub index: usize,
    pub options: Vec<String>,
    pub map: String,
}

/// A layer of a material template. Expressions are kept as text until evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct ShaderLayer {
    pub layer_type: LayerType,
    pub map_type: MapType,

    /// Image for the layer. Absent for layers only drawn by programs.
    pub map_expression: Option<String>,

    /// The two strings following `blend`. The second is empty for shortcuts.
    pub blend_strings: (String, String),

    /// Stage is only drawn when this evaluates true
    pub condition: Option<String>,

    pub tex_gen: TexGenType,
    pub tex_gen_expressions: Vec<String>,
    pub clamp_type: ClampType,
    pub alpha_test: Option<String>,
    pub vertex_colour: VertexColourMode,

    /// Red, green, blue and alpha multipliers
    pub colour_expressions: [Option<String>; 4],
    pub transforms: Vec<Transform>,
    pub vertex_program: Option<String>,
    pub fragment_program: Option<String>,
    pub vertex_parms: Vec<VertexParm>,
    pub fragment_maps: Vec<FragmentMap>,
    pub stage_flags: StageFlags,
    pub private_polygon_offset: f32,

    /// Size of the render target for remote and mirror render maps
    pub render_map_size: Option<(i32, i32)>,
}

impl ShaderLayer {
    pub fn new(layer_type: LayerType) -> ShaderLayer {
        ShaderLayer {
            layer_type,
            map_type: MapType::Map,
            map_expression: None,
            blend_strings: ("gl_one".to_string(), "gl_zero".to_string()),
            condition: None,
            tex_gen: TexGenType::Normal,
            tex_gen_expressions: vec![],
            clamp_type: ClampType::Repeat,
            alpha_test: None,
            vertex_colour: VertexColourMode::None,
            colour_expressions: Default::default(),
            transforms: vec![],
            vertex_program: None,
            fragment_program: None,
            vertex_parms: vec![],
            fragment_maps: vec![],
            stage_flags: StageFlags::empty(),
            private_polygon_offset: 0.0,
            render_map_size: None,
        }
    }

    /// A layer is only kept if it has something to draw.
    pub fn is_drawable(&self) -> bool {
        self.map_expression.is_some()
            || self.fragment_program.is_some()
            || self.render_map_size.is_some()
    }

    /// True if this layer is blended over whatever is behind it.
    pub fn is_blend(&self) -> bool {
        self.layer_type == LayerType::Blend
    }
}
