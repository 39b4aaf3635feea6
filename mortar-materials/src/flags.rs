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

//! Flag sets and enumerations describing a material, along with the keyword tables that set them.

bitflags!(
    /// Behaviour flags set by global material keywords.
    #[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
    pub struct MaterialFlags: u32 {
        const NO_SHADOWS = 1 << 0;
        const NO_SELF_SHADOW = 1 << 1;
        const FORCE_SHADOWS = 1 << 2;
        const NO_OVERLAYS = 1 << 3;
        const FORCE_OVERLAYS = 1 << 4;
        const TRANSLUCENT = 1 << 5;
        const FORCE_OPAQUE = 1 << 6;
        const NO_FOG = 1 << 7;
        const NO_PORTAL_FOG = 1 << 8;
        const UNSMOOTHED_TANGENTS = 1 << 9;
        const MIRROR = 1 << 10;
        const POLYGON_OFFSET = 1 << 11;
        const IS_LIGHTGEM_SURF = 1 << 12;
        const HAS_SORT_DEFINED = 1 << 13;
    }
);

bitflags!(
    /// Records which shorthand forms appeared in the source, so they can be written back.
    #[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
    pub struct ParseFlags: u32 {
        const HAS_SPECTRUM = 1 << 0;
        const HAS_DECAL_INFO = 1 << 1;
        const HAS_DECAL_MACRO = 1 << 2;
        const HAS_TWO_SIDED_DECAL_MACRO = 1 << 3;
        const HAS_PARTICLE_MACRO = 1 << 4;
        const HAS_GLASS_MACRO = 1 << 5;
        const HAS_RENDER_BUMP = 1 << 6;
        const HAS_RENDER_BUMP_FLAT = 1 << 7;
        const HAS_AMBIENT_RIM_COLOUR = 1 << 8;
    }
);

bitflags!(
    /// Surface parameters, most of which decide what a brush is made of.
    #[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
    pub struct SurfaceFlags: u32 {
        const SOLID = 1 << 0;

        /// set automatically on anything that isn't translucent
        const OPAQUE = 1 << 1;
        const WATER = 1 << 2;
        const PLAYER_CLIP = 1 << 3;
        const MONSTER_CLIP = 1 << 4;
        const MOVEABLE_CLIP = 1 << 5;
        const IK_CLIP = 1 << 6;
        const BLOOD = 1 << 7;
        const TRIGGER = 1 << 8;
        const AAS_SOLID = 1 << 9;
        const AAS_OBSTACLE = 1 << 10;
        const FLASHLIGHT_TRIGGER = 1 << 11;
        const NON_SOLID = 1 << 12;
        const NULL_NORMAL = 1 << 13;
        const AREA_PORTAL = 1 << 14;

        /// never cut by editor carving tools
        const NO_CARVE = 1 << 15;
        const DISCRETE = 1 << 16;
        const NO_FRAGMENT = 1 << 17;
        const SLICK = 1 << 18;
        const COLLISION = 1 << 19;
        const NO_IMPACT = 1 << 20;
        const NO_DAMAGE = 1 << 21;
        const LADDER = 1 << 22;
        const NO_STEPS = 1 << 23;
        const GUI_SURF = 1 << 24;
        const ENTITY_GUI = 1 << 25;
        const ENTITY_GUI2 = 1 << 26;
        const ENTITY_GUI3 = 1 << 27;
    }
);

bitflags!(
    /// What the volume behind a surface is filled with.
    #[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
    pub struct ContentsFlags: u32 {
        // an eye is never valid in a solid
        const SOLID = 1 << 0;

        /// blocks visibility
        const OPAQUE = 1 << 1;
        const WATER = 1 << 2;
        const PLAYER_CLIP = 1 << 3;
        const MONSTER_CLIP = 1 << 4;
        const MOVEABLE_CLIP = 1 << 5;
        const IK_CLIP = 1 << 6;
        const BLOOD = 1 << 7;
        const TRIGGER = 1 << 8;
        const AAS_SOLID = 1 << 9;
        const AAS_OBSTACLE = 1 << 10;
        const FLASHLIGHT_TRIGGER = 1 << 11;
        const AREA_PORTAL = 1 << 12;
    }
);

impl ContentsFlags {
    /// Derive contents from surface parameters. Anything not explicitly non-solid and without
    /// other contents is solid.
    pub fn from_surface(surface: SurfaceFlags, coverage: Coverage) -> ContentsFlags {
        const MAPPING: &[(SurfaceFlags, ContentsFlags)] = &[
            (SurfaceFlags::SOLID, ContentsFlags::SOLID),
            (SurfaceFlags::WATER, ContentsFlags::WATER),
            (SurfaceFlags::PLAYER_CLIP, ContentsFlags::PLAYER_CLIP),
            (SurfaceFlags::MONSTER_CLIP, ContentsFlags::MONSTER_CLIP),
            (SurfaceFlags::MOVEABLE_CLIP, ContentsFlags::MOVEABLE_CLIP),
            (SurfaceFlags::IK_CLIP, ContentsFlags::IK_CLIP),
            (SurfaceFlags::BLOOD, ContentsFlags::BLOOD),
            (SurfaceFlags::TRIGGER, ContentsFlags::TRIGGER),
            (SurfaceFlags::AAS_SOLID, ContentsFlags::AAS_SOLID),
            (SurfaceFlags::AAS_OBSTACLE, ContentsFlags::AAS_OBSTACLE),
            (
                SurfaceFlags::FLASHLIGHT_TRIGGER,
                ContentsFlags::FLASHLIGHT_TRIGGER,
            ),
            (SurfaceFlags::AREA_PORTAL, ContentsFlags::AREA_PORTAL),
        ];

        let mut contents = ContentsFlags::empty();
        for (s, c) in MAPPING {
            if surface.contains(*s) {
                contents |= *c;
            }
        }

        if contents.is_empty() && !surface.contains(SurfaceFlags::NON_SOLID) {
            contents |= ContentsFlags::SOLID;
        }

        if coverage == Coverage::Opaque {
            contents |= ContentsFlags::OPAQUE;
        }

        contents
    }
}

/// Which faces of a surface are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum CullType {
    Back,
    Front,
    None,
}

/// How texture coordinates outside 0..1 are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum ClampType {
    Repeat,
    NoRepeat,
    ZeroClamp,
    AlphaZeroClamp,
}

/// How much a material blocks what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum Coverage {
    Undetermined,
    Opaque,
    Perforated,
    Translucent,
}

/// How a surface is highlighted when the player can interact with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum FrobStageType {
    Default,
    Diffuse,
    Texture,
    NoFrobStage,
}

/// Vertex deformation applied to surfaces using a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum DeformType {
    None,
    Sprite,
    Tube,
    Flare,
    Expand,
    Move,
    Turbulent,
    EyeBall,
    Particle,
    Particle2,
}

/// Material type, used for impact effects and footsteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum SurfaceType {
    Default,
    Metal,
    Stone,
    Flesh,
    Wood,
    Cardboard,
    Liquid,
    Glass,
    Plastic,
    Ricochet,
    Surftype10,
    Surftype11,
    Surftype12,
    Surftype13,
    Surftype14,
    Surftype15,
}

/// Predefined sort values. Any other float is also a valid sort.
pub mod sort {
    pub const SUBVIEW: f32 = -3.0;
    pub const GUI: f32 = -2.0;
    pub const BAD: f32 = -1.0;
    pub const OPAQUE: f32 = 0.0;
    pub const PORTAL_SKY: f32 = 1.0;
    pub const DECAL: f32 = 2.0;
    pub const FAR: f32 = 3.0;
    pub const MEDIUM: f32 = 4.0;
    pub const CLOSE: f32 = 5.0;
    pub const ALMOST_NEAREST: f32 = 6.0;
    pub const NEAREST: f32 = 7.0;
    pub const AFTER_FOG: f32 = 90.0;
    pub const POST_PROCESS: f32 = 100.0;

    /// Placeholder until a sort is chosen, either explicitly or from the material's coverage.
    pub const UNDEFINED: f32 = -99999.0;

    /// Look up one of the named sort values, ignoring case.
    pub fn from_name(name: &str) -> Option<f32> {
        let value = match name.to_ascii_lowercase().as_str() {
            "subview" => SUBVIEW,
            "gui" => GUI,
            "bad" => BAD,
            "opaque" => OPAQUE,
            "portalsky" => PORTAL_SKY,
            "decal" => DECAL,
            "far" => FAR,
            "medium" => MEDIUM,
            "close" => CLOSE,
            "almostnearest" => ALMOST_NEAREST,
            "nearest" => NEAREST,
            "afterfog" => AFTER_FOG,
            "postprocess" => POST_PROCESS,
            _ => return None,
        };
        Some(value)
    }
}

/// Surface parameter keywords.
pub const SURFACE_FLAG_KEYWORDS: &[(&str, SurfaceFlags)] = &[
    ("solid", SurfaceFlags::SOLID),
    ("water", SurfaceFlags::WATER),
    ("playerclip", SurfaceFlags::PLAYER_CLIP),
    ("monsterclip", SurfaceFlags::MONSTER_CLIP),
    ("moveableclip", SurfaceFlags::MOVEABLE_CLIP),
    ("ikclip", SurfaceFlags::IK_CLIP),
    ("blood", SurfaceFlags::BLOOD),
    ("trigger", SurfaceFlags::TRIGGER),
    ("aassolid", SurfaceFlags::AAS_SOLID),
    ("aasobstacle", SurfaceFlags::AAS_OBSTACLE),
    ("flashlight_trigger", SurfaceFlags::FLASHLIGHT_TRIGGER),
    ("nonsolid", SurfaceFlags::NON_SOLID),
    ("nullnormal", SurfaceFlags::NULL_NORMAL),
    ("areaportal", SurfaceFlags::AREA_PORTAL),
    ("qer_nocarve", SurfaceFlags::NO_CARVE),
    ("discrete", SurfaceFlags::DISCRETE),
    ("nofragment", SurfaceFlags::NO_FRAGMENT),
    ("slick", SurfaceFlags::SLICK),
    ("collision", SurfaceFlags::COLLISION),
    ("noimpact", SurfaceFlags::NO_IMPACT),
    ("nodamage", SurfaceFlags::NO_DAMAGE),
    ("ladder", SurfaceFlags::LADDER),
    ("nosteps", SurfaceFlags::NO_STEPS),
];

/// Material type keywords.
pub const SURFACE_TYPE_KEYWORDS: &[(&str, SurfaceType)] = &[
    ("metal", SurfaceType::Metal),
    ("stone", SurfaceType::Stone),
    ("flesh", SurfaceType::Flesh),
    ("wood", SurfaceType::Wood),
    ("cardboard", SurfaceType::Cardboard),
    ("liquid", SurfaceType::Liquid),
    ("glass", SurfaceType::Glass),
    ("plastic", SurfaceType::Plastic),
    ("ricochet", SurfaceType::Ricochet),
    ("surftype10", SurfaceType::Surftype10),
    ("surftype11", SurfaceType::Surftype11),
    ("surftype12", SurfaceType::Surftype12),
    ("surftype13", SurfaceType::Surftype13),
    ("surftype14", SurfaceType::Surftype14),
    ("surftype15", SurfaceType::Surftype15),
];

/// Simple flag keywords, which take no arguments.
pub const MATERIAL_FLAG_KEYWORDS: &[(&str, MaterialFlags)] = &[
    ("noshadows", MaterialFlags::NO_SHADOWS),
    ("noselfshadow", MaterialFlags::NO_SELF_SHADOW),
    ("forceshadows", MaterialFlags::FORCE_SHADOWS),
    ("nooverlays", MaterialFlags::NO_OVERLAYS),
    ("forceoverlays", MaterialFlags::FORCE_OVERLAYS),
    ("forceopaque", MaterialFlags::FORCE_OPAQUE),
    ("nofog", MaterialFlags::NO_FOG),
    ("noportalfog", MaterialFlags::NO_PORTAL_FOG),
    ("unsmoothedtangents", MaterialFlags::UNSMOOTHED_TANGENTS),
    ("mirror", MaterialFlags::MIRROR),
    ("islightgemsurf", MaterialFlags::IS_LIGHTGEM_SURF),
];

/// Find `keyword` in one of the keyword tables.
pub fn lookup<T: Copy>(table: &[(&str, T)], keyword: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, value)| *value)
}
