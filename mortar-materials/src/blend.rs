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

//! Blend factors and the shortcuts that expand to them.

use std::str::FromStr;

use log::error;

/// One side of a blend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub enum BlendFactor {
    Zero,
    One,
    SrcColour,
    OneMinusSrcColour,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColour,
    OneMinusDstColour,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// The given string isn't a known blend factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlendFactor(pub String);

impl FromStr for BlendFactor {
    type Err = UnknownBlendFactor;

    fn from_str(s: &str) -> Result<BlendFactor, UnknownBlendFactor> {
        let factor = match s.to_ascii_lowercase().as_str() {
            "gl_zero" => BlendFactor::Zero,
            "gl_one" => BlendFactor::One,
            "gl_src_color" => BlendFactor::SrcColour,
            "gl_one_minus_src_color" => BlendFactor::OneMinusSrcColour,
            "gl_src_alpha" => BlendFactor::SrcAlpha,
            "gl_one_minus_src_alpha" => BlendFactor::OneMinusSrcAlpha,
            "gl_dst_color" => BlendFactor::DstColour,
            "gl_one_minus_dst_color" => BlendFactor::OneMinusDstColour,
            "gl_dst_alpha" => BlendFactor::DstAlpha,
            "gl_one_minus_dst_alpha" => BlendFactor::OneMinusDstAlpha,
            "gl_src_alpha_saturate" => BlendFactor::SrcAlphaSaturate,
            _ => return Err(UnknownBlendFactor(s.to_string())),
        };
        Ok(factor)
    }
}

impl BlendFactor {
    /// Parse a factor, logging an error and falling back to `Zero` if it isn't recognised.
    pub fn lookup(s: &str) -> BlendFactor {
        match s.parse() {
            Ok(f) => f,
            Err(UnknownBlendFactor(s)) => {
                error!("Unknown blend factor: {}", s);
                BlendFactor::Zero
            }
        }
    }

    /// True if this factor reads from the framebuffer.
    pub fn reads_destination(self) -> bool {
        matches!(
            self,
            BlendFactor::DstColour
                | BlendFactor::OneMinusDstColour
                | BlendFactor::DstAlpha
                | BlendFactor::OneMinusDstAlpha
        )
    }
}

/// A source and destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-1", derive(Serialize, Deserialize))]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dest: BlendFactor,
}

impl BlendFunc {
    pub fn new(src: BlendFactor, dest: BlendFactor) -> BlendFunc {
        BlendFunc { src, dest }
    }

    /// Expand a named shortcut, if `name` is one.
    pub fn from_shortcut(name: &str) -> Option<BlendFunc> {
        use BlendFactor::*;

        let func = match name.to_ascii_lowercase().as_str() {
            "add" => BlendFunc::new(One, One),
            "filter" | "modulate" => BlendFunc::new(DstColour, Zero),
            "blend" => BlendFunc::new(SrcAlpha, OneMinusSrcAlpha),
            "none" => BlendFunc::new(Zero, One),
            _ => return None,
        };
        Some(func)
    }

    /// Build a blend function from the two strings after a `blend` keyword.
    /// A shortcut only uses the first string.
    pub fn from_strings(first: &str, second: &str) -> BlendFunc {
        if let Some(func) = BlendFunc::from_shortcut(first) {
            return func;
        }

        BlendFunc::new(BlendFactor::lookup(first), BlendFactor::lookup(second))
    }

    /// A blend that leaves the framebuffer contents visible through the surface.
    pub fn is_translucent(&self) -> bool {
        self.dest != BlendFactor::Zero || self.src.reads_destination()
    }
}

impl Default for BlendFunc {
    fn default() -> BlendFunc {
        BlendFunc::new(BlendFactor::One, BlendFactor::Zero)
    }
}
