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

//! Top level of a declaration file: splits it into named blocks without parsing their bodies.

use log::debug;

use crate::error::{ParseError, Result};
use crate::tokeniser::DefTokeniser;

/// One entry of a declaration file.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `name { body }`
    Material { name: String, block: String },

    /// `template name ( params ) { body }`
    Template {
        name: String,
        params: Vec<String>,
        block: String,
    },

    /// `guide name template ( args )`
    Guide {
        name: String,
        template: String,
        args: Vec<String>,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Material { name, .. } => name,
            Declaration::Template { name, .. } => name,
            Declaration::Guide { name, .. } => name,
        }
    }
}

/// Normalise a declaration or texture name, so equal names compare equal.
/// Folds case, uses forward slashes, and strips any extension.
pub fn normalise_name(name: &str) -> String {
    crate::expr::clean_texture_path(&name.to_lowercase())
}

/// Split a declaration file into its entries. Tables are skipped.
pub fn parse_declarations(src: &str) -> Result<Vec<Declaration>> {
    let mut tok = DefTokeniser::new(src);
    let mut decls = vec![];

    while tok.has_more() {
        let token = tok.next_token()?;

        match token.to_lowercase().as_str() {
            "table" => {
                let name = tok.next_token()?;
                read_block(&mut tok, &name)?;
                debug!("Skipping table {}", name);
            }
            "template" => {
                let name = normalise_name(&tok.next_token()?);
                let params = read_paren_list(&mut tok)?;
                let block = read_block(&mut tok, &name)?;
                decls.push(Declaration::Template {
                    name,
                    params,
                    block,
                });
            }
            "guide" => {
                let name = normalise_name(&tok.next_token()?);
                let template = normalise_name(&tok.next_token()?);
                let args = read_paren_list(&mut tok)?;
                decls.push(Declaration::Guide {
                    name,
                    template,
                    args,
                });
            }
            "{" | "}" | "(" | ")" | "," => {
                return Err(ParseError::UnexpectedToken {
                    expected: "declaration name".to_string(),
                    found: token,
                })
            }
            lower => {
                // Optional type keyword before the name
                let name = if lower == "material" && tok.peek() != Some("{") {
                    tok.next_token()?
                } else {
                    token
                };

                let name = normalise_name(&name);
                let block = read_block(&mut tok, &name)?;
                decls.push(Declaration::Material { name, block });
            }
        }
    }

    Ok(decls)
}

/// Read `{ ... }` and return the text between the outer braces.
fn read_block(tok: &mut DefTokeniser, name: &str) -> Result<String> {
    tok.assert_next("{")?;
    let start = DefTokeniser::position(tok);

    let mut depth = 1;
    while depth > 0 {
        let token = tok
            .next_token()
            .map_err(|_| ParseError::UnbalancedBraces(name.to_string()))?;

        match token.as_str() {
            "{" => depth += 1,
            "}" => depth -= 1,
            _ => (),
        }
    }

    Ok(tok.source()[start..tok.last_start()].to_string())
}

/// Read `( a, b, c )`
fn read_paren_list(tok: &mut DefTokeniser) -> Result<Vec<String>> {
    tok.assert_next("(")?;

    let mut items = vec![];
    loop {
        let token = tok.next_token()?;
        match token.as_str() {
            ")" => break,
            "," => continue,
            _ => items.push(token),
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalised() {
        assert_eq!(normalise_name("Textures\\Base\\Floor.TGA"), "textures/base/floor");
        assert_eq!(normalise_name("decl/test"), "decl/test");
    }

    #[test]
    fn splits_materials() {
        let src = "
            // comment
            decl/test { diffusemap textures/foo }
            Textures/Other.tga
            {
                { blend add map textures/glow }
            }
        ";
        let decls = parse_declarations(src).unwrap();

        assert_eq!(decls.len(), 2);
        assert_eq!(
            decls[0],
            Declaration::Material {
                name: "decl/test".to_string(),
                block: " diffusemap textures/foo ".to_string(),
            }
        );
        assert_eq!(decls[1].name(), "textures/other");
        match &decls[1] {
            Declaration::Material { block, .. } => {
                assert_eq!(block.trim(), "{ blend add map textures/glow }")
            }
            _ => panic!("expected material"),
        }
    }

    #[test]
    fn skips_tables_and_type_keyword() {
        let src = "table sinTable { { 0, 1, 0, -1 } } material textures/foo { }";
        let decls = parse_declarations(src).unwrap();

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name(), "textures/foo");
    }

    #[test]
    fn templates_and_guides() {
        let src = "
            template tdm/base ( diffuse, bump ) { diffusemap diffuse bumpmap bump }
            guide textures/wall tdm/base ( textures/wall_d, textures/wall_local )
        ";
        let decls = parse_declarations(src).unwrap();

        assert_eq!(
            decls[0],
            Declaration::Template {
                name: "tdm/base".to_string(),
                params: vec!["diffuse".to_string(), "bump".to_string()],
                block: " diffusemap diffuse bumpmap bump ".to_string(),
            }
        );
        assert_eq!(
            decls[1],
            Declaration::Guide {
                name: "textures/wall".to_string(),
                template: "tdm/base".to_string(),
                args: vec![
                    "textures/wall_d".to_string(),
                    "textures/wall_local".to_string()
                ],
            }
        );
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert_eq!(
            parse_declarations("textures/foo { { map x }"),
            Err(ParseError::UnbalancedBraces("textures/foo".to_string()))
        );
    }

    #[test]
    fn missing_name_fails() {
        assert!(parse_declarations("{ diffusemap x }").is_err());
    }
}
