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

//! Reading expressions out of a token stream.
//!
//! Expressions are kept as normalised text rather than evaluated, so that template
//! parameters can be substituted into them later.

use crate::error::{ParseError, Result};
use crate::tokeniser::DefTokeniser;

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", ">", "<", ">=", "<=", "==", "!=", "&&", "||",
];

/// Read one arithmetic or boolean expression, such as `(parm5 > 0)` or `time * 0.5`.
pub fn read_expression(tok: &mut DefTokeniser) -> Result<String> {
    let mut expr = read_term(tok)?;

    while let Some(op) = tok.peek() {
        if !OPERATORS.contains(&op) {
            break;
        }

        let op = tok.next_token()?;
        let rhs = read_term(tok)?;
        expr = format!("{} {} {}", expr, op, rhs);
    }

    Ok(expr)
}

fn read_term(tok: &mut DefTokeniser) -> Result<String> {
    let token = tok.next_token()?;

    match token.as_str() {
        "(" => {
            let inner = read_expression(tok)?;
            tok.assert_next(")")?;
            Ok(format!("({})", inner))
        }
        "-" => Ok(format!("-{}", read_term(tok)?)),
        ")" | "," | "{" | "}" => Err(ParseError::UnexpectedToken {
            expected: "expression".to_string(),
            found: token,
        }),
        _ => {
            // Table lookups can have spaces inside the brackets
            let mut term = token;
            while bracket_depth(&term) > 0 {
                term.push(' ');
                term.push_str(&tok.next_token()?);
            }
            Ok(term)
        }
    }
}

fn bracket_depth(s: &str) -> i32 {
    s.chars().fold(0, |depth, c| match c {
        '[' => depth + 1,
        ']' => depth - 1,
        _ => depth,
    })
}

/// Read a comma separated list of `count` expressions.
pub fn read_expression_list(tok: &mut DefTokeniser, count: usize) -> Result<Vec<String>> {
    let mut exprs = Vec::with_capacity(count);
    for i in 0..count {
        if i > 0 {
            tok.assert_next(",")?;
        }
        exprs.push(read_expression(tok)?);
    }

    Ok(exprs)
}

/// Read a map expression: either a texture path or an image function like
/// `heightmap(textures/foo_h, 4)`. Function names are lowercased and paths cleaned.
pub fn read_map_expression(tok: &mut DefTokeniser) -> Result<String> {
    let token = tok.next_token()?;

    if tok.peek() != Some("(") {
        return Ok(clean_texture_path(&token));
    }
    tok.next_token()?;

    let mut args = vec![];
    if tok.peek() == Some(")") {
        tok.next_token()?;
    } else {
        loop {
            args.push(read_map_expression(tok)?);

            let sep = tok.next_token()?;
            match sep.as_str() {
                "," => continue,
                ")" => break,
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: ")".to_string(),
                        found: sep,
                    })
                }
            }
        }
    }

    Ok(format!("{}({})", token.to_lowercase(), args.join(", ")))
}

/// Re-read a map expression that has had text substituted into it, so its paths are clean again.
pub fn normalise_map_expression(expr: &str) -> String {
    let mut tok = DefTokeniser::new(expr);
    match read_map_expression(&mut tok) {
        Ok(normalised) if !tok.has_more() => normalised,
        _ => clean_texture_path(expr.trim()),
    }
}

/// Use forward slashes and strip any file extension. Numbers are left alone.
pub fn clean_texture_path(path: &str) -> String {
    if path.parse::<f64>().is_ok() {
        return path.to_string();
    }

    let mut path = path.replace('\\', "/");
    if let Some(dot) = path.rfind('.') {
        let after_slash = path.rfind('/').map_or(true, |slash| dot > slash);
        if after_slash && dot > 0 {
            path.truncate(dot);
        }
    }

    path
}
