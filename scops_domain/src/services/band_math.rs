// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Band math
//!
//! Pure, synchronous elementwise raster arithmetic, grounded on
//! `bandmath.py`/`scops_bandmath.py`'s `numexpr`-based evaluator. An
//! equation such as `(band4 - band3) / (band4 + band3)` is evaluated over
//! a map of band number to `Array2<f32>`; I/O (reading/writing the
//! `.bil`/`.hdr` ENVI raster pairs the equation's inputs and outputs live
//! in) is a separate port, `RasterIo`, kept out of this module so the
//! arithmetic itself stays testable without a filesystem.

use std::collections::HashMap;

use ndarray::Array2;

use crate::error::ScopsError;
use crate::value_objects::band_range::BandRange;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Band(u32),
    Number(f32),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(equation: &str) -> Result<Vec<Token>, ScopsError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = equation.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            ' ' | '\t' => i += 1,
            '+' => { tokens.push(Token::Plus); i += 1; }
            '-' => { tokens.push(Token::Minus); i += 1; }
            '*' => { tokens.push(Token::Star); i += 1; }
            '/' => { tokens.push(Token::Slash); i += 1; }
            '(' => { tokens.push(Token::LParen); i += 1; }
            ')' => { tokens.push(Token::RParen); i += 1; }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let number: f32 = text
                    .parse()
                    .map_err(|_| ScopsError::BandMathError(format!("invalid number literal: {text}")))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let suffix = word.strip_prefix("band").ok_or_else(|| {
                    ScopsError::BandMathError(format!("unrecognized identifier '{word}': expected 'band<N>'"))
                })?;
                let band: u32 = suffix
                    .parse()
                    .map_err(|_| ScopsError::BandMathError(format!("unrecognized identifier '{word}'")))?;
                tokens.push(Token::Band(band));
            }
            other => return Err(ScopsError::BandMathError(format!("unexpected character '{other}' in equation"))),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the four arithmetic operators,
/// evaluating directly against the band array map (no AST retained —
/// the grammar is small enough that building one buys nothing).
struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    bands: &'a HashMap<u32, Array2<f32>>,
}

impl<'a> Evaluator<'a> {
    fn new(tokens: &'a [Token], bands: &'a HashMap<u32, Array2<f32>>) -> Self {
        Evaluator { tokens, pos: 0, bands }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn parse_expression(&mut self) -> Result<Array2<f32>, ScopsError> {
        let mut left = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    left = left + self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    left = left - self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Array2<f32>, ScopsError> {
        let mut left = self.parse_factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    left = left * self.parse_factor()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    left = left / self.parse_factor()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Array2<f32>, ScopsError> {
        match self.advance() {
            Some(Token::Number(value)) => {
                let shape = self.bands.values().next().map(|b| b.dim()).unwrap_or((1, 1));
                Ok(Array2::from_elem(shape, *value))
            }
            Some(Token::Band(number)) => self
                .bands
                .get(number)
                .cloned()
                .ok_or_else(|| ScopsError::BandMathError(format!("equation references band{number} which was not supplied"))),
            Some(Token::Minus) => {
                let value = self.parse_factor()?;
                Ok(-value)
            }
            Some(Token::LParen) => {
                let value = self.parse_expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ScopsError::BandMathError("unbalanced parentheses in equation".to_string())),
                }
            }
            other => Err(ScopsError::BandMathError(format!("unexpected token in equation: {other:?}"))),
        }
    }
}

/// The distinct band numbers an equation references, in first-seen order.
pub fn extract_band_indices(equation: &str) -> Vec<u32> {
    BandRange::band_numbers_in_equation(equation)
        .into_iter()
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// Evaluates `equation` elementwise over `bands`, returning the result
/// array. Every `band<N>` token the equation references must have a
/// corresponding entry in `bands`.
pub fn evaluate(equation: &str, bands: &HashMap<u32, Array2<f32>>) -> Result<Array2<f32>, ScopsError> {
    let tokens = tokenize(equation)?;
    if tokens.is_empty() {
        return Err(ScopsError::BandMathError("empty equation".to_string()));
    }
    let mut evaluator = Evaluator::new(&tokens, bands);
    let result = evaluator.parse_expression()?;
    if evaluator.pos != tokens.len() {
        return Err(ScopsError::BandMathError("trailing tokens after a complete expression".to_string()));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn extracts_distinct_band_indices_in_order() {
        assert_eq!(extract_band_indices("(band4 - band3) / (band4 + band3)"), vec![4, 3]);
    }

    #[test]
    fn evaluates_a_simple_ratio() {
        let mut bands = HashMap::new();
        bands.insert(3, array![[1.0_f32, 2.0], [3.0, 4.0]]);
        bands.insert(4, array![[2.0_f32, 2.0], [2.0, 2.0]]);
        let result = evaluate("band4 / band3", &bands).unwrap();
        assert_eq!(result, array![[2.0_f32, 1.0], [0.6666667, 0.5]]);
    }

    #[test]
    fn ones_equation_over_a_single_band_is_all_ones() {
        let mut bands = HashMap::new();
        bands.insert(1, array![[5.0_f32, 5.0], [5.0, 5.0]]);
        let result = evaluate("band1 / band1", &bands).unwrap();
        assert_eq!(result, array![[1.0_f32, 1.0], [1.0, 1.0]]);
    }

    #[test]
    fn missing_band_is_an_error() {
        let bands = HashMap::new();
        assert!(evaluate("band1 + 1", &bands).is_err());
    }

    #[test]
    fn unbalanced_parentheses_is_an_error() {
        let mut bands = HashMap::new();
        bands.insert(1, array![[1.0_f32]]);
        assert!(evaluate("(band1 + 1", &bands).is_err());
    }
}
