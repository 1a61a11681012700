//! Text-format reader for the equality-variant problem format (spec section 6).
//!
//! This is the one external collaborator spec section 1 calls out by name
//! ("problem-file text parsing") that still needs to exist for the crate to be
//! testable end-to-end from a file rather than only from in-memory constructors.
//! It stays a thin boundary: no CLI, no generators, just tokens in, an
//! [`EqualityProblem`] or a [`Problem`] out — grounded on the loader layer's own
//! split in `copters::interface`, which keeps parsing failures as an open,
//! contextual [`Problem`] rather than the engine's closed [`SolverError`] taxonomy.
//!
//! Format:
//!
//! ```text
//! [m] [n]
//! [m * n A entries, row-major, each 0 or 1]
//! [m b entries, non-negative integers]
//! [n c entries, reals]
//! ```
//!
//! Tokens are whitespace-delimited (spaces, tabs, CR, LF all equivalent); `#`
//! introduces a line comment that runs to end of line.

use std::io::{BufRead, BufReader, Read};

use faer::Col;
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use crate::E;
use crate::linalg::dense::IntMatrix;
use crate::problem::EqualityProblem;

struct Token {
    line: usize,
    text: String,
}

fn tokenize(reader: impl Read) -> Result<Vec<Token>, Problem> {
    let buffered = BufReader::new(reader);
    let mut tokens = Vec::new();
    for (idx, line_result) in buffered.lines().enumerate() {
        let line_no = idx + 1;
        let line = line_result.map_err(|e| format!("line {line_no}: {e}").gloss())?;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        tokens.extend(content.split_whitespace().map(|text| Token {
            line: line_no,
            text: text.to_string(),
        }));
    }
    Ok(tokens)
}

fn next_token(
    iter: &mut std::vec::IntoIter<Token>,
    what: &str,
) -> Result<Token, Problem> {
    iter.next()
        .ok_or_else(|| format!("unexpected end of input while reading {what}").gloss())
}

fn next_usize(iter: &mut std::vec::IntoIter<Token>, what: &str) -> Result<usize, Problem> {
    let tok = next_token(iter, what)?;
    tok.text.parse::<usize>().map_err(|_| {
        format!(
            "line {}: expected a non-negative integer for {what}, got '{}'",
            tok.line, tok.text
        )
        .gloss()
    })
}

fn next_bit(iter: &mut std::vec::IntoIter<Token>) -> Result<i32, Problem> {
    let tok = next_token(iter, "an A entry")?;
    match tok.text.parse::<i32>() {
        Ok(0) => Ok(0),
        Ok(1) => Ok(1),
        _ => Err(format!(
            "line {}: A entries must be 0 or 1, got '{}'",
            tok.line, tok.text
        )
        .gloss()),
    }
}

fn next_i64(iter: &mut std::vec::IntoIter<Token>, what: &str) -> Result<i64, Problem> {
    let tok = next_token(iter, what)?;
    tok.text.parse::<i64>().map_err(|_| {
        format!(
            "line {}: expected an integer for {what}, got '{}'",
            tok.line, tok.text
        )
        .gloss()
    })
}

fn next_real(iter: &mut std::vec::IntoIter<Token>, what: &str) -> Result<E, Problem> {
    let tok = next_token(iter, what)?;
    tok.text.parse::<E>().map_err(|_| {
        format!(
            "line {}: expected a real number for {what}, got '{}'",
            tok.line, tok.text
        )
        .gloss()
    })
}

/// Parses the equality-variant text format (spec section 6) from any [`Read`]r.
pub fn read_equality_problem(reader: impl Read) -> Result<EqualityProblem, Problem> {
    let tokens = tokenize(reader)?;
    let mut iter = tokens.into_iter();

    let m = next_usize(&mut iter, "m")?;
    let n = next_usize(&mut iter, "n")?;
    if m == 0 || n == 0 {
        return Err(format!("m and n must be positive, got m={m}, n={n}").gloss());
    }

    let mut a_data = Vec::with_capacity(m * n);
    for _ in 0..(m * n) {
        a_data.push(next_bit(&mut iter)?);
    }

    let mut b = Vec::with_capacity(m);
    for _ in 0..m {
        b.push(next_i64(&mut iter, "a b entry")?);
    }

    let mut c = Col::zeros(n);
    for j in 0..n {
        c[j] = next_real(&mut iter, "a c entry")?;
    }

    Ok(EqualityProblem::new(
        m,
        n,
        IntMatrix::from_row_major(m, n, a_data),
        b,
        c,
    ))
}
