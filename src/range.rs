//! Address-range expression grammar: `term (combinator term)*`, where a term
//! is a single address or a `thru` range, optionally followed by `even` /
//! `odd` / `offset N` selectors, and a combinator is `+` (union) or `-`
//! (difference).
//!
//! The grammar's tokenization is handled with `nom`, the same crate used
//! elsewhere in this workspace for small whitespace/keyword-delimited
//! grammars; the resulting AST is then evaluated by hand into the sparse
//! per-universe bitmask map, since the evaluation step (thru-range bit
//! placement, selector application) is arithmetic rather than parsing.

use std::collections::BTreeMap;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, space1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::sequence::{preceded, tuple};
use nom::IResult;

use crate::address::{parse_address, UniverseNumber};
use crate::bitmask::{UniverseMask, BIT_LEN, EVEN_MASK, ODD_MASK};
use crate::error::ParseError;

/// A sparse map from universe number to the addresses selected within it.
/// Iteration order (a `BTreeMap`'s) is ascending universe number, matching
/// the required enumeration order for `get`/`mget` and selector application.
pub type AddressRange = BTreeMap<UniverseNumber, UniverseMask>;

#[derive(Debug, Clone, Copy)]
enum Selector {
    Even,
    Odd,
    Offset(u64),
}

#[derive(Clone, Copy)]
enum TermAst<'a> {
    Single(&'a str),
    Thru(&'a str, &'a str),
}

struct ParsedTerm<'a> {
    ast: TermAst<'a>,
    selectors: Vec<Selector>,
}

fn address_token(i: &str) -> IResult<&str, &str> {
    recognize(tuple((digit1, opt(tuple((char('/'), digit1))))))(i)
}

fn selector(i: &str) -> IResult<&str, Selector> {
    alt((
        map(tag("even"), |_| Selector::Even),
        map(tag("odd"), |_| Selector::Odd),
        map_res(
            preceded(tag("offset"), preceded(space1, digit1)),
            |n: &str| n.parse::<u64>().map(Selector::Offset),
        ),
    ))(i)
}

fn term_ast(i: &str) -> IResult<&str, ParsedTerm<'_>> {
    let (i, start) = address_token(i)?;
    let (i, end) = opt(preceded(
        tuple((space1, tag("thru"), space1)),
        address_token,
    ))(i)?;
    let (i, selectors) = nom::multi::many0(preceded(space1, selector))(i)?;

    let ast = match end {
        Some(e) => TermAst::Thru(start, e),
        None => TermAst::Single(start),
    };
    Ok((i, ParsedTerm { ast, selectors }))
}

fn combinator(i: &str) -> IResult<&str, char> {
    nom::character::complete::one_of("+-")(i)
}

/// Parses and evaluates a full address-range expression.
pub(crate) fn parse_range(input: &str) -> Result<AddressRange, ParseError> {
    let trimmed = input.trim();
    let (rest, first) = term_ast(trimmed).map_err(|_| ParseError::MalformedRange)?;
    let mut range = evaluate_term(&first)?;
    let mut remaining = rest;

    loop {
        let trimmed = remaining.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let (rest, op) = combinator(trimmed).map_err(|_| ParseError::MalformedRange)?;
        let (rest, next) = term_ast(rest.trim_start()).map_err(|_| ParseError::MalformedRange)?;
        let next_range = evaluate_term(&next)?;
        match op {
            '+' => union_range(&mut range, &next_range),
            '-' => difference_range(&mut range, &next_range),
            _ => unreachable!("`one_of(\"+-\")` only matches '+' or '-'"),
        }
        remaining = rest;
    }

    Ok(range)
}

fn evaluate_term(parsed: &ParsedTerm<'_>) -> Result<AddressRange, ParseError> {
    let mut range = AddressRange::new();

    match parsed.ast {
        TermAst::Single(token) => {
            let pack = parse_address(token)?;
            if pack.0 == 0 || pack.1 == 0 {
                return Err(ParseError::NullAddress);
            }
            let mask = range.entry(pack.0).or_insert_with(UniverseMask::default);
            mask.set(usize::from(pack.1) - 1, true);
        }
        TermAst::Thru(start_token, end_token) => {
            let start = parse_address(start_token)?;
            let end = parse_address(end_token)?;
            if start.0 == 0 || start.1 == 0 || end.0 == 0 || end.1 == 0 {
                return Err(ParseError::NullAddress);
            }
            if start.0 <= end.0 {
                for universe in start.0..=end.0 {
                    let lo = if universe == start.0 { start.1 } else { 1 };
                    let hi = if universe == end.0 { end.1 } else { 512 };
                    if lo > hi {
                        continue;
                    }
                    let mask = range.entry(universe).or_insert_with(UniverseMask::default);
                    for local in lo..=hi {
                        mask.set(usize::from(local) - 1, true);
                    }
                }
            }
            // start.0 > end.0: an empty range, same as a0 > a1 within one universe.
        }
    }

    for sel in &parsed.selectors {
        apply_selector(&mut range, sel);
    }

    Ok(range)
}

fn apply_selector(range: &mut AddressRange, sel: &Selector) {
    match sel {
        Selector::Even => {
            for mask in range.values_mut() {
                *mask = mask.intersection(&EVEN_MASK);
            }
        }
        Selector::Odd => {
            for mask in range.values_mut() {
                *mask = mask.intersection(&ODD_MASK);
            }
        }
        Selector::Offset(n) => apply_offset(range, *n),
    }
}

/// Keeps every `n`th set bit, in ascending `(universe, bit)` order, zeroing
/// the rest; `n == 0` zeroes the whole range (the counter never reaches it).
fn apply_offset(range: &mut AddressRange, n: u64) {
    let mut counter: u64 = 0;
    for mask in range.values_mut() {
        let mut kept = UniverseMask::default();
        for bit in 0..BIT_LEN {
            if mask.test(bit) {
                counter += 1;
                if counter == 1 {
                    kept.set(bit, true);
                }
                if counter == n {
                    counter = 0;
                }
            }
        }
        *mask = kept;
    }
}

fn union_range(dest: &mut AddressRange, src: &AddressRange) {
    for (universe, mask) in src {
        dest.entry(*universe)
            .or_insert_with(UniverseMask::default)
            .union_assign(mask);
    }
}

fn difference_range(dest: &mut AddressRange, src: &AddressRange) {
    for (universe, mask) in src {
        if let Some(existing) = dest.get_mut(universe) {
            existing.difference_assign(mask);
        }
    }
}
