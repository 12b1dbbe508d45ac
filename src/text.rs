//! Text command decoding: `name SP rest`, dispatched by a `match` on the
//! command name since the command set is small, fixed, and known at compile
//! time.

use crate::address::AddressPack;
use crate::error::ParseError;
use crate::interface::Interface;
use crate::range::parse_range;
use crate::value::parse_value;
use crate::{CommandContext, DispatchStatus};

const GET_CAP: usize = 100;

pub(crate) fn process<I: Interface>(interface: &mut I, ctx: &CommandContext, line: &str) -> DispatchStatus {
    let (name, rest) = match line.split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (line, ""),
    };

    tracing::trace!(command = name, "dispatching text command");

    let result = match name {
        "identify" => {
            interface.id(ctx);
            Ok(())
        }
        "framerate" => cmd_framerate(interface, ctx, rest),
        "ports" => {
            interface.listu(ctx);
            Ok(())
        }
        "patches" => {
            interface.listp(ctx);
            Ok(())
        }
        "masks" => {
            interface.listmu(ctx);
            Ok(())
        }
        "createmask" => parse_universe(rest).map(|u| interface.newmu(ctx, u)),
        "deletemask" => parse_universe(rest).map(|u| interface.delmu(ctx, u)),
        "clearmask" => parse_universe(rest).map(|u| interface.clrmu(ctx, u)),
        "unpatch" => parse_universe(rest).map(|u| interface.unpat(ctx, u)),
        "copy" => cmd_copy(interface, ctx, rest),
        "patch" => cmd_patch(interface, ctx, rest),
        "set" => cmd_set(interface, ctx, rest, false),
        "mset" => cmd_set(interface, ctx, rest, true),
        "get" => cmd_get(interface, ctx, rest, false),
        "mget" => cmd_get(interface, ctx, rest, true),
        _ => Err(ParseError::UnknownCommand),
    };

    match result {
        Ok(()) => DispatchStatus::Success,
        Err(err) => {
            tracing::debug!(command = name, error = %err, "rejected text command");
            DispatchStatus::MalformedSyntax
        }
    }
}

fn parse_universe(token: &str) -> Result<u16, ParseError> {
    Ok(token.trim().parse::<u16>()?)
}

fn cmd_framerate<I: Interface>(interface: &mut I, ctx: &CommandContext, rest: &str) -> Result<(), ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        interface.getfr(ctx);
    } else {
        interface.setfr(ctx, rest.parse()?);
    }
    Ok(())
}

/// Splits `"... to ..."` on the first `t` that is immediately followed by
/// `o`; a `t` not followed by `o` is malformed, rather than skipped in favor
/// of scanning further for a later `to`.
fn split_to(s: &str) -> Result<(&str, &str), ParseError> {
    let idx = s.find('t').ok_or(ParseError::MissingTo)?;
    let bytes = s.as_bytes();
    if idx + 1 >= bytes.len() || bytes[idx + 1] != b'o' {
        return Err(ParseError::MissingTo);
    }
    Ok((&s[..idx], &s[idx + 2..]))
}

/// Looks for an `m` one character past `tail`'s start (mirroring the
/// one-character skip past the mandatory space after `to`); if found it must
/// begin a `"mask"` literal, otherwise the command is malformed rather than
/// treated as having no mask clause.
fn find_mask_clause(tail: &str) -> Result<Option<(&str, &str)>, ParseError> {
    if tail.len() < 2 {
        return Ok(None);
    }
    let Some(rel_idx) = tail[1..].find('m') else {
        return Ok(None);
    };
    let abs_idx = rel_idx + 1;
    if tail.len() < abs_idx + 4 || &tail[abs_idx..abs_idx + 4] != "mask" {
        return Err(ParseError::MalformedMask);
    }
    Ok(Some((&tail[..abs_idx], &tail[abs_idx + 4..])))
}

fn cmd_copy<I: Interface>(interface: &mut I, ctx: &CommandContext, rest: &str) -> Result<(), ParseError> {
    let (source, destination) = split_to(rest)?;
    interface.copy(ctx, parse_universe(source)?, parse_universe(destination)?);
    Ok(())
}

fn cmd_patch<I: Interface>(interface: &mut I, ctx: &CommandContext, rest: &str) -> Result<(), ParseError> {
    let (input_str, tail) = split_to(rest)?;
    let input = parse_universe(input_str)?;

    let (output_str, mask_universe) = match find_mask_clause(tail)? {
        Some((output, mask_tail)) => (output, parse_universe(mask_tail)?),
        None => (tail, 0u16),
    };

    interface.patch(ctx, input, parse_universe(output_str)?, mask_universe);
    Ok(())
}

fn cmd_set<I: Interface>(interface: &mut I, ctx: &CommandContext, rest: &str, masked: bool) -> Result<(), ParseError> {
    let (range_str, value_str) = rest.split_once('@').ok_or(ParseError::MissingAt)?;
    let range = parse_range(range_str.trim())?;
    let value = parse_value(value_str.trim())?;

    for (universe, mask) in &range {
        if masked {
            interface.setmtv(ctx, *universe, value, mask);
        } else {
            interface.setutv(ctx, *universe, value, mask);
        }
    }
    Ok(())
}

fn cmd_get<I: Interface>(interface: &mut I, ctx: &CommandContext, rest: &str, masked: bool) -> Result<(), ParseError> {
    let range = parse_range(rest.trim())?;
    let mut addresses = Vec::new();

    'outer: for (universe, mask) in &range {
        for local in 1..=512u16 {
            if mask.test(usize::from(local) - 1) {
                addresses.push(AddressPack(*universe, local));
                if addresses.len() >= GET_CAP {
                    break 'outer;
                }
            }
        }
    }

    if masked {
        interface.getma(ctx, &addresses);
    } else {
        interface.geta(ctx, &addresses);
    }
    Ok(())
}
