//! The capability set the dispatcher invokes on a caller-supplied backend.
//!
//! Every method has an empty default body, mirroring the teacher's
//! `Transport` trait's mix of required and default-bodied convenience
//! methods — except here *every* operation defaults to a no-op, since the
//! dispatcher carries no lighting state and a caller only overrides what it
//! cares about.

use crate::address::{AddressPack, UniverseNumber};
use crate::bitmask::UniverseMask;
use crate::CommandContext;

#[allow(unused_variables)]
pub trait Interface {
    fn id(&mut self, ctx: &CommandContext) {}

    fn setu(&mut self, ctx: &CommandContext, universe: UniverseNumber, data: &[u8; 512]) {}

    fn setv(&mut self, ctx: &CommandContext, pairs: &[(AddressPack, u8)]) {}

    fn getu(&mut self, ctx: &CommandContext, universe: UniverseNumber) {}

    fn setfr(&mut self, ctx: &CommandContext, framerate: u8) {}

    fn getfr(&mut self, ctx: &CommandContext) {}

    fn newmu(&mut self, ctx: &CommandContext, universe: UniverseNumber) {}

    fn listmu(&mut self, ctx: &CommandContext) {}

    fn delmu(&mut self, ctx: &CommandContext, universe: UniverseNumber) {}

    fn setmu(
        &mut self,
        ctx: &CommandContext,
        universe: UniverseNumber,
        mask: &UniverseMask,
        data: &[u8; 512],
    ) {
    }

    fn setmv(&mut self, ctx: &CommandContext, universe: UniverseNumber, triples: &[(u16, bool, u8)]) {}

    fn getmu(&mut self, ctx: &CommandContext, universe: UniverseNumber) {}

    fn clrmu(&mut self, ctx: &CommandContext, universe: UniverseNumber) {}

    fn patch(
        &mut self,
        ctx: &CommandContext,
        input: UniverseNumber,
        output: UniverseNumber,
        mask: UniverseNumber,
    ) {
    }

    fn unpat(&mut self, ctx: &CommandContext, output: UniverseNumber) {}

    fn listp(&mut self, ctx: &CommandContext) {}

    fn copy(&mut self, ctx: &CommandContext, source: UniverseNumber, destination: UniverseNumber) {}

    fn setutv(
        &mut self,
        ctx: &CommandContext,
        universe: UniverseNumber,
        value: u8,
        mask: &UniverseMask,
    ) {
    }

    fn setmtv(
        &mut self,
        ctx: &CommandContext,
        universe: UniverseNumber,
        value: u8,
        mask: &UniverseMask,
    ) {
    }

    fn listu(&mut self, ctx: &CommandContext) {}

    fn geta(&mut self, ctx: &CommandContext, addresses: &[AddressPack]) {}

    fn getma(&mut self, ctx: &CommandContext, addresses: &[AddressPack]) {}
}
