//! An in-memory [`Interface`] that records every invocation instead of
//! performing any real I/O, grounded in the teacher's `transport::Mock`
//! (which records reads/writes into a `HashMap` rather than touching
//! hardware). Shared across this crate's `#[cfg(test)]` modules.

use crate::address::AddressPack;
use crate::bitmask::UniverseMask;
use crate::interface::Interface;
use crate::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Invocation {
    Id,
    Setu(u16, Vec<u8>),
    Setv(Vec<(AddressPack, u8)>),
    Getu(u16),
    Setfr(u8),
    Getfr,
    Newmu(u16),
    Listmu,
    Delmu(u16),
    Setmu(u16, UniverseMask, Vec<u8>),
    Setmv(u16, Vec<(u16, bool, u8)>),
    Getmu(u16),
    Clrmu(u16),
    Patch(u16, u16, u16),
    Unpat(u16),
    Listp,
    Copy(u16, u16),
    Setutv(u16, u8, UniverseMask),
    Setmtv(u16, u8, UniverseMask),
    Listu,
    Geta(Vec<AddressPack>),
    Getma(Vec<AddressPack>),
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub calls: Vec<Invocation>,
}

impl Interface for Recorder {
    fn id(&mut self, _ctx: &CommandContext) {
        self.calls.push(Invocation::Id);
    }

    fn setu(&mut self, _ctx: &CommandContext, universe: u16, data: &[u8; 512]) {
        self.calls.push(Invocation::Setu(universe, data.to_vec()));
    }

    fn setv(&mut self, _ctx: &CommandContext, pairs: &[(AddressPack, u8)]) {
        self.calls.push(Invocation::Setv(pairs.to_vec()));
    }

    fn getu(&mut self, _ctx: &CommandContext, universe: u16) {
        self.calls.push(Invocation::Getu(universe));
    }

    fn setfr(&mut self, _ctx: &CommandContext, framerate: u8) {
        self.calls.push(Invocation::Setfr(framerate));
    }

    fn getfr(&mut self, _ctx: &CommandContext) {
        self.calls.push(Invocation::Getfr);
    }

    fn newmu(&mut self, _ctx: &CommandContext, universe: u16) {
        self.calls.push(Invocation::Newmu(universe));
    }

    fn listmu(&mut self, _ctx: &CommandContext) {
        self.calls.push(Invocation::Listmu);
    }

    fn delmu(&mut self, _ctx: &CommandContext, universe: u16) {
        self.calls.push(Invocation::Delmu(universe));
    }

    fn setmu(&mut self, _ctx: &CommandContext, universe: u16, mask: &UniverseMask, data: &[u8; 512]) {
        self.calls.push(Invocation::Setmu(universe, *mask, data.to_vec()));
    }

    fn setmv(&mut self, _ctx: &CommandContext, universe: u16, triples: &[(u16, bool, u8)]) {
        self.calls.push(Invocation::Setmv(universe, triples.to_vec()));
    }

    fn getmu(&mut self, _ctx: &CommandContext, universe: u16) {
        self.calls.push(Invocation::Getmu(universe));
    }

    fn clrmu(&mut self, _ctx: &CommandContext, universe: u16) {
        self.calls.push(Invocation::Clrmu(universe));
    }

    fn patch(&mut self, _ctx: &CommandContext, input: u16, output: u16, mask: u16) {
        self.calls.push(Invocation::Patch(input, output, mask));
    }

    fn unpat(&mut self, _ctx: &CommandContext, output: u16) {
        self.calls.push(Invocation::Unpat(output));
    }

    fn listp(&mut self, _ctx: &CommandContext) {
        self.calls.push(Invocation::Listp);
    }

    fn copy(&mut self, _ctx: &CommandContext, source: u16, destination: u16) {
        self.calls.push(Invocation::Copy(source, destination));
    }

    fn setutv(&mut self, _ctx: &CommandContext, universe: u16, value: u8, mask: &UniverseMask) {
        self.calls.push(Invocation::Setutv(universe, value, *mask));
    }

    fn setmtv(&mut self, _ctx: &CommandContext, universe: u16, value: u8, mask: &UniverseMask) {
        self.calls.push(Invocation::Setmtv(universe, value, *mask));
    }

    fn listu(&mut self, _ctx: &CommandContext) {
        self.calls.push(Invocation::Listu);
    }

    fn geta(&mut self, _ctx: &CommandContext, addresses: &[AddressPack]) {
        self.calls.push(Invocation::Geta(addresses.to_vec()));
    }

    fn getma(&mut self, _ctx: &CommandContext, addresses: &[AddressPack]) {
        self.calls.push(Invocation::Getma(addresses.to_vec()));
    }
}
