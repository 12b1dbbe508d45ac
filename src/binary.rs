//! Binary direct-control message framing and opcode table.
//!
//! A framed message is a leading sentinel byte, a little-endian opcode and
//! body-length (the header), and a body whose shape is fixed per opcode.
//! [`MessageHeader`] decodes the header from a byte-copied local array —
//! never a pointer cast — since casting a misaligned buffer straight to a
//! `u16` is undefined behavior on strict-alignment targets.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

use crate::address::AddressPack;
use crate::bitmask::UniverseMask;
use crate::interface::Interface;
use crate::{CommandContext, DispatchStatus};

pub const SENTINEL: u8 = 0x00;
/// Bytes consumed by the sentinel plus the header, before the body starts.
pub const FRAME_PREFIX_LEN: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    Id = 0x0001,
    Setu = 0x0002,
    Setv = 0x0003,
    Getu = 0x0004,
    Setfr = 0x0005,
    Getfr = 0x0006,
    Newmu = 0x0007,
    Listmu = 0x0008,
    Delmu = 0x0009,
    Setmu = 0x000A,
    Setmv = 0x000B,
    Getmu = 0x000C,
    Clrmu = 0x000D,
    Patch = 0x000E,
    Unpat = 0x000F,
    Listp = 0x0010,
    Copy = 0x0011,
    Setutv = 0x0012,
    Setmtv = 0x0013,
    Listu = 0x0014,
    Geta = 0x0015,
    Getma = 0x0016,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub opcode: u16,
    pub length: u16,
}

impl MessageHeader {
    #[must_use]
    pub fn decode(bytes: &[u8; 4]) -> Self {
        let mut opcode_bytes = [0u8; 2];
        opcode_bytes.copy_from_slice(&bytes[0..2]);
        let mut length_bytes = [0u8; 2];
        length_bytes.copy_from_slice(&bytes[2..4]);
        Self {
            opcode: u16::from_le_bytes(opcode_bytes),
            length: u16::from_le_bytes(length_bytes),
        }
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(&bytes[offset..offset + 2]);
    u16::from_le_bytes(buf)
}

/// Validates and routes one already-framed message body to `interface`.
pub(crate) fn process<I: Interface>(
    interface: &mut I,
    ctx: &CommandContext,
    header: MessageHeader,
    body: &[u8],
) -> DispatchStatus {
    let Some(opcode) = Opcode::from_u16(header.opcode) else {
        tracing::debug!(opcode = header.opcode, "unrecognized opcode");
        return DispatchStatus::InvalidHeader;
    };

    let len = usize::from(header.length);
    tracing::trace!(?opcode, length = len, "dispatching direct-control message");

    // These opcodes carry no body; the declared length is truly ignored, so
    // they dispatch before any bounds check against `body`.
    match opcode {
        Opcode::Id => {
            interface.id(ctx);
            return DispatchStatus::Success;
        }
        Opcode::Getfr => {
            interface.getfr(ctx);
            return DispatchStatus::Success;
        }
        Opcode::Listmu => {
            interface.listmu(ctx);
            return DispatchStatus::Success;
        }
        Opcode::Listp => {
            interface.listp(ctx);
            return DispatchStatus::Success;
        }
        Opcode::Listu => {
            interface.listu(ctx);
            return DispatchStatus::Success;
        }
        _ => {}
    }

    if body.len() < len {
        tracing::debug!(?opcode, declared = len, available = body.len(), "body shorter than declared length");
        return DispatchStatus::InvalidBodySize;
    }
    let body = &body[..len];

    match opcode {
        Opcode::Setu => {
            if len != 514 {
                return DispatchStatus::InvalidBodySize;
            }
            let universe = read_u16(body, 0);
            let mut data = [0u8; 512];
            data.copy_from_slice(&body[2..514]);
            interface.setu(ctx, universe, &data);
        }
        Opcode::Setv => {
            if len % 5 != 0 {
                return DispatchStatus::InvalidBodySize;
            }
            let pairs: Vec<(AddressPack, u8)> = body
                .chunks_exact(5)
                .map(|chunk| {
                    let universe = read_u16(chunk, 0);
                    let local = read_u16(chunk, 2);
                    (AddressPack(universe, local), chunk[4])
                })
                .collect();
            interface.setv(ctx, &pairs);
        }
        Opcode::Getu => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.getu(ctx, read_u16(body, 0));
        }
        Opcode::Setfr => {
            if len != 1 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.setfr(ctx, body[0]);
        }
        Opcode::Newmu => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.newmu(ctx, read_u16(body, 0));
        }
        Opcode::Delmu => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.delmu(ctx, read_u16(body, 0));
        }
        Opcode::Setmu => {
            if len != 578 {
                return DispatchStatus::InvalidBodySize;
            }
            let universe = read_u16(body, 0);
            let mut mask_bytes = [0u8; 64];
            mask_bytes.copy_from_slice(&body[2..66]);
            let mut data = [0u8; 512];
            data.copy_from_slice(&body[66..578]);
            interface.setmu(ctx, universe, &UniverseMask::unpack(mask_bytes), &data);
        }
        Opcode::Setmv => {
            if len < 6 || (len - 2) % 4 != 0 {
                return DispatchStatus::InvalidBodySize;
            }
            let universe = read_u16(body, 0);
            let triples: Vec<(u16, bool, u8)> = body[2..]
                .chunks_exact(4)
                .map(|chunk| (read_u16(chunk, 0), chunk[2] != 0, chunk[3]))
                .collect();
            interface.setmv(ctx, universe, &triples);
        }
        Opcode::Getmu => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.getmu(ctx, read_u16(body, 0));
        }
        Opcode::Clrmu => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.clrmu(ctx, read_u16(body, 0));
        }
        Opcode::Patch => {
            if len != 6 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.patch(ctx, read_u16(body, 0), read_u16(body, 2), read_u16(body, 4));
        }
        Opcode::Unpat => {
            if len != 2 {
                return DispatchStatus::InvalidBodySize;
            }
            interface.unpat(ctx, read_u16(body, 0));
        }
        Opcode::Copy => {
            if len != 4 {
                return DispatchStatus::InvalidBodySize;
            }
            // Source and destination each come from their own offset; an
            // earlier revision of this table read both from offset 0.
            interface.copy(ctx, read_u16(body, 0), read_u16(body, 2));
        }
        Opcode::Setutv => {
            if len != 67 {
                return DispatchStatus::InvalidBodySize;
            }
            let universe = read_u16(body, 0);
            let value = body[2];
            let mut mask_bytes = [0u8; 64];
            mask_bytes.copy_from_slice(&body[3..67]);
            interface.setutv(ctx, universe, value, &UniverseMask::unpack(mask_bytes));
        }
        Opcode::Setmtv => {
            if len != 67 {
                return DispatchStatus::InvalidBodySize;
            }
            let universe = read_u16(body, 0);
            let value = body[2];
            let mut mask_bytes = [0u8; 64];
            mask_bytes.copy_from_slice(&body[3..67]);
            interface.setmtv(ctx, universe, value, &UniverseMask::unpack(mask_bytes));
        }
        Opcode::Geta => {
            if len == 0 || len % 4 != 0 {
                return DispatchStatus::InvalidBodySize;
            }
            let addresses: Vec<AddressPack> = body
                .chunks_exact(4)
                .map(|c| AddressPack(read_u16(c, 0), read_u16(c, 2)))
                .collect();
            interface.geta(ctx, &addresses);
        }
        Opcode::Getma => {
            if len == 0 || len % 4 != 0 {
                return DispatchStatus::InvalidBodySize;
            }
            let addresses: Vec<AddressPack> = body
                .chunks_exact(4)
                .map(|c| AddressPack(read_u16(c, 0), read_u16(c, 2)))
                .collect();
            interface.getma(ctx, &addresses);
        }
        Opcode::Id | Opcode::Getfr | Opcode::Listmu | Opcode::Listp | Opcode::Listu => {
            unreachable!("dispatched above, before the body-length check")
        }
    }

    DispatchStatus::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Recorder;
    use crate::InterfaceMode;
    use paste::paste;

    fn ctx() -> CommandContext {
        CommandContext {
            mode: InterfaceMode::DirectControl,
        }
    }

    macro_rules! rejects_wrong_length {
        ($name:ident, $opcode:expr, $bad_len:expr) => {
            paste! {
                #[test]
                fn [<$name _rejects_wrong_length>]() {
                    let mut rec = Recorder::default();
                    let body = vec![0u8; $bad_len];
                    let status = process(
                        &mut rec,
                        &ctx(),
                        MessageHeader { opcode: $opcode, length: $bad_len as u16 },
                        &body,
                    );
                    assert_eq!(status, DispatchStatus::InvalidBodySize);
                    assert!(rec.calls.is_empty());
                }
            }
        };
    }

    rejects_wrong_length!(getu, 0x0004, 1);
    rejects_wrong_length!(setfr, 0x0005, 2);
    rejects_wrong_length!(newmu, 0x0007, 3);
    rejects_wrong_length!(patch, 0x000E, 5);
    rejects_wrong_length!(copy, 0x0011, 3);
    rejects_wrong_length!(setutv, 0x0012, 66);

    #[test]
    fn unknown_opcode_is_invalid_header() {
        let mut rec = Recorder::default();
        let status = process(&mut rec, &ctx(), MessageHeader { opcode: 0x00FF, length: 0 }, &[]);
        assert_eq!(status, DispatchStatus::InvalidHeader);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn setu_requires_exactly_514_bytes() {
        let mut rec = Recorder::default();
        let body = vec![0u8; 513];
        let status = process(
            &mut rec,
            &ctx(),
            MessageHeader { opcode: 0x0002, length: 513 },
            &body,
        );
        assert_eq!(status, DispatchStatus::InvalidBodySize);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn setu_dispatches_on_exact_length() {
        let mut rec = Recorder::default();
        let mut body = vec![0u8; 514];
        body[0..2].copy_from_slice(&1u16.to_le_bytes());
        body[2] = 0xFF;
        let status = process(
            &mut rec,
            &ctx(),
            MessageHeader { opcode: 0x0002, length: 514 },
            &body,
        );
        assert_eq!(status, DispatchStatus::Success);
        assert_eq!(rec.calls.len(), 1);
    }

    #[test]
    fn copy_reads_source_and_destination_from_separate_offsets() {
        let mut rec = Recorder::default();
        let mut body = [0u8; 4];
        body[0..2].copy_from_slice(&7u16.to_le_bytes());
        body[2..4].copy_from_slice(&9u16.to_le_bytes());
        let status = process(&mut rec, &ctx(), MessageHeader { opcode: 0x0011, length: 4 }, &body);
        assert_eq!(status, DispatchStatus::Success);
        assert_eq!(rec.calls, vec![crate::test_support::Invocation::Copy(7, 9)]);
    }

    #[test]
    fn ignored_length_opcodes_always_dispatch() {
        let mut rec = Recorder::default();
        let status = process(&mut rec, &ctx(), MessageHeader { opcode: 0x0001, length: 0 }, &[]);
        assert_eq!(status, DispatchStatus::Success);
        assert_eq!(rec.calls, vec![crate::test_support::Invocation::Id]);
    }

    #[test]
    fn ignored_length_opcodes_dispatch_even_with_a_declared_length_longer_than_the_body() {
        // The declared length is truly ignored for these five opcodes, even
        // when it overstates what's actually in `body`.
        let mut rec = Recorder::default();
        let status = process(&mut rec, &ctx(), MessageHeader { opcode: 0x0006, length: 99 }, &[]);
        assert_eq!(status, DispatchStatus::Success);
        assert_eq!(rec.calls, vec![crate::test_support::Invocation::Getfr]);
    }

    #[test]
    fn setv_with_zero_length_body_dispatches_with_an_empty_slice() {
        let mut rec = Recorder::default();
        let status = process(&mut rec, &ctx(), MessageHeader { opcode: 0x0003, length: 0 }, &[]);
        assert_eq!(status, DispatchStatus::Success);
        assert_eq!(rec.calls, vec![crate::test_support::Invocation::Setv(Vec::new())]);
    }
}
