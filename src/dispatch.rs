//! The dispatcher facade: owns a borrow of the backing interface and exposes
//! the text-command and direct-control entry points.

use crate::binary::{self, MessageHeader, FRAME_PREFIX_LEN, SENTINEL};
use crate::interface::Interface;
use crate::text;
use crate::{CommandContext, DispatchStatus, InterfaceMode};

/// Parses and routes DCSM requests to a caller-supplied [`Interface`].
///
/// Holds no lighting state of its own; every call borrows the interface for
/// its own duration and nothing is retained between calls.
pub struct Dispatcher<'a, I: Interface> {
    interface: &'a mut I,
}

impl<'a, I: Interface> Dispatcher<'a, I> {
    #[must_use]
    pub fn new(interface: &'a mut I) -> Self {
        Self { interface }
    }

    /// Parses and dispatches a single text command line.
    pub fn process_command(&mut self, line: &str) -> DispatchStatus {
        let ctx = CommandContext {
            mode: InterfaceMode::CommandLine,
        };
        text::process(self.interface, &ctx, line)
    }

    /// Parses and dispatches an already-framed direct-control message body,
    /// given a header decoded separately (e.g. by [`Self::process_framed_message`]
    /// or by a caller reading the header off its own transport).
    pub fn process_message(&mut self, header: MessageHeader, body: &[u8]) -> DispatchStatus {
        let ctx = CommandContext {
            mode: InterfaceMode::DirectControl,
        };
        binary::process(self.interface, &ctx, header, body)
    }

    /// Parses and dispatches a direct-control message still carrying its
    /// leading sentinel byte and little-endian header.
    pub fn process_framed_message(&mut self, bytes: &[u8]) -> DispatchStatus {
        if bytes.len() < FRAME_PREFIX_LEN || bytes[0] != SENTINEL {
            return DispatchStatus::InvalidHeader;
        }
        let mut header_bytes = [0u8; 4];
        header_bytes.copy_from_slice(&bytes[1..5]);
        let header = MessageHeader::decode(&header_bytes);
        self.process_message(header, &bytes[FRAME_PREFIX_LEN..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Invocation, Recorder};

    #[test]
    fn text_command_round_trip() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        assert_eq!(dispatcher.process_command("identify"), DispatchStatus::Success);
        assert_eq!(rec.calls, vec![Invocation::Id]);
    }

    #[test]
    fn framed_message_without_sentinel_is_invalid_header() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        let bytes = [0xFF, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(dispatcher.process_framed_message(&bytes), DispatchStatus::InvalidHeader);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn framed_message_too_short_is_invalid_header() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        let bytes = [0x00, 0x01, 0x00];
        assert_eq!(dispatcher.process_framed_message(&bytes), DispatchStatus::InvalidHeader);
    }

    #[test]
    fn framed_identify_message_dispatches() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        // sentinel, opcode 0x0001 LE, length 0 LE, no body.
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(dispatcher.process_framed_message(&bytes), DispatchStatus::Success);
        assert_eq!(rec.calls, vec![Invocation::Id]);
    }

    #[test]
    fn framed_copy_message_dispatches_with_corrected_offsets() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        let mut bytes = vec![0x00, 0x11, 0x00, 0x04, 0x00];
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        assert_eq!(dispatcher.process_framed_message(&bytes), DispatchStatus::Success);
        assert_eq!(rec.calls, vec![Invocation::Copy(3, 4)]);
    }

    #[test]
    fn unrecognized_opcode_in_a_framed_message_is_invalid_header() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        let bytes = [0x00, 0xFF, 0x00, 0x00, 0x00];
        assert_eq!(dispatcher.process_framed_message(&bytes), DispatchStatus::InvalidHeader);
    }

    #[test]
    fn masked_set_command_fans_out_across_universes() {
        let mut rec = Recorder::default();
        let mut dispatcher = Dispatcher::new(&mut rec);
        assert_eq!(
            dispatcher.process_command("set 1/1 thru 2/2 @ half"),
            DispatchStatus::Success
        );
        assert_eq!(rec.calls.len(), 2);
    }
}
