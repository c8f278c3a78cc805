use crate::error::WebSocketError;
use crate::frame::{OpCode, RawFrame};

/// One data or control message assembled from one or more [`RawFrame`]s, not
/// yet passed through decompression or UTF-8 validation.
pub(crate) struct AssembledMessage {
    pub opcode: OpCode,
    pub payload: Vec<u8>,
    pub compressed: bool,
}

/// The L2 layer: groups a stream of [`RawFrame`]s into complete messages,
/// reassembling `Continuation` fragments and enforcing the running size
/// limit as bytes arrive rather than only once a message is complete.
///
/// Non-final frames are accumulated unconditionally, even a stray
/// `Continuation` with no message started; "continuation for a non-started
/// message" and "new data frame mid-fragment" are only raised once such a
/// run reaches `fin`, matching the reference this accumulation logic is
/// modeled on.
pub(crate) struct MessageAssembler {
    max_message_size: u64,
    partial: Vec<u8>,
    pending_opcode: Option<u8>,
}

impl MessageAssembler {
    pub fn new(max_message_size: u64) -> Self {
        Self {
            max_message_size,
            partial: Vec::new(),
            pending_opcode: None,
        }
    }

    /// Folds one raw frame into the assembler, returning a completed message
    /// once `frame.fin` closes it out.
    pub fn push(&mut self, frame: RawFrame) -> Result<Option<AssembledMessage>, WebSocketError> {
        if frame.opcode > 0x7 {
            // Control frames are never fragmented (the parser already
            // rejects fin=false control frames) and interleave freely with a
            // data message's continuation state without disturbing it.
            let opcode = OpCode::from_u8(frame.opcode)?;
            return Ok(Some(AssembledMessage {
                opcode,
                payload: frame.payload,
                compressed: false,
            }));
        }

        let is_continuation = frame.opcode == OpCode::Continuation.as_u8();

        if !frame.fin {
            if !is_continuation {
                self.pending_opcode = Some(frame.opcode);
            }
            self.partial.extend_from_slice(&frame.payload);
            self.check_size(self.partial.len() as u64)?;
            return Ok(None);
        }

        let has_partial = !self.partial.is_empty();
        let opcode = if is_continuation {
            self.pending_opcode.take().ok_or_else(|| {
                WebSocketError::protocol("Received continuation frame for a non-started message")
            })?
        } else if has_partial {
            return Err(WebSocketError::protocol(
                "Received new data frame while a fragmented message was in progress",
            ));
        } else {
            frame.opcode
        };

        let assembled = if has_partial {
            let mut buf = std::mem::take(&mut self.partial);
            buf.extend_from_slice(&frame.payload);
            buf
        } else {
            frame.payload
        };
        self.check_size(assembled.len() as u64)?;

        Ok(Some(AssembledMessage {
            opcode: OpCode::from_u8(opcode)?,
            payload: assembled,
            compressed: frame.compressed,
        }))
    }

    fn check_size(&self, size: u64) -> Result<(), WebSocketError> {
        if self.max_message_size != 0 && size >= self.max_message_size {
            return Err(WebSocketError::MessageTooBig {
                size,
                limit: self.max_message_size,
            });
        }
        Ok(())
    }
}
