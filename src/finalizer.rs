use crate::assembler::AssembledMessage;
use crate::compression::Decompressor;
use crate::error::{is_close_code_allowed, WebSocketError};
use crate::frame::OpCode;
use crate::message::Message;

/// The L3 layer: turns an [`AssembledMessage`] into a [`Message`], running
/// decompression, UTF-8 validation, and close-frame validation — the last
/// stop before a message reaches the sink.
pub(crate) struct PayloadFinalizer {
    /// Lazily constructed on the first compressed message, then reused for
    /// the reader's lifetime so the LZ77 context stays sticky across messages.
    decompressor: Option<Decompressor>,
    max_message_size: u64,
}

impl PayloadFinalizer {
    pub fn new(max_message_size: u64) -> Self {
        Self {
            decompressor: None,
            max_message_size,
        }
    }

    pub fn finalize(&mut self, message: AssembledMessage) -> Result<Message, WebSocketError> {
        let payload = if message.compressed {
            let ceiling = self.max_message_size;
            let decompressor = self.decompressor.get_or_insert_with(Decompressor::new);
            let outcome = decompressor.decompress(&message.payload, ceiling)?;
            if ceiling != 0 && outcome.unconsumed > 0 {
                return Err(WebSocketError::MessageTooBig {
                    size: ceiling + outcome.unconsumed,
                    limit: ceiling,
                });
            }
            outcome.data
        } else {
            message.payload
        };

        match message.opcode {
            OpCode::Text => {
                let text = String::from_utf8(payload)?;
                Ok(Message::Text(text))
            }
            OpCode::Binary => Ok(Message::Binary(payload)),
            OpCode::Ping => Ok(Message::Ping(payload)),
            OpCode::Pong => Ok(Message::Pong(payload)),
            OpCode::Close => self.finalize_close(payload),
            OpCode::Continuation => {
                unreachable!("the assembler never hands L3 a bare continuation opcode")
            }
        }
    }

    fn finalize_close(&self, payload: Vec<u8>) -> Result<Message, WebSocketError> {
        if payload.is_empty() {
            return Ok(Message::Close {
                code: 0,
                reason: String::new(),
            });
        }

        if payload.len() < 2 {
            return Err(WebSocketError::protocol(
                "Received close frame with a payload too short to hold a close code",
            ));
        }

        let code = u16::from_be_bytes([payload[0], payload[1]]);
        if !is_close_code_allowed(code) {
            return Err(WebSocketError::protocol(format!(
                "Received close frame with invalid code {}",
                code
            )));
        }

        let reason = String::from_utf8(payload[2..].to_vec())?;
        Ok(Message::Close { code, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembled(opcode: OpCode, payload: &[u8], compressed: bool) -> AssembledMessage {
        AssembledMessage {
            opcode,
            payload: payload.to_vec(),
            compressed,
        }
    }

    #[test]
    fn plain_text_message_passes_through() {
        let mut finalizer = PayloadFinalizer::new(0);
        let msg = finalizer
            .finalize(assembled(OpCode::Text, b"hello", false))
            .unwrap();
        assert_eq!(msg, Message::Text("hello".to_string()));
    }

    #[test]
    fn compressed_text_message_is_inflated() {
        let mut finalizer = PayloadFinalizer::new(0);
        // Raw-deflate payload for "Hello" (trailer already stripped by the sender).
        let compressed = [0xF2, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
        let msg = finalizer
            .finalize(assembled(OpCode::Text, &compressed, true))
            .unwrap();
        assert_eq!(msg, Message::Text("Hello".to_string()));
    }

    #[test]
    fn invalid_utf8_text_is_rejected() {
        let mut finalizer = PayloadFinalizer::new(0);
        let invalid = vec![0xFF, 0xFE, 0xFD];
        assert!(finalizer.finalize(assembled(OpCode::Text, &invalid, false)).is_err());
    }

    #[test]
    fn empty_close_frame_has_no_code() {
        let mut finalizer = PayloadFinalizer::new(0);
        let msg = finalizer.finalize(assembled(OpCode::Close, b"", false)).unwrap();
        assert_eq!(
            msg,
            Message::Close {
                code: 0,
                reason: String::new()
            }
        );
    }

    #[test]
    fn close_frame_with_code_and_reason() {
        let mut finalizer = PayloadFinalizer::new(0);
        let mut payload = vec![0x03, 0xE8]; // 1000
        payload.extend_from_slice(b"bye");
        let msg = finalizer.finalize(assembled(OpCode::Close, &payload, false)).unwrap();
        assert_eq!(
            msg,
            Message::Close {
                code: 1000,
                reason: "bye".to_string()
            }
        );
    }

    #[test]
    fn close_frame_with_disallowed_code_is_rejected() {
        let mut finalizer = PayloadFinalizer::new(0);
        let payload = vec![0x03, 0xE9]; // 1001 is allowed; use an unassigned one
        let unassigned = vec![0x04, 0x4C]; // 1100, not in the allowed set
        assert!(finalizer
            .finalize(assembled(OpCode::Close, &unassigned, false))
            .is_err());
        assert!(finalizer
            .finalize(assembled(OpCode::Close, &payload, false))
            .is_ok());
    }

    #[test]
    fn user_assigned_close_code_passes_through_unvalidated() {
        let mut finalizer = PayloadFinalizer::new(0);
        let payload = vec![0x0B, 0xB8]; // 3000
        let msg = finalizer.finalize(assembled(OpCode::Close, &payload, false)).unwrap();
        assert_eq!(
            msg,
            Message::Close {
                code: 3000,
                reason: String::new()
            }
        );
    }

    #[test]
    fn close_frame_with_truncated_code_is_rejected() {
        let mut finalizer = PayloadFinalizer::new(0);
        assert!(finalizer.finalize(assembled(OpCode::Close, &[0x03], false)).is_err());
    }
}
