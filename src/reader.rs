use crate::assembler::MessageAssembler;
use crate::config::ReaderConfig;
use crate::error::WebSocketError;
use crate::finalizer::PayloadFinalizer;
use crate::frame::RawFrame;
use crate::parser::FrameParser;
use crate::sink::MessageSink;

/// An incremental, push-driven WebSocket frame reader.
///
/// Owns no socket and performs no I/O: bytes arrive through [`feed_data`]
/// and finalized messages leave through whatever [`MessageSink`] was given
/// at construction. Once a fatal protocol error occurs, the reader latches:
/// every subsequent `feed_data` call is a no-op that returns its input chunk
/// straight back as leftover.
///
/// [`feed_data`]: FrameReader::feed_data
pub struct FrameReader<S: MessageSink> {
    parser: FrameParser,
    assembler: MessageAssembler,
    finalizer: PayloadFinalizer,
    sink: S,
    fatal: bool,
}

impl<S: MessageSink> FrameReader<S> {
    pub fn new(config: ReaderConfig, sink: S) -> Self {
        Self {
            parser: FrameParser::new(config.compress),
            assembler: MessageAssembler::new(config.max_message_size),
            finalizer: PayloadFinalizer::new(config.max_message_size),
            sink,
            fatal: false,
        }
    }

    /// Feeds one chunk of bytes. Returns `(closed, leftover)`: `closed` is
    /// `true` once a fatal error has latched the reader (this call's or an
    /// earlier one's), and `leftover` is any suffix of `chunk` the reader did
    /// not consume because it had already closed before reaching it.
    pub fn feed_data(&mut self, chunk: &[u8]) -> (bool, Vec<u8>) {
        if self.fatal {
            return (true, chunk.to_vec());
        }

        match self.parser.feed(chunk) {
            Ok(frames) => {
                for frame in frames {
                    if let Err(err) = self.push_frame(frame) {
                        self.fail(err);
                        return (true, Vec::new());
                    }
                }
                (false, Vec::new())
            }
            Err(err) => {
                self.fail(err);
                (true, Vec::new())
            }
        }
    }

    /// Signals end of input, propagating it straight to the sink. A reader
    /// stopped mid-fragment is this crate's collaborator's business (the
    /// transport decides what an unexpected disconnect means); this reader
    /// itself raises no error for it.
    pub fn feed_eof(&mut self) {
        if self.fatal {
            return;
        }
        self.sink.feed_eof();
    }

    fn push_frame(&mut self, frame: RawFrame) -> Result<(), WebSocketError> {
        log::trace!(
            "parsed frame: fin={} opcode={:#x} len={}",
            frame.fin,
            frame.opcode,
            frame.payload.len()
        );
        if let Some(assembled) = self.assembler.push(frame)? {
            let message = self.finalizer.finalize(assembled)?;
            log::debug!("assembled message: {:?}", message);
            self.sink.deliver(message);
        }
        Ok(())
    }

    fn fail(&mut self, error: WebSocketError) {
        self.fatal = true;
        log::error!(
            "frame reader latched after fatal error: code={} message={}",
            error.close_code().as_u16(),
            error
        );
        self.sink.set_exception(error);
    }
}
