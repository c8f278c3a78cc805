#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ws_frame_reader::{FrameReader, Message, MessageSink, ReaderConfig, WebSocketError};

/// Arbitrary byte stream, split into arbitrary-sized chunks, so the fuzzer
/// explores both malformed wire content and pathological chunk boundaries.
#[derive(Debug, Arbitrary)]
struct Input {
    compress: bool,
    chunks: Vec<Vec<u8>>,
}

struct NullSink;

impl MessageSink for NullSink {
    fn deliver(&mut self, _message: Message) {}
    fn feed_eof(&mut self) {}
    fn set_exception(&mut self, _error: WebSocketError) {}
}

fuzz_target!(|input: Input| {
    let config = ReaderConfig {
        max_message_size: 1 << 20,
        compress: input.compress,
    };
    let mut reader = FrameReader::new(config, NullSink);

    for chunk in &input.chunks {
        let (closed, _leftover) = reader.feed_data(chunk);
        if closed {
            break;
        }
    }
    reader.feed_eof();
});
