//! An incremental, push-driven WebSocket frame reader.
//!
//! This crate does not open sockets, perform handshakes, or write frames: it
//! only turns a stream of raw bytes, handed over via [`FrameReader::feed_data`],
//! into a stream of typed [`Message`]s delivered to a [`MessageSink`]. That
//! split lets it sit behind any transport — a `TcpStream`, a TLS stream, a
//! test harness replaying captured traffic — without depending on how the
//! bytes arrived.
//!
//! The reader is organized as three internal layers:
//! - the frame parser turns bytes into raw frames
//! - the message assembler reassembles fragmented frames into full messages
//! - the payload finalizer decompresses, validates, and types the result
//!
//! `permessage-deflate` ([RFC 7692](https://datatracker.ietf.org/doc/html/rfc7692))
//! is supported when negotiated via [`ReaderConfig::compress`].

mod assembler;
mod compression;
pub mod config;
pub mod error;
mod finalizer;
pub mod frame;
pub mod message;
mod parser;
pub mod reader;
pub mod sink;

pub use config::ReaderConfig;
pub use error::{WebSocketError, WSCloseCode};
pub use message::Message;
pub use reader::FrameReader;
pub use sink::{ChannelSink, MessageSink};
