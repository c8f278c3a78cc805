use crate::error::WebSocketError;
use crate::message::Message;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

/// Where finalized messages (and the one fatal error, if any) go. Kept as a
/// trait rather than hard-wiring a channel so callers can plug in whatever
/// delivery mechanism fits their runtime.
pub trait MessageSink {
    /// Delivers one finalized message. Errors returned here are swallowed by
    /// the reader's `feed_data` loop by design: a full or dropped sink is a
    /// backpressure/shutdown concern for the caller, not a protocol error.
    fn deliver(&mut self, message: Message);

    /// Signals that no further messages will arrive, because the peer
    /// closed the stream cleanly. Not called if `set_exception` already was.
    fn feed_eof(&mut self);

    /// Delivers the single fatal error that ends this connection's stream.
    /// Called at most once.
    fn set_exception(&mut self, error: WebSocketError);
}

/// A [`MessageSink`] backed by a [`tokio::sync::mpsc::Sender`]. Uses
/// `try_send` rather than the async `send`, since the reader never suspends:
/// a full channel means the receiver is too slow, and this reader has no
/// mechanism to apply backpressure onto the byte source, so it drops the
/// message rather than blocking the whole incremental parse.
///
/// `feed_eof` drops the sender, which closes the channel for the receiving
/// side — there is no dedicated "end of stream" variant on the wire, the
/// closed channel itself is the signal.
pub struct ChannelSink {
    sender: Option<Sender<Result<Message, WebSocketError>>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Result<Message, WebSocketError>>) -> Self {
        Self {
            sender: Some(sender),
        }
    }
}

impl MessageSink for ChannelSink {
    fn deliver(&mut self, message: Message) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(TrySendError::Full(_)) = sender.try_send(Ok(message)) {
            log::warn!("dropping message: sink channel is full");
        }
    }

    fn feed_eof(&mut self) {
        self.sender = None;
    }

    fn set_exception(&mut self, error: WebSocketError) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.try_send(Err(error)).is_err() {
            log::warn!("dropping fatal error: sink channel is full or closed");
        }
        self.sender = None;
    }
}
