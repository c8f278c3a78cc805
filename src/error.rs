use thiserror::Error;

/// Close codes a WebSocket endpoint may send in a close frame.
///
/// Only the codes this reader can itself provoke are represented here; codes a
/// peer sends back to us are validated against [`ALLOWED_CLOSE_CODES`] rather
/// than parsed into this enum, since `[3000, 65535]` is an open, user-assigned
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum WSCloseCode {
    Normal = 1000,
    GoingAway = 1001,
    ProtocolError = 1002,
    UnsupportedData = 1003,
    InvalidFramePayloadData = 1007,
    PolicyViolation = 1008,
    MessageTooBig = 1009,
    MandatoryExtension = 1010,
    InternalError = 1011,
    ServiceRestart = 1012,
    TryAgainLater = 1013,
    BadGateway = 1014,
    TlsHandshakeFailed = 1015,
}

impl WSCloseCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// The IANA-registered close codes, i.e. the codes a peer is allowed to use in
/// the `[0, 2999]` range. Codes `>= 3000` are user-assigned and pass through
/// unvalidated.
pub const ALLOWED_CLOSE_CODES: [u16; 13] = [
    1000, 1001, 1002, 1003, 1007, 1008, 1009, 1010, 1011, 1012, 1013, 1014, 1015,
];

pub fn is_close_code_allowed(code: u16) -> bool {
    code >= 3000 || ALLOWED_CLOSE_CODES.contains(&code)
}

/// A single fatal protocol error. Once raised from `feed_data`, it latches the
/// reader: no further messages are ever delivered to the sink.
#[derive(Error, Debug)]
pub enum WebSocketError {
    #[error("{message}")]
    Protocol { message: String },

    #[error("Message size {size} exceeds limit {limit}")]
    MessageTooBig { size: u64, limit: u64 },

    #[error("Invalid UTF-8 text message")]
    InvalidText {
        #[from]
        source: std::string::FromUtf8Error,
    },

    #[error("decompression failed: {source}")]
    Decompression {
        #[from]
        source: std::io::Error,
    },
}

impl WebSocketError {
    pub fn protocol(message: impl Into<String>) -> Self {
        WebSocketError::Protocol {
            message: message.into(),
        }
    }

    /// The close code an outer transport should use when closing the
    /// connection on account of this error.
    pub fn close_code(&self) -> WSCloseCode {
        match self {
            WebSocketError::Protocol { .. } => WSCloseCode::ProtocolError,
            WebSocketError::MessageTooBig { .. } => WSCloseCode::MessageTooBig,
            WebSocketError::InvalidText { .. } => WSCloseCode::InvalidFramePayloadData,
            // A corrupt deflate stream is a protocol violation, not a size one.
            WebSocketError::Decompression { .. } => WSCloseCode::ProtocolError,
        }
    }
}
