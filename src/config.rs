/// Configuration for a [`crate::reader::FrameReader`].
///
/// Both fields come from outside this crate: `max_message_size` is an operator
/// policy, and `compress` reflects whether `permessage-deflate` was actually
/// negotiated during the handshake (a collaborator this reader never performs
/// itself).
#[derive(Debug, Clone, Copy)]
pub struct ReaderConfig {
    /// Ceiling, in bytes, for an assembled (and, if compressed, decompressed)
    /// message. `0` disables the check entirely.
    pub max_message_size: u64,
    /// Whether `permessage-deflate` was negotiated; controls whether RSV1 is
    /// a legal bit to see set on a data frame.
    pub compress: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            // 4 MiB: a conservative non-zero ceiling, matching the reader this
            // crate's wire format is modeled on.
            max_message_size: 4 << 20,
            compress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bounded_and_uncompressed() {
        let config = ReaderConfig::default();
        assert!(config.max_message_size > 0);
        assert!(!config.compress);
    }
}
