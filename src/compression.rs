use flate2::{Decompress, FlushDecompress, Status};
use std::io;

/// The 4-byte trailer RFC 7692 says to append to a compressed payload before
/// inflating it, since the sender strips it when compressing.
const DEFLATE_TRAILER: [u8; 4] = [0x00, 0x00, 0xFF, 0xFF];

fn calculate_buffer_size(payload_size: usize) -> usize {
    if payload_size <= 4096 {
        4096
    } else if payload_size <= 65536 {
        16384
    } else {
        65536
    }
}

pub(crate) struct DecompressOutcome {
    pub data: Vec<u8>,
    /// Bytes of compressed input left unconsumed because decompressing them
    /// would have pushed the output past the configured ceiling.
    pub unconsumed: u64,
}

/// A raw-deflate (no zlib header) decompressor for `permessage-deflate`.
///
/// One instance is reused across every compressed message on a connection,
/// since without `no_context_takeover` the LZ77 window persists across
/// messages; resetting it per message is a possible future extension, not
/// implemented here.
pub(crate) struct Decompressor {
    inflate: Decompress,
}

impl Decompressor {
    pub fn new() -> Self {
        Self {
            inflate: Decompress::new(false),
        }
    }

    /// Decompresses `payload` (with the deflate trailer appended), stopping
    /// once the output would exceed `ceiling` bytes (`0` means unbounded).
    pub fn decompress(&mut self, payload: &[u8], ceiling: u64) -> Result<DecompressOutcome, io::Error> {
        let mut input = Vec::with_capacity(payload.len() + DEFLATE_TRAILER.len());
        input.extend_from_slice(payload);
        input.extend_from_slice(&DEFLATE_TRAILER);

        let buffer_size = calculate_buffer_size(input.len());
        let mut decompressed_data = Vec::with_capacity(buffer_size);
        let mut buffer = vec![0u8; buffer_size];

        let before_in = self.inflate.total_in();
        let before_out = self.inflate.total_out();

        loop {
            let produced = self.inflate.total_out() - before_out;
            if ceiling != 0 && produced >= ceiling {
                break;
            }

            let consumed = (self.inflate.total_in() - before_in) as usize;
            if consumed >= input.len() {
                break;
            }

            let before_call = self.inflate.total_out();
            let in_before_call = self.inflate.total_in();
            let status = self
                .inflate
                .decompress(&input[consumed..], &mut buffer, FlushDecompress::Sync)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            let produced_this_call = (self.inflate.total_out() - before_call) as usize;
            decompressed_data.extend_from_slice(&buffer[..produced_this_call]);

            if status == Status::StreamEnd {
                break;
            }
            if produced_this_call == 0 && self.inflate.total_in() == in_before_call {
                // No forward progress possible; avoid spinning on malformed input.
                break;
            }
        }

        let consumed = self.inflate.total_in() - before_in;
        let unconsumed = (input.len() as u64).saturating_sub(consumed);

        Ok(DecompressOutcome {
            data: decompressed_data,
            unconsumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate_raw(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        let mut compressed = encoder.finish().unwrap();
        // Strip the trailing 4-byte empty-block the peer would also strip
        // before sending, mirroring RFC 7692's framing.
        compressed.truncate(compressed.len().saturating_sub(4));
        compressed
    }

    #[test]
    fn roundtrips_small_payload() {
        let mut decompressor = Decompressor::new();
        let compressed = deflate_raw(b"Hello");
        let outcome = decompressor.decompress(&compressed, 0).unwrap();
        assert_eq!(outcome.data, b"Hello");
        assert_eq!(outcome.unconsumed, 0);
    }

    #[test]
    fn context_persists_across_messages() {
        let mut decompressor = Decompressor::new();
        let first = deflate_raw(b"repeated repeated repeated");
        let second = deflate_raw(b"repeated repeated repeated more");
        let first_out = decompressor.decompress(&first, 0).unwrap();
        let second_out = decompressor.decompress(&second, 0).unwrap();
        assert_eq!(first_out.data, b"repeated repeated repeated");
        assert_eq!(second_out.data, b"repeated repeated repeated more");
    }

    #[test]
    fn reports_unconsumed_tail_past_ceiling() {
        let mut decompressor = Decompressor::new();
        let compressed = deflate_raw(&vec![b'a'; 10_000]);
        let outcome = decompressor.decompress(&compressed, 100).unwrap();
        assert!(outcome.unconsumed > 0);
    }
}
