//! Fixed SEG-Y layout: offsets and big-endian field access.
//!
//! ```text
//!  0     3200       3600                 3600 + 240 + 4N
//!  ├──────┼──────────┼──────────┬──────────┼── …
//!  │ text │  binary  │  trace   │ N IBM    │
//!  │      │  header  │  header  │ samples  │
//! ```

/// Textual (card image) header.
pub const TEXT_HEADER_LEN: usize = 3200;
/// Binary file header.
pub const BINARY_HEADER_LEN: usize = 400;
/// Per-trace header.
pub const TRACE_HEADER_LEN: usize = 240;
/// Byte offset of the first trace block.
pub const TRACES_OFFSET: u64 = (TEXT_HEADER_LEN + BINARY_HEADER_LEN) as u64;
/// Size of one encoded sample.
pub const SAMPLE_LEN: usize = 4;

// Binary header offsets (relative to the start of the binary header).
pub const BIN_SAMPLE_INTERVAL: usize = 16;
pub const BIN_SAMPLES_PER_TRACE: usize = 20;
pub const BIN_FORMAT_CODE: usize = 24;

// Trace header offsets.
pub const TRC_SEQUENCE_LINE: usize = 0;
pub const TRC_SEQUENCE_FILE: usize = 4;
pub const TRC_NUM_SAMPLES: usize = 114;
pub const TRC_SAMPLE_INTERVAL: usize = 116;

/// Data sample format code for 4-byte IBM floating point.
pub const FORMAT_IBM_FLOAT: u16 = 1;

pub type BinaryHeader = [u8; BINARY_HEADER_LEN];
pub type TraceHeader = [u8; TRACE_HEADER_LEN];

pub fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

pub fn write_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Bytes occupied by one trace block holding `n_samples` samples.
pub fn trace_block_len(n_samples: usize) -> usize {
    TRACE_HEADER_LEN + n_samples * SAMPLE_LEN
}

/// Card-image text header: 40 lines of 80 ASCII columns.
pub fn text_header_from_lines(lines: &[String]) -> Vec<u8> {
    let mut header = vec![b' '; TEXT_HEADER_LEN];
    for (card, line) in header.chunks_exact_mut(80).zip(lines) {
        let text = line.as_bytes();
        let n = text.len().min(80);
        card[..n].copy_from_slice(&text[..n]);
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_big_endian() {
        let mut hdr = [0u8; BINARY_HEADER_LEN];
        write_u16(&mut hdr, BIN_SAMPLE_INTERVAL, 2000);
        assert_eq!(&hdr[16..18], &[0x07, 0xd0]);
        assert_eq!(read_u16(&hdr, BIN_SAMPLE_INTERVAL), 2000);

        let mut trc = [0u8; TRACE_HEADER_LEN];
        write_u32(&mut trc, TRC_SEQUENCE_LINE, 0x0102_0304);
        assert_eq!(&trc[..4], &[1, 2, 3, 4]);
        assert_eq!(read_u32(&trc, TRC_SEQUENCE_LINE), 0x0102_0304);
    }

    #[test]
    fn text_header_is_padded_cards() {
        let hdr = text_header_from_lines(&["C 1 HELLO".to_string(), "C 2".to_string()]);
        assert_eq!(hdr.len(), TEXT_HEADER_LEN);
        assert_eq!(&hdr[..9], b"C 1 HELLO");
        assert_eq!(&hdr[80..83], b"C 2");
        assert!(hdr[160..].iter().all(|&b| b == b' '));
    }
}
