//! Deflate stage
//!
//! Tokens are written as zlib-framed deflate streams. On the way back in a
//! gzip container is also accepted, detected by its magic prefix.

use std::io::Read;

use flate2::bufread::GzDecoder;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::DecodeError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compress with zlib framing at `level` (0..=9).
pub(crate) fn deflate(bytes: &[u8], level: u32) -> Vec<u8> {
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(bytes.len() / 2 + 16),
        Compression::new(level.min(9)),
    );
    encoder
        .write_all(bytes)
        .and_then(|_| encoder.finish())
        .expect("in-memory zlib encoding")
}

/// Inflate a zlib or gzip stream, optionally capped at `limit` bytes.
pub(crate) fn inflate(bytes: &[u8], limit: Option<usize>) -> Result<Vec<u8>, DecodeError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        inflate_gzip(bytes, limit)
    } else {
        inflate_zlib(bytes, limit)
    }
}

fn inflate_zlib(bytes: &[u8], limit: Option<usize>) -> Result<Vec<u8>, DecodeError> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(4).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }

        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let consumed = in_before as usize;

        let status = inflater
            .decompress_vec(&bytes[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| DecodeError::CorruptData(e.to_string()))?;

        check_limit(out.len(), limit)?;

        if status == Status::StreamEnd {
            break;
        }

        let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
        if stalled && out.len() < out.capacity() {
            return Err(DecodeError::CorruptData("unexpected end of stream".to_string()));
        }
    }

    if (inflater.total_in() as usize) < bytes.len() {
        return Err(DecodeError::CorruptData(format!(
            "{} trailing bytes after end of stream",
            bytes.len() - inflater.total_in() as usize
        )));
    }

    Ok(out)
}

fn inflate_gzip(bytes: &[u8], limit: Option<usize>) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();

    // One byte past the limit is enough to observe an overflow.
    let read = match limit {
        Some(limit) => (&mut decoder).take(limit as u64 + 1).read_to_end(&mut out),
        None => decoder.read_to_end(&mut out),
    };
    read.map_err(|e| DecodeError::CorruptData(e.to_string()))?;

    check_limit(out.len(), limit)?;

    let trailing = decoder.get_ref().len();
    if trailing > 0 {
        return Err(DecodeError::CorruptData(format!(
            "{} trailing bytes after end of stream",
            trailing
        )));
    }

    Ok(out)
}

fn check_limit(len: usize, limit: Option<usize>) -> Result<(), DecodeError> {
    match limit {
        Some(limit) if len > limit => Err(DecodeError::OutputTooLarge { limit }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlib_header_at_best_level() {
        let compressed = deflate(b"", 9);
        assert_eq!(compressed[0], 0x78);
        assert_eq!(inflate(&compressed, None).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_deflate_inflate_every_level() {
        let input = b"let x = 1;\nlet y = 2;\nlet x = 1;\n".repeat(20);
        for level in 0..=9 {
            let compressed = deflate(&input, level);
            assert_eq!(inflate(&compressed, None).unwrap(), input, "level {}", level);
        }
    }

    #[test]
    fn test_truncated_stream_is_corrupt() {
        let compressed = deflate(&b"abcdefgh".repeat(64), 9);
        let truncated = &compressed[..compressed.len() - 5];
        assert!(matches!(
            inflate(truncated, None),
            Err(DecodeError::CorruptData(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let mut compressed = deflate(b"payload", 9);
        compressed.extend_from_slice(b"junk");
        assert!(matches!(
            inflate(&compressed, None),
            Err(DecodeError::CorruptData(_))
        ));
    }

    #[test]
    fn test_gzip_trailing_bytes_are_corrupt() {
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&[b'T', 0]).unwrap();
        let mut compressed = encoder.finish().unwrap();
        compressed.extend_from_slice(b"junkjunk");

        assert_eq!(
            inflate(&compressed, None),
            Err(DecodeError::CorruptData(
                "8 trailing bytes after end of stream".to_string()
            ))
        );
    }

    #[test]
    fn test_checksum_mismatch_is_corrupt() {
        let mut compressed = deflate(b"checksummed payload", 9);
        let last = compressed.len() - 1;
        compressed[last] ^= 0x01;
        assert!(matches!(
            inflate(&compressed, None),
            Err(DecodeError::CorruptData(_))
        ));
    }

    #[test]
    fn test_gzip_container_accepted() {
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(b"gzipped").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(inflate(&compressed, None).unwrap(), b"gzipped");
    }

    #[test]
    fn test_limit_exceeded() {
        let compressed = deflate(&[0u8; 4096], 9);
        assert_eq!(
            inflate(&compressed, Some(1024)),
            Err(DecodeError::OutputTooLarge { limit: 1024 })
        );
        assert_eq!(inflate(&compressed, Some(4096)).unwrap().len(), 4096);
    }
}
