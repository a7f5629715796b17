//! Reading bundled database snapshots.
//!
//! Snapshots ship either as a plain SQLite file or gzip-compressed. The
//! format is sniffed from the first bytes rather than the file name, so a
//! renamed asset still decodes.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// gzip member header (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Uncompressed SQLite database
    Plain,
    /// gzip-compressed SQLite database
    Gzip,
}

/// Open a snapshot and return a reader yielding the uncompressed database.
pub fn open_snapshot(path: &Path) -> io::Result<(SnapshotFormat, Box<dyn Read>)> {
    let mut reader = BufReader::new(File::open(path)?);
    let format = if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        SnapshotFormat::Gzip
    } else {
        SnapshotFormat::Plain
    };

    tracing::debug!(path = %path.display(), ?format, "Opened database snapshot");

    let reader: Box<dyn Read> = match format {
        SnapshotFormat::Gzip => Box::new(MultiGzDecoder::new(reader)),
        SnapshotFormat::Plain => Box::new(reader),
    };
    Ok((format, reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_plain_snapshot_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.sqlite");
        std::fs::write(&path, b"SQLite format 3\0rest").unwrap();

        let (format, mut reader) = open_snapshot(&path).unwrap();
        assert_eq!(format, SnapshotFormat::Plain);

        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"SQLite format 3\0rest");
    }

    #[test]
    fn test_gzip_detected_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.bin");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello snapshot").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let (format, mut reader) = open_snapshot(&path).unwrap();
        assert_eq!(format, SnapshotFormat::Gzip);

        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello snapshot");
    }

    #[test]
    fn test_multi_member_gzip_is_read_to_the_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.sqlite.gz");

        let mut compressed = Vec::new();
        for part in [&b"first member, "[..], &b"second member"[..]] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(part).unwrap();
            compressed.extend(encoder.finish().unwrap());
        }
        std::fs::write(&path, &compressed).unwrap();

        let (format, mut reader) = open_snapshot(&path).unwrap();
        assert_eq!(format, SnapshotFormat::Gzip);

        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "first member, second member");
    }

    #[test]
    fn test_truncated_gzip_fails_on_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.sqlite.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[7u8; 10_000]).unwrap();
        let compressed = encoder.finish().unwrap();
        std::fs::write(&path, &compressed[..compressed.len() / 2]).unwrap();

        let (_, mut reader) = open_snapshot(&path).unwrap();
        let mut content = Vec::new();
        assert!(reader.read_to_end(&mut content).is_err());
    }

    #[test]
    fn test_missing_snapshot() {
        let result = open_snapshot(Path::new("/nonexistent/geodata.sqlite.gz"));
        assert_eq!(result.err().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    }
}
