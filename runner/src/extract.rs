//! Safe extraction of submission archives into a scratch directory.
//!
//! Supports `.zip`, `.tar`, `.tgz` and `.tar.gz`, with a cap on total
//! decompressed size (zip bomb protection) and rejection of archive member
//! paths that would escape the destination (zip slip).

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tar::Archive;
use zip::ZipArchive;

type ExtractError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Extracts the archive at `archive_path` into `destination_dir`, picking
/// the format from the file name.
pub fn extract_archive(
    archive_path: &Path,
    max_uncompressed_size: u64,
    destination_dir: &Path,
) -> Result<(), ExtractError> {
    let file_name = archive_path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or("archive path has no readable file name")?;
    let archive_bytes = fs::read(archive_path)?;

    if file_name.ends_with(".zip") {
        extract_zip(&archive_bytes, max_uncompressed_size, destination_dir)
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
        extract_tgz(&archive_bytes, max_uncompressed_size, destination_dir)
    } else if file_name.ends_with(".tar") {
        extract_tar(&archive_bytes, max_uncompressed_size, destination_dir)
    } else {
        Err(format!("unsupported archive type: {}", file_name).into())
    }
}

fn extract_zip(
    archive_bytes: &[u8],
    max_uncompressed_size: u64,
    destination_dir: &Path,
) -> Result<(), ExtractError> {
    use std::io::Read;

    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut total_uncompressed: u64 = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        let raw_name = file.name();
        if raw_name.contains("..") || raw_name.starts_with('/') || raw_name.contains('\\') {
            return Err(format!("invalid file path in zip: {}", raw_name).into());
        }

        let outpath = destination_dir.join(raw_name);
        if file.name().ends_with('/') {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            // Count bytes as they actually inflate; header-declared sizes
            // can lie. The one-past-budget read detects overflow.
            let budget = max_uncompressed_size.saturating_sub(total_uncompressed) + 1;
            let copied = std::io::copy(&mut (&mut file).take(budget), &mut outfile)?;
            total_uncompressed += copied;
            if total_uncompressed > max_uncompressed_size {
                return Err("decompressed zip size exceeds allowed maximum".into());
            }
        }
    }

    Ok(())
}

fn extract_tar(
    archive_bytes: &[u8],
    max_uncompressed_size: u64,
    destination_dir: &Path,
) -> Result<(), ExtractError> {
    let mut validation = Archive::new(Cursor::new(archive_bytes));
    validate_tar_size(&mut validation, max_uncompressed_size)?;

    let mut archive = Archive::new(Cursor::new(archive_bytes));
    archive.unpack(destination_dir)?;
    Ok(())
}

fn extract_tgz(
    archive_bytes: &[u8],
    max_uncompressed_size: u64,
    destination_dir: &Path,
) -> Result<(), ExtractError> {
    // Size validation needs its own decoder pass; gzip streams don't rewind.
    let mut validation = Archive::new(GzDecoder::new(Cursor::new(archive_bytes)));
    validate_tar_size(&mut validation, max_uncompressed_size)?;

    let mut archive = Archive::new(GzDecoder::new(Cursor::new(archive_bytes)));
    archive.unpack(destination_dir)?;
    Ok(())
}

fn validate_tar_size<R: std::io::Read>(
    archive: &mut Archive<R>,
    max_uncompressed_size: u64,
) -> Result<(), ExtractError> {
    let mut total = 0;
    for entry in archive.entries()? {
        let entry = entry?;
        total += entry.header().size()?;
        if total > max_uncompressed_size {
            return Err("decompressed tar size exceeds allowed maximum".into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            for (name, content) in entries {
                writer
                    .start_file(name.to_string(), SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_extract_zip_contents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.zip");
        fs::write(
            &archive,
            zip_bytes(&[("makefile", "all:\n\ttrue\n"), ("main.c", "int main(){}")]),
        )
        .unwrap();

        let dest = tempfile::tempdir().unwrap();
        extract_archive(&archive, 1024 * 1024, dest.path()).unwrap();
        assert!(dest.path().join("makefile").exists());
        assert!(dest.path().join("main.c").exists());
    }

    #[test]
    fn test_zip_slip_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.zip");
        fs::write(&archive, zip_bytes(&[("../escape.txt", "nope")])).unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(extract_archive(&archive, 1024 * 1024, dest.path()).is_err());
    }

    #[test]
    fn test_size_cap_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.zip");
        let big = "x".repeat(4096);
        fs::write(&archive, zip_bytes(&[("big.txt", &big)])).unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(extract_archive(&archive, 1024, dest.path()).is_err());
    }

    #[test]
    fn test_lying_size_headers_still_capped() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.zip");
        let big = "x".repeat(4096);
        let mut bytes = zip_bytes(&[("big.txt", &big)]);

        // Understate the declared uncompressed size in both the local
        // header and the central directory; the cap must hold anyway,
        // counting what actually inflates.
        let lie = 10u32.to_le_bytes();
        bytes[22..26].copy_from_slice(&lie);
        let cd = bytes
            .windows(4)
            .rposition(|w| w == [0x50, 0x4B, 0x01, 0x02])
            .unwrap();
        bytes[cd + 24..cd + 28].copy_from_slice(&lie);
        fs::write(&archive, bytes).unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(extract_archive(&archive, 1024, dest.path()).is_err());
    }

    #[test]
    fn test_corrupt_archive_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(extract_archive(&archive, 1024 * 1024, dest.path()).is_err());
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("123_A1.rar");
        fs::write(&archive, b"whatever").unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(extract_archive(&archive, 1024 * 1024, dest.path()).is_err());
    }
}
