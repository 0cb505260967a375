//! Writing processed photos to disk, either as loose files or as one
//! compressed tar archive.

use crate::request::ProcessedFile;
use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use tar::{Builder, Header};

pub const ARCHIVE_NAME: &str = "edited_photos.tar.gz";

/// Writes every output into `dir`. Returns the written paths.
pub fn write_files(outputs: &[ProcessedFile], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {} failed", dir.display()))?;

    outputs
        .iter()
        .map(|output| {
            let path = dir.join(&output.name);
            fs::write(&path, &output.bytes)
                .with_context(|| format!("write {} failed", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Packs every output into `dir/edited_photos.tar.gz`.
pub fn write_archive(outputs: &[ProcessedFile], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {} failed", dir.display()))?;

    let path = dir.join(ARCHIVE_NAME);
    let file =
        fs::File::create(&path).with_context(|| format!("create {} failed", path.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    for output in outputs {
        let mut header = Header::new_gnu();
        header.set_size(output.bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        header.set_cksum();

        builder
            .append_data(&mut header, &output.name, output.bytes.as_slice())
            .with_context(|| format!("add {} to archive failed", output.name))?;
    }

    builder.into_inner()?.finish()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tar::Archive;

    fn outputs() -> Vec<ProcessedFile> {
        vec![
            ProcessedFile {
                name: "edited_a.jpg".to_string(),
                bytes: vec![1, 2, 3],
            },
            ProcessedFile {
                name: "edited_b.jpg".to_string(),
                bytes: vec![4, 5],
            },
        ]
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_files(&outputs(), &dir.path().join("out")).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read(&paths[1]).unwrap(), vec![4, 5]);
    }

    #[test]
    fn test_archive_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(&outputs(), dir.path()).unwrap();
        assert!(path.ends_with(ARCHIVE_NAME));

        let mut archive = Archive::new(GzDecoder::new(fs::File::open(&path).unwrap()));
        let mut entries = vec![];
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().display().to_string();
            let mut data = vec![];
            entry.read_to_end(&mut data).unwrap();
            entries.push((name, data));
        }

        assert_eq!(
            entries,
            vec![
                ("edited_a.jpg".to_string(), vec![1, 2, 3]),
                ("edited_b.jpg".to_string(), vec![4, 5]),
            ]
        );
    }
}
