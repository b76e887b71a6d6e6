// src/domjudge/archive.rs

//! Zip packing and unpacking of problem packages.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Result;

/// Pack a directory into a zip archive at `dest`.
///
/// `dest` must not live inside `src`. Entries are added in sorted order so
/// the archive is deterministic.
pub fn zip_dir(src: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_dir(&mut writer, src, Path::new(""), options)?;
    writer.finish()?;
    Ok(())
}

fn add_dir(
    writer: &mut ZipWriter<File>,
    dir: &Path,
    prefix: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        let rel = prefix.join(entry.file_name());
        let name = rel.to_string_lossy().replace('\\', "/");
        if path.is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
            add_dir(writer, &path, &rel, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = File::open(&path)?;
            io::copy(&mut source, writer)?;
        }
    }
    Ok(())
}

/// Extract zip bytes into `dest`, creating it if needed.
pub fn unzip_into(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    std::fs::create_dir_all(dest)?;
    archive.extract(dest)?;
    Ok(())
}
