//! Shared file-naming and transparent-decompression helpers used by the
//! pre-scan, assignment map, and loader so all three agree on what a
//! "sidecar path" and a "canonical XML name" mean.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::Error;

/// Read an `.xml` or `.xml.gz` file to a string, decompressing transparently
/// based on the filename.
pub fn read_xml_text(path: &Path) -> Result<String, Error> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|source| Error::Io { file: label.clone(), source })?;

    let mut text = String::new();
    if is_gzip(path) {
        GzDecoder::new(file)
            .read_to_string(&mut text)
            .map_err(|source| Error::Io { file: label.clone(), source })?;
    } else {
        std::io::BufReader::new(file)
            .read_to_string(&mut text)
            .map_err(|source| Error::Io { file: label.clone(), source })?;
    }
    Ok(text)
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Sidecar path for an XML file: the full filename with `.txt` appended,
/// e.g. `A.xml.gz` -> `A.xml.gz.txt`.
pub fn sidecar_path(xml_path: &Path) -> PathBuf {
    let mut s = xml_path.as_os_str().to_owned();
    s.push(".txt");
    PathBuf::from(s)
}

/// Inverse of [`sidecar_path`]: the canonical XML filename a sidecar
/// describes.
pub fn xml_name_from_sidecar(sidecar: &Path) -> PathBuf {
    let s = sidecar.as_os_str().to_string_lossy();
    PathBuf::from(s.strip_suffix(".txt").unwrap_or(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_appends_not_replaces() {
        let p = Path::new("A.xml.gz");
        assert_eq!(sidecar_path(p), PathBuf::from("A.xml.gz.txt"));
        assert_eq!(xml_name_from_sidecar(&sidecar_path(p)), p);
    }

    #[test]
    fn plain_xml_roundtrips() {
        let p = Path::new("B.xml");
        assert_eq!(sidecar_path(p), PathBuf::from("B.xml.txt"));
        assert_eq!(xml_name_from_sidecar(&sidecar_path(p)), p);
    }
}
