//! Assignment map: the global PMID -> canonical filename table built from
//! every `.txt` sidecar under the medline directory. A PMID claimed by more
//! than one file (a later baseline update superseding an earlier one)
//! resolves to whichever sidecar is read last in sorted-path order — the
//! same "last write wins" rule the loader uses for in-file duplicates.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::source::xml_name_from_sidecar;

pub struct AssignmentMap {
    owner: FxHashMap<i64, PathBuf>,
}

impl AssignmentMap {
    /// True if `filename` is the canonical owner of `pmid` — the loader only
    /// commits a citation when this holds, so a PMID reprocessed from a
    /// stale or superseded file is skipped rather than double-inserted.
    pub fn owns(&self, pmid: i64, filename: &Path) -> bool {
        self.owner.get(&pmid).map(|p| p.as_path() == filename).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }
}

/// Walk `medline_dir` for `.txt` sidecars (sorted by path, so results are
/// deterministic) and build the PMID -> filename map.
pub fn build(medline_dir: &Path) -> Result<AssignmentMap, Error> {
    let mut sidecars: Vec<PathBuf> = glob::glob(&format!("{}/**/*.txt", medline_dir.display()))
        .map_err(|_| Error::Io {
            file: medline_dir.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad glob pattern"),
        })?
        .filter_map(Result::ok)
        .collect();
    sidecars.sort();

    let mut owner = FxHashMap::default();

    for sidecar in &sidecars {
        let xml_name = xml_name_from_sidecar(sidecar);
        let content = fs::read_to_string(sidecar).map_err(|source| Error::Io {
            file: sidecar.display().to_string(),
            source,
        })?;

        for line in content.lines() {
            if let Some((pmid_str, _version)) = line.split_once(':') {
                if let Ok(pmid) = pmid_str.parse::<i64>() {
                    owner.insert(pmid, xml_name.clone());
                }
            }
        }
    }

    Ok(AssignmentMap { owner })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn later_sidecar_wins_on_conflicting_claims() {
        let dir = tempfile::tempdir().unwrap();

        let mut a = fs::File::create(dir.path().join("a.xml.txt")).unwrap();
        writeln!(a, "100:1").unwrap();
        drop(a);

        let mut b = fs::File::create(dir.path().join("b.xml.txt")).unwrap();
        writeln!(b, "100:2").unwrap();
        drop(b);

        let map = build(dir.path()).unwrap();
        assert!(map.owns(100, &dir.path().join("b.xml")));
        assert!(!map.owns(100, &dir.path().join("a.xml")));
    }

    #[test]
    fn unclaimed_pmid_owns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let map = build(dir.path()).unwrap();
        assert!(!map.owns(999, &dir.path().join("any.xml")));
    }
}
