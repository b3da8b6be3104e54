//! ID pre-scan: for each XML file, write a `<file>.txt` sidecar listing every
//! `PMID:Version` pair in document order. Sidecars make the assignment map
//! (see [`crate::assignment`]) buildable without re-parsing the XML, and are
//! themselves idempotent — a file whose sidecar already exists is skipped
//! rather than re-scanned.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Error;
use crate::source::{read_xml_text, sidecar_path as sidecar_path_for};

/// Scan one XML file and write its `.txt` sidecar. Skips the file outright if
/// the sidecar already exists. Uses a temp file plus rename so a crash
/// mid-write never leaves a half-written sidecar behind.
pub fn prescan_file(xml_path: &Path) -> Result<usize, Error> {
    let sidecar_path = sidecar_path_for(xml_path);
    if sidecar_path.exists() {
        log::debug!("{}: sidecar already exists, skipping", xml_path.display());
        return Ok(0);
    }

    let label = xml_path.display().to_string();
    let content = read_xml_text(xml_path)?;

    let ids = extract_pmid_versions(&content, &label)?;

    let mut tmp_path = sidecar_path.clone().into_os_string();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let mut tmp = fs::File::create(&tmp_path).map_err(|source| Error::Io { file: label.clone(), source })?;
    for (pmid, version) in &ids {
        writeln!(tmp, "{pmid}:{version}").map_err(|source| Error::Io { file: label.clone(), source })?;
    }
    tmp.sync_all().map_err(|source| Error::Io { file: label.clone(), source })?;
    fs::rename(&tmp_path, &sidecar_path).map_err(|source| Error::Io { file: label.clone(), source })?;

    Ok(ids.len())
}

fn extract_pmid_versions(xml: &str, file_label: &str) -> Result<Vec<(i64, String)>, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();
    let mut in_citation = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e))
                if matches!(e.name().as_ref(), b"MedlineCitation" | b"BookDocument") =>
            {
                in_citation = true;
            }
            Ok(Event::End(e))
                if matches!(e.name().as_ref(), b"MedlineCitation" | b"BookDocument") =>
            {
                in_citation = false;
            }
            Ok(Event::Start(e)) if in_citation && e.name().as_ref() == b"PMID" => {
                let mut version = "1".to_string();
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"Version" {
                        version = String::from_utf8_lossy(&attr.value).into_owned();
                    }
                }
                let text = read_text(&mut reader)
                    .map_err(|source| Error::Xml { file: file_label.to_string(), source })?;
                if let Ok(pmid) = text.trim().parse::<i64>() {
                    ids.push((pmid, version));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => return Err(Error::Xml { file: file_label.to_string(), source }),
        }
        buf.clear();
    }

    Ok(ids)
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn writes_sidecar_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let xml_path = dir.path().join("sample.xml");
        let mut f = fs::File::create(&xml_path).unwrap();
        write!(
            f,
            r#"<PubmedArticleSet>
                <PubmedArticle><MedlineCitation><PMID Version="1">111</PMID></MedlineCitation></PubmedArticle>
                <PubmedArticle><MedlineCitation><PMID Version="2">222</PMID></MedlineCitation></PubmedArticle>
            </PubmedArticleSet>"#
        )
        .unwrap();

        let count = prescan_file(&xml_path).unwrap();
        assert_eq!(count, 2);

        let sidecar = fs::read_to_string(sidecar_path_for(&xml_path)).unwrap();
        assert_eq!(sidecar, "111:1\n222:2\n");
    }

    #[test]
    fn rerun_skips_existing_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let xml_path = dir.path().join("sample.xml");
        fs::write(
            &xml_path,
            r#"<PubmedArticleSet><PubmedArticle><MedlineCitation><PMID Version="3">333</PMID></MedlineCitation></PubmedArticle></PubmedArticleSet>"#,
        )
        .unwrap();

        let first = prescan_file(&xml_path).unwrap();
        assert_eq!(first, 1);

        // Rewriting the file without touching the sidecar should have no effect on rerun.
        fs::write(
            &xml_path,
            r#"<PubmedArticleSet><PubmedArticle><MedlineCitation><PMID Version="9">999</PMID></MedlineCitation></PubmedArticle></PubmedArticleSet>"#,
        )
        .unwrap();
        let second = prescan_file(&xml_path).unwrap();
        assert_eq!(second, 0);

        let sidecar = fs::read_to_string(sidecar_path_for(&xml_path)).unwrap();
        assert_eq!(sidecar, "333:3\n");
    }
}
