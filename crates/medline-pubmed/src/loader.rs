//! Per-file citation loader: the worker body run once per XML file.
//!
//! Streams the file, and for each citation checks two independent gates
//! before inserting: the assignment map (is this file the canonical owner of
//! this PMID?) and an in-file seen-set (has this PMID already been inserted
//! from *this* file, e.g. a duplicate `PubmedArticle` block?). Both must
//! pass. `XmlFile.xml_file_name` uniqueness is the second idempotence layer:
//! a file already recorded as processed is skipped outright.

use std::path::Path;

use medline_store::Sink;
use medline_store::models::NewXmlFile;
use rustc_hash::FxHashSet;

use crate::assignment::AssignmentMap;
use crate::error::Error;
use crate::parser;
use crate::source::read_xml_text;

#[derive(Debug, Default, Clone, Copy)]
pub struct FileStats {
    pub citations_seen: usize,
    pub citations_inserted: usize,
    pub citations_skipped: usize,
}

/// Load one XML file into the database. Returns `Ok(None)` if the file was
/// already fully processed in a previous run (skipped without reopening it).
pub fn load_file(sink: &Sink, assignment: &AssignmentMap, path: &Path) -> Result<Option<FileStats>, Error> {
    let filename = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    if sink.file_already_processed(&filename)? {
        log::debug!("{filename}: already processed, skipping");
        return Ok(None);
    }

    let label = path.display().to_string();
    let content = read_xml_text(path)?;

    let stream = parser::parse_document(&content, &label)?;

    let mut stats = FileStats::default();
    let mut seen_in_file: FxHashSet<i64> = FxHashSet::default();
    let mut inserted_pmids: Vec<i64> = Vec::new();
    let mut complete = true;

    for citation in stream.citations {
        if medline_core::is_shutdown_requested() {
            log::warn!("{filename}: shutdown requested, aborting mid-file after {} citations", stats.citations_seen);
            complete = false;
            break;
        }

        stats.citations_seen += 1;

        if !assignment.owns(citation.pmid, path) {
            stats.citations_skipped += 1;
            continue;
        }
        if !seen_in_file.insert(citation.pmid) {
            stats.citations_skipped += 1;
            continue;
        }

        if sink.insert_citation(&citation.graph)? {
            stats.citations_inserted += 1;
            inserted_pmids.push(citation.pmid);
        } else {
            stats.citations_skipped += 1;
        }
    }

    if !stream.deleted_pmids.is_empty() {
        log::debug!("{filename}: {} DeleteCitation entries noted (not acted on)", stream.deleted_pmids.len());
    }

    // Only commit the XmlFile row (and its PmidFileMapping rows) once every
    // citation in the file has been attempted. A shutdown mid-file leaves no
    // trace, so a rerun reprocesses the whole file rather than skipping it.
    if complete {
        sink.finalize_xml_file(
            &NewXmlFile {
                xml_file_name: filename.clone(),
                doc_type_name: None,
                dtd_public_id: None,
                dtd_system_id: None,
                time_processed: chrono::Utc::now(),
            },
            &inserted_pmids,
        )?;
    }

    Ok(Some(stats))
}
