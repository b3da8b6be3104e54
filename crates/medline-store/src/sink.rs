//! Transactional per-citation writer.
//!
//! Each call to [`Sink::insert_citation`] opens one transaction, inserts the
//! citation root and every dependent in FK-safe order, and commits. A
//! unique- or foreign-key violation rolls back just that citation; the caller
//! (the citation loader) continues with the next record.
//!
//! The `XmlFile` row is *not* part of any citation's transaction: the caller
//! holds it in memory for the whole file and only calls
//! [`Sink::finalize_xml_file`] once every citation has been attempted, so a
//! crash mid-file leaves no `XmlFile` row behind and [`Sink::file_already_processed`]
//! correctly reports the file as not yet done on restart.

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::error::Error;
use crate::models::*;
use crate::pool::PgPool;
use crate::schema::*;

pub struct Sink {
    pool: PgPool,
}

impl Sink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// True if `filename` already has an `XmlFile` row — the file has been
    /// fully processed in a previous run.
    pub fn file_already_processed(&self, filename: &str) -> Result<bool, Error> {
        let mut conn = self.pool.get()?;
        let count: i64 = xml_file::table
            .filter(xml_file::xml_file_name.eq(filename))
            .count()
            .get_result(&mut conn)?;
        Ok(count > 0)
    }

    /// Commit the `XmlFile` row once every citation in the file has been
    /// attempted, along with a `PmidFileMapping` row for each PMID the file
    /// actually owned and inserted. Called last, not first, so a crash
    /// earlier in the file never leaves a committed `XmlFile` row with
    /// missing citations behind.
    pub fn finalize_xml_file(&self, new_file: &NewXmlFile, pmids: &[i64]) -> Result<i32, Error> {
        let mut conn = self.pool.get()?;
        conn.transaction(|conn| {
            let id: i32 = diesel::insert_into(xml_file::table)
                .values(new_file)
                .returning(xml_file::id)
                .get_result(conn)?;

            if !pmids.is_empty() {
                let mappings: Vec<NewPmidFileMapping> = pmids
                    .iter()
                    .map(|&pmid| NewPmidFileMapping { pmid, id_file: id })
                    .collect();
                diesel::insert_into(pmid_file_mapping::table)
                    .values(&mappings)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }

            Ok::<i32, diesel::result::Error>(id)
        })
        .map_err(Error::from)
    }

    /// Insert one citation's full object graph inside a single transaction.
    /// On a row conflict, rolls back and returns `Ok(false)`; the caller logs
    /// and moves on. Unexpected database errors propagate as `Err` and are
    /// treated as file-level fatal by the caller. Does not touch `XmlFile`/
    /// `PmidFileMapping` — the caller links this PMID to its file via
    /// [`Sink::finalize_xml_file`] once the whole file is done.
    pub fn insert_citation(&self, graph: &CitationGraph) -> Result<bool, Error> {
        let mut conn = self.pool.get()?;
        let pmid = graph.citation.pmid;

        let result = conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::insert_into(citation::table)
                .values(&graph.citation)
                .on_conflict(citation::pmid)
                .do_nothing()
                .execute(conn)?;

            if let Some(j) = &graph.journal {
                diesel::insert_into(journal::table)
                    .values(j)
                    .on_conflict(journal::pmid)
                    .do_update()
                    .set(j)
                    .execute(conn)?;
            }
            if let Some(ji) = &graph.journal_info {
                diesel::insert_into(journal_info::table)
                    .values(ji)
                    .on_conflict(journal_info::pmid)
                    .do_update()
                    .set(ji)
                    .execute(conn)?;
            }
            if let Some(a) = &graph.abstract_ {
                diesel::insert_into(citation_abstract::table)
                    .values(a)
                    .on_conflict(citation_abstract::pmid)
                    .do_update()
                    .set(a)
                    .execute(conn)?;
            }
            if let Some(oa) = &graph.other_abstract {
                diesel::insert_into(other_abstract::table)
                    .values(oa)
                    .on_conflict(other_abstract::pmid)
                    .do_update()
                    .set((
                        other_abstract::other_abstract_text.eq(excluded(other_abstract::other_abstract_text)),
                    ))
                    .execute(conn)?;
            }

            if !graph.chemicals.is_empty() {
                diesel::insert_into(chemical::table)
                    .values(&graph.chemicals)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.keywords.is_empty() {
                diesel::insert_into(keyword::table)
                    .values(&graph.keywords)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.mesh_headings.is_empty() {
                diesel::insert_into(mesh_heading::table)
                    .values(&graph.mesh_headings)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.qualifiers.is_empty() {
                diesel::insert_into(qualifier::table)
                    .values(&graph.qualifiers)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.citation_subsets.is_empty() {
                diesel::insert_into(citation_subset::table)
                    .values(&graph.citation_subsets)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.comments.is_empty() {
                diesel::insert_into(comment::table)
                    .values(&graph.comments)
                    .execute(conn)?;
            }
            if !graph.gene_symbols.is_empty() {
                diesel::insert_into(gene_symbol::table)
                    .values(&graph.gene_symbols)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.authors.is_empty() {
                diesel::insert_into(author::table)
                    .values(&graph.authors)
                    .execute(conn)?;
            }
            if !graph.personal_names.is_empty() {
                diesel::insert_into(personal_name::table)
                    .values(&graph.personal_names)
                    .execute(conn)?;
            }
            if !graph.investigators.is_empty() {
                diesel::insert_into(investigator::table)
                    .values(&graph.investigators)
                    .execute(conn)?;
            }
            if !graph.space_flights.is_empty() {
                diesel::insert_into(space_flight::table)
                    .values(&graph.space_flights)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.notes.is_empty() {
                diesel::insert_into(note::table)
                    .values(&graph.notes)
                    .execute(conn)?;
            }
            if !graph.data_banks.is_empty() {
                diesel::insert_into(data_bank::table)
                    .values(&graph.data_banks)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.accessions.is_empty() {
                diesel::insert_into(accession::table)
                    .values(&graph.accessions)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.grants.is_empty() {
                diesel::insert_into(grant::table)
                    .values(&graph.grants)
                    .execute(conn)?;
            }
            if !graph.languages.is_empty() {
                diesel::insert_into(language::table)
                    .values(&graph.languages)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.publication_types.is_empty() {
                diesel::insert_into(publication_type::table)
                    .values(&graph.publication_types)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.other_ids.is_empty() {
                diesel::insert_into(other_id::table)
                    .values(&graph.other_ids)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            if !graph.suppl_mesh_names.is_empty() {
                diesel::insert_into(suppl_mesh_name::table)
                    .values(&graph.suppl_mesh_names)
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }

            Ok(())
        });

        match result {
            Ok(()) => Ok(true),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation
                | diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => {
                log::warn!("pmid {pmid}: row conflict, skipped: {}", info.message());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
