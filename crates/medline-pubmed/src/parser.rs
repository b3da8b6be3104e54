//! Streaming XML-to-relational record builder.
//!
//! Consumes one `MedlineCitation`/`BookDocument` subtree at a time and
//! assembles the full [`CitationGraph`] for that PMID. Tag dispatch is a
//! `match` on the element's local name — the portable equivalent of a
//! dispatch table, built once per call and not reconstructed per tag.

use medline_store::models::*;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::coerce;
use crate::error::Error;

/// One parsed citation plus its version string, as it appears in a
/// `PMID Version="N"` attribute.
pub struct ParsedCitation {
    pub pmid: i64,
    pub version: String,
    pub graph: CitationGraph,
}

/// Result of streaming one XML file: every citation found, in document
/// order, plus any `DeleteCitation` PMIDs (recorded but not acted on — see
/// design notes on replace-on-revision).
#[derive(Default)]
pub struct StreamResult {
    pub citations: Vec<ParsedCitation>,
    pub deleted_pmids: Vec<i64>,
}

/// Stream a whole PubMed XML document and build every citation in it.
pub fn parse_document(xml: &str, file_label: &str) -> Result<StreamResult, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut result = StreamResult::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e))
                if e.name().as_ref() == b"PubmedArticle" || e.name().as_ref() == b"BookDocument" =>
            {
                match parse_citation(&mut reader, e.name().as_ref()) {
                    Ok(citation) => result.citations.push(citation),
                    Err(err) => log::warn!("{file_label}: skipping malformed citation: {err}"),
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"DeleteCitation" => {
                parse_delete_citation(&mut reader, &mut result.deleted_pmids)
                    .map_err(|source| Error::Xml { file: file_label.to_string(), source })?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => return Err(Error::Xml { file: file_label.to_string(), source }),
        }
        buf.clear();
    }

    Ok(result)
}

fn parse_delete_citation(
    reader: &mut Reader<&[u8]>,
    deleted: &mut Vec<i64>,
) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PMID" => {
                if let Ok(pmid) = read_text(reader)?.trim().parse() {
                    deleted.push(pmid);
                }
            }
            Event::End(e) if e.name().as_ref() == b"DeleteCitation" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn parse_citation(
    reader: &mut Reader<&[u8]>,
    root_tag: &[u8],
) -> Result<ParsedCitation, quick_xml::Error> {
    let mut graph = CitationGraph::default();
    let mut pmid = 0i64;
    let mut version = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MedlineCitation" | b"BookDocument" => {
                    let (owner, status) = citation_attrs(&e);
                    graph.citation.owner = owner;
                    graph.citation.status = status;
                    parse_inner_citation(reader, &mut graph, &mut pmid, &mut version)?;
                }
                b"PubmedData" | b"PubmedBookData" => parse_pubmed_data(reader, &mut graph)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == root_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    graph.citation.pmid = pmid;
    backfill_pmid(&mut graph, pmid);
    Ok(ParsedCitation { pmid, version, graph })
}

fn citation_attrs(e: &BytesStart) -> (Option<String>, Option<String>) {
    let mut owner = None;
    let mut status = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"Owner" => owner = Some(lossy(&attr.value)),
            b"Status" => status = Some(lossy(&attr.value)),
            _ => {}
        }
    }
    (owner, status)
}

fn parse_inner_citation(
    reader: &mut Reader<&[u8]>,
    graph: &mut CitationGraph,
    pmid: &mut i64,
    version: &mut String,
) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut mesh_seen: Vec<String> = Vec::new();
    let mut keyword_seen: Vec<String> = Vec::new();
    let mut databank_seen: Vec<String> = Vec::new();
    let mut accession_seen: Vec<(String, String)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"Version" {
                            *version = lossy(&attr.value);
                        }
                    }
                    let text = read_text(reader)?;
                    *pmid = text.trim().parse().unwrap_or(0);
                }
                b"DateCreated" => graph.citation.date_created = read_date(reader)?,
                b"DateCompleted" => graph.citation.date_completed = read_date(reader)?,
                b"DateRevised" => graph.citation.date_revised = read_date(reader)?,
                b"NumberOfReferences" => {
                    graph.citation.number_of_references = read_text(reader)?.trim().parse().unwrap_or(0);
                }
                b"Article" | b"Book" => parse_article(reader, graph, e.name().as_ref())?,
                b"MedlineJournalInfo" => parse_journal_info(reader, graph)?,
                b"ChemicalList" => graph.chemicals = parse_chemical_list(reader)?,
                b"MeshHeadingList" => {
                    let (headings, qualifiers) = parse_mesh_list(reader)?;
                    for h in headings {
                        if !mesh_seen.contains(&h.descriptor_name) {
                            mesh_seen.push(h.descriptor_name.clone());
                            graph.mesh_headings.push(h);
                        }
                    }
                    graph.qualifiers = qualifiers;
                }
                b"KeywordList" => {
                    for kw in parse_keyword_list(reader)? {
                        if !keyword_seen.contains(&kw.keyword_text) {
                            keyword_seen.push(kw.keyword_text.clone());
                            graph.keywords.push(kw);
                        }
                    }
                }
                b"PersonalNameSubjectList" => graph.personal_names = parse_person_list(reader, b"PersonalNameSubjectList", b"PersonalNameSubject")?,
                b"InvestigatorList" => graph.investigators = parse_investigator_list(reader)?,
                b"GeneSymbolList" => graph.gene_symbols = parse_gene_symbol_list(reader)?,
                b"CommentsCorrectionsList" => graph.comments = parse_comments_list(reader)?,
                b"CitationSubset" => {
                    let text = coerce::truncate_ellipsis(&read_text(reader)?, 500);
                    if !text.is_empty() {
                        graph.citation_subsets.push(NewCitationSubset { pmid: 0, citation_subset_value: text });
                    }
                }
                b"GrantList" => graph.grants = parse_grant_list(reader)?,
                b"DataBankList" => {
                    let (banks, accessions) = parse_databank_list(reader)?;
                    for b in banks {
                        if !databank_seen.contains(&b.data_bank_name) {
                            databank_seen.push(b.data_bank_name.clone());
                            graph.data_banks.push(b);
                        }
                    }
                    for a in accessions {
                        let key = (a.data_bank_name.clone(), a.accession_number.clone());
                        if !accession_seen.contains(&key) {
                            accession_seen.push(key);
                            graph.accessions.push(a);
                        }
                    }
                }
                b"SupplMeshList" => graph.suppl_mesh_names = parse_suppl_mesh_list(reader)?,
                b"SpaceFlightMission" => {
                    let text = read_text(reader)?;
                    if !text.is_empty() {
                        graph.space_flights.push(NewSpaceFlight { pmid: 0, space_flight_mission: text });
                    }
                }
                b"GeneralNote" => {
                    let owner = attr_value(&e, b"Owner");
                    let text = read_text(reader)?;
                    graph.notes.push(NewNote { pmid: 0, general_note: text, general_note_owner: owner });
                }
                b"OtherID" => {
                    let source = attr_value(&e, b"Source").unwrap_or_default();
                    let text = read_text(reader)?;
                    graph.other_ids.push(NewOtherId {
                        pmid: 0,
                        other_id_value: coerce::truncate_ellipsis(&text, 80),
                        other_id_source: coerce::truncate_ellipsis(&source, 10),
                    });
                }
                b"OtherAbstract" => {
                    let text = parse_abstract_text(reader, b"OtherAbstract")?;
                    graph.other_abstract = Some(NewOtherAbstract { pmid: 0, other_abstract_text: Some(text) });
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"MedlineCitation" || e.name().as_ref() == b"BookDocument" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article(
    reader: &mut Reader<&[u8]>,
    graph: &mut CitationGraph,
    end_tag: &[u8],
) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut pub_type_seen: Vec<String> = Vec::new();
    let mut journal = NewJournal::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Journal" => parse_journal(reader, &mut journal)?,
                b"ArticleTitle" | b"BookTitle" => {
                    let text = read_text_content(reader, e.name().as_ref())?;
                    graph.citation.article_title = if text.trim().is_empty() {
                        "No title".to_string()
                    } else {
                        coerce::truncate_ellipsis(text.trim(), 4000)
                    };
                }
                b"VernacularTitle" => graph.citation.vernacular_title = Some(read_text(reader)?),
                b"Abstract" => {
                    let (text, copyright) = parse_abstract(reader)?;
                    graph.abstract_ = Some(NewAbstract { pmid: 0, abstract_text: Some(text), copyright_information: copyright });
                }
                b"Pagination" => graph.citation.medline_pgn = parse_pagination(reader)?,
                b"AuthorList" => {
                    graph.citation.article_author_list_comp_yn = attr_value(&e, b"CompleteYN");
                    graph.authors = parse_author_list(reader)?;
                }
                b"Affiliation" => graph.citation.article_affiliation = Some(read_text(reader)?),
                b"Language" => graph.languages.push(NewLanguage { pmid: 0, language_value: coerce::truncate_ellipsis(&read_text(reader)?, 50) }),
                b"PublicationTypeList" => {
                    for pt in parse_pub_type_list(reader)? {
                        if !pub_type_seen.contains(&pt) {
                            pub_type_seen.push(pt.clone());
                            graph.publication_types.push(NewPublicationType { pmid: 0, publication_type_value: pt });
                        }
                    }
                }
                b"ArticleDate" => {
                    let (y, m, d) = read_date_parts(reader, b"ArticleDate")?;
                    journal.pub_date_year = y;
                    journal.pub_date_month = m;
                    journal.pub_date_day = d;
                }
                b"ELocationID" => { let _ = read_text(reader)?; }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !journal_is_empty(&journal) {
        graph.journal = Some(journal);
    }

    if graph.citation.article_title.is_empty() {
        graph.citation.article_title = "No title".to_string();
    }

    Ok(())
}

fn journal_is_empty(j: &NewJournal) -> bool {
    j.issn.is_none()
        && j.volume.is_none()
        && j.issue.is_none()
        && j.pub_date_year.is_none()
        && j.medline_date.is_none()
        && j.title.is_none()
        && j.iso_abbreviation.is_none()
}

fn parse_journal(reader: &mut Reader<&[u8]>, journal: &mut NewJournal) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"ISSN" => {
                    journal.issn_type = attr_value(&e, b"IssnType");
                    journal.issn = Some(read_text(reader)?);
                }
                b"Title" => journal.title = Some(coerce::truncate_ellipsis(&read_text(reader)?, 500)),
                b"ISOAbbreviation" => journal.iso_abbreviation = Some(read_text(reader)?),
                b"JournalIssue" => parse_journal_issue(reader, journal)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Journal" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_journal_issue(reader: &mut Reader<&[u8]>, journal: &mut NewJournal) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut saw_year = false;
    let mut medline_date = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Volume" => journal.volume = Some(read_text(reader)?),
                b"Issue" => journal.issue = Some(read_text(reader)?),
                b"PubDate" => {
                    let mut pbuf = Vec::new();
                    loop {
                        match reader.read_event_into(&mut pbuf)? {
                            Event::Start(pe) => match pe.name().as_ref() {
                                b"Year" => {
                                    journal.pub_date_year = read_text(reader)?.trim().parse().ok();
                                    saw_year = journal.pub_date_year.is_some();
                                }
                                b"Month" => journal.pub_date_month = coerce::parse_month(&read_text(reader)?).map(|m| m as i32),
                                b"Day" => journal.pub_date_day = read_text(reader)?.trim().parse().ok(),
                                b"MedlineDate" => {
                                    let text = read_text(reader)?;
                                    medline_date = Some(coerce::truncate_ellipsis(&text, 40));
                                }
                                _ => {}
                            },
                            Event::End(pe) if pe.name().as_ref() == b"PubDate" => break,
                            Event::Eof => break,
                            _ => {}
                        }
                        pbuf.clear();
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"JournalIssue" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(md) = medline_date {
        if !saw_year {
            journal.pub_date_year = coerce::parse_year_fallback(&md);
        }
        journal.medline_date = Some(md);
    }

    Ok(())
}

fn parse_journal_info(reader: &mut Reader<&[u8]>, graph: &mut CitationGraph) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut info = NewJournalInfo::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"NlmUniqueID" => info.nlm_unique_id = Some(read_text(reader)?),
                b"MedlineTA" => {
                    let text = read_text(reader)?;
                    info.medline_ta = if text.trim().is_empty() { "unknown".to_string() } else { text };
                }
                b"Country" => info.country = Some(read_text(reader)?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"MedlineJournalInfo" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if info.medline_ta.is_empty() {
        info.medline_ta = "unknown".to_string();
    }
    graph.journal_info = Some(info);
    Ok(())
}

/// Abstract assembly per the one non-trivial text rule: a single
/// `AbstractText` child is verbatim; multiple children are concatenated with
/// label prefixes derived from their attributes.
fn parse_abstract(reader: &mut Reader<&[u8]>) -> Result<(String, Option<String>), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut segments: Vec<(Vec<(String, String)>, String)> = Vec::new();
    let mut copyright = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"AbstractText" => {
                let attrs: Vec<(String, String)> = e
                    .attributes()
                    .flatten()
                    .map(|a| (lossy(a.key.as_ref()), lossy(&a.value)))
                    .collect();
                let text = read_text_content(reader, b"AbstractText")?;
                segments.push((attrs, text));
            }
            Event::Start(e) if e.name().as_ref() == b"CopyrightInformation" => {
                copyright = Some(read_text(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"Abstract" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let text = assemble_abstract(&segments);
    Ok((text, copyright))
}

fn assemble_abstract(segments: &[(Vec<(String, String)>, String)]) -> String {
    if segments.len() == 1 {
        return segments[0].1.clone();
    }

    let mut out = String::new();
    for (attrs, text) in segments {
        if text.is_empty() {
            continue;
        }
        match attrs.len() {
            0 => {
                out.push_str(text);
                out.push('\n');
            }
            1 if attrs[0].1 == "UNLABELLED" => {
                out.push_str(text);
                out.push('\n');
            }
            1 => {
                out.push_str(&attrs[0].1);
                out.push_str(":\n");
                out.push_str(text);
                out.push('\n');
            }
            _ => {
                // Two attributes (Label + NlmCategory): the second one labels the segment.
                out.push_str(&attrs[1].1);
                out.push_str(":\n");
                out.push_str(text);
                out.push('\n');
            }
        }
    }
    out
}

fn parse_abstract_text(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<String, quick_xml::Error> {
    read_text_content(reader, end_tag)
}

fn parse_pagination(reader: &mut Reader<&[u8]>) -> Result<Option<String>, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut pagination = None;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"MedlinePgn" => {
                pagination = Some(read_text(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"Pagination" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(pagination)
}

fn parse_author_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewAuthor>, quick_xml::Error> {
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Author" => {
                authors.push(parse_author(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(authors)
}

fn parse_author(reader: &mut Reader<&[u8]>) -> Result<NewAuthor, quick_xml::Error> {
    let mut a = NewAuthor { pmid: 0, last_name: None, fore_name: None, initials: None, suffix: None, collective_name: None };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => a.last_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 300)),
                b"ForeName" => a.fore_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 100)),
                b"Initials" => a.initials = Some(coerce::truncate_ellipsis(&read_text(reader)?, 10)),
                b"Suffix" => a.suffix = Some(coerce::truncate_ellipsis(&read_text(reader)?, 20)),
                b"CollectiveName" => a.collective_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 2700)),
                b"AffiliationInfo" => {
                    skip_element(reader, b"AffiliationInfo")?;
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(a)
}

fn parse_person_list(
    reader: &mut Reader<&[u8]>,
    end_tag: &[u8],
    person_tag: &[u8],
) -> Result<Vec<NewPersonalName>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == person_tag => {
                out.push(parse_person(reader, person_tag)?);
            }
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_person(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<NewPersonalName, quick_xml::Error> {
    let mut p = NewPersonalName { pmid: 0, last_name: None, fore_name: None, initials: None, suffix: None };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => p.last_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 300)),
                b"ForeName" => p.fore_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 100)),
                b"Initials" => p.initials = Some(coerce::truncate_ellipsis(&read_text(reader)?, 10)),
                b"Suffix" => p.suffix = Some(coerce::truncate_ellipsis(&read_text(reader)?, 20)),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(p)
}

fn parse_investigator_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewInvestigator>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Investigator" => {
                out.push(parse_investigator(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"InvestigatorList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_investigator(reader: &mut Reader<&[u8]>) -> Result<NewInvestigator, quick_xml::Error> {
    let mut inv = NewInvestigator { pmid: 0, last_name: None, fore_name: None, initials: None, suffix: None, affiliation: None };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => inv.last_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 300)),
                b"ForeName" => inv.fore_name = Some(coerce::truncate_ellipsis(&read_text(reader)?, 100)),
                b"Initials" => inv.initials = Some(coerce::truncate_ellipsis(&read_text(reader)?, 10)),
                b"Suffix" => inv.suffix = Some(coerce::truncate_ellipsis(&read_text(reader)?, 20)),
                b"AffiliationInfo" => {
                    let mut ibuf = Vec::new();
                    loop {
                        match reader.read_event_into(&mut ibuf)? {
                            Event::Start(ie) if ie.name().as_ref() == b"Affiliation" => {
                                inv.affiliation = Some(coerce::truncate_ellipsis(&read_text(reader)?, 2000));
                            }
                            Event::End(ie) if ie.name().as_ref() == b"AffiliationInfo" => break,
                            Event::Eof => break,
                            _ => {}
                        }
                        ibuf.clear();
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Investigator" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(inv)
}

fn parse_gene_symbol_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewGeneSymbol>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();
    let mut seen = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"GeneSymbol" => {
                let text = coerce::truncate_ellipsis(&read_text(reader)?, 40);
                if !seen.contains(&text) {
                    seen.push(text.clone());
                    out.push(NewGeneSymbol { pmid: 0, gene_symbol_value: text });
                }
            }
            Event::End(e) if e.name().as_ref() == b"GeneSymbolList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_comments_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewComment>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"CommentsCorrections" => {
                let ref_type = attr_value(&e, b"RefType").unwrap_or_default();
                let mut ref_source = None;
                let mut pmid_version = None;
                let mut cbuf = Vec::new();
                loop {
                    match reader.read_event_into(&mut cbuf)? {
                        Event::Start(ce) => match ce.name().as_ref() {
                            b"RefSource" => ref_source = Some(read_text(reader)?),
                            b"PMID" => {
                                for attr in ce.attributes().flatten() {
                                    if attr.key.as_ref() == b"Version" {
                                        pmid_version = lossy(&attr.value).parse().ok();
                                    }
                                }
                                let _ = read_text(reader)?;
                            }
                            _ => {}
                        },
                        Event::End(ce) if ce.name().as_ref() == b"CommentsCorrections" => break,
                        Event::Eof => break,
                        _ => {}
                    }
                    cbuf.clear();
                }
                out.push(NewComment {
                    pmid: 0,
                    ref_type: coerce::truncate_ellipsis(&ref_type, 21),
                    ref_source: ref_source.unwrap_or_else(|| "No reference source".to_string()),
                    pmid_version,
                });
            }
            Event::End(e) if e.name().as_ref() == b"CommentsCorrectionsList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_chemical_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewChemical>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Chemical" => {
                out.push(parse_chemical(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"ChemicalList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_chemical(reader: &mut Reader<&[u8]>) -> Result<NewChemical, quick_xml::Error> {
    let mut registry_number = String::new();
    let mut name = String::new();
    let mut ui = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"RegistryNumber" => registry_number = read_text(reader)?,
                b"NameOfSubstance" => {
                    ui = attr_value(&e, b"UI");
                    name = read_text(reader)?;
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Chemical" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(NewChemical { pmid: 0, registry_number, name_of_substance: name, substance_ui: ui })
}

fn parse_mesh_list(reader: &mut Reader<&[u8]>) -> Result<(Vec<NewMeshHeading>, Vec<NewQualifier>), quick_xml::Error> {
    let mut headings = Vec::new();
    let mut qualifiers = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"MeshHeading" => {
                let (h, qs) = parse_mesh_heading(reader)?;
                qualifiers.extend(qs);
                headings.push(h);
            }
            Event::End(e) if e.name().as_ref() == b"MeshHeadingList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((headings, qualifiers))
}

fn parse_mesh_heading(reader: &mut Reader<&[u8]>) -> Result<(NewMeshHeading, Vec<NewQualifier>), quick_xml::Error> {
    let mut heading = NewMeshHeading { pmid: 0, descriptor_name: String::new(), major_yn: None, descriptor_ui: None };
    let mut qualifiers = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"DescriptorName" => {
                    heading.descriptor_ui = attr_value(&e, b"UI");
                    heading.major_yn = attr_value(&e, b"MajorTopicYN");
                    heading.descriptor_name = coerce::truncate_ellipsis(&read_text(reader)?, 500);
                }
                b"QualifierName" => {
                    let ui = attr_value(&e, b"UI");
                    let major = attr_value(&e, b"MajorTopicYN");
                    let name = coerce::truncate_ellipsis(&read_text(reader)?, 500);
                    qualifiers.push(NewQualifier {
                        pmid: 0,
                        descriptor_name: heading.descriptor_name.clone(),
                        qualifier_name: name,
                        major_yn: major,
                        qualifier_ui: ui,
                    });
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"MeshHeading" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((heading, qualifiers))
}

fn parse_keyword_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewKeyword>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Keyword" => {
                let major = attr_value(&e, b"MajorTopicYN").unwrap_or_else(|| "N".to_string());
                let text = coerce::truncate_ellipsis(&read_text(reader)?, 500);
                out.push(NewKeyword { pmid: 0, keyword_text: text, keyword_major_yn: major });
            }
            Event::End(e) if e.name().as_ref() == b"KeywordList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_grant_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewGrant>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Grant" => {
                out.push(parse_grant(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"GrantList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_grant(reader: &mut Reader<&[u8]>) -> Result<NewGrant, quick_xml::Error> {
    let mut g = NewGrant { pmid: 0, grantid: None, acronym: None, agency: None, country: None };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"GrantID" => g.grantid = Some(coerce::truncate_ellipsis(&read_text(reader)?, 200)),
                b"Acronym" => g.acronym = Some(coerce::truncate_ellipsis(&read_text(reader)?, 20)),
                b"Agency" => g.agency = Some(coerce::truncate_ellipsis(&read_text(reader)?, 200)),
                b"Country" => g.country = Some(coerce::truncate_ellipsis(&read_text(reader)?, 200)),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Grant" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(g)
}

fn parse_pub_type_list(reader: &mut Reader<&[u8]>) -> Result<Vec<String>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PublicationType" => {
                out.push(read_text(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"PublicationTypeList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_databank_list(reader: &mut Reader<&[u8]>) -> Result<(Vec<NewDataBank>, Vec<NewAccession>), quick_xml::Error> {
    let mut banks = Vec::new();
    let mut accessions = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"DataBank" => {
                let (bank, accs) = parse_databank(reader)?;
                accessions.extend(accs);
                banks.push(bank);
            }
            Event::End(e) if e.name().as_ref() == b"DataBankList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((banks, accessions))
}

/// Each accession carries the name of the `DataBank` it lexically appears
/// under — not the name of whichever `DataBank` was parsed last.
fn parse_databank(reader: &mut Reader<&[u8]>) -> Result<(NewDataBank, Vec<NewAccession>), quick_xml::Error> {
    let mut name = String::new();
    let mut accessions = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"DataBankName" => name = coerce::truncate_ellipsis(&read_text(reader)?, 300),
                b"AccessionNumberList" => {
                    let mut abuf = Vec::new();
                    loop {
                        match reader.read_event_into(&mut abuf)? {
                            Event::Start(ae) if ae.name().as_ref() == b"AccessionNumber" => {
                                let acc = coerce::truncate_ellipsis(&read_text(reader)?, 200);
                                accessions.push(NewAccession { pmid: 0, data_bank_name: name.clone(), accession_number: acc });
                            }
                            Event::End(ae) if ae.name().as_ref() == b"AccessionNumberList" => break,
                            Event::Eof => break,
                            _ => {}
                        }
                        abuf.clear();
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"DataBank" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let accessions: Vec<NewAccession> = accessions
        .into_iter()
        .map(|mut a| {
            a.data_bank_name = name.clone();
            a
        })
        .collect();

    // Within-record accession dedup by (data_bank_name, accession_number).
    let mut seen = Vec::new();
    let mut deduped = Vec::new();
    for a in accessions {
        let key = (a.data_bank_name.clone(), a.accession_number.clone());
        if !seen.contains(&key) {
            seen.push(key);
            deduped.push(a);
        }
    }

    Ok((NewDataBank { pmid: 0, data_bank_name: name }, deduped))
}

fn parse_suppl_mesh_list(reader: &mut Reader<&[u8]>) -> Result<Vec<NewSupplMeshName>, quick_xml::Error> {
    let mut out = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"SupplMeshName" => {
                let ui = attr_value(&e, b"UI").unwrap_or_default();
                let ty = attr_value(&e, b"Type");
                let name = coerce::truncate_ellipsis(&read_text(reader)?, 80);
                out.push(NewSupplMeshName { pmid: 0, name, ui, suppl_mesh_type: ty });
            }
            Event::End(e) if e.name().as_ref() == b"SupplMeshList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn parse_pubmed_data(reader: &mut Reader<&[u8]>, _graph: &mut CitationGraph) -> Result<(), quick_xml::Error> {
    skip_element(reader, b"PubmedData")
        .or_else(|_| skip_element(reader, b"PubmedBookData"))
}

type DateParts = (Option<i32>, Option<i32>, Option<i32>);

fn read_date_parts(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<DateParts, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut year = None;
    let mut month = None;
    let mut day = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => year = read_text(reader)?.trim().parse().ok(),
                b"Month" => month = coerce::parse_month(&read_text(reader)?).map(|m| m as i32),
                b"Day" => day = read_text(reader)?.trim().parse().ok(),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((year, month, day))
}

fn read_date(reader: &mut Reader<&[u8]>) -> Result<Option<chrono::NaiveDate>, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut year = None;
    let mut month = None;
    let mut day = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => year = Some(read_text(reader)?),
                b"Month" => month = Some(read_text(reader)?),
                b"Day" => day = Some(read_text(reader)?),
                _ => {}
            },
            Event::End(e)
                if matches!(e.name().as_ref(), b"DateCreated" | b"DateCompleted" | b"DateRevised") =>
            {
                break;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(coerce::parse_date(year.as_deref(), month.as_deref(), day.as_deref()))
}

fn skip_element(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<(), quick_xml::Error> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::Start(_) => text.push_str(&read_text(reader)?),
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn read_text_content(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<String, quick_xml::Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == end_tag {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Every child row is built with `pmid: 0` since the PMID isn't known until
/// the whole citation subtree is consumed — fill it in once, here.
fn backfill_pmid(graph: &mut CitationGraph, pmid: i64) {
    if let Some(j) = &mut graph.journal {
        j.pmid = pmid;
    }
    if let Some(ji) = &mut graph.journal_info {
        ji.pmid = pmid;
    }
    if let Some(a) = &mut graph.abstract_ {
        a.pmid = pmid;
    }
    if let Some(oa) = &mut graph.other_abstract {
        oa.pmid = pmid;
    }
    for c in &mut graph.chemicals {
        c.pmid = pmid;
    }
    for k in &mut graph.keywords {
        k.pmid = pmid;
    }
    for m in &mut graph.mesh_headings {
        m.pmid = pmid;
    }
    for q in &mut graph.qualifiers {
        q.pmid = pmid;
    }
    for c in &mut graph.citation_subsets {
        c.pmid = pmid;
    }
    for c in &mut graph.comments {
        c.pmid = pmid;
    }
    for g in &mut graph.gene_symbols {
        g.pmid = pmid;
    }
    for a in &mut graph.authors {
        a.pmid = pmid;
    }
    for p in &mut graph.personal_names {
        p.pmid = pmid;
    }
    for i in &mut graph.investigators {
        i.pmid = pmid;
    }
    for s in &mut graph.space_flights {
        s.pmid = pmid;
    }
    for n in &mut graph.notes {
        n.pmid = pmid;
    }
    for d in &mut graph.data_banks {
        d.pmid = pmid;
    }
    for a in &mut graph.accessions {
        a.pmid = pmid;
    }
    for g in &mut graph.grants {
        g.pmid = pmid;
    }
    for l in &mut graph.languages {
        l.pmid = pmid;
    }
    for p in &mut graph.publication_types {
        p.pmid = pmid;
    }
    for o in &mut graph.other_ids {
        o.pmid = pmid;
    }
    for s in &mut graph.suppl_mesh_names {
        s.pmid = pmid;
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| lossy(&a.value))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
