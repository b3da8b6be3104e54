//! Row structs inserted by the [`crate::sink::Sink`], and the aggregate
//! [`CitationGraph`] the record builder assembles one of per PMID.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::schema::*;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = xml_file)]
pub struct NewXmlFile {
    pub xml_file_name: String,
    pub doc_type_name: Option<String>,
    pub dtd_public_id: Option<String>,
    pub dtd_system_id: Option<String>,
    pub time_processed: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = xml_file)]
pub struct XmlFile {
    pub id: i32,
    pub xml_file_name: String,
    pub doc_type_name: Option<String>,
    pub dtd_public_id: Option<String>,
    pub dtd_system_id: Option<String>,
    pub time_processed: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = citation)]
pub struct NewCitation {
    pub pmid: i64,
    pub date_created: Option<NaiveDate>,
    pub date_completed: Option<NaiveDate>,
    pub date_revised: Option<NaiveDate>,
    pub number_of_references: i32,
    pub article_title: String,
    pub article_affiliation: Option<String>,
    pub owner: Option<String>,
    pub status: Option<String>,
    pub vernacular_title: Option<String>,
    pub medline_pgn: Option<String>,
    pub article_author_list_comp_yn: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pmid_file_mapping)]
pub struct NewPmidFileMapping {
    pub pmid: i64,
    pub id_file: i32,
}

#[derive(Debug, Clone, Default, Insertable, AsChangeset)]
#[diesel(table_name = journal)]
pub struct NewJournal {
    pub pmid: i64,
    pub issn: Option<String>,
    pub issn_type: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pub_date_year: Option<i32>,
    pub pub_date_month: Option<i32>,
    pub pub_date_day: Option<i32>,
    pub medline_date: Option<String>,
    pub title: Option<String>,
    pub iso_abbreviation: Option<String>,
}

#[derive(Debug, Clone, Default, Insertable, AsChangeset)]
#[diesel(table_name = journal_info)]
pub struct NewJournalInfo {
    pub pmid: i64,
    pub nlm_unique_id: Option<String>,
    pub medline_ta: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Insertable, AsChangeset)]
#[diesel(table_name = citation_abstract)]
pub struct NewAbstract {
    pub pmid: i64,
    pub abstract_text: Option<String>,
    pub copyright_information: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = other_abstract)]
pub struct NewOtherAbstract {
    pub pmid: i64,
    pub other_abstract_text: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chemical)]
pub struct NewChemical {
    pub pmid: i64,
    pub registry_number: String,
    pub name_of_substance: String,
    pub substance_ui: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = keyword)]
pub struct NewKeyword {
    pub pmid: i64,
    pub keyword_text: String,
    pub keyword_major_yn: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mesh_heading)]
pub struct NewMeshHeading {
    pub pmid: i64,
    pub descriptor_name: String,
    pub major_yn: Option<String>,
    pub descriptor_ui: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = qualifier)]
pub struct NewQualifier {
    pub pmid: i64,
    pub descriptor_name: String,
    pub qualifier_name: String,
    pub major_yn: Option<String>,
    pub qualifier_ui: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = citation_subset)]
pub struct NewCitationSubset {
    pub pmid: i64,
    pub citation_subset_value: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comment)]
pub struct NewComment {
    pub pmid: i64,
    pub ref_type: String,
    pub ref_source: String,
    pub pmid_version: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gene_symbol)]
pub struct NewGeneSymbol {
    pub pmid: i64,
    pub gene_symbol_value: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = author)]
pub struct NewAuthor {
    pub pmid: i64,
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    pub suffix: Option<String>,
    pub collective_name: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = personal_name)]
pub struct NewPersonalName {
    pub pmid: i64,
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = investigator)]
pub struct NewInvestigator {
    pub pmid: i64,
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    pub suffix: Option<String>,
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = space_flight)]
pub struct NewSpaceFlight {
    pub pmid: i64,
    pub space_flight_mission: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = note)]
pub struct NewNote {
    pub pmid: i64,
    pub general_note: String,
    pub general_note_owner: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = data_bank)]
pub struct NewDataBank {
    pub pmid: i64,
    pub data_bank_name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accession)]
pub struct NewAccession {
    pub pmid: i64,
    pub data_bank_name: String,
    pub accession_number: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grant)]
pub struct NewGrant {
    pub pmid: i64,
    pub grantid: Option<String>,
    pub acronym: Option<String>,
    pub agency: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = language)]
pub struct NewLanguage {
    pub pmid: i64,
    pub language_value: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = publication_type)]
pub struct NewPublicationType {
    pub pmid: i64,
    pub publication_type_value: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = other_id)]
pub struct NewOtherId {
    pub pmid: i64,
    pub other_id_value: String,
    pub other_id_source: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = suppl_mesh_name)]
pub struct NewSupplMeshName {
    pub pmid: i64,
    pub name: String,
    pub ui: String,
    pub suppl_mesh_type: Option<String>,
}

/// Everything the record builder derives for one citation. Assembled by
/// `medline-pubmed`'s record builder and handed whole to [`crate::sink::Sink::insert_citation`].
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    pub citation: NewCitation,
    pub journal: Option<NewJournal>,
    pub journal_info: Option<NewJournalInfo>,
    pub abstract_: Option<NewAbstract>,
    pub other_abstract: Option<NewOtherAbstract>,
    pub chemicals: Vec<NewChemical>,
    pub keywords: Vec<NewKeyword>,
    pub mesh_headings: Vec<NewMeshHeading>,
    pub qualifiers: Vec<NewQualifier>,
    pub citation_subsets: Vec<NewCitationSubset>,
    pub comments: Vec<NewComment>,
    pub gene_symbols: Vec<NewGeneSymbol>,
    pub authors: Vec<NewAuthor>,
    pub personal_names: Vec<NewPersonalName>,
    pub investigators: Vec<NewInvestigator>,
    pub space_flights: Vec<NewSpaceFlight>,
    pub notes: Vec<NewNote>,
    pub data_banks: Vec<NewDataBank>,
    pub accessions: Vec<NewAccession>,
    pub grants: Vec<NewGrant>,
    pub languages: Vec<NewLanguage>,
    pub publication_types: Vec<NewPublicationType>,
    pub other_ids: Vec<NewOtherId>,
    pub suppl_mesh_names: Vec<NewSupplMeshName>,
}

