//! Hand-written Diesel table definitions.
//!
//! Mirrors the data model of the MEDLINE/PubMed relational schema: one
//! `citation` root keyed by `pmid`, every other table a dependent that
//! cascades on delete. Natural-key tables use a composite primary key so
//! `ON CONFLICT` can target it directly; tables with no natural surrogate-free
//! key (comments, grants, people) carry a serial `id`.

diesel::table! {
    xml_file (id) {
        id -> Int4,
        xml_file_name -> Varchar,
        doc_type_name -> Nullable<Varchar>,
        dtd_public_id -> Nullable<Varchar>,
        dtd_system_id -> Nullable<Varchar>,
        time_processed -> Timestamptz,
    }
}

diesel::table! {
    citation (pmid) {
        pmid -> Int8,
        date_created -> Nullable<Date>,
        date_completed -> Nullable<Date>,
        date_revised -> Nullable<Date>,
        number_of_references -> Int4,
        article_title -> Varchar,
        article_affiliation -> Nullable<Varchar>,
        owner -> Nullable<Varchar>,
        status -> Nullable<Varchar>,
        vernacular_title -> Nullable<Varchar>,
        medline_pgn -> Nullable<Varchar>,
        article_author_list_comp_yn -> Nullable<Varchar>,
    }
}

diesel::table! {
    pmid_file_mapping (pmid, id_file) {
        pmid -> Int8,
        id_file -> Int4,
    }
}

diesel::table! {
    journal (pmid) {
        pmid -> Int8,
        issn -> Nullable<Varchar>,
        issn_type -> Nullable<Varchar>,
        volume -> Nullable<Varchar>,
        issue -> Nullable<Varchar>,
        pub_date_year -> Nullable<Int4>,
        pub_date_month -> Nullable<Int4>,
        pub_date_day -> Nullable<Int4>,
        medline_date -> Nullable<Varchar>,
        title -> Nullable<Varchar>,
        iso_abbreviation -> Nullable<Varchar>,
    }
}

diesel::table! {
    journal_info (pmid) {
        pmid -> Int8,
        nlm_unique_id -> Nullable<Varchar>,
        medline_ta -> Varchar,
        country -> Nullable<Varchar>,
    }
}

diesel::table! {
    citation_abstract (pmid) {
        pmid -> Int8,
        abstract_text -> Nullable<Text>,
        copyright_information -> Nullable<Text>,
    }
}

diesel::table! {
    other_abstract (pmid) {
        pmid -> Int8,
        #[sql_name = "other_abstract"]
        other_abstract_text -> Nullable<Text>,
    }
}

diesel::table! {
    chemical (pmid, registry_number, name_of_substance) {
        pmid -> Int8,
        registry_number -> Varchar,
        name_of_substance -> Varchar,
        substance_ui -> Nullable<Varchar>,
    }
}

diesel::table! {
    keyword (pmid, keyword_text) {
        pmid -> Int8,
        #[sql_name = "keyword"]
        keyword_text -> Varchar,
        keyword_major_yn -> Varchar,
    }
}

diesel::table! {
    mesh_heading (pmid, descriptor_name) {
        pmid -> Int8,
        descriptor_name -> Varchar,
        major_yn -> Nullable<Varchar>,
        descriptor_ui -> Nullable<Varchar>,
    }
}

diesel::table! {
    qualifier (pmid, descriptor_name, qualifier_name) {
        pmid -> Int8,
        descriptor_name -> Varchar,
        qualifier_name -> Varchar,
        major_yn -> Nullable<Varchar>,
        qualifier_ui -> Nullable<Varchar>,
    }
}

diesel::table! {
    citation_subset (pmid, citation_subset_value) {
        pmid -> Int8,
        #[sql_name = "citation_subset"]
        citation_subset_value -> Varchar,
    }
}

diesel::table! {
    comment (id) {
        id -> Int4,
        pmid -> Int8,
        ref_type -> Varchar,
        ref_source -> Varchar,
        pmid_version -> Nullable<Int4>,
    }
}

diesel::table! {
    gene_symbol (pmid, gene_symbol_value) {
        pmid -> Int8,
        #[sql_name = "gene_symbol"]
        gene_symbol_value -> Varchar,
    }
}

diesel::table! {
    author (id) {
        id -> Int4,
        pmid -> Int8,
        last_name -> Nullable<Varchar>,
        fore_name -> Nullable<Varchar>,
        initials -> Nullable<Varchar>,
        suffix -> Nullable<Varchar>,
        collective_name -> Nullable<Varchar>,
    }
}

diesel::table! {
    personal_name (id) {
        id -> Int4,
        pmid -> Int8,
        last_name -> Nullable<Varchar>,
        fore_name -> Nullable<Varchar>,
        initials -> Nullable<Varchar>,
        suffix -> Nullable<Varchar>,
    }
}

diesel::table! {
    investigator (id) {
        id -> Int4,
        pmid -> Int8,
        last_name -> Nullable<Varchar>,
        fore_name -> Nullable<Varchar>,
        initials -> Nullable<Varchar>,
        suffix -> Nullable<Varchar>,
        affiliation -> Nullable<Varchar>,
    }
}

diesel::table! {
    space_flight (pmid, space_flight_mission) {
        pmid -> Int8,
        space_flight_mission -> Varchar,
    }
}

diesel::table! {
    note (id) {
        id -> Int4,
        pmid -> Int8,
        general_note -> Text,
        general_note_owner -> Nullable<Varchar>,
    }
}

diesel::table! {
    data_bank (pmid, data_bank_name) {
        pmid -> Int8,
        data_bank_name -> Varchar,
    }
}

diesel::table! {
    accession (pmid, data_bank_name, accession_number) {
        pmid -> Int8,
        data_bank_name -> Varchar,
        accession_number -> Varchar,
    }
}

diesel::table! {
    grant (id) {
        id -> Int4,
        pmid -> Int8,
        grantid -> Nullable<Varchar>,
        acronym -> Nullable<Varchar>,
        agency -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
    }
}

diesel::table! {
    language (pmid, language_value) {
        pmid -> Int8,
        #[sql_name = "language"]
        language_value -> Varchar,
    }
}

diesel::table! {
    publication_type (pmid, publication_type_value) {
        pmid -> Int8,
        #[sql_name = "publication_type"]
        publication_type_value -> Varchar,
    }
}

diesel::table! {
    other_id (pmid, other_id_value) {
        pmid -> Int8,
        #[sql_name = "other_id"]
        other_id_value -> Varchar,
        other_id_source -> Varchar,
    }
}

diesel::table! {
    suppl_mesh_name (pmid, name, ui) {
        pmid -> Int8,
        name -> Varchar,
        ui -> Varchar,
        suppl_mesh_type -> Nullable<Varchar>,
    }
}

diesel::joinable!(pmid_file_mapping -> citation (pmid));
diesel::joinable!(pmid_file_mapping -> xml_file (id_file));
diesel::allow_tables_to_appear_in_same_query!(citation, xml_file, pmid_file_mapping);
