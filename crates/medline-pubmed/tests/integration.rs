//! Integration tests for medline-pubmed: a full small MEDLINE XML document
//! through `parser::parse_document`, checking the relational graph it builds
//! rather than any single tag handler in isolation.

const SAMPLE_SET: &str = r#"<?xml version="1.0"?>
<PubmedArticleSet>
<PubmedArticle>
  <MedlineCitation Status="MEDLINE" Owner="NLM">
    <PMID Version="1">111222</PMID>
    <DateCompleted><Year>2025</Year><Month>03</Month><Day>14</Day></DateCompleted>
    <DateRevised><Year>2025</Year><Month>03</Month><Day>20</Day></DateRevised>
    <Article PubModel="Print-Electronic">
      <Journal>
        <ISSN IssnType="Electronic">1234-5678</ISSN>
        <JournalIssue CitedMedium="Internet">
          <Volume>42</Volume>
          <Issue>7</Issue>
          <PubDate><Year>2025</Year><Mon>Mar</Mon><Day>1</Day></PubDate>
        </JournalIssue>
        <Title>Journal of Testing</Title>
        <ISOAbbreviation>J Test</ISOAbbreviation>
      </Journal>
      <ArticleTitle>A study of streaming parsers.</ArticleTitle>
      <Pagination><MedlinePgn>100-110</MedlinePgn></Pagination>
      <Abstract>
        <AbstractText Label="BACKGROUND" NlmCategory="BACKGROUND">Parsers are useful.</AbstractText>
        <AbstractText Label="RESULTS" NlmCategory="RESULTS">They work well.</AbstractText>
      </Abstract>
      <AuthorList CompleteYN="Y">
        <Author ValidYN="Y">
          <LastName>Smith</LastName>
          <ForeName>Jane</ForeName>
          <Initials>J</Initials>
        </Author>
      </AuthorList>
      <Language>eng</Language>
      <PublicationTypeList>
        <PublicationType UI="D016428">Journal Article</PublicationType>
      </PublicationTypeList>
    </Article>
    <MedlineJournalInfo>
      <NlmUniqueID>1234567</NlmUniqueID>
      <Country>United States</Country>
      <MedlineTA>J Test</MedlineTA>
    </MedlineJournalInfo>
    <ChemicalList>
      <Chemical>
        <RegistryNumber>0</RegistryNumber>
        <NameOfSubstance UI="D000001">Water</NameOfSubstance>
      </Chemical>
    </ChemicalList>
    <MeshHeadingList>
      <MeshHeading>
        <DescriptorName UI="D000002" MajorTopicYN="Y">Parsing</DescriptorName>
        <QualifierName UI="D000003" MajorTopicYN="N">methods</QualifierName>
      </MeshHeading>
    </MeshHeadingList>
    <KeywordList Owner="NOTNLM">
      <Keyword MajorTopicYN="N">xml</Keyword>
      <Keyword MajorTopicYN="N">xml</Keyword>
    </KeywordList>
    <CitationSubset>IM</CitationSubset>
    <GeneSymbolList>
      <GeneSymbol>BRCA1</GeneSymbol>
    </GeneSymbolList>
    <DataBankList>
      <DataBank>
        <DataBankName>GenBank</DataBankName>
        <AccessionNumberList>
          <AccessionNumber>AB123</AccessionNumber>
          <AccessionNumber>AB123</AccessionNumber>
        </AccessionNumberList>
      </DataBank>
    </DataBankList>
  </MedlineCitation>
  <PubmedData>
    <History>
    </History>
  </PubmedData>
</PubmedArticle>
<PubmedArticle>
  <MedlineCitation Status="MEDLINE" Owner="NLM">
    <PMID Version="2">333444</PMID>
    <Article PubModel="Print">
      <Journal>
        <Title>Other Journal</Title>
        <ISOAbbreviation>Other J</ISOAbbreviation>
      </Journal>
      <ArticleTitle>Second citation with one abstract segment.</ArticleTitle>
      <Abstract>
        <AbstractText>Just one paragraph, no label.</AbstractText>
      </Abstract>
    </Article>
    <MedlineJournalInfo>
      <MedlineTA>Other J</MedlineTA>
    </MedlineJournalInfo>
  </MedlineCitation>
</PubmedArticle>
<DeleteCitation>
  <PMID Version="1">999888</PMID>
</DeleteCitation>
</PubmedArticleSet>"#;

#[test]
fn parses_full_document_into_relational_graph() {
    let result = medline_pubmed::parser::parse_document(SAMPLE_SET, "sample.xml")
        .expect("well-formed document should parse");

    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.deleted_pmids, vec![999888]);

    let first = &result.citations[0];
    assert_eq!(first.pmid, 111222);
    assert_eq!(first.version, "1");
    assert_eq!(first.graph.citation.pmid, 111222);
    assert_eq!(first.graph.citation.article_title, "A study of streaming parsers.");
    assert_eq!(first.graph.citation.medline_pgn.as_deref(), Some("100-110"));

    let journal = first.graph.journal.as_ref().expect("journal present");
    assert_eq!(journal.pmid, 111222);
    assert_eq!(journal.title.as_deref(), Some("Journal of Testing"));
    assert_eq!(journal.volume.as_deref(), Some("42"));

    let journal_info = first.graph.journal_info.as_ref().expect("journal info present");
    assert_eq!(journal_info.medline_ta, "J Test");

    let abstract_ = first.graph.abstract_.as_ref().expect("abstract present");
    let text = abstract_.abstract_text.as_ref().expect("abstract text");
    assert!(text.contains("BACKGROUND:\nParsers are useful."));
    assert!(text.contains("RESULTS:\nThey work well."));

    assert_eq!(first.graph.authors.len(), 1);
    assert_eq!(first.graph.authors[0].last_name.as_deref(), Some("Smith"));
    assert_eq!(first.graph.authors[0].pmid, 111222);

    assert_eq!(first.graph.chemicals.len(), 1);
    assert_eq!(first.graph.chemicals[0].name_of_substance, "Water");

    assert_eq!(first.graph.mesh_headings.len(), 1);
    assert_eq!(first.graph.mesh_headings[0].descriptor_name, "Parsing");
    assert_eq!(first.graph.qualifiers.len(), 1);
    assert_eq!(first.graph.qualifiers[0].qualifier_name, "methods");

    // Duplicate keyword text is deduplicated within the citation.
    assert_eq!(first.graph.keywords.len(), 1);
    assert_eq!(first.graph.keywords[0].keyword_text, "xml");

    assert_eq!(first.graph.citation_subsets.len(), 1);
    assert_eq!(first.graph.citation_subsets[0].citation_subset_value, "IM");

    assert_eq!(first.graph.gene_symbols.len(), 1);
    assert_eq!(first.graph.gene_symbols[0].gene_symbol_value, "BRCA1");

    // Duplicate accession number is deduplicated by (data_bank_name, accession_number).
    assert_eq!(first.graph.data_banks.len(), 1);
    assert_eq!(first.graph.accessions.len(), 1);
    assert_eq!(first.graph.accessions[0].accession_number, "AB123");

    assert_eq!(first.graph.languages.len(), 1);
    assert_eq!(first.graph.languages[0].language_value, "eng");
    assert_eq!(first.graph.publication_types.len(), 1);
    assert_eq!(first.graph.publication_types[0].publication_type_value, "Journal Article");

    let second = &result.citations[1];
    assert_eq!(second.pmid, 333444);
    let abstract2 = second.graph.abstract_.as_ref().expect("abstract present");
    assert_eq!(abstract2.abstract_text.as_deref(), Some("Just one paragraph, no label."));
}

#[test]
fn rejects_mismatched_tags() {
    let bad = "<PubmedArticleSet><PubmedArticle><MedlineCitation></PubmedArticle></PubmedArticleSet>";
    let result = medline_pubmed::parser::parse_document(bad, "broken.xml");
    assert!(result.is_err());
}

