//! Field extraction from PubMed efetch documents.

use chrono::{Month, NaiveDate};

use crate::models::PaperRecord;
use crate::sources::SourceError;
use crate::utils::{classify_affiliation, extract_email, strip_emails, XmlElement};

/// One author as it appears in the `AuthorList`
#[derive(Debug, Clone, PartialEq, Eq)]
struct AuthorEntry {
    name: Option<String>,
    affiliations: Vec<String>,
}

/// Parse an efetch response and extract the record for its first entry.
///
/// Journal articles (`PubmedArticle`) and book or chapter records
/// (`PubmedBookArticle`, e.g. GeneReviews) both yield a record. Only a document
/// holding neither, such as an empty `PubmedArticleSet`, is a parse error.
///
/// `requested_id` is used as the identifier when the document carries no PMID.
pub fn parse_fetch_response(xml: &str, requested_id: &str) -> Result<PaperRecord, SourceError> {
    let root = XmlElement::parse(xml)?;

    if let Some(article) = entry(&root, "PubmedArticle") {
        return Ok(article_record(article, requested_id));
    }
    if let Some(book) = entry(&root, "PubmedBookArticle") {
        return Ok(book_record(book, requested_id));
    }

    Err(SourceError::Parse(format!(
        "no PubmedArticle or PubmedBookArticle in response for {}",
        requested_id
    )))
}

/// The root itself when it has `name`, else its first child called `name`
fn entry<'a>(root: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    if root.name == name {
        Some(root)
    } else {
        root.child(name)
    }
}

fn article_record(pubmed_article: &XmlElement, requested_id: &str) -> PaperRecord {
    let citation = pubmed_article.child("MedlineCitation");
    let article = citation.and_then(|c| c.child("Article"));

    let pubmed_id = citation
        .and_then(|c| c.child_text("PMID"))
        .unwrap_or_else(|| requested_id.to_string());

    let title = article
        .and_then(|a| a.child_text("ArticleTitle").or_else(|| a.child_text("VernacularTitle")))
        .unwrap_or_default();

    let publication_date = article.map(publication_date).unwrap_or_default();
    let authors = article.map(author_entries).unwrap_or_default();

    build_record(pubmed_id, title, publication_date, &authors)
}

fn book_record(book_article: &XmlElement, requested_id: &str) -> PaperRecord {
    let document = book_article.child("BookDocument");
    let book = document.and_then(|d| d.child("Book"));

    let pubmed_id = document
        .and_then(|d| d.child_text("PMID"))
        .unwrap_or_else(|| requested_id.to_string());

    // Chapters carry their own ArticleTitle; whole books only have a BookTitle
    let title = document
        .and_then(|d| d.child_text("ArticleTitle").or_else(|| d.child_text("BookTitle")))
        .or_else(|| book.and_then(|b| b.child_text("BookTitle")))
        .unwrap_or_default();

    let publication_date = book
        .and_then(|b| b.child("PubDate"))
        .and_then(|date| format_date(date).or_else(|| date.child_text("MedlineDate")))
        .or_else(|| document.and_then(|d| d.child("ContributionDate")).and_then(format_date))
        .unwrap_or_default();

    // BookDocument/AuthorList holds the chapter authors, Book/AuthorList the editors
    let authors = document.map(author_entries).unwrap_or_default();

    build_record(pubmed_id, title, publication_date, &authors)
}

fn build_record(
    pubmed_id: String,
    title: String,
    publication_date: String,
    authors: &[AuthorEntry],
) -> PaperRecord {
    let mut non_academic_authors: Vec<String> = Vec::new();
    let mut company_affiliations: Vec<String> = Vec::new();

    for author in authors {
        let companies: Vec<String> = author
            .affiliations
            .iter()
            .filter(|affiliation| classify_affiliation(affiliation).is_company())
            .map(|affiliation| strip_emails(affiliation))
            .filter(|affiliation| !affiliation.is_empty())
            .collect();

        if companies.is_empty() {
            continue;
        }

        if let Some(name) = &author.name {
            push_unique(&mut non_academic_authors, name.clone());
        }
        for company in companies {
            push_unique(&mut company_affiliations, company);
        }
    }

    let corresponding_author_email = authors
        .iter()
        .flat_map(|author| author.affiliations.iter())
        .find_map(|affiliation| extract_email(affiliation));

    PaperRecord {
        pubmed_id,
        title,
        publication_date,
        non_academic_authors,
        company_affiliations,
        corresponding_author_email,
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn author_entries(parent: &XmlElement) -> Vec<AuthorEntry> {
    let Some(list) = parent.child("AuthorList") else {
        return Vec::new();
    };

    // ValidYN="N" marks names withdrawn by an erratum
    list.children("Author")
        .filter(|author| author.attr("ValidYN") != Some("N"))
        .map(|author| AuthorEntry {
            name: author_name(author),
            affiliations: author_affiliations(author),
        })
        .collect()
}

fn author_name(author: &XmlElement) -> Option<String> {
    if let Some(collective) = author.child_text("CollectiveName") {
        return Some(collective);
    }

    let last = author.child_text("LastName")?;
    let first = author
        .child_text("ForeName")
        .or_else(|| author.child_text("Initials"));

    Some(match first {
        Some(first) => format!("{} {}", first, last),
        None => last,
    })
}

fn author_affiliations(author: &XmlElement) -> Vec<String> {
    // Older records put a bare <Affiliation> directly under <Author>
    author
        .children("AffiliationInfo")
        .filter_map(|info| info.child_text("Affiliation"))
        .chain(author.child_text("Affiliation"))
        .collect()
}

/// Journal issue date, falling back to MedlineDate and then the electronic ArticleDate
fn publication_date(article: &XmlElement) -> String {
    if let Some(pub_date) = article.path(&["Journal", "JournalIssue", "PubDate"]) {
        if let Some(date) = format_date(pub_date) {
            return date;
        }
        if let Some(medline) = pub_date.child_text("MedlineDate") {
            return medline;
        }
    }

    article
        .children("ArticleDate")
        .find_map(format_date)
        .unwrap_or_default()
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, depending on which parts are present and valid
fn format_date(date: &XmlElement) -> Option<String> {
    let year: i32 = date.child_text("Year")?.parse().ok()?;

    let Some(month) = date.child_text("Month").and_then(|m| parse_month(&m)) else {
        return Some(format!("{:04}", year));
    };

    let day = date
        .child_text("Day")
        .and_then(|d| d.parse::<u32>().ok())
        .and_then(|day| NaiveDate::from_ymd_opt(year, month, day));

    Some(match day {
        Some(full) => full.format("%Y-%m-%d").to_string(),
        None => format!("{:04}-{:02}", year, month),
    })
}

fn parse_month(month: &str) -> Option<u32> {
    if let Ok(number) = month.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    month
        .parse::<Month>()
        .ok()
        .map(|m| m.number_from_month())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">111</PMID>
      <Article PubModel="Print-Electronic">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2024</Year><Month>Mar</Month><Day>15</Day></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>PD-1 blockade in <i>KRAS</i>-mutant tumours.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Doe</LastName><ForeName>Jane</ForeName><Initials>J</Initials>
            <AffiliationInfo>
              <Affiliation>Pfizer Inc., New York, NY, USA. Electronic address: jane.doe@pfizer.com.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Smith</LastName><ForeName>Alan</ForeName>
            <AffiliationInfo>
              <Affiliation>Department of Oncology, Stanford University, Stanford, CA, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Roe</LastName><Initials>R</Initials>
            <AffiliationInfo>
              <Affiliation>Harvard Medical School, Boston, MA, USA.</Affiliation>
            </AffiliationInfo>
            <AffiliationInfo>
              <Affiliation>Pfizer Inc., New York, NY, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_extracts_all_fields() {
        let record = parse_fetch_response(ARTICLE_XML, "111").unwrap();

        assert_eq!(record.pubmed_id, "111");
        assert_eq!(record.title, "PD-1 blockade in KRAS-mutant tumours.");
        assert_eq!(record.publication_date, "2024-03-15");
        assert_eq!(record.non_academic_authors, vec!["Jane Doe", "R Roe"]);
        assert_eq!(
            record.company_affiliations,
            vec!["Pfizer Inc., New York, NY, USA"]
        );
        assert_eq!(
            record.corresponding_author_email,
            Some("jane.doe@pfizer.com".to_string())
        );
    }

    #[test]
    fn test_academic_only_paper() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
            <PMID>222</PMID>
            <Article>
              <Journal><JournalIssue><PubDate><MedlineDate>2019 Nov-Dec</MedlineDate></PubDate></JournalIssue></Journal>
              <ArticleTitle>Academic work</ArticleTitle>
              <AuthorList><Author><LastName>Lee</LastName><ForeName>Min</ForeName>
                <AffiliationInfo><Affiliation>Seoul National University, Korea.</Affiliation></AffiliationInfo>
              </Author></AuthorList>
            </Article>
        </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let record = parse_fetch_response(xml, "222").unwrap();
        assert_eq!(record.publication_date, "2019 Nov-Dec");
        assert!(record.non_academic_authors.is_empty());
        assert!(record.company_affiliations.is_empty());
        assert_eq!(record.corresponding_author_email, None);
    }

    #[test]
    fn test_missing_pmid_falls_back_to_requested_id() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
            <Article><ArticleTitle>No id</ArticleTitle></Article>
        </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let record = parse_fetch_response(xml, "333").unwrap();
        assert_eq!(record.pubmed_id, "333");
        assert_eq!(record.title, "No id");
        assert_eq!(record.publication_date, "");
    }

    #[test]
    fn test_no_article_is_parse_error() {
        let xml = "<PubmedArticleSet></PubmedArticleSet>";
        assert!(matches!(
            parse_fetch_response(xml, "444"),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        assert!(parse_fetch_response("<PubmedArticleSet><PubmedArticle>", "555").is_err());
    }

    #[test]
    fn test_collective_name_and_legacy_affiliation() {
        let xml = r#"<PubmedArticle><MedlineCitation><PMID>666</PMID><Article>
            <ArticleTitle>Consortium study</ArticleTitle>
            <AuthorList>
              <Author><CollectiveName>Moderna Study Group</CollectiveName>
                <Affiliation>Moderna, Inc., Cambridge, MA</Affiliation>
              </Author>
            </AuthorList>
        </Article></MedlineCitation></PubmedArticle>"#;

        let record = parse_fetch_response(xml, "666").unwrap();
        assert_eq!(record.non_academic_authors, vec!["Moderna Study Group"]);
        assert_eq!(record.company_affiliations, vec!["Moderna, Inc., Cambridge, MA"]);
    }

    const BOOK_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedBookArticle>
    <BookDocument>
      <PMID Version="1">20301295</PMID>
      <ArticleIdList><ArticleId IdType="bookaccession">NBK1116</ArticleId></ArticleIdList>
      <Book>
        <Publisher><PublisherName>University of Washington, Seattle</PublisherName></Publisher>
        <BookTitle book="gene">GeneReviews</BookTitle>
        <PubDate><Year>1993</Year></PubDate>
        <AuthorList Type="editors">
          <Author><LastName>Adam</LastName><ForeName>Margaret P</ForeName></Author>
        </AuthorList>
      </Book>
      <ArticleTitle book="gene" part="cf">Cystic Fibrosis</ArticleTitle>
      <AuthorList Type="authors">
        <Author ValidYN="Y">
          <LastName>Ong</LastName><ForeName>Thida</ForeName>
          <AffiliationInfo><Affiliation>Seattle Children's Hospital, Seattle, WA.</Affiliation></AffiliationInfo>
        </Author>
        <Author ValidYN="Y">
          <LastName>Kim</LastName><ForeName>Paul</ForeName>
          <AffiliationInfo><Affiliation>Vertex Pharmaceuticals Inc., Boston, MA. pkim@vrtx.com</Affiliation></AffiliationInfo>
        </Author>
      </AuthorList>
      <ContributionDate><Year>2001</Year><Month>03</Month><Day>26</Day></ContributionDate>
    </BookDocument>
  </PubmedBookArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_book_chapter_yields_record() {
        let record = parse_fetch_response(BOOK_XML, "20301295").unwrap();

        assert_eq!(record.pubmed_id, "20301295");
        assert_eq!(record.title, "Cystic Fibrosis");
        assert_eq!(record.publication_date, "1993");
        // Editors under Book/AuthorList are not chapter authors
        assert_eq!(record.non_academic_authors, vec!["Paul Kim"]);
        assert_eq!(
            record.company_affiliations,
            vec!["Vertex Pharmaceuticals Inc., Boston, MA"]
        );
        assert_eq!(record.corresponding_author_email, Some("pkim@vrtx.com".to_string()));
    }

    #[test]
    fn test_whole_book_uses_book_title_and_contribution_date() {
        let xml = r#"<PubmedBookArticle><BookDocument>
            <Book><BookTitle>Assay Guidance Manual</BookTitle></Book>
            <ContributionDate><Year>2012</Year><Month>05</Month><Day>01</Day></ContributionDate>
        </BookDocument></PubmedBookArticle>"#;

        let record = parse_fetch_response(xml, "22553861").unwrap();
        assert_eq!(record.pubmed_id, "22553861");
        assert_eq!(record.title, "Assay Guidance Manual");
        assert_eq!(record.publication_date, "2012-05-01");
        assert!(record.non_academic_authors.is_empty());
    }

    #[test]
    fn test_invalid_author_entries_are_skipped() {
        let xml = r#"<PubmedArticle><MedlineCitation><PMID>777</PMID><Article>
            <ArticleTitle>Corrected author list</ArticleTitle>
            <AuthorList>
              <Author ValidYN="N"><LastName>Wrong</LastName><ForeName>Name</ForeName>
                <AffiliationInfo><Affiliation>Novartis AG, Basel, Switzerland.</Affiliation></AffiliationInfo>
              </Author>
              <Author ValidYN="Y"><LastName>Right</LastName><ForeName>Name</ForeName>
                <AffiliationInfo><Affiliation>Novartis AG, Basel, Switzerland.</Affiliation></AffiliationInfo>
              </Author>
            </AuthorList>
        </Article></MedlineCitation></PubmedArticle>"#;

        let record = parse_fetch_response(xml, "777").unwrap();
        assert_eq!(record.non_academic_authors, vec!["Name Right"]);
    }

    fn date(xml: &str) -> Option<String> {
        format_date(&XmlElement::parse(xml).unwrap())
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            date("<PubDate><Year>2023</Year><Month>07</Month><Day>4</Day></PubDate>"),
            Some("2023-07-04".to_string())
        );
        assert_eq!(
            date("<PubDate><Year>2023</Year><Month>December</Month></PubDate>"),
            Some("2023-12".to_string())
        );
        assert_eq!(
            date("<PubDate><Year>2023</Year></PubDate>"),
            Some("2023".to_string())
        );
        // Feb 30 is not a date, keep year and month
        assert_eq!(
            date("<PubDate><Year>2023</Year><Month>Feb</Month><Day>30</Day></PubDate>"),
            Some("2023-02".to_string())
        );
        assert_eq!(date("<PubDate><MedlineDate>Spring 2020</MedlineDate></PubDate>"), None);
    }

    #[test]
    fn test_article_date_fallback() {
        let xml = r#"<Article>
            <Journal><JournalIssue><PubDate/></JournalIssue></Journal>
            <ArticleDate DateType="Electronic"><Year>2022</Year><Month>01</Month><Day>31</Day></ArticleDate>
        </Article>"#;
        let article = XmlElement::parse(xml).unwrap();
        assert_eq!(publication_date(&article), "2022-01-31");
    }
}
