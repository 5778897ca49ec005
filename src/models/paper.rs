//! Paper record model: the fixed six-column row written to the output table.

use serde::{Deserialize, Serialize};

/// Opaque PubMed identifier (PMID)
pub type PaperId = String;

/// Output header, in column order
pub const COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator used when a list field is flattened into a single cell
const LIST_SEPARATOR: &str = "; ";

/// Metadata extracted for a single paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed identifier
    pub pubmed_id: PaperId,

    /// Article title
    pub title: String,

    /// Publication date (`YYYY`, `YYYY-MM`, `YYYY-MM-DD` or PubMed's free-form MedlineDate)
    pub publication_date: String,

    /// Authors with at least one company affiliation
    pub non_academic_authors: Vec<String>,

    /// Company affiliations of those authors, de-duplicated
    pub company_affiliations: Vec<String>,

    /// First e-mail address found in the author affiliations
    pub corresponding_author_email: Option<String>,
}

impl PaperRecord {
    /// Create a record with only the identifier and title set
    pub fn new(pubmed_id: impl Into<PaperId>, title: impl Into<String>) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Cell values in [`COLUMNS`] order
    pub fn to_row(&self) -> [String; 6] {
        [
            self.pubmed_id.clone(),
            self.title.clone(),
            self.publication_date.clone(),
            self.non_academic_authors.join(LIST_SEPARATOR),
            self.company_affiliations.join(LIST_SEPARATOR),
            self.corresponding_author_email.clone().unwrap_or_default(),
        ]
    }

    /// Whether any author of this paper has a company affiliation
    pub fn has_company_author(&self) -> bool {
        !self.non_academic_authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_order() {
        assert_eq!(COLUMNS[0], "PubmedID");
        assert_eq!(COLUMNS[5], "Corresponding Author Email");
    }

    #[test]
    fn test_to_row_joins_lists() {
        let record = PaperRecord {
            pubmed_id: "111".to_string(),
            title: "Checkpoint inhibitors".to_string(),
            publication_date: "2024-03-15".to_string(),
            non_academic_authors: vec!["Jane Doe".to_string(), "John Roe".to_string()],
            company_affiliations: vec!["Pfizer Inc., New York, NY, USA".to_string()],
            corresponding_author_email: Some("jane.doe@pfizer.com".to_string()),
        };

        let row = record.to_row();
        assert_eq!(row[0], "111");
        assert_eq!(row[3], "Jane Doe; John Roe");
        assert_eq!(row[4], "Pfizer Inc., New York, NY, USA");
        assert_eq!(row[5], "jane.doe@pfizer.com");
        assert!(record.has_company_author());
    }

    #[test]
    fn test_to_row_empty_optional_fields() {
        let record = PaperRecord::new("222", "Untitled");
        let row = record.to_row();
        assert_eq!(row[2], "");
        assert_eq!(row[3], "");
        assert_eq!(row[5], "");
        assert!(!record.has_company_author());
    }
}
