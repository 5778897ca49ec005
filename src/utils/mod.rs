//! Utility modules supporting the fetch pipeline.
//!
//! - [`HttpClient`]: shared reqwest client with bounded timeouts
//! - [`XmlElement`]: element tree for PubMed documents, with text-of-child lookups
//! - [`classify_affiliation`]: tell company affiliations from academic ones
//! - [`extract_email`]: pull the first e-mail address out of free text
//!
//! # Affiliation heuristics
//!
//! ```rust
//! use pubmed_papers::utils::{classify_affiliation, extract_email, AffiliationKind};
//!
//! let affiliation = "Genentech Inc., South San Francisco, CA. Electronic address: a.b@gene.com.";
//! assert_eq!(classify_affiliation(affiliation), AffiliationKind::Company);
//! assert_eq!(extract_email(affiliation).as_deref(), Some("a.b@gene.com"));
//! ```

mod affiliation;
mod http;
mod xml;

pub use affiliation::{classify_affiliation, extract_email, strip_emails, AffiliationKind};
pub use http::HttpClient;
pub use xml::{XmlElement, XmlError, XmlNode};
