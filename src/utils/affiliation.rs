//! Affiliation heuristics: tell company affiliations from academic ones and
//! pull e-mail addresses out of affiliation strings.
//!
//! PubMed affiliations are free text, so classification is keyword based:
//!
//! 1. Legal-entity suffixes (`Inc.`, `Ltd`, `GmbH`, ...) and well-known industry
//!    names always mean [`AffiliationKind::Company`].
//! 2. Otherwise academic markers (university, institute, hospital, ...) mean
//!    [`AffiliationKind::Academic`].
//! 3. Otherwise industry words (`Pharmaceuticals`, `Therapeutics`, ...) mean
//!    [`AffiliationKind::Company`].
//! 4. Anything else is [`AffiliationKind::Unknown`].

use regex::Regex;
use std::sync::OnceLock;

/// Classification of a single affiliation string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationKind {
    Academic,
    Company,
    Unknown,
}

impl AffiliationKind {
    pub fn is_company(self) -> bool {
        self == AffiliationKind::Company
    }
}

const LEGAL_ENTITY_PATTERN: &str = r"(?i)\b(inc|incorporated|ltd|llc|plc|gmbh|corp|corporation|co\.,? ltd|a/s|ag|pfizer|novartis|roche|genentech|merck|astrazeneca|sanofi|glaxosmithkline|gsk|amgen|gilead|bayer|abbvie|eli lilly|janssen|moderna|biontech|regeneron|takeda|boehringer ingelheim|novo nordisk|bristol-myers squibb|vertex pharmaceuticals|illumina)\b";

const ACADEMIC_PATTERN: &str = r"(?i)\b(universit\w*|univ|college|institut\w*|school|hospital|klinikum|clinic|faculty|academy|medical cent(er|re)|cancer cent(er|re)|research cent(er|re)|national laborator(y|ies)|ministry|council|foundation|nih|inserm|cnrs|csic|max planck|howard hughes)\b";

const INDUSTRY_PATTERN: &str = r"(?i)\b(pharma|pharmaceuticals?|biopharma(ceuticals?)?|therapeutics|biotherapeutics|biosciences|biologics|biotech|diagnostics|laboratories|company|enterprises?|consulting|solutions)\b";

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}";

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn legal_entity_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, LEGAL_ENTITY_PATTERN)
}

fn academic_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, ACADEMIC_PATTERN)
}

fn industry_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, INDUSTRY_PATTERN)
}

fn email_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, EMAIL_PATTERN)
}

fn is_match(re: Option<&Regex>, text: &str) -> bool {
    re.is_some_and(|re| re.is_match(text))
}

/// Classify one affiliation string
pub fn classify_affiliation(affiliation: &str) -> AffiliationKind {
    let text = strip_emails(affiliation);

    if is_match(legal_entity_regex(), &text) {
        AffiliationKind::Company
    } else if is_match(academic_regex(), &text) {
        AffiliationKind::Academic
    } else if is_match(industry_regex(), &text) {
        AffiliationKind::Company
    } else {
        AffiliationKind::Unknown
    }
}

/// First e-mail address in the text, if any
pub fn extract_email(text: &str) -> Option<String> {
    email_regex()?
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Affiliation text with e-mail addresses and the "Electronic address:" label removed
pub fn strip_emails(text: &str) -> String {
    let without = match email_regex() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    };
    let without = without.replace("Electronic address:", "");
    without
        .trim_start()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';') || c.is_whitespace())
        .to_string()
}
