#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub text: String,
    pub year: Option<u16>,
    pub section: String, // heading path, e.g. "Live-action > Sitcoms"
    pub raw: String,     // source <li> fragment
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: u16,
    pub count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub scanned: usize,
    pub with_year: usize,
    pub without_year: usize,
}
