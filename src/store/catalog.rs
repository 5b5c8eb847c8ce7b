use crate::store::{CatalogStore, StoreError, StoreResult};
use async_trait::async_trait;
use coursereg_core::Course;
use std::path::PathBuf;

/// Filters a tab-separated catalog (`code\ttitle\tsession`) down to one session.
///
/// Lines that do not have exactly three fields are skipped. Fields are trimmed, and
/// the session must match exactly.
pub fn parse_catalog(source: &str, session: &str) -> Vec<Course> {
    source
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('\t').collect();
            let [code, title, sess] = parts.as_slice() else {
                return None;
            };
            let sess = sess.trim();
            (sess == session).then(|| Course::new(code.trim(), title.trim(), sess))
        })
        .collect()
}

/// Catalog backed by a text file, re-read on every request.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogStore for FileCatalog {
    async fn load_courses(&self, session: &str) -> StoreResult<Vec<Course>> {
        let source = tokio::fs::read_to_string(&self.path).await.map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(parse_catalog(&source, session))
    }
}

/// Catalog held in memory. Used in tests and for fixed demo data.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    source: String,
}

impl MemoryCatalog {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn load_courses(&self, session: &str) -> StoreResult<Vec<Course>> {
        Ok(parse_catalog(&self.source, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "IFT1015\tIntro Programming\tAutomne\n\
                           IFT1025\tProgrammation 2\tHiver\n\
                           broken line without tabs\n\
                           IFT2255\tGénie logiciel\tAutomne\textra\n \
                           IFT1227 \t  Architecture \t Automne \n\
                           IFT1015\tIntro Programming\tAutomne\n";

    #[test]
    fn keeps_matching_session_in_file_order() {
        let courses = parse_catalog(CATALOG, "Automne");
        let codes: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["IFT1015", "IFT1227", "IFT1015"]);
    }

    #[test]
    fn trims_every_field() {
        let courses = parse_catalog(CATALOG, "Automne");
        assert_eq!(courses[1], Course::new("IFT1227", "Architecture", "Automne"));
    }

    #[test]
    fn session_match_is_exact() {
        assert!(parse_catalog(CATALOG, "automne").is_empty());
        assert!(parse_catalog(CATALOG, "Été").is_empty());
        assert_eq!(parse_catalog(CATALOG, "Hiver").len(), 1);
    }

    #[test]
    fn handles_crlf_sources() {
        let courses = parse_catalog("IFT1015\tIntro\tHiver\r\nIFT1025\tProg 2\tHiver\r\n", "Hiver");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].session, "Hiver");
    }

    #[tokio::test]
    async fn file_catalog_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cours.txt");
        std::fs::write(&path, "IFT1015\tIntro Programming\tAutomne\n").unwrap();

        let catalog = FileCatalog::new(&path);
        let courses = catalog.load_courses("Automne").await.unwrap();
        assert_eq!(courses, vec![Course::new("IFT1015", "Intro Programming", "Automne")]);
        assert!(catalog.load_courses("Hiver").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_read_failure_not_an_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path().join("absent.txt"));

        let err = catalog.load_courses("Automne").await.unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}
