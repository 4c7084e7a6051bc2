//! Read-only access to the build farm record store.
//!
//! The services talk to the store only through [`RecordStore`]. Two
//! implementations exist: [`pg::PgStore`] over PostgreSQL and
//! [`memory::MemoryStore`] over a JSON fixture document.

pub mod memory;
pub mod pg;

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::models::build::Build;
use crate::models::ports::PortResults;
use crate::models::server::Server;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection pool: {0}")]
    Pool(String),

    #[error(transparent)]
    Query(#[from] diesel::result::Error),

    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Pool(_) => "pool",
            StoreError::Query(_) => "query",
            StoreError::Decode(_) => "decode",
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All builds matching `query`, ordered by `sort`.
    async fn find_builds(
        &self,
        query: &BuildQuery,
        projection: &Projection,
        sort: &[SortKey],
    ) -> Result<Vec<Build>, StoreError>;

    async fn find_build(&self, id: &str) -> Result<Option<Build>, StoreError>;

    async fn find_ports(&self, id: &str) -> Result<Option<PortResults>, StoreError>;

    /// Look up a server. `masternames` is never populated.
    async fn find_server(&self, id: &str) -> Result<Option<Server>, StoreError>;
}

/// Filter over build records. `None` fields do not constrain the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildQuery {
    pub latest: Option<bool>,
    /// Matches when the build type is any of these.
    pub build_type: Option<Vec<String>>,
    pub setname: Option<String>,
    pub buildname: Option<String>,
    pub jailname: Option<String>,
    pub server: Option<String>,
}

impl BuildQuery {
    pub fn matches(&self, build: &Build) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().is_none_or(|want| want == have)
        }

        self.latest.is_none_or(|latest| latest == build.latest)
            && self
                .build_type
                .as_ref()
                .is_none_or(|types| types.iter().any(|t| *t == build.build_type))
            && eq(&self.setname, &build.setname)
            && eq(&self.buildname, &build.buildname)
            && eq(&self.jailname, &build.jailname)
            && eq(&self.server, &build.server)
    }
}

/// Field paths to leave out of returned build records.
///
/// A path is either a top-level sub-document (`jobs`) or a dotted key
/// inside one (`snap.now`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub exclude: Vec<&'static str>,
}

impl Projection {
    pub fn excluding(exclude: &[&'static str]) -> Self {
        Self {
            exclude: exclude.to_vec(),
        }
    }

    pub fn apply(&self, build: &mut Build) {
        for path in &self.exclude {
            let (field, key) = match path.split_once('.') {
                Some((field, key)) => (field, Some(key)),
                None => (*path, None),
            };
            let slot = match field {
                "jobs" => &mut build.jobs,
                "snap" => &mut build.snap,
                "stats" => &mut build.stats,
                _ => continue,
            };
            match key {
                None => *slot = None,
                Some(key) => {
                    if let Some(serde_json::Value::Object(doc)) = slot {
                        doc.remove(key);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Started,
    Setname,
    Ptname,
    Jailname,
    Buildname,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl SortKey {
    pub const fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub const fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }

    pub fn compare(&self, a: &Build, b: &Build) -> Ordering {
        let ord = match self.field {
            SortField::Started => a.started.cmp(&b.started),
            SortField::Setname => a.setname.cmp(&b.setname),
            SortField::Ptname => a.ptname.cmp(&b.ptname),
            SortField::Jailname => a.jailname.cmp(&b.jailname),
            SortField::Buildname => a.buildname.cmp(&b.buildname),
        };
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Compare two builds by each key in turn.
pub fn compare_by(sort: &[SortKey], a: &Build, b: &Build) -> Ordering {
    sort.iter()
        .map(|key| key.compare(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::models::build::Build;

    pub fn build(id: &str, started: i64) -> Build {
        Build {
            id: id.to_string(),
            build_type: "bulk".to_string(),
            setname: String::new(),
            ptname: "default".to_string(),
            jailname: "140amd64".to_string(),
            buildname: "2024-01-01_00h00m00s".to_string(),
            server: "alpha".to_string(),
            started,
            latest: true,
            status: Some("done".to_string()),
            stats: None,
            jobs: None,
            snap: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testutil::build;
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        let mut old = build("b1", 1);
        old.latest = false;
        assert!(BuildQuery::default().matches(&old));
    }

    #[test]
    fn type_matches_any_of() {
        let query = BuildQuery {
            build_type: Some(vec!["bulk".into(), "testport".into()]),
            ..Default::default()
        };
        let mut b = build("b1", 1);
        assert!(query.matches(&b));
        b.build_type = "options".into();
        assert!(!query.matches(&b));
    }

    #[test]
    fn latest_restriction_excludes_old_builds() {
        let query = BuildQuery {
            latest: Some(true),
            setname: Some(String::new()),
            ..Default::default()
        };
        let mut b = build("b1", 1);
        assert!(query.matches(&b));
        b.latest = false;
        assert!(!query.matches(&b));
    }

    #[test]
    fn projection_drops_jobs_and_snapshot_now() {
        let mut b = build("b1", 1);
        b.jobs = Some(json!([{"id": 1}]));
        b.snap = Some(json!({"now": 123, "elapsed": 60}));

        Projection::excluding(&["jobs", "snap.now"]).apply(&mut b);

        assert_eq!(b.jobs, None);
        assert_eq!(b.snap, Some(json!({"elapsed": 60})));
    }

    #[test]
    fn compare_by_falls_through_to_later_keys() {
        let sort = [
            SortKey::desc(SortField::Started),
            SortKey::asc(SortField::Setname),
        ];
        let mut a = build("a", 10);
        let mut b = build("b", 10);
        a.setname = "zzz".into();
        b.setname = "aaa".into();
        assert_eq!(compare_by(&sort, &a, &b), Ordering::Greater);

        a.started = 11;
        assert_eq!(compare_by(&sort, &a, &b), Ordering::Less);
    }
}
