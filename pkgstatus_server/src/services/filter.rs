//! Translation of listing query parameters into a build query.

use indexmap::IndexMap;
use serde::Serialize;

use crate::store::{BuildQuery, Projection};

/// Recognized filter parameters, in echo order. Anything else is ignored.
pub const FILTER_KEYS: [&str; 6] = ["all", "type", "setname", "buildname", "jailname", "server"];

/// Sub-documents left out of listings.
pub const LISTING_EXCLUDES: [&str; 2] = ["jobs", "snap.now"];

/// The `setname` value standing for the unnamed default set.
pub const DEFAULT_SETNAME: &str = "default";

/// Recognized parameters exactly as the client sent them.
///
/// `type` stays in the echo so callers can re-derive the type selection;
/// only [`FilterEcho::query_string`] leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterEcho(IndexMap<&'static str, String>);

impl FilterEcho {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// URL-encoded echo for building links. `type` is left out.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            if *key != "type" {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    pub query: BuildQuery,
    pub projection: Projection,
    pub echo: FilterEcho,
}

/// Resolve raw query parameters. When a name repeats, the first value wins.
pub fn resolve<I, K, V>(params: I) -> ResolvedFilter
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut echo = IndexMap::new();
    for (key, value) in params {
        if let Some(key) = FILTER_KEYS.iter().find(|k| **k == key.as_ref()) {
            echo.entry(*key).or_insert_with(|| value.into());
        }
    }
    echo.sort_by_cached_key(|key, _| FILTER_KEYS.iter().position(|k| k == key));
    let echo = FilterEcho(echo);

    let scoped = !(echo.get("all").is_some() || echo.get("buildname").is_some());
    let query = BuildQuery {
        latest: scoped.then_some(true),
        build_type: echo
            .get("type")
            .map(|types| types.split(',').map(str::to_string).collect()),
        setname: echo.get("setname").map(|setname| {
            if setname == DEFAULT_SETNAME {
                String::new()
            } else {
                setname.to_string()
            }
        }),
        buildname: echo.get("buildname").map(str::to_string),
        jailname: echo.get("jailname").map(str::to_string),
        server: echo.get("server").map(str::to_string),
    };

    ResolvedFilter {
        query,
        projection: Projection::excluding(&LISTING_EXCLUDES),
        echo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_pairs(pairs: &[(&str, &str)]) -> ResolvedFilter {
        resolve(pairs.iter().copied())
    }

    #[test]
    fn empty_input_scopes_to_latest() {
        let resolved = resolve_pairs(&[]);
        assert_eq!(
            resolved.query,
            BuildQuery {
                latest: Some(true),
                ..Default::default()
            }
        );
        assert!(resolved.echo.is_empty());
        assert_eq!(resolved.echo.query_string(), "");
    }

    #[test]
    fn projection_is_fixed() {
        let expected = Projection::excluding(&["jobs", "snap.now"]);
        assert_eq!(resolve_pairs(&[]).projection, expected);
        assert_eq!(resolve_pairs(&[("server", "alpha")]).projection, expected);
    }

    #[test]
    fn buildname_drops_latest() {
        let resolved = resolve_pairs(&[("buildname", "foo")]);
        assert_eq!(resolved.query.latest, None);
        assert_eq!(resolved.query.buildname.as_deref(), Some("foo"));
    }

    #[test]
    fn all_drops_latest_and_is_not_matched() {
        let resolved = resolve_pairs(&[("all", "1")]);
        assert_eq!(resolved.query, BuildQuery::default());
        assert_eq!(resolved.echo.get("all"), Some("1"));
    }

    #[test]
    fn all_with_buildname_is_accepted() {
        let resolved = resolve_pairs(&[("all", "1"), ("buildname", "foo")]);
        assert_eq!(resolved.query.latest, None);
        assert_eq!(resolved.query.buildname.as_deref(), Some("foo"));
    }

    #[test]
    fn default_setname_rewritten_in_query_only() {
        let resolved = resolve_pairs(&[("setname", "default")]);
        assert_eq!(resolved.query.setname.as_deref(), Some(""));
        assert_eq!(resolved.query.latest, Some(true));
        assert_eq!(resolved.echo.get("setname"), Some("default"));
        assert_eq!(resolved.echo.query_string(), "setname=default");
    }

    #[test]
    fn other_setnames_pass_through() {
        let resolved = resolve_pairs(&[("setname", "desktop")]);
        assert_eq!(resolved.query.setname.as_deref(), Some("desktop"));
    }

    #[test]
    fn type_is_split_and_kept_out_of_query_string() {
        let resolved = resolve_pairs(&[("type", "a,b"), ("jailname", "140amd64")]);
        assert_eq!(
            resolved.query.build_type,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(resolved.echo.get("type"), Some("a,b"));
        assert_eq!(resolved.echo.query_string(), "jailname=140amd64");
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let with_extra = resolve_pairs(&[("foo", "bar"), ("server", "alpha")]);
        let without = resolve_pairs(&[("server", "alpha")]);
        assert_eq!(with_extra, without);
        assert_eq!(with_extra.echo.get("foo"), None);
    }

    #[test]
    fn echo_follows_recognized_key_order() {
        let resolved = resolve_pairs(&[
            ("server", "alpha"),
            ("jailname", "140amd64"),
            ("all", "1"),
            ("setname", "desktop"),
        ]);
        let keys: Vec<_> = resolved.echo.keys().collect();
        assert_eq!(keys, ["all", "setname", "jailname", "server"]);
        assert_eq!(
            resolved.echo.query_string(),
            "all=1&setname=desktop&jailname=140amd64&server=alpha"
        );
    }

    #[test]
    fn first_value_of_repeated_key_wins() {
        let resolved = resolve_pairs(&[("server", "alpha"), ("server", "beta")]);
        assert_eq!(resolved.query.server.as_deref(), Some("alpha"));
    }

    #[test]
    fn query_string_escapes_values() {
        let resolved = resolve_pairs(&[("buildname", "a b&c")]);
        assert_eq!(resolved.echo.query_string(), "buildname=a+b%26c");
    }
}
