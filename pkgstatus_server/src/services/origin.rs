//! Origin key repair for port results.
//!
//! Map keys in the store cannot contain `.`, so agents write origins such
//! as `www/py-foo.bar` as `www/py-foo%bar`. Reading reverses that.

use std::collections::BTreeMap;

use crate::models::ports::PortResults;

pub const PLACEHOLDER: char = '%';
pub const SEPARATOR: char = '.';

/// Rewrite every escaped origin key in `pkgnames` and in each outcome
/// mapping.
///
/// Records without `pkgnames` are returned unchanged. Keys without the
/// placeholder are left alone; if an escaped key and its unescaped form
/// both exist, the rewritten entry replaces the other.
pub fn normalize_origins(mut ports: PortResults) -> PortResults {
    let Some(pkgnames) = ports.pkgnames.take() else {
        return ports;
    };

    ports.pkgnames = Some(rekey(pkgnames));
    for outcome in ports.outcomes_mut() {
        if let Some(map) = outcome.take() {
            *outcome = Some(rekey(map));
        }
    }
    ports
}

pub fn unescape(origin: &str) -> String {
    origin.replace(PLACEHOLDER, &SEPARATOR.to_string())
}

fn rekey<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
    if !map.keys().any(|origin| origin.contains(PLACEHOLDER)) {
        return map;
    }
    let (moved, mut kept): (BTreeMap<_, _>, BTreeMap<_, _>) = map
        .into_iter()
        .partition(|(origin, _)| origin.contains(PLACEHOLDER));
    kept.extend(
        moved
            .into_iter()
            .map(|(origin, value)| (unescape(&origin), value)),
    );
    kept
}
