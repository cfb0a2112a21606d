//! Property-based tests for search path parsing and candidate completion.

use super::resolver::PathResolver;
use super::search::SearchPathList;
use crate::config::ResolverConfig;
use crate::sys::FakeHost;
use proptest::prelude::*;
use std::ffi::OsStr;
use std::path::PathBuf;

fn dir_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9_-]{1,10}", 1..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn separators() -> impl Strategy<Value = String> {
    (1..4usize).prop_map(|n| ":".repeat(n))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Parsing never yields an empty directory, however many colons appear
    #[test]
    fn parse_never_yields_empty(
        dirs in prop::collection::vec(dir_strategy(), 0..6),
        seps in prop::collection::vec(separators(), 0..7),
        leading in separators(),
    ) {
        let mut value = leading;
        for (i, dir) in dirs.iter().enumerate() {
            value.push_str(dir);
            value.push_str(seps.get(i).map_or(":", String::as_str));
        }
        let list = SearchPathList::parse(OsStr::new(&value));
        prop_assert!(list.iter().all(|d| !d.as_os_str().is_empty()));
        prop_assert_eq!(list.len(), dirs.len());
    }

    // Parsing preserves order
    #[test]
    fn parse_preserves_order(dirs in prop::collection::vec(dir_strategy(), 1..6)) {
        let value = dirs.join(":");
        let parsed: Vec<PathBuf> = SearchPathList::parse(OsStr::new(&value))
            .iter()
            .map(PathBuf::from)
            .collect();
        let expected: Vec<PathBuf> = dirs.iter().map(PathBuf::from).collect();
        prop_assert_eq!(parsed, expected);
    }

    // With several directories holding the name, the earliest in PATH wins
    #[test]
    fn search_returns_first_holder(
        dirs in prop::collection::hash_set(dir_strategy(), 1..6),
        holds in prop::collection::vec(any::<bool>(), 6),
        pick in any::<prop::sample::Index>(),
    ) {
        let dirs: Vec<String> = dirs.into_iter().collect();
        prop_assume!(dirs.iter().all(|d| !d.split('/').any(|c| c == "tool")));
        let forced = pick.index(dirs.len());
        let holders: Vec<&String> = dirs
            .iter()
            .enumerate()
            .filter(|(i, _)| *i == forced || holds[*i])
            .map(|(_, dir)| dir)
            .collect();

        let host = holders
            .iter()
            .fold(FakeHost::new(), |host, dir| host.with_file(format!("{dir}/tool"), 0))
            .with_env("PATH", dirs.join(":"));
        let config = ResolverConfig::default();

        let found = PathResolver::new(&host, &config).resolve(OsStr::new("tool")).unwrap();
        prop_assert_eq!(found, PathBuf::from(format!("{}/tool", holders[0])));
    }
}
