//! Flags the user supplied, keyed by command path
//!
//! Keys look like `cdn.distribution.delete.distribution-id`. Flags declared on
//! the root command (the global ones) are stored under their bare name and are
//! visible from every namespace.

use clap::parser::ValueSource;
use clap::{ArgMatches, Command};
use std::collections::BTreeMap;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default)]
pub struct FlagStore {
    values: BTreeMap<String, Vec<String>>,
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<namespace>.<flag>`, or just `<flag>` at the root
    pub fn key(namespace: &str, flag: &str) -> String {
        if namespace.is_empty() {
            flag.to_string()
        } else {
            format!("{}.{}", namespace, flag)
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.values.insert(key.into(), values);
    }

    /// Record every flag set on the command line or through the environment.
    ///
    /// Returns the namespace of the innermost subcommand alongside the store.
    pub fn from_matches(cmd: &Command, matches: &ArgMatches) -> (String, Self) {
        let mut store = Self::new();
        let mut path = Vec::new();
        store.collect(cmd, matches, &mut path);
        (path.join("."), store)
    }

    fn collect(&mut self, cmd: &Command, matches: &ArgMatches, path: &mut Vec<String>) {
        let namespace = path.join(".");

        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str();
            if !matches!(
                matches.value_source(id),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            ) {
                continue;
            }

            let values = matches
                .get_raw(id)
                .map(|raw| raw.map(|v| v.to_string_lossy().into_owned()).collect())
                .unwrap_or_default();
            let name = arg.get_long().unwrap_or(id);
            self.insert(Self::key(&namespace, name), values);
        }

        if let Some((name, sub_matches)) = matches.subcommand() {
            if let Some(sub_cmd) = cmd.find_subcommand(name) {
                path.push(name.to_string());
                self.collect(sub_cmd, sub_matches, path);
            }
        }
    }

    /// Values of `flag` as seen from `namespace`
    pub fn get(&self, namespace: &str, flag: &str) -> Option<&[String]> {
        self.values
            .get(&Self::key(namespace, flag))
            .or_else(|| self.values.get(flag))
            .map(Vec::as_slice)
    }

    pub fn is_set(&self, namespace: &str, flag: &str) -> bool {
        self.get(namespace, flag).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Fail unless every flag in `required` was supplied
pub fn check_required_flags(store: &FlagStore, namespace: &str, required: &[&str]) -> CliResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|flag| !store.is_set(namespace, flag))
        .map(|flag| flag.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CliError::MissingFlags {
            namespace: namespace.to_string(),
            flags: missing,
        })
    }
}

/// Succeed if at least one set has all of its flags supplied
pub fn check_required_flags_sets(
    store: &FlagStore,
    namespace: &str,
    sets: &[&[&str]],
) -> CliResult<()> {
    let satisfied = sets
        .iter()
        .any(|set| set.iter().all(|flag| store.is_set(namespace, flag)));

    if satisfied {
        Ok(())
    } else {
        Err(CliError::MissingFlagSets {
            namespace: namespace.to_string(),
            sets: sets
                .iter()
                .map(|set| set.iter().map(|f| f.to_string()).collect())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction};

    const NS: &str = "cdn.distribution.delete";

    fn store(keys: &[&str]) -> FlagStore {
        let mut s = FlagStore::new();
        for k in keys {
            s.insert(*k, vec!["x".to_string()]);
        }
        s
    }

    #[test]
    fn test_required_flags() {
        let s = store(&["cdn.distribution.delete.distribution-id"]);
        assert!(check_required_flags(&s, NS, &["distribution-id"]).is_ok());

        let err = check_required_flags(&s, NS, &["distribution-id", "domain", "all"]).unwrap_err();
        match err {
            CliError::MissingFlags { flags, .. } => assert_eq!(flags, vec!["domain", "all"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_flag_from_another_namespace_does_not_count() {
        let s = store(&["cdn.distribution.get.distribution-id"]);
        assert!(check_required_flags(&s, NS, &["distribution-id"]).is_err());
    }

    #[test]
    fn test_global_flags_visible_everywhere() {
        let s = store(&["force"]);
        assert!(s.is_set(NS, "force"));
        assert!(s.is_set("kafka.cluster.delete", "force"));
    }

    #[test]
    fn test_flag_sets_any_complete_set() {
        let sets: &[&[&str]] = &[&["distribution-id"], &["all"]];
        assert!(check_required_flags_sets(&store(&["cdn.distribution.delete.all"]), NS, sets).is_ok());
        assert!(check_required_flags_sets(
            &store(&["cdn.distribution.delete.distribution-id"]),
            NS,
            sets
        )
        .is_ok());
        assert!(check_required_flags_sets(&store(&[]), NS, sets).is_err());
    }

    #[test]
    fn test_flag_sets_partial_set_is_not_enough() {
        let sets: &[&[&str]] = &[&["datacenter-id", "server-id"], &["datacenter-id", "all"]];
        let s = store(&["cdn.distribution.delete.datacenter-id"]);
        assert!(check_required_flags_sets(&s, NS, sets).is_err());
    }

    fn test_command() -> Command {
        Command::new("ionosctl")
            .arg(Arg::new("force").long("force").short('f').action(ArgAction::SetTrue).global(true))
            .subcommand(
                Command::new("cdn").subcommand(
                    Command::new("distribution").subcommand(
                        Command::new("list")
                            .arg(Arg::new("filter_state").long("filter.state"))
                            .arg(Arg::new("limit").long("limit").default_value("10")),
                    ),
                ),
            )
    }

    #[test]
    fn test_from_matches_records_explicit_flags_only() {
        let cmd = test_command();
        let matches = cmd
            .clone()
            .try_get_matches_from(["ionosctl", "cdn", "distribution", "list", "--filter.state", "AVAILABLE"])
            .unwrap();

        let (ns, store) = FlagStore::from_matches(&cmd, &matches);
        assert_eq!(ns, "cdn.distribution.list");
        assert_eq!(store.get(&ns, "filter.state"), Some(&["AVAILABLE".to_string()][..]));
        assert!(!store.is_set(&ns, "limit"));
        assert!(!store.is_set(&ns, "force"));
    }

    #[test]
    fn test_from_matches_sees_global_after_subcommand() {
        let cmd = test_command();
        let matches = cmd
            .clone()
            .try_get_matches_from(["ionosctl", "cdn", "distribution", "list", "-f"])
            .unwrap();

        let (ns, store) = FlagStore::from_matches(&cmd, &matches);
        assert!(store.is_set(&ns, "force"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["force"]);
    }
}
