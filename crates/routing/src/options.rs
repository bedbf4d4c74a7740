//! crates/routing/src/options.rs
//! Finalization options, environment overrides, and stream selection.

use std::env;
use std::ffi::OsStr;

use logging::{BuiltinStream, StreamSetAlias};

/// Environment variable that makes the early phase write directly to the
/// secondary destination and enables the `early` stream.
pub const EARLY_ENV: &str = "STREAMLOG_LOG_EARLY";
/// Environment variable that gives the debug stream a direct sink from the
/// start and enables it.
pub const DEBUG_ENV: &str = "STREAMLOG_LOG_DEBUG";

/// Overrides read once from the process environment at router creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Early records are written immediately instead of buffered.
    pub early_verbose: bool,
    /// The debug stream is live from the start.
    pub debug_verbose: bool,
}

impl EnvOverrides {
    /// Reads [`EARLY_ENV`] and [`DEBUG_ENV`]; a non-empty value means set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Reads the overrides through `lookup`.
    pub fn from_lookup<F, V>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<V>,
        V: AsRef<OsStr>,
    {
        let is_set = |name: &str| lookup(name).is_some_and(|value| !value.as_ref().is_empty());
        Self {
            early_verbose: is_set(EARLY_ENV),
            debug_verbose: is_set(DEBUG_ENV),
        }
    }
}

/// User-selected stream names after alias expansion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamSelection {
    items: Vec<String>,
}

impl StreamSelection {
    /// Expands aliases in `items`.
    ///
    /// `none` anywhere yields an empty selection. `all` expands to every
    /// built-in stream. Duplicates are dropped, first occurrence wins.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for item in items {
            match StreamSetAlias::from_name(item.as_ref()) {
                Some(StreamSetAlias::None) => return Self::default(),
                Some(StreamSetAlias::All) => {
                    for stream in BuiltinStream::ALL {
                        selection.push(stream.name());
                    }
                }
                None => selection.push(item.as_ref()),
            }
        }
        selection
    }

    fn push(&mut self, item: &str) {
        if !self.contains(item) {
            self.items.push(item.to_owned());
        }
    }

    /// Reports whether `item` was selected verbatim.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|selected| selected == item)
    }

    /// Returns the selected items in order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Consumes the selection.
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}

/// Options applied by [`Router::finalize`](crate::Router::finalize).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RouterOptions {
    /// Streams to show; `None` means the default of `app` alone.
    ///
    /// Items may be built-in names, `name[:level]` custom streams, or the
    /// `all`/`none` aliases.
    pub enabled: Option<Vec<String>>,
    /// Send output through a pager when on a colour terminal.
    pub paginated: bool,
    /// Show the `test` stream and nothing else.
    pub show_only_test_output: bool,
    /// Suppress all output.
    pub silent: bool,
    /// The user's colour setting.
    pub colored: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            enabled: None,
            paginated: false,
            show_only_test_output: false,
            silent: false,
            colored: true,
        }
    }
}

impl RouterOptions {
    /// Computes the streams finalization enables under `env`.
    ///
    /// Silent mode still reports its selection here; finalization ignores it.
    #[must_use]
    pub fn effective_streams(&self, env: EnvOverrides) -> Vec<String> {
        if self.show_only_test_output {
            return vec![BuiltinStream::Test.name().to_owned()];
        }

        let mut selection = self.enabled.as_ref().map_or_else(
            || StreamSelection::from_items([BuiltinStream::App.name()]),
            StreamSelection::from_items,
        );
        if env.early_verbose {
            selection.push(BuiltinStream::Early.name());
        }
        if env.debug_verbose {
            selection.push(BuiltinStream::Debug.name());
        }
        selection.into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> EnvOverrides {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        EnvOverrides::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_env_values_do_not_count() {
        assert_eq!(env_of(&[]), EnvOverrides::default());
        assert_eq!(env_of(&[(EARLY_ENV, "")]), EnvOverrides::default());
        let env = env_of(&[(EARLY_ENV, "1"), (DEBUG_ENV, "yes")]);
        assert!(env.early_verbose);
        assert!(env.debug_verbose);
    }

    #[test]
    fn none_alias_wins() {
        let selection = StreamSelection::from_items(["app", "none", "remote"]);
        assert!(selection.items().is_empty());
    }

    #[test]
    fn all_alias_expands_builtins_once() {
        let selection = StreamSelection::from_items(["test", "all", "custom:info"]);
        assert_eq!(
            selection.items(),
            ["test", "app", "debug", "remote", "early", "custom:info"]
        );
    }

    #[test]
    fn default_selection_is_app() {
        let options = RouterOptions::default();
        assert_eq!(options.effective_streams(EnvOverrides::default()), ["app"]);
    }

    #[test]
    fn overrides_add_early_and_debug() {
        let env = EnvOverrides {
            early_verbose: true,
            debug_verbose: true,
        };
        let options = RouterOptions {
            enabled: Some(vec!["early".to_owned()]),
            ..RouterOptions::default()
        };
        assert_eq!(options.effective_streams(env), ["early", "debug"]);
    }

    #[test]
    fn test_only_replaces_everything() {
        let options = RouterOptions {
            enabled: Some(vec!["app".to_owned(), "remote".to_owned()]),
            show_only_test_output: true,
            ..RouterOptions::default()
        };
        let env = EnvOverrides {
            early_verbose: true,
            debug_verbose: false,
        };
        assert_eq!(options.effective_streams(env), ["test"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_deserialize_with_defaults() {
        let options: RouterOptions = serde_json::from_str(r#"{"silent": true}"#).unwrap();
        assert!(options.silent);
        assert!(options.colored);
        assert_eq!(options.enabled, None);
    }
}
