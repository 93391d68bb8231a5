//! Matching typed arguments against hierarchical alias names
//!
//! Every stored key is split into segments and compared against the leading
//! arguments. A key whose segments all match is ranked by its segment count, so the
//! longest matching alias wins. With prefix matching enabled a typed argument only
//! needs to be a prefix of the segment (`b` for `build`). When several aliases tie
//! for the top rank, an alias whose segments match exactly breaks the tie.

use std::cmp::Ordering;

use log::debug;
use thiserror::Error;

use crate::commands::command::Command;
use crate::store::{CommandStore, segments};

/// Errors that can occur while resolving typed arguments to an alias
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("command not found")]
    NotFound,
    #[error("ambiguous command, did you mean one of: {}?", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// How a typed argument is compared with a stored segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive equality
    #[default]
    Exact,
    /// Case-insensitive prefix: the argument starts the segment
    Prefix,
}

impl MatchMode {
    #[must_use]
    pub fn from_submatch(submatch: bool) -> Self {
        if submatch {
            MatchMode::Prefix
        } else {
            MatchMode::Exact
        }
    }

    fn matches(self, segment: &str, arg: &str) -> bool {
        let segment = segment.to_lowercase();
        let arg = arg.to_lowercase();
        match self {
            MatchMode::Exact => segment == arg,
            MatchMode::Prefix => segment.starts_with(&arg),
        }
    }
}

/// A resolved alias together with the arguments left over for it
#[derive(Debug, PartialEq, Eq)]
pub struct Resolution<'s, 'a> {
    pub key: &'s str,
    pub command: &'s Command,
    pub rest: &'a [String],
}

struct AliasPath<'s> {
    key: &'s str,
    segments: Vec<&'s str>,
}

struct Ranked<'p, 's> {
    path: &'p AliasPath<'s>,
    rank: usize,
}

/// Order segment sequences element-wise; a strict prefix sorts before the longer sequence.
pub fn compare_segments<A, B>(a: &[A], b: &[B]) -> Ordering
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    a.iter().map(A::as_ref).cmp(b.iter().map(B::as_ref))
}

/// Order two dot-path keys segment by segment.
#[must_use]
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    segments(a).cmp(segments(b))
}

/// Rank every path whose segments all match the leading `args`, best first.
fn rank<'p, 's>(
    paths: impl IntoIterator<Item = &'p AliasPath<'s>>,
    args: &[String],
    mode: MatchMode,
) -> Vec<Ranked<'p, 's>>
where
    's: 'p,
{
    let mut ranked: Vec<Ranked<'p, 's>> = paths
        .into_iter()
        .filter(|path| path.segments.len() <= args.len())
        .filter(|path| {
            path.segments
                .iter()
                .zip(args)
                .all(|(segment, arg)| mode.matches(segment, arg))
        })
        .map(|path| Ranked {
            path,
            rank: path.segments.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.rank.cmp(&a.rank));
    ranked
}

fn has_multiple_top(ranked: &[Ranked]) -> bool {
    ranked.len() > 1 && ranked[0].rank == ranked[1].rank
}

fn top_keys(ranked: &[Ranked]) -> Vec<String> {
    let Some(first) = ranked.first() else {
        return Vec::new();
    };
    ranked
        .iter()
        .take_while(|r| r.rank == first.rank)
        .map(|r| r.path.key.to_string())
        .collect()
}

/// Find the alias named by the leading `args` and split off the remaining arguments.
///
/// # Errors
///
/// Returns `ResolveError::NotFound` if no alias matches (or, in exact mode, if several
/// tie), and `ResolveError::Ambiguous` if a prefix tie cannot be broken by an exact match.
pub fn resolve<'s, 'a>(
    store: &'s CommandStore,
    args: &'a [String],
    mode: MatchMode,
) -> Result<Resolution<'s, 'a>, ResolveError> {
    let mut paths: Vec<AliasPath<'s>> = store
        .keys()
        .map(|key| AliasPath {
            key,
            segments: segments(key).collect(),
        })
        .collect();
    paths.sort_by(|a, b| compare_segments(&a.segments, &b.segments));

    let ranked = rank(&paths, args, mode);
    let Some(top) = ranked.first() else {
        debug!("No alias matches {args:?} ({mode:?})");
        return Err(ResolveError::NotFound);
    };

    let selected = if has_multiple_top(&ranked) {
        let tied = top_keys(&ranked);
        debug!("Aliases tied for {args:?}: {tied:?}");
        if mode == MatchMode::Exact {
            return Err(ResolveError::NotFound);
        }
        let exact = rank(ranked.iter().map(|r| r.path), args, MatchMode::Exact);
        match exact.as_slice() {
            [only] => only.path,
            _ => return Err(ResolveError::Ambiguous(tied)),
        }
    } else {
        top.path
    };

    let command = store.get(selected.key).ok_or(ResolveError::NotFound)?;
    let consumed = selected.segments.len();
    debug!(
        "Resolved {args:?} to `{}`, passing {} argument(s)",
        selected.key,
        args.len() - consumed
    );
    Ok(Resolution {
        key: selected.key,
        command,
        rest: &args[consumed..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(keys: &[&str]) -> CommandStore {
        keys.iter()
            .map(|key| ((*key).to_string(), Command::new(format!("prog-{key}"), ["t"])))
            .collect()
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exact_unique_match() {
        let store = make_store(&["build"]);
        let argv = args(&["build", "x"]);
        let res = resolve(&store, &argv, MatchMode::Exact).unwrap();
        assert_eq!(res.key, "build");
        assert_eq!(res.command.path, "prog-build");
        assert_eq!(res.rest, ["x".to_string()]);
    }

    #[test]
    fn test_prefix_unambiguous_match() {
        let store = make_store(&["build"]);
        let argv = args(&["b", "x"]);
        let res = resolve(&store, &argv, MatchMode::Prefix).unwrap();
        assert_eq!(res.key, "build");
        assert_eq!(res.rest, ["x".to_string()]);
    }

    #[test]
    fn test_prefix_not_used_in_exact_mode() {
        let store = make_store(&["build"]);
        let argv = args(&["b"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Exact),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let store = make_store(&["subsub", "sub"]);
        let argv = args(&["s"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Prefix),
            Err(ResolveError::Ambiguous(vec![
                "sub".to_string(),
                "subsub".to_string()
            ]))
        );
    }

    #[test]
    fn test_exact_match_breaks_prefix_tie() {
        let store = make_store(&["sub", "subsub"]);
        let argv = args(&["sub"]);
        let res = resolve(&store, &argv, MatchMode::Prefix).unwrap();
        assert_eq!(res.key, "sub");
        assert!(res.rest.is_empty());
    }

    #[test]
    fn test_no_match() {
        let store = make_store(&["build"]);
        let argv = args(&["zzz"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Prefix),
            Err(ResolveError::NotFound)
        );
        assert_eq!(
            resolve(&store, &argv, MatchMode::Exact),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_empty_args_and_empty_store() {
        let store = make_store(&["build"]);
        assert_eq!(
            resolve(&store, &[], MatchMode::Prefix),
            Err(ResolveError::NotFound)
        );
        let argv = args(&["build"]);
        assert_eq!(
            resolve(&CommandStore::new(), &argv, MatchMode::Prefix),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_longest_path_wins() {
        let store = make_store(&["m", "m.c"]);
        let argv = args(&["m", "c", "x"]);
        let res = resolve(&store, &argv, MatchMode::Exact).unwrap();
        assert_eq!(res.key, "m.c");
        assert_eq!(res.rest, ["x".to_string()]);

        let argv = args(&["m", "x"]);
        let res = resolve(&store, &argv, MatchMode::Exact).unwrap();
        assert_eq!(res.key, "m");
        assert_eq!(res.rest, ["x".to_string()]);
    }

    #[test]
    fn test_path_longer_than_args_is_skipped() {
        let store = make_store(&["m.c"]);
        let argv = args(&["m"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Prefix),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_matching_ignores_case() {
        let store = make_store(&["Build.Release"]);
        let argv = args(&["bUILD", "RELEASE"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Exact).unwrap().key,
            "Build.Release"
        );
        let argv = args(&["BU", "rel"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Prefix).unwrap().key,
            "Build.Release"
        );
    }

    #[test]
    fn test_exact_mode_tie_is_not_found() {
        let store = make_store(&["build", "BUILD"]);
        let argv = args(&["Build"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Exact),
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn test_exact_tiebreak_considers_lower_ranked_candidates() {
        // `ab.cx` and `ab.cy` tie on prefix; only the shorter `ab` matches exactly.
        let store = make_store(&["ab.cx", "ab.cy", "ab"]);
        let argv = args(&["ab", "c"]);
        let res = resolve(&store, &argv, MatchMode::Prefix).unwrap();
        assert_eq!(res.key, "ab");
        assert_eq!(res.rest, ["c".to_string()]);
    }

    #[test]
    fn test_multiple_exact_matches_stay_ambiguous() {
        let store = make_store(&["ab", "ab.c", "ab.cd"]);
        let argv = args(&["ab", "c"]);
        assert_eq!(
            resolve(&store, &argv, MatchMode::Prefix),
            Err(ResolveError::Ambiguous(vec![
                "ab.c".to_string(),
                "ab.cd".to_string()
            ]))
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let store = make_store(&["sub", "subsub", "m.c"]);
        let before = store.clone();
        let argv = args(&["su", "x"]);
        let first = resolve(&store, &argv, MatchMode::Prefix);
        let second = resolve(&store, &argv, MatchMode::Prefix);
        assert_eq!(first, second);
        assert_eq!(store, before);
    }

    #[test]
    fn test_compare_segments() {
        let mut names = vec![
            vec!["z", "x", "x"],
            vec!["y", "y"],
            vec!["x", "z"],
            vec!["x", "y", "z"],
            vec!["y", "y", "z"],
            vec!["x", "y"],
            vec!["y", "y", "y"],
        ];
        names.sort_by(|a, b| compare_segments(a, b));
        assert_eq!(
            names,
            vec![
                vec!["x", "y"],
                vec!["x", "y", "z"],
                vec!["x", "z"],
                vec!["y", "y"],
                vec!["y", "y", "y"],
                vec!["y", "y", "z"],
                vec!["z", "x", "x"],
            ]
        );
    }

    #[test]
    fn test_compare_keys_uses_segments() {
        assert_eq!(compare_keys("a.b", "a"), Ordering::Greater);
        assert_eq!(compare_keys("a.b", "a-b"), Ordering::Less);
        assert_eq!(compare_keys("m.c", "m.c"), Ordering::Equal);
    }
}
