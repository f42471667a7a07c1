// src/github/matcher.rs
// =============================================================================
// Matching requested names against a tree listing.
//
// A caller can ask for a file by its full path ("Global/Vim.gitignore") or
// leave the suffix off ("Global/Vim", "Vim"). Matching is plain string
// equality, so directory segments are never guessed: "Vim" only matches a
// top-level "Vim.gitignore".
//
// No network and no async here: just slices and strings.
// =============================================================================

use super::types::{EntryKind, TreeEntry};

// Returns the file entry `requested` refers to, if any
//
// Parameters:
//   requested: The name as the user typed it ("Go" or "Go.gitignore")
//   entries:   The filtered listing, in server order
//   suffix:    The template suffix, e.g. ".gitignore"
//
// An entry matches when its path equals `requested`, or, when `requested`
// does not already end in `suffix`, when its path equals
// `requested + suffix`. With several candidates the first in listing
// order wins.
pub fn match_name<'a>(
    requested: &str,
    entries: &'a [TreeEntry],
    suffix: &str,
) -> Option<&'a TreeEntry> {
    let with_suffix = if suffix.is_empty() || requested.ends_with(suffix) {
        None
    } else {
        Some(format!("{}{}", requested, suffix))
    };

    entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .find(|entry| entry.path == requested || with_suffix.as_deref() == Some(entry.path.as_str()))
}

// Whether `entry` belongs in a listing filtered by `suffix`.
//
// The entry kind decides file vs directory, never the name.
pub fn is_listed(entry: &TreeEntry, suffix: &str) -> bool {
    entry.kind == EntryKind::File && entry.path.ends_with(suffix)
}
