// src/contents.rs
// =============================================================================
// Downloaded template contents, and merging them into one document.
//
// Each successful download becomes a NamedContents. `merge` stitches a list
// of them together, giving each a "# Name" header so the combined
// .gitignore stays readable:
//
//   # Go
//   *.o
//
//   # Vim
//   *.swp
// =============================================================================

use std::path::Path;

/// A file's canonical path in the tree, and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedContents {
    pub name: String,
    pub contents: String,
}

impl NamedContents {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        NamedContents {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// The base name without its extension: "Global/Vim.gitignore" -> "Vim".
    pub fn display_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }
}

/// Renders all contents as one document, in the order given.
pub fn merge(contents: &[NamedContents]) -> String {
    let sections: Vec<String> = contents
        .iter()
        .map(|nc| {
            let mut section = format!("# {}\n{}", nc.display_name(), nc.contents);
            if !section.ends_with('\n') {
                section.push('\n');
            }
            section
        })
        .collect();

    sections.join("\n")
}
