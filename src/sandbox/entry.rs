use std::fmt;

/// Kind tag shown in directory listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::Dir => "[DIR]",
            EntryKind::File => "[FILE]",
        }
    }
}

/// An immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name only, no parent components
    pub name: String,
    pub kind: EntryKind,
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.tag(), self.name)
    }
}
