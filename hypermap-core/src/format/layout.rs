//! On-disk layout capability flags
//!
//! The backing file is headerless: `N` elements in row-major order, native
//! byte order, no padding. External zero-copy readers (numpy's `memmap`,
//! for one) rely on the flags below describing that contract.

/// Named boolean descriptors of the storage layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutFlags {
    /// Every element is aligned to its natural alignment
    pub aligned: bool,
    /// Aligned, writeable and in native byte order
    pub behaved: bool,
    /// Row-major contiguous
    pub c_contiguous: bool,
    /// Storage is owned by the array, not borrowed from another
    pub owndata: bool,
    pub writeable: bool,
}

impl LayoutFlags {
    /// Flag names in the order returned by [`LayoutFlags::entries`]
    pub const NAMES: [&'static str; 5] = ["aligned", "behaved", "c_contiguous", "owndata", "writeable"];

    /// The flags of a segmented memory-mapped array
    ///
    /// All true: the segments are laid out back to back in the file exactly
    /// as one contiguous array would be.
    pub const fn mapped() -> Self {
        Self {
            aligned: true,
            behaved: true,
            c_contiguous: true,
            owndata: true,
            writeable: true,
        }
    }

    /// `(name, value)` pairs for every flag
    pub const fn entries(&self) -> [(&'static str, bool); 5] {
        [
            (Self::NAMES[0], self.aligned),
            (Self::NAMES[1], self.behaved),
            (Self::NAMES[2], self.c_contiguous),
            (Self::NAMES[3], self.owndata),
            (Self::NAMES[4], self.writeable),
        ]
    }

    /// Look up a flag by name
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries()
            .into_iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_flags_all_true() {
        let flags = LayoutFlags::mapped();
        assert!(flags.entries().iter().all(|(_, value)| *value));
        assert_eq!(flags.get("c_contiguous"), Some(true));
        assert_eq!(flags.get("owndata"), Some(true));
        assert_eq!(flags.get("fortran"), None);
    }
}
