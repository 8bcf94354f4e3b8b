//! Tag identities.
//!
//! Every runtime value carries a tag; attribute lookup is keyed on tags.
//! Built-in variants and the conventional attribute names use fixed low
//! identities; everything else is minted from a process-wide monotonic
//! counter. A tag, once issued, is never recycled within a process.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(u64);

// Fixed identities for the built-in variants.
pub const UNIT: Tag = Tag(1);
pub const BOOL: Tag = Tag(2);
pub const NUMBER: Tag = Tag(3);
pub const STRING: Tag = Tag(4);
pub const ATOM: Tag = Tag(5);
pub const LIST: Tag = Tag(6);
pub const MUT: Tag = Tag(7);
pub const BLOCK: Tag = Tag(8);
/// The tag of tag values themselves.
pub const TAG: Tag = Tag(9);
pub const OPAQUE: Tag = Tag(10);

// Fixed identities for the conventional attribute names.
pub const ATTR_EQ: Tag = Tag(16);
pub const ATTR_STRINGER: Tag = Tag(17);
pub const ATTR_MATCHER: Tag = Tag(18);
pub const ATTR_RETURNER: Tag = Tag(19);

const FIRST_MINTED: u64 = 32;

static NEXT: AtomicU64 = AtomicU64::new(FIRST_MINTED);

impl Tag {
    /// Mint a fresh, process-unique tag.
    pub fn mint() -> Tag {
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        if id == u64::MAX {
            panic!("tag allocator overflow");
        }
        Tag(id)
    }
}
