//! Image slot entity and identity rules

use std::fmt;

/// Opaque, store-assigned slot identity
///
/// Never derived from a slot's tag or location, and never handed out twice by the
/// same board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

impl SlotId {
    /// Raw numeric value of the identity
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// Hands out fresh slot identities in increasing order
#[derive(Debug, Clone, Default)]
pub struct SlotIdAllocator {
    next: u64,
}

impl SlotIdAllocator {
    /// Create an allocator starting at `slot-0`
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Take the next unused identity
    pub const fn allocate(&mut self) -> SlotId {
        let id = SlotId(self.next);
        self.next += 1;
        id
    }
}

/// Where a slot's image location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrigin {
    /// Returned by the Fetch Adapter
    Fetched,
    /// Taken from the local placeholder set
    Fallback,
}

/// One board position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    /// Stable identity for the slot's lifetime
    pub id: SlotId,
    /// URI or path of the image resource
    pub location: String,
    /// Label used for search, similarity and display
    pub tag: String,
    /// Exempt from regeneration and used as a similarity seed
    pub is_locked: bool,
    /// Index in the ordered collection, kept in sync on every mutation
    pub position: usize,
    /// Whether the location was fetched or substituted locally
    pub origin: SlotOrigin,
}

impl ImageSlot {
    /// Whether the location points at a remote resource
    pub fn is_remote(&self) -> bool {
        is_remote_location(&self.location)
    }
}

/// Content for a slot that has not been given an identity yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFill {
    /// URI or path of the image resource
    pub location: String,
    /// Label for the new slot
    pub tag: String,
    /// Where the location came from
    pub origin: SlotOrigin,
}

impl SlotFill {
    /// Content returned by the Fetch Adapter
    pub fn fetched(location: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            tag: tag.into(),
            origin: SlotOrigin::Fetched,
        }
    }

    /// Content taken from the local placeholder set
    pub fn fallback(location: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            tag: tag.into(),
            origin: SlotOrigin::Fallback,
        }
    }
}

/// Whether a location string names an `http://` or `https://` resource
pub fn is_remote_location(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
