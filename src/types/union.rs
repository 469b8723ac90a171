//! Union algebra shared by [`AstType`](super::AstType) and
//! [`MType`](super::MType).
//!
//! Both type models are deduplicated collections of entries. They only
//! differ in their entry vocabulary, so the merge policy is written once
//! against the [`UnionEntry`] trait:
//!
//! - an entry already present (structural equality) is dropped;
//! - an entry that [`UnionEntry::merge`]s with an accumulated entry replaces
//!   it by the merged entry;
//! - anything else is appended.
//!
//! Accumulated entries are pairwise unmergeable, so a merged entry can never
//! collide with a third one. That keeps the operation commutative,
//! associative and idempotent.

/// One disjunct of a union type.
pub trait UnionEntry: Clone + PartialEq {
    /// The universal entry that absorbs every union.
    fn is_any(&self) -> bool;

    /// Combine two distinct entries of the same shape into one, or `None` if
    /// they have to stay separate members of the union.
    fn merge(&self, other: &Self) -> Option<Self>;
}

/// Add `entry` to an accumulated entry set.
pub fn insert_entry<E: UnionEntry>(entries: &mut Vec<E>, entry: E) {
    if entries.contains(&entry) {
        return;
    }

    for existing in entries.iter_mut() {
        if let Some(merged) = existing.merge(&entry) {
            *existing = merged;
            return;
        }
    }

    entries.push(entry);
}

/// Union of two entry sets, both assumed to be already normalized.
///
/// The caller handles the identity element and the `any` short-circuit.
pub fn union_entries<E: UnionEntry>(left: &[E], right: &[E]) -> Vec<E> {
    let mut entries = left.to_vec();
    for entry in right {
        insert_entry(&mut entries, entry.clone());
    }
    entries
}

/// Set equality over two deduplicated entry lists.
pub fn same_entries<E: PartialEq>(left: &[E], right: &[E]) -> bool {
    left.len() == right.len() && left.iter().all(|entry| right.contains(entry))
}
