//! Identity of server records.
//!
//! Cache entries are replaced wholesale, so a record's id is the only link
//! between its copy in one snapshot and its copy in the next.

use core::fmt::Debug;
use core::hash::Hash;

pub trait Entity {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;
}

/// First record in `records` carrying `id`.
pub fn find_by_id<'a, E: Entity>(records: &'a [E], id: &E::Id) -> Option<&'a E> {
    records.iter().find(|r| r.id() == id)
}
