use std::collections::BTreeSet;

use serde::Serialize;

/// One game from a user's collection response.
///
/// `tags` holds the names of the status flags that were set ("own",
/// "wishlist", ...). Built entirely from one `/collection` document and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedGame {
    pub id: u32,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub numplays: u32,
}
