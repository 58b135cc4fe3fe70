//! `/collection` response → [`OwnedGame`] records.

use std::collections::BTreeSet;

use roxmltree::{Document, Node};

use crate::error::BggError;
use crate::model::owned_game::OwnedGame;

use super::{parse_u32, required_attr};

/// The boolean-like status attributes BGG reports per collection item. A flag
/// whose value is "1" becomes a tag on the record.
const STATUS_FLAGS: [&str; 8] = [
    "fortrade",
    "own",
    "preordered",
    "prevowned",
    "want",
    "wanttobuy",
    "wanttoplay",
    "wishlist",
];

/// Parse a collection document into owned-game records, in document order.
/// A document with no `<item>` elements is an empty collection, not an error.
pub fn parse_collection(body: &str) -> Result<Vec<OwnedGame>, BggError> {
    let doc = Document::parse(body)
        .map_err(|e| BggError::Parse(format!("invalid collection XML: {}", e)))?;

    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("item"))
        .map(parse_item)
        .collect()
}

fn parse_item(item: Node) -> Result<OwnedGame, BggError> {
    let id = parse_u32(required_attr(item, "objectid")?, "objectid")?;

    let name = item
        .children()
        .find(|n| n.has_tag_name("name"))
        .and_then(|n| n.text())
        .ok_or_else(|| BggError::Parse(format!("collection item {} has no name", id)))?
        .to_string();

    let status = item
        .children()
        .find(|n| n.has_tag_name("status"))
        .ok_or_else(|| BggError::Parse(format!("collection item {} has no status", id)))?;
    let tags = status_tags(status);

    let numplays_text = item
        .children()
        .find(|n| n.has_tag_name("numplays"))
        .and_then(|n| n.text())
        .ok_or_else(|| BggError::Parse(format!("collection item {} has no numplays", id)))?;
    let numplays = parse_u32(numplays_text, "numplays")?;

    Ok(OwnedGame { id, name, tags, numplays })
}

/// Names of the fixed status flags whose value equals the "1" sentinel.
/// Any other value ("0", absent, or garbage) leaves the flag out.
fn status_tags(status: Node) -> BTreeSet<String> {
    STATUS_FLAGS
        .iter()
        .copied()
        .filter(|flag| status.attribute(*flag) == Some("1"))
        .map(str::to_string)
        .collect()
}
