//! XML-to-record extraction.
//!
//! Each extractor walks one already-transported response document with
//! explicit per-field functions; a missing required field aborts the whole
//! response with [`BggError::Parse`], never a partial item list.

mod catalog;
mod collection;

pub use catalog::parse_game_details;
pub use collection::parse_collection;

use roxmltree::Node;

use crate::error::BggError;

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, BggError> {
    node.attribute(name).ok_or_else(|| {
        BggError::Parse(format!("<{}> is missing the '{}' attribute", node.tag_name().name(), name))
    })
}

fn parse_u32(text: &str, what: &str) -> Result<u32, BggError> {
    text.trim()
        .parse()
        .map_err(|_| BggError::Parse(format!("{} is not an integer: '{}'", what, text)))
}
