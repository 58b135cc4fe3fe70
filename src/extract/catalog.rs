//! `/thing?stats=1` response → [`GameDetail`] records, including the
//! suggested-player-count derivation.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::BggError;
use crate::model::game_detail::{ExpansionLink, GameDetail, PlayerCountVerdict, Verdict};

use super::{parse_u32, required_attr};

/// Parse a thing document into game-detail records, in document order.
pub fn parse_game_details(body: &str) -> Result<Vec<GameDetail>, BggError> {
    let doc = Document::parse(body)
        .map_err(|e| BggError::Parse(format!("invalid thing XML: {}", e)))?;

    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("item"))
        .map(parse_item)
        .collect()
}

fn parse_item(item: Node) -> Result<GameDetail, BggError> {
    let id = parse_u32(required_attr(item, "id")?, "item id")?;
    let game_type = required_attr(item, "type")?.to_string();

    let name = item
        .children()
        .find(|n| n.has_tag_name("name") && n.attribute("type") == Some("primary"))
        .and_then(|n| n.attribute("value"))
        .ok_or_else(|| BggError::Parse(format!("item {} has no primary name", id)))?
        .to_string();

    // An empty <description/> is legal; a missing one is not.
    let description = item
        .children()
        .find(|n| n.has_tag_name("description"))
        .ok_or_else(|| BggError::Parse(format!("item {} has no description", id)))?
        .text()
        .unwrap_or_default()
        .to_string();

    let image = item
        .children()
        .find(|n| n.has_tag_name("thumbnail"))
        .and_then(|n| n.text())
        .map(str::to_string);

    let categories = link_values(item, "boardgamecategory");
    let mechanics = link_values(item, "boardgamemechanic");
    let expansions = expansion_links(item)?;
    let suggested_numplayers = derive_player_counts(player_count_groups(item)?);

    let ratings = item
        .children()
        .find(|n| n.has_tag_name("statistics"))
        .and_then(|n| n.children().find(|c| c.has_tag_name("ratings")))
        .ok_or_else(|| BggError::Parse(format!("item {} has no statistics/ratings", id)))?;

    let weight = rating_value(ratings, "averageweight", id)?;
    let rating = rating_value(ratings, "bayesaverage", id)?;
    let rank = board_game_rank(ratings, id)?;

    let playing_time = item
        .children()
        .find(|n| n.has_tag_name("playingtime"))
        .and_then(|n| n.attribute("value"))
        .ok_or_else(|| BggError::Parse(format!("item {} has no playingtime", id)))?
        .to_string();

    debug!(name = %name, id, "parsed game");

    Ok(GameDetail {
        id,
        game_type,
        name,
        description,
        image,
        categories,
        mechanics,
        expansions,
        suggested_numplayers,
        weight,
        rank,
        rating,
        playing_time,
    })
}

/// Values of all `<link>` elements of the given type, in document order.
fn link_values(item: Node, link_type: &str) -> Vec<String> {
    item.children()
        .filter(|n| n.has_tag_name("link") && n.attribute("type") == Some(link_type))
        .filter_map(|n| n.attribute("value").map(str::to_string))
        .collect()
}

fn expansion_links(item: Node) -> Result<Vec<ExpansionLink>, BggError> {
    item.children()
        .filter(|n| n.has_tag_name("link") && n.attribute("type") == Some("boardgameexpansion"))
        .map(|n| {
            let id = parse_u32(required_attr(n, "id")?, "expansion link id")?;
            // The inbound marker only appears on links pointing back at a base game.
            let inbound = n
                .attribute("inbound")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false);
            Ok(ExpansionLink { id, inbound })
        })
        .collect()
}

fn rating_value(ratings: Node, tag: &str, item_id: u32) -> Result<String, BggError> {
    ratings
        .children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.attribute("value"))
        .map(str::to_string)
        .ok_or_else(|| BggError::Parse(format!("item {} has no {}", item_id, tag)))
}

fn board_game_rank(ratings: Node, item_id: u32) -> Result<String, BggError> {
    ratings
        .children()
        .find(|n| n.has_tag_name("ranks"))
        .and_then(|ranks| {
            ranks.children().find(|n| {
                n.has_tag_name("rank") && n.attribute("friendlyname") == Some("Board Game Rank")
            })
        })
        .and_then(|n| n.attribute("value"))
        .map(str::to_string)
        .ok_or_else(|| BggError::Parse(format!("item {} has no Board Game Rank", item_id)))
}

/// Vote counts for one player-count group. Categories the poll never reported
/// stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct VoteTally {
    best: u32,
    recommended: u32,
    not_recommended: u32,
}

/// Collect the `suggested_numplayers` poll groups as (player count, tally)
/// pairs, in document order.
fn player_count_groups(item: Node) -> Result<Vec<(String, VoteTally)>, BggError> {
    let mut groups = Vec::new();
    for poll in item
        .children()
        .filter(|n| n.has_tag_name("poll") && n.attribute("name") == Some("suggested_numplayers"))
    {
        for results in poll.children().filter(|n| n.has_tag_name("results")) {
            let players = required_attr(results, "numplayers")?.to_string();
            groups.push((players, tally_votes(results)?));
        }
    }
    Ok(groups)
}

fn tally_votes(results: Node) -> Result<VoteTally, BggError> {
    let mut tally = VoteTally::default();
    for result in results.children().filter(|n| n.has_tag_name("result")) {
        let value = required_attr(result, "value")?.to_lowercase().replace(' ', "_");
        let numvotes = parse_u32(required_attr(result, "numvotes")?, "numvotes")?;
        match value.as_str() {
            "best" => tally.best = numvotes,
            "recommended" => tally.recommended = numvotes,
            "not_recommended" => tally.not_recommended = numvotes,
            _ => {}
        }
    }
    Ok(tally)
}

fn classify(tally: VoteTally) -> Verdict {
    if tally.best + tally.recommended <= tally.not_recommended {
        return Verdict::NotRecommended;
    }
    if tally.best > 10 && tally.best > tally.recommended {
        return Verdict::Best;
    }
    Verdict::Recommended
}

/// Classify every group, drop the not-recommended ones, and promote a sole
/// survivor to `Best`.
fn derive_player_counts(groups: Vec<(String, VoteTally)>) -> Vec<PlayerCountVerdict> {
    let mut verdicts: Vec<PlayerCountVerdict> = groups
        .into_iter()
        .map(|(players, tally)| PlayerCountVerdict { players, verdict: classify(tally) })
        .filter(|p| p.verdict != Verdict::NotRecommended)
        .collect();

    if verdicts.len() == 1 {
        verdicts[0].verdict = Verdict::Best;
    }

    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(best: u32, recommended: u32, not_recommended: u32) -> VoteTally {
        VoteTally { best, recommended, not_recommended }
    }

    #[test]
    fn classification_table() {
        assert_eq!(classify(tally(15, 2, 1)), Verdict::Best);
        assert_eq!(classify(tally(3, 4, 1)), Verdict::Recommended);
        assert_eq!(classify(tally(0, 1, 5)), Verdict::NotRecommended);
        // No votes at all means nobody recommends it
        assert_eq!(classify(tally(0, 0, 0)), Verdict::NotRecommended);
    }

    #[test]
    fn best_needs_more_than_ten_votes_and_a_majority() {
        assert_eq!(classify(tally(10, 2, 1)), Verdict::Recommended);
        assert_eq!(classify(tally(11, 11, 1)), Verdict::Recommended);
        assert_eq!(classify(tally(11, 10, 1)), Verdict::Best);
    }

    #[test]
    fn not_recommended_groups_are_dropped() {
        let out = derive_player_counts(vec![
            ("1".into(), tally(0, 1, 40)),
            ("2".into(), tally(20, 5, 1)),
            ("3".into(), tally(2, 30, 3)),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].players, "2");
        assert_eq!(out[0].verdict, Verdict::Best);
        assert_eq!(out[1].players, "3");
        assert_eq!(out[1].verdict, Verdict::Recommended);
    }

    #[test]
    fn sole_survivor_is_promoted_to_best() {
        // Rule 2 alone would classify "2" as merely recommended
        let out = derive_player_counts(vec![
            ("1".into(), tally(0, 0, 12)),
            ("2".into(), tally(3, 9, 2)),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].players, "2");
        assert_eq!(out[0].verdict, Verdict::Best);
    }

    #[test]
    fn two_survivors_keep_their_own_verdicts() {
        let out = derive_player_counts(vec![
            ("2".into(), tally(12, 1, 0)),
            ("4".into(), tally(1, 12, 0)),
        ]);
        assert_eq!(out[0].verdict, Verdict::Best);
        assert_eq!(out[1].verdict, Verdict::Recommended);
    }

    #[test]
    fn no_groups_yield_no_verdicts() {
        assert!(derive_player_counts(Vec::new()).is_empty());
    }
}
