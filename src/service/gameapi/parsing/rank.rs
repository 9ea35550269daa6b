use json::{object::Object, JsonValue};

use crate::model::{
    ids::PlayerTag,
    rank::RankRecord,
    role::{PerRole, Role},
};

use super::text_of;

/// Builds the rank record from a player summary payload.
///
/// A missing `competitive.pc` section and a payload that is not an object at all
/// are the same case: the player has no competitive presence and every role is `None`.
pub fn parse_rank(json: &JsonValue, tag: PlayerTag) -> RankRecord {
    let pc = match json {
        JsonValue::Object(root) => &root["competitive"]["pc"],
        _ => return RankRecord::unranked(tag),
    };

    match pc {
        JsonValue::Object(pc_obj) => RankRecord {
            tag,
            ranks: PerRole::from_fn(|role| parse_role_rank(pc_obj, role)),
        },
        _ => RankRecord::unranked(tag),
    }
}

fn parse_role_rank(pc: &Object, role: Role) -> Option<String> {
    match &pc[role.key()] {
        JsonValue::Object(rank) => {
            let division = text_of(&rank["division"])?;
            let tier = text_of(&rank["tier"])?;
            Some(format!("{}{}", division, tier))
        }
        // Already flat, keep it
        value => text_of(value),
    }
}
