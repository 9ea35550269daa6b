use json::{object::Object, JsonValue};

use crate::model::{
    ids::PlayerTag,
    role::PerRole,
    stats::{Averages, PlayerStats, RoleStats},
};

use super::number_of;

/// Builds per-role stats from a competitive stats summary payload.
///
/// Roles the payload does not report come back as explicit `None`, as does
/// everything when `roles` is missing or the payload is not an object.
pub fn parse_player_stats(json: &JsonValue, tag: PlayerTag) -> PlayerStats {
    let roles = match json {
        JsonValue::Object(root) => &root["roles"],
        _ => return PlayerStats::empty(tag),
    };

    match roles {
        JsonValue::Object(roles_obj) => PlayerStats {
            tag,
            roles: PerRole::from_fn(|role| parse_role_stats(&roles_obj[role.key()])),
        },
        _ => PlayerStats::empty(tag),
    }
}

fn parse_role_stats(json: &JsonValue) -> Option<RoleStats> {
    if let JsonValue::Object(obj) = json {
        return Some(RoleStats {
            games_played: number_of(&obj["games_played"]),
            winrate: number_of(&obj["winrate"]),
            average: parse_averages(obj),
        });
    }

    None
}

fn parse_averages(role: &Object) -> Averages {
    let average = &role["average"];
    Averages {
        eliminations: number_of(&average["eliminations"]),
        damage: number_of(&average["damage"]),
        deaths: number_of(&average["deaths"]),
        healing: number_of(&average["healing"]),
    }
}
