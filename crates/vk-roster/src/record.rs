//! Conversion between [`Character`] and its JSON record in `characters.json`.
//!
//! Flags are written as `0`/`1` integers and the activity as three
//! `*_active` flags. On the way back every scalar goes through the
//! validator with the bounds below, so a hand-edited or damaged record
//! always yields a character that satisfies the model's invariants.

use serde::Serialize;
use serde_json::{Map, Value};
use vk_core::character::{ATTRIBUTE_MAX, BONDS_MAX, EXP_MAX, MOMENTUM_MIN, RESOURCE_MAX};
use vk_core::validate::{ValidationReport, validate_double, validate_int};
use vk_core::{ActivityKind, Character, CharacterId, Debility, Weapon};

/// Upper bound used when reading momentum back. The live ceiling depends on
/// debilities and is only enforced on the next momentum change.
const MOMENTUM_READ_MAX: i64 = 10;

#[derive(Serialize)]
struct CharacterRecord<'a> {
    name: &'a str,
    id: u32,
    edge: i32,
    heart: i32,
    iron: i32,
    shadow: i32,
    wits: i32,
    exp: i32,
    momentum: i32,
    max_momentum: i32,
    momentum_reset: i32,
    health: i32,
    spirit: i32,
    supply: i32,
    wounded: u8,
    unprepared: u8,
    shaken: u8,
    encumbered: u8,
    maimed: u8,
    cursed: u8,
    dead: u8,
    weapon: i32,
    corrupted: u8,
    tormented: u8,
    exp_used: i32,
    bonds: f64,
    journey_active: u8,
    fight_active: u8,
    delve_active: u8,
}

/// Serialize a character into its roster record.
pub fn to_record(character: &Character) -> Value {
    let flag = |d: Debility| u8::from(character.debilities.get(d));
    let active = |k: ActivityKind| u8::from(character.activity.is(k));

    let record = CharacterRecord {
        name: &character.name,
        id: character.id.get(),
        edge: character.edge,
        heart: character.heart,
        iron: character.iron,
        shadow: character.shadow,
        wits: character.wits,
        exp: character.exp,
        momentum: character.momentum,
        max_momentum: character.max_momentum(),
        momentum_reset: character.momentum_reset(),
        health: character.health,
        spirit: character.spirit,
        supply: character.supply,
        wounded: flag(Debility::Wounded),
        unprepared: flag(Debility::Unprepared),
        shaken: flag(Debility::Shaken),
        encumbered: flag(Debility::Encumbered),
        maimed: flag(Debility::Maimed),
        cursed: flag(Debility::Cursed),
        dead: u8::from(character.dead),
        weapon: character.weapon.level(),
        corrupted: flag(Debility::Corrupted),
        tormented: flag(Debility::Tormented),
        exp_used: character.exp_used,
        bonds: character.bonds,
        journey_active: active(ActivityKind::Journey),
        fight_active: active(ActivityKind::Fight),
        delve_active: active(ActivityKind::Delve),
    };

    // A struct of plain numbers and a string always serializes.
    serde_json::to_value(record).unwrap_or(Value::Null)
}

/// The raw `id` of a record, if it has one.
pub fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// The `name` of a record, if it has one.
pub fn record_name(record: &Value) -> Option<&str> {
    record.get("name").and_then(Value::as_str)
}

/// Rebuild a character from its record.
///
/// Returns the character with its activity still inactive, plus the
/// activity the record claims. When a damaged record claims several, a
/// fight wins over a delve, which wins over a journey.
pub fn from_record(
    record: &Map<String, Value>,
    id: CharacterId,
    report: &mut ValidationReport,
) -> (Character, Option<ActivityKind>) {
    let name = match record.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            tracing::warn!(%id, "record has no name");
            format!("character-{id}")
        }
    };

    let mut c = Character::new(id, name);
    let attr = |field: &str, report: &mut ValidationReport| {
        validate_int(record, field, 0, i64::from(ATTRIBUTE_MAX), 1, report) as i32
    };
    c.edge = attr("edge", report);
    c.heart = attr("heart", report);
    c.iron = attr("iron", report);
    c.shadow = attr("shadow", report);
    c.wits = attr("wits", report);

    c.exp = validate_int(record, "exp", 0, i64::from(EXP_MAX), 0, report) as i32;
    c.exp_used = validate_int(record, "exp_used", 0, i64::from(c.exp), 0, report) as i32;

    let resource = |field: &str, report: &mut ValidationReport| {
        let max = i64::from(RESOURCE_MAX);
        validate_int(record, field, 0, max, max, report) as i32
    };
    c.health = resource("health", report);
    c.spirit = resource("spirit", report);
    c.supply = resource("supply", report);

    for debility in Debility::ALL {
        let set = validate_int(record, debility.name(), 0, 1, 0, report) == 1;
        c.debilities.set(debility, set);
    }
    c.dead = validate_int(record, "dead", 0, 1, 0, report) == 1;

    let weapon = validate_int(record, "weapon", 1, 2, 1, report);
    c.weapon = Weapon::from_level(weapon).unwrap_or_default();
    c.bonds = validate_double(record, "bonds", 0.0, BONDS_MAX, 1.0, report);
    c.momentum = validate_int(
        record,
        "momentum",
        i64::from(MOMENTUM_MIN),
        MOMENTUM_READ_MAX,
        2,
        report,
    ) as i32;

    // max_momentum and momentum_reset are stored for older readers only
    c.refresh_momentum_limits();

    let claimed = ActivityKind::PRECEDENCE.into_iter().find(|kind| {
        let field = match kind {
            ActivityKind::Journey => "journey_active",
            ActivityKind::Fight => "fight_active",
            ActivityKind::Delve => "delve_active",
        };
        validate_int(record, field, 0, 1, 0, report) == 1
    });

    (c, claimed)
}
