mod enemies;
mod hazards;
mod player;
mod props;
mod triggers;

#[cfg(test)]
mod tests;

use engine::{CollisionGroups, Entity, EntityFactory, FactoryError, Vec2};

use player::Rockman;

pub(crate) mod models {
    use engine::ModelId;

    pub(crate) const ROCKMAN: ModelId = 1;
    pub(crate) const BULLET: ModelId = 2;
    pub(crate) const BONUS: ModelId = 3;
    pub(crate) const SPIKES: ModelId = 4;
    pub(crate) const LADDER: ModelId = 5;
    pub(crate) const RECT: ModelId = 6;
    pub(crate) const DOOR: ModelId = 7;
    pub(crate) const CHEST: ModelId = 8;
    pub(crate) const SKELETON: ModelId = 9;
    pub(crate) const HOPPER: ModelId = 10;
    pub(crate) const CADAVER: ModelId = 11;
}

pub(crate) mod sounds {
    use engine::SoundId;

    pub(crate) const JUMP: SoundId = 1;
    pub(crate) const FIRE: SoundId = 2;
    pub(crate) const HURT: SoundId = 3;
    pub(crate) const DIE: SoundId = 4;
    pub(crate) const LAND: SoundId = 5;
    pub(crate) const VICTORY: SoundId = 6;
    pub(crate) const SWITCH: SoundId = 7;
    pub(crate) const DOOR: SoundId = 8;
    pub(crate) const HURT_ENEMY: SoundId = 9;
    pub(crate) const DIE_ENEMY: SoundId = 10;
}

/// Bits of the upgrade mask stored under `engine::UPGRADES_KEY`.
pub(crate) mod upgrades {
    pub(crate) const WHIP: i32 = 1 << 0;
    pub(crate) const CLIMB: i32 = 1 << 1;
    pub(crate) const KEY: i32 = 1 << 2;
}

/// Counts a delay down to zero.
pub(crate) fn decrement(value: &mut i32) {
    if *value > 0 {
        *value -= 1;
    }
}

/// Starts `delay` when it has run out; reports whether it did.
pub(crate) fn try_activate(delay: &mut i32, duration: i32) -> bool {
    if *delay > 0 {
        return false;
    }
    *delay = duration;
    true
}

fn boxed(entity: impl Entity + 'static) -> Result<Box<dyn Entity>, FactoryError> {
    Ok(Box::new(entity))
}

/// Every entity type a room file may name.
pub(crate) fn build_factory() -> EntityFactory {
    let mut factory = EntityFactory::default();
    factory
        .register("player", |_| boxed(Rockman::new()))
        .register("spikes", |_| boxed(hazards::Spikes::new()))
        .register("conveyor", |config| {
            let speed = config.get_float("0", hazards::CONVEYOR_SPEED)?;
            boxed(hazards::Conveyor::new(speed))
        })
        .register("skeleton", |_| boxed(enemies::Walker::new(enemies::SKELETON)))
        .register("hopper", |_| boxed(enemies::Walker::new(enemies::HOPPER)))
        .register("cadaver", |_| boxed(enemies::Cadaver::new(Vec2::ZERO)))
        .register("ladder", |_| boxed(props::Ladder::new()))
        .register("door", |config| {
            boxed(props::Door::new(config.get_int("0", 0)?))
        })
        .register("upgrade_whip", |_| {
            boxed(props::Bonus::new(3, upgrades::WHIP, "You got the WHIP (press Z)"))
        })
        .register("upgrade_climb", |_| {
            boxed(props::Bonus::new(4, upgrades::CLIMB, "You can climb ladders now (press Up)"))
        })
        .register("upgrade_key", |_| {
            boxed(props::Bonus::new(6, upgrades::KEY, "Got the KEY. Now find the chest."))
        })
        .register("bonus_life", |_| boxed(props::Bonus::new(0, 0, "Life up")))
        .register("detector", |config| {
            boxed(triggers::Detector::new(config.get_int("0", 0)?))
        })
        .register("room_boundary", |config| {
            let target = config.get_int("0", 0)?;
            let target_room = usize::try_from(target).map_err(|_| FactoryError::InvalidValue {
                key: "0".to_string(),
                value: target.to_string(),
                expected: "a room index",
            })?;
            let dx = config.get_float("1", 0.0)?;
            let dy = config.get_float("2", 0.0)?;
            boxed(triggers::RoomBoundaryDetector::new(
                target_room,
                Vec2::new(dx, dy),
            ))
        })
        .register("blocker", |config| {
            let bits = config.get_int("0", CollisionGroups::PLAYER.bits() as i32)?;
            let groups = CollisionGroups::from_bits_truncate(bits as u32);
            boxed(triggers::RoomBoundaryBlocker::new(groups))
        })
        .register("chest", |config| {
            boxed(triggers::FinishTrigger::new(config.get_int("0", 0)?))
        });
    factory
}
