//! Weapon systems: смена оружия и обработка запросов атак.

use bevy::prelude::*;

use crate::combat::effects::{EffectCue, EffectKind, EffectSchedule, GLOW_FLASH_DURATION, TRAIL_DURATION};
use crate::combat::events::{
    MeleeSwing, PrimaryAttackIntent, ProjectileLaunched, SecondaryAttackIntent, SwitchWeaponIntent,
    WeaponSelection,
};
use crate::combat::projectile::Projectile;
use crate::combat::weapon::AttackResolution;
use crate::combat::weapon_manager::WeaponManager;
use crate::components::Character;
use crate::logger;

/// System: SwitchWeaponIntent → WeaponManager.
pub fn process_weapon_switches(
    mut intents: EventReader<SwitchWeaponIntent>,
    mut managers: Query<&mut WeaponManager>,
) {
    for intent in intents.read() {
        let Ok(mut manager) = managers.get_mut(intent.entity) else {
            logger::log_warning(&format!("SwitchWeaponIntent: {:?} has no WeaponManager", intent.entity));
            continue;
        };
        match &intent.selection {
            WeaponSelection::Next => manager.switch_to_next(),
            WeaponSelection::Index(index) => manager.equip_by_index(*index),
            WeaponSelection::Name(name) => manager.equip_by_name(name),
        };
    }
}

/// System: запросы атак → активное оружие → resolution в том же тике.
///
/// - Melee: `MeleeSwing` event (цели ищет `resolve_melee_swings`)
/// - Ranged: спавн `Projectile` entity
///
/// Провал (cooldown, нет ресурсов, нет оружия) — тихий no-op:
/// повторить запрос в следующем тике — забота вызывающего.
pub fn process_attack_intents(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut primary_intents: EventReader<PrimaryAttackIntent>,
    mut secondary_intents: EventReader<SecondaryAttackIntent>,
    mut attackers: Query<(&mut WeaponManager, Option<&mut Character>, &Transform)>,
    mut swings: EventWriter<MeleeSwing>,
    mut launches: EventWriter<ProjectileLaunched>,
    mut cues: EventWriter<EffectCue>,
    mut schedule: ResMut<EffectSchedule>,
) {
    let now = time.elapsed_secs();

    for intent in secondary_intents.read() {
        if let Ok((mut manager, _, _)) = attackers.get_mut(intent.entity) {
            manager.request_secondary();
        }
    }

    for intent in primary_intents.read() {
        let Ok((mut manager, mut character, transform)) = attackers.get_mut(intent.entity) else {
            continue;
        };
        let Some(resolution) = manager.request_primary(now, character.as_deref_mut(), transform) else {
            continue;
        };

        match resolution {
            AttackResolution::Melee(strike) => {
                swings.write(MeleeSwing {
                    attacker: intent.entity,
                    strike,
                });
                let cue = EffectCue {
                    entity: intent.entity,
                    kind: EffectKind::TrailStarted,
                    position: strike.origin.position,
                };
                cues.write(cue);
                schedule.schedule(
                    now + TRAIL_DURATION,
                    EffectCue {
                        kind: EffectKind::TrailEnded,
                        ..cue
                    },
                );
            }
            AttackResolution::Ranged(launch) => {
                let projectile = commands
                    .spawn((
                        Projectile::from_launch(&launch, Some(intent.entity)),
                        Transform::from_translation(launch.origin.position),
                    ))
                    .id();
                launches.write(ProjectileLaunched {
                    shooter: intent.entity,
                    projectile,
                });
                let cue = EffectCue {
                    entity: intent.entity,
                    kind: EffectKind::GlowFlashStarted,
                    position: launch.origin.position,
                };
                cues.write(cue);
                schedule.schedule(
                    now + GLOW_FLASH_DURATION,
                    EffectCue {
                        kind: EffectKind::GlowFlashEnded,
                        ..cue
                    },
                );
                logger::log(&format!("🔥 {:?} launched projectile {:?}", intent.entity, projectile));
            }
        }
    }
}
