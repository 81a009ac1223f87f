//! Отложенные визуальные cue оружия (trail меча, вспышка посоха)
//!
//! Вместо корутин — очередь, отсортированная по времени срабатывания.
//! Core не рисует эффекты, он только сообщает когда их включить/выключить.

use bevy::prelude::*;

/// Melee trail горит 0.3 s после взмаха.
pub const TRAIL_DURATION: f32 = 0.3;

/// Вспышка посоха при выстреле.
pub const GLOW_FLASH_DURATION: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    TrailStarted,
    TrailEnded,
    GlowFlashStarted,
    GlowFlashEnded,
    Impact,
}

/// Event: визуальный cue для presentation слоя.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectCue {
    pub entity: Entity,
    pub kind: EffectKind,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledCue {
    due_at: f32,
    sequence: u64,
    cue: EffectCue,
}

/// Очередь cue, ключ — время срабатывания (секунды `Time<Fixed>`).
#[derive(Resource, Debug, Default)]
pub struct EffectSchedule {
    pending: Vec<ScheduledCue>,
    next_sequence: u64,
}

impl EffectSchedule {
    pub fn schedule(&mut self, due_at: f32, cue: EffectCue) {
        self.pending.push(ScheduledCue {
            due_at,
            sequence: self.next_sequence,
            cue,
        });
        self.next_sequence += 1;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Забирает все cue с `due_at <= now` в порядке (время, постановка).
    pub fn take_due(&mut self, now: f32) -> Vec<EffectCue> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|entry| entry.due_at <= now);
        self.pending = pending;

        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.sequence.cmp(&b.sequence)));
        due.into_iter().map(|entry| entry.cue).collect()
    }
}

/// System: выпустить созревшие cue.
pub fn dispatch_effect_cues(
    time: Res<Time<Fixed>>,
    mut schedule: ResMut<EffectSchedule>,
    mut cues: EventWriter<EffectCue>,
) {
    if schedule.is_empty() {
        return;
    }
    for cue in schedule.take_due(time.elapsed_secs()) {
        cues.write(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(kind: EffectKind) -> EffectCue {
        EffectCue {
            entity: Entity::from_raw(1),
            kind,
            position: Vec3::ZERO,
        }
    }

    #[test]
    fn test_take_due_respects_time_and_order() {
        let mut schedule = EffectSchedule::default();
        schedule.schedule(0.3, cue(EffectKind::TrailEnded));
        schedule.schedule(0.1, cue(EffectKind::GlowFlashEnded));
        schedule.schedule(0.3, cue(EffectKind::Impact));

        assert!(schedule.take_due(0.05).is_empty());

        let first = schedule.take_due(0.1);
        assert_eq!(first, vec![cue(EffectKind::GlowFlashEnded)]);

        let rest = schedule.take_due(1.0);
        assert_eq!(rest, vec![cue(EffectKind::TrailEnded), cue(EffectKind::Impact)]);
        assert!(schedule.is_empty());
    }
}
