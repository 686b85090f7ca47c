//! Per-level flow: normal play, the rescue cutscene, and the fade that leads
//! into the next level.

use girder_rescue_core::{EntityId, EntityKind, Event, LevelPhase, Rect, SpawnPoint};

/// Both axes must be within this range of the captive to trigger the rescue.
pub(crate) const RESCUE_RANGE: f32 = 30.0;

const CUTSCENE_TICKS: u32 = 240;
const TRANSITION_TICKS: u32 = 60;
const NPC_SPEED: f32 = 1.5;

// Escape cutscene keyframes (non-final levels).
const GRAB_TICK: u32 = 60;
const RETREAT_START: u32 = 90;
const RETREAT_END: u32 = 180;

// Rescue cutscene keyframes (final level).
const FREED_TICK: u32 = 60;
const CELEBRATE_TICK: u32 = 120;
const COMPLETE_TICK: u32 = 180;

const CAPTOR_W: f32 = 48.0;
const CAPTOR_H: f32 = 32.0;
const CAPTIVE_W: f32 = 24.0;
const CAPTIVE_H: f32 = 32.0;

/// A cutscene actor: the captor or the captive.
#[derive(Debug)]
pub(crate) struct Npc {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) rect: Rect,
    pub(crate) visible: bool,
    pub(crate) sprite: u32,
}

impl Npc {
    pub(crate) fn captor(id: EntityId, at: SpawnPoint) -> Self {
        Self {
            id,
            kind: EntityKind::Captor,
            rect: Rect::new(at.x, at.y, CAPTOR_W, CAPTOR_H),
            visible: true,
            sprite: 0,
        }
    }

    pub(crate) fn captive(id: EntityId, at: SpawnPoint) -> Self {
        Self {
            id,
            kind: EntityKind::Captive,
            rect: Rect::new(at.x, at.y, CAPTIVE_W, CAPTIVE_H),
            visible: true,
            sprite: 0,
        }
    }

    fn step_toward(&mut self, target: SpawnPoint) {
        self.rect.x = step_axis(self.rect.x, target.x, NPC_SPEED);
        self.rect.y = step_axis(self.rect.y, target.y, NPC_SPEED);
    }
}

fn step_axis(value: f32, target: f32, speed: f32) -> f32 {
    let delta = target - value;
    if delta.abs() <= speed {
        target
    } else {
        value + speed * delta.signum()
    }
}

/// State machine that sequences one level from load to hand-off.
#[derive(Debug)]
pub(crate) struct LevelFlow {
    phase: LevelPhase,
    ticks: u32,
    final_level: bool,
    exit: SpawnPoint,
    next_level: u32,
    completed_emitted: bool,
}

impl LevelFlow {
    /// Flow state before any blueprint has been supplied.
    pub(crate) fn idle() -> Self {
        Self {
            phase: LevelPhase::Loading,
            ticks: 0,
            final_level: false,
            exit: SpawnPoint { x: 0.0, y: 0.0 },
            next_level: 1,
            completed_emitted: false,
        }
    }

    pub(crate) fn begin(level: u32, final_level: bool, exit: SpawnPoint) -> Self {
        Self {
            phase: LevelPhase::Playing,
            ticks: 0,
            final_level,
            exit,
            next_level: level.saturating_add(1),
            completed_emitted: false,
        }
    }

    pub(crate) fn phase(&self) -> LevelPhase {
        self.phase
    }

    fn change_phase(&mut self, to: LevelPhase, out: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = to;
        self.ticks = 0;
        out.push(Event::LevelPhaseChanged { from, to });
        log::debug!("level phase {from:?} -> {to:?}");
    }

    /// Begins the rescue cutscene. No-op outside the playing phase, so the
    /// trigger fires at most once per level.
    pub(crate) fn trigger_victory(&mut self, out: &mut Vec<Event>) {
        if self.phase == LevelPhase::Playing {
            self.change_phase(LevelPhase::Victory, out);
        }
    }

    pub(crate) fn tick(
        &mut self,
        captor: Option<&mut Npc>,
        captive: Option<&mut Npc>,
        out: &mut Vec<Event>,
    ) {
        match self.phase {
            LevelPhase::Playing | LevelPhase::Loading => {}
            LevelPhase::Victory => self.tick_victory(captor, captive, out),
            LevelPhase::Transition => {
                self.ticks += 1;
                if self.ticks == TRANSITION_TICKS {
                    let level = self.next_level;
                    self.change_phase(LevelPhase::Loading, out);
                    out.push(Event::LevelLoadRequested { level });
                }
            }
        }
    }

    fn tick_victory(
        &mut self,
        captor: Option<&mut Npc>,
        captive: Option<&mut Npc>,
        out: &mut Vec<Event>,
    ) {
        let t = self.ticks;
        if self.final_level {
            self.tick_rescue(t, captor, captive, out);
            self.ticks = self.ticks.saturating_add(1);
            return;
        }

        self.tick_escape(t, captor, captive);
        self.ticks += 1;
        if self.ticks == CUTSCENE_TICKS {
            self.change_phase(LevelPhase::Transition, out);
        }
    }

    fn tick_escape(&self, t: u32, captor: Option<&mut Npc>, captive: Option<&mut Npc>) {
        let (Some(captor), Some(captive)) = (captor, captive) else {
            return;
        };
        if t == GRAB_TICK {
            captive.rect.x = captor.rect.center_x() - captive.rect.w / 2.0;
            captive.rect.y = captor.rect.y - captive.rect.h;
        } else if (RETREAT_START..RETREAT_END).contains(&t) {
            captor.step_toward(self.exit);
            captive.step_toward(SpawnPoint {
                x: self.exit.x,
                y: self.exit.y - captive.rect.h,
            });
        } else if t == RETREAT_END {
            captor.visible = false;
            captive.visible = false;
        }
    }

    fn tick_rescue(
        &mut self,
        t: u32,
        captor: Option<&mut Npc>,
        captive: Option<&mut Npc>,
        out: &mut Vec<Event>,
    ) {
        if t == FREED_TICK {
            if let Some(captor) = captor {
                captor.visible = false;
            }
            if let Some(captive) = captive {
                captive.sprite = 1;
            }
        } else if t == CELEBRATE_TICK {
            if let Some(captive) = captive {
                captive.sprite = 2;
            }
        } else if t == COMPLETE_TICK && !self.completed_emitted {
            self.completed_emitted = true;
            out.push(Event::GameCompleted);
            log::info!("campaign completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actors() -> (Npc, Npc) {
        let captor = Npc::captor(EntityId::new(1), SpawnPoint { x: 100.0, y: 40.0 });
        let captive = Npc::captive(EntityId::new(2), SpawnPoint { x: 140.0, y: 40.0 });
        (captor, captive)
    }

    #[test]
    fn victory_only_triggers_while_playing() {
        let mut flow = LevelFlow::begin(1, false, SpawnPoint { x: 0.0, y: 0.0 });
        let mut events = Vec::new();
        flow.trigger_victory(&mut events);
        assert_eq!(flow.phase(), LevelPhase::Victory);
        assert_eq!(events.len(), 1);

        flow.trigger_victory(&mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn escape_cutscene_runs_to_transition_then_requests_next_level() {
        let mut flow = LevelFlow::begin(1, false, SpawnPoint { x: 0.0, y: 40.0 });
        let (mut captor, mut captive) = actors();
        let mut events = Vec::new();
        flow.trigger_victory(&mut events);
        events.clear();

        for _ in 0..240 {
            flow.tick(Some(&mut captor), Some(&mut captive), &mut events);
        }
        assert_eq!(flow.phase(), LevelPhase::Transition);
        assert!(!captor.visible);
        assert!(!captive.visible);
        assert!(events.contains(&Event::LevelPhaseChanged {
            from: LevelPhase::Victory,
            to: LevelPhase::Transition,
        }));
        events.clear();

        for _ in 0..60 {
            flow.tick(Some(&mut captor), Some(&mut captive), &mut events);
        }
        assert_eq!(flow.phase(), LevelPhase::Loading);
        assert!(events.contains(&Event::LevelLoadRequested { level: 2 }));
    }

    #[test]
    fn captor_retreats_toward_the_exit() {
        let mut flow = LevelFlow::begin(1, false, SpawnPoint { x: 0.0, y: 40.0 });
        let (mut captor, mut captive) = actors();
        let mut events = Vec::new();
        flow.trigger_victory(&mut events);

        for _ in 0..150 {
            flow.tick(Some(&mut captor), Some(&mut captive), &mut events);
        }
        assert!(captor.rect.x < 100.0);
    }

    #[test]
    fn final_level_completes_exactly_once() {
        let mut flow = LevelFlow::begin(3, true, SpawnPoint { x: 0.0, y: 0.0 });
        let (mut captor, mut captive) = actors();
        let mut events = Vec::new();
        flow.trigger_victory(&mut events);
        events.clear();

        for _ in 0..400 {
            flow.tick(Some(&mut captor), Some(&mut captive), &mut events);
        }
        let completions = events
            .iter()
            .filter(|event| matches!(event, Event::GameCompleted))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(flow.phase(), LevelPhase::Victory);
        assert!(!captor.visible);
        assert_eq!(captive.sprite, 2);
    }
}
