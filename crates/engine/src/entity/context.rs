use crate::app::{Control, Cue, MusicId, SoundId};
use crate::events::{Event, EventBus};
use crate::physics::{BodyLookup, Physics};
use crate::variables::VariableStore;
use crate::world::{Body, IntBox, Rect, SlideResult, Vec2};

use super::{Entity, EntityId, EntityRegistry, Interaction, QueuedInteraction, RUNTIME_TAG};

/// Game-wide state entities reach through their [`Context`].
#[derive(Debug, Default)]
pub struct SimServices {
    pub events: EventBus,
    pub variables: VariableStore,
    pub control: Control,
    pub player: Option<EntityId>,
    pub tick: u64,
    pub(crate) interactions: Vec<QueuedInteraction>,
    pub(crate) cues: Vec<Cue>,
}

impl SimServices {
    pub fn pending_interactions(&self) -> &[QueuedInteraction] {
        &self.interactions
    }

    pub(crate) fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

/// Handed to every entity callback. The entity being called is not visible
/// through the registry while the callback runs, so queries never see it.
pub struct Context<'a> {
    id: EntityId,
    tag: i32,
    registry: &'a mut EntityRegistry,
    physics: &'a Physics,
    services: &'a mut SimServices,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        id: EntityId,
        tag: i32,
        registry: &'a mut EntityRegistry,
        physics: &'a Physics,
        services: &'a mut SimServices,
    ) -> Self {
        Self {
            id,
            tag,
            registry,
            physics,
            services,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Persistent tag assigned by the room's spawner list, [`RUNTIME_TAG`]
    /// for runtime spawns.
    pub fn tag(&self) -> i32 {
        self.tag
    }

    pub fn control(&self) -> Control {
        self.services.control
    }

    pub fn tick_count(&self) -> u64 {
        self.services.tick
    }

    /// `None` while the player itself is being called.
    pub fn player_position(&self) -> Option<Vec2> {
        let player = self.services.player?;
        self.registry.body(player).map(|body| body.pos)
    }

    pub fn slide_move(&self, body: &mut Body, delta: Vec2) -> SlideResult {
        self.physics
            .slide_move(&*self.registry, Some(self.id), body, delta)
    }

    pub fn is_solid(&self, area: IntBox) -> bool {
        self.physics.is_solid(&*self.registry, Some(self.id), area)
    }

    pub fn is_solid_rect(&self, rect: Rect) -> bool {
        self.is_solid(IntBox::from_rect(rect))
    }

    /// Queues `entity`; it enters at the end of this tick.
    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> EntityId {
        self.registry.spawn(entity, RUNTIME_TAG)
    }

    pub fn post(&mut self, event: Event) {
        self.services.events.post(event);
    }

    pub fn variable(&mut self, key: i32) -> i32 {
        self.services.variables.get(key)
    }

    pub fn set_variable(&mut self, key: i32, value: i32) {
        self.services.variables.set(key, value);
    }

    /// Requests an effect on another entity, applied once the overlap sweep ends.
    pub fn interact(&mut self, target: EntityId, interaction: Interaction) {
        self.services.interactions.push(QueuedInteraction {
            source: self.id,
            target,
            interaction,
        });
    }

    pub fn play_sound(&mut self, sound: SoundId) {
        self.services.cues.push(Cue::Sound(sound));
    }

    pub fn play_music(&mut self, music: MusicId) {
        self.services.cues.push(Cue::Music(music));
    }

    pub fn stop_music(&mut self) {
        self.services.cues.push(Cue::StopMusic);
    }

    pub fn text_box(&mut self, message: impl Into<String>) {
        self.services.cues.push(Cue::TextBox(message.into()));
    }

    pub fn set_ambient_light(&mut self, amount: f32) {
        self.services.cues.push(Cue::AmbientLight(amount));
    }
}
