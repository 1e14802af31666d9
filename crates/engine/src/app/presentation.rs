use crate::world::{Size, Vec2};

pub type ModelId = i32;
pub type SoundId = i32;
pub type MusicId = i32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    Normal,
    Blinking,
}

/// One drawable handed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub pos: Vec2,
    pub model: ModelId,
    pub action: i32,
    /// Animation progress in `0.0..=1.0`.
    pub ratio: f32,
    pub scale: Size,
    pub effect: Effect,
    /// Positioned relative to the screen instead of the world.
    pub screen_ref_frame: bool,
    pub z_order: i32,
}

impl Actor {
    pub fn new(pos: Vec2, model: ModelId) -> Self {
        Self {
            pos,
            model,
            action: 0,
            ratio: 0.0,
            scale: Size::UNIT,
            effect: Effect::Normal,
            screen_ref_frame: false,
            z_order: 0,
        }
    }
}

pub trait Audio {
    fn play_sound(&mut self, sound: SoundId);
    fn play_music(&mut self, music: MusicId);
    fn stop_music(&mut self);
}

pub trait View {
    fn set_camera_pos(&mut self, pos: Vec2);
    fn text_box(&mut self, message: &str);
    fn set_ambient_light(&mut self, amount: f32);
}

/// Audio or view request recorded during a tick and flushed at its end.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Sound(SoundId),
    Music(MusicId),
    StopMusic,
    TextBox(String),
    AmbientLight(f32),
}

pub(crate) fn flush_cues(cues: Vec<Cue>, audio: &mut dyn Audio, view: &mut dyn View) {
    for cue in cues {
        match cue {
            Cue::Sound(sound) => audio.play_sound(sound),
            Cue::Music(music) => audio.play_music(music),
            Cue::StopMusic => audio.stop_music(),
            Cue::TextBox(message) => view.text_box(&message),
            Cue::AmbientLight(amount) => view.set_ambient_light(amount),
        }
    }
}

/// Audio and view sink that records everything it receives.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CueLog {
    pub cues: Vec<Cue>,
    pub camera: Option<Vec2>,
}

impl CueLog {
    pub fn take(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl Audio for CueLog {
    fn play_sound(&mut self, sound: SoundId) {
        self.cues.push(Cue::Sound(sound));
    }

    fn play_music(&mut self, music: MusicId) {
        self.cues.push(Cue::Music(music));
    }

    fn stop_music(&mut self) {
        self.cues.push(Cue::StopMusic);
    }
}

impl View for CueLog {
    fn set_camera_pos(&mut self, pos: Vec2) {
        self.camera = Some(pos);
    }

    fn text_box(&mut self, message: &str) {
        self.cues.push(Cue::TextBox(message.to_string()));
    }

    fn set_ambient_light(&mut self, amount: f32) {
        self.cues.push(Cue::AmbientLight(amount));
    }
}
