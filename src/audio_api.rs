pub use crate::shared::SynthKind;

/// A fully resolved note request. The controller decides what sounds and
/// when; the engine only ever sees these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerParams {
    pub kind: SynthKind,
    pub freq_hz: f32,
    pub duration_secs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCommand {
    Trigger(TriggerParams),
}
