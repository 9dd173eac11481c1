use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

mod engine;
mod frame;
mod voice;

use engine::Engine;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    frames: Arc<AtomicU64>,
    sample_rate: u32,
    output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }

    /// The one-time activation. The stream is built stopped and stays silent
    /// until this is called, once, when the start overlay is dismissed.
    pub fn resume(&self) -> anyhow::Result<()> {
        self.output_stream.play().context("failed to start output stream")
    }

    /// Frames rendered so far. This is the transport clock: musical time is
    /// measured against it, not against wall-clock timers.
    pub fn frames_elapsed(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(256);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    let frames = Arc::new(AtomicU64::new(0));

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream =
                build_output_stream_f32(&device, &config.into(), rx, Arc::clone(&frames), channels)?;
            // some backends start streams eagerly; keep the gate closed
            // until resume()
            let _ = output_stream.pause();
            log::info!("audio ready: {sample_rate} Hz, {channels} channels");
            Ok(AudioHandle {
                tx,
                frames,
                sample_rate,
                output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    frames: Arc<AtomicU64>,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(config.sample_rate);

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            for out in data.chunks_exact_mut(channels) {
                let s = engine.next_frame();
                if channels == 1 {
                    out[0] = 0.5 * (s.left + s.right);
                } else {
                    out[0] = s.left;
                    out[1] = s.right;
                    for extra in out.iter_mut().skip(2) {
                        *extra = 0.0;
                    }
                }
            }

            frames.fetch_add((data.len() / channels) as u64, Ordering::Relaxed);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
