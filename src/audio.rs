use std::sync::{Arc, RwLock};
use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use crate::core::Synth;

/// Running output stream plus the synth it pulls samples from
pub struct AudioOutput {
    pub synth: Arc<RwLock<Synth>>,
    _stream: Stream,
}

impl AudioOutput {
    /// Open the default output device and start streaming
    pub fn start() -> Result<Self> {
        let host = cpal::default_host();
        log::info!("Using audio host: {}", host.id().name());

        let device = host.default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
        log::info!("Using output device: {:?}", device.name());

        let config = device.default_output_config()?;
        log::debug!("Device config: {:?}", config);

        let sample_format = config.sample_format();
        let config = cpal::StreamConfig::from(config);
        let sample_rate = config.sample_rate.0 as f32;
        log::info!("Using sample rate: {}", sample_rate);

        let synth = Arc::new(RwLock::new(Synth::new(sample_rate)));

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, Arc::clone(&synth)),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, Arc::clone(&synth)),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, Arc::clone(&synth)),
            _ => anyhow::bail!("Unsupported sample format"),
        }?;

        stream.play()?;
        log::info!("Audio stream started successfully");

        Ok(Self {
            synth,
            _stream: stream,
        })
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    synth: Arc<RwLock<Synth>>,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| log::error!("an error occurred on the audio stream: {}", err);
    let mut scratch: Vec<f32> = Vec::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len(), 0.0);
            match synth.write() {
                Ok(mut guard) => guard.fill_buffer(&mut scratch, channels),
                Err(_) => scratch.fill(0.0),
            }

            for (out, value) in data.iter_mut().zip(scratch.iter()) {
                *out = T::from_sample(*value);
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
