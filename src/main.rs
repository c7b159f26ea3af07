// SPDX-License-Identifier: MPL-2.0
use crossbeam_channel::{select, unbounded, Receiver};
use lens_playback::config::{self, Config};
use lens_playback::domain::media::MediaSource;
use lens_playback::infrastructure::{FfmpegProbe, TimelineBackend};
use lens_playback::playback::{
    ControllerOptions, EventForwarder, PlaybackController, PlaybackEvent, PlaybackSurface,
};
use std::error::Error;
use std::io::BufRead;
use std::process::ExitCode;
use std::thread;

const USAGE: &str = "\
usage: lens-playback [--volume V] [--mute] [--interval-ms N] [--seek-step S] <source>

commands (one per line on stdin):
  p  play/pause    s  stop       f  forward    b  backward
  m  mute toggle   +  volume up  -  volume down q  quit";

struct Args {
    volume: Option<f32>,
    mute: bool,
    interval_ms: Option<u64>,
    seek_step: Option<f64>,
    source: String,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{USAGE}");
        std::process::exit(0);
    }
    let parsed = Args {
        volume: args.opt_value_from_str("--volume")?,
        mute: args.contains("--mute"),
        interval_ms: args.opt_value_from_str("--interval-ms")?,
        seek_step: args.opt_value_from_str("--seek-step")?,
        source: args.free_from_str()?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        return Err(format!("unexpected arguments: {rest:?}").into());
    }
    Ok(parsed)
}

/// Settings file overlaid with command-line overrides.
fn effective_config(args: &Args) -> Config {
    let mut config = config::load().unwrap_or_else(|err| {
        tracing::warn!("could not read settings, using defaults: {err}");
        Config::default()
    });
    if args.volume.is_some() {
        config.volume = args.volume;
    }
    if args.mute {
        config.muted = Some(true);
    }
    if args.interval_ms.is_some() {
        config.progress_interval_ms = args.interval_ms;
    }
    if args.seek_step.is_some() {
        config.seek_step_secs = args.seek_step;
    }
    config
}

#[cfg(feature = "audio")]
fn build_controller(options: ControllerOptions) -> lens_playback::error::Result<PlaybackController> {
    PlaybackController::with_options(
        TimelineBackend::new(FfmpegProbe::new()),
        lens_playback::infrastructure::CpalAudioRoute::new(),
        options,
    )
}

#[cfg(not(feature = "audio"))]
fn build_controller(options: ControllerOptions) -> lens_playback::error::Result<PlaybackController> {
    PlaybackController::with_options(
        TimelineBackend::new(FfmpegProbe::new()),
        lens_playback::application::port::NullAudioRoute,
        options,
    )
}

fn spawn_stdin_reader() -> std::io::Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line.trim().to_string()).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn log_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::Progress { current, remaining } => match remaining {
            Some(remaining) => tracing::info!("{current} (-{remaining})"),
            None => tracing::info!("{current} (live)"),
        },
        PlaybackEvent::MetadataReady(metadata) => {
            for (key, value) in metadata.iter() {
                tracing::info!("{key}: {value}");
            }
        }
        PlaybackEvent::Error(err) => tracing::warn!("{err}"),
        PlaybackEvent::Finished => tracing::info!("finished"),
    }
}

/// Applies one stdin command. Returns `false` to quit.
fn apply_command(controller: &PlaybackController, command: &str) -> bool {
    let step = controller.seek_step().value();
    let result = match command {
        "p" => {
            if controller.state().is_playing {
                controller.pause()
            } else {
                controller.play()
            }
        }
        "s" => controller.stop(),
        "f" => controller.forward(step),
        "b" => controller.backward(step),
        "m" => {
            controller.set_muted(!controller.is_muted());
            Ok(())
        }
        "+" => {
            controller.set_volume(controller.volume().increase().value());
            Ok(())
        }
        "-" => {
            controller.set_volume(controller.volume().decrease().value());
            Ok(())
        }
        "q" => return false,
        "" => Ok(()),
        other => {
            tracing::warn!("unknown command {other:?}");
            Ok(())
        }
    };
    if let Err(err) = result {
        tracing::warn!("{command}: {err}");
    }
    true
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let source = MediaSource::parse(&args.source)?;
    let options = ControllerOptions::from(&effective_config(&args));

    let controller = build_controller(options)?;
    let (forwarder, events) = EventForwarder::new();
    controller.register_observer(&forwarder);

    let mut surface = PlaybackSurface::detached();
    surface.attach_engine(Some(controller.load(source)?));
    controller.play()?;

    let commands = spawn_stdin_reader()?;
    loop {
        let keep_going = select! {
            recv(events) -> message => match message {
                Ok((_, event)) => {
                    log_event(&event);
                    event != PlaybackEvent::Finished
                }
                Err(_) => false,
            },
            recv(commands) -> line => line.is_ok_and(|line| apply_command(&controller, &line)),
        };
        if !keep_going {
            break;
        }
    }

    surface.attach_engine(None);
    if let Err(err) = controller.unload() {
        tracing::debug!("unload: {err}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lens_playback=info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lens-playback: {err}\n\n{USAGE}");
            ExitCode::FAILURE
        }
    }
}
