//! Session wiring and subcommand execution.

use crate::{Args, Command};
use candela_engine::PropertyValue;
use candela_session::{ItemRef, PropertySpec, REQUIRED_ENGINE_VERSION, Session};
use candela_sim::SimEngine;
use std::error::Error;
use std::path::Path;
use tracing::info;

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    init_logging(&args);

    let mut session = Session::new(SimEngine::new());
    register_default_properties(&mut session);

    match args.command {
        Command::Doctor => doctor(&mut session),
        Command::Train {
            dataset,
            steps,
            snapshot,
            set,
        } => train(&mut session, &dataset, steps, snapshot.as_deref(), &set),
        Command::Resume {
            snapshot,
            steps,
            snapshot_out,
        } => resume(&mut session, &snapshot, steps, snapshot_out.as_deref()),
        Command::Props => props(&mut session),
    }
}

fn init_logging(args: &Args) {
    #[cfg(feature = "tracy")]
    if args.tracy {
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        tracing_subscriber::registry()
            .with(tracing_tracy::TracyLayer::default())
            .with(
                tracing_subscriber::fmt::layer().with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
                ),
            )
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();
}

/// Properties the workbench exposes. The sim build only carries the trainer
/// sub-object; renderer reads fall back to the defaults here.
fn register_default_properties(session: &mut Session<SimEngine>) {
    for spec in [
        PropertySpec::new("trainer", "step_limit", PropertyValue::Int(100_000)),
        PropertySpec::new("trainer", "shuffle", PropertyValue::Bool(true)),
        PropertySpec::new("renderer", "preview_resolution", PropertyValue::Int(512)),
        PropertySpec::new("renderer", "exposure", PropertyValue::Float(1.0)),
    ] {
        session.register_property(spec);
    }
}

fn doctor(session: &mut Session<SimEngine>) -> Result<(), Box<dyn Error>> {
    println!("engine version:   {}", session.engine_version());
    println!("required version: {}", REQUIRED_ENGINE_VERSION);
    println!("compatible:       {}", session.is_engine_compatible());

    let check = session.check_runtime().clone();
    println!("runtime:          {}", if check.supported { "ok" } else { "unavailable" });
    if let Some(device) = &check.device {
        println!("device:           {}", device);
    }
    if let Some(detail) = &check.detail {
        println!("detail:           {}", detail);
    }

    if !session.is_engine_compatible() || !check.supported {
        return Err("environment is not ready for training".into());
    }
    Ok(())
}

fn train(
    session: &mut Session<SimEngine>,
    dataset: &Path,
    steps: u32,
    snapshot: Option<&Path>,
    overrides: &[String],
) -> Result<(), Box<dyn Error>> {
    ensure_ready(session)?;

    for raw in overrides {
        let (path, value) = parse_override(raw)?;
        session.set_bridge_property(&path, value)?;
    }

    let id = session.import_dataset(dataset)?;
    session.load_training_images(ItemRef::Id(id))?;
    info!(ready = session.is_ready_to_train()?, "images staged");

    session.start_training()?;
    run_steps(session, steps)?;
    session.stop_training()?;
    info!(step = session.training_step()?, "training stopped");

    if let Some(out) = snapshot {
        session.save_snapshot(id, out)?;
        info!(path = %out.display(), "snapshot written");
    }
    Ok(())
}

fn resume(
    session: &mut Session<SimEngine>,
    snapshot: &Path,
    steps: u32,
    out: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    ensure_ready(session)?;

    let id = session.load_snapshot(snapshot)?;
    session.load_training_images(ItemRef::Id(id))?;
    info!(step = session.training_step()?, "resumed from snapshot");

    session.start_training()?;
    run_steps(session, steps)?;
    session.stop_training()?;
    info!(step = session.training_step()?, "training stopped");

    if let Some(out) = out {
        session.save_snapshot(id, out)?;
        info!(path = %out.display(), "snapshot written");
    }
    Ok(())
}

fn props(session: &mut Session<SimEngine>) -> Result<(), Box<dyn Error>> {
    let paths: Vec<String> = session.properties().iter().map(|s| s.path()).collect();
    if paths.is_empty() {
        println!("no properties registered");
        return Ok(());
    }
    for path in paths {
        let value = session.bridge_property(&path)?;
        println!("{path} = {value}");
    }
    Ok(())
}

fn ensure_ready(session: &mut Session<SimEngine>) -> Result<(), Box<dyn Error>> {
    session.require_compatible()?;
    let check = session.check_runtime();
    if !check.supported {
        let detail = check.detail.clone().unwrap_or_else(|| "no detail".to_string());
        return Err(format!("engine runtime unavailable: {detail}").into());
    }
    Ok(())
}

/// The sim optimizer only moves when ticked, so training runs as a loop of
/// tick-then-report chunks instead of a background thread.
fn run_steps(session: &mut Session<SimEngine>, steps: u32) -> Result<(), Box<dyn Error>> {
    let mut done = 0;
    while done < steps {
        let chunk = (steps - done).min(100);
        session.bridge()?.tick(chunk);
        done += chunk;
        info!(step = session.training_step()?, "training");
    }
    Ok(())
}

fn parse_override(raw: &str) -> Result<(String, PropertyValue), Box<dyn Error>> {
    let Some((path, value)) = raw.split_once('=') else {
        return Err(format!("expected object.property=value, got '{raw}'").into());
    };
    Ok((path.to_string(), PropertyValue::parse(value)))
}
