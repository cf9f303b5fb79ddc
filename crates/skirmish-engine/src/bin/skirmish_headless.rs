//! Headless battle runner.
//!
//! Places characters, runs a fixed number of ticks, and prints what happened.
//!
//! Run with:
//!   cargo run -p skirmish-engine --bin skirmish-headless -- \
//!       --spawn "hello kitty@0,0" --spawn "badtz maru@0,0" --random kuromi --ticks 100
//!
//! Set `RUST_LOG=debug` to see every spawn and removal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use skirmish_engine::prelude::*;

/// Run a battle without a window and report the survivors.
#[derive(Parser, Debug)]
#[command(name = "skirmish-headless")]
struct Args {
    /// Number of ticks to run.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Seed for random placement. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Place a character at a point, as NAME@X,Y. May be repeated.
    #[arg(long = "spawn", value_name = "NAME@X,Y", value_parser = parse_spawn)]
    spawns: Vec<SpawnRequest>,

    /// Place a character at a random point in the arena. May be repeated.
    #[arg(long = "random", value_name = "NAME")]
    randoms: Vec<String>,

    /// JSON file holding a TickConfig.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sleep one time step between ticks.
    #[arg(long)]
    realtime: bool,

    /// Print the final state as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Final report printed with `--json`.
#[derive(Serialize)]
struct Report {
    ticks: u64,
    sim_time: f64,
    removed: u64,
    state_hash: String,
    survivors: Vec<CharacterView>,
}

fn parse_spawn(raw: &str) -> Result<SpawnRequest, String> {
    let (name, coords) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@X,Y, got '{raw}'"))?;
    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y after '@', got '{coords}'"))?;
    let x: i32 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: i32 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(SpawnRequest::new(name.trim(), (x, y)))
}

fn load_config(path: Option<&PathBuf>) -> Result<TickConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(TickConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: TickConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    if !(config.fixed_dt > 0.0 && config.fixed_dt.is_finite()) {
        anyhow::bail!(
            "config file {} has invalid fixed_dt: {}",
            path.display(),
            config.fixed_dt
        );
    }
    Ok(config)
}

/// Apply command-line overrides on top of the loaded config. Flags that were
/// not passed leave the file's values alone.
fn apply_overrides(config: &mut TickConfig, args: &Args) {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.realtime {
        config.headless = false;
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    apply_overrides(&mut config, &args);

    let mut tick_loop = TickLoop::new(Battlefield::new(), config);
    for request in args.spawns {
        tick_loop.queue_spawn(request);
    }
    for name in args.randoms {
        let at = tick_loop.queue_random_spawn(name.clone());
        tracing::debug!(%name, x = at.x, y = at.y, "random placement");
    }

    tracing::info!(
        ticks = args.ticks,
        seed = tick_loop.config().seed,
        queued = tick_loop.current_input().spawns.len(),
        "starting battle"
    );

    let step = Duration::from_secs_f64(tick_loop.fixed_dt());
    let mut removed = 0u64;
    for _ in 0..args.ticks {
        for event in tick_loop.tick() {
            match &event {
                BattleEvent::Defeated { removed: true, .. } => {
                    removed += 1;
                    tracing::info!("{}", event.describe());
                }
                BattleEvent::SurpriseTriggered { .. } => tracing::info!("{}", event.describe()),
                _ => tracing::trace!("{}", event.describe()),
            }
        }
        if args.realtime {
            std::thread::sleep(step);
        }
    }

    let report = Report {
        ticks: tick_loop.tick_count(),
        sim_time: tick_loop.sim_time(),
        removed,
        state_hash: tick_loop.state_hash(),
        survivors: tick_loop.battlefield().snapshot(),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{json}");
    } else {
        println!(
            "{} ticks ({:.2}s simulated), {} removed, {} left",
            report.ticks,
            report.sim_time,
            report.removed,
            report.survivors.len()
        );
        for view in &report.survivors {
            println!(
                "  {:>6}  {:<12} at ({}, {})",
                view.id.to_string(),
                view.kind.name(),
                view.position.x,
                view.position.y
            );
        }
        println!("state hash {}", report.state_hash);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spawn_flag() {
        let req = parse_spawn("Hello Kitty@10,-20").unwrap();
        assert_eq!(req, SpawnRequest::new("Hello Kitty", (10, -20)));
    }

    #[test]
    fn rejects_malformed_spawn_flag() {
        assert!(parse_spawn("kuromi").is_err());
        assert!(parse_spawn("kuromi@10").is_err());
        assert!(parse_spawn("kuromi@x,1").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "skirmish-headless",
            "--ticks",
            "5",
            "--spawn",
            "kuromi@1,2",
            "--random",
            "my melody",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.ticks, 5);
        assert_eq!(args.spawns.len(), 1);
        assert_eq!(args.randoms, vec!["my melody".to_string()]);
        assert!(args.json);
        assert!(!args.realtime);
    }

    #[test]
    fn config_headless_survives_without_realtime_flag() {
        let args = Args::try_parse_from(["skirmish-headless"]).unwrap();
        for headless in [true, false] {
            let mut config = TickConfig {
                headless,
                seed: 17,
                ..Default::default()
            };
            apply_overrides(&mut config, &args);
            assert_eq!(config.headless, headless);
            assert_eq!(config.seed, 17);
        }
    }

    #[test]
    fn realtime_and_seed_flags_override_config() {
        let args =
            Args::try_parse_from(["skirmish-headless", "--realtime", "--seed", "3"]).unwrap();
        let mut config = TickConfig {
            headless: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert!(!config.headless);
        assert_eq!(config.seed, 3);
    }
}
