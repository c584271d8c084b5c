use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use cf_core::Action;
use cf_env::{CfdEnv, EnvConfig, EnvError, StepResult, load_yaml};
use cf_results::{EpisodeManifest, EpisodeRecorder, EpisodeStore, ResultsError, StepRecord};
use cf_solver::SolverError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "cfdgym CLI - drive an external CFD solver as an RL environment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an environment config and the paths it references
    Validate {
        /// Path to the environment YAML file
        config_path: PathBuf,
    },
    /// Run one episode with constant relaxation factors
    Rollout {
        /// Path to the environment YAML file
        config_path: PathBuf,
        /// Velocity relaxation factor (clamped to [0.1, 1.0])
        #[arg(long, default_value_t = 0.7)]
        u: f64,
        /// Pressure relaxation factor (clamped to [0.1, 1.0])
        #[arg(long, default_value_t = 0.3)]
        p: f64,
        /// Override the configured step budget
        #[arg(long)]
        max_steps: Option<usize>,
        /// Directory to save the episode trajectory in
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the number of outer iterations in a reference solver log
    BaselineSteps {
        /// Path to the solver log
        log_path: PathBuf,
    },
    /// List episodes saved in a trajectory store
    Episodes {
        /// Store directory
        store_dir: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Rollout {
            config_path,
            u,
            p,
            max_steps,
            store,
        } => cmd_rollout(&config_path, Action::new(u, p), max_steps, store.as_deref()),
        Commands::BaselineSteps { log_path } => cmd_baseline_steps(&log_path),
        Commands::Episodes { store_dir } => cmd_episodes(store_dir),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = load_yaml(config_path)?;

    let mut problems = Vec::new();
    if !config.env_script.is_file() {
        problems.push(format!("environment script not found: {}", config.env_script.display()));
    }
    if !config.template_dir.is_dir() {
        problems.push(format!("case template not found: {}", config.template_dir.display()));
    } else {
        for file in ["system/controlDict", "system/fvSolution"] {
            if !config.template_dir.join(file).is_file() {
                problems.push(format!("case template has no {file}"));
            }
        }
    }

    if problems.is_empty() {
        println!("✓ Config is valid");
        println!("  solver = {}, mesher = {}, max_steps = {}", config.solver, config.mesher, config.max_steps);
        Ok(())
    } else {
        for problem in &problems {
            println!("✗ {problem}");
        }
        Err(EnvError::InvalidConfig {
            what: format!("{} problem(s) found", problems.len()),
        }
        .into())
    }
}

fn cmd_rollout(
    config_path: &Path,
    action: Action,
    max_steps: Option<usize>,
    store: Option<&Path>,
) -> CliResult<()> {
    let mut config: EnvConfig = load_yaml(config_path)?;
    if let Some(n) = max_steps {
        config.max_steps = n;
        config.validate()?;
    }
    let solver = config.solver.clone();

    let mut env = CfdEnv::new(config)?;
    println!("Episode {} (U = {:.3}, p = {:.3})", env.episode_id(), action.u(), action.p());

    let mut manifest = EpisodeManifest::begin(env.episode_id().as_str(), solver, env.max_steps());
    let mut recorder = match store {
        Some(dir) => Some(EpisodeStore::new(dir)?.begin_episode(&manifest)?),
        None => None,
    };

    let started = Instant::now();
    let rollout = run_episode(&mut env, action, &mut manifest, recorder.as_mut());
    // always clean up, even if the episode failed
    let closed = env.close();
    if let Some(recorder) = recorder {
        recorder.finish(&manifest)?;
    }
    rollout?;
    closed?;

    println!("\n====================== Episode Summary ======================");
    println!("  Started:      {}", manifest.started_at);
    println!("  Outcome:      {:?}", manifest.outcome);
    println!("  Steps:        {}", manifest.steps);
    println!("  Total reward: {:.2}", manifest.total_reward);
    println!("  Wall time:    {:.1}s", started.elapsed().as_secs_f64());

    if let Some(dir) = store {
        println!("✓ Saved trajectory to {}", dir.join(&manifest.episode_id).display());
    }
    Ok(())
}

fn run_episode(
    env: &mut CfdEnv,
    action: Action,
    manifest: &mut EpisodeManifest,
    mut recorder: Option<&mut EpisodeRecorder>,
) -> CliResult<()> {
    env.reset()?;

    println!("\n| Step |   Action (U, p)   |  Reward  | p residual | Done  |");
    println!("|------|-------------------|----------|------------|-------|");

    loop {
        let result = env.step(action)?;
        let record = step_record(env.step_count(), action, &result);
        let done = result.terminated || result.truncated;
        println!(
            "| {:<4} | ({:.3}, {:.3})    | {:<8.2} | {:<10} | {:<5} |",
            record.step,
            action.u(),
            action.p(),
            record.reward,
            record
                .residual_p
                .map(|p| format!("{p:.3e}"))
                .unwrap_or_else(|| "diverged".to_string()),
            done
        );
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.append(&record)?;
        }
        manifest.record(&record);
        if done {
            return Ok(());
        }
    }
}

fn step_record(step: usize, action: Action, result: &StepResult) -> StepRecord {
    let progressed = result.info.divergence.is_none();
    StepRecord {
        step,
        action_u: action.u(),
        action_p: action.p(),
        reward: result.reward,
        terminated: result.terminated,
        truncated: result.truncated,
        residual_u: progressed.then_some(result.observation[0]),
        residual_p: progressed.then_some(result.observation[1]),
        divergence: result.info.divergence.clone(),
    }
}

fn cmd_baseline_steps(log_path: &Path) -> CliResult<()> {
    match cf_solver::read_last_reported_time(log_path)? {
        Some(steps) => println!("Baseline finished in: {steps} steps."),
        None => println!("No iteration markers found in {}", log_path.display()),
    }
    Ok(())
}

fn cmd_episodes(store_dir: PathBuf) -> CliResult<()> {
    let store = EpisodeStore::new(store_dir)?;
    let episodes = store.list_episodes()?;

    if episodes.is_empty() {
        println!("No stored episodes in {}", store.root().display());
    } else {
        println!("Stored episodes:");
        for m in episodes {
            println!(
                "  {} ({})  {:?}  steps={}  reward={:.2}",
                m.episode_id, m.started_at, m.outcome, m.steps, m.total_reward
            );
        }
    }
    Ok(())
}
