use clap::{Parser, Subcommand};
use pf_app::{
    AppError, AppResult, EventBus, History, RunProgress, compile_plant, load_config,
    load_scenario, run_scenario_with_progress, summarize,
};
use pf_project::PlantConfig;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PlantFlow CLI - tank plant process simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plant config file
    Validate {
        /// Path to the config (YAML or JSON)
        config_path: PathBuf,
    },
    /// Print the stock four-tank plant config
    DefaultConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a scripted scenario
    Run {
        /// Path to the scenario (YAML or JSON)
        scenario_path: PathBuf,
        /// Plant config (defaults to the stock plant)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write level/temperature history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Do not echo the operator log
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::DefaultConfig { output } => cmd_default_config(output.as_deref()),
        Commands::Run {
            scenario_path,
            config,
            csv,
            quiet,
        } => cmd_run(&scenario_path, config.as_deref(), csv.as_deref(), quiet),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    let summary = summarize(&config);
    println!("✓ Config is valid");
    println!("  Name: {} (version {})", summary.name, summary.version);
    println!(
        "  Tanks: {}, segments: {}",
        summary.tank_count, summary.segment_count
    );
    println!(
        "  Volume: {} / {}",
        summary.initial_volume, summary.total_capacity
    );
    Ok(())
}

fn cmd_default_config(output: Option<&Path>) -> AppResult<()> {
    let config = PlantConfig::standard();
    match output {
        Some(path) => {
            pf_app::save_config(path, &config)?;
            println!("✓ Wrote {}", path.display());
        }
        None => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Project(format!("Failed to serialize config: {e}")))?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    config_path: Option<&Path>,
    csv_path: Option<&Path>,
    quiet: bool,
) -> AppResult<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => PlantConfig::standard(),
    };
    let scenario = load_scenario(scenario_path, &config)?;

    println!("Running scenario: {}", scenario.name);
    println!(
        "  dt = {:.3} s, t_end = {:.3} s, {} commands",
        scenario.dt_s,
        scenario.t_end_s,
        scenario.commands.len()
    );

    let bus = EventBus::new();
    if !quiet {
        bus.subscribe(|event| {
            clear_progress_line();
            println!("{event}");
            Ok(())
        });
    }

    let mut plant = compile_plant(&config, bus.clone())?;
    let mut history = History::new(f64::INFINITY, usize::MAX);
    let mut last_fraction = -1.0f64;

    let report = run_scenario_with_progress(
        &mut plant,
        &scenario,
        &bus,
        Some(&mut history),
        Some(&mut |p: RunProgress| {
            if p.fraction_complete - last_fraction >= 0.01 || p.step == p.total_steps {
                render_progress(&p);
                last_fraction = p.fraction_complete;
            }
        }),
    )?;
    clear_progress_line();

    println!(
        "✓ Completed {} steps: {} commands applied, {} refused, {} skipped",
        report.steps, report.commands_applied, report.commands_refused, report.commands_skipped
    );
    println!(
        "  {:<6} {:>8} {:>7} {:>8}  alarms",
        "tank", "volume", "level", "temp"
    );
    for tank in &report.final_snapshot.tanks {
        let mut alarms = Vec::new();
        if tank.alarms.high {
            alarms.push("HIGH");
        }
        if tank.alarms.low {
            alarms.push("LOW");
        }
        if tank.alarms.hot {
            alarms.push("HOT");
        }
        println!(
            "  {:<6} {:>8.2} {:>6.1}% {:>7.1}C  {}",
            tank.name,
            tank.volume,
            tank.fill_ratio * 100.0,
            tank.temperature,
            alarms.join(",")
        );
    }

    if let Some(path) = csv_path {
        std::fs::write(path, history.to_csv()).map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!("✓ History written to {}", path.display());
    }

    Ok(())
}

fn render_progress(p: &RunProgress) {
    print!(
        "\r  t = {:>8.2} / {:.2} s  [{:>5.1}%]",
        p.sim_time_s,
        p.t_end_s,
        p.fraction_complete * 100.0
    );
    let _ = io::stdout().flush();
}

fn clear_progress_line() {
    print!("\r{:<60}\r", "");
    let _ = io::stdout().flush();
}
