//! deskplan command line.
//!
//! Reads desk data, requests and parameters, writes the schedule CSV and,
//! unless disabled, per-student and per-office notices next to it.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use deskplan::floor_plan::FloorPlan;
use deskplan::io;
use deskplan::{DeskPlanner, SchedulePlan};

#[derive(Parser)]
#[command(name = "deskplan")]
#[command(about = "Build a safe-distance desk use schedule")]
struct Cli {
    /// Desk table (CSV with header desk_id,office,x,y)
    desk_data: PathBuf,

    /// Student requests (JSON list of {desk, student_name, available_times})
    requests: PathBuf,

    /// Parameters (YAML with safety_distance, office_occupancy_cap, floor_occupancy_cap)
    parameters: PathBuf,

    /// Where to write the schedule CSV
    output: PathBuf,

    /// Also write per-student and per-office notices
    #[arg(long = "make_pdfs", default_value_t = true, action = ArgAction::Set)]
    make_pdfs: bool,

    /// Selection backend
    #[arg(long, value_enum, default_value_t = SolverKind::BranchAndBound)]
    solver: SolverKind,

    /// Worker threads for per-block solving (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverKind {
    BranchAndBound,
    #[cfg(feature = "lp")]
    Lp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let desks = io::load_desks(&cli.desk_data)
        .with_context(|| format!("reading desk data from {}", cli.desk_data.display()))?;
    let requests = io::load_requests(&cli.requests)
        .with_context(|| format!("reading requests from {}", cli.requests.display()))?;
    let params = io::load_parameters(&cli.parameters)
        .with_context(|| format!("reading parameters from {}", cli.parameters.display()))?;
    info!(
        desks = desks.len(),
        requests = requests.len(),
        safety_distance = params.safety_distance,
        "inputs loaded"
    );

    let floor_plan = FloorPlan::new(desks, &params).context("building floor plan")?;
    let mut planner = DeskPlanner::new(params)?;
    if let Some(threads) = cli.threads {
        planner = planner.with_threads(threads);
    }

    let plan = match cli.solver {
        SolverKind::BranchAndBound => planner.plan_on(&floor_plan, &requests)?,
        #[cfg(feature = "lp")]
        SolverKind::Lp => planner
            .with_solver(deskplan::selection::LpSolver::new())
            .plan_on(&floor_plan, &requests)?,
    };

    write_outputs(&cli, &plan, &floor_plan)?;
    print!("{}", io::run_summary(&plan));
    Ok(())
}

fn write_outputs(cli: &Cli, plan: &SchedulePlan, floor_plan: &FloorPlan) -> Result<()> {
    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    io::write_csv(plan, floor_plan, BufWriter::new(file))
        .with_context(|| format!("writing schedule to {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "schedule written");

    if cli.make_pdfs {
        let dir = cli
            .output
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let written = io::write_reports(plan, floor_plan, dir)
            .with_context(|| format!("writing notices to {}", dir.display()))?;
        info!(files = written, dir = %dir.display(), "notices written");
    }
    Ok(())
}
