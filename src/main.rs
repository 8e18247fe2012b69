use{
    std::{
        num::NonZeroUsize,
        time::Instant
    },
    structopt::StructOpt,
    indicatif::*,
    tracing::{debug, warn},
    tracing_subscriber::{fmt, EnvFilter}
};

pub mod error;
pub mod json_parsing;
pub mod misc_types;
pub mod sim_data;
pub mod stats_methods;
pub mod ensemble;
pub mod run_naming;
pub mod config;
pub mod launcher;
pub mod list_config;
pub mod sweep_create;
pub mod sweep_run;
pub mod sweep_status;
pub mod sweep_report;
pub mod regtest;
pub mod regtest_setup;
pub mod compare;
pub mod sensitivity;
pub mod county_cases;
pub mod initial_cases;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    init_logging();
    debug!("epi_sweep {VERSION}");
    let start_time = Instant::now();
    let opt = CmdOption::from_args();
    let code = match opt{
        CmdOption::ListStudies(o) => o.execute(),
        CmdOption::ListMachines(o) => o.execute(),
        CmdOption::ListCases(o) => o.execute(),
        CmdOption::SweepCreate(o) => o.execute(),
        CmdOption::SweepRun(o) => o.execute(),
        CmdOption::SweepStatus(o) => o.execute(),
        CmdOption::SweepReport(o) => o.execute(),
        CmdOption::RegtestCreate(o) => o.execute(),
        CmdOption::RegtestRun(o) => o.execute(),
        CmdOption::Regtest(o) => o.execute(),
        CmdOption::Compare(o) => o.execute(),
        CmdOption::Sensitivity(o) => o.execute(),
        CmdOption::CountyCases(o) => o.execute(),
        CmdOption::InitialCases(o) => o.execute()
    };
    println!("Execution took {}", humantime::format_duration(start_time.elapsed()));
    std::process::exit(code)
}

/// `RUST_LOG` overrides the default `info` filter. Log lines go to stderr,
/// tables and reports to stdout.
fn init_logging()
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn indication_bar(len: u64) -> ProgressBar
{
        // for indication on when it is finished
        let bar = ProgressBar::new(len);
        bar.set_style(ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise} - {eta_precise}] {wide_bar}"));
        bar
}

/// Size the global rayon pool. Without a number rayon picks one per core.
pub fn build_thread_pool(num_threads: Option<NonZeroUsize>)
{
    if let Some(k) = num_threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(k.get()).build_global() {
            warn!("could not set up {k} threads: {e}");
        }
    }
}

#[derive(Debug, StructOpt, Clone)]
#[structopt(about = "Parameter sweeps, ensembles and regression checks for the agent simulator")]
pub enum CmdOption 
{
    /// List the studies of studies.json
    ListStudies(list_config::ListStudies),
    /// List the machines of machines.json
    ListMachines(list_config::ListMachines),
    /// List the regression test cases and groups of regtest.json
    ListCases(list_config::ListCases),
    SweepCreate(sweep_create::SweepCreate),
    SweepRun(sweep_run::SweepRun),
    SweepStatus(sweep_status::SweepStatus),
    SweepReport(sweep_report::SweepReport),
    RegtestCreate(regtest_setup::RegtestCreate),
    RegtestRun(regtest_setup::RegtestRun),
    Regtest(regtest::Regtest),
    Compare(compare::Compare),
    Sensitivity(sensitivity::Sensitivity),
    CountyCases(county_cases::CountyCases),
    InitialCases(initial_cases::InitialCases)
}
