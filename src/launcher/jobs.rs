use{
    std::{
        num::NonZeroUsize,
        path::{Path, PathBuf}
    },
    tracing::warn,
    super::*,
    crate::{
        config::MachineConfig,
        error::*,
        misc_types::*
    }
};

/// A run directory that still has to be simulated
#[derive(Debug, Clone)]
pub struct PendingRun
{
    pub dir: PathBuf,
    pub spec: RunSpec
}

pub fn build_jobs(pending: &[PendingRun], machine: &MachineConfig, executable: &Path, machine_name: &str) -> Vec<Job>
{
    pending.iter()
        .map(
            |run|
            {
                let input = run.spec.input_file.display().to_string();
                let command = machine.launch_command(&run.spec.case, executable, &input, &run.spec.simulator_args);
                Job{
                    name: dir_label(&run.dir),
                    dir: run.dir.clone(),
                    command,
                    log: run.dir.join(log_file_name(machine_name))
                }
            }
        ).collect()
}

pub fn dir_label(dir: &Path) -> String
{
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Hand every pending run to the scheduler of a batch machine
pub fn submit_all(pending: &[PendingRun], machine: &MachineConfig) -> Tally
{
    let mut tally = Tally::default();
    let submit_cmd = match machine.submit_command()
    {
        Some(cmd) => cmd,
        None => {
            for run in pending
            {
                tally.failure(dir_label(&run.dir), "machine has no submit command");
            }
            return tally;
        }
    };
    let total = pending.len();
    for (idx, run) in pending.iter().enumerate()
    {
        let name = dir_label(&run.dir);
        println!("\nSubmitting job {}/{total}: {name}", idx + 1);
        match submit(&run.dir, &submit_cmd)
        {
            Ok(()) => tally.success(),
            Err(e) => {
                warn!("{name}: {e}");
                tally.failure(name, e)
            }
        }
    }
    tally
}

/// Submit on batch machines, otherwise run the simulator locally with at most
/// `max_parallel` jobs at once.
///
/// Errors only if the simulator executable cannot be found.
pub fn launch_pending(
    pending: &[PendingRun],
    machine: &MachineConfig,
    machine_name: &str,
    build_dir: Option<&str>,
    max_parallel: NonZeroUsize
) -> Result<Tally>
{
    if machine.batch_mode {
        return Ok(submit_all(pending, machine));
    }
    let build = resolve_build_dir(build_dir)
        .ok_or_else(|| EpiError::not_found(BUILD_DIR_ENV))?;
    let executable = find_executable(&build, machine_name)?;
    let jobs = build_jobs(pending, machine, &executable, machine_name);
    Ok(run_batched(&jobs, max_parallel))
}
