use{
    std::{
        fs::{self, File},
        num::NonZeroUsize,
        path::{Path, PathBuf},
        process::{Child, Command, Stdio}
    },
    tracing::{info, warn},
    crate::{
        config::LaunchCommand,
        error::*,
        misc_types::*
    }
};

/// A simulator run waiting to be started
#[derive(Debug, Clone)]
pub struct Job
{
    pub name: String,
    pub dir: PathBuf,
    pub command: LaunchCommand,
    /// stdout and stderr of the run end up here
    pub log: PathBuf
}

impl Job
{
    /// The log is removed again if the child cannot be started
    pub fn spawn(&self) -> Result<Child>
    {
        let out = File::create(&self.log)?;
        let err = out.try_clone()?;
        let spawned = Command::new(&self.command.program)
            .args(&self.command.args)
            .envs(&self.command.env)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(out)
            .stderr(err)
            .spawn();
        match spawned
        {
            Ok(child) => Ok(child),
            Err(e) => {
                let _ = fs::remove_file(&self.log);
                Err(e.into())
            }
        }
    }
}

fn wait_all(running: &mut Vec<(String, Child)>, tally: &mut Tally)
{
    for (name, mut child) in running.drain(..)
    {
        match child.wait()
        {
            Ok(status) if status.success() => tally.success(),
            Ok(status) => {
                warn!("{name} exited with {status}");
                tally.failure(name, status)
            },
            Err(e) => tally.failure(name, e)
        }
    }
}

/// Start the jobs with at most `max_parallel` children alive.
///
/// A full batch is waited for completely before the next job starts.
pub fn run_batched(jobs: &[Job], max_parallel: NonZeroUsize) -> Tally
{
    let total = jobs.len();
    let bar = crate::indication_bar(total as u64);
    let mut tally = Tally::default();
    let mut running = Vec::with_capacity(max_parallel.get());
    for (idx, job) in jobs.iter().enumerate()
    {
        info!("Starting job {}/{}: {}", idx + 1, total, job.name);
        match job.spawn()
        {
            Ok(child) => running.push((job.name.clone(), child)),
            Err(e) => {
                warn!("could not start {}: {e}", job.name);
                tally.failure(&job.name, e);
                bar.inc(1);
            }
        }
        if running.len() >= max_parallel.get() {
            info!("Waiting for {} jobs to complete...", running.len());
            let batch = running.len() as u64;
            wait_all(&mut running, &mut tally);
            bar.inc(batch);
            bar.set_message(&format!("{}/{} completed", tally.total(), total));
        }
    }
    if !running.is_empty() {
        info!("Waiting for final {} jobs to complete...", running.len());
        let batch = running.len() as u64;
        wait_all(&mut running, &mut tally);
        bar.inc(batch);
    }
    bar.finish_with_message(&format!("{}/{} completed", tally.succeeded, total));
    tally
}

/// First `*.job` script of a run directory
pub fn find_job_script(run_dir: &Path) -> Result<PathBuf>
{
    let mut scripts: Vec<_> = fs::read_dir(run_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().map_or(false, |e| e == "job"))
        .collect();
    scripts.sort();
    scripts.into_iter()
        .next()
        .ok_or_else(|| EpiError::not_found(run_dir.join("*.job")))
}

/// Hand the job script of a run to the scheduler. Only the submission is
/// waited for, not the job.
pub fn submit(run_dir: &Path, submit_command: &str) -> Result<()>
{
    let script = find_job_script(run_dir)?;
    let mut words = submit_command.split_whitespace();
    let program = words.next()
        .ok_or_else(|| EpiError::malformed(run_dir, "empty submit command"))?;
    let status = Command::new(program)
        .args(words)
        .arg(&script)
        .current_dir(run_dir)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(
            EpiError::Io(
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("{submit_command} {} exited with {status}", script.display())
                )
            )
        )
    }
}
