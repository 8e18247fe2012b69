use{
    std::{
        fs,
        path::{Path, PathBuf}
    },
    serde::Serialize,
    crate::{
        error::*,
        misc_types::*
    }
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus
{
    NotStarted,
    Running,
    Completed,
    Failed
}

/// A run is complete when the last line of its log contains the sentinel
pub fn log_is_complete(content: &str) -> bool
{
    content.lines()
        .last()
        .map_or(false, |line| line.contains(COMPLETION_SENTINEL))
}

pub fn run_status(run_dir: &Path, machine: &str) -> RunStatus
{
    let log = run_dir.join(log_file_name(machine));
    if !log.exists() {
        return RunStatus::NotStarted;
    }
    match fs::read(&log)
    {
        Ok(bytes) => {
            if log_is_complete(&String::from_utf8_lossy(&bytes)) {
                RunStatus::Completed
            } else {
                RunStatus::Running
            }
        },
        Err(_) => RunStatus::Failed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts
{
    pub total: usize,
    pub completed: usize,
    pub running: usize,
    pub not_started: usize,
    pub failed: usize
}

impl StatusCounts
{
    pub fn add(&mut self, status: RunStatus)
    {
        self.total += 1;
        match status {
            RunStatus::Completed => self.completed += 1,
            RunStatus::Running => self.running += 1,
            RunStatus::NotStarted => self.not_started += 1,
            RunStatus::Failed => self.failed += 1
        }
    }

    /// integer percentage, 0 without runs
    pub fn percent_completed(&self) -> usize
    {
        if self.total == 0 {
            0
        } else {
            100 * self.completed / self.total
        }
    }
}

impl FromIterator<RunStatus> for StatusCounts
{
    fn from_iter<I: IntoIterator<Item = RunStatus>>(iter: I) -> Self
    {
        let mut counts = Self::default();
        iter.into_iter().for_each(|s| counts.add(s));
        counts
    }
}

/// Directories in `parent` whose name starts with `prefix`, sorted by name
pub fn find_run_dirs(parent: &Path, prefix: &str) -> Result<Vec<PathBuf>>
{
    if !parent.is_dir() {
        return Err(EpiError::not_found(parent));
    }
    let mut dirs: Vec<_> = fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod testing
{
    use super::*;

    #[test]
    fn sentinel_on_last_line_only()
    {
        assert!(log_is_complete("step 1\nstep 2\nAMReX (23.11) finalized\n"));
        assert!(!log_is_complete("finalized\nstep 3\n"));
        assert!(!log_is_complete(""));
        assert!(!log_is_complete("finalized\n\n"));
    }

    #[test]
    fn status_of_run_dirs()
    {
        let tmp = tempfile::tempdir().unwrap();
        let study = tmp.path();
        let names = [".run_s.CA.dane.baseline", ".run_s.CA.dane.mwprop005", ".run_s.CA.dane.mwprop010"];
        for n in names
        {
            fs::create_dir(study.join(n)).unwrap();
        }
        fs::create_dir(study.join(".run_s.CA.matrix.baseline")).unwrap();
        fs::write(study.join(".run_s.CA.dane.notadir"), "").unwrap();
        fs::write(study.join(names[0]).join("out.dane.log"), "a\nfinalized\n").unwrap();
        fs::write(study.join(names[1]).join("out.dane.log"), "a\nb\n").unwrap();

        let dirs = find_run_dirs(study, ".run_s.CA.dane").unwrap();
        assert_eq!(dirs.len(), 3);
        let counts: StatusCounts = dirs.iter()
            .map(|d| run_status(d, "dane"))
            .collect();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.running, 1);
        assert_eq!(counts.not_started, 1);
        assert_eq!(counts.failed, 0);
        assert_eq!(counts.percent_completed(), 33);

        assert!(find_run_dirs(&study.join("missing"), ".run_").unwrap_err().is_not_found());
    }
}
