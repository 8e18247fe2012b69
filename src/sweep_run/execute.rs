use{
    super::*,
    std::path::PathBuf,
    tracing::{error, warn},
    crate::{
        config::*,
        error::*,
        launcher::*
    }
};

/// Split the run directories of a target into completed and pending ones.
/// Directories without a run description cannot be started and are left out.
pub fn pending_runs(target: &SweepTarget) -> Result<(Vec<PathBuf>, usize, Vec<PendingRun>)>
{
    let dirs = find_run_dirs(&target.study_dir(), &target.run_prefix())?;
    let mut completed = 0;
    let mut pending = Vec::new();
    for dir in dirs.iter()
    {
        if run_status(dir, &target.machine) == RunStatus::Completed {
            completed += 1;
            continue;
        }
        match RunSpec::load(dir)
        {
            Ok(spec) => pending.push(PendingRun{dir: dir.clone(), spec}),
            Err(e) if e.is_not_found() => (),
            Err(e) => warn!("skipping {}: {e}", dir.display())
        }
    }
    Ok((dirs, completed, pending))
}

pub fn run_sweep(opt: &SweepRunParams) -> i32
{
    let target = &opt.target;
    let machine = match target.load_machine()
    {
        Ok(m) => m,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    let (dirs, completed, pending) = match pending_runs(target)
    {
        Ok(res) => res,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    if dirs.is_empty() {
        println!("No run directories found matching: {}*", target.run_prefix());
        println!("Run 'sweep-create' first");
        return 1;
    }

    println!("\nFound {} run directories", dirs.len());
    println!("  Already completed: {completed}");
    println!("  To run: {}", pending.len());
    println!("Batch mode: {}", machine.batch_mode);
    if machine.batch_mode {
        println!("Max parallel jobs: N/A");
    } else {
        println!("Max parallel jobs: {}", opt.max_parallel);
    }

    if pending.is_empty() {
        println!("\n✓ All jobs already completed");
        return 0;
    }

    let launched = launch_pending(
        &pending,
        &machine,
        &target.machine,
        opt.build_dir.as_deref(),
        opt.max_parallel
    );
    let tally = match launched
    {
        Ok(tally) => tally,
        Err(e) => {
            error!("Could not find simulator executable for machine {}: {e}", target.machine);
            return 1;
        }
    };

    println!("\n✓ Completed {} jobs", tally.succeeded);
    if completed > 0 {
        println!("  Skipped (already completed): {completed}");
    }
    if !tally.failed.is_empty() {
        tally.print_summary("Sweep Run");
    }
    tally.exit_code()
}

#[cfg(test)]
mod testing
{
    use super::*;
    use std::{fs, path::Path};

    #[test]
    fn completed_runs_are_not_pending()
    {
        let tmp = tempfile::tempdir().unwrap();
        let target = SweepTarget{
            root_dir: tmp.path().display().to_string(),
            ..Default::default()
        };
        let study: StudyConfig = serde_json::from_str(
            r#"{"name": "R", "cases": ["CA"], "parameters": [{"name": "num_patients_per_doctor", "values": [5, 10, 20]}]}"#
        ).unwrap();
        let study_dir = target.study_dir();
        for params in study.combinations()
        {
            let name = crate::run_naming::format_dirname(&target.study, &target.case, &target.machine, &params);
            let dir = study_dir.join(name);
            fs::create_dir_all(&dir).unwrap();
            RunSpec::new(&target, &study, params, false).write(&dir).unwrap();
        }
        // created by hand, cannot be started
        fs::create_dir_all(study_dir.join(".run_recovery.CA.linux.manual")).unwrap();
        fs::write(study_dir.join(".run_recovery.CA.linux.nppd005/out.linux.log"), "x\nfinalized\n").unwrap();

        let (dirs, completed, pending) = pending_runs(&target).unwrap();
        assert_eq!(dirs.len(), 4);
        assert_eq!(completed, 1);
        assert_eq!(pending.len(), 2);

        let machine = MachineConfig::default();
        let jobs = build_jobs(&pending, &machine, Path::new("/b/agent"), "linux");
        assert_eq!(jobs[0].name, ".run_recovery.CA.linux.nppd010");
        assert_eq!(jobs[0].log, pending[0].dir.join("out.linux.log"));
        assert_eq!(jobs[0].command.program, "mpirun");
        assert!(jobs[0].command.args.contains(&"hospital_model.num_patients_per_doctor=10".to_owned()));
    }
}
