use{
    tracing::error,
    crate::{
        config::SweepTarget,
        error::*,
        launcher::*
    }
};

pub fn sweep_counts(target: &SweepTarget) -> Result<StatusCounts>
{
    let dirs = find_run_dirs(&target.study_dir(), &target.run_prefix())?;
    Ok(
        dirs.iter()
            .map(|d| run_status(d, &target.machine))
            .collect()
    )
}

pub fn check_status(target: &SweepTarget) -> i32
{
    let counts = match sweep_counts(target)
    {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    if counts.total == 0 {
        println!("No run directories found for {}/{}/{}", target.study, target.case, target.machine);
        return 1;
    }
    println!("\nStatus for {}/{}/{}:", target.study, target.case, target.machine);
    println!("  Total runs:    {}", counts.total);
    println!("  Completed:     {} ({}%)", counts.completed, counts.percent_completed());
    println!("  Running:       {}", counts.running);
    println!("  Not started:   {}", counts.not_started);
    println!("  Failed:        {}", counts.failed);
    0
}
