use{
    std::{
        fs,
        io,
        num::NonZeroUsize,
        path::{Path, PathBuf}
    },
    itertools::Itertools,
    tracing::{error, warn},
    crate::{
        config::*,
        error::*,
        launcher::*,
        misc_types::*,
        regtest::*
    }
};

#[cfg(unix)]
fn link(src: &Path, dst: &Path) -> io::Result<()>
{
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(not(unix))]
fn link(src: &Path, dst: &Path) -> io::Result<()>
{
    fs::copy(src, dst).map(|_| ())
}

/// Link `name` from the common directory into `dir`, replacing an older link
pub fn link_common_file(common: &Path, dir: &Path, name: &str) -> Result<PathBuf>
{
    let src = common.join(name);
    if !src.exists() {
        return Err(EpiError::not_found(src));
    }
    let dst = dir.join(name);
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(&dst)?;
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    link(&fs::canonicalize(&src)?, &dst)?;
    Ok(dst)
}

/// Create `<set>/<case>.<machine>` with its input files and run description.
/// Missing common files are reported but do not stop the creation.
pub fn create_test_dir(opt: &RegtestParams, set: TestSet, name: &str, case: &TestCase, machine: &str) -> Result<PathBuf>
{
    if case.input_file.is_empty() {
        return Err(EpiError::malformed(opt.test_cases_file(), format!("test case '{name}' has no input_file")));
    }
    let dir = opt.set_dir(set).join(format!("{name}.{machine}"));
    fs::create_dir_all(&dir)?;
    let common = opt.common_dir();
    for data_file in &case.data_files
    {
        if let Err(e) = link_common_file(&common, &dir, data_file) {
            warn!("  Data file not linked: {e}");
        }
    }
    if let Err(e) = link_common_file(&common, &dir, &case.input_file) {
        warn!("  Input file not linked: {e}");
    }
    RunSpec::for_test_case(name, machine, case, set.is_baseline())
        .write(&dir)?;
    Ok(dir)
}

fn required_machine(opt: &RegtestParams) -> Option<&str>
{
    let machine = opt.machine.as_deref();
    if machine.is_none() {
        error!("Machine not specified, use --machine");
    }
    machine
}

fn load_machine(opt: &RegtestParams, name: &str) -> Result<MachineConfig>
{
    let path = opt.machines_file();
    MachinesConfig::load(&path)?
        .machine(name)
        .cloned()
        .ok_or_else(|| EpiError::malformed(&path, format!("unknown machine '{name}'")))
}

pub fn create_set(opt: &RegtestParams, set: TestSet) -> i32
{
    let machine = match required_machine(opt)
    {
        Some(m) => m,
        None => return 1
    };
    let config = match TestCasesConfig::load(&opt.test_cases_file())
        .and_then(|config| load_machine(opt, machine).map(|_| config))
    {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    let resolved = if opt.cases.is_empty() {
        config.resolve(&[ALL_CASES])
    } else {
        config.resolve(&opt.cases)
    };
    if resolved.is_empty() {
        println!("No test cases selected");
        return 1;
    }

    println!("Creating {set} directories for machine: {machine}");
    println!("Test cases: {}", resolved.iter().join(", "));
    let mut tally = Tally::default();
    for name in &resolved
    {
        println!("\nCreating {name}.{machine}...");
        let created = match config.test_cases.get(name)
        {
            Some(case) => create_test_dir(opt, set, name, case, machine),
            None => Err(EpiError::malformed(opt.test_cases_file(), format!("group member '{name}' is no test case")))
        };
        match created
        {
            Ok(_) => tally.success(),
            Err(e) => {
                error!("{name}: {e}");
                tally.failure(format!("{name}.{machine}"), e)
            }
        }
    }
    println!("\n{} directories created in: {}", tally.succeeded, opt.set_dir(set).display());
    if !tally.failed.is_empty() {
        tally.print_summary("Regtest Create");
    }
    tally.exit_code()
}

/// Run descriptions of the enabled `<case>.<machine>` directories of a set.
/// Directories without one are counted as failures.
pub fn collect_pending(opt: &RegtestParams, set: TestSet, machine: &str) -> Result<(Vec<PendingRun>, Tally)>
{
    let set_dir = opt.set_dir(set);
    let mut dirs = find_case_dirs(&set_dir, Some(machine))?;
    if let Some(cases) = selected_cases(opt) {
        dirs.retain(|t| cases.contains(&t.case));
    }
    let mut pending = Vec::new();
    let mut tally = Tally::default();
    for t in dirs
    {
        let name = t.dir_name();
        let dir = set_dir.join(&name);
        println!("Processing {name}...");
        if is_disabled(&dir) {
            println!("  Skipping (disabled case)");
            continue;
        }
        match RunSpec::load(&dir)
        {
            Ok(spec) => pending.push(PendingRun{dir, spec}),
            Err(e) => {
                warn!("  No run description: {e}");
                tally.failure(name, e)
            }
        }
    }
    Ok((pending, tally))
}

pub fn run_set(opt: &RegtestParams, set: TestSet, max_parallel: NonZeroUsize, build_dir: Option<&str>) -> i32
{
    let machine_name = match required_machine(opt)
    {
        Some(m) => m,
        None => return 1
    };
    let machine = match load_machine(opt, machine_name)
    {
        Ok(m) => m,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    println!("Running {set} for machine: {machine_name}");
    println!("Batch mode: {}", machine.batch_mode);
    let (pending, mut tally) = match collect_pending(opt, set, machine_name)
    {
        Ok(res) => res,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    if pending.is_empty() && tally.failed.is_empty() {
        println!("No {set} directories found for machine: {machine_name}");
        return 1;
    }

    match launch_pending(&pending, &machine, machine_name, build_dir, max_parallel)
    {
        Ok(launched) => {
            tally.succeeded += launched.succeeded;
            tally.failed.extend(launched.failed);
        },
        Err(e) => {
            error!("Could not find simulator executable for machine {machine_name}: {e}");
            return 1;
        }
    }
    if machine.batch_mode {
        println!("\n✓ Submitted {} jobs", tally.succeeded);
    } else {
        println!("\n✓ Completed {} jobs", tally.succeeded);
    }
    if !tally.failed.is_empty() {
        tally.print_summary("Regtest Run");
    }
    tally.exit_code()
}
