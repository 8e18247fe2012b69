use{
    super::*,
    std::{fs, path::Path},
    tracing::{error, info},
    crate::{
        config::*,
        error::*,
        launcher::RunSpec,
        run_naming::*
    }
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateCounts
{
    pub created: usize,
    pub skipped: usize
}

impl CreateCounts
{
    pub fn total(&self) -> usize
    {
        self.created + self.skipped
    }
}

/// Create the directory and its run description, unless it already exists
fn create_run_dir(study_dir: &Path, dirname: &str, spec: &RunSpec) -> Result<bool>
{
    let run_dir = study_dir.join(dirname);
    if run_dir.exists() {
        return Ok(false);
    }
    fs::create_dir_all(&run_dir)?;
    spec.write(&run_dir)?;
    Ok(true)
}

pub fn create_sweep(target: &SweepTarget, study: &StudyConfig) -> Result<CreateCounts>
{
    let study_dir = target.study_dir();
    let common = target.common_dir();
    if !common.is_dir() {
        return Err(EpiError::not_found(common));
    }
    let mut counts = CreateCounts::default();

    if let Some(baseline) = study.baseline_params() {
        let dirname = baseline_dirname(&target.study, &target.case, &target.machine);
        let spec = RunSpec::new(target, study, baseline, true);
        if create_run_dir(&study_dir, &dirname, &spec)? {
            info!("Created: {dirname}");
            counts.created += 1;
        } else {
            info!("Directory exists: {dirname}");
            counts.skipped += 1;
        }
    }

    let combinations = study.combinations();
    info!("Creating {} parameter combination runs", combinations.len());
    for params in combinations
    {
        let dirname = format_dirname(&target.study, &target.case, &target.machine, &params);
        let spec = RunSpec::new(target, study, params, false);
        if create_run_dir(&study_dir, &dirname, &spec)? {
            counts.created += 1;
        } else {
            counts.skipped += 1;
        }
    }
    Ok(counts)
}

pub fn create_runs(opt: &SweepCreateParams) -> i32
{
    let target = &opt.target;
    let study = match target.load_study()
    {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };
    println!(
        "\nCreating run directories for {} study, case {}, machine {}...",
        target.study,
        target.case,
        target.machine
    );
    match create_sweep(target, &study)
    {
        Ok(counts) => {
            println!("\n  Created: {}", counts.created);
            println!("  Skipped (already exist): {}", counts.skipped);
            println!("  Total: {}", counts.total());
            0
        },
        Err(e) => {
            error!("{e}");
            1
        }
    }
}

#[cfg(test)]
mod testing
{
    use super::*;

    fn setup() -> (tempfile::TempDir, SweepTarget, StudyConfig)
    {
        let tmp = tempfile::tempdir().unwrap();
        let target = SweepTarget{
            root_dir: tmp.path().display().to_string(),
            ..Default::default()
        };
        let study: StudyConfig = serde_json::from_str(
            r#"{
                "name": "Recovery",
                "cases": ["CA"],
                "parameters": [
                    {"name": "med_workers_proportion", "values": [0.05, 0.1]},
                    {"name": "num_patients_per_doctor", "values": [5, 10]}
                ],
                "baseline": {"write_pltfiles": false}
            }"#
        ).unwrap();
        (tmp, target, study)
    }

    #[test]
    fn needs_common_dir()
    {
        let (_tmp, target, study) = setup();
        assert!(create_sweep(&target, &study).unwrap_err().is_not_found());
    }

    #[test]
    fn creates_once()
    {
        let (_tmp, target, study) = setup();
        fs::create_dir_all(target.common_dir()).unwrap();
        let counts = create_sweep(&target, &study).unwrap();
        assert_eq!(counts, CreateCounts{created: 5, skipped: 0});

        let dir = target.study_dir().join(".run_recovery.CA.linux.mwprop010.nppd005");
        let spec = RunSpec::load(&dir).unwrap();
        assert!(!spec.is_baseline);
        assert_eq!(spec.simulator_args.len(), 2);
        let base = RunSpec::load(&target.study_dir().join(".run_recovery.CA.linux.baseline")).unwrap();
        assert!(base.is_baseline);
        assert_eq!(base.simulator_args, vec!["hospital_model.write_pltfiles=false"]);

        let counts = create_sweep(&target, &study).unwrap();
        assert_eq!(counts, CreateCounts{created: 0, skipped: 5});
        assert_eq!(counts.total(), 5);
    }
}
