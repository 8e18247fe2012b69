use{
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::{Path, PathBuf}
    },
    serde::{Serialize, Deserialize},
    crate::{
        config::*,
        error::*,
        json_parsing::read_json_file,
        misc_types::RUN_SPEC_FILE
    }
};

pub const REGTEST_STUDY: &str = "regtest";

/// Everything needed to start one run of a sweep, stored in its directory
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunSpec
{
    pub study: String,
    pub case: String,
    pub machine: String,
    pub is_baseline: bool,
    pub parameters: ParamSet,
    pub input_file: PathBuf,
    pub data_files: Vec<PathBuf>,
    pub simulator_args: Vec<String>
}

impl RunSpec
{
    pub fn new(target: &SweepTarget, study: &StudyConfig, parameters: ParamSet, is_baseline: bool) -> Self
    {
        let common = target.common_dir();
        let data_files = study.data_files_for(&target.case)
            .iter()
            .map(|f| common.join(f))
            .collect();
        Self{
            study: target.study.clone(),
            case: target.case.clone(),
            machine: target.machine.clone(),
            is_baseline,
            simulator_args: simulator_args(&parameters),
            parameters,
            input_file: common.join(format!("inputs.{}", target.case)),
            data_files
        }
    }

    /// Regression test run. Input and data files are linked into the
    /// test directory, so their paths are relative to it.
    pub fn for_test_case(name: &str, machine: &str, case: &TestCase, is_baseline: bool) -> Self
    {
        Self{
            study: REGTEST_STUDY.to_owned(),
            case: name.to_owned(),
            machine: machine.to_owned(),
            is_baseline,
            parameters: ParamSet::new(),
            input_file: PathBuf::from(&case.input_file),
            data_files: case.data_files.iter().map(PathBuf::from).collect(),
            simulator_args: Vec::new()
        }
    }

    pub fn load(run_dir: &Path) -> Result<Self>
    {
        read_json_file(&run_dir.join(RUN_SPEC_FILE))
    }

    pub fn write(&self, run_dir: &Path) -> Result<()>
    {
        let file = File::create(run_dir.join(RUN_SPEC_FILE))?;
        let mut buf = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut buf, self)?;
        writeln!(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod testing
{
    use super::*;

    #[test]
    fn stored_in_run_dir()
    {
        let tmp = tempfile::tempdir().unwrap();
        let target = SweepTarget{
            root_dir: "/sweeps".to_owned(),
            ..Default::default()
        };
        let study: StudyConfig = serde_json::from_str(
            r#"{"name": "Recovery", "cases": ["CA"], "data_files": {"CA": ["CA.dat"]}}"#
        ).unwrap();
        let params = vec![("num_patients_per_doctor".to_owned(), ParamValue::Int(10))];
        let spec = RunSpec::new(&target, &study, params, false);
        assert_eq!(spec.input_file, PathBuf::from("/sweeps/recovery/common/inputs.CA"));
        assert_eq!(spec.data_files, vec![PathBuf::from("/sweeps/recovery/common/CA.dat")]);
        assert_eq!(spec.simulator_args, vec!["hospital_model.num_patients_per_doctor=10"]);

        spec.write(tmp.path()).unwrap();
        assert_eq!(RunSpec::load(tmp.path()).unwrap(), spec);
    }

    #[test]
    fn test_case_paths_are_local()
    {
        let case = TestCase{
            input_file: "inputs.bay".to_owned(),
            data_files: vec!["BayArea.dat".to_owned()],
            ..Default::default()
        };
        let spec = RunSpec::for_test_case("Bay", "dane", &case, true);
        assert_eq!(spec.study, REGTEST_STUDY);
        assert_eq!(spec.input_file, PathBuf::from("inputs.bay"));
        assert_eq!(spec.data_files, vec![PathBuf::from("BayArea.dat")]);
        assert!(spec.is_baseline);
        assert!(spec.parameters.is_empty());
        assert!(spec.simulator_args.is_empty());
    }
}
