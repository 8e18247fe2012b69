use{
    std::path::PathBuf,
    serde::{Serialize, Deserialize},
    structopt::StructOpt,
    super::*,
    crate::{
        error::*,
        misc_types::*,
        run_naming::run_dir_prefix
    }
};

/// Which sweep a subcommand works on and where its files live
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SweepTarget
{
    /// directory holding one sub directory per study
    pub root_dir: String,
    /// defaults to `<root_dir>/config`
    pub config_dir: Option<String>,
    pub study: String,
    pub case: String,
    pub machine: String
}

impl Default for SweepTarget
{
    fn default() -> Self
    {
        Self{
            root_dir: ".".to_owned(),
            config_dir: None,
            study: "recovery".to_owned(),
            case: "CA".to_owned(),
            machine: "linux".to_owned()
        }
    }
}

impl SweepTarget
{
    pub fn config_dir(&self) -> PathBuf
    {
        match &self.config_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.root_dir).join(DEFAULT_CONFIG_DIR)
        }
    }

    pub fn study_dir(&self) -> PathBuf
    {
        PathBuf::from(&self.root_dir).join(&self.study)
    }

    pub fn common_dir(&self) -> PathBuf
    {
        self.study_dir().join("common")
    }

    pub fn run_prefix(&self) -> String
    {
        run_dir_prefix(&self.study, &self.case, &self.machine)
    }

    /// The study of this target, which has to offer the case
    pub fn load_study(&self) -> Result<StudyConfig>
    {
        let path = self.config_dir().join(STUDIES_FILE);
        let studies = StudiesConfig::load(&path)?;
        let study = studies.studies.get(&self.study)
            .cloned()
            .ok_or_else(|| EpiError::malformed(&path, format!("unknown study '{}'", self.study)))?;
        if !study.has_case(&self.case) {
            return Err(
                EpiError::malformed(
                    &path,
                    format!(
                        "case '{}' not available for study '{}', available cases: {}",
                        self.case,
                        self.study,
                        study.cases.join(", ")
                    )
                )
            );
        }
        Ok(study)
    }

    pub fn load_machine(&self) -> Result<MachineConfig>
    {
        let path = self.config_dir().join(MACHINES_FILE);
        let machines = MachinesConfig::load(&path)?;
        machines.machines.get(&self.machine)
            .cloned()
            .ok_or_else(|| EpiError::malformed(&path, format!("unknown machine '{}'", self.machine)))
    }
}

/// Command line overrides for a [`SweepTarget`]
#[derive(Debug, StructOpt, Clone, Default)]
pub struct TargetFlags
{
    #[structopt(long)]
    pub study: Option<String>,

    #[structopt(long)]
    pub case: Option<String>,

    #[structopt(long)]
    pub machine: Option<String>,

    #[structopt(long)]
    pub root_dir: Option<String>,

    #[structopt(long)]
    pub config_dir: Option<String>
}

impl TargetFlags
{
    /// A study on the command line is enough to run without a json file
    pub fn is_given(&self) -> bool
    {
        self.study.is_some()
    }

    pub fn apply(&self, target: &mut SweepTarget)
    {
        let set = |field: &mut String, flag: &Option<String>| {
            if let Some(v) = flag {
                *field = v.clone();
            }
        };
        set(&mut target.study, &self.study);
        set(&mut target.case, &self.case);
        set(&mut target.machine, &self.machine);
        set(&mut target.root_dir, &self.root_dir);
        if self.config_dir.is_some() {
            target.config_dir = self.config_dir.clone();
        }
    }
}

#[cfg(test)]
mod testing
{
    use super::*;
    use std::fs;

    #[test]
    fn flags_override()
    {
        let mut target = SweepTarget::default();
        let flags = TargetFlags{
            study: Some("hosp_interactions".to_owned()),
            machine: Some("dane".to_owned()),
            ..Default::default()
        };
        assert!(flags.is_given());
        flags.apply(&mut target);
        assert_eq!(target.study, "hosp_interactions");
        assert_eq!(target.case, "CA");
        assert_eq!(target.machine, "dane");
        assert_eq!(target.run_prefix(), ".run_hosp_interactions.CA.dane");
        assert_eq!(target.config_dir(), PathBuf::from("./config"));
    }

    #[test]
    fn unknown_study_and_case()
    {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("config");
        fs::create_dir(&config).unwrap();
        fs::write(
            config.join(STUDIES_FILE),
            r#"{"studies": {"recovery": {"name": "Recovery", "cases": ["CA"]}}}"#
        ).unwrap();
        let mut target = SweepTarget{
            root_dir: tmp.path().display().to_string(),
            ..Default::default()
        };
        assert_eq!(target.load_study().unwrap().name, "Recovery");
        target.case = "US".to_owned();
        assert!(matches!(target.load_study(), Err(EpiError::MalformedData{..})));
        target.study = "other".to_owned();
        assert!(target.load_study().is_err());
        assert!(target.load_machine().unwrap_err().is_not_found());
    }
}
