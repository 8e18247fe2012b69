use{
    super::*,
    structopt::StructOpt,
    std::{fmt, num::*, path::PathBuf, str::FromStr},
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,
    crate::misc_types::*
};

/// Compare regression test output against baselines
#[derive(Debug, StructOpt, Clone)]
pub struct Regtest{
    #[structopt(long)]
    json: Option<String>,

    /// regression test root with baselines/ and tests/
    #[structopt(long)]
    root_dir: Option<String>,

    /// only compare results of this machine
    #[structopt(long)]
    machine: Option<String>,

    /// test cases or groups, may be repeated
    #[structopt(long = "case")]
    cases: Vec<String>,

    /// directory with regtest.json, defaults to `<root-dir>/config`
    #[structopt(long)]
    config_dir: Option<String>,

    #[structopt(long)]
    num_threads: Option<NonZeroUsize>
}

impl Regtest{
    pub fn parse(&self) -> (RegtestParams, Value){
        let flags_given = self.root_dir.is_some() || self.machine.is_some() || !self.cases.is_empty()
            || self.config_dir.is_some();
        let (mut opt, mut json): (RegtestParams, Value) = parse_or_default(self.json.as_ref(), flags_given);
        if let Some(r) = &self.root_dir {
            opt.root_dir = r.clone();
        }
        if self.machine.is_some() {
            opt.machine = self.machine.clone();
        }
        if !self.cases.is_empty() {
            opt.cases = self.cases.clone();
        }
        if self.config_dir.is_some() {
            opt.config_dir = self.config_dir.clone();
        }
        json = serde_json::to_value(&opt).unwrap_or(json);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, json) = self.parse();
        crate::build_thread_pool(self.num_threads);
        compare_all(&opt, &json)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegtestParams{
    pub root_dir: String,
    pub machine: Option<String>,
    /// empty means every case that has test output
    pub cases: Vec<String>,
    /// directory with regtest.json and machines.json, defaults to `<root_dir>/config`
    pub config_dir: Option<String>
}

impl Default for RegtestParams{
    fn default() -> Self{
        Self{
            root_dir: ".".to_owned(),
            machine: None,
            cases: Vec::new(),
            config_dir: None
        }
    }
}

/// The two sets of regression test directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSet
{
    Baselines,
    Tests
}

impl TestSet
{
    pub fn dir_name(self) -> &'static str
    {
        match self {
            Self::Baselines => "baselines",
            Self::Tests => "tests"
        }
    }

    pub fn is_baseline(self) -> bool
    {
        self == Self::Baselines
    }
}

impl fmt::Display for TestSet
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.dir_name())
    }
}

impl FromStr for TestSet
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            "baseline" | "baselines" => Ok(Self::Baselines),
            "test" | "tests" => Ok(Self::Tests),
            _ => Err(format!("unknown test set '{s}', use 'baselines' or 'tests'"))
        }
    }
}

impl RegtestParams{
    pub fn set_dir(&self, set: TestSet) -> PathBuf
    {
        PathBuf::from(&self.root_dir).join(set.dir_name())
    }

    pub fn common_dir(&self) -> PathBuf
    {
        PathBuf::from(&self.root_dir).join("common")
    }

    pub fn config_dir(&self) -> PathBuf
    {
        match &self.config_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.root_dir).join(DEFAULT_CONFIG_DIR)
        }
    }

    pub fn machines_file(&self) -> PathBuf
    {
        self.config_dir().join(MACHINES_FILE)
    }

    pub fn baseline_dir(&self) -> PathBuf
    {
        self.set_dir(TestSet::Baselines)
    }

    pub fn test_dir(&self) -> PathBuf
    {
        self.set_dir(TestSet::Tests)
    }

    pub fn plot_dir(&self) -> PathBuf
    {
        PathBuf::from(&self.root_dir).join("plots")
    }

    pub fn test_cases_file(&self) -> PathBuf
    {
        self.config_dir().join(REGTEST_FILE)
    }
}
