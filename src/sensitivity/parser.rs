use{
    super::*,
    structopt::StructOpt,
    std::{num::*, path::PathBuf},
    crate::{
        ensemble::{DEFAULT_ENSEMBLE_SUFFIXES, DEFAULT_MAX_RUNS},
        json_parsing::*
    },
    serde::{Serialize, Deserialize},
    serde_json::Value
};

/// Ensemble metrics over co-immunity and co-susceptibility sweeps
#[derive(Debug, StructOpt, Clone)]
pub struct Sensitivity{
    #[structopt(long)]
    json: Option<String>,

    /// search only this directory for `.ensemble_*` dirs
    #[structopt(long)]
    data_dir: Option<String>,

    #[structopt(long)]
    output_dir: Option<String>,

    #[structopt(long)]
    num_threads: Option<NonZeroUsize>
}

impl Sensitivity{
    pub fn parse(&self) -> (SensitivityParams, Value){
        let flags_given = self.data_dir.is_some() || self.output_dir.is_some();
        let (mut opt, mut json): (SensitivityParams, Value) = parse_or_default(self.json.as_ref(), flags_given);
        if let Some(d) = &self.data_dir {
            opt.data_dirs = vec![d.clone()];
        }
        if let Some(d) = &self.output_dir {
            opt.output_dir = d.clone();
        }
        json = serde_json::to_value(&opt).unwrap_or(json);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, json) = self.parse();
        crate::build_thread_pool(self.num_threads);
        analyze(&opt, &json)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SweepPoint{
    pub value: f64,
    pub case: String
}

impl SweepPoint{
    fn new(value: f64, case: &str) -> Self
    {
        Self{value, case: case.to_owned()}
    }
}

/// One varied parameter and the ensemble case of every value
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SweepSpec{
    pub name: String,
    pub label: String,
    pub baseline: f64,
    pub diseases: Vec<String>,
    pub points: Vec<SweepPoint>
}

impl SweepSpec{
    pub fn is_baseline(&self, value: f64) -> bool
    {
        (value - self.baseline).abs() < 1e-9
    }

    pub fn co_immunity() -> Self
    {
        Self{
            name: "coimm".to_owned(),
            label: "Co-immunity".to_owned(),
            baseline: 0.85,
            diseases: vec!["Cov19S1".to_owned(), "Cov19S2".to_owned()],
            points: vec![
                SweepPoint::new(0.50, "CA_02D_Cov19S1S2_coimm050"),
                SweepPoint::new(0.70, "CA_02D_Cov19S1S2_coimm070"),
                SweepPoint::new(0.85, "CA_02D_Cov19S1S2_coimm085"),
                SweepPoint::new(0.925, "CA_02D_Cov19S1S2_coimm0925"),
                SweepPoint::new(1.00, "CA_02D_Cov19S1S2_coimm100")
            ]
        }
    }

    pub fn co_susceptibility() -> Self
    {
        Self{
            name: "cosus".to_owned(),
            label: "Co-susceptibility".to_owned(),
            baseline: 1.5,
            diseases: vec!["Cov19S1".to_owned(), "FluS1".to_owned()],
            points: vec![
                SweepPoint::new(0.75, "CA_02D_Cov19S1_FluS1_cosus075"),
                SweepPoint::new(1.0, "CA_02D_Cov19S1_FluS1_cosus100"),
                SweepPoint::new(1.5, "CA_02D_Cov19S1_FluS1_cosus150"),
                SweepPoint::new(2.0, "CA_02D_Cov19S1_FluS1_cosus200"),
                SweepPoint::new(3.0, "CA_02D_Cov19S1_FluS1_cosus300")
            ]
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SensitivityParams{
    /// searched in order, the first one with any ensemble is used
    pub data_dirs: Vec<String>,
    pub output_dir: String,
    pub suffixes: Vec<String>,
    pub max_runs: usize,
    pub sweeps: Vec<SweepSpec>
}

impl Default for SensitivityParams{
    fn default() -> Self{
        Self{
            data_dirs: vec![".".to_owned(), "sensitivity".to_owned()],
            output_dir: "sensitivity".to_owned(),
            suffixes: DEFAULT_ENSEMBLE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            max_runs: DEFAULT_MAX_RUNS,
            sweeps: vec![SweepSpec::co_immunity(), SweepSpec::co_susceptibility()]
        }
    }
}

impl SensitivityParams{
    pub fn summary_name(&self, sweep: &SweepSpec) -> PathBuf
    {
        PathBuf::from(&self.output_dir).join(format!("sensitivity_{}_summary.dat", sweep.name))
    }

    pub fn timeseries_name(&self, sweep: &SweepSpec, disease: &str) -> PathBuf
    {
        PathBuf::from(&self.output_dir).join(format!("sensitivity_{}_{}_timeseries.dat", sweep.name, disease))
    }
}
