use{
    super::*,
    structopt::StructOpt,
    std::num::*,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,
    crate::config::*
};

/// Summarize finished sweep runs against the sweep baseline
#[derive(Debug, StructOpt, Clone)]
pub struct SweepReport{
    #[structopt(long)]
    json: Option<String>,

    #[structopt(flatten)]
    target: TargetFlags,

    #[structopt(long)]
    num_threads: Option<NonZeroUsize>
}

impl SweepReport{
    pub fn parse(&self) -> (SweepReportParams, Value){
        let (mut opt, mut json): (SweepReportParams, Value) = parse_or_default(self.json.as_ref(), self.target.is_given());
        self.target.apply(&mut opt.target);
        json = serde_json::to_value(&opt).unwrap_or(json);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, json) = self.parse();
        crate::build_thread_pool(self.num_threads);
        report(&opt, &json)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SweepReportParams{
    pub target: SweepTarget,
    /// defaults to `<study>/reports`
    pub report_dir: Option<String>
}

impl SweepReportParams{
    pub fn report_dir(&self) -> std::path::PathBuf
    {
        match &self.report_dir {
            Some(d) => d.into(),
            None => self.target.study_dir().join("reports")
        }
    }

    /// `<study>_<case>_<machine>_mwprop<NN>.dat`
    pub fn name(&self, mwprop_percent: i64) -> String
    {
        format!(
            "{}_{}_{}_mwprop{:02}.dat",
            self.target.study,
            self.target.case,
            self.target.machine,
            mwprop_percent
        )
    }
}
