use{
    super::*,
    structopt::StructOpt,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,
    crate::config::*
};

/// Count completed, running and not yet started runs of a sweep
#[derive(Debug, StructOpt, Clone)]
pub struct SweepStatus{
    #[structopt(long)]
    json: Option<String>,

    #[structopt(flatten)]
    target: TargetFlags
}

impl SweepStatus{
    pub fn parse(&self) -> (SweepStatusParams, Value){
        let (mut opt, json): (SweepStatusParams, Value) = parse_or_default(self.json.as_ref(), self.target.is_given());
        self.target.apply(&mut opt.target);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, _) = self.parse();
        check_status(&opt.target)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SweepStatusParams{
    pub target: SweepTarget
}
