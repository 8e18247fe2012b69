use{
    super::*,
    structopt::StructOpt,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,
    crate::config::*
};

/// Create one run directory per parameter combination of a study
#[derive(Debug, StructOpt, Clone)]
pub struct SweepCreate{
    #[structopt(long)]
    json: Option<String>,

    #[structopt(flatten)]
    target: TargetFlags
}

impl SweepCreate{
    pub fn parse(&self) -> (SweepCreateParams, Value){
        let (mut opt, mut json): (SweepCreateParams, Value) = parse_or_default(self.json.as_ref(), self.target.is_given());
        self.target.apply(&mut opt.target);
        json["target"] = serde_json::to_value(&opt.target).unwrap_or(Value::Null);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, _json) = self.parse();
        create_runs(&opt)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SweepCreateParams{
    pub target: SweepTarget
}
