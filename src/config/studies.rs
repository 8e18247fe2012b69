use{
    std::{
        collections::BTreeMap,
        fmt,
        path::Path
    },
    serde::{Serialize, Deserialize},
    itertools::Itertools,
    crate::{
        error::*,
        json_parsing::read_json_file
    }
};

/// Value of a sweep parameter.
///
/// Variant order matters for deserialization: `12` is an integer, `0.25`
/// a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue
{
    Bool(bool),
    Int(i64),
    Float(f64)
}

impl fmt::Display for ParamValue
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}")
        }
    }
}

/// One parameter assignment per axis, in axis order
pub type ParamSet = Vec<(String, ParamValue)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamAxis
{
    pub name: String,
    pub values: Vec<ParamValue>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig
{
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cases: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParamAxis>,
    #[serde(default)]
    pub baseline: Option<BTreeMap<String, ParamValue>>,
    /// data files needed by each case, relative to the common directory
    #[serde(default)]
    pub data_files: BTreeMap<String, Vec<String>>
}

impl StudyConfig
{
    pub fn has_case(&self, case: &str) -> bool
    {
        self.cases.iter().any(|c| c == case)
    }

    pub fn num_combinations(&self) -> usize
    {
        self.parameters.iter()
            .map(|axis| axis.values.len())
            .product()
    }

    /// Cartesian product of the parameter axes. The first axis varies
    /// slowest.
    pub fn combinations(&self) -> Vec<ParamSet>
    {
        if self.parameters.is_empty() {
            return vec![Vec::new()];
        }
        self.parameters.iter()
            .map(
                |axis|
                axis.values.iter()
                    .map(move |v| (axis.name.clone(), *v))
            )
            .multi_cartesian_product()
            .collect()
    }

    pub fn baseline_params(&self) -> Option<ParamSet>
    {
        self.baseline.as_ref()
            .map(
                |b| b.iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect()
            )
    }

    pub fn data_files_for(&self, case: &str) -> &[String]
    {
        self.data_files.get(case)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudiesConfig
{
    pub studies: BTreeMap<String, StudyConfig>
}

impl StudiesConfig
{
    pub fn load(path: &Path) -> Result<Self>
    {
        read_json_file(path)
    }

    pub fn study(&self, name: &str) -> Option<&StudyConfig>
    {
        self.studies.get(name)
    }
}

/// Command line arguments understood by the simulator for a parameter set.
/// Parameters the simulator has no input for are left out.
pub fn simulator_args(params: &[(String, ParamValue)]) -> Vec<String>
{
    params.iter()
        .filter_map(
            |(name, value)|
            match name.as_str() {
                "med_workers_proportion" => Some(format!("agent.{name}={value}")),
                "num_patients_per_doctor" => Some(format!("hospital_model.{name}={value}")),
                "write_pltfiles" => {
                    let on = matches!(value, ParamValue::Bool(true));
                    Some(format!("hospital_model.write_pltfiles={on}"))
                },
                n if n.starts_with("xmit_hosp_") => Some(format!("disease.{name}={value}")),
                _ => None
            }
        ).collect()
}

#[cfg(test)]
mod testing
{
    use super::*;

    const STUDIES: &str = r#"{
        "studies": {
            "recovery": {
                "name": "Recovery",
                "description": "medical workers and patient load",
                "cases": ["CA", "Bay"],
                "parameters": [
                    {"name": "med_workers_proportion", "values": [0.05, 0.1]},
                    {"name": "num_patients_per_doctor", "values": [5, 10, 20]},
                    {"name": "write_pltfiles", "values": [false]}
                ],
                "baseline": {"med_workers_proportion": 0.0},
                "data_files": {"CA": ["CA.dat", "CA-wf.bin"]}
            }
        }
    }"#;

    fn study() -> StudyConfig
    {
        let config: StudiesConfig = serde_json::from_str(STUDIES).unwrap();
        config.study("recovery").unwrap().clone()
    }

    #[test]
    fn value_types()
    {
        let v: Vec<ParamValue> = serde_json::from_str("[true, 12, 0.25, 1.0]").unwrap();
        assert_eq!(
            v,
            vec![ParamValue::Bool(true), ParamValue::Int(12), ParamValue::Float(0.25), ParamValue::Float(1.0)]
        );
    }

    #[test]
    fn combinations_in_axis_order()
    {
        let s = study();
        assert_eq!(s.num_combinations(), 6);
        let combos = s.combinations();
        assert_eq!(combos.len(), 6);
        assert_eq!(combos[0][0], ("med_workers_proportion".to_owned(), ParamValue::Float(0.05)));
        assert_eq!(combos[0][1].1, ParamValue::Int(5));
        assert_eq!(combos[1][1].1, ParamValue::Int(10));
        assert_eq!(combos[3][0].1, ParamValue::Float(0.1));
        assert!(combos.iter().all(|c| c.len() == 3));
        assert!(s.has_case("Bay"));
        assert!(!s.has_case("US"));
        assert_eq!(s.data_files_for("CA").len(), 2);
        assert!(s.data_files_for("Bay").is_empty());
    }

    #[test]
    fn no_axes_is_a_single_run()
    {
        let mut s = study();
        s.parameters.clear();
        assert_eq!(s.num_combinations(), 1);
        assert_eq!(s.combinations(), vec![Vec::new()]);
    }

    #[test]
    fn arguments()
    {
        let params = vec![
            ("med_workers_proportion".to_owned(), ParamValue::Float(0.05)),
            ("num_patients_per_doctor".to_owned(), ParamValue::Int(10)),
            ("write_pltfiles".to_owned(), ParamValue::Bool(false)),
            ("xmit_hosp_d2p".to_owned(), ParamValue::Float(0.15)),
            ("unused".to_owned(), ParamValue::Int(1)),
        ];
        assert_eq!(
            simulator_args(&params),
            vec![
                "agent.med_workers_proportion=0.05",
                "hospital_model.num_patients_per_doctor=10",
                "hospital_model.write_pltfiles=false",
                "disease.xmit_hosp_d2p=0.15"
            ]
        );
    }
}
