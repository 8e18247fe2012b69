use{
    serde::{Serialize, Deserialize},
    std::collections::BTreeMap
};

/// How many digits have to follow a token in a directory name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digits
{
    Exactly(usize),
    AtLeastOne
}

/// A parameter encoded in run directory names as `<abbrev><digits>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamToken
{
    pub abbrev: &'static str,
    pub parameter: &'static str,
    pub digits: Digits,
    /// the encoded integer is `value * scale`
    pub scale: f64
}

impl ParamToken
{
    pub fn decode(&self, encoded: u64) -> f64
    {
        encoded as f64 / self.scale
    }

    pub fn is_integer(&self) -> bool
    {
        self.scale == 1.0
    }
}

pub const PARAM_TOKENS: [ParamToken; 6] = [
    ParamToken{abbrev: "mwprop", parameter: "med_workers_proportion", digits: Digits::Exactly(3), scale: 100.0},
    ParamToken{abbrev: "nppd", parameter: "num_patients_per_doctor", digits: Digits::AtLeastOne, scale: 1.0},
    ParamToken{abbrev: "xmitd2d", parameter: "xmit_hosp_d2d", digits: Digits::Exactly(3), scale: 1000.0},
    ParamToken{abbrev: "xmitd2p", parameter: "xmit_hosp_d2p", digits: Digits::Exactly(3), scale: 1000.0},
    ParamToken{abbrev: "xmitp2d", parameter: "xmit_hosp_p2d", digits: Digits::Exactly(3), scale: 1000.0},
    ParamToken{abbrev: "xmitp2p", parameter: "xmit_hosp_p2p", digits: Digits::Exactly(3), scale: 1000.0},
];

pub const BASELINE_TOKEN: &str = "baseline";

pub fn token_for_parameter(parameter: &str) -> Option<&'static ParamToken>
{
    PARAM_TOKENS.iter().find(|t| t.parameter == parameter)
}

/// Short name used in directory names. Unknown parameters keep their name.
pub fn abbreviation(parameter: &str) -> &str
{
    match parameter {
        "write_pltfiles" => "plt",
        _ => token_for_parameter(parameter).map_or(parameter, |t| t.abbrev)
    }
}

/// Parameters recovered from a run directory name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedParams
{
    pub values: BTreeMap<String, f64>,
    pub is_baseline: bool
}

impl ParsedParams
{
    pub fn get(&self, parameter: &str) -> Option<f64>
    {
        self.values.get(parameter).copied()
    }

    pub fn is_empty(&self) -> bool
    {
        self.values.is_empty() && !self.is_baseline
    }

    pub fn med_workers_proportion(&self) -> f64
    {
        self.get("med_workers_proportion").unwrap_or(0.0)
    }

    pub fn patients_per_doctor(&self) -> f64
    {
        self.get("num_patients_per_doctor").unwrap_or(0.0)
    }
}

// first occurrence of `abbrev` that is followed by enough digits
fn find_encoded(name: &str, token: &ParamToken) -> Option<u64>
{
    name.match_indices(token.abbrev)
        .find_map(
            |(idx, _)|
            {
                let rest = &name[idx + token.abbrev.len()..];
                let available = rest.bytes()
                    .take_while(u8::is_ascii_digit)
                    .count();
                let used = match token.digits {
                    Digits::Exactly(n) if available >= n => n,
                    Digits::AtLeastOne if available >= 1 => available,
                    _ => return None
                };
                rest[..used].parse().ok()
            }
        )
}

/// Recover the sweep parameters encoded in a directory name.
///
/// ```text
/// .run_recovery.CA.dane.mwprop025.nppd012 -> med_workers_proportion 0.25,
///                                             num_patients_per_doctor 12
/// ```
pub fn parse_dirname(name: &str) -> ParsedParams
{
    let values = PARAM_TOKENS.iter()
        .filter_map(
            |token|
            find_encoded(name, token)
                .map(|enc| (token.parameter.to_owned(), token.decode(enc)))
        ).collect();
    ParsedParams{
        values,
        is_baseline: name.contains(BASELINE_TOKEN)
    }
}

#[cfg(test)]
mod testing
{
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn documented_tokens()
    {
        let p = parse_dirname("mwprop025");
        assert_float_absolute_eq!(p.get("med_workers_proportion").unwrap(), 0.25, 1e-12);
        assert_eq!(parse_dirname("nppd12").get("num_patients_per_doctor"), Some(12.0));
        let p = parse_dirname("xmitd2d150");
        assert_float_absolute_eq!(p.get("xmit_hosp_d2d").unwrap(), 0.150, 1e-12);
    }

    #[test]
    fn full_run_directory()
    {
        let p = parse_dirname(".run_hosp_interactions.CA.dane.mwprop010.xmitd2d050.xmitd2p100.xmitp2d200.xmitp2p025");
        assert_eq!(p.values.len(), 5);
        assert_float_absolute_eq!(p.med_workers_proportion(), 0.10, 1e-12);
        assert_float_absolute_eq!(p.get("xmit_hosp_d2d").unwrap(), 0.05, 1e-12);
        assert_float_absolute_eq!(p.get("xmit_hosp_d2p").unwrap(), 0.1, 1e-12);
        assert_float_absolute_eq!(p.get("xmit_hosp_p2d").unwrap(), 0.2, 1e-12);
        assert_float_absolute_eq!(p.get("xmit_hosp_p2p").unwrap(), 0.025, 1e-12);
        assert!(!p.is_baseline);
    }

    #[test]
    fn too_few_digits_and_later_occurrence()
    {
        // two digits are not enough, the later occurrence wins
        let p = parse_dirname("mwprop25.mwprop050");
        assert_float_absolute_eq!(p.med_workers_proportion(), 0.5, 1e-12);
        assert_eq!(parse_dirname("mwprop25").get("med_workers_proportion"), None);
        // only the first three digits are read
        assert_float_absolute_eq!(parse_dirname("mwprop1005").med_workers_proportion(), 1.0, 1e-12);
        assert_eq!(parse_dirname("nppd").get("num_patients_per_doctor"), None);
    }

    #[test]
    fn baseline_and_nothing()
    {
        let p = parse_dirname(".run_recovery.CA.dane.baseline");
        assert!(p.is_baseline);
        assert!(p.values.is_empty());
        assert!(parse_dirname("output.dat").is_empty());
    }

    #[test]
    fn abbreviations()
    {
        assert_eq!(abbreviation("med_workers_proportion"), "mwprop");
        assert_eq!(abbreviation("write_pltfiles"), "plt");
        assert_eq!(abbreviation("something_else"), "something_else");
    }
}
