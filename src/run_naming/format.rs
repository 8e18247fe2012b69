use{
    super::*,
    crate::config::ParamValue
};

pub const RUN_DIR_PREFIX: &str = ".run_";

/// Prefix shared by every run directory of a study, case and machine
pub fn run_dir_prefix(study: &str, case: &str, machine: &str) -> String
{
    format!("{RUN_DIR_PREFIX}{study}.{case}.{machine}")
}

pub fn baseline_dirname(study: &str, case: &str, machine: &str) -> String
{
    format!("{}.{BASELINE_TOKEN}", run_dir_prefix(study, case, machine))
}

/// Encoded value as it appears after the abbreviation, `None` for values
/// that are not part of directory names
pub fn format_value(parameter: &str, value: &ParamValue) -> Option<String>
{
    match value {
        ParamValue::Bool(_) => None,
        ParamValue::Int(i) if (0..1000).contains(i) => Some(format!("{i:03}")),
        ParamValue::Int(i) => Some(i.to_string()),
        ParamValue::Float(f) => {
            let scale = token_for_parameter(parameter)
                .filter(|t| !t.is_integer())
                .map_or(100.0, |t| t.scale);
            Some(format!("{:03}", (f * scale).round() as i64))
        }
    }
}

/// `.run_<study>.<case>.<machine>[.<abbrev><value>]*`
///
/// The encoding is read back by [`parse_dirname`].
pub fn format_dirname(study: &str, case: &str, machine: &str, params: &[(String, ParamValue)]) -> String
{
    let mut name = run_dir_prefix(study, case, machine);
    for (parameter, value) in params
    {
        if let Some(encoded) = format_value(parameter, value) {
            name.push('.');
            name.push_str(abbreviation(parameter));
            name.push_str(&encoded);
        }
    }
    name
}
