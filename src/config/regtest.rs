use{
    std::{
        collections::{BTreeMap, BTreeSet},
        path::Path
    },
    serde::{Serialize, Deserialize},
    tracing::warn,
    crate::{
        error::*,
        json_parsing::read_json_file
    }
};

pub const ALL_CASES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase
{
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// simulator input, relative to the common directory
    #[serde(default)]
    pub input_file: String,
    /// linked next to the input file
    #[serde(default)]
    pub data_files: Vec<String>
}

impl TestCase
{
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str
    {
        self.name.as_deref().unwrap_or(key)
    }
}

/// Regression test cases and named groups of them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCasesConfig
{
    pub test_cases: BTreeMap<String, TestCase>,
    #[serde(default)]
    pub test_groups: BTreeMap<String, Vec<String>>
}

impl TestCasesConfig
{
    pub fn load(path: &Path) -> Result<Self>
    {
        read_json_file(path)
    }

    /// Expand `all`, group names and single cases. Unknown names are
    /// reported and ignored.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> BTreeSet<String>
    {
        let mut resolved = BTreeSet::new();
        for name in names.iter().map(AsRef::as_ref)
        {
            if name == ALL_CASES {
                resolved.extend(self.test_cases.keys().cloned());
            } else if let Some(group) = self.test_groups.get(name) {
                resolved.extend(group.iter().cloned());
            } else if self.test_cases.contains_key(name) {
                resolved.insert(name.to_owned());
            } else {
                warn!("unknown test case or group: {name}");
            }
        }
        resolved
    }
}

#[cfg(test)]
mod testing
{
    use super::*;

    #[test]
    fn groups_and_all()
    {
        let config: TestCasesConfig = serde_json::from_str(
            r#"{
                "test_cases": {
                    "CA": {
                        "name": "California",
                        "tags": ["census"],
                        "input_file": "inputs.ca",
                        "data_files": ["CA.dat", "CA-wf.bin"]
                    },
                    "Bay": {},
                    "US": {"description": "full country"}
                },
                "test_groups": {"small": ["Bay", "CA"]}
            }"#
        ).unwrap();
        let all: Vec<_> = config.resolve(&["all"]).into_iter().collect();
        assert_eq!(all, vec!["Bay", "CA", "US"]);
        let small: Vec<_> = config.resolve(&["small", "nope"]).into_iter().collect();
        assert_eq!(small, vec!["Bay", "CA"]);
        let single: Vec<_> = config.resolve(&["US".to_owned()]).into_iter().collect();
        assert_eq!(single, vec!["US"]);

        let ca = &config.test_cases["CA"];
        assert_eq!(ca.input_file, "inputs.ca");
        assert_eq!(ca.data_files, vec!["CA.dat", "CA-wf.bin"]);
        assert_eq!(ca.display_name("CA"), "California");
        assert_eq!(config.test_cases["Bay"].display_name("Bay"), "Bay");
        assert!(config.test_cases["Bay"].input_file.is_empty());
    }
}
