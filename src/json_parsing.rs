use{
    serde::{Serialize, de::DeserializeOwned},
    serde_json::Value,
    std::{
        fs::File,
        io::{BufReader, Write},
        path::Path,
        process::exit
    },
    crate::error::*
};

/// Read the parameter file of a subcommand.
///
/// Without a file the default parameters are printed as an example json
/// and the program exits.
pub fn parse<P, T>(file: Option<P>) -> (T, Value)
where P: AsRef<Path>,
    T: Default + Serialize + DeserializeOwned
{
    match file
    {
        None => {
            let example = T::default();
            match serde_json::to_string_pretty(&example)
            {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("unable to serialize example: {e}")
            }
            println!("\nUse --json <file> to pass your own parameters");
            exit(0)
        },
        Some(path) => {
            match try_parse(path.as_ref())
            {
                Ok(res) => res,
                Err(e) => {
                    eprintln!("Error while reading parameter file: {e}");
                    exit(1)
                }
            }
        }
    }
}

/// Like [`parse`], but falls back to the default parameters instead of
/// exiting when the command line already says what to do.
pub fn parse_or_default<P, T>(file: Option<P>, use_default: bool) -> (T, Value)
where P: AsRef<Path>,
    T: Default + Serialize + DeserializeOwned
{
    if file.is_none() && use_default {
        let opt = T::default();
        let json = serde_json::to_value(&opt)
            .unwrap_or(Value::Null);
        (opt, json)
    } else {
        parse(file)
    }
}

pub fn try_parse<T>(path: &Path) -> Result<(T, Value)>
where T: DeserializeOwned
{
    let json: Value = read_json_file(path)?;
    let opt: T = serde_json::from_value(json.clone())?;
    Ok((opt, json))
}

pub fn read_json_file<T>(path: &Path) -> Result<T>
where T: DeserializeOwned
{
    let file = File::open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EpiError::not_found(path)
            } else {
                e.into()
            }
        })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| EpiError::malformed(path, e.to_string()))
}

pub fn write_json<W: Write>(mut writer: W, json: &Value) -> std::io::Result<()>
{
    write!(writer, "#")?;
    serde_json::to_writer(&mut writer, json)?;
    writeln!(writer)
}

#[cfg(test)]
mod testing
{
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct Dummy {
        a: u32,
        b: String
    }

    #[test]
    fn header_line_is_commented()
    {
        let mut buf = Vec::new();
        let json = serde_json::json!({"a": 1});
        write_json(&mut buf, &json).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "#{\"a\":1}\n");
    }

    #[test]
    fn parse_from_file()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, r#"{"a": 3, "b": "x"}"#).unwrap();
        let (d, v): (Dummy, Value) = try_parse(&path).unwrap();
        assert_eq!(d, Dummy{a: 3, b: "x".to_owned()});
        assert_eq!(v["a"], 3);
    }

    #[test]
    fn missing_file_is_not_found()
    {
        let res: Result<(Dummy, Value)> = try_parse(Path::new("/definitely/not/here.json"));
        assert!(res.unwrap_err().is_not_found());
    }

    #[test]
    fn broken_json_is_malformed()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, "{ nope").unwrap();
        let res: Result<(Dummy, Value)> = try_parse(&path);
        assert!(matches!(res, Err(EpiError::MalformedData{..})));
    }
}
