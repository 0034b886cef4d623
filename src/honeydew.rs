/// Honeydew configuration loading
///
/// The file is read as JSON when its extension is `.json` and as YAML
/// otherwise. Keys keep their case: the map is embedded verbatim into the
/// generated Mobly config.
///
/// `HONEYDEW_<A>__<B>=value` variables override nested values. Each segment
/// matches an existing key ignoring ASCII case and is lowercased when no key
/// matches. Values that parse as JSON keep their type, anything else is a
/// string.
use crate::driver::{read_json_from_file, read_yaml_from_file};
use crate::{DriverError, DriverResult, HoneydewConfig};
use serde_json::{Map, Value};
use std::path::Path;

pub const ENV_PREFIX: &str = "HONEYDEW_";

const ENV_SEPARATOR: &str = "__";

/// Load the Honeydew config at `path` (if any) and apply overrides from `vars`
pub fn load_honeydew_config<I>(path: Option<&Path>, vars: I) -> DriverResult<HoneydewConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => HoneydewConfig::new(),
    };

    for (name, value) in vars {
        let Some(key_path) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let segments: Vec<&str> = key_path
            .split(ENV_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect();

        tracing::debug!(var = %name, "Applying Honeydew override");
        apply_override(&mut config, &segments, parse_override(&value))?;
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> DriverResult<HoneydewConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value: Value = if is_json {
        read_json_from_file(path)?
    } else {
        read_yaml_from_file(path)?
    };

    match value {
        Value::Object(map) => Ok(map),
        // An empty YAML document
        Value::Null => Ok(HoneydewConfig::new()),
        _ => Err(DriverError::InvalidConfig(format!(
            "{} must contain a mapping",
            path.display()
        ))),
    }
}

fn parse_override(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn matching_key(map: &Map<String, Value>, segment: &str) -> String {
    map.keys()
        .find(|key| key.eq_ignore_ascii_case(segment))
        .cloned()
        .unwrap_or_else(|| segment.to_ascii_lowercase())
}

fn apply_override(
    config: &mut Map<String, Value>,
    segments: &[&str],
    value: Value,
) -> DriverResult<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = config;
    for segment in parents {
        let key = matching_key(current, segment);
        current = match current
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => map,
            _ => {
                return Err(DriverError::InvalidConfig(format!(
                    "cannot override below non-mapping Honeydew key \"{}\"",
                    segment
                )))
            }
        };
    }

    let key = matching_key(current, last);
    current.insert(key, value);
    Ok(())
}
