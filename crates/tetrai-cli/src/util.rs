use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use tetrai_evaluator::board_evaluator::HeuristicWeights;

/// Writes `value` as pretty JSON to `output_path`, or to stdout if `None`.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Reads heuristic weights. Missing fields keep their default values.
pub fn read_weights_file(path: &Path) -> anyhow::Result<HeuristicWeights> {
    read_json_file("weights", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &HeuristicWeights::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        let parsed: HeuristicWeights = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, HeuristicWeights::default());
    }

    #[test]
    fn test_read_weights_file() {
        let path = std::env::temp_dir().join(format!("tetrai-weights-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "bumpiness": 1.5 }"#).unwrap();
        let weights = read_weights_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!((weights.bumpiness - 1.5).abs() < f32::EPSILON);
        assert_eq!(weights.holes, HeuristicWeights::default().holes);

        let err = read_weights_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open weights file"));
    }
}
