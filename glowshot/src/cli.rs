use crate::request::{BatchRequest, UploadedFile};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{collections::BTreeMap, fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "glowshot", version, about = "Warm, glowing batch photo edits")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit photos and write the results
    Process(ProcessArgs),

    /// Manage saved presets
    #[command(subcommand)]
    Preset(PresetCommand),
}

#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Photos to edit
    pub files: Vec<PathBuf>,

    /// Preset to start from
    #[arg(long)]
    pub preset: Option<String>,

    /// Override one parameter, e.g. `--set glow_blur=12`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// Add film grain
    #[arg(long)]
    pub grain: bool,

    /// Add sun traces
    #[arg(long)]
    pub sun_traces: bool,

    /// Save the resolved parameters as a preset
    #[arg(long)]
    pub save_preset: Option<String>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pack the results into one archive
    #[arg(long)]
    pub archive: bool,

    /// JPEG quality
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// List preset names
    List,

    /// Print a preset as JSON
    Show { name: String },

    /// Delete a preset
    Delete { name: String },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

impl ProcessArgs {
    /// The form fields this invocation posts, checkboxes included.
    pub fn form(&self) -> BTreeMap<String, String> {
        let mut form = self.fields.iter().cloned().collect::<BTreeMap<_, _>>();

        if self.grain {
            form.insert("grain_effect".to_string(), "on".to_string());
        }

        if self.sun_traces {
            form.insert("sun_traces_effect".to_string(), "on".to_string());
        }

        form
    }

    /// Read every file into a batch request.
    pub fn to_request(&self) -> Result<BatchRequest> {
        let files = self
            .files
            .iter()
            .map(|path| {
                let bytes =
                    fs::read(path).with_context(|| format!("read {} failed", path.display()))?;
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();

                Ok(UploadedFile { filename, bytes })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchRequest {
            files,
            form: self.form(),
            preset: self.preset.clone(),
            save_preset: self.save_preset.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_args() {
        let cli = Cli::try_parse_from([
            "glowshot",
            "process",
            "a.jpg",
            "b.png",
            "--preset",
            "sunset",
            "--set",
            "glow_blur=12",
            "--set",
            "contrast=1.2",
            "--grain",
            "--quality",
            "80",
        ])
        .unwrap();

        let Command::Process(args) = cli.command else {
            panic!("expected process command");
        };

        assert_eq!(args.files.len(), 2);
        assert_eq!(args.preset.as_deref(), Some("sunset"));
        assert_eq!(args.quality, Some(80));

        let form = args.form();
        assert_eq!(form.get("glow_blur").map(String::as_str), Some("12"));
        assert_eq!(form.get("contrast").map(String::as_str), Some("1.2"));
        assert_eq!(form.get("grain_effect").map(String::as_str), Some("on"));
        assert!(!form.contains_key("sun_traces_effect"));
    }

    #[test]
    fn test_rejects_bad_fields_and_quality() {
        assert!(Cli::try_parse_from(["glowshot", "process", "--set", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["glowshot", "process", "--quality", "0"]).is_err());
    }

    #[test]
    fn test_process_without_files_parses() {
        let cli = Cli::try_parse_from(["glowshot", "process"]).unwrap();
        assert!(matches!(cli.command, Command::Process(ref a) if a.files.is_empty()));
    }

    #[test]
    fn test_preset_subcommands() {
        let cli = Cli::try_parse_from(["glowshot", "preset", "show", "base"]).unwrap();
        assert!(matches!(cli.command, Command::Preset(PresetCommand::Show { ref name }) if name == "base"));
    }
}
