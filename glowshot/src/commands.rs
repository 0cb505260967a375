use crate::{
    archive,
    cli::{Cli, Command, PresetCommand, ProcessArgs},
    config::Config,
    request::{self, BatchOutcome},
};
use anyhow::{Context, Result, bail};
use photo_effect::PresetStore;

/// Load config and presets, then run the requested subcommand.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::init(cli.config)?;
    let presets_path = config.presets_file();

    let mut store = PresetStore::load(&presets_path);
    store
        .ensure_defaults(&presets_path)
        .with_context(|| format!("seed presets in {} failed", presets_path.display()))?;

    match cli.command {
        Command::Process(args) => {
            if let Some(quality) = args.quality {
                config.jpeg_quality = quality;
            }
            process(&args, &mut store, &config)
        }
        Command::Preset(command) => preset(command, &mut store, &config),
    }
}

fn process(args: &ProcessArgs, store: &mut PresetStore, config: &Config) -> Result<()> {
    let request = args.to_request()?;
    let presets_path = config.presets_file();

    match request::handle(&request, store, &presets_path, config)? {
        BatchOutcome::Redirect => {
            println!("No photos given, nothing to do.");
        }
        BatchOutcome::Processed { outputs, progress } => {
            for step in &progress {
                println!("{step}");
            }

            let output_dir = config.output_path(args.output.as_deref());
            if args.archive || config.archive {
                let path = archive::write_archive(&outputs, &output_dir)?;
                println!("Wrote {} photos to {}", outputs.len(), path.display());
            } else {
                let paths = archive::write_files(&outputs, &output_dir)?;
                println!("Wrote {} photos to {}", paths.len(), output_dir.display());
            }
        }
    }

    Ok(())
}

fn preset(command: PresetCommand, store: &mut PresetStore, config: &Config) -> Result<()> {
    match command {
        PresetCommand::List => {
            for name in store.names() {
                println!("{name}");
            }
        }
        PresetCommand::Show { name } => match store.get(&name) {
            Some(params) => println!("{}", serde_json::to_string_pretty(params)?),
            None => bail!("no preset named `{name}`"),
        },
        PresetCommand::Delete { name } => {
            if store.remove(&name)?.is_none() {
                bail!("no preset named `{name}`");
            }

            let path = config.presets_file();
            store
                .save(&path)
                .with_context(|| format!("save presets to {} failed", path.display()))?;
            println!("Deleted preset {name}");
        }
    }

    Ok(())
}
