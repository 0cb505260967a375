//! One batch request: uploaded files plus form fields in, edited JPEGs out.

use crate::config::Config;
use anyhow::{Context, Result};
use photo_effect::{BASE_PRESET, ParameterSet, PresetStore, edited_name, process_bytes};
use rayon::prelude::*;
use std::{collections::BTreeMap, path::Path};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub files: Vec<UploadedFile>,

    /// Raw form fields, keyed by parameter name
    pub form: BTreeMap<String, String>,

    /// Preset the form fields are layered on
    pub preset: Option<String>,

    /// Store the resolved parameters under this name
    pub save_preset: Option<String>,
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// Nothing was uploaded, send the user back to the form
    Redirect,
    Processed {
        outputs: Vec<ProcessedFile>,
        progress: Vec<String>,
    },
}

impl BatchRequest {
    /// Form fields win over the named preset, which wins over the defaults.
    pub fn resolve_params(&self, store: &PresetStore) -> ParameterSet {
        let preset = self
            .preset
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(BASE_PRESET);

        store
            .resolve(preset)
            .merge_form(self.form.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    fn uploads(&self) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|f| !f.filename.trim().is_empty())
            .collect()
    }
}

/// Run a batch request. The store is only rewritten when a non-empty preset
/// name was asked for and every photo went through.
pub fn handle(
    request: &BatchRequest,
    store: &mut PresetStore,
    presets_path: &Path,
    config: &Config,
) -> Result<BatchOutcome> {
    let uploads = request.uploads();
    if uploads.is_empty() {
        log::info!("no files uploaded");
        return Ok(BatchOutcome::Redirect);
    }

    let params = request.resolve_params(store);
    log::debug!("resolved parameters: {params:?}");

    let total = uploads.len();
    let progress = uploads
        .iter()
        .enumerate()
        .map(|(i, f)| format!("Processing {} ({}/{})...", f.filename, i + 1, total))
        .collect::<Vec<_>>();

    let run = |file: &&UploadedFile| -> Result<ProcessedFile> {
        log::info!("processing {}", file.filename);
        let bytes = process_bytes(&file.bytes, &params, config.jpeg_quality)
            .with_context(|| format!("process {} failed", file.filename))?;

        Ok(ProcessedFile {
            name: edited_name(&file.filename),
            bytes,
        })
    };

    let outputs = if config.parallel {
        uploads.par_iter().map(run).collect::<Result<Vec<_>>>()?
    } else {
        uploads.iter().map(run).collect::<Result<Vec<_>>>()?
    };

    if let Some(name) = request.save_preset.as_deref() {
        save_preset(store, presets_path, name, &params)?;
    }

    Ok(BatchOutcome::Processed { outputs, progress })
}

/// Store `params` under `name` and persist. An empty name is ignored.
pub fn save_preset(
    store: &mut PresetStore,
    presets_path: &Path,
    name: &str,
    params: &ParameterSet,
) -> Result<bool> {
    if name.trim().is_empty() {
        log::debug!("empty preset name, nothing saved");
        return Ok(false);
    }

    store.insert(name, params.clone())?;
    store
        .save(presets_path)
        .with_context(|| format!("save presets to {} failed", presets_path.display()))?;
    log::info!("saved preset {}", name.trim());

    Ok(true)
}
