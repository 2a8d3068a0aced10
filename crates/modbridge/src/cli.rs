use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use modbridge_core::capability::NativeLibraryLookup;
use modbridge_core::config::ConfigFormat;
use modbridge_core::kernel::constants::CONFIG_FILE_NAME;
use modbridge_core::tag;
use modbridge_core::{Application, CompatConfig, TagValue};
use serde_json::Value as JsonValue;

pub type CliResult = Result<(), Box<dyn Error>>;

fn read_file(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    fs::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e).into())
}

/// Explicit path, else `modbridge.toml` in the working directory, else defaults.
fn load_config(path: Option<&Path>) -> Result<CompatConfig, Box<dyn Error>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(CONFIG_FILE_NAME);
            if !fallback.is_file() {
                log::info!("No {} found, using the default configuration", CONFIG_FILE_NAME);
                return Ok(CompatConfig::default());
            }
            fallback
        }
    };
    Ok(CompatConfig::load(&path)?)
}

pub fn probe(config: Option<&Path>, modules_dir: &Path) -> CliResult {
    let config = load_config(config)?;
    let lookup = NativeLibraryLookup::new().with_search_dir(modules_dir);
    let app = Application::bootstrap(config, Box::new(lookup))?;

    print!("{}", app.capabilities());
    println!("Scheduler: {}", app.bridge().mode());
    println!("Bindings:");
    for (kind, state) in app.registry().states() {
        println!("  {}: {}", kind, state);
    }

    app.shutdown();
    Ok(())
}

pub fn tag_encode(input: &Path, output: &Path) -> CliResult {
    let json: JsonValue = serde_json::from_slice(&read_file(input)?)
        .map_err(|e| format!("{} is not valid JSON: {}", input.display(), e))?;
    let bytes = tag::encode(&TagValue::from(json))?;
    fs::write(output, &bytes).map_err(|e| format!("cannot write {}: {}", output.display(), e))?;
    log::info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

pub fn tag_decode(input: &Path, pretty: bool) -> CliResult {
    let value = tag::decode(&read_file(input)?)?;
    let json = JsonValue::from(&value);
    let text = if pretty { serde_json::to_string_pretty(&json)? } else { serde_json::to_string(&json)? };
    println!("{}", text);
    Ok(())
}

pub fn config_default(format: ConfigFormat) -> CliResult {
    print!("{}", CompatConfig::default().render(format)?);
    Ok(())
}
