use std::fs;

use chmm_core::settings;

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: npath.nbest={}, cascade.max_candidates={}, recognizer.max_variants={}",
        s.npath.nbest, s.cascade.max_candidates, s.recognizer.max_variants
    );
}

/// Install a custom settings file before anything reads the settings.
pub fn load_settings(file: Option<&str>) {
    let Some(file) = file else {
        return;
    };
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(settings::init_custom(content), "Error in {file}: {}");
}
