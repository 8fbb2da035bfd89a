use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use fudidoflix_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;
use tracing::info;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(output),
        ConfigCommands::Init { force } => init_config(force, output),
        ConfigCommands::SetApiKey { key } => set_api_key(key, output),
    }
}

fn load_credentials(paths: &PathManager) -> Result<CredentialStore> {
    let credentials_file = paths.credentials_file();
    let mut credentials = CredentialStore::new(credentials_file.clone());
    credentials
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(credentials)
}

fn show_config(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let exists = config_file.exists();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let credentials = load_credentials(&paths)?;

    let key_source = if std::env::var(API_KEY_ENV).map(|k| !k.trim().is_empty()).unwrap_or(false) {
        API_KEY_ENV
    } else if credentials.get_tmdb_api_key().is_some() {
        "credentials file"
    } else {
        "none"
    };
    let api_key = credentials.resolve_tmdb_api_key().unwrap_or_default();

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            print_section_header("Configuration", output);
            if !exists {
                output.warn(format!(
                    "No configuration file at {}; showing defaults. Run 'fudidoflix config init' to create one.",
                    display_path(&config_file)
                ));
            }

            let mut files = new_table();
            files.set_header(vec![
                Cell::new("Config File").add_attribute(Attribute::Bold),
                Cell::new(display_path(&config_file)),
            ]);
            files.add_row(vec![Cell::new("Credentials"), Cell::new(display_path(&paths.credentials_file()))]);
            let store_dir = config.storage.directory.clone().unwrap_or_else(|| paths.store_dir());
            files.add_row(vec![Cell::new("Store"), Cell::new(display_path(&store_dir))]);
            files.add_row(vec![Cell::new("Logs"), Cell::new(display_path(paths.log_dir()))]);
            output.table(&files);

            let mut tmdb = section_table("TMDB");
            tmdb.add_row(vec![Cell::new("API Key"), Cell::new(mask_string(&api_key))]);
            tmdb.add_row(vec![Cell::new("Key Source"), Cell::new(key_source)]);
            tmdb.add_row(vec![Cell::new("Base URL"), Cell::new(&config.tmdb.base_url)]);
            tmdb.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
            tmdb.add_row(vec![Cell::new("Region"), Cell::new(&config.tmdb.region)]);
            output.table(&tmdb);

            let mut library = section_table("Library");
            library.add_row(vec![Cell::new("History Limit"), Cell::new(config.storage.history_limit)]);
            library.add_row(vec![
                Cell::new("Continue Watching Limit"),
                Cell::new(config.storage.continue_watching_limit),
            ]);
            library.add_row(vec![
                Cell::new("Check Interval"),
                Cell::new(format!("{}h", config.notifications.check_interval_hours)),
            ]);
            library.add_row(vec![
                Cell::new("First Run Lookback"),
                Cell::new(format!("{} days", config.notifications.first_run_lookback_days)),
            ]);
            output.table(&library);

            let mut player = section_table("Player & Sorte");
            player.add_row(vec![Cell::new("Embed URL"), Cell::new(&config.player.embed_base_url)]);
            player.add_row(vec![
                Cell::new("Remove From My List On Play"),
                Cell::new(check_mark(config.player.remove_from_my_list_on_play)),
            ]);
            player.add_row(vec![
                Cell::new("Spin Duration"),
                Cell::new(format!("{} ms", config.sorte.spin_duration_ms)),
            ]);
            player.add_row(vec![Cell::new("Base Turns"), Cell::new(config.sorte.base_turns)]);
            player.add_row(vec![Cell::new("Surprise Attempts"), Cell::new(config.sorte.surprise_attempts)]);
            output.table(&player);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.emit(&json!({
                "config_file": config_file,
                "exists": exists,
                "api_key": mask_string(&api_key),
                "api_key_source": key_source,
                "config": config,
            }));
        }
    }
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            display_path(&config_file)
        ));
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
    info!(operation = "config_init", path = %config_file.display(), force, "Configuration written");
    output.success(format!("Configuration written to {}", display_path(&config_file)));
    Ok(())
}

fn set_api_key(key_arg: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let key = match key_arg {
        Some(key) => key,
        None => {
            print_section_header("TMDB API Setup", output);
            output.println("Create a key at https://www.themoviedb.org/settings/api and paste the API key (v3) below.");
            rpassword::prompt_password("TMDB API key: ")
                .map_err(|e| color_eyre::eyre::eyre!("Failed to read API key: {}", e))?
        }
    };
    let key = key.trim().to_string();
    validate_api_key(&key).map_err(|e| color_eyre::eyre::eyre!("Validation error: {}", e))?;

    let mut credentials = load_credentials(&paths)?;
    credentials.set_tmdb_api_key(key.clone());
    credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    info!(operation = "config_set_api_key", "TMDB API key stored");
    output.success(format!("API key {} saved to {}", mask_string(&key), display_path(&paths.credentials_file())));
    if std::env::var_os(API_KEY_ENV).is_some() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn section_table(title: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    table
}

fn check_mark(on: bool) -> String {
    if on {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn print_section_header(title: &str, output: &Output) {
    output.println("");
    output.println(title.bold().bright_cyan().to_string());
    output.println("─".repeat(title.chars().count()).bright_cyan().to_string());
}

/// Path with the home directory shortened to `~`.
fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

/// TMDB v3 keys are 32 hex characters
fn validate_api_key(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input.len() != 32 {
        return Err("API key must be 32 characters long");
    }
    if !input.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("API key must only contain hexadecimal characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("0123456789abcdef0123456789ABCDEF").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("short").is_err());
        assert!(validate_api_key("0123456789abcdef0123456789abcdeg").is_err());
    }

    #[test]
    fn test_display_path_outside_home_is_unchanged() {
        assert_eq!(display_path(Path::new("/definitely/not/home")), "/definitely/not/home");
    }
}
