//! Config commands

use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::utils::password::hash_password;

use super::helpers::confirm;

/// Generate example configuration file
pub async fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    // 检查文件是否存在，非 --force 模式下交互确认
    if !force
        && Path::new(&path).exists()
        && !confirm(&format!("File already exists: {}. Overwrite?", path))?
    {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    match StaticConfig::default().save_to_file(&path) {
        Ok(()) => {
            println!(
                "  {} {}",
                "Configuration file generated successfully".green(),
                path.blue()
            );
            println!(
                "  {}",
                "Environment variables (TOURSTATS__SECTION__KEY) override file values".dimmed()
            );
            Ok(())
        }
        Err(e) => Err(CliError::CommandError(format!(
            "Unable to write configuration file: {}",
            e
        ))),
    }
}

/// 输出管理令牌的 Argon2 哈希
pub fn config_hash_token(token: &str) -> Result<(), CliError> {
    if token.is_empty() {
        return Err(CliError::ParseError("Token must not be empty".to_string()));
    }
    let hash = hash_password(token).map_err(|e| CliError::CommandError(e.to_string()))?;
    println!("{}", hash);
    Ok(())
}
