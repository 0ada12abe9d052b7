use colored::Colorize;
use serde::Serialize;

use petdiag::Settings;

pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    pub fn banner(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!(
            "\n{} {}\n{}\n",
            "petdiag".bright_cyan().bold(),
            format!("v{}", version).dimmed(),
            "Pet symptom triage".dimmed(),
        );
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", "[INFO]".blue(), message);
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "[WARN]".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "[ERROR]".red(), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "[OK]".green(), message);
    }

    pub fn show_config(&self, settings: &Settings) {
        println!("\n{}", "CONFIGURATION".bold().underline());
        println!("{}", "─".repeat(50));

        match toml::to_string_pretty(&settings.redacted()) {
            Ok(text) => println!("{}", text),
            Err(e) => self.error(&format!("Could not render configuration: {}", e)),
        }

        let key_state = if settings.provider.resolve_api_key().is_some() {
            "set".green()
        } else {
            "missing".red()
        };
        println!(
            "  {} {} {}",
            "•".cyan(),
            settings.provider.api_key_env.as_str().cyan().bold(),
            key_state
        );
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => self.error(&format!("Could not render result: {}", e)),
        }
    }
}
