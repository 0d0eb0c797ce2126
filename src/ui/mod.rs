//! Terminal output for the CLI
//!
//! Table-format command output goes through [`Ui`]. Headings and labels are
//! only styled on an interactive terminal; piped or CI output stays plain so
//! it can be grepped.

use console::style;
use std::io::IsTerminal;

/// Environment variables set by common CI systems
const CI_VARS: &[&str] = &["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "TF_BUILD"];

/// Status marker in front of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Info,
    Warn,
    Error,
}

impl Status {
    fn marker(self) -> String {
        match self {
            Status::Ok => style("[OK]").green().to_string(),
            Status::Info => style("[INFO]").cyan().to_string(),
            Status::Warn => style("[WARN]").yellow().to_string(),
            Status::Error => style("[ERROR]").red().to_string(),
        }
    }
}

/// Printer for human-readable command output
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    styled: bool,
}

impl Ui {
    /// Style output only when stdout is a terminal outside CI
    pub fn detect() -> Self {
        let ci = CI_VARS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            styled: std::io::stdout().is_terminal() && !ci,
        }
    }

    pub fn plain() -> Self {
        Self { styled: false }
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    pub fn heading(&self, title: &str) {
        if self.styled {
            println!("{}\n", style(title).cyan().bold());
        } else {
            println!("{}", title);
        }
    }

    pub fn status(&self, status: Status, message: &str) {
        println!("  {} {}", status.marker(), message);
    }

    /// Indented `label: value` line under the last status
    pub fn field(&self, label: &str, value: &str) {
        let label = if self.styled {
            style(label).dim().to_string()
        } else {
            label.to_string()
        };
        println!("    {}: {}", label, value);
    }
}
