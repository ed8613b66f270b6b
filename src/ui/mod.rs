//! Terminal output
//!
//! All of devtask's own messages go to stderr so the output of the tools it
//! runs stays clean on stdout.

use colored::Colorize;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    #[default]
    Normal = 2,
    Verbose = 3,
}

/// Echo a command line before it runs
pub fn print_command(verbosity: Verbosity, line: &str) {
    if verbosity >= Verbosity::Normal {
        eprintln!("{} {}", "[RUN]".cyan().bold(), line);
    }
}

/// Print a command line that is not executed (dry run)
pub fn print_dry_run(verbosity: Verbosity, line: &str) {
    if verbosity >= Verbosity::Quiet {
        eprintln!("{} {}", "[DRY]".yellow().bold(), line);
    }
}

pub fn print_info(verbosity: Verbosity, message: &str) {
    if verbosity >= Verbosity::Normal {
        eprintln!("{} {}", "[INFO]".green(), message);
    }
}

pub fn print_debug(verbosity: Verbosity, message: &str) {
    if verbosity >= Verbosity::Verbose {
        eprintln!("{} {}", "[DEBUG]".dimmed(), message);
    }
}

pub fn print_error(verbosity: Verbosity, message: &str) {
    if verbosity >= Verbosity::Quiet {
        eprintln!("{} {}", "error:".red().bold(), message);
    }
}

/// One row of `devtask --list`
pub fn format_task_line(name: &str, usage: Option<&str>, deps: &[String], width: usize) -> String {
    let padded = format!("{:<width$}", name, width = width);
    let mut line = format!("    {}", padded.bold());
    if let Some(usage) = usage {
        line.push_str(&format!("  {}", usage));
    }
    if !deps.is_empty() {
        line.push_str(&format!(" {}", format!("[{}]", deps.join(", ")).dimmed()));
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_format_task_line() {
        colored::control::set_override(false);
        let line = format_task_line(
            "qa",
            Some("Run every gate"),
            &["lint".to_string(), "test".to_string()],
            6,
        );
        assert_eq!(line, "    qa      Run every gate [lint, test]");
        assert_eq!(format_task_line("test", None, &[], 6), "    test");
    }
}
