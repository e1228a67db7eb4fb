//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;

use crate::config::AppConfig;

/// Envoy Gateway console backend
#[derive(Parser, Debug)]
#[command(name = "eg-backend")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Serve Envoy Gateway status and actions over a local socket")]
#[command(long_about = None)]
pub struct Args {
    /// Unix socket path to listen on
    #[arg(value_name = "SOCKET")]
    pub socket_path: Option<String>,

    /// Unix socket path (same as the positional argument)
    #[arg(short, long, conflicts_with = "socket_path")]
    pub socket: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// kubectl binary
    #[arg(long)]
    pub kubectl: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Overlay flags on a configuration; flags win over file and environment
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(socket) = self.socket_path.as_ref().or(self.socket.as_ref()) {
            config.socket_path = socket.clone();
        }
        if let Some(kubectl) = &self.kubectl {
            config.kubectl = kubectl.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_socket() {
        let args = Args::parse_from(["eg-backend", "/tmp/eg.sock"]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.socket_path, "/tmp/eg.sock");
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "eg-backend",
            "--socket",
            "/tmp/flag.sock",
            "--kubectl",
            "/opt/kubectl",
            "-v",
        ]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.socket_path, "/tmp/flag.sock");
        assert_eq!(config.kubectl, "/opt/kubectl");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_defaults_untouched() {
        let args = Args::parse_from(["eg-backend"]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_socket_conflict() {
        assert!(Args::try_parse_from(["eg-backend", "/a.sock", "--socket", "/b.sock"]).is_err());
    }
}
