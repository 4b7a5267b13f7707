//! Startup configuration.
//!
//! Every option can be given as a flag or through the environment, so the
//! bot can run unchanged under a process supervisor or in a container.
//! Configuration is read once; a bad value aborts startup.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::dispatch::DispatchConfig;
use crate::effects::Reaction;
use crate::handlers::{BUILTIN_TOKENS, DEFAULT_CONTRIBUTING_AGREEMENT, builtin_handler};
use crate::registry::{CommandRegistry, RegistryError};
use crate::types::{PermissionLevel, UnknownPermissionLevel};

/// Errors that make the configuration unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret was given but is blank.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A command name the bot has no handler for.
    #[error("unknown command {0:?} (available: {available})", available = BUILTIN_TOKENS.join(", "))]
    UnknownCommand(String),

    /// A permission override names a command that is not enabled.
    #[error("permission override for /{0}, which is not enabled")]
    NotEnabled(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The reply template could not be read.
    #[error("failed to read {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A `token=level` permission override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPermission {
    pub token: String,
    pub level: PermissionLevel,
}

/// Why a `token=level` pair could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandPermissionError {
    #[error("expected token=level, got {0:?}")]
    MissingSeparator(String),

    #[error(transparent)]
    Level(#[from] UnknownPermissionLevel),
}

impl FromStr for CommandPermission {
    type Err = CommandPermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token, level) = s
            .split_once('=')
            .ok_or_else(|| CommandPermissionError::MissingSeparator(s.to_string()))?;
        Ok(CommandPermission {
            token: token.trim().trim_start_matches('/').to_string(),
            level: level.parse()?,
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "comment-dispatch",
    version,
    about = "Runs slash commands posted in GitHub issue and pull request comments"
)]
pub struct Config {
    /// Shared secret configured on the GitHub webhook.
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Token used for GitHub API calls.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Base URL of the GitHub REST API. Defaults to api.github.com; set it
    /// for GitHub Enterprise Server.
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Commands to enable, comma separated.
    #[arg(
        long,
        env = "ENABLED_COMMANDS",
        value_delimiter = ',',
        default_values_t = BUILTIN_TOKENS.map(String::from)
    )]
    pub commands: Vec<String>,

    /// Minimum permission for a command, as `token=level`. Repeatable.
    /// Commands without an override require `read`.
    #[arg(long = "command-permission", env = "COMMAND_PERMISSIONS", value_delimiter = ',')]
    pub command_permissions: Vec<CommandPermission>,

    /// Upper bound in seconds on each GitHub call made for a command.
    #[arg(
        long,
        env = "HANDLER_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub handler_timeout_secs: u64,

    /// Reaction added to a comment once its command is accepted.
    #[arg(long, env = "ACKNOWLEDGEMENT_REACTION", default_value = "rocket")]
    pub acknowledgement: Reaction,

    /// Reply to actors whose permission is too low.
    #[arg(long, env = "REPLY_ON_DENIED")]
    pub reply_on_denied: bool,

    /// Comment on the issue when a command fails.
    #[arg(long, env = "REPORT_FAILURES")]
    pub report_failures: bool,

    /// File holding the text posted by /contributing-agreement.
    #[arg(long, env = "CONTRIBUTING_AGREEMENT_FILE")]
    pub contributing_agreement_file: Option<PathBuf>,
}

impl Config {
    /// Checks values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_secret.trim().is_empty() {
            return Err(ConfigError::Empty("webhook secret"));
        }
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::Empty("GitHub token"));
        }

        for token in &self.commands {
            if !BUILTIN_TOKENS.contains(&token.as_str()) {
                return Err(ConfigError::UnknownCommand(token.clone()));
            }
        }
        for CommandPermission { token, .. } in &self.command_permissions {
            if !BUILTIN_TOKENS.contains(&token.as_str()) {
                return Err(ConfigError::UnknownCommand(token.clone()));
            }
            if !self.commands.contains(token) {
                return Err(ConfigError::NotEnabled(token.clone()));
            }
        }
        Ok(())
    }

    /// The text posted by `/contributing-agreement`.
    pub fn agreement_body(&self) -> Result<String, ConfigError> {
        match &self.contributing_agreement_file {
            Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::ReadTemplate {
                path: path.clone(),
                source,
            }),
            None => Ok(DEFAULT_CONTRIBUTING_AGREEMENT.to_string()),
        }
    }

    /// Builds the registry of enabled commands.
    ///
    /// Listing a command twice is a [`RegistryError::DuplicateCommand`].
    pub fn build_registry(&self) -> Result<CommandRegistry, ConfigError> {
        self.validate()?;

        let agreement = self.agreement_body()?;
        // Later overrides win.
        let floors: HashMap<&str, PermissionLevel> = self
            .command_permissions
            .iter()
            .map(|p| (p.token.as_str(), p.level))
            .collect();

        let mut builder = CommandRegistry::builder();
        for token in &self.commands {
            let handler = builtin_handler(token, &agreement)
                .ok_or_else(|| ConfigError::UnknownCommand(token.clone()))?;
            let floor = floors
                .get(token.as_str())
                .copied()
                .unwrap_or(PermissionLevel::Read);
            builder.register(token.as_str(), floor, handler)?;
        }
        Ok(builder.build())
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            handler_timeout: self.handler_timeout(),
            acknowledgement: self.acknowledgement,
            reply_on_denied: self.reply_on_denied,
            report_failures: self.report_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Config {
        let mut args = vec![
            "comment-dispatch",
            "--webhook-secret",
            "s3cret",
            "--github-token",
            "ghp_test",
        ];
        args.extend_from_slice(extra);
        Config::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);

        assert_eq!(config.listen, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.commands, vec!["assignme", "contributing-agreement"]);
        assert!(config.command_permissions.is_empty());
        assert_eq!(config.handler_timeout(), Duration::from_secs(10));
        assert!(!config.reply_on_denied);
        assert!(!config.report_failures);
        assert_eq!(config.acknowledgement, Reaction::Rocket);
        assert_eq!(config.github_api_url, None);
    }

    #[test]
    fn default_registry_has_builtin_commands_at_read() {
        let registry = parse(&[]).build_registry().unwrap();

        assert_eq!(registry.tokens(), vec!["assignme", "contributing-agreement"]);
        for token in registry.tokens() {
            assert_eq!(
                registry.lookup(token).unwrap().required_permission,
                PermissionLevel::Read
            );
        }
    }

    #[test]
    fn permission_overrides_apply() {
        let config = parse(&[
            "--command-permission",
            "assignme=triage",
            "--command-permission",
            "contributing-agreement=none",
        ]);
        let registry = config.build_registry().unwrap();

        assert_eq!(
            registry.lookup("assignme").unwrap().required_permission,
            PermissionLevel::Triage
        );
        assert_eq!(
            registry
                .lookup("contributing-agreement")
                .unwrap()
                .required_permission,
            PermissionLevel::None
        );
    }

    #[test]
    fn comma_separated_lists_are_split() {
        let config = parse(&[
            "--commands",
            "assignme",
            "--command-permission",
            "assignme=write,assignme=admin",
        ]);

        assert_eq!(config.commands, vec!["assignme"]);
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.tokens(), vec!["assignme"]);
        assert_eq!(
            registry.lookup("assignme").unwrap().required_permission,
            PermissionLevel::Admin
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = parse(&["--commands", "assignme,deploy"])
            .build_registry()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCommand(token) if token == "deploy"));
    }

    #[test]
    fn override_for_disabled_command_is_rejected() {
        let err = parse(&[
            "--commands",
            "assignme",
            "--command-permission",
            "contributing-agreement=write",
        ])
        .build_registry()
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotEnabled(_)));
    }

    #[test]
    fn duplicate_command_is_rejected() {
        let err = parse(&["--commands", "assignme,assignme"])
            .build_registry()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Registry(RegistryError::DuplicateCommand(_))
        ));
    }

    #[test]
    fn blank_secret_is_rejected() {
        let config = Config::try_parse_from([
            "comment-dispatch",
            "--webhook-secret",
            "  ",
            "--github-token",
            "ghp_test",
        ])
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Empty(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Config::try_parse_from([
            "comment-dispatch",
            "--webhook-secret",
            "s",
            "--github-token",
            "t",
            "--handler-timeout-secs",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn bad_permission_pair_is_rejected() {
        assert_eq!(
            "assignme".parse::<CommandPermission>(),
            Err(CommandPermissionError::MissingSeparator("assignme".into()))
        );
        assert!("assignme=owner".parse::<CommandPermission>().is_err());
        assert_eq!(
            "/assignme = Write".parse::<CommandPermission>().unwrap(),
            CommandPermission {
                token: "assignme".into(),
                level: PermissionLevel::Write,
            }
        );
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let config = parse(&[
            "--contributing-agreement-file",
            "/nonexistent/agreement.md",
        ]);
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::ReadTemplate { .. })
        ));
    }

    #[test]
    fn dispatch_config_reflects_flags() {
        let config = parse(&[
            "--handler-timeout-secs",
            "3",
            "--reply-on-denied",
            "--report-failures",
        ]);
        let dispatch = config.dispatch_config();

        assert_eq!(dispatch.handler_timeout, Duration::from_secs(3));
        assert!(dispatch.reply_on_denied);
        assert!(dispatch.report_failures);
        assert_eq!(dispatch.acknowledgement, Reaction::Rocket);
    }

    #[test]
    fn acknowledgement_reaction_is_configurable() {
        let config = parse(&["--acknowledgement", "eyes"]);
        assert_eq!(config.dispatch_config().acknowledgement, Reaction::Eyes);

        let config = parse(&["--acknowledgement", "+1"]);
        assert_eq!(config.dispatch_config().acknowledgement, Reaction::ThumbsUp);
    }

    #[test]
    fn unknown_acknowledgement_is_rejected() {
        let result = Config::try_parse_from([
            "comment-dispatch",
            "--webhook-secret",
            "s3cret",
            "--github-token",
            "ghp_test",
            "--acknowledgement",
            "shrug",
        ]);
        assert!(result.is_err());
    }
}
