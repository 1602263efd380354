mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use streamgate_core::ClaimFormat;
use streamgate_token::KeySize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "streamgate", version, about = "Streamgate stream API")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "streamgate_server=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Token encryption key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Issue, inspect and validate tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Hash and verify passwords
    Password {
        #[command(subcommand)]
        cmd: PasswordCommand,
    },

    /// Validate a configuration file
    Check {
        #[arg(long, short, default_value = "streamgate.yaml")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        #[arg(long, short, default_value = "streamgate.yaml")]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new random key
    Generate {
        #[arg(long, value_enum, default_value = "256")]
        size: KeyBits,

        /// Write the key to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a token
    Issue {
        /// Key as hex, or a path to a file holding it
        #[arg(long, env = "STREAMGATE_SECRET_KEY", hide_env_values = true)]
        key: Option<String>,

        #[arg(long)]
        subject: String,

        /// Right to grant; repeat for several. Defaults to every right.
        #[arg(long = "right")]
        rights: Vec<String>,

        /// Lifetime such as "365d", "12h" or "30m"
        #[arg(long, default_value = "365d")]
        expires: String,

        #[arg(long, value_enum, default_value = "framed")]
        format: FormatArg,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Decrypt a token and print its claims without validating them
    Inspect {
        #[arg(long, env = "STREAMGATE_SECRET_KEY", hide_env_values = true)]
        key: Option<String>,

        #[arg(long, value_enum, default_value = "framed")]
        format: FormatArg,

        /// Token, or a path to a file holding it
        token: String,
    },

    /// Check that a token grants a right to a subject
    Validate {
        #[arg(long, env = "STREAMGATE_SECRET_KEY", hide_env_values = true)]
        key: Option<String>,

        #[arg(long)]
        right: String,

        #[arg(long)]
        subject: String,

        #[arg(long, value_enum, default_value = "framed")]
        format: FormatArg,

        /// Token, or a path to a file holding it
        token: String,
    },
}

#[derive(Subcommand, Debug)]
enum PasswordCommand {
    /// Print an Argon2 hash of the password
    Hash { password: String },

    /// Check a password against a stored hash
    Verify { password: String, hash: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyBits {
    #[value(name = "128")]
    Aes128,
    #[value(name = "192")]
    Aes192,
    #[value(name = "256")]
    Aes256,
}

impl From<KeyBits> for KeySize {
    fn from(bits: KeyBits) -> Self {
        match bits {
            KeyBits::Aes128 => KeySize::Aes128,
            KeyBits::Aes192 => KeySize::Aes192,
            KeyBits::Aes256 => KeySize::Aes256,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Framed,
    Delimited,
}

impl From<FormatArg> for ClaimFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Framed => ClaimFormat::Framed,
            FormatArg::Delimited => ClaimFormat::Delimited,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { size, output } => commands::keys::generate(size.into(), output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Issue {
                key,
                subject,
                rights,
                expires,
                format,
                output,
            } => commands::token::issue(key, subject, rights, expires, format.into(), output)?,
            TokenCommand::Inspect { key, format, token } => {
                commands::token::inspect(key, token, format.into())?
            }
            TokenCommand::Validate {
                key,
                right,
                subject,
                format,
                token,
            } => commands::token::validate(key, token, right, subject, format.into())?,
        },

        Command::Password { cmd } => match cmd {
            PasswordCommand::Hash { password } => commands::password::hash(password)?,
            PasswordCommand::Verify { password, hash } => {
                commands::password::verify(password, hash)?
            }
        },

        Command::Check { config } => commands::check::run(&config)?,

        Command::Serve { config } => commands::serve::run(&config).await?,
    }

    Ok(())
}
