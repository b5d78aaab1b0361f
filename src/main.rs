use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use pwseal::{Storage, crypto};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pwseal")]
#[command(
    version,
    about = "Password-based file encryption with Argon2id and XChaCha20-Poly1305."
)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints a fresh random 256-bit key as hex
    Keygen,

    /// Encrypts a file into a password-protected envelope
    #[command(arg_required_else_help = true)]
    Encrypt {
        /// File holding the plaintext
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Where to write the envelope
        output: PathBuf,

        /// Overwrite the output if it already exists.
        ///
        /// Without it, an existing output is refused when the command starts.
        /// A file created at that path while encrypting is still replaced.
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Decrypts an envelope
    #[command(arg_required_else_help = true)]
    Decrypt {
        /// Envelope to decrypt
        input: PathBuf,

        /// Where to write the plaintext (stdout if omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("PWSEAL_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Keygen => {
            let key = crypto::generate_key().context("failed to generate key")?;
            let hex = key.iter().map(|b| format!("{b:02x}")).collect::<String>();
            println!("{hex}");
        }
        Commands::Encrypt {
            input,
            output,
            force,
        } => {
            if !force && Storage::new(output.clone()).exists() {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    output.display()
                );
            }
            let plaintext = zeroize::Zeroizing::new(
                std::fs::read(&input)
                    .with_context(|| format!("failed to read {}", input.display()))?,
            );
            let password = auth::read_password(true)?;

            pwseal::encrypt_file(&output, password.as_bytes(), &plaintext)
                .with_context(|| format!("failed to encrypt into {}", output.display()))?;
            println!("encrypted {} -> {}", input.display(), output.display());
        }
        Commands::Decrypt { input, output } => {
            let password = auth::read_password(false)?;
            let plaintext = pwseal::decrypt_file(&input, password.as_bytes())
                .with_context(|| format!("failed to decrypt {}", input.display()))?;

            match output {
                Some(path) => Storage::new(path.clone())
                    .save(&plaintext)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&plaintext)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}
