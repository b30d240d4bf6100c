use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use salthash::{Configuration, Result, shared, task};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file. Defaults to `config.yaml`.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Hash a plaintext with a fresh salt.
    Hash {
        /// Read from the first line of stdin when omitted.
        plaintext: Option<String>,
    },
    /// Check a plaintext against an encoded digest.
    Verify {
        digest: String,
        /// Read from the first line of stdin when omitted.
        plaintext: Option<String>,
    },
    /// Validate secrets and print the digest layout.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    // a subscriber may already be set by the embedding environment.
    let _ = salthash::telemetry::init("warn");

    let args = Args::parse();
    let result = run(args).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }

    ExitCode::from(exit_status(&result))
}

/// Run a command. `Ok(false)` means the digest did not match.
async fn run(args: Args) -> Result<bool> {
    let path = args.config.unwrap_or_default();
    let hasher = shared::get_or_init(|| {
        Configuration::default().path(path).read()?.with_env().hasher()
    })?;

    match args.cmd {
        Commands::Hash { plaintext } => {
            let plaintext = plaintext_or_stdin(plaintext).await?;
            let digest = task::hash(hasher, plaintext).await?;
            println!("{digest}");

            Ok(true)
        },
        Commands::Verify { digest, plaintext } => {
            let plaintext = plaintext_or_stdin(plaintext).await?;
            let matched = task::verify(hasher, plaintext, digest).await?;
            println!("{matched}");

            Ok(matched)
        },
        Commands::CheckConfig => {
            println!("salt length: {} bytes", hasher.salt_len());
            println!("decoded digest length: {} bytes", hasher.digest_len());

            Ok(true)
        },
    }
}

/// 0 on success, 1 on mismatch, 2 on any error.
fn exit_status(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Plaintext from the argument, or the first stdin line.
async fn plaintext_or_stdin(plaintext: Option<String>) -> Result<String> {
    match plaintext {
        Some(plaintext) => Ok(plaintext),
        None => {
            tokio::task::spawn_blocking(|| first_line(std::io::stdin().lock()))
                .await?
        },
    }
}

/// First line of `reader` without its line ending. Empty at EOF.
fn first_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);

    Ok(line)
}
