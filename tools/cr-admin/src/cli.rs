//! Command-line arguments.

use clap::{Parser, Subcommand};
use shared_types::CertificateStatus;
use std::path::PathBuf;

/// CR-Admin: certificate desk shell
#[derive(Parser, Debug)]
#[command(name = "cr-admin")]
#[command(about = "Operate the degree certificate desk from a terminal")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "CR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend API root; overrides the config file
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Sign in with this user before running the command
    #[arg(short, long, env = "CR_USERNAME")]
    pub username: Option<String>,

    /// Password for --username
    #[arg(short, long, env = "CR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show whether initial setup is required
    Status,
    /// Sign in and remember the identity
    Login,
    /// Sign out and forget the identity
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List student records
    List {
        /// Only records in this status (PENDING, QUEUED, ISSUED)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<CertificateStatus>,
    },
    /// Show backend statistics
    Stats,
    /// Import a spreadsheet of students
    Import { file: PathBuf },
    /// Queue a PENDING record for generation
    Queue { id: u64 },
    /// Generate the certificate of a QUEUED record
    Generate { id: u64 },
    /// Download an ISSUED certificate (removes the record afterwards)
    Download {
        id: u64,
        /// Directory to write the document into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Email an ISSUED certificate (removes the record afterwards)
    Email { id: u64 },
    /// Verify a certificate from its scanned QR payload
    VerifyQr { payload: String },
    /// Verify a certificate PDF
    VerifyDoc { file: PathBuf },
}

impl Command {
    /// Commands that work without a session.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Status | Self::Login | Self::Logout | Self::VerifyQr { .. } | Self::VerifyDoc { .. }
        )
    }
}

fn parse_status(raw: &str) -> Result<CertificateStatus, String> {
    raw.parse().map_err(|e: shared_types::UnknownStatus| e.to_string())
}
