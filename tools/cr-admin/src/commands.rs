//! Command dispatch.

use crate::cli::{Args, Command};
use crate::{files, render};
use anyhow::{bail, Context, Result};
use cr_03_lifecycle::{LifecycleApi, LifecycleError};
use cr_04_verification::VerificationApi;
use desk_runtime::{Desk, DeskConfig};
use shared_types::{DeliveryMode, LoginCredentials, RecordId, SessionView};
use std::io::Write;
use tracing::debug;

/// Load configuration honoring `--config` and `--backend`.
pub fn load_config(args: &Args) -> Result<DeskConfig> {
    let mut config = DeskConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &args.backend {
        config.backend.base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

pub async fn run(args: Args, desk: &Desk, out: &mut impl Write) -> Result<()> {
    if !args.command.is_public() || args.command == Command::Login {
        ensure_session(&args, desk).await?;
    }

    match args.command {
        Command::Status => {
            let status = desk.session().check_system_status().await?;
            let text = status.message.unwrap_or_else(|| {
                if status.setup_required {
                    "Initial setup required".to_string()
                } else {
                    "System is configured".to_string()
                }
            });
            writeln!(out, "{text}")?;
        }
        Command::Login | Command::Whoami => {
            let profile = desk.session().require_identity()?;
            write!(out, "{}", render::user(&profile))?;
        }
        Command::Logout => {
            desk.session().logout().await?;
            writeln!(out, "Signed out")?;
        }
        Command::List { status } => {
            let records = match status {
                Some(status) => desk.lifecycle().list_by_status(status).await?,
                None => {
                    desk.lifecycle().refresh().await?;
                    desk.store().get()
                }
            };
            write!(out, "{}", render::records(&records))?;
        }
        Command::Stats => {
            let stats = desk.lifecycle().refresh_statistics().await?;
            write!(out, "{}", render::statistics(&stats))?;
        }
        Command::Import { file } => {
            let upload = files::read_upload(&file)?;
            match desk.lifecycle().import_batch(upload).await {
                Ok(outcome) => writeln!(out, "{}", outcome.message)?,
                Err(LifecycleError::ImportConflict { message, conflicts }) => {
                    writeln!(out, "{message}")?;
                    for line in &conflicts {
                        writeln!(out, "  {line}")?;
                    }
                    bail!("import rejected: {} conflicting rows", conflicts.len());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Queue { id } => {
            desk.lifecycle().refresh().await?;
            let outcome = desk.lifecycle().queue_for_generation(RecordId(id)).await?;
            writeln!(out, "Record {} queued for generation", outcome.record)?;
        }
        Command::Generate { id } => {
            desk.lifecycle().refresh().await?;
            let outcome = desk.lifecycle().generate_certificate(RecordId(id)).await?;
            writeln!(
                out,
                "Certificate {} issued for record {}",
                outcome.certificate_id.as_deref().unwrap_or("(pending id)"),
                outcome.record
            )?;
            if let Some(tx) = &outcome.transaction_id {
                writeln!(out, "Ledger transaction: {tx}")?;
            }
        }
        Command::Download { id, out: dir } => {
            desk.lifecycle().refresh().await?;
            let receipt = desk
                .lifecycle()
                .deliver(RecordId(id), DeliveryMode::Download)
                .await?;
            if let Some(document) = &receipt.document {
                let path = files::save_document(&dir, document)?;
                writeln!(out, "Saved {}", path.display())?;
            }
            let removed = receipt.removal.wait().await;
            debug!(record_id = id, removed, "Delivery settled");
        }
        Command::Email { id } => {
            desk.lifecycle().refresh().await?;
            let receipt = desk
                .lifecycle()
                .deliver(RecordId(id), DeliveryMode::Email)
                .await?;
            writeln!(out, "Certificate {} emailed", receipt.certificate_id)?;
            receipt.removal.wait().await;
        }
        Command::VerifyQr { payload } => {
            let outcome = desk.verification().verify_by_qr_payload(&payload).await;
            write!(out, "{}", render::verification(&outcome))?;
        }
        Command::VerifyDoc { file } => {
            let upload = files::read_upload(&file)?;
            let outcome = desk.verification().verify_by_document(upload).await;
            write!(out, "{}", render::verification(&outcome))?;
        }
    }
    Ok(())
}

/// Sign in with explicit credentials, or fall back to the cached identity.
///
/// The backend session cookie lives only as long as this process, so the
/// cached identity is confirmed against the backend before it is used.
async fn ensure_session(args: &Args, desk: &Desk) -> Result<()> {
    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        desk.session()
            .login(&LoginCredentials::new(username.clone(), password.clone()))
            .await?;
        return Ok(());
    }
    if desk.session().initialize().await.is_none() || !desk.session().is_authenticated() {
        bail!("Not signed in: pass --username/--password or set CR_USERNAME and CR_PASSWORD");
    }
    Ok(())
}
