use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    escalation::escalate, load_settings, HttpComplaintTransport, LinkOpener, MessagingChannel,
    NoopLinkOpener, Settings, SubmissionController, SubmitError, SystemLinkOpener,
};
use shared::{
    domain::{FormField, ImageAttachment, SOFT_CAP_ADVISORY},
    error::FileTooLarge,
    protocol::SubmissionStatus,
};

#[derive(Parser, Debug)]
#[command(about = "Rose Villa complaint & feedback intake")]
struct Cli {
    /// Overrides API_BASE_URL and intake.toml.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a complaint to the intake endpoint.
    Submit(ComplaintArgs),
    /// Print (and optionally open) the WhatsApp contact link.
    Whatsapp {
        #[arg(long)]
        open: bool,
    },
    /// Check that the intake endpoint is up.
    Health,
}

#[derive(ClapArgs, Debug)]
struct ComplaintArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    floor: String,
    #[arg(long)]
    room: String,
    #[arg(long)]
    complaint: String,
    #[arg(long)]
    image: Option<PathBuf>,
}

impl ComplaintArgs {
    fn fields(&self) -> [(FormField, &str); 6] {
        [
            (FormField::Name, self.name.as_str()),
            (FormField::Email, self.email.as_str()),
            (FormField::Phone, self.phone.as_str()),
            (FormField::Floor, self.floor.as_str()),
            (FormField::Room, self.room.as_str()),
            (FormField::Complaint, self.complaint.as_str()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }

    match cli.command {
        Command::Submit(args) => submit(&settings, args).await,
        Command::Whatsapp { open } => {
            let channel = MessagingChannel::from_settings(&settings);
            let opener: &dyn LinkOpener = if open {
                &SystemLinkOpener
            } else {
                &NoopLinkOpener
            };
            let link = escalate(&channel, opener).context("failed to open WhatsApp link")?;
            println!("{link}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let transport = HttpComplaintTransport::new(&settings)?;
            let health = transport.check_health().await?;
            println!("{}: {}", health.service, health.status);
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Selects the image and returns the size advisory to show, if the accepted image calls for one.
fn attach_image(
    controller: &mut SubmissionController,
    image: ImageAttachment,
) -> Result<Option<&'static str>, FileTooLarge> {
    let over_soft_cap = image.exceeds_soft_cap();
    controller.select_image(Some(image))?;
    Ok(over_soft_cap.then_some(SOFT_CAP_ADVISORY))
}

async fn submit(settings: &Settings, args: ComplaintArgs) -> Result<ExitCode> {
    let mut controller = SubmissionController::from_settings(settings)?;

    for (field, value) in args.fields() {
        controller.update_field(field, value);
    }

    if let Some(path) = &args.image {
        let image = ImageAttachment::from_path(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        match attach_image(&mut controller, image) {
            Ok(Some(advisory)) => eprintln!("{advisory}"),
            Ok(None) => {}
            Err(rejected) => {
                eprintln!("{}", rejected.user_message());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    match controller.submit().await {
        Ok(status) => {
            if let Some(message) = status.user_message() {
                println!("{message}");
            }
            Ok(if status == SubmissionStatus::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(SubmitError::Validation(failure)) => {
            for error in &failure.errors {
                eprintln!("{}", error.message());
            }
            Ok(ExitCode::from(2))
        }
        Err(err @ SubmitError::AlreadyPending) => Err(err.into()),
    }
}
