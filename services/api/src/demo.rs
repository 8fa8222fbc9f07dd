use crate::infra::InMemoryApplicationRepository;
use chrono::SecondsFormat;
use clap::Args;
use job_portal::error::AppError;
use job_portal::workflows::applications::{
    history_status_for, resolve_status, ApplicationStatusService, JobId, PipelineSettings,
    StatusUpdateRequest, TerminalStatusPolicy, UserId,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Board column key (interested, applied, interview, offer, accepted, rejected, referrals)
    #[arg(long)]
    pub(crate) column: String,
    /// Optional sub-stage key; overrides the column default when recognized
    #[arg(long)]
    pub(crate) sub_stage: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Refuse transitions out of REJECTED and OFFER_ACCEPTED.
    #[arg(long)]
    pub(crate) lock_terminal: bool,
    /// Job id the demo application is created for.
    #[arg(long, default_value_t = 1)]
    pub(crate) job_id: u64,
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let resolution = resolve_status(&args.column, args.sub_stage.as_deref())?;

    println!("Column: {}", args.column);
    println!(
        "Sub-stage: {}",
        args.sub_stage.as_deref().unwrap_or("(none)")
    );
    println!("Resolved status: {}", resolution.status);
    println!("History status: {}", history_status_for(resolution.status));
    if let Some(stage) = resolution.sub_stage {
        println!("Stored sub-stage: {stage}");
    }

    Ok(())
}

/// Scripted board moves, including a redundant drop and a rejected reopen attempt.
const DEMO_STEPS: [(&str, Option<&str>); 7] = [
    ("applied", None),
    ("applied", None),
    ("interview", Some("phone_screening")),
    ("interview", Some("final_interview_stage")),
    ("interview", Some("negotiation")),
    ("rejected", None),
    ("applied", None),
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let terminal_policy = if args.lock_terminal {
        TerminalStatusPolicy::Locked
    } else {
        TerminalStatusPolicy::Reopenable
    };
    let settings = PipelineSettings {
        terminal_policy,
        disclose_error_details: true,
    };

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationStatusService::new(repository, settings);
    let applicant = UserId(1);

    println!("Application status demo (terminal policy: {terminal_policy})");
    let record = service.create(applicant, JobId(args.job_id))?;
    println!(
        "Created application {} for job {} in {}",
        record.id, args.job_id, record.status
    );

    println!("\nBoard moves");
    for (column, sub_stage) in DEMO_STEPS {
        let request = StatusUpdateRequest::ByColumn {
            application_id: record.id,
            column: column.to_string(),
            sub_stage: sub_stage.map(str::to_string),
        };
        let target = match sub_stage {
            Some(stage) => format!("{column}/{stage}"),
            None => column.to_string(),
        };

        match service.update(applicant, request) {
            Ok(outcome) if outcome.changed => println!(
                "- {target}: {} -> {}",
                outcome.previous, outcome.application.status
            ),
            Ok(outcome) => println!("- {target}: unchanged ({})", outcome.application.status),
            Err(err) => println!("- {target}: refused ({err})"),
        }
    }

    println!("\nAudit trail");
    for entry in service.history(applicant, record.id)? {
        println!(
            "- {} {}",
            entry.changed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.status
        );
    }

    let board = service.board(applicant)?;
    println!("\nBoard");
    for lane in &board.lanes {
        println!("- {}: {} card(s)", lane.column, lane.cards.len());
    }

    Ok(())
}
