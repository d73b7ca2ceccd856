use crate::infra::{file_leave_service, render_record};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use leavedesk::config::AppConfig;
use leavedesk::error::AppError;
use leavedesk::leave::{
    BlobStore, LeaveId, LeaveService, LeaveStatus, LeaveSubmission, LeaveType,
};
use leavedesk::telemetry;

#[derive(Subcommand, Debug)]
pub(crate) enum LeaveCommand {
    /// Apply for leave on behalf of an employee
    Submit(SubmitArgs),
    /// List leave records, optionally only one applicant's
    List(ListArgs),
    /// Show one leave record
    Show {
        /// Leave record id
        id: String,
    },
    /// Show the review queues with counts
    Review,
    /// Approve a pending leave
    Approve {
        /// Leave record id
        id: String,
    },
    /// Reject a pending leave
    Reject {
        /// Leave record id
        id: String,
    },
    /// Show the remaining allowance for an employee
    Balance {
        /// Employee username
        applicant: String,
    },
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Employee username filing the request
    #[arg(long)]
    pub(crate) applicant: String,
    /// casual, sick, earned, or emergency
    #[arg(long, default_value = "casual")]
    pub(crate) leave_type: LeaveType,
    /// First day of leave (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: NaiveDate,
    /// Last day of leave, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: NaiveDate,
    /// Why the leave is needed
    #[arg(long)]
    pub(crate) reason: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Only show records filed by this employee
    #[arg(long)]
    pub(crate) applicant: Option<String>,
}

pub(crate) async fn run_leave_command(command: LeaveCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = file_leave_service(&config.leave);
    execute(&service, command).await
}

pub(crate) async fn execute<B: BlobStore>(
    service: &LeaveService<B>,
    command: LeaveCommand,
) -> Result<(), AppError> {
    match command {
        LeaveCommand::Submit(args) => {
            let submission = LeaveSubmission {
                leave_type: args.leave_type,
                start_date: args.start,
                end_date: args.end,
                reason: args.reason,
            };
            let record = service.submit(submission, &args.applicant).await?;
            let balance = service.balance(&record.applicant).await;
            println!("Submitted {}", render_record(&record));
            println!(
                "Remaining allowance for {}: {} of {} days",
                record.applicant, balance.remaining, balance.allowance
            );
        }
        LeaveCommand::List(args) => {
            let records = match args.applicant.as_deref() {
                Some(applicant) => service.list_by_applicant(applicant).await,
                None => service.list_all().await,
            };
            if records.is_empty() {
                println!("No leave records found");
            }
            for record in &records {
                println!("{}", render_record(record));
            }
        }
        LeaveCommand::Show { id } => {
            let record = service.get(&LeaveId(id)).await?;
            println!("{}", render_record(&record));
        }
        LeaveCommand::Review => {
            let view = service.reviewer_view().await;
            println!(
                "{} pending | {} approved | {} rejected",
                view.counts.pending, view.counts.approved, view.counts.rejected
            );
            for status in [
                LeaveStatus::Pending,
                LeaveStatus::Approved,
                LeaveStatus::Rejected,
            ] {
                let records = view.partition.with_status(status);
                if records.is_empty() {
                    continue;
                }
                println!("\n{}:", status);
                for record in records {
                    println!("  {}", render_record(record));
                }
            }
        }
        LeaveCommand::Approve { id } => {
            let record = service
                .update_status(&LeaveId(id), LeaveStatus::Approved)
                .await?;
            println!("Approved {}", render_record(&record));
        }
        LeaveCommand::Reject { id } => {
            let record = service
                .update_status(&LeaveId(id), LeaveStatus::Rejected)
                .await?;
            println!("Rejected {}", render_record(&record));
        }
        LeaveCommand::Balance { applicant } => {
            let balance = service.balance(&applicant).await;
            println!(
                "{}: {} of {} days remaining ({} committed)",
                applicant, balance.remaining, balance.allowance, balance.committed_days
            );
        }
    }

    Ok(())
}
