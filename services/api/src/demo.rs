use crate::infra::{memory_leave_service, render_record};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use leavedesk::error::AppError;
use leavedesk::leave::{
    BlobStore, LeaveService, LeaveServiceSettings, LeaveStatus, LeaveSubmission, LeaveType,
    LeaveView, Session,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Employee who files the demo request
    #[arg(long, default_value = "alice")]
    pub(crate) applicant: String,
    /// Leave category for the demo request
    #[arg(long, default_value = "casual")]
    pub(crate) leave_type: LeaveType,
    /// First day of leave (YYYY-MM-DD). Defaults to a week from today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Last day of leave (YYYY-MM-DD). Defaults to start + 2 days.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Stop after submission and leave the request pending
    #[arg(long)]
    pub(crate) skip_review: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            applicant: "alice".to_string(),
            leave_type: LeaveType::Casual,
            start: None,
            end: None,
            skip_review: false,
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = memory_leave_service(LeaveServiceSettings::default());
    walk_through(&service, args).await
}

async fn walk_through<B: BlobStore>(
    service: &LeaveService<B>,
    args: DemoArgs,
) -> Result<(), AppError> {
    let DemoArgs {
        applicant,
        leave_type,
        start,
        end,
        skip_review,
    } = args;

    let start = start.unwrap_or_else(|| Local::now().date_naive() + Duration::days(7));
    let end = end.unwrap_or(start + Duration::days(2));

    println!("Leave desk demo");
    let queue = service.reviewer_view().await;
    println!(
        "- Seeded history: {} pending | {} approved | {} rejected",
        queue.counts.pending, queue.counts.approved, queue.counts.rejected
    );

    let employee = Session::sign_in(&applicant, "demo")?;
    let record = service
        .submit(
            LeaveSubmission {
                leave_type,
                start_date: start,
                end_date: end,
                reason: "Demo request".to_string(),
            },
            &employee.username,
        )
        .await?;
    println!("\nSubmitted as {} ({})", employee.username, employee.role.label());
    println!("  {}", render_record(&record));

    if let LeaveView::Employee(view) = service.view_for(&employee).await {
        println!(
            "  Remaining allowance: {} of {} days across {} request(s)",
            view.balance.remaining,
            view.balance.allowance,
            view.records.len()
        );
    }

    if skip_review {
        return Ok(());
    }

    let reviewer = Session::sign_in("admin", "demo")?;
    let decided = service
        .update_status(&record.id, LeaveStatus::Approved)
        .await?;
    println!("\nReviewed as {} ({})", reviewer.username, reviewer.role.label());
    println!("  {}", render_record(&decided));

    let queue = service.reviewer_view().await;
    println!(
        "- Queue now: {} pending | {} approved | {} rejected",
        queue.counts.pending, queue.counts.approved, queue.counts.rejected
    );

    Ok(())
}
