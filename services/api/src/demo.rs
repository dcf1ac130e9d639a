use crate::infra::{build_assistant, open_workforce, seeded_rng};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use hr_assist::config::AppConfig;
use hr_assist::error::AppError;
use hr_assist::workforce::analytics::{self, Granularity};
use hr_assist::workforce::{
    EmployeeId, HikeOutcome, MemoryTableStore, TableStore, Workforce,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct HikeArgs {
    /// Employee id, e.g. 104
    pub(crate) employee_id: u32,
    /// Proposed hike in percent (0-100)
    pub(crate) percent: f64,
    /// Evaluation date for tenure (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AnalyticsCommand {
    /// Employees per department
    Headcount,
    /// Exits per year or month, optionally for one department
    Attrition(AttritionArgs),
    /// Average engagement and performance per department
    Engagement,
}

#[derive(Args, Debug)]
pub(crate) struct AttritionArgs {
    /// Department to drill into (all departments when omitted)
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Grouping period: year or month
    #[arg(long, default_value = "year")]
    pub(crate) by: Granularity,
}

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Instruction for the assistant
    #[arg(required = true, num_args = 1..)]
    pub(crate) message: Vec<String>,
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Employee for the compensation scenario (defaults to the first employee)
    #[arg(long)]
    pub(crate) employee_id: Option<u32>,
    /// Hike percentage for the compensation scenario
    #[arg(long, default_value_t = 15.0)]
    pub(crate) percent: f64,
    /// Run against freshly generated in-memory tables instead of the data directory
    #[arg(long)]
    pub(crate) in_memory: bool,
}

fn today_or_now(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn run_hike(config: &AppConfig, args: HikeArgs) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    let outcome = workforce.hike(EmployeeId(args.employee_id), args.percent, today_or_now(args.today))?;
    println!("{}", outcome.render());
    Ok(())
}

pub(crate) fn run_audit(config: &AppConfig) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    println!("{}", workforce.audit()?.render());
    Ok(())
}

pub(crate) fn run_remediate(config: &AppConfig) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    println!("{}", workforce.remediate()?.render());
    Ok(())
}

pub(crate) fn run_verify(config: &AppConfig) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    println!("{}", workforce.verify()?.render());
    Ok(())
}

pub(crate) fn run_reset(config: &AppConfig) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    println!("{}", workforce.reset()?.render());
    Ok(())
}

pub(crate) fn run_analytics(config: &AppConfig, command: AnalyticsCommand) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    let rendered = workforce.read(|tables| match &command {
        AnalyticsCommand::Headcount => {
            analytics::render_headcount(&analytics::headcount_by_department(&tables.employees))
        }
        AnalyticsCommand::Attrition(args) => analytics::attrition_trend(
            &tables.attrition,
            args.department.as_deref(),
            args.by,
        )
        .render(),
        AnalyticsCommand::Engagement => analytics::render_engagement(
            &analytics::engagement_summary(&tables.employees, &tables.engagement),
        ),
    })?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_chat(config: &AppConfig, args: ChatArgs) -> Result<(), AppError> {
    let workforce = open_workforce(&config.data)?;
    let assistant = build_assistant(workforce, &config.engine)?;
    let message = args.message.join(" ");

    let reply = assistant.ask(&message, today_or_now(args.today)).await?;
    for (index, step) in reply.steps.iter().enumerate() {
        println!("[step {}] {} <- {}", index + 1, step.capability.name(), step.input);
    }
    if !reply.steps.is_empty() {
        println!();
    }
    println!("{}", reply.reply);
    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let today = today_or_now(args.today);
    if args.in_memory {
        let workforce = Workforce::open(
            Arc::new(MemoryTableStore::default()),
            seeded_rng(config.data.seed),
        )?;
        walkthrough(&workforce, &args, today)
    } else {
        let workforce = open_workforce(&config.data)?;
        walkthrough(&workforce, &args, today)
    }
}

fn walkthrough<S>(workforce: &Workforce<S>, args: &DemoArgs, today: NaiveDate) -> Result<(), AppError>
where
    S: TableStore + 'static,
{
    println!("HR assistant demo ({today})");

    println!("\n== 1. Reset demo data ==");
    println!("{}", workforce.reset()?.render());

    println!("\n== 2. Daily data audit ==");
    let audit = workforce.audit()?;
    println!("{}", audit.render());

    println!("\n== 3. Employees reply to correction emails ==");
    println!("{}", workforce.remediate()?.render());

    println!("\n== 4. Verify remediation ==");
    println!("{}", workforce.verify()?.render());

    println!("\n== 5. Compensation scenario ==");
    let employee_id = match args.employee_id {
        Some(id) => Some(EmployeeId(id)),
        None => workforce.read(|tables| tables.employees.first().map(|employee| employee.id))?,
    };
    match employee_id {
        Some(employee_id) => {
            let outcome = workforce.hike(employee_id, args.percent, today)?;
            if let HikeOutcome::Report { impact } = &outcome {
                println!(
                    "Modeling a {}% hike for {} ({})",
                    args.percent, impact.name, impact.role
                );
            }
            println!("{}", outcome.render());
        }
        None => println!("No employees on file; skipping the compensation scenario."),
    }

    println!("\n== 6. Workforce snapshot ==");
    let headcount = workforce.read(|tables| {
        analytics::render_headcount(&analytics::headcount_by_department(&tables.employees))
    })?;
    println!("{headcount}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_assist::workforce::RemediationStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn walkthrough_leaves_tables_remediated() {
        let workforce = Workforce::open(
            Arc::new(MemoryTableStore::default()),
            StdRng::seed_from_u64(17),
        )
        .expect("workforce opens");
        let args = DemoArgs {
            percent: 15.0,
            ..DemoArgs::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date");

        walkthrough(&workforce, &args, today).expect("demo runs");
        assert_eq!(
            workforce.verify().expect("verify"),
            RemediationStatus::Complete
        );
    }
}
