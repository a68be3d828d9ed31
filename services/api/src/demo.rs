use crate::infra::open_marketplace;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;
use trampo_certo::config::AppConfig;
use trampo_certo::error::AppError;
use trampo_certo::marketplace::flex_score::FlexLevel;
use trampo_certo::marketplace::session::CompanyRegistration;
use trampo_certo::marketplace::{
    AccessibilityDocument, Applicant, ApplicationStatus, ApplyOutcome, CompanyDashboard, Job,
    JobId, JobPosting, KeyValueStore, MarketplaceOptions, MarketplaceService, MemoryStore,
    Modality, Registration, SearchParams, StudentId,
};

#[derive(Args, Debug, Default)]
pub(crate) struct JobSearchArgs {
    /// Free text matched against title, company, and description
    pub(crate) query: Option<String>,
    /// Comma-separated modalities (remote, hybrid, onsite)
    #[arg(long)]
    pub(crate) modality: Option<String>,
    /// Comma-separated workload ranges (up_to_20, from_20_to_30, over_30)
    #[arg(long)]
    pub(crate) workload: Option<String>,
    /// Comma-separated schedule tags
    #[arg(long)]
    pub(crate) schedule: Option<String>,
    /// Comma-separated accessibility tags
    #[arg(long)]
    pub(crate) accessibility: Option<String>,
    /// Minimum flex score (0-100)
    #[arg(long)]
    pub(crate) min_flex_score: Option<u8>,
    /// Result ordering: recent, flex_score, or workload
    #[arg(long)]
    pub(crate) sort: Option<String>,
}

impl From<JobSearchArgs> for SearchParams {
    fn from(args: JobSearchArgs) -> Self {
        SearchParams {
            q: args.query,
            modality: args.modality,
            workload: args.workload,
            schedule: args.schedule,
            accessibility: args.accessibility,
            min_flex_score: args.min_flex_score,
            sort: args.sort,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date stamped on demo applications (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Seeded student who applies during the walkthrough (defaults to student1)
    #[arg(long)]
    pub(crate) student_id: Option<String>,
    /// Skip the company posting step.
    #[arg(long)]
    pub(crate) skip_posting: bool,
}

pub(crate) fn run_job_search(args: JobSearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = open_marketplace(&config.storage)?;

    let jobs = service.search_with_params(args.into())?;
    println!("{} posting(s) found", jobs.len());
    for job in &jobs {
        println!("{}", render_job_line(job));
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = MarketplaceService::open(
        Arc::new(MemoryStore::new()),
        MarketplaceOptions::default(),
    )?;
    demo_walkthrough(&service, args)?;
    Ok(())
}

/// What the walkthrough did, for callers that want more than the printed narrative.
#[derive(Debug)]
pub(crate) struct DemoSummary {
    pub(crate) published: Option<JobId>,
    pub(crate) applied_to: Option<JobId>,
    pub(crate) duplicate_blocked: bool,
    pub(crate) dashboard: CompanyDashboard,
}

pub(crate) fn demo_walkthrough<S>(
    service: &MarketplaceService<S>,
    args: DemoArgs,
) -> Result<DemoSummary, AppError>
where
    S: KeyValueStore + ?Sized + 'static,
{
    let DemoArgs {
        today,
        student_id,
        skip_posting,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let student_id = StudentId(student_id.unwrap_or_else(|| "student1".to_string()));

    println!("Trampo Certo marketplace demo");
    println!("\nCatalogue");
    for job in service.list_jobs()? {
        println!("{}", render_job_line(&job));
    }

    let published = if skip_posting {
        None
    } else {
        let account = service.register(Registration::Company(CompanyRegistration {
            name: "Renata Dias".to_string(),
            email: "renata@inclusiva.dev".to_string(),
            company_name: "Inclusiva Tech".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            phone: None,
            website: Some("https://inclusiva.dev".to_string()),
            description: Some("Software acessível para educação.".to_string()),
        }))?;
        let posted = service.post_job(demo_posting(), account.display_company())?;

        println!("\n{} published '{}'", account.display_company(), posted.job.title);
        println!(
            "- Flex score {} ({})",
            posted.breakdown.score,
            posted.breakdown.level().label()
        );
        for component in &posted.breakdown.components {
            println!("  - +{} {}", component.points, component.notes);
        }
        if !posted.badges.is_empty() {
            println!("- Badges: {}", posted.badges.join(", "));
        }
        service.logout()?;
        Some(posted.job.id)
    };

    let params = SearchParams {
        modality: Some("remote,hybrid".to_string()),
        min_flex_score: Some(80),
        sort: Some("flex_score".to_string()),
        ..SearchParams::default()
    };
    let matches = service.search_with_params(params)?;
    println!("\nRemote or hybrid postings scoring 80+, best first");
    for job in &matches {
        println!("{}", render_job_line(job));
    }

    let applicant = match service.get_student_by_id(&student_id)? {
        Some(student) => Applicant::from(&student),
        None => Applicant::new(student_id.clone(), "Estudante Demo", "estudante@email.com"),
    };

    let mut applied_to = None;
    let mut duplicate_blocked = false;
    if let Some(target) = matches.first() {
        println!("\n{} applies to '{}'", applicant.name, target.title);
        if let ApplyOutcome::Submitted(application) =
            service.apply_to_job_on(&target.id, &applicant, today)?
        {
            println!(
                "- Application {} recorded on {}",
                application.id, application.applied_date
            );
            applied_to = Some(target.id.clone());
        }
        duplicate_blocked =
            service.apply_to_job_on(&target.id, &applicant, today)? == ApplyOutcome::AlreadyApplied;
        if duplicate_blocked {
            println!("- Second attempt ignored: already applied");
        }
    }

    let reviewing = JobId::from("1");
    let pending: Vec<_> = service
        .get_applications_by_job(&reviewing)?
        .into_iter()
        .filter(|application| application.status == ApplicationStatus::Pending)
        .collect();
    println!("\nCompany review of job {reviewing}");
    for (index, application) in pending.iter().enumerate() {
        let decided = if index == 0 {
            service.approve_application(&application.id)?
        } else {
            service.reject_application(&application.id)?
        };
        if let Some(decided) = decided {
            println!("- {}: {}", decided.student_name, decided.status.label());
        }
    }

    println!("\nApplications of {}", applicant.name);
    for view in service.student_applications(&applicant.id)? {
        let title = view
            .job
            .as_ref()
            .map(|job| job.title.as_str())
            .unwrap_or("(vaga removida)");
        println!(
            "- {} | {} | {}",
            title, view.application.applied_date, view.status_label
        );
    }

    let dashboard = service.company_dashboard()?;
    println!(
        "\nDashboard: {} active postings | {} applications ({} pending, {} approved, {} rejected)",
        dashboard.active_jobs,
        dashboard.applications.total,
        dashboard.applications.pending,
        dashboard.applications.approved,
        dashboard.applications.rejected
    );
    for row in &dashboard.jobs {
        println!(
            "- {} ({}): {} application(s)",
            row.title, row.posted_date, row.applications
        );
    }

    Ok(DemoSummary {
        published,
        applied_to,
        duplicate_blocked,
        dashboard,
    })
}

fn demo_posting() -> JobPosting {
    JobPosting {
        title: "Estágio em Acessibilidade Digital".to_string(),
        location: "Florianópolis, SC".to_string(),
        modality: Modality::Remote,
        workload: "20h/semana".to_string(),
        salary: Some("R$ 1.600/mês".to_string()),
        description: "Auditoria de acessibilidade em plataformas de ensino.".to_string(),
        requirements: vec!["Cursando Computação ou Design".to_string()],
        benefits: vec!["Auxílio home office".to_string()],
        accessibility: vec!["Leitores de tela para deficientes visuais".to_string()],
        schedule: vec!["Horários flexíveis".to_string()],
        category: Some("Tecnologia".to_string()),
        accessibility_documents: vec![AccessibilityDocument {
            name: "relatorio-acessibilidade.pdf".to_string(),
            size_bytes: 120_000,
        }],
    }
}

pub(crate) fn render_job_line(job: &Job) -> String {
    let level = FlexLevel::from_score(job.flex_score);
    format!(
        "[{:>3} {}] {} | {} | {} | {} | {}",
        job.flex_score,
        level.label(),
        job.title,
        job.company,
        job.location,
        job.modality.display_label(),
        job.workload
    )
}
