use crate::infra::{build_discovery_service, demo_candidates};
use clap::Args;
use founder_scout::config::AppConfig;
use founder_scout::error::AppError;
use founder_scout::telemetry;
use founder_scout::workflows::discovery::{
    load_catalog, CandidateRepository, CatalogFilter, CatalogView, CsvCandidateRepository,
    DiscoveryPolicy, DiscoveryResponse, SearchCriteria,
};
use std::fmt::Write as _;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Minimum years of experience requested
    #[arg(long, default_value_t = 5)]
    pub(crate) min_years: u32,
    /// Sector or location text; also used for geo resolution
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Academic requirement, e.g. "PhD"
    #[arg(long)]
    pub(crate) academic: Option<String>,
    /// Do not ask for founder signals
    #[arg(long)]
    pub(crate) no_founder: bool,
    /// Do not ask for technical signals
    #[arg(long)]
    pub(crate) no_technical: bool,
    /// Do not require startup experience
    #[arg(long)]
    pub(crate) no_startup: bool,
    /// Override DISCOVERY_POLICY (accumulate or first-hit)
    #[arg(long)]
    pub(crate) policy: Option<DiscoveryPolicy>,
    /// Override DISCOVERY_TARGET
    #[arg(long)]
    pub(crate) target: Option<usize>,
    /// Print the full response as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl SearchArgs {
    pub(crate) fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            min_years_experience: self.min_years,
            sector: self.sector.clone(),
            academic: self.academic.clone(),
            founder_signal: !self.no_founder,
            technical_signal: !self.no_technical,
            startup_experience_required: !self.no_startup,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct CandidatesArgs {
    /// Comma-separated tiers to keep, e.g. "A,B"
    #[arg(long)]
    pub(crate) tier: Option<String>,
    /// Comma-separated profile types to keep (technical, business)
    #[arg(long)]
    pub(crate) profile_type: Option<String>,
    /// Case-insensitive text search over name, summary, and justification
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,
    /// Show at most this many rows
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Export the filtered view to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

impl CandidatesArgs {
    pub(crate) fn filter(&self) -> CatalogFilter {
        CatalogFilter::from_params(
            self.tier.as_deref(),
            self.profile_type.as_deref(),
            self.query.as_deref(),
        )
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Write to this file instead of the configured CANDIDATES_CSV
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(policy) = args.policy {
        config.discovery.policy = policy;
    }
    if let Some(target) = args.target {
        config.discovery.target_pool_size = target.max(1);
    }

    telemetry::init(&config.telemetry)?;

    let service = build_discovery_service(&config)?;
    let response = service.run(args.criteria()).await?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&response)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        print!("{}", render_search_summary(&response));
    }
    Ok(())
}

pub(crate) fn run_candidates(args: CandidatesArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = CsvCandidateRepository::from_config(&config.storage);
    let view = load_catalog(&repository, &args.filter())?;

    print!("{}", render_catalog(&view, args.limit));

    if let Some(path) = args.csv {
        export_view(&view, &path)?;
        println!("Exported {} candidates to {}", view.filtered, path.display());
    }
    Ok(())
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let repository = match args.csv {
        Some(path) => CsvCandidateRepository::new(path),
        None => CsvCandidateRepository::from_config(&AppConfig::load()?.storage),
    };
    let location = seed_repository(&repository)?;
    println!("Seeded demo candidates into {location}");
    Ok(())
}

pub(crate) fn seed_repository<R>(repository: &R) -> Result<String, AppError>
where
    R: CandidateRepository,
{
    Ok(repository.persist(&demo_candidates())?)
}

/// Rows are written in rank order, so row N is entry N of the view.
pub(crate) fn export_view(view: &CatalogView, path: &std::path::Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows: Vec<_> = view.candidates().cloned().collect();
    CsvCandidateRepository::write_rows(BufWriter::new(file), &rows)?;
    Ok(())
}

pub(crate) fn render_search_summary(response: &DiscoveryResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Discovery {}", response.status.label());
    let _ = writeln!(
        out,
        "- unique candidates: {} | geo: {} | first hit: {}",
        response.total_unique,
        response.geo_used.as_deref().unwrap_or("none"),
        response.attempt_used.as_deref().unwrap_or("none"),
    );
    if !response.rotation_queries.is_empty() {
        let _ = writeln!(
            out,
            "- rotation queries: {}",
            response.rotation_queries.join(" | ")
        );
    }
    if let Some(location) = &response.persisted_location {
        let _ = writeln!(out, "- saved to {location}");
    }

    if response.preview.is_empty() {
        let _ = writeln!(out, "No candidates found for these criteria.");
        return out;
    }

    let _ = writeln!(out, "Top candidates:");
    for (index, candidate) in response.preview.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. [{}] {:>3}  {} ({})",
            index + 1,
            candidate.tier().label(),
            candidate.score(),
            candidate.name,
            candidate.profile_type.label(),
        );
    }
    out
}

pub(crate) fn render_catalog(view: &CatalogView, limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} of {} candidates | avg score {:.1} | top score {} | tier A: {}",
        view.filtered,
        view.total,
        view.average_score,
        view.top_score,
        view.tier_a().len(),
    );

    let shown = limit.unwrap_or(view.entries.len());
    for entry in view.entries.iter().take(shown) {
        let candidate = &entry.candidate;
        let _ = writeln!(
            out,
            "{:>3}. [{}] {:>3}  {} ({})",
            entry.rank,
            candidate.tier().label(),
            candidate.score(),
            candidate.name,
            candidate.profile_type.label(),
        );
        let _ = writeln!(out, "       {}", candidate.summary);
        if let Some(link) = candidate.source_links.first() {
            let _ = writeln!(out, "       {link}");
        }
    }
    if view.entries.len() > shown {
        let _ = writeln!(out, "... {} more", view.entries.len() - shown);
    }
    out
}
