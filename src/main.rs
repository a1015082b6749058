//! CV matcher: semantic CV and job description matching tool

mod cli;
mod config;
mod embedding;
mod error;
mod matching;
mod models;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, OutputFormat};
use colored::Colorize;
use config::MatchConfig;
use embedding::HfInferenceClient;
use error::{MatcherError, Result};
use log::{error, info};
use matching::engine::MatchEngine;
use matching::status::get_match_level;
use models::{
    Candidate, JobDescription, MatchReport, MatchStatus, SkillCategories, SkillPresence,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match MatchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: MatchConfig) -> Result<()> {
    match command {
        Commands::Match {
            jd,
            cv,
            skills,
            presence,
            output,
        } => {
            info!("Starting CV match");

            for path in [Some(&jd), Some(&cv), skills.as_ref(), presence.as_ref()]
                .into_iter()
                .flatten()
            {
                cli::validate_file_extension(path, &["json"])
                    .map_err(MatcherError::InvalidInput)?;
            }

            let output_format =
                cli::parse_output_format(&output).map_err(MatcherError::InvalidInput)?;

            let jd: JobDescription = read_json(&jd)?;
            let cv: Candidate = read_json(&cv)?;
            let skill_categories: Option<SkillCategories> =
                skills.as_deref().map(read_json).transpose()?;
            let skill_presence: Option<SkillPresence> =
                presence.as_deref().map(read_json).transpose()?;

            let provider = Arc::new(HfInferenceClient::new(&config.embedding)?);
            let engine = MatchEngine::new(provider, config);

            let report = engine
                .compute_match(
                    &jd,
                    &cv,
                    skill_categories.as_ref(),
                    skill_presence.as_ref(),
                )
                .await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Console => print_console_report(&jd, &report),
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        MatcherError::InvalidInput(format!("{}: {}", path.display(), e))
    })
}

fn print_console_report(jd: &JobDescription, report: &MatchReport) {
    let d = &report.details;

    let status_label = match d.status {
        MatchStatus::Pass => d.status.to_string().green().bold(),
        MatchStatus::Rejected => d.status.to_string().red().bold(),
        MatchStatus::Pending => d.status.to_string().yellow().bold(),
    };

    println!();
    println!("{}", "═".repeat(60));
    println!("  Match report: {}", jd.job_title.bold());
    println!("{}", "═".repeat(60));
    println!(
        "  Overall score:  {:.1}%  ({})",
        report.score * 100.0,
        get_match_level(report.score)
    );
    println!("  Status:         {}", status_label);
    println!();
    println!("  {}", "Dimension breakdown".underline());
    print_dimension("Job title", d.job_title_similarity);
    print_dimension("Responsibilities", d.responsibilities_similarity);
    print_dimension("Experience", d.experience_suitability);
    print_dimension("Education", d.education_relevance);
    print_dimension("Skills", d.skills_match);
    print_dimension("Location", d.location_compatibility);
    print_dimension("Role relevance", d.role_relevance);
    println!();
    println!(
        "  Experience:     {:.1} yrs (required: {:.1} yrs)",
        d.candidate_exp_years, d.required_exp_years
    );
    if let Some(role) = &d.suggested_role {
        println!("  Suggested role: {}", role);
    }

    if !d.skills_details.is_empty() {
        println!();
        println!("  {}", "Skill categories".underline());
        let mut categories: Vec<_> = d.skills_details.iter().collect();
        categories.sort_by(|a, b| a.0.cmp(b.0));
        for (name, breakdown) in categories {
            println!(
                "    {:<12} {}/{} present ({:.0}%)",
                name,
                breakdown.present_count,
                breakdown.total,
                breakdown.presence_ratio * 100.0
            );
            if !breakdown.absent.is_empty() {
                println!("      missing: {}", breakdown.absent.join(", ").red());
            }
        }
    }

    println!();
    println!("  {}", d.match_summary);
    println!("{}", "═".repeat(60));
}

fn print_dimension(label: &str, score: f32) {
    let bar_len = (score * 20.0).round() as usize;
    let bar = format!("{}{}", "█".repeat(bar_len), "░".repeat(20 - bar_len.min(20)));
    println!("    {:<18} {} {:.1}%", label, bar, score * 100.0);
}
