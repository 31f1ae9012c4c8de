use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ash_canopy_sim::{
    io::{self, RecordWriter},
    models::{Locale, PolicyKind, PolicyParams, SiteConfig},
    simulation::{Metric, PolicyGrid, Simulator},
    visualization::{
        print_metric_chart, print_policy_comparison, print_site_summary, print_sweep_optima,
        print_year_table,
    },
};

#[derive(Parser)]
#[command(
    name = "ash-sim",
    about = "Ash Canopy Simulator - compare emerald ash borer management policies",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the site configuration comes from.
#[derive(Args)]
struct SiteArgs {
    /// Site preset: generic, park, or street
    #[arg(short, long, default_value = "generic")]
    site: String,

    /// Scenario file (TOML or JSON); takes precedence over --site
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the number of simulated years
    #[arg(short, long)]
    years: Option<u32>,

    /// Override the annual inflation rate (0.02 = 2%)
    #[arg(long)]
    inflation: Option<f64>,
}

/// Policy parameter overrides.
#[derive(Args)]
struct PolicyArgs {
    /// Ash trees removed per year during removal
    #[arg(long)]
    removal_rate: Option<u64>,

    /// Last injection year before removal (replant-inject-remove)
    #[arg(long)]
    removal_year: Option<u32>,

    /// Years of injection before removal (inject-remove-replant)
    #[arg(long)]
    injection_years: Option<u32>,

    /// Replacement trees planted per year (replant-inject-remove)
    #[arg(long)]
    planting_rate: Option<u64>,

    /// First planting year (replant-inject-remove)
    #[arg(long)]
    planting_year: Option<u32>,
}

impl PolicyArgs {
    fn apply(&self, params: &mut PolicyParams) {
        if let Some(v) = self.removal_rate {
            params.removal_rate = v;
        }
        if let Some(v) = self.removal_year {
            params.removal_year = v;
        }
        if let Some(v) = self.injection_years {
            params.injection_years = v;
        }
        if let Some(v) = self.planting_rate {
            params.planting_rate = v;
        }
        if let Some(v) = self.planting_year {
            params.planting_year = v;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one policy and show the year-by-year results
    Run {
        /// Policy: control-remove, control-remove-replant, remove-replant,
        /// replant-inject-remove, inject-remove-replant, inject-perpetuity,
        /// or inject-perpetuity-replant
        #[arg(short, long)]
        policy: String,

        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        params: PolicyArgs,

        /// Export the year records (CSV, JSON, or Excel by extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also draw a bar chart of this metric: count, basal-area, cost, value, or net
        #[arg(long)]
        chart: Option<String>,
    },

    /// Simulate every policy and compare final-year results
    Compare {
        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        params: PolicyArgs,
    },

    /// Sweep a policy's parameters and report the best setting per metric
    Sweep {
        /// Policy to sweep
        #[arg(short, long)]
        policy: String,

        #[command(flatten)]
        site: SiteArgs,

        /// Removal rates to try (comma separated)
        #[arg(long, value_delimiter = ',')]
        removal_rates: Option<Vec<u64>>,

        /// Injection durations to try
        #[arg(long, value_delimiter = ',')]
        injection_years: Option<Vec<u32>>,

        /// Removal start years to try
        #[arg(long, value_delimiter = ',')]
        removal_years: Option<Vec<u32>>,

        /// Planting rates to try
        #[arg(long, value_delimiter = ',')]
        planting_rates: Option<Vec<u64>>,

        /// Planting start years to try
        #[arg(long, value_delimiter = ',')]
        planting_years: Option<Vec<u32>>,
    },

    /// Show a site preset
    Sites {
        /// Preset to show; all presets when omitted
        #[arg(short, long)]
        site: Option<String>,

        /// Print as a TOML scenario instead of a table
        #[arg(long)]
        toml: bool,
    },
}

fn parse_locale(name: &str) -> Result<Locale> {
    match name.parse::<Locale>() {
        Ok(locale) => Ok(locale),
        Err(_) => anyhow::bail!("Unknown site: {name}. Use: generic, park, or street"),
    }
}

fn parse_policy(name: &str) -> Result<PolicyKind> {
    match name.parse::<PolicyKind>() {
        Ok(kind) => Ok(kind),
        Err(_) => {
            let known: Vec<&str> = PolicyKind::ALL.iter().map(|k| k.slug()).collect();
            anyhow::bail!("Unknown policy: {name}. Use one of: {}", known.join(", "))
        }
    }
}

fn load_site(args: &SiteArgs) -> Result<(SiteConfig, PolicyParams)> {
    let (mut site, params) = match &args.scenario {
        Some(path) => {
            let scenario = io::load_scenario(path)?;
            (scenario.site, scenario.params)
        }
        None => (parse_locale(&args.site)?.config(), PolicyParams::default()),
    };
    if let Some(years) = args.years {
        site.horizon_years = years;
    }
    if let Some(rate) = args.inflation {
        site.inflation_rate = rate;
    }
    site.validate()?;
    Ok((site, params))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            policy,
            site,
            params,
            output,
            chart,
        } => {
            let kind = parse_policy(&policy)?;
            let metric = match chart.as_deref() {
                Some(name) => match name.parse::<Metric>() {
                    Ok(metric) => Some(metric),
                    Err(_) => anyhow::bail!(
                        "Unknown metric: {name}. Use: count, basal-area, cost, value, or net"
                    ),
                },
                None => None,
            };

            let (site, mut policy_params) = load_site(&site)?;
            params.apply(&mut policy_params);
            let policy = kind.with_params(&policy_params);

            println!(
                "\n{}",
                format!("Simulating {} on site '{}'", kind, site.name)
                    .bold()
                    .cyan()
            );

            let run = Simulator::new(&site).run(&policy)?;
            print_year_table(&run.policy, &run.records);
            if let Some(metric) = metric {
                print_metric_chart(&run.records, metric);
            }

            if let Some(path) = output {
                let writer = io::writer_for_path(&path)?;
                writer.write(&run.records, &path)?;
                println!(
                    "\n{} Wrote {} years to {}",
                    "Success!".green().bold(),
                    run.records.len(),
                    path.display()
                );
            }
        }

        Commands::Compare { site, params } => {
            let (site, mut policy_params) = load_site(&site)?;
            params.apply(&mut policy_params);

            let runs = Simulator::new(&site).run_all(&policy_params)?;
            print_site_summary(&site);
            print_policy_comparison(&runs);
        }

        Commands::Sweep {
            policy,
            site,
            removal_rates,
            injection_years,
            removal_years,
            planting_rates,
            planting_years,
        } => {
            let kind = parse_policy(&policy)?;
            let (site, _) = load_site(&site)?;

            let defaults = PolicyGrid::default();
            let grid = PolicyGrid {
                removal_rates: removal_rates.unwrap_or(defaults.removal_rates),
                injection_years: injection_years.unwrap_or(defaults.injection_years),
                removal_years: removal_years.unwrap_or(defaults.removal_years),
                planting_rates: planting_rates.unwrap_or(defaults.planting_rates),
                planting_years: planting_years.unwrap_or(defaults.planting_years),
            };
            let policies = grid.policies(kind);

            println!(
                "\n{}",
                format!(
                    "Sweeping {} on site '{}' ({} combinations)",
                    kind,
                    site.name,
                    policies.len()
                )
                .bold()
                .cyan()
            );

            let results = Simulator::new(&site).sweep(&policies)?;
            print_sweep_optima(&results.optima(), results.len());
        }

        Commands::Sites { site, toml } => {
            let locales = match site {
                Some(name) => vec![parse_locale(&name)?],
                None => Locale::ALL.to_vec(),
            };
            for locale in locales {
                let config = locale.config();
                if toml {
                    println!("# {locale}");
                    println!("{}", io::site_to_toml(&config)?);
                } else {
                    print_site_summary(&config);
                }
            }
        }
    }

    Ok(())
}
