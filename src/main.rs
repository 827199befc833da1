use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use ipu_results::config::{parse_base_url, Config};
use ipu_results::models::{ApiResponse, GradedResult};
use ipu_results::utils::credits::CreditTable;
use ipu_results::utils::demo::demo_result;
use ipu_results::utils::grading::grade;
use ipu_results::utils::portal::PortalClient;
use ipu_results::utils::process;
use ipu_results::utils::report::render_summary;

#[derive(Parser, Debug)]
#[command(name = "ipu_results", about = "Fetch an exam result and compute SGPA/CGPA")]
struct Cli {
    /// Subject credit table (code,credits CSV). Defaults to CREDITS_CSV.
    #[arg(long, global = true)]
    credits: Option<PathBuf>,

    /// Print a plain-text report instead of JSON
    #[arg(long, global = true)]
    summary: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade the built-in demo result
    Demo,
    /// Extract and grade a saved result page
    Parse { file: PathBuf },
    /// Log in to the portal and grade the live result page
    Fetch {
        #[arg(long)]
        enrollment_no: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        /// Where to save the captcha image
        #[arg(long, default_value = "captcha.jpg")]
        captcha_out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    TermLogger::init(
        if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .ok();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            print_response(&ApiResponse::<GradedResult>::failure(format!("{:#}", e)), false);
            std::process::exit(1);
        }
    }
}

// Returns whether a graded result was produced.
async fn run(cli: Cli) -> Result<bool> {
    let config = Config::from_env();
    let credits_path = cli.credits.unwrap_or_else(|| PathBuf::from(&config.credits_csv));
    let credits = CreditTable::load(&credits_path);

    let response = match cli.command {
        Command::Demo => ApiResponse::ok(grade(&demo_result(), &credits)),
        Command::Parse { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            process(&html, &credits)
        }
        Command::Fetch { enrollment_no, password, base_url, captcha_out } => {
            let base_url = match base_url {
                Some(url) => parse_base_url(&url)?,
                None => config.portal_url()?,
            };
            let enrollment_no = enrollment_no
                .or(config.enrollment_no.clone())
                .context("Enrollment number not given (--enrollment-no or PORTAL_ENROLLMENT_NO)")?;
            let password = password
                .or(config.password.clone())
                .context("Password not given (--password or PORTAL_PASSWORD)")?;

            let html = fetch_result_page(base_url, &enrollment_no, &password, &captcha_out).await?;
            process(&html, &credits)
        }
    };

    let success = response.success;
    print_response(&response, cli.summary);
    Ok(success)
}

async fn fetch_result_page(base_url: url::Url, enrollment_no: &str, password: &str, captcha_out: &Path) -> Result<String> {
    let portal = PortalClient::new(base_url).context("Failed to build the portal client")?;

    let captcha = portal.fetch_captcha().await.context("Failed to fetch captcha")?;
    std::fs::write(captcha_out, &captcha)
        .with_context(|| format!("Failed to save captcha to {}", captcha_out.display()))?;
    info!("Captcha saved to {}", captcha_out.display());

    print!("Captcha text: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer).context("Failed to read captcha text")?;

    portal.login(enrollment_no, password, answer.trim()).await.context("Login failed")?;
    let html = portal.fetch_result_page().await.context("Failed to fetch result page")?;
    info!("Result page retrieved successfully");
    Ok(html)
}

fn print_response(response: &ApiResponse<GradedResult>, summary: bool) {
    match (&response.data, summary) {
        (Some(data), true) => println!("{}", render_summary(data)),
        _ => match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize response: {}", e),
        },
    }
}
