use clap::{Parser, Subcommand};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde_json::{json, Value};

use employee_api::auth::TokenResponse;

#[derive(Parser)]
#[command(name = "employee-cli")]
#[command(about = "Command-line client for the employee service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "admin")]
    username: String,

    #[arg(long, default_value = "password", env = "EMPLOYEE_API_PASSWORD")]
    password: String,

    /// Use this bearer token instead of requesting a new one.
    #[arg(short, long, env = "EMPLOYEE_API_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a bearer token and print it
    Token,
    /// List all employees
    List,
    /// Search employees by name fragment
    Search { fragment: String },
    /// Show one employee
    Get { id: String },
    /// Show the highest salary
    HighestSalary,
    /// Show the ten highest earners
    TopEarners,
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: u32,
        #[arg(long)]
        age: u32,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Delete an employee by id
    Delete { id: String },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(&cli.url)?;
    let employees = |segments: &[&str]| {
        endpoint(&base, &[&["api", "v1", "employee"][..], segments].concat())
    };

    let request = match cli.command {
        Commands::Token => {
            let token = request_token(&client, &base, &cli.username, &cli.password).await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
            return Ok(());
        }
        Commands::List => client.get(employees(&[])?),
        Commands::Search { fragment } => client.get(employees(&["search", fragment.as_str()])?),
        Commands::Get { id } => client.get(employees(&[id.as_str()])?),
        Commands::HighestSalary => client.get(employees(&["highestSalary"])?),
        Commands::TopEarners => client.get(employees(&["topTenHighestEarningEmployeeNames"])?),
        Commands::Create {
            name,
            salary,
            age,
            title,
        } => client.post(employees(&[])?).json(&json!({
            "name": name,
            "salary": salary,
            "age": age,
            "title": title,
        })),
        Commands::Delete { id } => client.delete(employees(&[id.as_str()])?),
    };

    let token = match cli.token {
        Some(token) => token,
        None => request_token(&client, &base, &cli.username, &cli.password).await?.token,
    };
    send(request.bearer_auth(token)).await
}

/// Append `segments` to the path of `base`, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> CliResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("'{base}' cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn request_token(
    client: &reqwest::Client,
    base: &Url,
    username: &str,
    password: &str,
) -> CliResult<TokenResponse> {
    let res = client
        .post(endpoint(base, &["api", "v1", "auth", "token"])?)
        .query(&[("username", username), ("password", password)])
        .send()
        .await?;

    if res.status() != StatusCode::OK {
        return Err(format!("token request failed with status {}", res.status()).into());
    }
    Ok(res.json().await?)
}

async fn send(request: RequestBuilder) -> CliResult<()> {
    let res = request.send().await?;
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
