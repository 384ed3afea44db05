use clap::{Parser, Subcommand};
use serde_json::Value;

use employee_api::employees::{Employee, EmployeeFields, Level};

#[derive(Parser)]
#[command(name = "employees-cli")]
#[command(about = "Command-line client for the Employee API", long_about = None)]
struct Cli {
    /// Collection URL.
    #[arg(short, long, default_value = "http://localhost:5200/employees")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Show one employee
    Get { id: String },
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: String,
        #[arg(long, value_parser = parse_level)]
        level: Level,
    },
    /// Update the given fields of an employee
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long, value_parser = parse_level)]
        level: Option<Level>,
    },
    /// Delete an employee
    Delete { id: String },
}

fn parse_level(s: &str) -> Result<Level, String> {
    Level::parse(s).ok_or_else(|| format!("`{}` is not one of junior, mid, senior", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List => client.get(base).send().await?,
        Commands::Get { id } => client.get(format!("{}/{}", base, id)).send().await?,
        Commands::Create {
            name,
            position,
            level,
        } => {
            let fields = EmployeeFields {
                name: Some(name),
                position: Some(position),
                level: Some(level),
            };
            client.post(base).json(&fields).send().await?
        }
        Commands::Update {
            id,
            name,
            position,
            level,
        } => {
            let fields = EmployeeFields {
                name,
                position,
                level,
            };
            client
                .put(format!("{}/{}", base, id))
                .json(&fields)
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/{}", base, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: Employee API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => {
            for item in items {
                print_employee(item)?;
            }
        }
        Ok(value @ Value::Object(_)) => print_employee(value)?,
        _ => println!("{}", text),
    }
    Ok(())
}

fn print_employee(value: Value) -> Result<(), Box<dyn std::error::Error>> {
    match value {
        Value::Object(document) => match Employee::from_document(document.clone()) {
            Ok(employee) => println!(
                "{}  {:<24} {:<24} {}",
                employee.id,
                employee.name.as_deref().unwrap_or("-"),
                employee.position.as_deref().unwrap_or("-"),
                employee.level.map(|l| l.as_str()).unwrap_or("-"),
            ),
            Err(_) => println!("{}", serde_json::to_string_pretty(&document)?),
        },
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}
