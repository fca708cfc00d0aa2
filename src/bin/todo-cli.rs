use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the todo service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "TODO_URL", default_value = "http://localhost:4000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all todos
    List,
    /// Show a single todo
    Get { id: String },
    /// Create a todo
    Add { body: String },
    /// Mark a todo as completed
    Complete { id: String },
    /// Delete a todo
    Delete { id: String },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let todo_url = |id: &str| format!("{}/api/todo/{}", base, id);

    let res = match cli.command {
        Commands::List => client.get(format!("{}/api/todo", base)).send().await?,
        Commands::Get { id } => client.get(todo_url(&id)).send().await?,
        Commands::Add { body } => {
            client
                .post(format!("{}/api/todo", base))
                .json(&serde_json::json!({ "body": body }))
                .send()
                .await?
        }
        Commands::Complete { id } => client.put(todo_url(&id)).send().await?,
        Commands::Delete { id } => client.delete(todo_url(&id)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: todo service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
