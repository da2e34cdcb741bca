use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gourze_cli::admin::create_super_user;
use gourze_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "gourze-cli")]
#[command(about = "Gourze CLI - Administrative tools for Gourze", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new super user account
    CreateSuper {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users, categories, and courses
    Seed {
        #[arg(short = 'u', long, default_value = "50")]
        users: usize,

        #[arg(short = 'c', long, default_value = "8")]
        categories: usize,

        /// Number of courses authored by each seeded user
        #[arg(long, default_value = "3")]
        courses_per_user: usize,
    },
    /// Clear all seeded data (keeps super users)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateSuper {
            username,
            email,
            full_name,
            password,
        } => handle_create_super(&pool, username, email, full_name, password).await,
        Commands::Seed {
            users,
            categories,
            courses_per_user,
        } => {
            let config = SeedConfig {
                users,
                categories,
                courses_per_user,
            };
            if let Err(e) = seeder::seed_all(&pool, config).await {
                eprintln!("\n❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&pool).await {
                eprintln!("\n❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn prompt(value: Option<String>, label: &str) -> String {
    value.unwrap_or_else(|| {
        Input::new()
            .with_prompt(label)
            .interact_text()
            .expect("Failed to read input")
    })
}

async fn handle_create_super(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
) {
    let username = prompt(username, "Username");
    let email = prompt(email, "Email address");
    let full_name = prompt(full_name, "Full name");

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_super_user(pool, &username, &email, &full_name, &password).await {
        Ok(id) => {
            println!("\n✅ Super user created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", username);
            println!("   Email: {}", email);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating super user: {}", e);
            std::process::exit(1);
        }
    }
}
