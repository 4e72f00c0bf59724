use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use physipro_cli::admin::{
    AdminSeed, DEFAULT_ADMIN_CPF, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, build_admin,
};
use physipro_cli::seeder::{self, SeedConfig};
use physipro_cli::tokens;
use physipro_config::{JwtConfig, PasswordConfig};
use physipro_core::{UserType, password::hash_password_with_cost};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "physipro-cli")]
#[command(about = "PhysiPro CLI - Administrative tools for PhysiPro", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the initial administrator record as JSON
    CreateAdmin {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'c', long)]
        cpf: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Accept defaults for every field except the password
        #[arg(long)]
        defaults: bool,
    },
    /// Print a bcrypt hash for a password
    HashPassword {
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Sign an access token for an existing account
    IssueToken {
        #[arg(long)]
        user_id: Uuid,

        #[arg(long)]
        email: String,

        /// ADMIN, TRAINER or STUDENT
        #[arg(long)]
        user_type: UserType,
    },
    /// Verify an access token and print its claims
    InspectToken { token: String },
    /// Print demo trainers and students as a JSON array
    Seed {
        #[arg(short = 't', long, default_value = "3")]
        trainers: usize,

        #[arg(short = 's', long, default_value = "5")]
        students_per_trainer: usize,

        #[arg(long, default_value = "2")]
        unassigned: usize,

        /// Shared password for every seeded account
        #[arg(long, default_value = "physipro123")]
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let password_config = PasswordConfig::from_env();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            cpf,
            password,
            defaults,
        } => {
            let seed = AdminSeed {
                name: field_or_prompt(name, "Name", DEFAULT_ADMIN_NAME, defaults)?,
                email: field_or_prompt(email, "Email address", DEFAULT_ADMIN_EMAIL, defaults)?,
                cpf: field_or_prompt(cpf, "CPF", DEFAULT_ADMIN_CPF, defaults)?,
                password: password_or_prompt(password, true)?,
            };

            let admin = build_admin(&seed, password_config.bcrypt_cost)
                .map_err(|e| anyhow!("Error creating admin: {}", e.message()))?;
            println!("{}", serde_json::to_string_pretty(&admin)?);
            eprintln!("\n✅ Admin record created for {}", admin.email);
        }
        Commands::HashPassword { password } => {
            let password = password_or_prompt(password, false)?;
            let hash = hash_password_with_cost(&password, password_config.bcrypt_cost)
                .map_err(|e| anyhow!(e.message()))?;
            println!("{}", hash);
        }
        Commands::IssueToken {
            user_id,
            email,
            user_type,
        } => {
            let token = tokens::issue(user_id, &email, user_type, &JwtConfig::from_env())
                .map_err(|e| anyhow!(e.message()))?;
            println!("{}", token);
        }
        Commands::InspectToken { token } => {
            let claims = tokens::inspect(&token, &JwtConfig::from_env())
                .map_err(|e| anyhow!(e.message()))?;
            println!("{}", claims);
        }
        Commands::Seed {
            trainers,
            students_per_trainer,
            unassigned,
            password,
        } => {
            let hash = hash_password_with_cost(&password, password_config.bcrypt_cost)
                .map_err(|e| anyhow!(e.message()))?;
            let users = seeder::generate(
                SeedConfig {
                    trainers,
                    students_per_trainer,
                    unassigned_students: unassigned,
                },
                &hash,
            );
            println!("{}", serde_json::to_string_pretty(&users)?);
            eprintln!("\n✅ Generated {} users", users.len());
        }
    }

    Ok(())
}

fn field_or_prompt(
    value: Option<String>,
    prompt: &str,
    default: &str,
    use_default: bool,
) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None if use_default => Ok(default.to_string()),
        None => Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn password_or_prompt(value: Option<String>, confirm: bool) -> anyhow::Result<String> {
    if let Some(password) = value {
        return Ok(password);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords don't match");
    }
    prompt.interact().context("Failed to read password")
}
