//! Library - command line access to the book catalogue and loans.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use common::{AppError, PageRequest, Sort, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use domain::{
    BookLoanRequest, BookRequest, BookReturnRequest, BookType, UserCreateRequest,
    UserUpdateRequest,
};
use library_service_lib::config::LibraryServiceConfig;
use library_service_lib::service::{BookService, UserService};
use library_service_lib::{Library, MigrateAction};

#[derive(Parser)]
#[command(name = "library")]
#[command(author, version, about = "Book catalogue and lending", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Database URL (overrides LIBRARY_DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Book catalogue and lending
    Book {
        #[command(subcommand)]
        action: BookCommands,
    },
    /// Library users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Show migration status
    Status,
}

#[derive(Subcommand)]
enum BookCommands {
    /// Register a book
    Add {
        name: String,
        #[arg(long = "type", default_value = "COMPUTER")]
        book_type: BookType,
    },
    /// List books page by page
    List(ListArgs),
    /// Find a book by its exact name
    Find { name: String },
    /// Delete a book by id
    Delete { id: i64 },
    /// Lend a book to a user
    Loan(LoanArgs),
    /// Take a lent book back
    Return(LoanArgs),
    /// Count books currently lent out
    Loaned,
    /// Count books per type
    Stats,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user
    Add {
        name: String,
        #[arg(long)]
        age: Option<i32>,
    },
    /// List users
    List,
    /// Change a user's name
    Rename { id: i64, name: String },
    /// Delete a user and their loan histories
    Delete { name: String },
    /// Show every user's borrowed books
    Histories,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE_NUMBER)]
    page: u64,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    per_page: u64,
    /// Sort as `property` or `property,desc`
    #[arg(long)]
    sort: Option<Sort>,
}

#[derive(Args)]
struct LoanArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    book: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("failed to encode output: {}", e)))?;
    println!("{}", out);
    Ok(())
}

async fn run_book(library: &Library, action: BookCommands) -> Result<(), AppError> {
    let books = &library.books;
    match action {
        BookCommands::Add { name, book_type } => {
            print_json(&books.save_book(BookRequest::new(name, book_type)).await?)
        }
        BookCommands::List(args) => {
            let mut request = PageRequest::new(args.page, args.per_page);
            if let Some(sort) = args.sort {
                request = request.sorted(sort);
            }
            print_json(&books.get_books(request).await?)
        }
        BookCommands::Find { name } => print_json(&books.get_book(&name).await?),
        BookCommands::Delete { id } => {
            books.delete_book(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        BookCommands::Loan(args) => {
            print_json(&books.loan_book(BookLoanRequest::new(args.user, args.book)).await?)
        }
        BookCommands::Return(args) => {
            print_json(&books.return_book(BookReturnRequest::new(args.user, args.book)).await?)
        }
        BookCommands::Loaned => {
            let loaned = books.count_loaned_books().await?;
            print_json(&serde_json::json!({ "loaned": loaned }))
        }
        BookCommands::Stats => print_json(&books.book_statistics().await?),
    }
}

async fn run_user(library: &Library, action: UserCommands) -> Result<(), AppError> {
    let users = &library.users;
    match action {
        UserCommands::Add { name, age } => {
            print_json(&users.save_user(UserCreateRequest::new(name, age)).await?)
        }
        UserCommands::List => print_json(&users.get_users().await?),
        UserCommands::Rename { id, name } => {
            print_json(&users.update_user_name(UserUpdateRequest::new(id, name)).await?)
        }
        UserCommands::Delete { name } => {
            users.delete_user(&name).await?;
            print_json(&serde_json::json!({ "deleted": name }))
        }
        UserCommands::Histories => print_json(&users.get_user_loan_histories().await?),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = LibraryServiceConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if cli.verbose {
        config.log_filter = "debug".to_string();
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Migrate { action } => {
            let action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Status => MigrateAction::Status,
            };
            library_service_lib::run_migrations(&config, action).await
        }
        Commands::Book { action } => match Library::connect(&config).await {
            Ok(library) => run_book(&library, action).await,
            Err(e) => Err(e),
        },
        Commands::User { action } => match Library::connect(&config).await {
            Ok(library) => run_user(&library, action).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("error[{}]: {}", e.code(), e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
