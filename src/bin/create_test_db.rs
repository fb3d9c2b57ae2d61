use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledger_insights::{
    UserId, create_category, create_transaction, initialize_db,
    insights::{Category, Transaction},
};

/// A utility for creating a test database for the JSON API server of ledger_insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the generated data.
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

/// (guid, name, parent guid)
const CATEGORIES: [(&str, &str, Option<&str>); 9] = [
    ("food", "Food", None),
    ("groceries", "Groceries", Some("food")),
    ("dining", "Dining Out", Some("food")),
    ("housing", "Housing", None),
    ("rent", "Rent", Some("housing")),
    ("utilities", "Utilities", Some("housing")),
    ("transport", "Transport", None),
    ("gifts", "Gifts", None),
    ("salary", "Salary", None),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let user_id = UserId::new(args.user_id);

    println!("Creating categories...");
    for (guid, name, parent) in CATEGORIES {
        create_category(
            user_id,
            &Category {
                guid: guid.to_owned(),
                name: name.to_owned(),
                parent: parent.map(str::to_owned),
            },
            &conn,
        )?;
    }

    println!("Creating a year of transactions...");
    let today = OffsetDateTime::now_utc().date().midnight().assume_utc();
    let mut count = 0;

    for days_ago in 0..365_i64 {
        let date = (today - Duration::days(days_ago)).unix_timestamp();

        for (category, amount, description) in transactions_for_day(days_ago) {
            count += 1;
            create_transaction(
                user_id,
                &Transaction {
                    guid: format!("test-{count:05}"),
                    date,
                    amount,
                    category: category.map(str::to_owned),
                    description: description.to_owned(),
                },
                &conn,
            )?;
        }
    }

    println!("Created {count} transactions for user {user_id}.");
    println!(
        "Example exclusions file: {{\"housing\": [\"rent\", \"utilities\"], \"gifts\": [\"gifts\"]}}"
    );
    println!("Success!");

    Ok(())
}

/// A repeating schedule of transactions so the generated data has some shape.
fn transactions_for_day(days_ago: i64) -> Vec<(Option<&'static str>, f64, &'static str)> {
    let mut transactions = Vec::new();

    if days_ago % 7 == 0 {
        transactions.push((Some("groceries"), -85.0 - (days_ago % 5) as f64 * 7.5, "Supermarket"));
    }
    if days_ago % 10 == 3 {
        transactions.push((Some("dining"), -32.5, "Cafe"));
    }
    if days_ago % 14 == 0 {
        transactions.push((Some("rent"), -950.0, "Rent payment"));
        transactions.push((Some("salary"), 3200.0, "Salary"));
    }
    if days_ago % 30 == 12 {
        transactions.push((Some("utilities"), -140.0, "Power bill"));
    }
    if days_ago % 3 == 1 {
        transactions.push((Some("transport"), -4.2, "Bus fare"));
    }
    if days_ago % 45 == 20 {
        transactions.push((Some("gifts"), -60.0, "Birthday present"));
    }
    if days_ago % 11 == 5 {
        transactions.push((None, -15.0, "Miscellaneous"));
    }

    transactions
}
