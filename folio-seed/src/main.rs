//! Populate the catalog database with generated authors and books.
//!
//! Authors get a random name, country, and a birth date between 20 and 80
//! years ago; books get a short generated title, a publication date within
//! the last 10 years, and a random existing author.

use std::path::PathBuf;
use std::process::exit;

use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use folio_db::{CatalogDb, NewAuthor, NewBook, OpenMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Carmen", "Dmitri", "Elena", "Farid", "Greta", "Hiroshi", "Ines", "Jonas",
    "Katarina", "Leopold", "Mireille", "Nadia", "Oskar", "Priya", "Quentin", "Rosa", "Sofia",
    "Tomas",
];

const LAST_NAMES: &[&str] = &[
    "Abadi", "Bergstrom", "Castellanos", "Duarte", "Eriksen", "Fontaine", "Guzman", "Haverford",
    "Ivanova", "Jansen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Petrov",
    "Quintero", "Rossi", "Svensson", "Takahashi",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Brazil", "Canada", "Denmark", "Egypt", "France", "Germany", "Hungary", "India",
    "Japan", "Kenya", "Mexico", "Nigeria", "Norway", "Poland", "Portugal", "South Korea", "Spain",
    "Sweden", "United States",
];

const TITLE_WORDS: &[&str] = &[
    "autumn", "bridge", "chronicle", "distant", "echo", "forgotten", "garden", "harbor", "iron",
    "journey", "kingdom", "lantern", "midnight", "northern", "orchard", "paper", "quiet", "river",
    "shadow", "silent", "stone", "tides", "winter", "wolves",
];

#[derive(Debug, Parser)]
#[command(
    name = "folio-seed",
    version,
    about = "Generate random author and book records in the catalog database"
)]
struct Args {
    /// Number of authors to create
    author_count: usize,
    /// Number of books to create
    book_count: usize,

    /// Path to the catalog database (created if missing)
    #[arg(long, default_value = "catalog.sqlite")]
    database: PathBuf,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.gen_range(0..words.len())]
}

fn author_name(rng: &mut StdRng) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

fn book_title(rng: &mut StdRng) -> String {
    let count = rng.gen_range(4..=6);
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        words.push(pick(rng, TITLE_WORDS));
    }
    let mut title = words.join(" ");
    title[..1].make_ascii_uppercase();
    title
}

/// A date a uniformly random number of days before today, bounded by years.
fn date_years_back(rng: &mut StdRng, today: NaiveDate, min_years: i64, max_years: i64) -> NaiveDate {
    let days = rng.gen_range((min_years * 365)..=(max_years * 365));
    today - Duration::days(days)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = CatalogDb::open(&args.database, OpenMode::Create)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = Utc::now().date_naive();

    let authors: Vec<NewAuthor> = (0..args.author_count)
        .map(|_| NewAuthor {
            name: author_name(&mut rng),
            birth_date: date_years_back(&mut rng, today, 20, 80),
            country: pick(&mut rng, COUNTRIES).to_owned(),
        })
        .collect();
    db.insert_authors(&authors)?;
    println!("Successfully created {} author(s).", args.author_count);

    let author_ids = db.query_author_ids()?;
    if author_ids.is_empty() && args.book_count > 0 {
        return Err("cannot create books: no authors in the database".into());
    }

    let books: Vec<NewBook> = (0..args.book_count)
        .map(|_| NewBook {
            title: book_title(&mut rng),
            published_date: date_years_back(&mut rng, today, 0, 10),
            author_id: author_ids[rng.gen_range(0..author_ids.len())],
        })
        .collect();
    db.insert_books(&books)?;
    println!("Successfully created {} book(s).", args.book_count);

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("folio-seed: {e}");
        exit(1);
    }
}
