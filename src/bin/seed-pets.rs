use std::error::Error;
use std::fs;
use std::path::PathBuf;

use dotenv::dotenv;
use log::{error, info, initialize_logger};
use structopt::StructOpt;
use uuid::Uuid;

use shelter::config::get_variable;
use shelter::db::{Db, PgDb};
use shelter::pet::ListingForm;
use shelter::validation::validate_listing;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-pets",
    about = "Validate the listings in a JSON file and add them to the database"
)]
struct Opt {
    /// A JSON array of listing forms
    #[structopt(parse(from_os_str))]
    file: PathBuf,

    /// The user to record as the uploader
    #[structopt(long, parse(try_from_str = Uuid::parse_str))]
    uploader: Option<Uuid>,

    /// Only validate the file
    #[structopt(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = initialize_logger();

    info!(logger, "Reading listings..."; "file" => %opt.file.display());
    let forms: Vec<ListingForm> = serde_json::from_slice(&fs::read(&opt.file)?)?;

    let mut pets = vec![];
    let mut invalid = 0;

    for (index, form) in forms.iter().enumerate() {
        match validate_listing(form) {
            Ok(pet) => pets.push(pet),
            Err(errors) => {
                error!(logger, "Invalid listing"; "index" => index, "name" => &form.name, "errors" => %errors);
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Err(format!("{} of {} listings are invalid", invalid, forms.len()).into());
    }

    if opt.dry_run {
        info!(logger, "All {} listings are valid", pets.len());
        return Ok(());
    }

    let connection_string = get_variable("SHELTER_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from SHELTER_DB_CONNECTION_STRING");
    let db = PgDb::new(pool);

    for pet in pets {
        let logger = logger.new(log::o!("name" => pet.name().to_owned()));
        info!(logger, "Adding pet...");

        let record = db.insert_pet(pet, opt.uploader).await?;
        info!(logger, "Added pet"; "id" => %record.id());
    }

    Ok(())
}
