use std::env;

use clap::Parser;
use time::Duration;

use finance_tracker::{JwtVerifier, OwnerId};

/// Create a signed bearer token for an owner.
///
/// The token is signed with the secret in the `SECRET` environment variable,
/// which must match the server's.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ID of the owner the token is for.
    #[arg(long)]
    owner: String,

    /// An email address to include in the token.
    #[arg(long)]
    email: Option<String>,

    /// How many hours the token is valid for.
    #[arg(long, default_value_t = 24)]
    hours: i64,
}

fn main() {
    let args = Args::parse();

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let token = JwtVerifier::new(&secret)
        .create_token(
            &OwnerId::new(args.owner),
            args.email,
            Duration::hours(args.hours),
        )
        .expect("Could not create token.");

    println!("{token}");
}
