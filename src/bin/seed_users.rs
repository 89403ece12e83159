//! Populate a running server with random users.

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use userdesk_users::{NewUser, User};

const FIRST_NAMES: &[&str] = &["Allen", "Alex", "PJ", "Brian", "Yeti", "Brooks", "Bob"];
const LAST_NAMES: &[&str] = &["Crassel", "Dog", "Mercer", "Bobbington"];
const COUNTRIES: &[&str] = &["UK", "US", "UA", "CA", "FR", "DE", "MX"];

#[derive(Parser)]
#[command(name = "seed-users", about = "Create random users through the API")]
struct Cli {
    /// Server to seed.
    #[arg(long, default_value = "http://localhost:3001")]
    base_url: String,

    /// How many users to create.
    #[arg(long, default_value_t = 20)]
    count: usize,
}

fn pick<'a>(rng: &mut impl Rng, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn random_users(count: usize) -> Vec<NewUser> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let first_name = pick(&mut rng, FIRST_NAMES);
            let last_name = pick(&mut rng, LAST_NAMES);
            NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: format!(
                    "{}.{}{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    i
                ),
                active: rng.gen_bool(0.5),
                country: pick(&mut rng, COUNTRIES).to_string(),
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    userdesk_core::init()?;
    let cli = Cli::parse();

    let client = reqwest::Client::new();
    let url = format!("{}/api/users", cli.base_url.trim_end_matches('/'));
    let mut created = 0;

    for user in random_users(cli.count) {
        let response = match client.post(&url).json(&user).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error creating user: {}", e);
                continue;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Error creating user: {} {}", status, body);
            continue;
        }

        match response.json::<User>().await {
            Ok(user) => {
                created += 1;
                tracing::info!("Created user {}", user.full_name());
            }
            Err(e) => tracing::error!("Error creating user: {}", e),
        }
    }

    tracing::info!("Seeded {} of {} users", created, cli.count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_users_use_pools() {
        let users = random_users(30);
        assert_eq!(users.len(), 30);
        for (i, user) in users.iter().enumerate() {
            assert!(FIRST_NAMES.contains(&user.first_name.as_str()));
            assert!(LAST_NAMES.contains(&user.last_name.as_str()));
            assert!(COUNTRIES.contains(&user.country.as_str()));
            assert!(user.email.ends_with(&format!("{}@example.com", i)));
            assert!(user.normalized().is_ok());
        }
    }
}
