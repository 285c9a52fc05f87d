mod cli;
mod evaluate;
mod infra;
mod routes;
mod server;
#[cfg(test)]
mod test_support;

use hla_donor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
