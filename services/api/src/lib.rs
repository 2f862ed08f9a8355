mod cli;
mod infra;
mod report;
mod routes;
mod server;

use tuition_scenarios::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
