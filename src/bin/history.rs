//! history service

use bank_services::ServiceKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bank_services::server::run(ServiceKind::History).await
}
