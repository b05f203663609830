//! 사용자 객체 개수 출력 명령어.

use schemaforge_data::{CatalogReader, DataError};

use super::ConnectionTarget;

pub async fn run_stats(target: &ConnectionTarget) -> Result<(), DataError> {
    let url = target.resolve()?;
    let stats = CatalogReader::new().stats(&url).await?;

    println!("Domains:    {}", stats.domains);
    println!("Tables:     {}", stats.tables);
    println!("Procedures: {}", stats.procedures);
    Ok(())
}
