use declsum_core::error::DeclsumError;
use declsum_core::ProcessOutcome;
use serde_json::json;

pub fn print(outcome: &ProcessOutcome, summary: bool) -> Result<(), DeclsumError> {
    let value = if summary {
        json!({
            "totals": outcome.table.as_ref().map(|t| t.group_totals()),
            "no_table_files": outcome.no_table_files,
            "warnings": outcome.warnings,
        })
    } else {
        serde_json::to_value(outcome)?
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
