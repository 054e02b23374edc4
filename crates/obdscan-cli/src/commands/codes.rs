use obdscan_core::error::ObdError;
use obdscan_core::model::FaultCodeEntry;
use obdscan_core::tables::Tables;

use crate::output;

pub fn lookup(codes: &[String], output_format: &str) -> Result<(), ObdError> {
    let tables = Tables::builtin()?;
    let entries: Vec<FaultCodeEntry> = codes
        .iter()
        .map(|c| obdscan_core::fault_code_info(c, &tables))
        .collect();

    match output_format {
        "json" => output::json::print(&entries)?,
        _ => {
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                output::table::print_fault_code(entry);
            }
        }
    }
    Ok(())
}

pub fn list() -> Result<(), ObdError> {
    let tables = Tables::builtin()?;
    let registry = &tables.registry;
    println!(
        "{} (v{}), {} codes:\n",
        registry.name,
        registry.version,
        registry.len()
    );
    for def in registry.codes() {
        println!(
            "  {}  {:<8}  {}",
            def.code,
            def.severity.to_string(),
            def.description
        );
    }
    Ok(())
}
