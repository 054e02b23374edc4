use obdscan_core::error::ObdError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    ranges: Option<PathBuf>,
    codes: Option<PathBuf>,
) -> Result<(), ObdError> {
    let tables = super::load_tables(ranges, codes)?;
    let result = obdscan_core::parse_log(&input_file, &tables)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} metric(s) and {} fault code(s) from {} row(s), written to {}",
                result.metrics.len(),
                result.fault_codes.len(),
                result.row_count,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&result)?,
            _ => println!("{}", output::table::format_result(&result)),
        },
    }

    Ok(())
}
