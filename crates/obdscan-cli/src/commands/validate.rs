use obdscan_core::error::ObdError;
use std::path::Path;

pub fn run(input_file: &Path) -> Result<(), ObdError> {
    let report = obdscan_core::validate_log(input_file)?;
    println!("{}", report.message());
    println!("  Rows: {}", report.row_count);
    println!("  Columns: {}", report.recognized.join(", "));
    Ok(())
}
