use obdscan_core::assistant::CannedResponse;
use obdscan_core::error::ObdError;
use serde_json::json;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    response_file: Option<PathBuf>,
    text: Option<String>,
    output_format: &str,
    ranges: Option<PathBuf>,
    codes: Option<PathBuf>,
) -> Result<(), ObdError> {
    let tables = super::load_tables(ranges, codes)?;
    let result = obdscan_core::parse_log(&input_file, &tables)?;

    let response = match (response_file, text) {
        (Some(path), _) => Some(std::fs::read_to_string(&path)?),
        (None, text) => text,
    };

    let (response, assessment) = match response {
        Some(text) => {
            let backend = CannedResponse::new(text);
            let (text, assessment) = obdscan_core::assess_with_generator(&result, &backend)?;
            (Some(text), assessment)
        }
        None => (None, obdscan_core::assess(&result, None)),
    };

    match output_format {
        "json" => output::json::print(&json!({
            "result": result,
            "response": response,
            "assessment": assessment,
        }))?,
        _ => {
            println!("{}", output::table::format_result(&result));
            output::table::print_assessment(&assessment);
        }
    }

    Ok(())
}
