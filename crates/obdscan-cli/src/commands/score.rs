use obdscan_core::classify::text;
use obdscan_core::error::ObdError;

pub fn run(input: &str) -> Result<(), ObdError> {
    let counts = text::count_keywords(input);
    let severity = obdscan_core::classify_message(input);
    println!("{}", severity.label());
    println!(
        "  keywords: {} critical, {} warning, {} normal",
        counts.critical, counts.warning, counts.normal
    );
    Ok(())
}
