use obdscan_core::error::ObdError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), ObdError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
