use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("glucose-watch version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
