use anyhow::Result;

pub fn run() -> Result<()> {
    let schema = form_spec::catalog_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
