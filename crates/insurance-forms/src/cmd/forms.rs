use anyhow::{Context, Result};

use crate::cmd::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let catalog = ctx
        .repository
        .catalog()
        .await
        .context("could not load the available forms")?;
    if catalog.is_empty() {
        println!("no forms available");
    }
    for form in catalog.iter() {
        println!("{}\t{}", form.form_id, form.title);
    }
    Ok(())
}
