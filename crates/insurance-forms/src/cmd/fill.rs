use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use form_engine::{FormRuntime, SessionError};
use tracing::info;

use crate::cmd::AppContext;
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Form to fill in, as listed by `forms`
    #[arg(value_name = "FORM_ID")]
    pub form_id: String,

    /// Answer a field; repeat for checkbox fields to tick several options
    #[arg(long = "answer", value_name = "ID=VALUE", value_parser = parse_answer)]
    pub answers: Vec<(String, String)>,

    /// Submit once all answers are applied
    #[arg(long)]
    pub submit: bool,
}

pub fn parse_answer(raw: &str) -> Result<(String, String)> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        bail!("answer '{raw}' has an empty field id");
    }
    Ok((id.to_string(), value.to_string()))
}

pub async fn run(ctx: &AppContext, args: FillArgs) -> Result<()> {
    let mut runtime = FormRuntime::start(
        ctx.repository.clone(),
        ctx.gateway.clone(),
        ctx.drafts.clone(),
        &ctx.engine,
    )
    .await
    .context("could not start the form session")?;

    let result = fill(&mut runtime, &args).await;
    runtime.shutdown().await;
    result
}

async fn fill(runtime: &mut FormRuntime, args: &FillArgs) -> Result<()> {
    let resumed = runtime
        .session()
        .schema()
        .is_some_and(|schema| schema.form_id == args.form_id);
    if resumed {
        info!(form_id = %args.form_id, "resuming saved draft");
    } else {
        runtime.select_schema(&args.form_id)?;
    }

    for (field_id, value) in &args.answers {
        runtime.set_answer(field_id, value.as_str())?;
        runtime.settle_options().await;
    }
    runtime.settle_options().await;

    print!("{}", render::form(runtime.session()));
    let report = runtime.session().validate()?;
    print!("{}", render::report(&report));

    runtime
        .save_draft()
        .await
        .context("could not save the draft")?;

    if !args.submit {
        return Ok(());
    }
    match runtime.submit().await {
        Ok(receipt) => {
            println!("submitted: {receipt}");
            Ok(())
        }
        Err(SessionError::Validation(report)) => {
            bail!("not submitted, {} field(s) need attention", report.messages().len())
        }
        Err(err) => Err(err).context("submission failed, your answers are kept in the draft"),
    }
}
