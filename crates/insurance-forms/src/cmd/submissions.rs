use anyhow::{Context, Result};
use clap::Args;
use submission_table::TableView;

use crate::cmd::AppContext;
use crate::render;

#[derive(Args, Debug, Clone, Default)]
pub struct SubmissionsArgs {
    /// Columns to show, in display order (default: all)
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Column to sort by
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

pub async fn run(ctx: &AppContext, args: SubmissionsArgs) -> Result<()> {
    let page = ctx
        .gateway
        .submissions()
        .await
        .context("could not load submissions")?;
    let mut view = TableView::new(page.columns, &page.data);
    configure(&mut view, &args)?;
    print!("{}", render::table(&view));
    Ok(())
}

/// Applies the requested column selection and sort to a freshly loaded view.
pub fn configure(view: &mut TableView, args: &SubmissionsArgs) -> Result<()> {
    if !args.columns.is_empty() {
        if view.columns().is_all_selected() {
            view.toggle_all();
        }
        for column in &args.columns {
            if !view.columns().is_selected(column) {
                view.toggle_column(column)?;
            }
        }
    }
    if let Some(column) = &args.sort {
        view.set_sort(column)?;
        if args.desc {
            view.set_sort(column)?;
        }
    }
    Ok(())
}
