#![deny(clippy::all, clippy::pedantic)]

use school_blog_api_types::Category;
use serde::Serialize;

use crate::client::CliError;
use crate::print::print_json;

#[derive(Debug, Serialize)]
struct CategoryRow {
    label: &'static str,
    slug: String,
    color: &'static str,
}

pub fn handle() -> Result<(), CliError> {
    let rows: Vec<CategoryRow> = Category::ALL
        .into_iter()
        .map(|c| CategoryRow {
            label: c.label(),
            slug: c.slug(),
            color: c.color(),
        })
        .collect();
    print_json(&rows)
}
