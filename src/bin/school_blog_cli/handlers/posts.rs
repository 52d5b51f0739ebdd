#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use school_blog::application::error::{Operation, OperationResultExt};
use school_blog::application::feed::{FeedPage, Phase};
use school_blog::application::posts::PostDetail;
use school_blog::domain::posts::PostDraft;
use school_blog_api_types::Category;
use serde::Serialize;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::io::{read_cover, read_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { category, reveal } => list(ctx, category, reveal).await,
        PostsCmd::Get { id } => get(ctx, &id).await,
        PostsCmd::Create {
            title,
            category,
            content,
            content_file,
            cover,
        } => {
            let content = read_value(content, content_file)?;
            create(ctx, title, category, content, cover).await
        }
        PostsCmd::Update {
            id,
            title,
            category,
            content,
            content_file,
            cover,
        } => {
            let content = read_value(content, content_file)?;
            update(ctx, &id, title, category, content, cover).await
        }
        PostsCmd::Delete { id } => delete(ctx, &id).await,
    }
}

async fn list(ctx: &Ctx, category: Option<Category>, reveal: u32) -> Result<(), CliError> {
    let mut page = FeedPage::new(ctx.settings.feed.revealer());
    page.select_category(category);
    ctx.feed().refresh(&mut page).await;

    if let Phase::Failed { message } = page.phase() {
        return Err(CliError::Failed(message.clone()));
    }
    for _ in 0..reveal {
        page.reveal_more();
    }
    print_json(&page.view())
}

async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let post = ctx.posts().load(id).await?;
    print_json(&PostDetail::new(post, &ctx.settings.api.uploads_url))
}

async fn create(
    ctx: &Ctx,
    title: String,
    category: Category,
    content: String,
    cover: Option<PathBuf>,
) -> Result<(), CliError> {
    let draft = PostDraft::new(title, category, content).for_operation(Operation::CreatePost)?;
    let cover = cover.as_deref().map(read_cover).transpose()?;
    let post = ctx.posts().create(draft, cover).await?;
    print_json(&PostDetail::new(post, &ctx.settings.api.uploads_url))
}

async fn update(
    ctx: &Ctx,
    id: &str,
    title: String,
    category: Category,
    content: String,
    cover: Option<String>,
) -> Result<(), CliError> {
    let draft = PostDraft::new(title, category, content).for_operation(Operation::UpdatePost)?;
    let post = ctx.posts().update(id, draft, cover).await?;
    print_json(&PostDetail::new(post, &ctx.settings.api.uploads_url))
}

#[derive(Debug, Serialize)]
struct Deleted<'a> {
    deleted: &'a str,
}

async fn delete(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    ctx.posts().delete(id).await?;
    print_json(&Deleted { deleted: id.trim() })
}
