#![deny(clippy::all, clippy::pedantic)]

use std::time::Duration;

use school_blog::application::feed::FeedPage;
use school_blog::application::search::{
    SearchDebouncer, SearchOutcome, SearchOutcomes, SearchQuery,
};
use school_blog_api_types::Category;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::args::SearchCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

const CATEGORY_DIRECTIVE: &str = ":category";

pub async fn handle(ctx: &Ctx, cmd: SearchCmd) -> Result<(), CliError> {
    match cmd {
        SearchCmd::Query { term, category } => query(ctx, term, category).await,
        SearchCmd::Watch { category } => watch(ctx, category).await,
    }
}

async fn query(ctx: &Ctx, term: String, category: Option<Category>) -> Result<(), CliError> {
    let mut page = FeedPage::new(ctx.settings.feed.revealer());
    page.select_category(category);

    // A single explicit query has nothing to wait for.
    let (mut debouncer, mut outcomes) = SearchDebouncer::new(ctx.api.clone(), Duration::ZERO);
    if debouncer.update(SearchQuery::new(term, category)).is_none() {
        return Err(CliError::InvalidInput("search term must not be empty".into()));
    }
    drop(debouncer);

    let outcome = outcomes
        .next()
        .await
        .ok_or_else(|| CliError::Failed("search was cancelled".into()))?;
    if let Err(err) = &outcome.result {
        return Err(CliError::Failed(err.message.clone()));
    }
    page.apply_search(outcome);
    print_json(&page.view())
}

/// A line read from stdin in watch mode.
#[derive(Debug, PartialEq, Eq)]
enum WatchInput {
    Term(String),
    Category(Option<Category>),
}

fn parse_watch_line(line: &str) -> Result<WatchInput, CliError> {
    let Some(rest) = line.trim_start().strip_prefix(CATEGORY_DIRECTIVE) else {
        return Ok(WatchInput::Term(line.to_string()));
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(WatchInput::Category(None));
    }
    rest.parse()
        .map(|c| WatchInput::Category(Some(c)))
        .map_err(|e: school_blog_api_types::ParseCategoryError| {
            CliError::InvalidInput(e.to_string())
        })
}

async fn watch(ctx: &Ctx, category: Option<Category>) -> Result<(), CliError> {
    let (mut watch, mut outcomes) = Watch::new(ctx, category);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(CliError::Stdin)? else {
                    break;
                };
                match watch.handle_line(&line).await {
                    Err(err @ CliError::InvalidInput(_)) => eprintln!("error: {err}"),
                    other => other?,
                }
            }
            Some(outcome) = outcomes.next() => watch.emit(outcome)?,
        }
    }

    // Let a lookup scheduled by the last line finish before exiting.
    let mut page = watch.finish();
    while let Some(outcome) = outcomes.next().await {
        page.apply_search(outcome);
        print_json(&page.view())?;
    }
    Ok(())
}

/// Interactive search state: the feed page, the pending lookup and the term
/// typed so far.
struct Watch<'a> {
    ctx: &'a Ctx,
    page: FeedPage,
    debouncer: SearchDebouncer,
    term: String,
}

impl<'a> Watch<'a> {
    fn new(ctx: &'a Ctx, category: Option<Category>) -> (Self, SearchOutcomes) {
        let mut page = FeedPage::new(ctx.settings.feed.revealer());
        page.select_category(category);
        let (debouncer, outcomes) =
            SearchDebouncer::new(ctx.api.clone(), ctx.settings.search.debounce);
        let watch = Self {
            ctx,
            page,
            debouncer,
            term: String::new(),
        };
        (watch, outcomes)
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), CliError> {
        match parse_watch_line(line)? {
            WatchInput::Term(next) => {
                self.term = next;
                self.schedule()
            }
            WatchInput::Category(next) => {
                if !self.page.select_category(next) {
                    return Ok(());
                }
                if self.term.trim().is_empty() {
                    self.reload().await
                } else {
                    self.schedule()
                }
            }
        }
    }

    /// Queue a lookup for the current term, or drop the pending one when the
    /// box was cleared. Prints the view whenever the phase changes.
    fn schedule(&mut self) -> Result<(), CliError> {
        let query = SearchQuery::new(self.term.clone(), self.page.category());
        let changed = if self.debouncer.update(query).is_some() {
            self.page.begin_search()
        } else {
            debug!("search box cleared");
            self.page.abandon_pending()
        };
        if changed {
            print_json(&self.page.view())?;
        }
        Ok(())
    }

    /// Refetch the list for the newly selected category.
    async fn reload(&mut self) -> Result<(), CliError> {
        self.debouncer.cancel();
        let ticket = self.page.begin_load();
        print_json(&self.page.view())?;
        self.ctx.feed().load(&mut self.page, ticket).await;
        print_json(&self.page.view())
    }

    fn emit(&mut self, outcome: SearchOutcome) -> Result<(), CliError> {
        self.page.apply_search(outcome);
        print_json(&self.page.view())
    }

    /// Stop accepting input; only the already scheduled lookup may still land.
    fn finish(self) -> FeedPage {
        drop(self.debouncer);
        self.page
    }
}

#[cfg(test)]
mod tests {
    use school_blog::application::feed::Phase;

    use super::*;

    #[test]
    fn category_directive_sets_and_clears_the_filter() {
        assert_eq!(
            parse_watch_line(":category sports").expect("directive"),
            WatchInput::Category(Some(Category::Sports))
        );
        assert_eq!(
            parse_watch_line(":category").expect("directive"),
            WatchInput::Category(None)
        );
        assert!(parse_watch_line(":category chess").is_err());
    }

    #[test]
    fn other_lines_are_search_terms() {
        assert_eq!(
            parse_watch_line("art history").expect("term"),
            WatchInput::Term("art history".into())
        );
    }

    #[tokio::test]
    async fn category_change_with_blank_term_reloads_the_feed() -> Result<(), CliError> {
        let server = httpmock::MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/post")
                    .query_param("category", "Sports");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("[]");
            })
            .await;

        let ctx = crate::tests::ctx(&server);
        let (mut watch, _outcomes) = Watch::new(&ctx, None);
        watch.handle_line(":category sports").await?;
        assert_eq!(watch.page.phase(), &Phase::Loaded);
        assert_eq!(watch.page.category(), Some(Category::Sports));

        // Same category again is not a change.
        watch.handle_line(":category sports").await?;
        list.assert_calls_async(1).await;
        Ok(())
    }

    #[tokio::test]
    async fn typing_a_term_shows_loading_until_the_box_is_cleared() -> Result<(), CliError> {
        let server = httpmock::MockServer::start_async().await;
        let ctx = crate::tests::ctx(&server);
        let (mut watch, _outcomes) = Watch::new(&ctx, None);

        watch.handle_line("art").await?;
        assert_eq!(watch.page.phase(), &Phase::Loading);
        assert!(watch.debouncer.is_pending());

        watch.handle_line("").await?;
        assert_eq!(watch.page.phase(), &Phase::Idle);
        assert!(!watch.debouncer.is_pending());
        Ok(())
    }
}
