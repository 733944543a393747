//! Subcommand implementations.

use crate::cli::{RenderArgs, ReviewArgs};
use crate::html::{self, FileSection};
use crate::input;
use crate::provider::LocalFileProvider;
use anyhow::{bail, Context, Result};
use review_diff_config::{AppConfig, ViewedStore};
use review_diff_core::annotate::ViewedStatus;
use review_diff_core::traits::FileContentProvider;
use review_diff_core::{
    DiffHighlighter, FetchQueue, FileContentResult, MatchSequence, NoOpContentProvider,
    ReviewSession, SessionError, SessionOptions, ViewAction, ViewEvent, ViewMode,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub async fn render(args: RenderArgs, config: &AppConfig) -> Result<()> {
    let options = SessionOptions {
        expand_step: config.expand_step,
        collapse_resolved: config.collapse_resolved,
    };
    let mut session = match input::load_diff(&args.diff) {
        Ok(diff) => ReviewSession::new(diff, options),
        Err(e) => ReviewSession::failed(SessionError::DiffUnavailable(format!("{:#}", e))),
    };

    if let (Some(project), Some(task)) = (&args.project, &args.task) {
        let store = ViewedStore::open(project, task)?;
        session = session.with_viewed(store.to_map());
    }

    if let Some(path) = &args.comments {
        session.load_comments(input::load_comments(path));
    }
    if let Some(error) = session.error() {
        bail!("Cannot render review: {}", error);
    }

    let provider: Arc<dyn FileContentProvider> = match &args.repo {
        Some(root) => Arc::new(LocalFileProvider::new(root)),
        None => Arc::new(NoOpContentProvider),
    };
    let paths: Vec<String> = session
        .diff()
        .files
        .iter()
        .map(|f| f.new_path.clone())
        .collect();
    load_views(
        &mut session,
        &paths,
        provider,
        config.fetch_concurrency,
        args.expand_all,
    )
    .await?;

    let mode = if args.split {
        ViewMode::Split
    } else {
        config.view_mode
    };
    let mut highlighter = DiffHighlighter::with_theme_name(&config.highlight_theme)
        .with_enabled(config.syntax_highlighting);
    let mut matches = MatchSequence::new();

    let mut rendered = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = session.render_file(
            path,
            mode,
            &mut highlighter,
            &mut matches,
            args.search.as_deref(),
        )?;
        rendered.push((path.as_str(), file));
    }
    if args.search.is_some() {
        log::info!("{} search matches", matches.count());
    }

    let sections: Vec<FileSection<'_>> = rendered
        .into_iter()
        .filter_map(|(path, rendered)| {
            Some(FileSection {
                file: session.diff().file(path)?,
                viewed: session.viewed_status(path),
                rendered,
            })
        })
        .collect();

    let title = args
        .diff
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "review".to_string());
    let page = html::document(
        &title,
        &sections,
        session.comments(),
        &highlighter.stylesheet(),
    );

    match &args.output {
        Some(path) => {
            std::fs::write(path, page)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Wrote {} files to {:?}", sections.len(), path);
        }
        None => print!("{}", page),
    }
    Ok(())
}

/// Mount every file, issue its initial actions and wait for the fetches they trigger.
async fn load_views(
    session: &mut ReviewSession,
    paths: &[String],
    provider: Arc<dyn FileContentProvider>,
    concurrency: usize,
    expand_all: bool,
) -> Result<()> {
    let prefetch = provider.is_available();
    let (queue, mut results) = FetchQueue::spawn(provider, concurrency);
    let mut pending = 0;

    for path in paths {
        let hunk_count = session.mount(path)?.file().hunks.len();
        for action in initial_actions(hunk_count, prefetch, expand_all) {
            for event in session.handle_action(path, action)? {
                if let ViewEvent::FileContentRequested(request) = event {
                    queue.submit(request);
                    pending += 1;
                }
            }
        }
    }

    collect_results(session, &mut results, pending).await;
    Ok(())
}

fn initial_actions(hunk_count: usize, prefetch: bool, expand_all: bool) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    if prefetch {
        actions.push(ViewAction::Prefetch);
    }
    if expand_all {
        // Gap `hunk_count` is the trailing one.
        actions.extend((0..=hunk_count).map(ViewAction::ExpandAll));
    }
    actions
}

async fn collect_results(
    session: &mut ReviewSession,
    results: &mut UnboundedReceiver<FileContentResult>,
    mut pending: usize,
) {
    while pending > 0 {
        let Some(result) = results.recv().await else {
            log::warn!("Fetch queue closed with {} requests pending", pending);
            break;
        };
        pending -= 1;
        session.apply_file_content(result);
    }
}

pub fn mark_viewed(
    review: &ReviewArgs,
    diff: &Path,
    files: &[String],
    unmark: bool,
) -> Result<()> {
    let diff = input::load_diff(diff)?;
    let mut store = ViewedStore::open(&review.project, &review.task)?;
    let mut session =
        ReviewSession::new(diff, SessionOptions::default()).with_viewed(store.to_map());

    for path in files {
        if unmark {
            session.unmark_viewed(path);
        } else if session.mark_viewed(path).is_none() {
            bail!("{} is not part of this diff", path);
        }
    }

    store.replace_all(session.viewed());
    store.save()
}

pub fn status(review: &ReviewArgs, diff: &Path) -> Result<()> {
    let diff = input::load_diff(diff)?;
    let store = ViewedStore::open(&review.project, &review.task)?;
    let session = ReviewSession::new(diff, SessionOptions::default()).with_viewed(store.to_map());

    for file in &session.diff().files {
        let status = session
            .viewed_status(&file.new_path)
            .map(status_label)
            .unwrap_or("");
        println!(
            "{:<8} {} +{} -{}",
            status,
            file.display_name(),
            file.additions,
            file.deletions
        );
    }
    Ok(())
}

fn status_label(status: ViewedStatus) -> &'static str {
    match status {
        ViewedStatus::NotViewed => "",
        ViewedStatus::Viewed => "viewed",
        ViewedStatus::Updated => "updated",
    }
}
