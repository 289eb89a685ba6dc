use blogdesk::api::{
    BlogApi, CmdMessage, ConfigAction, DiffSummary, EditMode, MessageLevel, PostChanges, PostDraft,
};
use blogdesk::attachments::resolve_url;
use blogdesk::auth::BearerToken;
use blogdesk::config::BlogConfig;
use blogdesk::editor::{edit_content, EditorContent};
use blogdesk::error::{BlogError, Result};
use blogdesk::index::DisplayPost;
use blogdesk::model::LocalFile;
use blogdesk::store::graphql::GraphqlStore;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "BLOGDESK_HOME";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blogdesk={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct AppContext {
    api: BlogApi<GraphqlStore>,
    file_ext: String,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { published }) => handle_list(&ctx, published),
        Some(Commands::View { posts }) => handle_view(&ctx, posts),
        Some(Commands::Create {
            title,
            text,
            editor,
            tags,
            attach,
        }) => handle_create(&mut ctx, title, text, editor, tags, attach),
        Some(Commands::Edit {
            post,
            title,
            text,
            editor,
            publish,
            unpublish,
            tags,
            clear_tags,
            attach,
            remove,
            restore,
            dry_run,
            preview,
        }) => {
            let published = match (publish, unpublish) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            let changes = PostChanges {
                title,
                text,
                published,
                tags,
                add_files: open_files(&attach)?,
                remove,
                restore,
            };
            handle_edit(&mut ctx, post, changes, editor, dry_run, preview)
        }
        Some(Commands::Delete { posts }) => handle_delete(&mut ctx, posts),
        Some(Commands::Preview { post, output }) => handle_preview(&ctx, post, output),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, false),
    }
}

fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "blogdesk", "blogdesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            BlogError::Api(format!(
                "Could not determine config dir; set {}",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = config_dir()?;
    let config = BlogConfig::load(&config_dir)?.with_env_overrides();
    let file_ext = config.file_ext.clone();

    let token = match &cli.token {
        Some(raw) => BearerToken::new(raw.as_str()),
        None => BearerToken::from_env(),
    };

    let store = GraphqlStore::new(config.endpoint.clone())?;
    let api = BlogApi::new(store, config, config_dir).with_token(token);

    Ok(AppContext { api, file_ext })
}

fn open_files(paths: &[PathBuf]) -> Result<Vec<LocalFile>> {
    paths.iter().map(LocalFile::open).collect()
}

fn handle_list(ctx: &AppContext, published: bool) -> Result<()> {
    let result = ctx.api.list_posts(published)?;
    print_posts(&result.listed_posts);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, posts: Vec<String>) -> Result<()> {
    let result = ctx.api.view_posts(&posts)?;
    print_full_posts(&result.listed_posts, &ctx.api.settings().cdn_base_url);
    print_messages(&result.messages);
    Ok(())
}

fn handle_create(
    ctx: &mut AppContext,
    title: Option<String>,
    text: Option<String>,
    editor: bool,
    tags: Vec<String>,
    attach: Vec<PathBuf>,
) -> Result<()> {
    let (title, text) = if editor {
        let initial = EditorContent::new(title.unwrap_or_default(), text.unwrap_or_default());
        let edited = edit_content(&initial, &ctx.file_ext)?;
        (edited.title, edited.text)
    } else {
        (title.unwrap_or_default(), text.unwrap_or_default())
    };

    let draft = PostDraft {
        title,
        text,
        tags,
        files: open_files(&attach)?,
    };
    let result = ctx.api.create_post(draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    post: String,
    mut changes: PostChanges,
    editor: bool,
    dry_run: bool,
    preview: Option<PathBuf>,
) -> Result<()> {
    if editor {
        let current = ctx.api.view_posts(std::slice::from_ref(&post))?;
        if let Some(dp) = current.listed_posts.first() {
            let initial = EditorContent::new(
                changes.title.clone().unwrap_or_else(|| dp.post.title.clone()),
                dp.post.text.clone(),
            );
            let edited = edit_content(&initial, &ctx.file_ext)?;
            changes.title = Some(edited.title);
            changes.text = Some(edited.text);
        }
    }

    let mode = if dry_run {
        EditMode::DryRun
    } else if preview.is_some() {
        EditMode::Preview
    } else {
        EditMode::Submit
    };

    let result = ctx.api.edit_post(&post, changes, mode)?;
    if let Some(diff) = &result.diff {
        print_diff(diff);
    }
    if let (Some(out), Some(rendered)) = (&preview, &result.preview) {
        write_html(out, &rendered.to_html()?)?;
        println!("{}", format!("Preview written to {}", out.display()).green());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, posts: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_posts(&posts)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_preview(ctx: &AppContext, post: String, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.preview_post(&post)?;
    let Some(rendered) = &result.preview else {
        return Ok(());
    };
    match output {
        Some(out) => {
            write_html(&out, &rendered.to_html()?)?;
            println!("{}", format!("Preview written to {}", out.display()).green());
        }
        None => print!("{}", rendered.to_html()?),
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in BlogConfig::keys() {
                if let Ok(value) = config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_diff(diff: &DiffSummary) {
    for path in &diff.unchanged {
        println!("  {} {}", "=".dimmed(), path.dimmed());
    }
    for path in &diff.deleted {
        println!("  {} {}", "-".red(), path.red());
    }
    for name in &diff.added {
        println!("  {} {}", "+".green(), name.green());
    }
    if diff.unchanged.is_empty() && diff.deleted.is_empty() && diff.added.is_empty() {
        println!("{}", "No attachments.".dimmed());
    }
}

fn print_full_posts(posts: &[DisplayPost], cdn_base: &str) {
    for (i, dp) in posts.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {} {}",
            dp.index.to_string().yellow(),
            dp.post.title.bold(),
            format!("[{}]", dp.post.status_label()).dimmed()
        );
        if !dp.post.tags.is_empty() {
            println!("{}", dp.post.tags.join(", ").cyan());
        }
        println!("--------------------------------");
        println!("{}", dp.post.text);
        if !dp.post.attachments.is_empty() {
            println!("--------------------------------");
            for path in &dp.post.attachments {
                println!("{}", resolve_url(cdn_base, path).dimmed());
            }
        }
    }
}

const LINE_WIDTH: usize = 100;
const STATUS_WIDTH: usize = 10;

fn print_posts(posts: &[DisplayPost]) {
    for dp in posts {
        let idx_str = format!("{}. ", dp.index);
        let prefix = "    ";

        let title = &dp.post.title;
        let attachment_note = match dp.post.attachments.len() {
            0 => String::new(),
            n => format!(" ({} attachment{})", n, if n == 1 { "" } else { "s" }),
        };
        let title_content = format!("{}{}", title, attachment_note);

        let fixed_width = prefix.width() + idx_str.width() + STATUS_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_content, available);
        let padding = available.saturating_sub(title_display.width());

        let status = format!("{:>width$}", dp.post.status_label(), width = STATUS_WIDTH);
        let status_colored = if dp.post.published {
            status.green()
        } else {
            status.dimmed()
        };

        println!(
            "{}{}{}{}{}",
            prefix,
            idx_str.yellow(),
            title_display,
            " ".repeat(padding),
            status_colored
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
