use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blogdesk")]
#[command(about = "Edit blog posts and their attachments from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Bearer token for mutations (defaults to $BLOGDESK_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List posts
    #[command(alias = "ls")]
    List {
        /// Only show published posts
        #[arg(long)]
        published: bool,
    },

    /// View one or more posts
    #[command(alias = "v")]
    View {
        /// Posts to show (list index, or id / id:<id>)
        #[arg(required = true, num_args = 1..)]
        posts: Vec<String>,
    },

    /// Create a new post
    #[command(alias = "n")]
    Create {
        /// Title of the post (optional with --editor)
        title: Option<String>,

        /// Body text (markdown)
        #[arg(long, conflicts_with = "editor")]
        text: Option<String>,

        /// Write title and text in $EDITOR
        #[arg(long)]
        editor: bool,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Local file to upload as an attachment (repeatable)
        #[arg(long = "attach")]
        attach: Vec<PathBuf>,
    },

    /// Edit a post and its attachments
    #[command(alias = "e")]
    Edit {
        /// Post to edit (list index, or id / id:<id>)
        post: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body text (markdown)
        #[arg(long, conflicts_with = "editor")]
        text: Option<String>,

        /// Edit title and text in $EDITOR
        #[arg(long)]
        editor: bool,

        /// Mark the post as published
        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,

        /// Mark the post as a draft
        #[arg(long)]
        unpublish: bool,

        /// Replace the tag selection (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        /// Local file to upload as an attachment (repeatable)
        #[arg(long = "attach")]
        attach: Vec<PathBuf>,

        /// Stored attachment path to delete (repeatable)
        #[arg(long)]
        remove: Vec<String>,

        /// Stored attachment path to keep after all (repeatable)
        #[arg(long)]
        restore: Vec<String>,

        /// Print the attachment diff without submitting
        #[arg(long, conflicts_with = "preview")]
        dry_run: bool,

        /// Write an HTML preview of the edited post to this file instead of submitting
        #[arg(long, value_name = "OUT")]
        preview: Option<PathBuf>,
    },

    /// Delete one or more posts
    #[command(alias = "rm")]
    Delete {
        /// Posts to delete (list index, or id / id:<id>)
        #[arg(required = true, num_args = 1..)]
        posts: Vec<String>,
    },

    /// Render a post to HTML
    Preview {
        /// Post to render (list index, or id / id:<id>)
        post: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (endpoint, cdn-base-url, tags, file-ext)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("blogdesk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn edit_collects_repeated_flags() {
        let cli = parse(&[
            "edit", "2", "--remove", "a.png", "--remove", "b.png", "--attach", "c.png", "--dry-run",
        ]);
        match cli.command {
            Some(Commands::Edit {
                post,
                remove,
                attach,
                dry_run,
                ..
            }) => {
                assert_eq!(post, "2");
                assert_eq!(remove, vec!["a.png", "b.png"]);
                assert_eq!(attach, vec![PathBuf::from("c.png")]);
                assert!(dry_run);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn publish_conflicts_with_unpublish() {
        let res = Cli::try_parse_from(["blogdesk", "edit", "1", "--publish", "--unpublish"]);
        assert!(res.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["ls", "--token", "abc", "-v"]);
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::List { published: false })));
    }
}
