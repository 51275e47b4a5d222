//! Dish commands: feed, uploads, likes, comments, deletion.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dishhub_core::error::AppError;
use dishhub_core::types::id::{CommentId, DishId};
use dishhub_entity::dish::{Comment, Dish};
use dishhub_service::{ImageUpload, ensure_owner, parse_tag_input};

use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Arguments for dish commands
#[derive(Debug, Args)]
pub struct DishArgs {
    /// Dish subcommand
    #[command(subcommand)]
    pub command: DishCommand,
}

/// Dish subcommands
#[derive(Debug, Subcommand)]
pub enum DishCommand {
    /// Newest dishes from everyone
    Feed {
        /// Maximum number of dishes
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Your own dishes, newest first
    Mine {
        /// Maximum number of dishes
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show one dish with its comments
    Show {
        /// Dish ID
        id: DishId,
    },
    /// Upload a photo as a new dish
    Upload {
        /// Image file
        path: PathBuf,
        /// Caption
        #[arg(short, long)]
        caption: Option<String>,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Like a dish
    Like {
        /// Dish ID
        id: DishId,
    },
    /// Comment on a dish
    Comment {
        /// Dish ID
        id: DishId,
        /// Comment text
        text: String,
    },
    /// Delete one of your comments
    Uncomment {
        /// Dish ID
        id: DishId,
        /// Comment ID
        comment_id: CommentId,
    },
    /// Delete one of your dishes and its image
    Delete {
        /// Dish ID
        id: DishId,
    },
}

/// Dish display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DishRow {
    /// Dish ID
    id: String,
    /// Owner
    owner: String,
    /// Caption
    caption: String,
    /// Tags
    tags: String,
    /// Likes
    likes: u64,
    /// Number of comments
    comments: usize,
    /// Created at
    created_at: String,
}

impl From<&Dish> for DishRow {
    fn from(dish: &Dish) -> Self {
        Self {
            id: dish.id.to_string(),
            owner: dish.owner_id.to_string(),
            caption: dish.caption.clone(),
            tags: dish.tags.join(", "),
            likes: dish.likes,
            comments: dish.comments.len(),
            created_at: dish.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Comment display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CommentRow {
    /// Comment ID
    id: String,
    /// Author
    author: String,
    /// Text
    comment: String,
    /// Written at
    created_at: String,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author: comment.user_name.clone(),
            comment: comment.comment.clone(),
            created_at: comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute dish commands
pub async fn execute(
    ctx: &CliContext,
    args: &DishArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let default_limit = ctx.config.feed.default_limit;

    match &args.command {
        DishCommand::Feed { limit } => {
            let dishes = ctx
                .dishes
                .get_all_dishes(limit.unwrap_or(default_limit))
                .await?;
            print_dishes(&dishes, format);
        }
        DishCommand::Mine { limit } => {
            let user = ctx.require_user()?;
            let dishes = ctx
                .dishes
                .get_user_dishes(&user.id, limit.unwrap_or(default_limit))
                .await?;
            print_dishes(&dishes, format);
        }
        DishCommand::Show { id } => {
            let dish = ctx.dishes.get_dish(id).await?;
            print_dish(&dish, format);
        }
        DishCommand::Upload {
            path,
            caption,
            tags,
        } => {
            let user = ctx.require_user()?;
            let image = ImageUpload::from_path(path).await?;
            let dish = ctx
                .dishes
                .upload_dish(image, &user.id, caption.as_deref(), parse_tag_input(tags))
                .await?;
            output::print_success(&format!("Dish '{}' uploaded", dish.id));
            print_dish(&dish, format);
        }
        DishCommand::Like { id } => {
            let dish = ctx.dishes.get_dish(id).await?;
            let liked = ctx.dishes.like_dish(&dish).await?;
            output::print_success(&format!("Liked '{}' ({} likes)", id, liked.likes));
        }
        DishCommand::Comment { id, text } => {
            let user = ctx.require_user()?;
            let dish = ctx.dishes.get_dish(id).await?;
            let updated = ctx
                .dishes
                .add_comment(&dish, &user.id, user.display_name(), text)
                .await?;
            output::print_success(&format!(
                "Comment added ({} total)",
                updated.comments.len()
            ));
        }
        DishCommand::Uncomment { id, comment_id } => {
            let user = ctx.require_user()?;
            let dish = ctx.dishes.get_dish(id).await?;
            ctx.dishes
                .remove_comment(&dish, comment_id, &user.id)
                .await?;
            output::print_success(&format!("Comment '{comment_id}' deleted"));
        }
        DishCommand::Delete { id } => {
            let user = ctx.require_user()?;
            let dish = ctx.dishes.get_dish(id).await?;
            ensure_owner(&dish, &user.id)?;
            ctx.dishes.delete_dish(id, dish.image_id.as_ref()).await?;
            output::print_success(&format!("Dish '{id}' deleted"));
        }
    }

    Ok(())
}

fn print_dishes(dishes: &[Dish], format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(dishes),
        OutputFormat::Table => {
            let rows: Vec<DishRow> = dishes.iter().map(DishRow::from).collect();
            output::print_list(&rows, format, "No dishes yet.");
        }
    }
}

fn print_dish(dish: &Dish, format: OutputFormat) {
    output::print_item(dish, format, |d| {
        output::print_kv("ID", d.id.as_str());
        output::print_kv("Owner", d.owner_id.as_str());
        output::print_kv("Caption", &d.caption);
        output::print_kv("Tags", &d.tags.join(", "));
        output::print_kv("Likes", &d.likes.to_string());
        output::print_kv("Image", d.image_url.as_deref().unwrap_or("-"));
        output::print_kv("Created", &d.created_at.format("%Y-%m-%d %H:%M").to_string());
        if d.likes_unreadable {
            output::print_warning("Stored like counter is unreadable; likes are disabled");
        }
        if d.comments_unreadable {
            output::print_warning("Stored comments are unreadable; commenting is disabled");
        }

        if !d.comments.is_empty() {
            println!();
            let rows: Vec<CommentRow> = d.comments.iter().map(CommentRow::from).collect();
            output::print_list(&rows, OutputFormat::Table, "");
        }
    });
}
