use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use sepia::booru::client::BooruClient;
use sepia::booru::models::Post;
use sepia::config::Config;
use sepia::service::chat::ChatFlow;
use sepia::service::users::UserService;
use sepia::session::POSTS_PER_PAGE;

/// Sepia: booru search core for chat front-ends.
///
/// The CLI drives the same library surface a chat adapter would:
/// preference-aware search, paginated results, tag lookup, and per-user
/// settings.
#[derive(Parser)]
#[command(name = "sepia", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the settings database
    Init,

    /// Search posts with your auto-tags and enabled rules applied
    Search {
        /// Tag query, e.g. "landscape rating:general"
        query: String,

        /// User id whose preferences apply
        #[arg(long, default_value = "0")]
        user: i64,

        /// Page of the fetched result set to print (zero-based)
        #[arg(long, default_value = "0")]
        page: usize,
    },

    /// Show one post by id
    Show {
        id: u64,
    },

    /// Search tags (exact name first, substring fallback)
    Tags {
        query: String,

        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// List comments on a post
    Comments {
        post_id: u64,
    },

    /// List deleted posts
    Deleted {
        /// Only posts with an id above this one
        #[arg(long)]
        last_id: Option<u64>,
    },

    /// Show stored preferences for a user
    Prefs {
        #[arg(long, default_value = "0")]
        user: i64,
    },

    /// Add an auto-tag applied to every search
    AddTag {
        tag: String,

        #[arg(long, default_value = "0")]
        user: i64,
    },

    /// Remove an auto-tag by its position in `prefs`
    RemoveTag {
        index: usize,

        #[arg(long, default_value = "0")]
        user: i64,
    },

    /// Flip a toggle rule on or off
    ToggleRule {
        rule: String,

        #[arg(long, default_value = "0")]
        user: i64,
    },

    /// Delete a user's stored preferences entirely
    Forget {
        #[arg(long, default_value = "0")]
        user: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sepia=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            sepia::prefs::open_sqlite(&config.db_path)?;
            println!("Settings database ready at: {}", config.db_path);
            println!("\nNext: set BOORU_BASE_URL in your .env and run `sepia search <tags>`.");
        }

        Commands::Search { query, user, page } => {
            let flow = build_flow(&config)?;
            match flow.compose_and_search(user, &query).await {
                Some(first) => {
                    let shown = if page == 0 {
                        Some(first)
                    } else {
                        flow.goto_page(user, page).await
                    };
                    match shown {
                        Some(result) => print_page(&result),
                        None => println!(
                            "Page {page} is out of range for this search. Try a smaller page."
                        ),
                    }
                }
                None => {
                    println!("No posts found. Try different tags or check your spelling.");
                }
            }
        }

        Commands::Show { id } => {
            let flow = build_flow(&config)?;
            match flow.post_by_id(id).await {
                Some(post) => print_post_detail(&post),
                None => println!("No post with id {id}."),
            }
        }

        Commands::Tags { query, limit } => {
            let flow = build_flow(&config)?;
            let tags = flow.lookup_tags(&query, limit).await;
            if tags.is_empty() {
                println!("No tags matched '{query}'.");
            } else {
                for tag in &tags {
                    let count = tag.count.unwrap_or(0);
                    println!("  {:<40} {}", tag.name.bold(), format!("{count} posts").dimmed());
                }
            }
        }

        Commands::Comments { post_id } => {
            let client = build_client(&config)?;
            let comments = client.comments(post_id).await?;
            if comments.is_empty() {
                println!("No comments on post {post_id}.");
            } else {
                for comment in &comments {
                    println!(
                        "  {} {}",
                        format!("[{}]", comment.creator).bold(),
                        comment.body
                    );
                }
            }
        }

        Commands::Deleted { last_id } => {
            let client = build_client(&config)?;
            let posts = client.deleted_posts(last_id).await?;
            println!("{} deleted posts", posts.len());
            for post in posts.iter().take(20) {
                println!("  #{}", post.id.map_or("?".to_string(), |id| id.to_string()));
            }
        }

        Commands::Prefs { user } => {
            let users = build_users(&config)?;
            let settings = users.settings(user).await;
            println!("{}", format!("Preferences for user {user}").bold());
            if settings.auto_tags.is_empty() {
                println!("  auto-tags: {}", "none".dimmed());
            } else {
                println!("  auto-tags:");
                for (i, tag) in settings.auto_tags.iter().enumerate() {
                    println!("    {i}. {tag}");
                }
            }
            if settings.toggle_rules.is_empty() {
                println!("  rules: {}", "none".dimmed());
            } else {
                println!("  rules:");
                for (rule, enabled) in &settings.toggle_rules {
                    let state = if *enabled { "on".green() } else { "off".dimmed() };
                    println!("    {rule} [{state}]");
                }
            }
        }

        Commands::AddTag { tag, user } => {
            let users = build_users(&config)?;
            if users.add_auto_tag(user, &tag).await? {
                println!("Auto-tag '{tag}' added.");
            } else {
                println!("Auto-tag '{tag}' is already set.");
            }
        }

        Commands::RemoveTag { index, user } => {
            let users = build_users(&config)?;
            if users.remove_auto_tag_at(user, index).await? {
                println!("Auto-tag {index} removed.");
            } else {
                println!("No auto-tag at index {index}. Run `sepia prefs` to see them.");
            }
        }

        Commands::ToggleRule { rule, user } => {
            let users = build_users(&config)?;
            let enabled = users.toggle_rule(user, &rule).await?;
            let state = if enabled { "on".green() } else { "off".yellow() };
            println!("Rule '{rule}' is now {state}.");
        }

        Commands::Forget { user } => {
            let users = build_users(&config)?;
            if users.delete(user).await? {
                println!("Preferences for user {user} deleted.");
            } else {
                println!("User {user} had no stored preferences.");
            }
        }
    }

    Ok(())
}

fn build_client(config: &Config) -> Result<BooruClient> {
    config.require_base_url()?;
    BooruClient::new(
        &config.base_url,
        config.api_key.clone(),
        config.api_user_id.clone(),
        config.http_timeout_secs,
    )
}

fn build_users(config: &Config) -> Result<UserService> {
    let store = sepia::prefs::open_sqlite(&config.db_path)?;
    Ok(UserService::new(store))
}

fn build_flow(config: &Config) -> Result<ChatFlow> {
    Ok(ChatFlow::new(build_client(config)?, build_users(config)?))
}

fn print_page(result: &sepia::service::chat::ResultPage) {
    println!(
        "{} (page {}/{})",
        format!("Results for '{}'", result.query).bold(),
        result.page + 1,
        result.total_pages,
    );
    for (offset, post) in result.posts.iter().enumerate() {
        let index = result.page * POSTS_PER_PAGE + offset;
        print_post_line(index, post);
    }
    if result.page + 1 < result.total_pages {
        println!(
            "{}",
            format!("More: rerun with --page {}", result.page + 1).dimmed()
        );
    }
}

fn print_post_line(index: usize, post: &Post) {
    let id = post.id.map_or("?".to_string(), |id| id.to_string());
    let dims = match (post.width, post.height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        _ => "?".to_string(),
    };
    println!(
        "  {:<4} #{:<9} {:<9} {:<6} score {}",
        format!("{index}."),
        id,
        dims,
        post.media_type().as_str(),
        post.score.unwrap_or(0),
    );
}

fn print_post_detail(post: &Post) {
    let id = post.id.map_or("?".to_string(), |id| id.to_string());
    println!("{}", format!("Post #{id}").bold());
    if let (Some(w), Some(h)) = (post.width, post.height) {
        println!("  size:    {w}x{h}");
    }
    println!("  type:    {}", post.media_type().as_str());
    if !post.rating.is_empty() {
        println!("  rating:  {}", post.rating);
    }
    println!("  score:   {}", post.score.unwrap_or(0));
    if !post.tags.is_empty() {
        println!("  tags:    {}", post.tags.trim());
    }
    if !post.source.is_empty() {
        println!("  source:  {}", post.source);
    }
    println!("  media:   {}", post.display_url());
    if post.preview() != post.display_url() {
        println!("  preview: {}", post.preview());
    }
}
